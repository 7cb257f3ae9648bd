use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use sha2::Digest as _;

#[derive(Parser, Debug)]
#[command(name = "scenegrid", version)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the built-in scenes.
    List,
    /// Write a scene as JSON.
    Dump(DumpArgs),
    /// Render a single frame as a PNG (or SVG).
    Frame(FrameArgs),
    /// Render a whole scene to MP4 (requires `ffmpeg` on PATH) or to a PNG sequence.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct SceneSource {
    /// Built-in scene name (see `scenegrid list`).
    #[arg(long)]
    scene: Option<String>,

    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct DumpArgs {
    /// Built-in scene name.
    #[arg(long)]
    scene: String,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    source: SceneSource,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output path.
    #[arg(long)]
    out: PathBuf,

    /// Write the SVG document instead of a PNG.
    #[arg(long)]
    svg: bool,

    /// Print the SHA-256 of the written file.
    #[arg(long)]
    hash: bool,

    /// Extra directory to load fonts from.
    #[arg(long)]
    font_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    source: SceneSource,

    /// Output MP4 path, or the output directory with `--png-dir`.
    #[arg(long)]
    out: PathBuf,

    /// Write `frame_00000.png`, ... into `--out` instead of encoding MP4.
    #[arg(long)]
    png_dir: bool,

    /// Render frames on a thread pool.
    #[arg(long)]
    parallel: bool,

    /// Thread pool size (with `--parallel`).
    #[arg(long)]
    threads: Option<usize>,

    /// Render identical frames once per chunk.
    #[arg(long)]
    static_frame_elision: bool,

    /// Extra directory to load fonts from.
    #[arg(long)]
    font_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::List => cmd_list(),
        Command::Dump(args) => cmd_dump(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_scene(source: &SceneSource) -> anyhow::Result<scenegrid::Scene> {
    match (&source.scene, &source.in_path) {
        (Some(name), _) => Ok(scenegrid::catalog::build(name)?),
        (None, Some(path)) => {
            let scene = scenegrid::Scene::from_path(path)
                .with_context(|| format!("load scene '{}'", path.display()))?;
            Ok(scene)
        }
        (None, None) => anyhow::bail!("pass --scene NAME or --in PATH"),
    }
}

fn session_opts(font_dir: Option<PathBuf>) -> scenegrid::RenderSessionOpts {
    scenegrid::RenderSessionOpts {
        render: scenegrid::RenderSettings {
            font_dir,
            ..scenegrid::RenderSettings::default()
        },
        ..scenegrid::RenderSessionOpts::default()
    }
}

fn cmd_list() -> anyhow::Result<()> {
    for name in scenegrid::catalog::names() {
        println!("{name}");
    }
    Ok(())
}

fn cmd_dump(args: DumpArgs) -> anyhow::Result<()> {
    let scene = scenegrid::catalog::build(&args.scene)?;
    let json = scene.to_json_pretty()?;
    match args.out {
        Some(out) => {
            scenegrid::encode::ffmpeg::ensure_parent_dir(&out)?;
            std::fs::write(&out, json).with_context(|| format!("write '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.source)?;
    let session = scenegrid::RenderSession::new(scene, session_opts(args.font_dir))?;
    let frame = scenegrid::FrameIndex(args.frame);

    scenegrid::encode::ffmpeg::ensure_parent_dir(&args.out)?;
    if args.svg {
        let doc = session.render_svg(frame)?;
        std::fs::write(&args.out, doc)
            .with_context(|| format!("write svg '{}'", args.out.display()))?;
    } else {
        let rgba = session.render_frame(frame)?;
        scenegrid::encode::sink::write_png(&args.out, &rgba)?;
    }

    if args.hash {
        println!("{}", sha256_file(&args.out)?);
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.source)?;
    let bg = scene.background.to_rgba8();
    let opts = scenegrid::RenderSessionOpts {
        parallel: args.parallel,
        threads: args.threads,
        static_frame_elision: args.static_frame_elision,
        ..session_opts(args.font_dir)
    };
    let session = scenegrid::RenderSession::new(scene, opts)?;

    let stats = if args.png_dir {
        let mut sink = scenegrid::PngSequenceSink::new(&args.out);
        session.render_all(&mut sink)?
    } else {
        if !scenegrid::encode::ffmpeg::is_ffmpeg_on_path() {
            anyhow::bail!("ffmpeg not found on PATH (use --png-dir to write frames instead)");
        }
        let mut sink = scenegrid::FfmpegSink::new(scenegrid::FfmpegSinkOpts {
            bg_rgba: bg,
            ..scenegrid::FfmpegSinkOpts::new(&args.out)
        });
        session.render_all(&mut sink)?
    };

    eprintln!(
        "wrote {} ({} frames, {} rendered, {} elided)",
        args.out.display(),
        stats.frames_total,
        stats.frames_rendered,
        stats.frames_elided
    );
    Ok(())
}

fn sha256_file(path: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    let digest = sha2::Sha256::digest(&bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{b:02x}"));
    }
    Ok(out)
}
