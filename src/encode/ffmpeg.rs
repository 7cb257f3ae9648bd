use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::{
    encode::sink::{FrameSink, SinkConfig, flatten_premul_over_bg},
    foundation::core::FrameIndex,
    foundation::error::{ScenegridError, ScenegridResult},
    render::backend::FrameRGBA,
};

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    pub out_path: PathBuf,
    /// Replace an existing file at `out_path`.
    pub overwrite: bool,
    /// Opaque color that transparent pixels are flattened onto.
    pub bg_rgba: [u8; 4],
    /// x264 constant rate factor.
    pub crf: u8,
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
            crf: 18,
        }
    }
}

/// Streams flattened RGBA frames into a system `ffmpeg` that encodes H.264 MP4.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<Encoder>,
    scratch: Vec<u8>,
    next_min: u64,
}

/// A running `ffmpeg` child and the thread collecting its stderr.
struct Encoder {
    cfg: SinkConfig,
    child: Child,
    stdin: ChildStdin,
    stderr: JoinHandle<std::io::Result<Vec<u8>>>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            scratch: Vec::new(),
            next_min: 0,
        }
    }

    fn spawn(&self, cfg: SinkConfig) -> ScenegridResult<Encoder> {
        let mut child = Command::new("ffmpeg")
            .args(encoder_args(&self.opts, &cfg))
            .arg(&self.opts.out_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ScenegridError::render(format!("cannot start ffmpeg: {e}")))?;
        let (Some(stdin), Some(mut stderr)) = (child.stdin.take(), child.stderr.take()) else {
            return Err(ScenegridError::render("ffmpeg pipes are unavailable"));
        };
        let stderr = std::thread::spawn(move || {
            let mut buf = Vec::new();
            stderr.read_to_end(&mut buf)?;
            Ok(buf)
        });
        Ok(Encoder {
            cfg,
            child,
            stdin,
            stderr,
        })
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ScenegridResult<()> {
        check_config(&cfg)?;
        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(ScenegridError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(ScenegridError::render("ffmpeg was not found on PATH"));
        }

        tracing::debug!(out = %self.opts.out_path.display(), "spawning ffmpeg");
        self.scratch = vec![0u8; cfg.width as usize * cfg.height as usize * 4];
        self.encoder = Some(self.spawn(cfg)?);
        self.next_min = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ScenegridResult<()> {
        let Some(enc) = self.encoder.as_mut() else {
            return Err(ScenegridError::render("ffmpeg sink is not running"));
        };
        if idx.0 < self.next_min {
            return Err(ScenegridError::render(format!(
                "frame {} arrived out of order",
                idx.0
            )));
        }
        if (frame.width, frame.height) != (enc.cfg.width, enc.cfg.height) {
            return Err(ScenegridError::validation(format!(
                "frame is {}x{}, sink expects {}x{}",
                frame.width, frame.height, enc.cfg.width, enc.cfg.height
            )));
        }

        flatten_premul_over_bg(&mut self.scratch, &frame.data, self.opts.bg_rgba)?;
        enc.stdin
            .write_all(&self.scratch)
            .map_err(|e| ScenegridError::render(format!("ffmpeg stopped reading frames: {e}")))?;
        self.next_min = idx.0.saturating_add(1);
        Ok(())
    }

    fn end(&mut self) -> ScenegridResult<()> {
        let Some(Encoder {
            mut child,
            stdin,
            stderr,
            ..
        }) = self.encoder.take()
        else {
            return Err(ScenegridError::render("ffmpeg sink is not running"));
        };
        drop(stdin);

        let status = child.wait();
        let log = stderr
            .join()
            .ok()
            .and_then(Result::ok)
            .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_owned())
            .unwrap_or_default();
        match status {
            Ok(s) if s.success() => Ok(()),
            Ok(s) => Err(ScenegridError::render(format!("ffmpeg exited with {s}: {log}"))),
            Err(e) => Err(ScenegridError::render(format!("waiting for ffmpeg: {e}"))),
        }
    }
}

fn check_config(cfg: &SinkConfig) -> ScenegridResult<()> {
    if cfg.fps.num == 0 || cfg.fps.den == 0 {
        return Err(ScenegridError::validation("fps must be non-zero"));
    }
    if cfg.width == 0 || cfg.height == 0 {
        return Err(ScenegridError::validation(
            "ffmpeg sink width/height must be non-zero",
        ));
    }
    // yuv420p subsamples chroma 2x2.
    if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
        return Err(ScenegridError::validation(format!(
            "ffmpeg sink width/height must be even, got {}x{}",
            cfg.width, cfg.height
        )));
    }
    Ok(())
}

/// Command line for raw RGBA on stdin to H.264 MP4, without the output path.
fn encoder_args(opts: &FfmpegSinkOpts, cfg: &SinkConfig) -> Vec<String> {
    let overwrite = if opts.overwrite { "-y" } else { "-n" };
    [
        overwrite,
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "-s",
        &format!("{}x{}", cfg.width, cfg.height),
        "-r",
        &format!("{}/{}", cfg.fps.num, cfg.fps.den),
        "-i",
        "pipe:0",
        "-an",
        "-c:v",
        "libx264",
        "-crf",
        &opts.crf.to_string(),
        "-pix_fmt",
        "yuv420p",
        "-movflags",
        "+faststart",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent_dir(path: &Path) -> ScenegridResult<()> {
    use anyhow::Context as _;
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating '{}'", parent.display()))?;
            Ok(())
        }
        _ => Ok(()),
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
