use super::*;
use crate::foundation::core::Fps;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::new(30, 1).unwrap(),
    }
}

#[test]
fn odd_dimensions_are_rejected_before_spawning() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(
        std::env::temp_dir().join("scenegrid_odd.mp4"),
    ));
    let err = sink.begin(cfg(31, 20)).unwrap_err();
    assert!(err.to_string().contains("must be even"));
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    };
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn default_opts_overwrite_onto_black() {
    let o = FfmpegSinkOpts::new("x.mp4");
    assert!(o.overwrite);
    assert_eq!(o.bg_rgba, [0, 0, 0, 255]);
    assert_eq!(o.out_path, PathBuf::from("x.mp4"));
}

#[test]
fn ensure_parent_dir_accepts_bare_file_names() {
    ensure_parent_dir(Path::new("bare.mp4")).unwrap();
}

#[test]
fn encoder_args_describe_raw_rgba_input_and_x264_output() {
    let mut opts = FfmpegSinkOpts::new("out.mp4");
    opts.crf = 23;
    opts.overwrite = false;
    let args = encoder_args(
        &opts,
        &SinkConfig {
            width: 640,
            height: 360,
            fps: Fps::new(30000, 1001).unwrap(),
        },
    );
    let after = |flag: &str| {
        args.iter()
            .position(|a| a == flag)
            .map(|i| args[i + 1].as_str())
    };
    assert_eq!(args[0], "-n");
    assert_eq!(after("-s"), Some("640x360"));
    assert_eq!(after("-r"), Some("30000/1001"));
    assert_eq!(after("-crf"), Some("23"));
    assert_eq!(after("-c:v"), Some("libx264"));
    assert_eq!(args.last().map(String::as_str), Some("+faststart"));
}
