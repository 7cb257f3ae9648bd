use super::*;

fn frame(w: u32, h: u32, px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: px.repeat((w * h) as usize),
        premultiplied: true,
    }
}

fn cfg(w: u32, h: u32) -> SinkConfig {
    SinkConfig {
        width: w,
        height: h,
        fps: Fps::default(),
    }
}

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_premul_alpha_255_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn unpremultiply_restores_straight_color() {
    assert_eq!(unpremultiply(&[64, 0, 32, 128]), vec![128, 0, 64, 128]);
    assert_eq!(unpremultiply(&[0, 0, 0, 0]), vec![0, 0, 0, 0]);
}

#[test]
fn in_memory_sink_rejects_out_of_order_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(2, 2)).unwrap();
    sink.push_frame(FrameIndex(0), &frame(2, 2, [0, 0, 0, 255]))
        .unwrap();
    sink.push_frame(FrameIndex(3), &frame(2, 2, [0, 0, 0, 255]))
        .unwrap();
    assert!(
        sink.push_frame(FrameIndex(3), &frame(2, 2, [0, 0, 0, 255]))
            .is_err()
    );
    sink.end().unwrap();
    assert!(sink.is_finished());
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.config(), Some(cfg(2, 2)));
}

#[test]
fn png_sequence_writes_numbered_files() {
    let dir = std::env::temp_dir().join(format!("scenegrid_png_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(cfg(4, 2)).unwrap();
    sink.push_frame(FrameIndex(0), &frame(4, 2, [255, 0, 0, 255]))
        .unwrap();
    sink.push_frame(FrameIndex(1), &frame(4, 2, [0, 0, 128, 128]))
        .unwrap();
    sink.end().unwrap();

    assert_eq!(
        sink.written(),
        &[dir.join("frame_00000.png"), dir.join("frame_00001.png")]
    );
    let img = image::open(dir.join("frame_00001.png")).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (4, 2));
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 255, 128]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn png_sequence_rejects_mismatched_frames() {
    let dir = std::env::temp_dir().join(format!("scenegrid_png_bad_{}", std::process::id()));
    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(cfg(4, 2)).unwrap();
    let err = sink
        .push_frame(FrameIndex(0), &frame(2, 2, [0, 0, 0, 255]))
        .unwrap_err();
    assert!(err.to_string().contains("frame size mismatch"));
    let _ = std::fs::remove_dir_all(&dir);
}
