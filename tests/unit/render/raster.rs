use super::*;

#[test]
fn background_fills_every_pixel() {
    let canvas = Canvas {
        width: 16,
        height: 8,
    };
    let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="8" viewBox="0 0 16 8"><rect x="0" y="0" width="16" height="8" fill="#ff0000" fill-opacity="1"/></svg>"##;
    let frame = rasterize(svg, canvas, &FontSet::empty()).unwrap();
    assert_eq!(frame.data.len(), 16 * 8 * 4);
    assert!(frame.premultiplied);
    assert_eq!(frame.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(15, 7), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(16, 0), None);
}

#[test]
fn malformed_svg_is_a_render_error() {
    let err = rasterize(
        "<svg",
        Canvas {
            width: 4,
            height: 4,
        },
        &FontSet::empty(),
    )
    .unwrap_err();
    assert!(err.to_string().starts_with("render error:"));
}

#[test]
fn missing_font_dir_is_ignored() {
    let fonts = FontSet::new(false, Some(Path::new("/definitely/not/here")));
    assert_eq!(fonts.face_count(), 0);
}
