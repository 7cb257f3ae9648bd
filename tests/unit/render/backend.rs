use super::*;
use crate::{
    eval::display::{Primitive, Role, Shape},
    foundation::color::Color,
    foundation::core::{Canvas, Point},
};

#[test]
fn svg_backend_renders_background_and_shapes() {
    let backend = create_backend(&RenderSettings {
        system_fonts: false,
        font_dir: None,
    })
    .unwrap();
    let mut list = DisplayList::new(
        Canvas {
            width: 40,
            height: 20,
        },
        Color::BLACK,
    );
    list.items.push(Primitive::new(
        "box",
        Role::ArrowTip,
        Shape::Fill {
            points: vec![
                Point::new(20.0, 0.0),
                Point::new(40.0, 0.0),
                Point::new(40.0, 20.0),
                Point::new(20.0, 20.0),
            ],
        },
        Color::WHITE,
    ));
    let frame = backend.render(&list).unwrap();
    assert_eq!((frame.width, frame.height), (40, 20));
    assert_eq!(frame.data.len(), 40 * 20 * 4);
    assert_eq!(frame.pixel(5, 10), Some([0, 0, 0, 255]));
    assert_eq!(frame.pixel(35, 10), Some([255, 255, 255, 255]));
}

#[test]
fn default_settings_load_system_fonts() {
    let s = RenderSettings::default();
    assert!(s.system_fonts);
    assert!(s.font_dir.is_none());
}
