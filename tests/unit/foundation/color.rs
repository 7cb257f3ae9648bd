use super::*;
use serde_json::json;

#[test]
fn parses_palette_names_case_insensitively() {
    let c: Color = serde_json::from_value(json!("red")).unwrap();
    assert_eq!(c, Color::RED);
    let c: Color = serde_json::from_value(json!("GRAY")).unwrap();
    assert_eq!(c, Color::GREY);
}

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: Color = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Color::rgba(1.0, 0.0, 0.0, 1.0));

    let c: Color = serde_json::from_value(json!("#0000ff80")).unwrap();
    assert!((c.b - 1.0).abs() < 1e-9);
    assert!((c.a - (128.0 / 255.0)).abs() < 1e-9);
}

#[test]
fn parses_rgba_object_and_array() {
    let c: Color = serde_json::from_value(json!({"r": 0.25, "g": 0.5, "b": 0.75})).unwrap();
    assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 1.0));

    let c: Color = serde_json::from_value(json!([0.25, 0.5, 0.75, 0.9])).unwrap();
    assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 0.9));
}

#[test]
fn rejects_unknown_names() {
    assert!(serde_json::from_value::<Color>(json!("chartreuse")).is_err());
    assert!(serde_json::from_value::<Color>(json!([1.0, 2.0])).is_err());
}

#[test]
fn serialized_form_deserializes_back() {
    let s = serde_json::to_string(&Color::YELLOW).unwrap();
    let c: Color = serde_json::from_str(&s).unwrap();
    assert_eq!(c, Color::YELLOW);
}

#[test]
fn hex_output_and_opacity() {
    assert_eq!(Color::RED.to_hex_rgb(), "#fc6255");
    assert_eq!(Color::WHITE.with_opacity(0.5).a, 0.5);
    assert_eq!(Color::BLACK.to_rgba8(), [0, 0, 0, 255]);
}
