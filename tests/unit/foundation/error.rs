use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ScenegridError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ScenegridError::layout("x")
            .to_string()
            .contains("layout error:")
    );
    assert!(
        ScenegridError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        ScenegridError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        ScenegridError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ScenegridError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_map_to_serde_variant() {
    let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = ScenegridError::from(bad);
    assert!(matches!(err, ScenegridError::Serde(_)));
}
