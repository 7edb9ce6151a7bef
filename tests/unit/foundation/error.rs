use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ChartError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ChartError::font("x").to_string().contains("font error:"));
    assert!(ChartError::render("x").to_string().contains("render error:"));
    assert!(ChartError::encode("x").to_string().contains("encode error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ChartError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
