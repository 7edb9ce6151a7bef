use super::*;

#[test]
fn empty_backend_reports_nothing() {
    let backend = FontdbBackend::new();
    assert!(backend.family_names().is_empty());
    assert!(
        backend
            .resolve_face(&FaceRequest {
                family: None,
                weight: 400,
            })
            .is_none()
    );
    let err = backend.measure_text("BTC", None, 12.0, 400).unwrap_err();
    assert!(err.to_string().starts_with("font error:"));
}

#[test]
fn garbage_bytes_are_rejected() {
    let backend = FontdbBackend::new();
    let err = backend
        .register_font_bytes(b"definitely not a font".to_vec())
        .unwrap_err();
    assert!(err.to_string().contains("no usable font faces"));
    assert!(backend.family_names().is_empty());
}

#[test]
fn missing_file_is_a_font_error() {
    let backend = FontdbBackend::new();
    let dir = tempfile::tempdir().unwrap();
    let err = backend
        .register_font_file(&dir.path().join("missing.ttf"))
        .unwrap_err();
    assert!(err.to_string().starts_with("font error:"));
}

#[test]
fn garbage_file_registers_no_faces() {
    let backend = FontdbBackend::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("junk.ttf");
    std::fs::write(&path, [0u8; 64]).unwrap();
    assert!(backend.register_font_file(&path).is_err());
    assert!(backend.family_names().is_empty());
}
