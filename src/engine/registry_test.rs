use super::*;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn test_get_or_create_then_get() {
    let dir = tempdir().unwrap();
    let registry = Registry::new(dir.path().to_path_buf());

    let a = registry.get_or_create("one").unwrap();
    let b = registry.get_or_create("one").unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    assert!(registry.get("one").is_ok());
    assert!(registry.get("missing").is_err());
}
