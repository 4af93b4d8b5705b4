use super::*;
use tempfile::tempdir;

#[test]
fn test_load_missing_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("epochdb.toml");
    let config = Config::load(&path).unwrap();
    assert_eq!(config.journal_limit, buffer::JOURNAL_LIMIT);
    assert!(config.fsync);
}

#[test]
fn test_save_load_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("epochdb.toml");
    let config = Config::new("payments", dir.path().to_path_buf()).set_journal_limit(1024);
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.name, "payments");
    assert_eq!(loaded.journal_limit, 1024);
}
