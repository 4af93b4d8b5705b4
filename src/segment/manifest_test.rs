use super::*;
use tempfile::tempdir;

#[test]
fn test_save_load_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("MANIFEST");

    let mut manifest = Manifest::new();
    manifest.push(Entry { file_name: "chunk-0".into(), low: vec![1], high: vec![10], count: 5 });
    manifest.save(&path).unwrap();

    let loaded = Manifest::load(&path).unwrap();
    assert_eq!(loaded.entries.len(), 1);
    assert_eq!(loaded.entries[0].file_name, "chunk-0");
}

#[test]
fn test_candidates_newest_first() {
    let mut manifest = Manifest::new();
    manifest.push(Entry { file_name: "chunk-0".into(), low: vec![1], high: vec![10], count: 5 });
    manifest.push(Entry { file_name: "chunk-1".into(), low: vec![5], high: vec![20], count: 5 });

    let names: Vec<&str> = manifest.candidates(&[7]).map(|e| e.file_name.as_str()).collect();
    assert_eq!(names, vec!["chunk-1", "chunk-0"]);
}
