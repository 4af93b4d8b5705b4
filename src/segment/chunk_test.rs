use super::*;
use crate::{
    codec::{Text, Value},
    revision::Write as RWrite,
};
use tempfile::tempdir;

fn rev(record: i64, version: i64) -> Revision {
    Revision::new(RWrite::add(record, Text::new("name").unwrap(), Value::Integer(record as i32)), version)
}

fn key(r: &Revision) -> Vec<u8> {
    super::super::key::table_key(r.record())
}

#[test]
fn test_build_open_lookup() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chunk-0");
    let revisions = vec![rev(1, 10), rev(2, 11), rev(2, 12), rev(3, 13)];

    Chunk::build(&path, &revisions, key).unwrap();
    let chunk = Chunk::open(&path).unwrap();

    assert_eq!(chunk.count, 4);
    assert_eq!(chunk.lookup(&key(&rev(2, 0))).unwrap().len(), 2);
    assert_eq!(chunk.lookup(&key(&rev(5, 0))).unwrap().len(), 0);
    assert!(chunk.may_contain(&key(&rev(1, 0))));
    assert!(!chunk.may_contain(&key(&rev(99, 0))));
}

#[test]
fn test_scan_preserves_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chunk-0");
    let revisions = vec![rev(1, 10), rev(2, 11), rev(3, 12)];
    Chunk::build(&path, &revisions, key).unwrap();

    let chunk = Chunk::open(&path).unwrap();
    let scanned = chunk.scan().unwrap();
    assert_eq!(scanned.iter().map(|r| r.record()).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn test_range_and_prefix() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chunk-0");
    let revisions = vec![rev(1, 10), rev(2, 11), rev(3, 12), rev(4, 13)];
    Chunk::build(&path, &revisions, key).unwrap();

    let chunk = Chunk::open(&path).unwrap();
    let got = chunk.range(&key(&rev(2, 0)), &key(&rev(3, 0))).unwrap();
    assert_eq!(got.iter().map(|r| r.record()).collect::<Vec<_>>(), vec![2, 3]);
}
