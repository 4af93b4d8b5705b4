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
    super::key::table_key(r.record())
}

#[test]
fn test_flush_and_lookup_across_chunks() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path().to_path_buf()).unwrap();

    store.flush(&[rev(1, 1), rev(2, 2)], key).unwrap();
    store.flush(&[rev(2, 3), rev(3, 4)], key).unwrap();

    assert_eq!(store.chunk_count(), 2);
    let found = store.lookup(&key(&rev(2, 0))).unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].version, 3); // newest chunk first.
}

#[test]
fn test_reopen_restores_manifest() {
    let dir = tempdir().unwrap();
    {
        let store = Store::open(dir.path().to_path_buf()).unwrap();
        store.flush(&[rev(1, 1)], key).unwrap();
    }
    let store = Store::open(dir.path().to_path_buf()).unwrap();
    assert_eq!(store.chunk_count(), 1);
    assert_eq!(store.lookup(&key(&rev(1, 0))).unwrap().len(), 1);
}
