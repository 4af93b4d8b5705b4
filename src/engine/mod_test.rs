use super::*;
use crate::{
    codec::{Text, Value},
    revision::Write as RWrite,
};
use tempfile::tempdir;

#[test]
fn test_append_and_flush_round_trip() {
    let dir = tempdir().unwrap();
    let engine = Engine::create("test", dir.path().to_path_buf()).unwrap();

    engine.append(&RWrite::add(1, Text::new("name").unwrap(), Value::Str("jeff".into())), 10).unwrap();
    assert!(engine.contains(1));

    engine.flush().unwrap();
    let current = engine.current(1).unwrap();
    assert_eq!(current.len(), 1);
    assert!(current[0].value().eq_weak(&Value::Str("jeff".into())));
}

#[test]
fn test_reload_restores_inventory() {
    let dir = tempdir().unwrap();
    {
        let engine = Engine::create("test", dir.path().to_path_buf()).unwrap();
        engine.append(&RWrite::add(1, Text::new("name").unwrap(), Value::Str("jeff".into())), 10).unwrap();
    }
    let engine = Engine::load("test", dir.path().to_path_buf()).unwrap();
    assert!(engine.contains(1));
}

#[test]
fn test_committed_transaction_leaves_no_backup_file() {
    let dir = tempdir().unwrap();
    let engine = Engine::create("test", dir.path().to_path_buf()).unwrap();

    let mut txn = engine.start_transaction();
    txn.add(RWrite::add(9, Text::new("name").unwrap(), Value::Str("jeff".into())));
    txn.commit().unwrap();

    assert!(!engine.txn_dir().exists() || std::fs::read_dir(engine.txn_dir()).unwrap().next().is_none());
}

#[test]
fn test_backed_up_transaction_is_replayed_after_crash() {
    let dir = tempdir().unwrap();
    {
        let engine = Engine::create("test", dir.path().to_path_buf()).unwrap();
        // Simulate a crash between the backup write and the buffer drain: back
        // up the writes but never call commit.
        let writes = vec![RWrite::add(3, Text::new("name").unwrap(), Value::Str("alice".into()))];
        engine.backup_transaction(77, &writes).unwrap();
    }

    let engine = Engine::load("test", dir.path().to_path_buf()).unwrap();
    assert!(engine.contains(3));
    assert!(!engine.txn_dir().exists() || std::fs::read_dir(engine.txn_dir()).unwrap().next().is_none());
}
