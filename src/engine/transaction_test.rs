use super::*;
use crate::codec::{Text, Value};
use tempfile::tempdir;

#[test]
fn test_transaction_commit() {
    let dir = tempdir().unwrap();
    let engine = Engine::create("test", dir.path().to_path_buf()).unwrap();

    let mut txn = Transaction::new(&engine);
    txn.add(Write::add(1, Text::new("name").unwrap(), Value::Str("jeff".into())));
    txn.add(Write::add(2, Text::new("name").unwrap(), Value::Str("alice".into())));
    let committed = txn.commit().unwrap();
    assert_eq!(committed.len(), 2);
}

#[test]
fn test_transaction_abort_applies_nothing() {
    let dir = tempdir().unwrap();
    let engine = Engine::create("test", dir.path().to_path_buf()).unwrap();

    let mut txn = Transaction::new(&engine);
    txn.add(Write::add(1, Text::new("name").unwrap(), Value::Str("jeff".into())));
    txn.abort();

    assert!(!engine.contains(1));
}
