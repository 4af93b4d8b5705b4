use super::*;
use crate::codec::{Text, Value};
use tempfile::tempdir;

#[test]
fn test_commit_applies_all_writes() {
    let dir = tempdir().unwrap();
    let engine = Engine::create("test", dir.path().to_path_buf()).unwrap();

    let mut op = AtomicOperation::new(&engine);
    op.stage(Write::add(1, Text::new("name").unwrap(), Value::Str("jeff".into())));
    op.stage(Write::add(1, Text::new("age").unwrap(), Value::Integer(30)));
    let committed = op.commit().unwrap();
    assert_eq!(committed.len(), 2);
}

#[test]
fn test_failed_compare_aborts_everything() {
    let dir = tempdir().unwrap();
    let engine = Engine::create("test", dir.path().to_path_buf()).unwrap();
    engine.append(&Write::add(1, Text::new("name").unwrap(), Value::Str("jeff".into())), 1).unwrap();

    let mut op = AtomicOperation::new(&engine);
    op.stage(Write::compare(1, Text::new("name").unwrap(), Value::Str("not-jeff".into())));
    op.stage(Write::add(1, Text::new("age").unwrap(), Value::Integer(30)));
    assert!(op.commit().is_err());

    assert!(engine.current(1).unwrap().iter().all(|r| r.key().as_str() != "age"));
}
