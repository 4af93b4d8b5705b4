use super::*;
use crate::codec::{Text, Value};

#[test]
fn test_table_key_preserves_numeric_order() {
    let mut records = vec![-5i64, 3, 0, i64::MIN, i64::MAX, -1];
    let mut keys: Vec<(i64, Vec<u8>)> = records.iter().map(|&r| (r, table_key(r))).collect();
    keys.sort_by(|a, b| a.1.cmp(&b.1));
    records.sort();
    let sorted: Vec<i64> = keys.into_iter().map(|(r, _)| r).collect();
    assert_eq!(sorted, records);
}

#[test]
fn test_index_key_shares_field_prefix() {
    let age = Text::new("age").unwrap();
    let name = Text::new("name").unwrap();
    let a = index_key(&age, &Value::Integer(1));
    let b = index_key(&age, &Value::Integer(2));
    let c = index_key(&name, &Value::Integer(1));
    assert!(a.starts_with(&index_prefix(&age)));
    assert!(b.starts_with(&index_prefix(&age)));
    assert!(!c.starts_with(&index_prefix(&age)));
}

#[test]
fn test_corpus_key_lowercases() {
    assert_eq!(corpus_key("Fox"), corpus_key("fox"));
}
