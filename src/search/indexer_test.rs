use super::*;
use crate::{
    codec::{Text, Value},
    revision::Write as RWrite,
};
use std::{thread, time::Duration};

#[test]
fn test_indexes_string_value() {
    let indexer = Indexer::new(2);
    let rev = Revision::new(RWrite::add(1, Text::new("bio").unwrap(), Value::Str("hello world".into())), 1);
    indexer.submit(rev);

    thread::sleep(Duration::from_millis(100));
    let postings = indexer.drain();
    assert!(!postings.is_empty());
    assert!(postings.iter().all(|r| r.record() == 1));
    indexer.close();
}

#[test]
fn test_postings_preserve_originating_field() {
    let indexer = Indexer::new(1);
    let rev = Revision::new(RWrite::add(1, Text::new("bio").unwrap(), Value::Str("hello world".into())), 1);
    indexer.submit(rev);

    thread::sleep(Duration::from_millis(100));
    let postings = indexer.drain();
    assert!(!postings.is_empty());
    for posting in &postings {
        let (field, _) = decode_posting(posting.value()).unwrap();
        assert_eq!(field, "bio");
    }
    indexer.close();
}

#[test]
fn test_non_string_value_produces_no_postings() {
    let indexer = Indexer::new(1);
    let rev = Revision::new(RWrite::add(1, Text::new("age").unwrap(), Value::Integer(30)), 1);
    indexer.submit(rev);

    thread::sleep(Duration::from_millis(50));
    assert!(indexer.drain().is_empty());
    indexer.close();
}
