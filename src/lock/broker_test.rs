use super::*;
use crate::{
    codec::{Text, Value},
    operator::Operator,
};
use std::{sync::Arc, thread, time::Duration};

#[test]
fn test_disjoint_records_do_not_block() {
    let broker = Broker::new();
    let _a = broker.acquire_write(Token::record(1));
    let _b = broker.acquire_write(Token::record(2));
}

#[test]
fn test_write_excludes_concurrent_write() {
    let broker = Arc::new(Broker::new());
    let token = Token::field(1, Text::new("name").unwrap());
    let _held = broker.acquire_write(token.clone());

    let broker2 = broker.clone();
    let token2 = token.clone();
    let handle = thread::spawn(move || {
        let _w = broker2.acquire_write(token2);
    });

    thread::sleep(Duration::from_millis(20));
    assert!(!handle.is_finished());
    drop(_held);
    handle.join().unwrap();
}

#[test]
fn test_readers_do_not_exclude_each_other() {
    let broker = Broker::new();
    let token = Token::range(Text::new("age").unwrap(), Operator::Equals, vec![Value::Integer(1)]);
    let _a = broker.acquire_read(token.clone());
    let _b = broker.acquire_read(token);
}

#[test]
fn test_disjoint_ranges_do_not_block() {
    let broker = Broker::new();
    let key = Text::new("age").unwrap();
    let a = Token::range(key.clone(), Operator::Equals, vec![Value::Integer(1)]);
    let b = Token::range(key, Operator::Equals, vec![Value::Integer(2)]);
    let _a = broker.acquire_write(a);
    let _b = broker.acquire_write(b);
}

#[test]
fn test_overlapping_ranges_serialize() {
    let broker = Arc::new(Broker::new());
    let key = Text::new("age").unwrap();
    let a = Token::range(key.clone(), Operator::Between, vec![Value::Integer(0), Value::Integer(10)]);
    let b = Token::range(key, Operator::Equals, vec![Value::Integer(5)]);
    let held = broker.acquire_write(a);

    let broker2 = broker.clone();
    let handle = thread::spawn(move || {
        let _w = broker2.acquire_write(b);
    });

    thread::sleep(Duration::from_millis(20));
    assert!(!handle.is_finished());
    drop(held);
    handle.join().unwrap();
}

#[test]
fn test_try_write_lock_fails_when_held() {
    let broker = Broker::new();
    let token = Token::record(1);
    let _held = broker.acquire_write(token.clone());
    assert!(broker.try_write_lock(token).is_none());
}

#[test]
fn test_try_write_lock_succeeds_when_free() {
    let broker = Broker::new();
    assert!(broker.try_write_lock(Token::record(1)).is_some());
}
