//! End-to-end scenarios against a live `Engine`: write/read, value indexing,
//! historical reads, search adjacency, atomic conflict and crash recovery.

use std::sync::Arc;
use std::thread;

use epochdb::codec::{Text, Value};
use epochdb::engine::{AtomicOperation, Engine};
use epochdb::evaluator::{self, Combinator, Conjunction, Expression, Key};
use epochdb::operator::Operator;
use epochdb::revision::Write;

fn field(s: &str) -> Text {
    Text::new(s).unwrap()
}

#[test]
fn scenario_write_read() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::create("env", dir.path().to_path_buf()).unwrap();

    engine.append(&Write::add(1, field("name"), Value::Str("alice".into())), 1).unwrap();
    let current = engine.current(1).unwrap();
    assert_eq!(current.len(), 1);
    assert!(current[0].value().eq_weak(&Value::Str("alice".into())));
}

#[test]
fn scenario_value_indexing() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::create("env", dir.path().to_path_buf()).unwrap();

    engine.append(&Write::add(1, field("age"), Value::Integer(30)), 1).unwrap();
    engine.append(&Write::add(2, field("age"), Value::Integer(30)), 2).unwrap();
    engine.append(&Write::add(3, field("age"), Value::Integer(40)), 3).unwrap();
    engine.flush().unwrap();

    let universe = [1, 2, 3];

    let eq = Conjunction::Leaf(Expression::new(
        Key::Field(field("age")),
        Operator::Equals,
        vec![Value::Integer(30)],
    ));
    let matched = evaluator::evaluate(&engine, &eq, &universe, i64::MAX).unwrap();
    assert_eq!(matched, [1, 2].into_iter().collect());

    let between = Conjunction::Leaf(Expression::new(
        Key::Field(field("age")),
        Operator::Between,
        vec![Value::Integer(25), Value::Integer(35)],
    ));
    let matched = evaluator::evaluate(&engine, &between, &universe, i64::MAX).unwrap();
    assert_eq!(matched, [1, 2].into_iter().collect());
}

#[test]
fn scenario_historical_reads() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::create("env", dir.path().to_path_buf()).unwrap();

    let added = engine.append(&Write::add(7, field("x"), Value::Str("a".into())), 100).unwrap();
    let removed = engine.append(&Write::remove(7, field("x"), Value::Str("a".into())), 200).unwrap();

    assert!(added.is_visible_at(100));
    assert!(!removed.is_visible_at(100));
    assert!(removed.is_visible_at(200));
}

#[test]
fn scenario_search_adjacency() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::create("env", dir.path().to_path_buf()).unwrap();

    engine.append(&Write::add(5, field("bio"), Value::Str("the quick brown fox".into())), 1).unwrap();
    engine.append(&Write::add(6, field("bio"), Value::Str("a slow red fox".into())), 2).unwrap();
    engine.flush().unwrap();

    // "quick brown" occurs in order in record 5's bio, so it hits.
    let hits = engine.search(&field("bio"), "quick brown").unwrap();
    assert_eq!(hits, vec![5]);

    // the words occur, but in the wrong order: no match.
    let hits = engine.search(&field("bio"), "fox quick").unwrap();
    assert!(hits.is_empty());

    // neither word occurs anywhere in record 6's bio.
    let hits = engine.search(&field("bio"), "quick brown").unwrap();
    assert!(!hits.contains(&6));
}

#[test]
fn scenario_atomic_conflict() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Arc::new(Engine::create("env", dir.path().to_path_buf()).unwrap());
    engine.append(&Write::add(42, field("n"), Value::Integer(0)), 1).unwrap();

    let barrier = Arc::new(std::sync::Barrier::new(2));
    let mut handles = Vec::new();
    for n in [1, 2] {
        let engine = engine.clone();
        let barrier = barrier.clone();
        handles.push(thread::spawn(move || {
            barrier.wait();
            let mut op = AtomicOperation::new(&engine);
            op.stage(Write::compare(42, field("n"), Value::Integer(0)));
            op.stage(Write::add(42, field("n"), Value::Integer(n)));
            op.commit()
        }));
    }

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let ok_count = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(ok_count, 1, "exactly one atomic operation should observe the initial value");
}

#[test]
fn scenario_segment_recovery() {
    let dir = tempfile::tempdir().unwrap();
    {
        let engine = Engine::create("env", dir.path().to_path_buf()).unwrap();
        for record in 0..500 {
            engine.append(&Write::add(record, field("k"), Value::Integer(record as i32)), record).unwrap();
        }
        engine.flush().unwrap();
        for record in 500..1000 {
            engine.append(&Write::add(record, field("k"), Value::Integer(record as i32)), record).unwrap();
        }
        // dropped without a second flush: the last 500 writes live only in the buffer.
    }

    let engine = Engine::load("env", dir.path().to_path_buf()).unwrap();
    assert_eq!(engine.record_count(), 1000);
    assert!(engine.contains(0));
    assert!(engine.contains(999));

    let universe: Vec<i64> = (0..1000).collect();
    let eq = Conjunction::Leaf(Expression::new(
        Key::Field(field("k")),
        Operator::Equals,
        vec![Value::Integer(777)],
    ));
    let matched = evaluator::evaluate(&engine, &eq, &universe, i64::MAX).unwrap();
    assert_eq!(matched, [777].into_iter().collect());
}

#[test]
fn scenario_and_or_combinators() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::create("env", dir.path().to_path_buf()).unwrap();

    engine.append(&Write::add(1, field("name"), Value::Str("alice".into())), 1).unwrap();
    engine.append(&Write::add(1, field("age"), Value::Integer(30)), 2).unwrap();
    engine.append(&Write::add(2, field("name"), Value::Str("bob".into())), 3).unwrap();
    engine.append(&Write::add(2, field("age"), Value::Integer(40)), 4).unwrap();
    engine.flush().unwrap();

    let universe = [1, 2];
    let name_alice = Conjunction::Leaf(Expression::new(Key::Field(field("name")), Operator::Equals, vec![Value::Str("alice".into())]));
    let age_40 = Conjunction::Leaf(Expression::new(Key::Field(field("age")), Operator::Equals, vec![Value::Integer(40)]));
    let either = Conjunction::Node(Combinator::Or, vec![name_alice, age_40]);

    let matched = evaluator::evaluate(&engine, &either, &universe, i64::MAX).unwrap();
    assert_eq!(matched, [1, 2].into_iter().collect());
}
