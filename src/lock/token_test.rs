use super::*;
use crate::codec::Text;

fn key() -> Text {
    Text::new("age").unwrap()
}

#[test]
fn test_equals_tokens_overlap_only_at_same_point() {
    let a = Token::range(key(), Operator::Equals, vec![Value::Integer(30)]);
    let b = Token::range(key(), Operator::Equals, vec![Value::Integer(30)]);
    let c = Token::range(key(), Operator::Equals, vec![Value::Integer(31)]);
    assert!(a.overlaps_range(&b));
    assert!(!a.overlaps_range(&c));
}

#[test]
fn test_between_tokens_overlap_on_shared_interval() {
    let a = Token::range(key(), Operator::Between, vec![Value::Integer(0), Value::Integer(10)]);
    let b = Token::range(key(), Operator::Between, vec![Value::Integer(5), Value::Integer(15)]);
    let c = Token::range(key(), Operator::Between, vec![Value::Integer(20), Value::Integer(30)]);
    assert!(a.overlaps_range(&b));
    assert!(!a.overlaps_range(&c));
}

#[test]
fn test_regex_token_is_unbounded() {
    let regex = Token::range(key(), Operator::Regex, vec![Value::Str("^a".into())]);
    let point = Token::range(key(), Operator::Equals, vec![Value::Integer(999)]);
    assert!(regex.overlaps_range(&point));
}

#[test]
fn test_different_keys_never_overlap() {
    let a = Token::range(key(), Operator::Equals, vec![Value::Integer(1)]);
    let b = Token::range(Text::new("name").unwrap(), Operator::Equals, vec![Value::Integer(1)]);
    assert!(!a.overlaps_range(&b));
}
