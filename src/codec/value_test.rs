use super::*;

#[test]
fn test_roundtrip_scalars() {
    let values = vec![
        Value::Null,
        Value::Boolean(true),
        Value::Integer(-7),
        Value::Float(3.5),
        Value::Long(-9_000_000_000),
        Value::Double(2.5),
        Value::Link(42),
        Value::Str("hello".to_string()),
        Value::Tag("World".to_string()),
        Value::Timestamp(1_690_000_000_000),
        Value::NegativeInfinity,
        Value::PositiveInfinity,
    ];
    for value in values {
        let bytes = value.to_bytes();
        let (decoded, n) = Value::decode(&bytes).expect("decode");
        assert_eq!(n, bytes.len());
        assert_eq!(decoded.type_tag(), value.type_tag());
    }
}

#[test]
fn test_weak_numeric_equality() {
    assert!(Value::Integer(5).eq_weak(&Value::Double(5.0)));
    assert!(Value::Long(5).eq_weak(&Value::Float(5.0)));
    assert!(Value::Boolean(true).eq_weak(&Value::Integer(1)));
    assert!(!Value::Integer(5).eq_weak(&Value::Integer(6)));
}

#[test]
fn test_case_insensitive_string_compare() {
    assert!(Value::Str("Hello".to_string()).eq_weak(&Value::Tag("hello".to_string())));
    assert_eq!(
        Value::Str("abc".to_string()).compare(&Value::Str("ABD".to_string())),
        Ordering::Less
    );
}

#[test]
fn test_infinities_dominate() {
    assert_eq!(Value::NegativeInfinity.compare(&Value::Integer(i32::MIN)), Ordering::Less);
    assert_eq!(Value::PositiveInfinity.compare(&Value::Integer(i32::MAX)), Ordering::Greater);
    assert_eq!(Value::NegativeInfinity.compare(&Value::NegativeInfinity), Ordering::Equal);
}

#[test]
fn test_large_long_precision() {
    let a = Value::Long(9_007_199_254_740_993);
    let b = Value::Long(9_007_199_254_740_992);
    assert_eq!(a.compare(&b), Ordering::Greater);
    assert_ne!(a, b);
}
