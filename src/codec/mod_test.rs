use super::*;

#[test]
fn test_reexports() {
    let v = Value::Integer(1);
    assert_eq!(v.type_tag(), 2);
    let t = Text::new("field").unwrap();
    assert_eq!(t.as_str(), "field");
    let p = Position::new(1, 0).unwrap();
    assert_eq!(p.record(), 1);
}
