use super::*;

#[test]
fn test_ordering() {
    let a = Position::new(1, 0).unwrap();
    let b = Position::new(1, 1).unwrap();
    let c = Position::new(2, 0).unwrap();
    assert!(a < b);
    assert!(b < c);
}

#[test]
fn test_negative_index_rejected() {
    assert!(Position::new(1, -1).is_err());
}
