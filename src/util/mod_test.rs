use super::*;
use std::ops::Bound;

#[test]
fn test_as_part_array() {
    let array: Vec<i32> = (0..20).collect();
    let ranges = vec![(Bound::Unbounded, Bound::Excluded(10)), (Bound::Included(10), Bound::Unbounded)];
    let parts = as_part_array(&array, &ranges);
    assert_eq!(parts[0], (0..10).collect::<Vec<i32>>());
    assert_eq!(parts[1], (10..20).collect::<Vec<i32>>());
}

#[test]
fn test_to_start_end() {
    let (s, e) = to_start_end(5..10);
    assert_eq!(s, Bound::Included(5));
    assert_eq!(e, Bound::Excluded(10));
}
