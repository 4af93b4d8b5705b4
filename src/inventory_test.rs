use super::*;

#[test]
fn test_add_contains_remove() {
    let inv = Inventory::new();
    inv.add(5);
    inv.add(1 << 21);
    assert!(inv.contains(5));
    assert!(inv.contains(1 << 21));
    assert!(!inv.contains(6));
    assert_eq!(inv.len(), 2);

    inv.remove(5);
    assert!(!inv.contains(5));
    assert_eq!(inv.len(), 1);
}

#[test]
fn test_iter_is_sorted() {
    let inv = Inventory::new();
    for id in [100, 3, 1 << 21, 2] {
        inv.add(id);
    }
    assert_eq!(inv.iter(), vec![2, 3, 100, 1 << 21]);
}
