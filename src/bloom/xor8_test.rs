use super::*;
use crate::bloom::Bloom;

#[test]
fn test_build_and_contains() {
    let mut bloom = Xor8Bloom::default();
    for k in 0u64..100 {
        bloom.add_key(&k);
    }
    bloom.build().unwrap();

    for k in 0u64..100 {
        assert!(bloom.contains(&k));
    }
}

#[test]
fn test_to_bytes_from_bytes_roundtrip() {
    let mut bloom = Xor8Bloom::default();
    for k in 0u64..50 {
        bloom.add_key(&k);
    }
    bloom.build().unwrap();

    let bytes = bloom.to_bytes().unwrap();
    let (restored, used) = Xor8Bloom::from_bytes(&bytes).unwrap();
    assert_eq!(used, bytes.len());
    for k in 0u64..50 {
        assert!(restored.contains(&k));
    }
}

#[test]
fn test_unbuilt_contains_is_permissive() {
    let bloom = Xor8Bloom::default();
    assert!(bloom.contains(&42u64));
}
