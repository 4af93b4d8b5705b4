use super::*;
use crate::buffer::Config;
use tempfile::tempdir;

#[test]
fn test_append_and_iter() {
    let dir = tempdir().unwrap();
    let config = Config::new("test", dir.path().as_os_str().to_owned());
    let buffer = Buffer::create(config).unwrap();

    let a = buffer.append(b"one").unwrap();
    let b = buffer.append(b"two").unwrap();
    assert!(b > a);

    let records = buffer.iter().unwrap();
    assert_eq!(records, vec![(a, b"one".to_vec()), (b, b"two".to_vec())]);
}

#[test]
fn test_seqno_monotonic_across_clones() {
    let dir = tempdir().unwrap();
    let config = Config::new("test", dir.path().as_os_str().to_owned());
    let buffer = Buffer::create(config).unwrap();
    let clone = buffer.clone();

    let a = buffer.append(b"one").unwrap();
    let b = clone.append(b"two").unwrap();
    assert!(b > a);
}
