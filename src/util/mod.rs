//! Common utility functions and types shared across the storage engine.

use std::{
    borrow::Borrow,
    ops::{Bound, RangeBounds},
};

pub mod files;
pub mod spinlock;
pub mod thread;

pub use files::{create_file_a, load_toml, open_file_a, open_file_r, sync_write};
pub use spinlock::Spinlock;
pub use thread::{Pool, Thread};

/// Bail out with `Corruption` unless at least `want` bytes remain in `buf`.
#[macro_export]
macro_rules! check_remaining {
    ($buf:expr, $want:expr, $msg:expr) => {
        if $buf.len() < $want {
            err_at!(
                Corruption, msg: "insufficient input {}/{} ({})", $msg, $buf.len(), $want
            )
        } else {
            Ok(())
        }
    };
}

/// Read exactly `n` bytes from `fd` at `seek`, erroring on a short read.
#[macro_export]
macro_rules! read_file {
    ($fd:expr, $seek:expr, $n:expr, $msg:expr) => {{
        use std::convert::TryFrom;

        match $fd.seek($seek) {
            Ok(_) => {
                let mut buf = vec![0; usize::try_from($n).unwrap()];
                match $fd.read(&mut buf) {
                    Ok(n) if buf.len() == n => Ok(buf),
                    Ok(n) => {
                        let m = buf.len();
                        err_at!(Corruption, msg: concat!($msg, " {}/{} at {:?}"), m, n, $seek)
                    }
                    Err(err) => err_at!(IOError, Err(err)),
                }
            }
            Err(err) => err_at!(IOError, Err(err)),
        }
    }};
}

/// Write the entire buffer to `fd`, erroring on a short write.
#[macro_export]
macro_rules! write_file {
    ($fd:expr, $buffer:expr, $file:expr, $msg:expr) => {{
        use std::io::Write;

        match err_at!(IOError, $fd.write($buffer))? {
            n if $buffer.len() == n => Ok(n),
            n => err_at!(
                Fatal, msg: "partial-wr {}, {:?}, {}/{}", $msg, $file, $buffer.len(), n
            ),
        }
    }};
}

/// Clone a `RangeBounds` into a concrete owned `(Bound, Bound)` pair.
pub fn to_start_end<G, K>(within: G) -> (Bound<K>, Bound<K>)
where
    K: Clone,
    G: RangeBounds<K>,
{
    let start = match within.start_bound() {
        Bound::Included(val) => Bound::Included(val.clone()),
        Bound::Excluded(val) => Bound::Excluded(val.clone()),
        Bound::Unbounded => Bound::Unbounded,
    };
    let end = match within.end_bound() {
        Bound::Included(val) => Bound::Included(val.clone()),
        Bound::Excluded(val) => Bound::Excluded(val.clone()),
        Bound::Unbounded => Bound::Unbounded,
    };
    (start, end)
}

/// Partition `array` into buckets according to which `ranges` entry each
/// item's borrowed key falls within. Used to fan the lock broker's range
/// tokens, and the inventory's partitioned bitmaps, across shards.
pub fn as_part_array<T, K, N>(array: &[T], ranges: &[N]) -> Vec<Vec<T>>
where
    T: Clone + Borrow<K>,
    K: Clone + PartialOrd,
    N: Clone + RangeBounds<K>,
{
    let mut partitions: Vec<Vec<T>> = vec![vec![]; ranges.len()];
    for item in array.iter() {
        for (i, r) in ranges.iter().enumerate() {
            if r.contains(item.borrow()) {
                partitions[i].push(item.clone());
                break;
            }
        }
    }
    partitions
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
