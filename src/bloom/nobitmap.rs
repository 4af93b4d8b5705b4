//! Dummy bitmap used when a chunk is small enough that a bloom filter
//! would cost more to build and load than the lookups it saves.

use std::hash::Hash;

use crate::Result;

#[derive(Default)]
pub struct NoBitmap;

impl super::Bloom for NoBitmap {
    fn len(&self) -> usize {
        0
    }

    fn add_key<Q: ?Sized + Hash>(&mut self, _key: &Q) {}

    fn build(&mut self) -> Result<()> {
        Ok(())
    }

    fn contains<Q: ?Sized + Hash>(&self, _element: &Q) -> bool {
        true // false positives are okay, false negatives are not.
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn from_bytes(_buf: &[u8]) -> Result<(NoBitmap, usize)> {
        Ok((NoBitmap, 0))
    }
}
