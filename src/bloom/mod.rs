//! Pluggable bloom-filter abstraction used by a `Chunk` for its negative-
//! lookup fast path: "key is definitely absent" without touching disk.

mod nobitmap;
mod xor8;

pub use nobitmap::NoBitmap;
pub use xor8::Xor8Bloom;

use std::hash::Hash;

use crate::Result;

/// A bitmap index that never has false negatives: `contains` may say yes
/// for an absent key but must never say no for a present one.
pub trait Bloom: Sized + Default {
    fn len(&self) -> usize;

    fn add_key<Q: ?Sized + Hash>(&mut self, key: &Q);

    fn build(&mut self) -> Result<()>;

    fn contains<Q: ?Sized + Hash>(&self, element: &Q) -> bool;

    fn to_bytes(&self) -> Result<Vec<u8>>;

    fn from_bytes(buf: &[u8]) -> Result<(Self, usize)>;
}
