//! Segment store: the immutable, on-disk half of the hybrid store. Buffer
//! contents are periodically folded into a new `Chunk`; a `Manifest` tracks
//! every chunk that makes up one shape's (Table/Index/Corpus) store.

mod chunk;
pub mod key;
mod manifest;
mod store;

pub use chunk::Chunk;
pub use manifest::{Entry, Manifest};
pub use store::Store;
