//! Composite byte sort-keys used by `Chunk`/`Store`, one per revision shape.
//!
//! A `Chunk`'s on-disk index is a sorted `Vec<(Vec<u8>, offset)>`; which
//! bytes it sorts by is what turns the same physical chunk format into a
//! Table lookup-by-record, an Index lookup-by-value, or a Corpus
//! lookup-by-token. Byte-lexicographic order is all a `Chunk` ever assumes,
//! so any shape that needs range scans (Index's `BETWEEN`) must produce keys
//! whose byte order agrees with the value order it wants to scan in.

use crate::codec::{value::PrimaryKey, Text, Value};

/// Table shape: sorted by record id. Flips the sign bit so two's-complement
/// byte order agrees with numeric order, including negative record ids.
pub fn table_key(record: PrimaryKey) -> Vec<u8> {
    sortable_i64(record).to_vec()
}

/// Index shape: sorted by `(field, value)`. Exact-match only (used for
/// `EQUALS`/`IN`-style lookups); see `index_prefix` for field-scoped scans.
pub fn index_key(key: &Text, value: &Value) -> Vec<u8> {
    let mut out = index_prefix(key);
    out.extend(value.canonical_bytes());
    out
}

/// Every key sharing `field`'s index entries starts with this prefix.
pub fn index_prefix(key: &Text) -> Vec<u8> {
    let mut out = key.as_str().as_bytes().to_vec();
    out.push(0);
    out
}

/// Corpus shape: sorted by token text alone (already lower-cased by the
/// tokenizer). The field a posting belongs to travels in the posting's
/// value, not the key, so one chunk serves every field's postings.
pub fn corpus_key(term: &str) -> Vec<u8> {
    term.to_lowercase().into_bytes()
}

/// Big-endian `i64` with the sign bit flipped: byte-lexicographic order on
/// the result matches numeric order on the input.
fn sortable_i64(v: i64) -> [u8; 8] {
    let u = (v as u64) ^ 0x8000_0000_0000_0000;
    u.to_be_bytes()
}

#[cfg(test)]
#[path = "key_test.rs"]
mod key_test;
