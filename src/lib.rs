//! epochdb: a versioned, transactional, schemaless record store.
//!
//! Every write is a `revision::Revision` stamped with a commit version;
//! readers ask for the current (or a historical) view of a record through
//! `engine::Engine::current`. Writes are staged through `engine::Transaction`
//! or `engine::AtomicOperation` for optimistic-concurrency commits: a
//! transaction may assert the current value of a field (`revision::Action::Compare`)
//! and have the whole commit abort if that assertion no longer holds.
//!
//! Storage is a hybrid of a durable write-ahead `buffer::Buffer` (recent,
//! unflushed writes) and immutable, bloom-filtered `segment::Store` chunks
//! (everything folded in by a periodic `engine::transport::spawn` flush).
//! A `lock::Broker` serializes concurrent access per record/field/range,
//! an `inventory::Inventory` tracks live record ids as a partitioned bitmap,
//! and `search::Indexer` builds an infix full-text corpus alongside the
//! primary data.
//!
//! `evaluator` walks a tree of `operator::Operator` comparisons
//! (`evaluator::Conjunction`) against an `Engine` to answer predicate
//! queries without a query planner: the caller supplies the candidate
//! record-id universe and the evaluator intersects/unions per `Combinator`.

mod error;

pub mod util;

pub mod bloom;
pub mod buffer;
pub mod codec;
pub mod config;
pub mod engine;
pub mod evaluator;
pub mod inventory;
pub mod lock;
pub mod operator;
pub mod revision;
pub mod search;
pub mod segment;

pub use crate::error::{Error, Result};
pub use crate::revision::{Action, Revision, Write};
