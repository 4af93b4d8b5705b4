//! `Indexer`: a worker pool that tokenizes committed `STRING`/`TAG`
//! revisions into `Corpus`-shape postings off the commit path.

use std::sync::{Arc, Mutex};

use super::infixes;
use crate::{
    codec::{Text, Value},
    revision::{Action, Revision, Write},
    util,
};

enum Task {
    Index(Revision),
}

/// Accepts committed revisions and asynchronously produces the `Corpus`
/// postings they contribute; `drain` hands the accumulated postings to the
/// caller (the engine folds them into the corpus segment store) and clears
/// the backlog, `snapshot` hands back a copy without clearing it so a
/// `search` reading before the next flush still sees them.
pub struct Indexer {
    pool: util::Pool<Task, (), ()>,
    pending: Arc<Mutex<Vec<Revision>>>,
}

impl Indexer {
    pub fn new(pool_size: usize) -> Indexer {
        let pending = Arc::new(Mutex::new(Vec::new()));
        let mut pool = util::Pool::new("search-indexer");
        pool.set_pool_size(pool_size.max(1));

        let pending_for_workers = pending.clone();
        pool.spawn(move |rx| {
            let pending = pending_for_workers.clone();
            move || {
                for (task, reply) in rx {
                    let Task::Index(revision) = task;
                    let postings = tokenize(&revision);
                    pending.lock().unwrap().extend(postings);
                    if let Some(tx) = reply {
                        tx.send(()).ok();
                    }
                }
            }
        });

        Indexer { pool, pending }
    }

    /// Submit a committed revision for tokenization; does not block.
    pub fn submit(&self, revision: Revision) {
        self.pool.post(Task::Index(revision)).ok();
    }

    /// Hand back every posting produced so far and clear the backlog.
    pub fn drain(&self) -> Vec<Revision> {
        std::mem::take(&mut self.pending.lock().unwrap())
    }

    /// Every posting produced so far, without clearing the backlog.
    pub fn snapshot(&self) -> Vec<Revision> {
        self.pending.lock().unwrap().clone()
    }

    pub fn close(self) {
        self.pool.close_wait().ok();
    }
}

/// A corpus posting's payload: which field the indexed value came from and
/// the word-ordinal position within it. Encoded as `Value::Str("field:pos")`
/// because the posting's own `key` is taken by the indexed term itself
/// (the corpus shape's sort key), leaving no room to also carry the field
/// name there.
fn posting_value(field: &Text, position: usize) -> Value {
    Value::Str(format!("{}:{}", field.as_str(), position))
}

/// Decode a posting's payload back into its originating field and position.
pub fn decode_posting(value: &Value) -> Option<(&str, i32)> {
    let s = match value {
        Value::Str(s) => s.as_str(),
        _ => return None,
    };
    let (field, pos) = s.rsplit_once(':')?;
    pos.parse().ok().map(|p| (field, p))
}

/// Project one committed revision into zero or more `Corpus` postings: one
/// per distinct infix of its value, keyed by the infix term and carrying
/// the originating field and the infix's word-ordinal position as the
/// posting's value.
fn tokenize(revision: &Revision) -> Vec<Revision> {
    let text = match revision.value() {
        Value::Str(s) | Value::Tag(s) => s.as_str(),
        _ => return Vec::new(),
    };
    let field = revision.key();

    infixes(text)
        .into_iter()
        .filter_map(|(term, position)| {
            let term_key = Text::new(term).ok()?;
            let value = posting_value(field, position);
            let write = match revision.action() {
                Action::Remove => Write::remove(revision.record(), term_key, value),
                _ => Write::add(revision.record(), term_key, value),
            };
            Some(Revision::new(write, revision.version))
        })
        .collect()
}

#[cfg(test)]
#[path = "indexer_test.rs"]
mod indexer_test;
