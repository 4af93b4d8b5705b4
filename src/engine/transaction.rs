//! `Transaction`: a named sequence of staged writes committed or abandoned
//! as one unit. Unlike `AtomicOperation`, a `Transaction` accumulates its
//! writes across multiple calls before the caller decides to commit, and its
//! commit is crash-safe: the staged writes are backed up to `buffer/txn/<id>`
//! before anything is appended, and the backup is only removed once every
//! write has actually landed in the buffer. A crash between those two steps
//! leaves the backup file behind for `Engine::load` to replay.

use crate::{revision::Write, Result};

use super::{AtomicOperation, Engine};

pub struct Transaction<'e> {
    engine: &'e Engine,
    op: AtomicOperation<'e>,
}

impl<'e> Transaction<'e> {
    pub fn new(engine: &'e Engine) -> Transaction<'e> {
        Transaction { engine, op: AtomicOperation::new(engine) }
    }

    pub fn add(&mut self, write: Write) -> &mut Self {
        self.op.stage(write);
        self
    }

    /// Discard every staged write; nothing reaches the buffer.
    pub fn abort(self) {}

    pub fn commit(self) -> Result<Vec<crate::revision::Revision>> {
        let id = self.engine.next_txn_id();
        self.engine.backup_transaction(id, self.op.writes())?;
        let result = self.op.commit();
        // Reached only if the process survived the commit: a crash mid-commit
        // leaves the backup for `replay_pending_transactions` to finish.
        self.engine.remove_transaction_backup(id)?;
        result
    }
}

#[cfg(test)]
#[path = "transaction_test.rs"]
mod transaction_test;
