//! `AtomicOperation`: stage a batch of `Write`s (including `Compare` probes)
//! and commit them all under one version, or not at all.

use std::collections::BTreeSet;

use crate::{
    err_at,
    lock::Token,
    revision::{Action, Revision, Write},
    Result,
};

use super::Engine;

pub struct AtomicOperation<'e> {
    engine: &'e Engine,
    writes: Vec<Write>,
}

impl<'e> AtomicOperation<'e> {
    pub fn new(engine: &'e Engine) -> AtomicOperation<'e> {
        AtomicOperation { engine, writes: Vec::new() }
    }

    pub fn stage(&mut self, write: Write) -> &mut Self {
        self.writes.push(write);
        self
    }

    pub(crate) fn writes(&self) -> &[Write] {
        &self.writes
    }

    /// Verify every staged `Compare`, then append every `Add`/`Remove` at
    /// one shared commit version. Aborts (no writes applied) if any
    /// `Compare` does not hold against the engine's current state.
    pub fn commit(self) -> Result<Vec<Revision>> {
        let version = self.engine.next_version();
        self.commit_at(version)
    }

    /// Same as `commit`, but the caller picks the version. `commit` is
    /// itself just this with a freshly minted version; kept separate so a
    /// future caller (e.g. a transaction log replay that must preserve an
    /// already-decided version) can bypass minting.
    pub(crate) fn commit_at(self, version: i64) -> Result<Vec<Revision>> {
        if self.writes.is_empty() {
            return Ok(Vec::new());
        }

        let records: BTreeSet<i64> = self.writes.iter().map(|w| w.record).collect();
        let tokens: Vec<Token> = records.into_iter().map(Token::record).collect();
        let _held: Vec<_> = tokens.into_iter().map(|t| self.engine.locks.acquire_write(t)).collect();

        for write in self.writes.iter().filter(|w| w.action == Action::Compare) {
            let current = self.engine.current(write.record)?;
            let holds = current
                .iter()
                .find(|r| r.key() == &write.key)
                .map_or(false, |r| r.value().eq_weak(&write.value));
            if !holds {
                err_at!(
                    AtomicStateInvalid,
                    msg: "compare failed for record {} key {}", write.record, write.key
                )?;
            }
        }

        let mut committed = Vec::new();
        for write in self.writes.iter().filter(|w| w.is_storable()) {
            committed.push(self.engine.append(write, version)?);
        }
        Ok(committed)
    }
}

#[cfg(test)]
#[path = "atomic_test.rs"]
mod atomic_test;
