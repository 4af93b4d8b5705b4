//! Engine: the process-facing handle over one environment's buffer,
//! segment stores, inventory, lock broker and search indexer.

mod atomic;
mod registry;
mod transaction;
mod transport;

pub use atomic::AtomicOperation;
pub use registry::Registry;
pub use transaction::Transaction;

use std::{
    convert::TryFrom,
    ffi::OsString,
    path::PathBuf,
    sync::atomic::{AtomicI64, AtomicU64, Ordering},
};

use crate::{
    buffer::{self, Buffer},
    codec::{value::PrimaryKey, Text, Value},
    err_at,
    inventory::Inventory,
    lock::{Broker, Token},
    operator::Operator,
    revision::{self, Action, Revision, Write},
    search::{self, Indexer},
    segment, Result,
};

/// One environment's full storage stack: a write-ahead buffer feeding three
/// segment stores (`Table`, `Index`, `Corpus`), kept consistent by the lock
/// broker and backed by a live inventory of record ids.
pub struct Engine {
    dir: PathBuf,
    pub(crate) buffer: Buffer,
    pub(crate) table: segment::Store,
    pub(crate) index: segment::Store,
    pub(crate) corpus: segment::Store,
    pub(crate) inventory: Inventory,
    pub(crate) locks: Broker,
    pub(crate) indexer: Indexer,
    next_version: AtomicI64,
    next_txn_id: AtomicU64,
}

impl Engine {
    pub fn create(name: &str, dir: PathBuf) -> Result<Engine> {
        err_at!(IOError, std::fs::create_dir_all(&dir))?;
        let buffer_config = buffer::Config::new(name, OsString::from(dir.join("buffer")));
        let buffer = Buffer::create(buffer_config)?;
        Engine::open_stores(name, dir, buffer)
    }

    pub fn load(name: &str, dir: PathBuf) -> Result<Engine> {
        let buffer_config = buffer::Config::new(name, OsString::from(dir.join("buffer")));
        let buffer = Buffer::load(buffer_config)?;
        let engine = Engine::open_stores(name, dir, buffer)?;
        engine.replay_buffer()?;
        engine.replay_pending_transactions()?;
        Ok(engine)
    }

    fn open_stores(_name: &str, dir: PathBuf, buffer: Buffer) -> Result<Engine> {
        let table = segment::Store::open(dir.join("table"))?;
        let index = segment::Store::open(dir.join("index"))?;
        let corpus = segment::Store::open(dir.join("corpus"))?;
        let inventory = Inventory::new();

        let mut max_version = 0i64;
        for rev in table.scan()? {
            if matches!(rev.action(), Action::Add) {
                inventory.add(rev.record());
            }
            max_version = max_version.max(rev.version);
        }
        for (_, payload) in buffer.iter()? {
            if let Ok((rev, _)) = Revision::decode(&payload) {
                max_version = max_version.max(rev.version);
            }
        }

        Ok(Engine {
            dir,
            buffer,
            table,
            index,
            corpus,
            inventory,
            locks: Broker::new(),
            indexer: Indexer::new(num_cpus::get()),
            next_version: AtomicI64::new(max_version),
            next_txn_id: AtomicU64::new(0),
        })
    }

    fn replay_buffer(&self) -> Result<()> {
        for (_, payload) in self.buffer.iter()? {
            let (revision, _) = Revision::decode(&payload)?;
            self.apply_in_memory(&revision);
        }
        Ok(())
    }

    fn apply_in_memory(&self, revision: &Revision) {
        if revision.action() == Action::Add {
            self.inventory.add(revision.record());
        }
        self.indexer.submit(revision.clone());
    }

    /// The next strictly increasing commit version. Seeded at `open_stores`
    /// from the highest version found across the segment store and the
    /// unflushed buffer, so a restarted engine never reissues a version a
    /// prior process already committed.
    pub(crate) fn next_version(&self) -> i64 {
        self.next_version.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn next_txn_id(&self) -> u64 {
        self.next_txn_id.fetch_add(1, Ordering::SeqCst)
    }

    fn txn_dir(&self) -> PathBuf {
        self.dir.join("buffer").join("txn")
    }

    /// Back up `writes` to `<dir>/buffer/txn/<id>` before committing them.
    /// If the process crashes between this call and the buffer drain that
    /// follows a successful commit, `replay_pending_transactions` finds the
    /// file on the next `load` and finishes the commit.
    pub(crate) fn backup_transaction(&self, id: u64, writes: &[Write]) -> Result<()> {
        let dir = self.txn_dir();
        err_at!(IOError, std::fs::create_dir_all(&dir))?;
        let mut payload = Vec::new();
        payload.extend_from_slice(&(writes.len() as u32).to_be_bytes());
        for write in writes {
            Revision::new(write.clone(), 0).encode(&mut payload);
        }
        err_at!(IOError, std::fs::write(dir.join(id.to_string()), payload))
    }

    pub(crate) fn remove_transaction_backup(&self, id: u64) -> Result<()> {
        let path = self.txn_dir().join(id.to_string());
        if path.exists() {
            err_at!(IOError, std::fs::remove_file(path))?;
        }
        Ok(())
    }

    /// Replay every leftover `txn/<id>` backup found at load time: a prior
    /// process backed up its writes and then crashed before the commit
    /// finished draining. Re-running the same compare-then-append discipline
    /// is safe to retry; if the compare no longer holds the transaction is
    /// simply dropped rather than replayed.
    fn replay_pending_transactions(&self) -> Result<()> {
        let dir = self.txn_dir();
        if !dir.exists() {
            return Ok(());
        }
        for entry in err_at!(IOError, std::fs::read_dir(&dir))? {
            let entry = err_at!(IOError, entry)?;
            let path = entry.path();
            let data = err_at!(IOError, std::fs::read(&path))?;
            if data.len() < 4 {
                err_at!(IOError, std::fs::remove_file(&path))?;
                continue;
            }
            let count = u32::from_be_bytes(<[u8; 4]>::try_from(&data[0..4]).unwrap()) as usize;
            let mut offset = 4;
            let mut writes = Vec::with_capacity(count);
            for _ in 0..count {
                let (revision, n) = Revision::decode(&data[offset..])?;
                writes.push(revision.write);
                offset += n;
            }

            let mut op = AtomicOperation::new(self);
            for write in writes {
                op.stage(write);
            }
            op.commit().ok(); // best-effort: a failed compare just drops the backup.
            err_at!(IOError, std::fs::remove_file(&path))?;
        }
        Ok(())
    }

    /// Append one already-decided write at the next buffer seqno, stamping
    /// it with `version` as the revision's commit timestamp. Bypasses the
    /// lock broker and `AtomicOperation`'s compare semantics: mainly useful
    /// for tests and replay paths that already know the write is safe.
    pub fn append(&self, write: &Write, version: i64) -> Result<Revision> {
        let revision = Revision::new(write.clone(), version);
        let mut payload = Vec::new();
        revision.encode(&mut payload);
        self.buffer.append(&payload)?;
        self.apply_in_memory(&revision);
        Ok(revision)
    }

    /// Every revision ever recorded for `record`, newest first: the segment
    /// store's flushed history plus whatever is still sitting unflushed in
    /// the buffer.
    pub fn current(&self, record: PrimaryKey) -> Result<Vec<Revision>> {
        let mut revisions = self.table.lookup(&segment::key::table_key(record))?;
        for (_, payload) in self.buffer.iter()? {
            let (revision, _) = Revision::decode(&payload)?;
            if revision.record() == record {
                revisions.push(revision);
            }
        }
        revisions.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(revisions)
    }

    /// `record`'s currently present `(key, value)` facts, folding ADD/REMOVE
    /// by version so a value that was added then removed never shows up.
    fn resolve(&self, record: PrimaryKey) -> Result<Vec<(Text, Value)>> {
        Ok(revision::fold_presence(&self.current(record)?))
    }

    pub fn contains(&self, record: PrimaryKey) -> bool {
        self.inventory.contains(record)
    }

    pub fn record_count(&self) -> u64 {
        self.inventory.len()
    }

    pub fn start_atomic_operation(&self) -> AtomicOperation {
        AtomicOperation::new(self)
    }

    pub fn start_transaction(&self) -> Transaction {
        Transaction::new(self)
    }

    /// Assert one `(record, key, value)` fact. A record token write-lease is
    /// taken for the duration: exclusive against every other writer and
    /// reader of the same record.
    pub fn add(&self, record: PrimaryKey, key: Text, value: Value) -> Result<Revision> {
        let _held = self.locks.acquire_write(Token::record(record));
        let mut op = self.start_atomic_operation();
        op.stage(Write::add(record, key, value));
        let mut committed = op.commit()?;
        Ok(committed.remove(0))
    }

    /// Retract one `(record, key, value)` fact.
    pub fn remove(&self, record: PrimaryKey, key: Text, value: Value) -> Result<Revision> {
        let _held = self.locks.acquire_write(Token::record(record));
        let mut op = self.start_atomic_operation();
        op.stage(Write::remove(record, key, value));
        let mut committed = op.commit()?;
        Ok(committed.remove(0))
    }

    /// Replace every value currently present under `key` on `record` with
    /// `value`: every present value is retracted and the new one is added,
    /// all under one commit version.
    pub fn set(&self, record: PrimaryKey, key: Text, value: Value) -> Result<Vec<Revision>> {
        let _held = self.locks.acquire_write(Token::record(record));
        let present = self.resolve(record)?;
        let mut op = self.start_atomic_operation();
        for (k, v) in present.iter().filter(|(k, _)| *k == key) {
            op.stage(Write::remove(record, k.clone(), v.clone()));
        }
        op.stage(Write::add(record, key, value));
        op.commit()
    }

    /// One record's currently present fields, leased for read (shareable:
    /// many concurrent `select`s on the same record proceed together, only
    /// a writer excludes them).
    pub fn select(&self, record: PrimaryKey) -> Result<Vec<(Text, Value)>> {
        let _held = self.locks.acquire_read(Token::record(record));
        self.resolve(record)
    }

    /// Every record id currently present, in ascending order.
    pub fn browse(&self) -> Vec<PrimaryKey> {
        self.inventory.iter()
    }

    /// Records whose `key` holds exactly `value`. Leases the key's value
    /// range for read against concurrent writers of an overlapping range.
    pub fn explore(&self, key: &Text, value: &Value) -> Result<Vec<PrimaryKey>> {
        let token = Token::range(key.clone(), Operator::Equals, vec![value.clone()]);
        let _held = self.locks.acquire_read(token);
        let sort_key = segment::key::index_key(key, value);
        let mut hits = self.index.lookup(&sort_key)?;
        hits.extend(self.buffer_index_matches(key, |v| v.eq_weak(value))?);
        self.present_records(key, hits)
    }

    /// Records whose `key` holds a value in `[low, high]`.
    pub fn find(&self, key: &Text, low: &Value, high: &Value) -> Result<Vec<PrimaryKey>> {
        let token = Token::range(key.clone(), Operator::Between, vec![low.clone(), high.clone()]);
        let _held = self.locks.acquire_read(token);
        let low_key = segment::key::index_key(key, low);
        let high_key = segment::key::index_key(key, high);
        let mut hits = self.index.range(&low_key, &high_key)?;
        hits.extend(self.buffer_index_matches(key, |v| {
            use std::cmp::Ordering::{Greater, Less};
            v.compare(low) != Less && v.compare(high) != Greater
        })?);
        self.present_records(key, hits)
    }

    /// Records whose `field` contains `query` as an in-order run of words.
    /// Relaxed consistency: unlike `explore`/`find`, no range lease is
    /// taken, matching spec's search-has-no-locking contract.
    pub fn search(&self, field: &Text, query: &str) -> Result<Vec<PrimaryKey>> {
        let words: Vec<String> = search::words(query).into_iter().map(|(w, _)| w).collect();
        let mut postings = Vec::new();
        for word in &words {
            if let Ok(term) = Text::new(word.clone()) {
                postings.extend(self.corpus.lookup(&segment::key::corpus_key(term.as_str()))?);
            }
        }
        postings.extend(self.indexer.snapshot());
        Ok(search::phrase_match(field, query, &postings))
    }

    /// Whether `record` currently presents `(key, value)`.
    pub fn verify(&self, record: PrimaryKey, key: &Text, value: &Value) -> Result<bool> {
        Ok(self.resolve(record)?.iter().any(|(k, v)| k == key && v.eq_weak(value)))
    }

    /// The complete revision history of `record`, oldest first, including
    /// facts that have since been retracted.
    pub fn review(&self, record: PrimaryKey) -> Result<Vec<Revision>> {
        let mut history = self.current(record)?;
        history.sort_by_key(|r| r.version);
        Ok(history)
    }

    /// Index-store and still-unflushed-buffer revisions for `key` matching
    /// `pred` against the value, ignoring presence folding (the caller
    /// applies that afterward in `present_records`).
    fn buffer_index_matches(&self, key: &Text, pred: impl Fn(&Value) -> bool) -> Result<Vec<Revision>> {
        let mut out = Vec::new();
        for (_, payload) in self.buffer.iter()? {
            let (revision, _) = Revision::decode(&payload)?;
            if revision.key() == key && pred(revision.value()) {
                out.push(revision);
            }
        }
        Ok(out)
    }

    /// Narrow a set of Index-shape hits down to the records where that exact
    /// `(key, value)` fact is still currently present, per
    /// `revision::fold_presence`. A hit only reflects that `(key, value)` was
    /// added at some point; checking just `key` would also match a record
    /// whose value under `key` has since moved on to something else.
    fn present_records(&self, key: &Text, hits: Vec<Revision>) -> Result<Vec<PrimaryKey>> {
        use std::collections::BTreeSet;
        let mut candidates: BTreeSet<(PrimaryKey, Vec<u8>)> = BTreeSet::new();
        for hit in &hits {
            candidates.insert((hit.record(), hit.value().canonical_bytes()));
        }
        let mut out = Vec::new();
        let mut seen = BTreeSet::new();
        for (record, value_bytes) in candidates {
            if seen.contains(&record) {
                continue;
            }
            let present = self
                .resolve(record)?
                .iter()
                .any(|(k, v)| k == key && v.canonical_bytes() == value_bytes);
            if present {
                seen.insert(record);
                out.push(record);
            }
        }
        out.sort_unstable();
        Ok(out)
    }

    /// Fold everything currently in the buffer into fresh chunks of each
    /// segment store. Called by the background transporter, or directly in
    /// tests.
    pub fn flush(&self) -> Result<()> {
        let mut revisions: Vec<Revision> =
            self.buffer.iter()?.into_iter().map(|(_, p)| Revision::decode(&p).map(|(r, _)| r)).collect::<Result<_>>()?;
        if revisions.is_empty() {
            return Ok(());
        }

        revisions.sort_by(|a, b| {
            segment::key::table_key(a.record()).cmp(&segment::key::table_key(b.record())).then(b.version.cmp(&a.version))
        });
        self.table.flush(&revisions, |r| segment::key::table_key(r.record()))?;

        let mut by_value = revisions.clone();
        by_value.sort_by(|a, b| {
            segment::key::index_key(a.key(), a.value())
                .cmp(&segment::key::index_key(b.key(), b.value()))
                .then(b.version.cmp(&a.version))
        });
        self.index.flush(&by_value, |r| segment::key::index_key(r.key(), r.value()))?;

        let mut postings = self.indexer.drain();
        if !postings.is_empty() {
            postings.sort_by(|a, b| {
                segment::key::corpus_key(a.key().as_str())
                    .cmp(&segment::key::corpus_key(b.key().as_str()))
                    .then(b.version.cmp(&a.version))
            });
            self.corpus.flush(&postings, |r| segment::key::corpus_key(r.key().as_str()))?;
        }

        self.buffer.mark_drained(revisions.len() as u64);
        Ok(())
    }

}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
