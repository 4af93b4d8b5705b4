//! `Write` and `Revision`: the unit of mutation and the unit of storage.
//!
//! A `Write` is what a caller submits: add or remove one `(record, key,
//! value)` fact, or probe for one without persisting anything. A `Revision`
//! is what the buffer and segment store actually keep: a `Write` stamped
//! with the version it was committed at, together with the three index
//! shapes every committed `Revision` is projected into.

use std::{cmp::Ordering, convert::TryFrom};

use crate::{check_remaining, codec::{value::PrimaryKey, Text, Value}, err_at, Result};

/// Whether a revision asserts or retracts a fact. `Compare` never reaches
/// storage: it is the action used by an `AtomicOperation`'s read-before-write
/// verification and is dropped once the check passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Add,
    Remove,
    Compare,
}

#[derive(Clone, Debug)]
pub struct Write {
    pub record: PrimaryKey,
    pub key: Text,
    pub value: Value,
    pub action: Action,
}

impl Write {
    pub fn add(record: PrimaryKey, key: Text, value: Value) -> Write {
        Write { record, key, value, action: Action::Add }
    }

    pub fn remove(record: PrimaryKey, key: Text, value: Value) -> Write {
        Write { record, key, value, action: Action::Remove }
    }

    pub fn compare(record: PrimaryKey, key: Text, value: Value) -> Write {
        Write { record, key, value, action: Action::Compare }
    }

    pub fn is_storable(&self) -> bool {
        !matches!(self.action, Action::Compare)
    }

    /// The inverse write, used to undo a partially-applied atomic operation.
    pub fn inverse(&self) -> Write {
        let action = match self.action {
            Action::Add => Action::Remove,
            Action::Remove => Action::Add,
            Action::Compare => Action::Compare,
        };
        Write { record: self.record, key: self.key.clone(), value: self.value.clone(), action }
    }
}

/// Which of the three index shapes a `Revision` is sorted into. The buffer
/// and segment store carry one `Revision` stream per shape, each with its
/// own sort order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Shape {
    /// Sorted by `(record, key, version)` — every fact ever held by one record.
    Table,
    /// Sorted by `(key, value, record, version)` — every record holding one value.
    Index,
    /// Sorted by `(key, term, position, record, version)` — full-text postings.
    Corpus,
}

/// A `Write` stamped with the version (commit timestamp) it was durably
/// recorded at. `Revision` is immutable: once minted it is never edited, only
/// superseded by a later revision for the same `(record, key, value)`.
#[derive(Clone, Debug)]
pub struct Revision {
    pub write: Write,
    pub version: i64,
}

impl Revision {
    pub fn new(write: Write, version: i64) -> Revision {
        Revision { write, version }
    }

    pub fn record(&self) -> PrimaryKey {
        self.write.record
    }

    pub fn key(&self) -> &Text {
        &self.write.key
    }

    pub fn value(&self) -> &Value {
        &self.write.value
    }

    pub fn action(&self) -> Action {
        self.write.action
    }

    /// Sort key for the `Table` shape: `(record, key, version)`, version
    /// descending so the newest revision of a fact sorts first.
    pub fn table_order(&self, other: &Revision) -> Ordering {
        self.record()
            .cmp(&other.record())
            .then_with(|| self.key().cmp(other.key()))
            .then_with(|| other.version.cmp(&self.version))
    }

    /// Sort key for the `Index` shape: `(key, value, record, version)`.
    pub fn index_order(&self, other: &Revision) -> Ordering {
        self.key()
            .cmp(other.key())
            .then_with(|| self.value().compare(other.value()))
            .then_with(|| self.record().cmp(&other.record()))
            .then_with(|| other.version.cmp(&self.version))
    }

    /// A revision is visible at `at` if it was committed no later than `at`.
    pub fn is_visible_at(&self, at: i64) -> bool {
        self.version <= at
    }

    /// Chunk wire form: `[version:8][action:1][record:8][key_len:4][key][value]`.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.version.to_be_bytes());
        buf.push(match self.write.action {
            Action::Add => 0,
            Action::Remove => 1,
            Action::Compare => 2,
        });
        buf.extend_from_slice(&self.write.record.to_be_bytes());
        let key = self.write.key.as_str().as_bytes();
        buf.extend_from_slice(&(key.len() as u32).to_be_bytes());
        buf.extend_from_slice(key);
        self.write.value.encode(buf);
    }

    pub fn decode(buf: &[u8]) -> Result<(Revision, usize)> {
        check_remaining!(buf, 21, "revision-hdr")?;
        let version = i64::from_be_bytes(<[u8; 8]>::try_from(&buf[0..8]).unwrap());
        let action = match buf[8] {
            0 => Action::Add,
            1 => Action::Remove,
            2 => Action::Compare,
            n => err_at!(Corruption, msg: "unknown revision action-tag {}", n)?,
        };
        let record = PrimaryKey::from_be_bytes(<[u8; 8]>::try_from(&buf[9..17]).unwrap());
        let key_len = u32::from_be_bytes(<[u8; 4]>::try_from(&buf[17..21]).unwrap()) as usize;
        check_remaining!(buf[21..], key_len, "revision-key")?;
        let key = err_at!(
            FailConvert,
            String::from_utf8(buf[21..21 + key_len].to_vec()),
            "non-utf8 revision key"
        )?;
        let key = Text::new(key)?;
        let (value, vn) = Value::decode(&buf[21 + key_len..])?;
        let write = Write { record, key, value, action };
        Ok((Revision { write, version }, 21 + key_len + vn))
    }
}

/// Fold a record's revisions (any order, any subset) into the `(key, value)`
/// pairs currently present: for each distinct `(key, value)` pair, the
/// revision with the highest version decides whether it's present (`Add`)
/// or retracted (`Remove`). `value` pairs are keyed by canonical bytes so
/// weakly-equal values (`"Alice"` vs `"alice"`) fold together the same way
/// `Value::eq_weak` treats them as one fact.
pub fn fold_presence(history: &[Revision]) -> Vec<(Text, Value)> {
    use std::collections::HashMap;

    let mut latest: HashMap<(Text, Vec<u8>), (Text, Value, Action, i64)> = HashMap::new();
    for rev in history {
        let id = (rev.key().clone(), rev.value().canonical_bytes());
        let newer = match latest.get(&id) {
            Some((_, _, _, version)) => rev.version >= *version,
            None => true,
        };
        if newer {
            latest.insert(id, (rev.key().clone(), rev.value().clone(), rev.action(), rev.version));
        }
    }

    latest
        .into_values()
        .filter(|(_, _, action, _)| matches!(action, Action::Add))
        .map(|(key, value, _, _)| (key, value))
        .collect()
}

#[cfg(test)]
#[path = "revision_test.rs"]
mod revision_test;
