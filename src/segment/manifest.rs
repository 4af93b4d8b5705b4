//! `Manifest`: the ordered list of chunk files that make up one shape's
//! on-disk store, newest chunk first so lookups stop at the first hit.

use serde::{Deserialize, Serialize};

use std::{fs, path::Path};

use crate::{err_at, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entry {
    pub file_name: String,
    pub low: Vec<u8>,
    pub high: Vec<u8>,
    pub count: usize,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Newest chunk last (append order); readers walk it in reverse.
    pub entries: Vec<Entry>,
}

impl Manifest {
    pub fn new() -> Manifest {
        Manifest::default()
    }

    pub fn load(path: &Path) -> Result<Manifest> {
        if !path.exists() {
            return Ok(Manifest::new());
        }
        let data = err_at!(IOError, fs::read_to_string(path))?;
        err_at!(FailConvert, toml::from_str(&data), "manifest {:?}", path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = err_at!(FailConvert, toml::to_string_pretty(self))?;
        err_at!(IOError, fs::write(path, data))
    }

    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Chunk file names to consult for `sort_key`, newest first.
    pub fn candidates<'a>(&'a self, sort_key: &'a [u8]) -> impl Iterator<Item = &'a Entry> {
        self.entries
            .iter()
            .rev()
            .filter(move |e| sort_key >= e.low.as_slice() && sort_key <= e.high.as_slice())
    }

    /// Chunk file names whose `[low, high]` range overlaps `[low, high]`,
    /// newest first.
    pub fn range_candidates<'a>(&'a self, low: &'a [u8], high: &'a [u8]) -> impl Iterator<Item = &'a Entry> {
        self.entries
            .iter()
            .rev()
            .filter(move |e| high >= e.low.as_slice() && low <= e.high.as_slice())
    }
}

#[cfg(test)]
#[path = "manifest_test.rs"]
mod manifest_test;
