//! `Store`: owns one shape's manifest and chunk files, and folds buffer
//! flushes into fresh immutable chunks.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use super::{Chunk, Entry, Manifest};
use crate::{err_at, revision::Revision, Result};

struct Inner {
    manifest: Manifest,
    next_chunk_no: usize,
}

pub struct Store {
    dir: PathBuf,
    manifest_path: PathBuf,
    inner: Mutex<Inner>,
}

impl Store {
    pub fn open(dir: PathBuf) -> Result<Store> {
        err_at!(IOError, fs::create_dir_all(&dir))?;
        let manifest_path = dir.join("MANIFEST");
        let manifest = Manifest::load(&manifest_path)?;
        let next_chunk_no = manifest.entries.len();
        Ok(Store { dir, manifest_path, inner: Mutex::new(Inner { manifest, next_chunk_no }) })
    }

    fn lock(&self) -> MutexGuard<Inner> {
        self.inner.lock().unwrap()
    }

    /// Build a new chunk from `revisions` (already sorted by `sort_key`)
    /// and add it to the manifest as the newest chunk.
    pub fn flush<F>(&self, revisions: &[Revision], sort_key: F) -> Result<()>
    where
        F: Fn(&Revision) -> Vec<u8>,
    {
        if revisions.is_empty() {
            return Ok(());
        }
        let mut inner = self.lock();
        let chunk_no = inner.next_chunk_no;
        inner.next_chunk_no += 1;

        let file_name = format!("chunk-{:08}", chunk_no);
        let path = self.dir.join(&file_name);
        let chunk = Chunk::build(&path, revisions, sort_key)?;

        inner.manifest.push(Entry {
            file_name,
            low: chunk.low.clone(),
            high: chunk.high.clone(),
            count: chunk.count,
        });
        inner.manifest.save(&self.manifest_path)
    }

    /// Every revision across every chunk whose sort key equals `sort_key`,
    /// newest chunk first.
    pub fn lookup(&self, sort_key: &[u8]) -> Result<Vec<Revision>> {
        let inner = self.lock();
        let mut out = Vec::new();
        for entry in inner.manifest.candidates(sort_key) {
            let chunk = Chunk::open(&self.dir.join(&entry.file_name))?;
            out.extend(chunk.lookup(sort_key)?);
        }
        Ok(out)
    }

    /// Every revision across every chunk whose sort key falls in
    /// `[low, high]` inclusive, newest chunk first.
    pub fn range(&self, low: &[u8], high: &[u8]) -> Result<Vec<Revision>> {
        let inner = self.lock();
        let mut out = Vec::new();
        for entry in inner.manifest.range_candidates(low, high) {
            let chunk = Chunk::open(&self.dir.join(&entry.file_name))?;
            out.extend(chunk.range(low, high)?);
        }
        Ok(out)
    }

    /// Every revision across every chunk whose sort key starts with
    /// `prefix`, newest chunk first.
    pub fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<Revision>> {
        let inner = self.lock();
        let mut out = Vec::new();
        for entry in inner.manifest.entries.iter().rev() {
            let chunk = Chunk::open(&self.dir.join(&entry.file_name))?;
            out.extend(chunk.scan_prefix(prefix)?);
        }
        Ok(out)
    }

    /// Every revision in every chunk, newest chunk first.
    pub fn scan(&self) -> Result<Vec<Revision>> {
        let inner = self.lock();
        let mut out = Vec::new();
        for entry in inner.manifest.entries.iter().rev() {
            let chunk = Chunk::open(&self.dir.join(&entry.file_name))?;
            out.extend(chunk.scan()?);
        }
        Ok(out)
    }

    pub fn chunk_count(&self) -> usize {
        self.lock().manifest.entries.len()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;
