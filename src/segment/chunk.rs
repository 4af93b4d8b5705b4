//! `Chunk`: one immutable, sorted run of revisions together with a bloom
//! filter for a fast "definitely absent" negative lookup.
//!
//! On-disk layout: `[revisions...][index...][bloom][footer]`. The footer is
//! a fixed 20 bytes at EOF so a reader can open a chunk without scanning it.
//! The index's sort key is an arbitrary byte string (see `segment::key`):
//! the same chunk format serves the Table shape (keyed by record), the
//! Index shape (keyed by field+value) and the Corpus shape (keyed by
//! token), each via its own key function.

use std::{
    convert::TryFrom,
    fs,
    io::{Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use crate::{
    bloom::{Bloom, Xor8Bloom},
    err_at,
    revision::Revision,
    util, Result,
};

const MAGIC: &[u8; 4] = b"ECK1";
const FOOTER_LEN: usize = 20;

pub struct Chunk {
    path: PathBuf,
    index: Vec<(Vec<u8>, u64)>, // (sort_key, offset into file) ascending
    bloom: Xor8Bloom,
    pub count: usize,
    pub low: Vec<u8>,
    pub high: Vec<u8>,
}

impl Chunk {
    /// Build a new chunk file from `revisions`, already sorted by `sort_key`.
    pub fn build<F>(path: &Path, revisions: &[Revision], sort_key: F) -> Result<Chunk>
    where
        F: Fn(&Revision) -> Vec<u8>,
    {
        let mut fd = util::create_file_a(path.as_os_str())?;
        let mut body = Vec::new();
        let mut index = Vec::with_capacity(revisions.len());
        let mut bloom = Xor8Bloom::default();

        for rev in revisions {
            let offset = body.len() as u64;
            let key = sort_key(rev);
            bloom.add_key(&key);
            index.push((key, offset));

            let mut rec = Vec::new();
            rev.encode(&mut rec);
            body.extend_from_slice(&(rec.len() as u32).to_be_bytes());
            body.extend_from_slice(&rec);
        }
        bloom.build()?;

        let index_offset = body.len() as u64;
        let mut index_bytes = Vec::new();
        for (key, offset) in index.iter() {
            index_bytes.extend_from_slice(&(key.len() as u32).to_be_bytes());
            index_bytes.extend_from_slice(key);
            index_bytes.extend_from_slice(&offset.to_be_bytes());
        }

        let bloom_bytes = bloom.to_bytes()?;
        let bloom_offset = index_offset + index_bytes.len() as u64;

        err_at!(IOError, fd.write_all(MAGIC))?;
        err_at!(IOError, fd.write_all(&body))?;
        err_at!(IOError, fd.write_all(&index_bytes))?;
        err_at!(IOError, fd.write_all(&bloom_bytes))?;

        let mut footer = Vec::with_capacity(FOOTER_LEN);
        footer.extend_from_slice(&(index_offset + 4).to_be_bytes());
        footer.extend_from_slice(&(bloom_offset + 4).to_be_bytes());
        footer.extend_from_slice(&(revisions.len() as u32).to_be_bytes());
        err_at!(IOError, fd.write_all(&footer))?;
        err_at!(IOError, fd.sync_all())?;

        let (low, high) = match (index.first(), index.last()) {
            (Some((a, _)), Some((b, _))) => (a.clone(), b.clone()),
            _ => (Vec::new(), Vec::new()),
        };

        Ok(Chunk { path: path.to_path_buf(), index, bloom, count: revisions.len(), low, high })
    }

    pub fn open(path: &Path) -> Result<Chunk> {
        let mut fd = err_at!(IOError, fs::File::open(path))?;
        let len = err_at!(IOError, fd.metadata())?.len();
        if len < FOOTER_LEN as u64 + 4 {
            err_at!(Corruption, msg: "chunk {:?} too small", path)?;
        }

        err_at!(IOError, fd.seek(SeekFrom::End(-(FOOTER_LEN as i64))))?;
        let mut footer = [0u8; FOOTER_LEN];
        err_at!(IOError, fd.read_exact(&mut footer))?;
        let index_offset = u64::from_be_bytes(<[u8; 8]>::try_from(&footer[0..8]).unwrap());
        let bloom_offset = u64::from_be_bytes(<[u8; 8]>::try_from(&footer[8..16]).unwrap());
        let count = u32::from_be_bytes(<[u8; 4]>::try_from(&footer[16..20]).unwrap()) as usize;

        err_at!(IOError, fd.seek(SeekFrom::Start(index_offset)))?;
        let mut index_bytes = vec![0u8; (bloom_offset - index_offset) as usize];
        err_at!(IOError, fd.read_exact(&mut index_bytes))?;
        let mut index = Vec::with_capacity(count);
        let mut p = 0;
        while p + 4 <= index_bytes.len() {
            let klen = u32::from_be_bytes(<[u8; 4]>::try_from(&index_bytes[p..p + 4]).unwrap()) as usize;
            p += 4;
            let key = index_bytes[p..p + klen].to_vec();
            p += klen;
            let offset = u64::from_be_bytes(<[u8; 8]>::try_from(&index_bytes[p..p + 8]).unwrap());
            p += 8;
            index.push((key, offset));
        }

        let bloom_len = len - FOOTER_LEN as u64 - bloom_offset;
        err_at!(IOError, fd.seek(SeekFrom::Start(bloom_offset)))?;
        let mut bloom_bytes = vec![0u8; bloom_len as usize];
        err_at!(IOError, fd.read_exact(&mut bloom_bytes))?;
        let bloom = if bloom_bytes.is_empty() {
            Xor8Bloom::default()
        } else {
            Xor8Bloom::from_bytes(&bloom_bytes)?.0
        };

        let (low, high) = match (index.first(), index.last()) {
            (Some((a, _)), Some((b, _))) => (a.clone(), b.clone()),
            _ => (Vec::new(), Vec::new()),
        };

        Ok(Chunk { path: path.to_path_buf(), index, bloom, count, low, high })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn may_contain(&self, sort_key: &[u8]) -> bool {
        if self.index.is_empty() || sort_key < self.low.as_slice() || sort_key > self.high.as_slice() {
            return false;
        }
        self.bloom.contains(&sort_key)
    }

    /// Every revision whose sort key equals `sort_key`, oldest write first.
    pub fn lookup(&self, sort_key: &[u8]) -> Result<Vec<Revision>> {
        if !self.may_contain(sort_key) {
            return Ok(Vec::new());
        }
        let start = self.index.partition_point(|(k, _)| k.as_slice() < sort_key);
        let mut out = Vec::new();
        let mut fd = err_at!(IOError, fs::File::open(&self.path))?;
        for (key, offset) in &self.index[start..] {
            if key.as_slice() != sort_key {
                break;
            }
            out.push(self.read_at(&mut fd, *offset)?);
        }
        Ok(out)
    }

    /// Every revision whose sort key falls in `[low, high]` inclusive.
    pub fn range(&self, low: &[u8], high: &[u8]) -> Result<Vec<Revision>> {
        if self.index.is_empty() || high < self.low.as_slice() || low > self.high.as_slice() {
            return Ok(Vec::new());
        }
        let start = self.index.partition_point(|(k, _)| k.as_slice() < low);
        let mut out = Vec::new();
        let mut fd = err_at!(IOError, fs::File::open(&self.path))?;
        for (key, offset) in &self.index[start..] {
            if key.as_slice() > high {
                break;
            }
            out.push(self.read_at(&mut fd, *offset)?);
        }
        Ok(out)
    }

    /// Every revision whose sort key starts with `prefix`.
    pub fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<Revision>> {
        let start = self.index.partition_point(|(k, _)| k.as_slice() < prefix);
        let mut out = Vec::new();
        let mut fd = err_at!(IOError, fs::File::open(&self.path))?;
        for (key, offset) in &self.index[start..] {
            if !key.starts_with(prefix) {
                break;
            }
            out.push(self.read_at(&mut fd, *offset)?);
        }
        Ok(out)
    }

    /// Every revision in the chunk, in on-disk (sort-key) order.
    pub fn scan(&self) -> Result<Vec<Revision>> {
        let mut fd = err_at!(IOError, fs::File::open(&self.path))?;
        let mut out = Vec::with_capacity(self.index.len());
        for &(_, offset) in &self.index {
            out.push(self.read_at(&mut fd, offset)?);
        }
        Ok(out)
    }

    fn read_at(&self, fd: &mut fs::File, offset: u64) -> Result<Revision> {
        err_at!(IOError, fd.seek(SeekFrom::Start(4 + offset)))?;
        let mut len_buf = [0u8; 4];
        err_at!(IOError, fd.read_exact(&mut len_buf))?;
        let len = u32::from_be_bytes(len_buf) as usize;
        let mut rec = vec![0u8; len];
        err_at!(IOError, fd.read_exact(&mut rec))?;
        Revision::decode(&rec).map(|(rev, _)| rev)
    }
}

#[cfg(test)]
#[path = "chunk_test.rs"]
mod chunk_test;
