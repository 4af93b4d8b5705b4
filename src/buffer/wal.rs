//! `Buffer`: a cloneable handle onto a rotating sequence of journal files.
//! All appends are serialized through a single background thread so that
//! `seqno` is strictly monotonic across every clone.

use std::{
    fs,
    path::PathBuf,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use super::{journal::Journal, Config};
use crate::{err_at, util, Result};

enum Req {
    Append(Vec<u8>),
}

enum Res {
    Appended(u64),
}

struct State {
    config: Config,
    journals: Vec<Journal>,
    journal_no: usize,
}

impl State {
    fn active(&mut self) -> &mut Journal {
        self.journals.last_mut().unwrap()
    }

    fn append(&mut self, seqno: u64, payload: &[u8]) -> Result<()> {
        if self.active().size() >= self.config.journal_limit {
            self.journal_no += 1;
            let journal = Journal::create(
                PathBuf::from(&self.config.dir).as_path(),
                &self.config.name,
                self.journal_no,
                seqno,
            )?;
            self.journals.push(journal);
        }
        self.active().append(seqno, payload, self.config.fsync)
    }
}

/// The write-ahead buffer every `Revision` is appended to before it is
/// folded into the segment store.
pub struct Buffer {
    config: Config,
    seqno: Arc<AtomicU64>,
    undrained: Arc<AtomicU64>,
    thread: Arc<util::Thread<Req, Res, ()>>,
}

impl Clone for Buffer {
    fn clone(&self) -> Buffer {
        Buffer {
            config: self.config.clone(),
            seqno: self.seqno.clone(),
            undrained: self.undrained.clone(),
            thread: self.thread.clone(),
        }
    }
}

impl Buffer {
    pub fn create(config: Config) -> Result<Buffer> {
        err_at!(IOError, fs::create_dir_all(PathBuf::from(&config.dir)))?;
        let journal = Journal::create(PathBuf::from(&config.dir).as_path(), &config.name, 0, 1)?;
        Buffer::spawn(config, vec![journal], 0, 0, 0)
    }

    pub fn load(config: Config) -> Result<Buffer> {
        let dir = PathBuf::from(&config.dir);
        let prefix = format!("{}-buffer-", config.name);
        let mut paths: Vec<PathBuf> = err_at!(IOError, fs::read_dir(&dir))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .map_or(false, |n| n.starts_with(&prefix))
            })
            .collect();
        paths.sort();

        let mut journals = Vec::new();
        for path in paths {
            journals.push(Journal::open(path)?);
        }
        if journals.is_empty() {
            journals.push(Journal::create(dir.as_path(), &config.name, 0, 1)?);
        }

        let journal_no = journals.len() - 1;
        let last_seqno = journals.last().map(|j| j.seqno_end).unwrap_or(0);
        // Every page already on disk is undrained from this process's point of
        // view: `load` never implies the engine has re-flushed them yet.
        let mut undrained = 0u64;
        for journal in &journals {
            undrained += journal.iter()?.len() as u64;
        }
        Buffer::spawn(config, journals, journal_no, last_seqno, undrained)
    }

    fn spawn(config: Config, journals: Vec<Journal>, journal_no: usize, last_seqno: u64, undrained: u64) -> Result<Buffer> {
        let seqno = Arc::new(AtomicU64::new(last_seqno));
        let seqno_clone = seqno.clone();
        let undrained = Arc::new(AtomicU64::new(undrained));
        let mut state = State { config: config.clone(), journals, journal_no };

        let thread = util::Thread::new("buffer", move |rx| {
            move || {
                for (req, reply) in rx {
                    let res = match req {
                        Req::Append(payload) => {
                            let seqno = seqno_clone.fetch_add(1, Ordering::SeqCst) + 1;
                            let res = state.append(seqno, &payload).map(|_| seqno);
                            Res::Appended(res.unwrap_or(0))
                        }
                    };
                    if let Some(tx) = reply {
                        tx.send(res).ok();
                    }
                }
            }
        });

        Ok(Buffer { config, seqno, undrained, thread: Arc::new(thread) })
    }

    /// Append `payload` and return the `seqno` it was assigned. Rejected with
    /// `Error::Capacity` once the number of pages appended but not yet
    /// `mark_drained`-ed reaches `config.max_undrained`: a back-pressure
    /// signal for the caller to retry after the next flush, not a bug.
    pub fn append(&self, payload: &[u8]) -> Result<u64> {
        if self.undrained.load(Ordering::SeqCst) >= self.config.max_undrained {
            return err_at!(
                Capacity,
                msg: "buffer {} has {} undrained pages, at capacity {}",
                self.config.name,
                self.undrained.load(Ordering::SeqCst),
                self.config.max_undrained
            );
        }
        let seqno = match self.thread.to_tx().request(Req::Append(payload.to_vec()))? {
            Res::Appended(seqno) if seqno != 0 => Ok(seqno),
            Res::Appended(_) => err_at!(IOError, msg: "buffer append failed"),
        }?;
        self.undrained.fetch_add(1, Ordering::SeqCst);
        Ok(seqno)
    }

    /// Record that `count` of the oldest undrained pages have been folded
    /// into the segment store, making room for further appends.
    pub fn mark_drained(&self, count: u64) {
        self.undrained.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |u| Some(u.saturating_sub(count))).ok();
    }

    pub fn undrained_count(&self) -> u64 {
        self.undrained.load(Ordering::SeqCst)
    }

    pub fn to_current_seqno(&self) -> u64 {
        self.seqno.load(Ordering::SeqCst)
    }

    /// Replay every committed payload in `seqno` order, oldest first.
    pub fn iter(&self) -> Result<Vec<(u64, Vec<u8>)>> {
        let dir = PathBuf::from(&self.config.dir);
        let prefix = format!("{}-buffer-", self.config.name);
        let mut paths: Vec<PathBuf> = err_at!(IOError, fs::read_dir(&dir))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .map_or(false, |n| n.starts_with(&prefix))
            })
            .collect();
        paths.sort();

        let mut out = Vec::new();
        for path in paths {
            out.extend(Journal::open(path)?.iter()?);
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "wal_test.rs"]
mod wal_test;
