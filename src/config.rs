//! Top-level configuration for an `Engine`: where it lives on disk, how its
//! write-ahead buffer rotates and fsyncs, how many workers tokenize
//! committed revisions for full-text search, and how often the background
//! transporter folds the buffer into segment storage.

use std::{ffi, fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{buffer, err_at, util, Result};

/// Default interval, in milliseconds, between background `flush()` calls.
pub const FLUSH_INTERVAL_MS: u64 = 5_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub name: String,
    pub dir: PathBuf,
    pub journal_limit: usize,
    pub fsync: bool,
    pub search_pool_size: usize,
    pub flush_interval_ms: u64,
    pub max_undrained: u64,
}

impl Config {
    pub fn new<S: Into<String>>(name: S, dir: PathBuf) -> Config {
        Config {
            name: name.into(),
            dir,
            journal_limit: buffer::JOURNAL_LIMIT,
            fsync: true,
            search_pool_size: num_cpus::get().max(1),
            flush_interval_ms: FLUSH_INTERVAL_MS,
            max_undrained: buffer::MAX_UNDRAINED,
        }
    }

    pub fn set_journal_limit(mut self, limit: usize) -> Config {
        self.journal_limit = limit;
        self
    }

    pub fn set_fsync(mut self, fsync: bool) -> Config {
        self.fsync = fsync;
        self
    }

    pub fn set_search_pool_size(mut self, size: usize) -> Config {
        self.search_pool_size = size.max(1);
        self
    }

    pub fn set_flush_interval_ms(mut self, ms: u64) -> Config {
        self.flush_interval_ms = ms;
        self
    }

    pub fn set_max_undrained(mut self, max_undrained: u64) -> Config {
        self.max_undrained = max_undrained;
        self
    }

    pub fn buffer_config(&self) -> buffer::Config {
        buffer::Config::new(self.name.clone(), ffi::OsString::from(&self.dir))
            .set_journal_limit(self.journal_limit)
            .set_fsync(self.fsync)
            .set_max_undrained(self.max_undrained)
    }

    /// Load configuration from a TOML file at `path`, falling back to
    /// defaults rooted at `path`'s parent directory if it does not exist.
    pub fn load(path: &std::path::Path) -> Result<Config> {
        if !path.exists() {
            let dir = path.parent().unwrap_or_else(|| std::path::Path::new(".")).to_path_buf();
            return Ok(Config::new("epochdb", dir));
        }
        util::load_toml(path)
    }

    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let text = err_at!(InvalidArgument, toml::to_string_pretty(self))?;
        err_at!(IOError, fs::write(path, text))
    }
}

impl<'a> arbitrary::Arbitrary<'a> for Config {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Config> {
        use std::env;

        let name: String = u.arbitrary()?;
        let dir = env::temp_dir();
        let journal_limit: usize = u.arbitrary()?;
        let fsync: bool = u.arbitrary()?;
        let search_pool_size: u8 = u.arbitrary()?;
        let flush_interval_ms: u64 = u.arbitrary()?;
        let max_undrained: u64 = u.arbitrary()?;
        Ok(Config {
            name,
            dir,
            journal_limit,
            fsync,
            search_pool_size: (search_pool_size as usize).max(1),
            flush_interval_ms,
            max_undrained,
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
