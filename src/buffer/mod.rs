//! Buffer: the durable write-ahead log every committed revision passes
//! through before it is folded into the segment store. Readers and writers
//! can proceed concurrently; writes are appended in order and fsync'd
//! according to `Config::fsync`.

mod journal;
mod wal;

pub use wal::Buffer;

use std::ffi;

/// Default journal file-size limit, beyond which the buffer rotates onto a
/// fresh journal file.
pub const JOURNAL_LIMIT: usize = 64 * 1024 * 1024;

/// Default upper bound on pages appended but not yet folded into the
/// segment store. Past this, `Buffer::append` returns `Error::Capacity`
/// rather than growing the backlog without limit.
pub const MAX_UNDRAINED: u64 = 1_000_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub name: String,
    pub dir: ffi::OsString,
    pub journal_limit: usize,
    pub fsync: bool,
    pub max_undrained: u64,
}

impl Config {
    pub fn new<S: Into<String>>(name: S, dir: ffi::OsString) -> Config {
        Config { name: name.into(), dir, journal_limit: JOURNAL_LIMIT, fsync: true, max_undrained: MAX_UNDRAINED }
    }

    pub fn set_journal_limit(mut self, limit: usize) -> Config {
        self.journal_limit = limit;
        self
    }

    pub fn set_fsync(mut self, fsync: bool) -> Config {
        self.fsync = fsync;
        self
    }

    pub fn set_max_undrained(mut self, max_undrained: u64) -> Config {
        self.max_undrained = max_undrained;
        self
    }
}

impl<'a> arbitrary::Arbitrary<'a> for Config {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Config> {
        use std::env;

        let name: String = u.arbitrary()?;
        let dir = env::temp_dir().into_os_string();
        let journal_limit: usize = u.arbitrary()?;
        let fsync: bool = u.arbitrary()?;
        let max_undrained: u64 = u.arbitrary()?;
        Ok(Config { name, dir, journal_limit, fsync, max_undrained })
    }
}
