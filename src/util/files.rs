//! File-system helpers: create/open files for the buffer and segment store,
//! directory walking for segment discovery, and TOML config loading.

use serde::de::DeserializeOwned;

use std::{ffi, fs, path};

use crate::{err_at, Result};

/// create a file in append mode for writing.
pub fn create_file_a(file: &ffi::OsStr) -> Result<fs::File> {
    let os_file = {
        let os_file = path::Path::new(file);
        fs::remove_file(os_file).ok(); // NOTE: ignore remove errors.
        os_file
    };

    {
        let parent = match os_file.parent() {
            Some(parent) => Ok(parent),
            None => err_at!(InvalidArgument, msg: "no parent dir for {:?}", file),
        }?;
        err_at!(IOError, fs::create_dir_all(parent))?;
    };

    let mut opts = fs::OpenOptions::new();
    err_at!(IOError, opts.append(true).create_new(true).open(os_file))
}

/// open existing file in append mode for writing.
pub fn open_file_a(file: &ffi::OsStr) -> Result<fs::File> {
    let os_file = path::Path::new(file);
    let mut opts = fs::OpenOptions::new();
    err_at!(IOError, opts.append(true).open(os_file))
}

/// open file for reading.
pub fn open_file_r(file: &ffi::OsStr) -> Result<fs::File> {
    let os_file = path::Path::new(file);
    err_at!(IOError, fs::OpenOptions::new().read(true).open(os_file))
}

pub fn sync_write(file: &mut fs::File, data: &[u8]) -> Result<usize> {
    use std::io::Write;

    let n = err_at!(IOError, file.write(data))?;
    if n != data.len() {
        err_at!(IOError, msg: "partial write to file {} {}", n, data.len())?;
    }
    err_at!(IOError, file.sync_all())?;
    Ok(n)
}

pub enum WalkRes {
    Ok,
    SkipDir,
}

/// Breadth first directory walking, used to discover segment files and
/// buffer pages on environment load.
///
/// `callb` arguments:
///
/// * _state_, as mutable reference, user supplied and exist for the duration of walk.
/// * _parent_, path to parent under which this entry is found.
/// * _dir_entry_, for each entry in a sub-directory.
/// * _depth_, depth level at which _dir-entry_ is located, start with ZERO.
/// * _breath_, index of _dir-entry_ as stored in its parent directory, start with ZERO.
pub fn walk<P, S, F>(root: P, state: S, mut callb: F) -> Result<S>
where
    P: AsRef<path::Path>,
    F: FnMut(&mut S, &path::Path, &fs::DirEntry, usize, usize) -> Result<WalkRes>,
{
    let depth = 0;
    do_walk(root, state, &mut callb, depth)
}

fn do_walk<P, S, F>(parent: P, mut state: S, callb: &mut F, depth: usize) -> Result<S>
where
    P: AsRef<path::Path>,
    F: FnMut(&mut S, &path::Path, &fs::DirEntry, usize, usize) -> Result<WalkRes>,
{
    let mut subdirs = vec![];

    let parent = {
        let parent: &path::Path = parent.as_ref();
        parent.to_path_buf()
    };
    let dirs = err_at!(IOError, fs::read_dir(&parent), "read_dir({:?})", parent)?;
    for (breath, entry) in dirs.enumerate() {
        let entry = err_at!(IOError, entry)?;
        match callb(&mut state, &parent, &entry, depth, breath)? {
            WalkRes::Ok if err_at!(IOError, entry.file_type())?.is_dir() => {
                subdirs.push(entry)
            }
            WalkRes::Ok | WalkRes::SkipDir => (),
        }
    }

    for subdir in subdirs.into_iter() {
        state = do_walk(subdir.path(), state, callb, depth + 1)?;
    }

    Ok(state)
}

/// Load toml file and parse it into type `T`.
pub fn load_toml<P, T>(loc: P) -> Result<T>
where
    P: AsRef<path::Path>,
    T: DeserializeOwned,
{
    use std::str::from_utf8;

    let ploc: &path::Path = loc.as_ref();
    let data = err_at!(IOError, fs::read(ploc))?;
    let s = err_at!(FailConvert, from_utf8(&data), "not utf8 for {:?}", ploc)?;
    err_at!(FailConvert, toml::from_str(s), "file:{:?}", ploc)
}

#[cfg(test)]
#[path = "files_test.rs"]
mod files_test;
