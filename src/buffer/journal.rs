//! A single append-only journal file: `[seqno:8][len:4][payload][crc32:4]`
//! repeated. A trailing short record (the tail of a crash mid-write) is
//! silently dropped by the reader rather than treated as corruption.

use crc::{Crc, CRC_32_ISO_HDLC};

use std::{
    convert::TryFrom,
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use crate::{err_at, util, Result};

const CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);
const HEADER_LEN: usize = 12;

pub struct Journal {
    path: PathBuf,
    fd: fs::File,
    pub seqno_start: u64,
    pub seqno_end: u64,
    size: usize,
}

impl Journal {
    pub fn create(dir: &Path, name: &str, journal_no: usize, seqno: u64) -> Result<Journal> {
        let path = journal_path(dir, name, journal_no);
        let fd = util::create_file_a(path.as_os_str())?;
        Ok(Journal { path, fd, seqno_start: seqno, seqno_end: seqno, size: 0 })
    }

    pub fn open(path: PathBuf) -> Result<Journal> {
        let fd = util::open_file_a(path.as_os_str())?;
        let (seqno_start, seqno_end, size) = scan(&path)?;
        Ok(Journal { path, fd, seqno_start, seqno_end, size })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn append(&mut self, seqno: u64, payload: &[u8], fsync: bool) -> Result<()> {
        let mut record = Vec::with_capacity(HEADER_LEN + payload.len());
        record.extend_from_slice(&seqno.to_be_bytes());
        record.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        record.extend_from_slice(payload);
        let crc = CRC.checksum(&record);
        record.extend_from_slice(&crc.to_be_bytes());

        if fsync {
            util::sync_write(&mut self.fd, &record)?;
        } else {
            use std::io::Write;
            err_at!(IOError, self.fd.write_all(&record))?;
        }
        self.size += record.len();
        self.seqno_end = seqno;
        Ok(())
    }

    /// Replay every well-formed record in this journal, oldest first.
    pub fn iter(&self) -> Result<Vec<(u64, Vec<u8>)>> {
        let mut fd = util::open_file_r(self.path.as_os_str())?;
        let mut data = Vec::new();
        err_at!(IOError, fd.read_to_end(&mut data))?;
        Ok(parse_all(&data))
    }
}

fn journal_path(dir: &Path, name: &str, journal_no: usize) -> PathBuf {
    dir.join(format!("{}-buffer-{:08}.journal", name, journal_no))
}

fn scan(path: &Path) -> Result<(u64, u64, usize)> {
    let mut fd = err_at!(IOError, fs::File::open(path))?;
    let mut data = Vec::new();
    err_at!(IOError, fd.read_to_end(&mut data))?;
    let records = parse_all(&data);
    match (records.first(), records.last()) {
        (Some((first, _)), Some((last, _))) => Ok((*first, *last, data.len())),
        _ => Ok((0, 0, 0)),
    }
}

fn parse_all(data: &[u8]) -> Vec<(u64, Vec<u8>)> {
    let mut out = Vec::new();
    let mut offset = 0;
    while offset + HEADER_LEN <= data.len() {
        let seqno = u64::from_be_bytes(<[u8; 8]>::try_from(&data[offset..offset + 8]).unwrap());
        let len =
            u32::from_be_bytes(<[u8; 4]>::try_from(&data[offset + 8..offset + 12]).unwrap())
                as usize;
        let record_len = HEADER_LEN + len + 4;
        if offset + record_len > data.len() {
            break; // short tail from a crash mid-write.
        }
        let record = &data[offset..offset + HEADER_LEN + len];
        let want_crc = CRC.checksum(record);
        let got_crc = u32::from_be_bytes(
            <[u8; 4]>::try_from(&data[offset + HEADER_LEN + len..offset + record_len]).unwrap(),
        );
        if want_crc != got_crc {
            break; // torn write, stop replay here.
        }
        out.push((seqno, data[offset + HEADER_LEN..offset + HEADER_LEN + len].to_vec()));
        offset += record_len;
    }
    out
}

#[cfg(test)]
#[path = "journal_test.rs"]
mod journal_test;
