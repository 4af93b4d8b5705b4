//! `Xor8`-backed bloom filter: a handful of bytes per key, ~0.3% false
//! positive rate, immutable once built.

use xorfilter::Xor8;

use std::{
    collections::hash_map::DefaultHasher,
    convert::TryFrom,
    hash::Hash,
};

use crate::{check_remaining, err_at, Result};

pub struct Xor8Bloom {
    keys: Vec<u64>,
    filter: Option<Xor8<DefaultHasher>>,
}

impl Default for Xor8Bloom {
    fn default() -> Xor8Bloom {
        Xor8Bloom { keys: Vec::new(), filter: None }
    }
}

fn digest<Q: ?Sized + Hash>(key: &Q) -> u64 {
    use std::hash::Hasher;
    let mut h = DefaultHasher::new();
    key.hash(&mut h);
    h.finish()
}

impl super::Bloom for Xor8Bloom {
    fn len(&self) -> usize {
        self.keys.len()
    }

    fn add_key<Q: ?Sized + Hash>(&mut self, key: &Q) {
        self.keys.push(digest(key));
    }

    fn build(&mut self) -> Result<()> {
        let mut filter = Xor8::<DefaultHasher>::new();
        filter.populate(&self.keys);
        err_at!(Fatal, filter.build())?;
        self.filter = Some(filter);
        Ok(())
    }

    fn contains<Q: ?Sized + Hash>(&self, element: &Q) -> bool {
        match &self.filter {
            Some(filter) => filter.contains(&digest(element)),
            None => true, // not built yet, behave as a dummy bitmap.
        }
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        let filter = match &self.filter {
            Some(filter) => filter,
            None => err_at!(InvalidArgument, msg: "xor8 filter not built")?,
        };
        let mut buf = Vec::new();
        buf.extend_from_slice(&filter.seed.to_be_bytes());
        buf.extend_from_slice(&(filter.block_length as u64).to_be_bytes());
        buf.extend_from_slice(&(filter.finger_prints.len() as u64).to_be_bytes());
        buf.extend_from_slice(&filter.finger_prints);
        Ok(buf)
    }

    fn from_bytes(buf: &[u8]) -> Result<(Xor8Bloom, usize)> {
        check_remaining!(buf, 24, "xor8-header")?;
        let seed = u64::from_be_bytes(<[u8; 8]>::try_from(&buf[0..8]).unwrap());
        let block_length = u64::from_be_bytes(<[u8; 8]>::try_from(&buf[8..16]).unwrap()) as usize;
        let n = u64::from_be_bytes(<[u8; 8]>::try_from(&buf[16..24]).unwrap()) as usize;
        check_remaining!(buf[24..], n, "xor8-fingerprints")?;

        let mut filter = Xor8::<DefaultHasher>::new();
        filter.seed = seed;
        filter.block_length = block_length;
        filter.finger_prints = buf[24..24 + n].to_vec();

        Ok((Xor8Bloom { keys: Vec::new(), filter: Some(filter) }, 24 + n))
    }
}

#[cfg(test)]
#[path = "xor8_test.rs"]
mod xor8_test;
