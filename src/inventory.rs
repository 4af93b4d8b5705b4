//! Inventory: the set of record ids that currently exist, kept as one
//! roaring bitmap per 2^20 id range so a lookup or scan only ever touches
//! the partitions it actually needs.

use croaring::Bitmap;

use std::{collections::HashMap, sync::RwLock};

use crate::codec::value::PrimaryKey;

const PARTITION_BITS: u32 = 20;
const PARTITION_SIZE: i64 = 1 << PARTITION_BITS;

fn partition_of(record: PrimaryKey) -> (i64, u32) {
    let partition = record.div_euclid(PARTITION_SIZE);
    let offset = record.rem_euclid(PARTITION_SIZE) as u32;
    (partition, offset)
}

/// Partitioned roaring-bitmap index of live record ids.
pub struct Inventory {
    partitions: RwLock<HashMap<i64, Bitmap>>,
}

impl Inventory {
    pub fn new() -> Inventory {
        Inventory { partitions: RwLock::new(HashMap::new()) }
    }

    pub fn add(&self, record: PrimaryKey) {
        let (partition, offset) = partition_of(record);
        let mut partitions = self.partitions.write().unwrap();
        partitions.entry(partition).or_insert_with(Bitmap::create).add(offset);
    }

    pub fn remove(&self, record: PrimaryKey) {
        let (partition, offset) = partition_of(record);
        let mut partitions = self.partitions.write().unwrap();
        if let Some(bitmap) = partitions.get_mut(&partition) {
            bitmap.remove(offset);
        }
    }

    pub fn contains(&self, record: PrimaryKey) -> bool {
        let (partition, offset) = partition_of(record);
        let partitions = self.partitions.read().unwrap();
        partitions.get(&partition).map_or(false, |b| b.contains(offset))
    }

    pub fn len(&self) -> u64 {
        let partitions = self.partitions.read().unwrap();
        partitions.values().map(|b| b.cardinality()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids in ascending order, one partition at a time.
    pub fn iter(&self) -> Vec<PrimaryKey> {
        let partitions = self.partitions.read().unwrap();
        let mut keys: Vec<&i64> = partitions.keys().collect();
        keys.sort();
        let mut out = Vec::new();
        for partition in keys {
            let bitmap = &partitions[partition];
            for offset in bitmap.iter() {
                out.push(partition * PARTITION_SIZE + i64::from(offset));
            }
        }
        out
    }
}

impl Default for Inventory {
    fn default() -> Inventory {
        Inventory::new()
    }
}

#[cfg(test)]
#[path = "inventory_test.rs"]
mod inventory_test;
