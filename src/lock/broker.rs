//! Busy-polling latch-and-spin gates, one per live token, handed out from a
//! shared map. Gates are reclaimed once their reader/writer count drops to
//! zero and no other thread is racing to reuse them.
//!
//! `Record`/`Field` tokens are exact-match: two callers contend only if
//! they name the same record (or field). `Range` tokens are overlap-match:
//! a writer on `age BETWEEN 0 10` also has to wait out a reader on
//! `age = 5`, even though the tokens aren't equal, because their value
//! intervals intersect. Overlap-match tokens can't live in the exact-match
//! map, so they get their own registry the broker scans linearly.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    thread,
};

use super::Token;

const LATCH_FLAG: u64 = 0x4000_0000_0000_0000;
const LOCK_FLAG: u64 = 0x8000_0000_0000_0000;
const LATCH_LOCK_FLAG: u64 = LATCH_FLAG | LOCK_FLAG;
const READERS_FLAG: u64 = 0x3FFF_FFFF_FFFF_FFFF;

/// Latch-and-spin door: readers may pass while neither latched nor locked;
/// a writer latches the door, waits for in-flight readers to drain, then
/// locks it exclusively. A record's door is shared by every caller: a
/// `select` takes it as a reader (shareable, many concurrent holders), an
/// `add`/`remove`/`set` takes it as the writer (exclusive, excludes every
/// reader and every other writer).
struct Gate(AtomicU64);

impl Gate {
    fn new() -> Gate {
        Gate(AtomicU64::new(0))
    }

    fn is_idle(&self) -> bool {
        self.0.load(Ordering::Relaxed) == 0
    }

    fn is_write_locked(&self) -> bool {
        (self.0.load(Ordering::Relaxed) & LOCK_FLAG) != 0
    }

    fn acquire_read(&self) {
        loop {
            let c = self.0.load(Ordering::Relaxed);
            if (c & LATCH_LOCK_FLAG) != 0 {
                thread::yield_now();
                continue;
            }
            if self.0.compare_exchange(c, c + 1, Ordering::Relaxed, Ordering::Relaxed).is_ok() {
                break;
            }
        }
    }

    fn try_acquire_read(&self) -> bool {
        let c = self.0.load(Ordering::Relaxed);
        if (c & LATCH_LOCK_FLAG) != 0 {
            return false;
        }
        self.0.compare_exchange(c, c + 1, Ordering::Relaxed, Ordering::Relaxed).is_ok()
    }

    fn release_read(&self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }

    fn acquire_write(&self) {
        loop {
            let c = self.0.load(Ordering::Relaxed);
            if (c & LATCH_FLAG) != 0 {
                thread::yield_now();
                continue;
            }
            if self.0.compare_exchange(c, c | LATCH_FLAG, Ordering::Relaxed, Ordering::Relaxed).is_ok() {
                break;
            }
        }
        loop {
            let c = self.0.load(Ordering::Relaxed);
            if (c & READERS_FLAG) > 0 {
                thread::yield_now();
                continue;
            }
            if self.0.compare_exchange(c, c | LOCK_FLAG, Ordering::Relaxed, Ordering::Relaxed).is_ok() {
                break;
            }
        }
    }

    /// Single attempt, no spin: latch and lock only if both are free right
    /// now, otherwise give up immediately.
    fn try_acquire_write(&self) -> bool {
        let c = self.0.load(Ordering::Relaxed);
        if (c & LATCH_LOCK_FLAG) != 0 || (c & READERS_FLAG) > 0 {
            return false;
        }
        self.0.compare_exchange(c, c | LATCH_LOCK_FLAG, Ordering::Relaxed, Ordering::Relaxed).is_ok()
    }

    fn release_write(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

/// RAII read permission on a `Token`. Released on drop.
pub struct ReadLock {
    broker: Arc<Inner>,
    token: Token,
}

impl Drop for ReadLock {
    fn drop(&mut self) {
        self.broker.release_read(&self.token);
    }
}

/// RAII write permission on a `Token`. Released on drop.
pub struct WriteLock {
    broker: Arc<Inner>,
    token: Token,
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        self.broker.release_write(&self.token);
    }
}

struct RangeGate {
    token: Token,
    gate: Arc<Gate>,
}

struct Inner {
    gates: Mutex<HashMap<Token, Arc<Gate>>>,
    ranges: Mutex<Vec<RangeGate>>,
}

impl Inner {
    fn gate_for(&self, token: &Token) -> Arc<Gate> {
        let mut gates = self.gates.lock().unwrap();
        gates.entry(token.clone()).or_insert_with(|| Arc::new(Gate::new())).clone()
    }

    /// This range token's own gate, creating and registering it on first
    /// use. Stale entries (idle, held by nobody but the registry itself)
    /// are pruned opportunistically so the registry doesn't grow without
    /// bound across a long-running process.
    fn range_gate(&self, token: &Token) -> Arc<Gate> {
        let mut ranges = self.ranges.lock().unwrap();
        ranges.retain(|rg| !rg.gate.is_idle() || Arc::strong_count(&rg.gate) > 1);
        if let Some(rg) = ranges.iter().find(|rg| &rg.token == token) {
            return rg.gate.clone();
        }
        let gate = Arc::new(Gate::new());
        ranges.push(RangeGate { token: token.clone(), gate: gate.clone() });
        gate
    }

    /// Every currently registered range gate whose token overlaps `token`,
    /// `token`'s own gate included once it has been registered.
    fn overlapping_gates(&self, token: &Token) -> Vec<Arc<Gate>> {
        let ranges = self.ranges.lock().unwrap();
        ranges.iter().filter(|rg| rg.token.overlaps_range(token)).map(|rg| rg.gate.clone()).collect()
    }

    fn release_read(&self, token: &Token) {
        match token {
            Token::Range(..) => self.range_gate(token).release_read(),
            _ => self.gate_for(token).release_read(),
        }
    }

    fn release_write(&self, token: &Token) {
        match token {
            Token::Range(..) => self.range_gate(token).release_write(),
            _ => self.gate_for(token).release_write(),
        }
    }
}

/// Hands out per-token latch-and-spin gates to callers that need to hold a
/// record, a field, or a key's value-range stable while they read or write
/// through it. Disjoint tokens never contend; two write-holders of the same
/// token, or of two overlapping range tokens, always serialize.
pub struct Broker(Arc<Inner>);

impl Broker {
    pub fn new() -> Broker {
        Broker(Arc::new(Inner { gates: Mutex::new(HashMap::new()), ranges: Mutex::new(Vec::new()) }))
    }

    pub fn acquire_read(&self, token: Token) -> ReadLock {
        match &token {
            Token::Range(..) => loop {
                if self.0.overlapping_gates(&token).iter().all(|g| !g.is_write_locked()) {
                    self.0.range_gate(&token).acquire_read();
                    break;
                }
                thread::yield_now();
            },
            _ => self.0.gate_for(&token).acquire_read(),
        }
        ReadLock { broker: self.0.clone(), token }
    }

    pub fn acquire_write(&self, token: Token) -> WriteLock {
        match &token {
            Token::Range(..) => loop {
                if self.0.overlapping_gates(&token).iter().all(|g| g.is_idle()) {
                    self.0.range_gate(&token).acquire_write();
                    break;
                }
                thread::yield_now();
            },
            _ => self.0.gate_for(&token).acquire_write(),
        }
        WriteLock { broker: self.0.clone(), token }
    }

    /// Non-blocking `acquire_read`: `None` if the token (or, for a range
    /// token, anything it overlaps) is currently write-locked.
    pub fn try_read_lock(&self, token: Token) -> Option<ReadLock> {
        let ok = match &token {
            Token::Range(..) => {
                self.0.overlapping_gates(&token).iter().all(|g| !g.is_write_locked())
                    && self.0.range_gate(&token).try_acquire_read()
            }
            _ => self.0.gate_for(&token).try_acquire_read(),
        };
        ok.then(|| ReadLock { broker: self.0.clone(), token })
    }

    /// Non-blocking `acquire_write`: `None` if the token (or, for a range
    /// token, anything it overlaps) is currently held at all.
    pub fn try_write_lock(&self, token: Token) -> Option<WriteLock> {
        let ok = match &token {
            Token::Range(..) => {
                self.0.overlapping_gates(&token).iter().all(|g| g.is_idle())
                    && self.0.range_gate(&token).try_acquire_write()
            }
            _ => self.0.gate_for(&token).try_acquire_write(),
        };
        ok.then(|| WriteLock { broker: self.0.clone(), token })
    }
}

impl Default for Broker {
    fn default() -> Broker {
        Broker::new()
    }
}

#[cfg(test)]
#[path = "broker_test.rs"]
mod broker_test;
