#![forbid(unsafe_code)]

//! Durable storage for the anti-replay counter.
//!
//! The host supplies only single-byte `read`/`write` primitives (battery
//! backed RAM, EEPROM, a file). On top of those this module keeps two
//! 8-byte counter slots and a state byte selecting the currently valid one.
//! Every save writes the *other* slot first and flips the state byte last,
//! so a write torn by power loss leaves the previous counter intact.
//!
//! Two fixed check bytes guard the layout. If they do not verify at boot
//! the store is reformatted and the counter restarts at 1; this is the only
//! failure the operator-visible layer is ever told about.

use tracing::warn;

use crate::{Error, Result};

const COUNTER_0_ADDR: u8 = 0x00;
const COUNTER_1_ADDR: u8 = 0x08;
const CHECK_BYTE_1_ADDR: u8 = 0x10;
const STATE_ADDR: u8 = 0x11;
const CHECK_BYTE_2_ADDR: u8 = 0x12;

const CHECK_BYTE_1_VALUE: u8 = 0xae;
const CHECK_BYTE_2_VALUE: u8 = 0xc2;

/// Number of addressable bytes the counter layout occupies.
pub const STORE_SIZE: usize = 0x13;

/// Byte-granular durable storage supplied by the host.
pub trait ByteStore {
    fn read(&self, addr: u8) -> u8;
    fn write(&mut self, addr: u8, value: u8);
}

/// Volatile `ByteStore` for tests and hosts without real NVRAM.
#[derive(Debug, Clone)]
pub struct MemStore {
    bytes: [u8; STORE_SIZE],
}

impl MemStore {
    pub fn new() -> Self {
        Self { bytes: [0; STORE_SIZE] }
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteStore for MemStore {
    fn read(&self, addr: u8) -> u8 {
        self.bytes[addr as usize]
    }

    fn write(&mut self, addr: u8, value: u8) {
        self.bytes[addr as usize] = value;
    }
}

/// Dual-slot persisted view of the 64-bit receive counter.
pub struct CounterStore<S: ByteStore> {
    store: S,
    reformatted: bool,
}

impl<S: ByteStore> CounterStore<S> {
    /// Open the store, verifying the check bytes. A store that fails the
    /// integrity check is reformatted with the counter set to 1.
    pub fn open(mut store: S) -> Result<Self> {
        let state = store.read(STATE_ADDR);
        let intact = store.read(CHECK_BYTE_1_ADDR) == CHECK_BYTE_1_VALUE
            && store.read(CHECK_BYTE_2_ADDR) == CHECK_BYTE_2_VALUE
            && state <= 1;
        if intact {
            return Ok(Self { store, reformatted: false });
        }

        warn!("counter store failed integrity check, reformatting");
        store.write(CHECK_BYTE_1_ADDR, CHECK_BYTE_1_VALUE);
        store.write(CHECK_BYTE_2_ADDR, CHECK_BYTE_2_VALUE);
        store.write(STATE_ADDR, 0);
        if store.read(CHECK_BYTE_1_ADDR) != CHECK_BYTE_1_VALUE
            || store.read(CHECK_BYTE_2_ADDR) != CHECK_BYTE_2_VALUE
        {
            return Err(Error::StoreUnwritable);
        }
        let mut this = Self { store, reformatted: true };
        this.save(1);
        Ok(this)
    }

    /// True if `open` found garbage and had to reinitialize the counter.
    pub fn reformatted(&self) -> bool {
        self.reformatted
    }

    /// Read the counter from the currently valid slot.
    pub fn load(&self) -> u64 {
        let base = if self.store.read(STATE_ADDR) & 1 == 1 {
            COUNTER_1_ADDR
        } else {
            COUNTER_0_ADDR
        };
        let mut bytes = [0u8; 8];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = self.store.read(base + i as u8);
        }
        u64::from_le_bytes(bytes)
    }

    /// Persist a new counter value into the slot that is not currently
    /// valid, then flip the state byte to make it the valid one.
    pub fn save(&mut self, counter: u64) {
        let new_state = self.store.read(STATE_ADDR) ^ 1;
        let base = if new_state & 1 == 1 {
            COUNTER_1_ADDR
        } else {
            COUNTER_0_ADDR
        };
        for (i, b) in counter.to_le_bytes().iter().enumerate() {
            self.store.write(base + i as u8, *b);
        }
        self.store.write(STATE_ADDR, new_state);
    }

    /// Hand the underlying store back to the host.
    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_store_reformats_to_one() {
        let cs = CounterStore::open(MemStore::new()).unwrap();
        assert!(cs.reformatted());
        assert_eq!(cs.load(), 1);
    }

    #[test]
    fn save_and_reload_survive_reopen() {
        let mut cs = CounterStore::open(MemStore::new()).unwrap();
        cs.save(0x0123_4567_89ab_cdef);
        let inner = cs.into_inner();
        let cs = CounterStore::open(inner).unwrap();
        assert!(!cs.reformatted());
        assert_eq!(cs.load(), 0x0123_4567_89ab_cdef);
    }

    #[test]
    fn saves_alternate_slots() {
        let mut cs = CounterStore::open(MemStore::new()).unwrap();
        cs.save(10);
        cs.save(11);
        // The older value must still be present in the other slot: corrupt
        // the state byte and the previous save shows through.
        let mut inner = cs.into_inner();
        let state = inner.read(STATE_ADDR);
        inner.write(STATE_ADDR, state ^ 1);
        let cs = CounterStore::open(inner).unwrap();
        assert_eq!(cs.load(), 10);
    }

    #[test]
    fn corrupt_check_byte_triggers_reformat() {
        let mut cs = CounterStore::open(MemStore::new()).unwrap();
        cs.save(500);
        let mut inner = cs.into_inner();
        inner.write(CHECK_BYTE_1_ADDR, 0x00);
        let cs = CounterStore::open(inner).unwrap();
        assert!(cs.reformatted());
        assert_eq!(cs.load(), 1);
    }
}
