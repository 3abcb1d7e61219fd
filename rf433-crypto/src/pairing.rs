#![forbid(unsafe_code)]

//! Sender-side pairing state: the shared secret and the transmit counter,
//! persisted together in a small fixed-layout file (8-byte little-endian
//! counter followed by the 56-byte secret).

use std::fs;
use std::path::Path;

use thiserror::Error;
use zeroize::Zeroize;

use crate::hash::{Secret, MAX_SECRET_SIZE};

/// On-disk size: counter plus full-width secret.
pub const PAIRING_FILE_SIZE: usize = 8 + MAX_SECRET_SIZE;

#[derive(Debug, Error)]
pub enum PairingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pairing file is {0} bytes, expected {PAIRING_FILE_SIZE}")]
    BadLength(usize),
}

/// One transmitter's pairing with a receiver.
pub struct Pairing {
    pub counter: u64,
    secret: [u8; MAX_SECRET_SIZE],
}

impl Pairing {
    /// Create a fresh pairing. Secrets shorter than [`MAX_SECRET_SIZE`] are
    /// zero padded to full width, exactly as the fixed-size file stores
    /// them; longer ones are truncated.
    pub fn new(secret_bytes: &[u8], counter: u64) -> Self {
        let mut secret = [0u8; MAX_SECRET_SIZE];
        for (dst, src) in secret.iter_mut().zip(secret_bytes) {
            *dst = *src;
        }
        Self { counter, secret }
    }

    /// Load pairing state from `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PairingError> {
        let data = fs::read(path)?;
        if data.len() != PAIRING_FILE_SIZE {
            return Err(PairingError::BadLength(data.len()));
        }
        let mut counter_bytes = [0u8; 8];
        counter_bytes.copy_from_slice(&data[..8]);
        let mut secret = [0u8; MAX_SECRET_SIZE];
        secret.copy_from_slice(&data[8..]);
        Ok(Self {
            counter: u64::from_le_bytes(counter_bytes),
            secret,
        })
    }

    /// Persist the current counter and secret to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PairingError> {
        let mut data = Vec::with_capacity(PAIRING_FILE_SIZE);
        data.extend_from_slice(&self.counter.to_le_bytes());
        data.extend_from_slice(&self.secret);
        fs::write(path, &data)?;
        data.zeroize();
        Ok(())
    }

    /// The full-width secret as key material.
    pub fn secret(&self) -> Secret {
        Secret::new(&self.secret)
    }
}

impl std::fmt::Debug for Pairing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("Pairing")
            .field("counter", &self.counter)
            .finish_non_exhaustive()
    }
}

impl Drop for Pairing {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}
