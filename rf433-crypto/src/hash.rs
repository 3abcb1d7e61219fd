#![forbid(unsafe_code)]

//! Two-pass keyed digest with the message counter folded into the key.
//!
//! This is deliberately *not* textbook HMAC. The 64-byte key block is built
//! from the shared secret followed by the raw little-endian counter, so the
//! two ends derive the same per-message key once their counters agree and
//! only the counter's low byte ever needs to travel on the air. The
//! construction is a wire-compatibility contract; do not "fix" it.
//!
//! Equivalently: `digest = HMAC-SHA256(secret zero-padded to 56 bytes ∥
//! counter_le, message)`.

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Output size of the digest in bytes.
pub const DIGEST_SIZE: usize = 32;

/// SHA-256 block size; the keyed block is exactly one of these.
pub const BLOCK_SIZE: usize = 64;

/// Usable secret length: one block minus the 8 bytes the counter occupies.
pub const MAX_SECRET_SIZE: usize = BLOCK_SIZE - 8;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// Pre-shared pairing secret, held canonically at full width: shorter
/// inputs are zero padded to [`MAX_SECRET_SIZE`], longer ones truncated.
/// Both ends of a pairing therefore build the same key block whether the
/// secret came from a fixed-size pairing file or from raw bytes. The
/// material is wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret {
    bytes: Vec<u8>,
}

impl Secret {
    pub fn new(bytes: &[u8]) -> Self {
        let mut padded = vec![0u8; MAX_SECRET_SIZE];
        for (dst, src) in padded.iter_mut().zip(bytes) {
            *dst = *src;
        }
        Self { bytes: padded }
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        write!(f, "Secret({} bytes)", self.bytes.len())
    }
}

/// Compute the 32-byte keyed digest of `message` under `secret` and
/// `counter`.
pub fn keyed_digest(secret: &Secret, counter: u64, message: &[u8]) -> [u8; DIGEST_SIZE] {
    let key = secret.as_bytes();
    let mut block = [IPAD; BLOCK_SIZE];
    for (b, k) in block.iter_mut().zip(key) {
        *b = k ^ IPAD;
    }
    for (b, c) in block[key.len()..].iter_mut().zip(counter.to_le_bytes()) {
        *b = c ^ IPAD;
    }

    let mut hasher = Sha256::new();
    hasher.update(block);
    hasher.update(message);
    let inner = hasher.finalize();

    for b in block.iter_mut() {
        *b ^= OPAD ^ IPAD;
    }
    let mut hasher = Sha256::new();
    hasher.update(block);
    hasher.update(inner);
    let digest = hasher.finalize();
    block.zeroize();

    digest.into()
}
