#![forbid(unsafe_code)]

//! Authenticated packet layout and counter bookkeeping.
//!
//! One 105-bit frame payload carries: 6 opaque payload bytes, the low byte
//! of the 64-bit message counter, a 48-bit truncated MAC, and a single
//! resynchronization flag bit. Ordinary packets extend the persisted
//! counter's low byte, assuming it only ever wrapped forward; a resync
//! packet transmits the counter's high 56 bits directly to re-establish
//! agreement after larger drift.

use rf433_core::PACKED_BYTES;
use subtle::ConstantTimeEq;

use crate::hash::{keyed_digest, Secret};

/// Opaque payload bytes per packet.
pub const PAYLOAD_SIZE: usize = 6;

/// Truncated MAC size in bytes (48 bits).
pub const MAC_SIZE: usize = 6;

/// Decoded application-level packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    pub payload: [u8; PAYLOAD_SIZE],
    pub counter_low: u8,
    pub mac: [u8; MAC_SIZE],
    /// Set on resynchronization packets, whose payload region carries
    /// counter bits 63..16 instead of opaque data.
    pub resync: bool,
}

impl Packet {
    /// Serialize to the 105-bit wire layout (14 bytes, the final byte
    /// holding only the resync flag in its most significant bit).
    pub fn to_bytes(&self) -> [u8; PACKED_BYTES] {
        let mut out = [0u8; PACKED_BYTES];
        out[..PAYLOAD_SIZE].copy_from_slice(&self.payload);
        out[PAYLOAD_SIZE] = self.counter_low;
        out[PAYLOAD_SIZE + 1..PAYLOAD_SIZE + 1 + MAC_SIZE].copy_from_slice(&self.mac);
        if self.resync {
            out[PACKED_BYTES - 1] = 0x80;
        }
        out
    }

    /// Parse the wire layout. Never fails: all 2^105 bit patterns are
    /// structurally valid and left to the MAC check.
    pub fn from_bytes(bytes: &[u8; PACKED_BYTES]) -> Self {
        let mut payload = [0u8; PAYLOAD_SIZE];
        payload.copy_from_slice(&bytes[..PAYLOAD_SIZE]);
        let mut mac = [0u8; MAC_SIZE];
        mac.copy_from_slice(&bytes[PAYLOAD_SIZE + 1..PAYLOAD_SIZE + 1 + MAC_SIZE]);
        Self {
            payload,
            counter_low: bytes[PAYLOAD_SIZE],
            mac,
            resync: bytes[PACKED_BYTES - 1] & 0x80 != 0,
        }
    }
}

/// Why an incoming packet was accepted or discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Accepted,
    /// MAC mismatch. Garbled and forged packets are indistinguishable.
    MacMismatch,
    /// Resync candidate counter below the persisted counter; rejected
    /// before any MAC work.
    ReplayRejected,
}

/// Candidate counter for an ordinary packet: splice the received low byte
/// into the persisted counter, assuming the low byte wrapped forward
/// (never backward) since the last accepted message.
fn ordinary_candidate(counter: u64, counter_low: u8) -> u64 {
    let candidate = (counter & !0xff) | u64::from(counter_low);
    if candidate < counter {
        candidate.wrapping_add(0x100)
    } else {
        candidate
    }
}

/// Candidate counter for a resync packet: bits 63..16 big-endian in the
/// payload, bits 15..8 in counter_low, bits 7..0 defined as zero.
fn resync_candidate(packet: &Packet) -> u64 {
    let mut high = 0u64;
    for &b in &packet.payload {
        high = (high << 8) | u64::from(b);
    }
    (high << 16) | (u64::from(packet.counter_low) << 8)
}

/// Check `packet` against `secret` and the persisted `counter`, reporting
/// why it was accepted or discarded. On acceptance the counter advances to
/// one past the candidate; otherwise it is left untouched.
pub fn authenticate_packet(secret: &Secret, packet: &Packet, counter: &mut u64) -> AuthOutcome {
    let candidate = if packet.resync {
        let candidate = resync_candidate(packet);
        if candidate < *counter {
            return AuthOutcome::ReplayRejected;
        }
        candidate
    } else {
        ordinary_candidate(*counter, packet.counter_low)
    };

    let digest = keyed_digest(secret, candidate, &packet.payload);
    if bool::from(digest[..MAC_SIZE].ct_eq(&packet.mac)) {
        *counter = candidate.wrapping_add(1);
        AuthOutcome::Accepted
    } else {
        AuthOutcome::MacMismatch
    }
}

/// Accept/reject surface of the protocol: true exactly when the packet
/// authenticated and the counter moved forward.
pub fn authenticate(secret: &Secret, packet: &Packet, counter: &mut u64) -> bool {
    authenticate_packet(secret, packet, counter) == AuthOutcome::Accepted
}

/// Build an ordinary packet: advance the counter by one, splice its low
/// byte into the packet and MAC the payload under the *new* counter value
/// (the one the receiver will reconstruct).
///
/// `payload` longer than [`PAYLOAD_SIZE`] is truncated; shorter payloads
/// are zero padded, matching the wire layout.
pub fn encode_packet(secret: &Secret, payload: &[u8], counter: &mut u64) -> Packet {
    let mut padded = [0u8; PAYLOAD_SIZE];
    for (dst, src) in padded.iter_mut().zip(payload) {
        *dst = *src;
    }
    *counter = counter.wrapping_add(1);
    let digest = keyed_digest(secret, *counter, &padded);
    let mut mac = [0u8; MAC_SIZE];
    mac.copy_from_slice(&digest[..MAC_SIZE]);
    Packet {
        payload: padded,
        counter_low: *counter as u8,
        mac,
        resync: false,
    }
}

/// Build a resynchronization packet: advance the counter to the next
/// multiple of 256 and transmit its high 56 bits in place of a payload.
pub fn encode_resync(secret: &Secret, counter: &mut u64) -> Packet {
    *counter = (*counter & !0xff).wrapping_add(0x100);
    let mut payload = [0u8; PAYLOAD_SIZE];
    for (i, dst) in payload.iter_mut().enumerate() {
        *dst = (*counter >> (56 - 8 * i)) as u8;
    }
    let digest = keyed_digest(secret, *counter, &payload);
    let mut mac = [0u8; MAC_SIZE];
    mac.copy_from_slice(&digest[..MAC_SIZE]);
    Packet {
        payload,
        counter_low: (*counter >> 8) as u8,
        mac,
        resync: true,
    }
}
