#![forbid(unsafe_code)]

//! Keyed-hash primitive and authenticated packet protocol for rf433.

pub mod hash;
pub mod packet;
pub mod pairing;

pub use hash::{keyed_digest, Secret};
pub use packet::{
    authenticate, authenticate_packet, encode_packet, encode_resync, AuthOutcome, Packet,
    MAC_SIZE, PAYLOAD_SIZE,
};
pub use pairing::{Pairing, PairingError};
