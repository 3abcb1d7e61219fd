#![forbid(unsafe_code)]

//! Shared wire constants and host-facing utilities for the rf433 link.
//!
//! Everything on the air is built from 5-bit symbols: 31 of them form one
//! Reed-Solomon codeword carrying a 105-bit authenticated packet. The
//! geometry below is fixed by the wire format and must not be altered.

pub mod config;
pub mod error;
pub mod store;

pub use config::LinkConfig;
pub use error::{Error, Result};

/// Bits per radio symbol.
pub const SYMBOL_BITS: usize = 5;

/// Symbols per transmitted frame (one RS codeword).
pub const FRAME_SYMBOLS: usize = 31;

/// Data-role symbols per frame.
pub const DATA_SYMBOLS: usize = 21;

/// Parity-role symbols per frame.
pub const PARITY_SYMBOLS: usize = 10;

/// Bits carried by the data symbols of one frame.
pub const FRAME_PAYLOAD_BITS: usize = DATA_SYMBOLS * SYMBOL_BITS;

/// Packed byte size of the 105-bit frame payload (the last byte is
/// only partially used).
pub const PACKED_BYTES: usize = (FRAME_PAYLOAD_BITS + 7) / 8;

/// Symbol values at or above this value mark an erasure: the framer knew
/// a symbol slot passed but could not trust its bits.
pub const ERASURE: u8 = 1 << SYMBOL_BITS;

/// One frame of raw symbols, as handed from the framer to the FEC stage.
pub type Frame = [u8; FRAME_SYMBOLS];
