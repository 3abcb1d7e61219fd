#![forbid(unsafe_code)]

//! Forward error correction for rf433 frames.
//!
//! One frame is 31 five-bit symbols: 21 data symbols carrying a packed
//! 105-bit packet and 10 parity symbols, interleaved two-data-one-parity
//! with the final data symbol appended last. Because the framer's estimate
//! of the frame start can be off by a few symbol slots (clock jitter adding
//! or dropping slots), decoding does not trust alignment: it retries the
//! Reed-Solomon decode over candidate shifts of up to three positions
//! either way, nearest first.

use thiserror::Error;

use rf433_core::{
    Frame, DATA_SYMBOLS, ERASURE, FRAME_SYMBOLS, PACKED_BYTES, PARITY_SYMBOLS, SYMBOL_BITS,
};

mod gf32;
mod rs;

use rs::RsCodec;

/// Maximum frame misalignment (in symbols) the decoder searches over.
pub const MAX_SHIFT: usize = 3;

/// All candidate alignments exhausted without a decodable codeword.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("uncorrectable frame: all alignment candidates exhausted")]
pub struct Uncorrectable;

/// Diagnostic outcome of a successful decode. Never used for correctness
/// decisions; the authentication layer is the backstop against wrong data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality {
    /// Alignment offset that decoded, in symbols (negative = the framer
    /// delivered the frame early).
    pub shift: i8,
    /// Number of symbol positions the RS decoder corrected.
    pub corrections: u8,
}

/// The fixed-parameter frame codec.
pub struct FecCodec {
    rs: RsCodec,
}

impl FecCodec {
    pub fn new() -> Self {
        Self { rs: RsCodec::new() }
    }

    /// Encode 14 packed bytes (105 bits used) into 31 interleaved symbols.
    pub fn encode(&self, packed: &[u8; PACKED_BYTES]) -> Frame {
        let data = unpack_bits(packed);
        let mut parity = [0u8; PARITY_SYMBOLS];
        self.rs.encode(&data, &mut parity);
        interleave(&data, &parity)
    }

    /// Decode 31 raw symbols back into the packed packet bytes.
    ///
    /// Symbol values of [`ERASURE`] or above are treated as erasures.
    /// Candidate shifts are tried in the order 0, -1, +1, -2, +2, -3, +3;
    /// the first alignment the RS decoder accepts wins.
    pub fn decode(&self, raw: &Frame) -> Result<([u8; PACKED_BYTES], Quality), Uncorrectable> {
        let mut padded = [0u8; FRAME_SYMBOLS + 2 * MAX_SHIFT];
        padded[MAX_SHIFT..MAX_SHIFT + FRAME_SYMBOLS].copy_from_slice(raw);

        for attempt in 0..=2 * MAX_SHIFT as i8 {
            let shift = if attempt % 2 == 1 {
                -(attempt + 1) / 2
            } else {
                attempt / 2
            };
            let window = &padded[(MAX_SHIFT as i8 + shift) as usize..];

            let mut data = [0u8; DATA_SYMBOLS];
            let mut parity = [0u8; PARITY_SYMBOLS];
            let mut erasures = Vec::new();
            deinterleave(window, &mut data, &mut parity, &mut erasures);
            if erasures.len() > PARITY_SYMBOLS {
                continue;
            }
            if let Ok(corrections) = self.rs.decode(&mut data, &mut parity, &erasures) {
                return Ok((
                    pack_bits(&data),
                    Quality {
                        shift,
                        corrections: corrections as u8,
                    },
                ));
            }
        }
        Err(Uncorrectable)
    }
}

impl Default for FecCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Lay out data and parity as transmitted: d d p, d d p, ..., d.
fn interleave(data: &[u8; DATA_SYMBOLS], parity: &[u8; PARITY_SYMBOLS]) -> Frame {
    let mut out = [0u8; FRAME_SYMBOLS];
    let mut i = 0;
    for j in (0..2 * PARITY_SYMBOLS).step_by(2) {
        out[i] = data[j];
        out[i + 1] = data[j + 1];
        out[i + 2] = parity[j / 2];
        i += 3;
    }
    out[i] = data[DATA_SYMBOLS - 1];
    out
}

/// Inverse of [`interleave`] over a shifted window, collecting erasure
/// positions in codeword order (data symbols first, then parity).
fn deinterleave(
    window: &[u8],
    data: &mut [u8; DATA_SYMBOLS],
    parity: &mut [u8; PARITY_SYMBOLS],
    erasures: &mut Vec<usize>,
) {
    let mut i = 0;
    for j in (0..2 * PARITY_SYMBOLS).step_by(2) {
        data[j] = window[i];
        data[j + 1] = window[i + 1];
        parity[j / 2] = window[i + 2];
        i += 3;
    }
    data[DATA_SYMBOLS - 1] = window[i];

    for (pos, sym) in data.iter_mut().enumerate() {
        if *sym >= ERASURE {
            *sym = 0;
            erasures.push(pos);
        }
    }
    for (pos, sym) in parity.iter_mut().enumerate() {
        if *sym >= ERASURE {
            *sym = 0;
            erasures.push(DATA_SYMBOLS + pos);
        }
    }
}

/// Split packed bytes into 5-bit symbols, MSB first.
fn unpack_bits(packed: &[u8; PACKED_BYTES]) -> [u8; DATA_SYMBOLS] {
    let mut data = [0u8; DATA_SYMBOLS];
    let mut k = 0;
    for sym in data.iter_mut() {
        for j in 0..SYMBOL_BITS {
            let bit = (packed[k / 8] >> (7 - k % 8)) & 1;
            *sym |= bit << (SYMBOL_BITS - 1 - j);
            k += 1;
        }
    }
    data
}

/// Pack 5-bit symbols back into bytes, MSB first. The trailing 7 bits of
/// the final byte are zero.
fn pack_bits(data: &[u8; DATA_SYMBOLS]) -> [u8; PACKED_BYTES] {
    let mut packed = [0u8; PACKED_BYTES];
    let mut k = 0;
    for sym in data {
        for j in 0..SYMBOL_BITS {
            let bit = (sym >> (SYMBOL_BITS - 1 - j)) & 1;
            packed[k / 8] |= bit << (7 - k % 8);
            k += 1;
        }
    }
    packed
}
