#![forbid(unsafe_code)]

//! Edge-timing synthesis: turn a 31-symbol frame into the delta sequence a
//! transmitter keys out (and a receiver's framer sees back). Used by the
//! sender for its loopback self-check and by tests to drive the framer.

use rf433_core::{Frame, SYMBOL_BITS};

use crate::pulse::{FINAL_BIT, PERIOD_US};

/// Leading silence placed before the start marker so a fresh framer treats
/// the first pulse as noise-break rather than part of an earlier code.
pub const LEAD_IN_US: u32 = 10_000;

/// Edge-to-edge deltas for one frame: lead-in, "10" marker, "11" marker,
/// one pulse per set grid bit, and the terminating pulse. Symbol values are
/// masked to five bits.
pub fn frame_edges(frame: &Frame) -> Vec<u32> {
    let mut deltas = vec![LEAD_IN_US, PERIOD_US * 2, PERIOD_US];

    // Grid bit 0 is the second marker pulse, already emitted above.
    let mut prev = 0u32;
    for bit in 1..FINAL_BIT {
        let sym = (bit / (SYMBOL_BITS as u32 + 1)) as usize;
        let slot = bit % (SYMBOL_BITS as u32 + 1);
        let set = if slot == 0 {
            true // start bit of the next symbol
        } else {
            let value = frame[sym] & ((1 << SYMBOL_BITS) - 1);
            value & (1 << (SYMBOL_BITS as u32 - slot)) != 0
        };
        if set {
            deltas.push((bit - prev) * PERIOD_US);
            prev = bit;
        }
    }
    // Terminating pulse completes the frame.
    deltas.push((FINAL_BIT - prev) * PERIOD_US);
    deltas
}
