#![forbid(unsafe_code)]

//! Pulse-grid framer.
//!
//! Transmissions are on-off keyed: a short carrier burst marks a `1` bit, a
//! silent slot is a `0`. Each frame opens with a "10" marker (one pulse, two
//! periods of silence) followed by a "11" marker (two pulses one period
//! apart); the second marker pulse fixes the bit grid. From there every bit
//! slot is `PERIOD_US` wide and a valid pulse sits a quarter period into its
//! slot. A symbol occupies six slots: one start bit (always `1`, doubling as
//! the previous symbol's stop bit) and five data bits, most significant
//! first.
//!
//! This runs in the edge-interrupt context: O(1) work per edge, no
//! allocation, no clock access. The caller feeds edge-to-edge deltas in
//! microseconds.

use rf433_core::{Frame, ERASURE, FRAME_SYMBOLS, SYMBOL_BITS};

/// Width of one bit slot in microseconds.
pub const PERIOD_US: u32 = 0x200;

/// Tolerance applied to every timing comparison.
pub const EPSILON_US: u32 = 100;

/// Bit slots per symbol: one start bit plus the data bits.
const BITS_PER_SYMBOL: u32 = SYMBOL_BITS as u32 + 1;

/// Grid index of the terminating pulse; an edge at or past this slot
/// completes the frame.
pub const FINAL_BIT: u32 = FRAME_SYMBOLS as u32 * BITS_PER_SYMBOL;

/// How many symbol slots may pass without any pulse before the frame is
/// force-completed with trailing erasures.
pub const MAX_INCOMPLETE_SKIP: u32 = 4;

const BUFFER_BYTES: usize = (FINAL_BIT as usize + 7) / 8;

/// True when `delta` is within [`EPSILON_US`] of `centre`. Wrapping
/// arithmetic keeps the comparison a single unsigned test.
#[inline]
fn is_close(delta: u32, centre: u32) -> bool {
    delta.wrapping_add(EPSILON_US).wrapping_sub(centre) < 2 * EPSILON_US
}

enum State {
    Idle,
    /// Saw a "10" marker; `elapsed` counts microseconds since the grid
    /// origin implied by that marker.
    Syncing { elapsed: u32 },
    Receiving {
        elapsed: u32,
        /// Grid index of the most recent pulse.
        last_bit: u32,
        bits: [u8; BUFFER_BYTES],
        /// Per-symbol erasure marks.
        erased: u32,
    },
}

pub struct PulseFramer {
    state: State,
}

impl PulseFramer {
    pub fn new() -> Self {
        Self { state: State::Idle }
    }

    /// Feed one edge-to-edge delta (microseconds). Returns a completed
    /// frame when this edge finishes one; timing that fits no grid simply
    /// resets state.
    pub fn on_edge(&mut self, delta: u32) -> Option<Frame> {
        match &mut self.state {
            State::Idle => {
                if is_close(delta, PERIOD_US * 2) {
                    // "10" start marker; the pulse sits a quarter period
                    // into its slot on the implied grid.
                    self.state = State::Syncing { elapsed: PERIOD_US / 4 };
                }
                None
            }
            State::Syncing { elapsed } => {
                let now = elapsed.wrapping_add(delta);
                if is_close(delta, PERIOD_US * 2) {
                    // Repeated "10" marker refreshes the grid origin.
                    self.state = State::Syncing { elapsed: PERIOD_US / 4 };
                } else if is_close(delta, PERIOD_US) {
                    // "11" marker: its second pulse is grid bit 0.
                    self.state = State::Receiving {
                        elapsed: PERIOD_US / 4,
                        last_bit: 0,
                        bits: [0; BUFFER_BYTES],
                        erased: 0,
                    };
                } else if now > PERIOD_US * 2 {
                    self.state = State::Idle;
                } else {
                    *elapsed = now;
                }
                None
            }
            State::Receiving {
                elapsed,
                last_bit,
                bits,
                erased,
            } => {
                *elapsed = elapsed.wrapping_add(delta);
                let bit = *elapsed / PERIOD_US;
                if bit >= FINAL_BIT {
                    let frame = unpack(bits, *erased);
                    self.state = State::Idle;
                    return Some(frame);
                }
                if bit.wrapping_sub(*last_bit) > MAX_INCOMPLETE_SKIP * BITS_PER_SYMBOL {
                    // Drifted too far with no pulses: deliver what exists,
                    // erasing everything past the last pulsed symbol.
                    let mut erased = *erased;
                    for sym in (*last_bit / BITS_PER_SYMBOL + 1)..FRAME_SYMBOLS as u32 {
                        erased |= 1 << sym;
                    }
                    let frame = unpack(bits, erased);
                    self.state = State::Idle;
                    return Some(frame);
                }
                let offset = *elapsed % PERIOD_US;
                if is_close(offset, PERIOD_US / 4) {
                    bits[bit as usize / 8] |= 0x80 >> (bit % 8);
                } else {
                    // Pulse inside the slot but off the grid: the symbol's
                    // value cannot be trusted.
                    *erased |= 1 << (bit / BITS_PER_SYMBOL);
                }
                *last_bit = bit;
                None
            }
        }
    }
}

impl Default for PulseFramer {
    fn default() -> Self {
        Self::new()
    }
}

/// Unpack the bit grid into 31 symbols, skipping each start-bit slot and
/// substituting [`ERASURE`] where a symbol was marked unreliable.
fn unpack(bits: &[u8; BUFFER_BYTES], erased: u32) -> Frame {
    let mut frame = [0u8; FRAME_SYMBOLS];
    let mut bit = 0usize;
    for (i, sym) in frame.iter_mut().enumerate() {
        bit += 1; // start-bit slot carries no data
        let mut v = 0u8;
        for j in 0..SYMBOL_BITS {
            if bits[bit / 8] & (0x80 >> (bit % 8)) != 0 {
                v |= 1 << (SYMBOL_BITS - 1 - j);
            }
            bit += 1;
        }
        *sym = if erased & (1 << i) != 0 { ERASURE } else { v };
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pulses::frame_edges;

    fn feed(framer: &mut PulseFramer, deltas: &[u32]) -> Option<Frame> {
        let mut out = None;
        for &d in deltas {
            if let Some(f) = framer.on_edge(d) {
                out = Some(f);
            }
        }
        out
    }

    fn sample_frame() -> Frame {
        core::array::from_fn(|i| ((i * 11 + 3) % 32) as u8)
    }

    #[test]
    fn clean_trace_round_trips() {
        let frame = sample_frame();
        let mut framer = PulseFramer::new();
        let got = feed(&mut framer, &frame_edges(&frame)).expect("frame");
        assert_eq!(got, frame);
    }

    #[test]
    fn all_zero_symbols_round_trip() {
        // Only start bits and the terminator are pulsed.
        let frame = [0u8; FRAME_SYMBOLS];
        let mut framer = PulseFramer::new();
        let got = feed(&mut framer, &frame_edges(&frame)).expect("frame");
        assert_eq!(got, frame);
    }

    #[test]
    fn noise_before_the_marker_is_ignored() {
        let frame = sample_frame();
        let mut framer = PulseFramer::new();
        for d in [300, 777, 5000, 512, 90] {
            assert!(framer.on_edge(d).is_none());
        }
        let got = feed(&mut framer, &frame_edges(&frame)).expect("frame");
        assert_eq!(got, frame);
    }

    #[test]
    fn repeated_start_marker_refreshes_the_grid() {
        let frame = sample_frame();
        let mut deltas = frame_edges(&frame);
        // Splice an extra "10" marker in front of the real one.
        deltas.insert(1, PERIOD_US * 2);
        let mut framer = PulseFramer::new();
        let got = feed(&mut framer, &deltas).expect("frame");
        assert_eq!(got, frame);
    }

    #[test]
    fn silence_in_syncing_resets() {
        let mut framer = PulseFramer::new();
        assert!(framer.on_edge(10_000).is_none());
        assert!(framer.on_edge(PERIOD_US * 2).is_none()); // "10"
        assert!(framer.on_edge(30_000).is_none()); // gave up
        // A lone "11"-spaced pulse must not start reception now.
        assert!(framer.on_edge(PERIOD_US).is_none());
        // A full trace still works afterwards.
        let frame = sample_frame();
        let got = feed(&mut framer, &frame_edges(&frame)).expect("frame");
        assert_eq!(got, frame);
    }

    #[test]
    fn off_grid_pulse_erases_the_symbol() {
        let frame = sample_frame();
        let mut deltas = frame_edges(&frame);
        // Shift the third edge after the markers off the quarter-period
        // grid without leaving its slot.
        deltas[5] += PERIOD_US / 2;
        deltas[6] -= PERIOD_US / 2;
        let mut framer = PulseFramer::new();
        let got = feed(&mut framer, &deltas).expect("frame");
        let erased = got.iter().filter(|&&s| s == ERASURE).count();
        assert_eq!(erased, 1);
        // Every other symbol survives.
        for (a, b) in got.iter().zip(frame.iter()) {
            assert!(*a == *b || *a == ERASURE);
        }
    }

    #[test]
    fn long_silence_forces_completion_with_trailing_erasures() {
        let frame = sample_frame();
        let deltas = frame_edges(&frame);
        let mut framer = PulseFramer::new();
        // Play roughly the first third of the trace, then go quiet for
        // more than MAX_INCOMPLETE_SKIP symbols.
        let cut = deltas.len() / 3;
        for &d in &deltas[..cut] {
            assert!(framer.on_edge(d).is_none());
        }
        let got = framer
            .on_edge(PERIOD_US * BITS_PER_SYMBOL * (MAX_INCOMPLETE_SKIP + 2))
            .expect("forced frame");
        assert_eq!(got[FRAME_SYMBOLS - 1], ERASURE);
        assert!(got.iter().filter(|&&s| s == ERASURE).count() >= 1);
        // The received prefix is intact.
        assert_eq!(got[0], frame[0]);
        assert_eq!(got[1], frame[1]);
    }
}
