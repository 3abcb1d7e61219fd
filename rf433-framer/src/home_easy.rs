#![forbid(unsafe_code)]

//! Legacy Home Easy decoder.
//!
//! Home Easy remotes send 32 bits as long/short pulse-gap pairs after a
//! distinctive start gap. Bucketing `delta / 128` sorts every meaningful
//! delta:
//!
//! | bucket  | meaning |
//! |---------|---------|
//! | 3..=5   | short   |
//! | 11..=12 | long    |
//! | 22..=23 | start   |
//!
//! A long followed by a short is a `1`; a short followed by a long is a
//! `0`; bits arrive most significant first. The output is unauthenticated
//! and uncoded, kept only for existing remote controls.

enum State {
    Reset,
    ReadyForBit,
    ReceivedShort,
    ReceivedLong,
}

pub struct HomeEasyDecoder {
    state: State,
    bit_count: u8,
    bit_data: u32,
}

impl HomeEasyDecoder {
    pub fn new() -> Self {
        Self {
            state: State::Reset,
            bit_count: 0,
            bit_data: 0,
        }
    }

    /// Feed one edge-to-edge delta (microseconds); returns a complete
    /// 32-bit code when this edge finishes one.
    pub fn on_edge(&mut self, delta: u32) -> Option<u32> {
        match delta / 128 {
            3..=5 => match self.state {
                State::ReadyForBit => {
                    self.state = State::ReceivedShort;
                    None
                }
                State::ReceivedLong => {
                    // long then short: bit 1
                    self.bit_data |= (1u32 << 31) >> self.bit_count;
                    self.finish_bit()
                }
                _ => {
                    self.state = State::Reset;
                    None
                }
            },
            11..=12 => match self.state {
                State::ReadyForBit => {
                    self.state = State::ReceivedLong;
                    None
                }
                State::ReceivedShort => {
                    // short then long: bit 0
                    self.finish_bit()
                }
                _ => {
                    self.state = State::Reset;
                    None
                }
            },
            22..=23 => {
                self.state = State::ReadyForBit;
                self.bit_count = 0;
                self.bit_data = 0;
                None
            }
            _ => {
                self.state = State::Reset;
                None
            }
        }
    }

    fn finish_bit(&mut self) -> Option<u32> {
        self.bit_count += 1;
        if self.bit_count >= 32 {
            self.state = State::Reset;
            Some(self.bit_data)
        } else {
            self.state = State::ReadyForBit;
            None
        }
    }
}

impl Default for HomeEasyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT: u32 = 540;
    const LONG: u32 = 1550;
    const START: u32 = 2920;

    fn edges_for(code: u32) -> Vec<u32> {
        let mut out = vec![START];
        for i in (0..32).rev() {
            if code & (1 << i) != 0 {
                out.push(LONG);
                out.push(SHORT);
            } else {
                out.push(SHORT);
                out.push(LONG);
            }
        }
        out
    }

    fn feed(dec: &mut HomeEasyDecoder, deltas: &[u32]) -> Option<u32> {
        let mut out = None;
        for &d in deltas {
            if let Some(c) = dec.on_edge(d) {
                out = Some(c);
            }
        }
        out
    }

    #[test]
    fn decodes_a_known_code() {
        let mut dec = HomeEasyDecoder::new();
        assert_eq!(feed(&mut dec, &edges_for(0xdead_beef)), Some(0xdead_beef));
    }

    #[test]
    fn decodes_all_zeros_and_all_ones() {
        let mut dec = HomeEasyDecoder::new();
        assert_eq!(feed(&mut dec, &edges_for(0)), Some(0));
        assert_eq!(feed(&mut dec, &edges_for(u32::MAX)), Some(u32::MAX));
    }

    #[test]
    fn double_short_resets() {
        let mut dec = HomeEasyDecoder::new();
        let mut edges = edges_for(0x1234_5678);
        // Corrupt the long half of the first pair into a short; the code
        // must not be emitted.
        edges[2] = SHORT;
        assert_eq!(feed(&mut dec, &edges), None);
        // A clean code still decodes afterwards.
        assert_eq!(feed(&mut dec, &edges_for(0x0f0f_0f0f)), Some(0x0f0f_0f0f));
    }

    #[test]
    fn restart_mid_code_wins() {
        let mut dec = HomeEasyDecoder::new();
        let mut edges = edges_for(0xffff_0000);
        edges.truncate(9);
        edges.extend(edges_for(0x0000_ffff));
        assert_eq!(feed(&mut dec, &edges), Some(0x0000_ffff));
    }
}
