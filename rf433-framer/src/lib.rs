#![forbid(unsafe_code)]

//! Edge-timing front end for the 433 MHz receiver.
//!
//! A hardware edge detector measures the gap between successive carrier
//! pulses; [`Rx433`] classifies each gap with two independent decoders
//! sharing the stream: the pulse-grid framer that assembles 31-symbol
//! frames, and the legacy Home Easy decoder. Completed outputs wait in
//! single-slot mailboxes until the polling consumer collects them.

pub mod home_easy;
pub mod mailbox;
pub mod pulse;
pub mod pulses;

use rf433_core::Frame;

pub use home_easy::HomeEasyDecoder;
pub use mailbox::Mailbox;
pub use pulse::{PulseFramer, EPSILON_US, FINAL_BIT, MAX_INCOMPLETE_SKIP, PERIOD_US};
pub use pulses::frame_edges;

/// Receiver-side edge dispatcher: one instance per radio.
pub struct Rx433 {
    framer: PulseFramer,
    home_easy: HomeEasyDecoder,
    frames: Mailbox<Frame>,
    codes: Mailbox<u32>,
}

impl Rx433 {
    pub fn new() -> Self {
        Self {
            framer: PulseFramer::new(),
            home_easy: HomeEasyDecoder::new(),
            frames: Mailbox::new(),
            codes: Mailbox::new(),
        }
    }

    /// Interrupt-context entry point: feed one edge-to-edge delta in
    /// microseconds. O(1), never blocks, never fails.
    pub fn on_edge(&mut self, delta_us: u32) {
        if let Some(frame) = self.framer.on_edge(delta_us) {
            self.frames.post(frame);
        }
        if let Some(code) = self.home_easy.on_edge(delta_us) {
            self.codes.post(code);
        }
    }

    /// Polling-context: collect a completed frame, if any.
    pub fn take_frame(&mut self) -> Option<Frame> {
        self.frames.take()
    }

    /// Polling-context: collect a completed Home Easy code, if any.
    pub fn take_home_easy(&mut self) -> Option<u32> {
        self.codes.take()
    }
}

impl Default for Rx433 {
    fn default() -> Self {
        Self::new()
    }
}
