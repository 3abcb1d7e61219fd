#![forbid(unsafe_code)]

//! Receive and transmit pipelines.
//!
//! The receive side glues the edge-timing framer, the FEC codec and the
//! authenticated packet protocol into one polling loop: frames out of the
//! mailbox are decoded, parsed and checked against the persisted counter,
//! and only authenticated payloads surface. Every per-message failure is
//! silent to the protocol; it shows up as a typed error and a debug log,
//! never as state.
//!
//! The transmit side mirrors the receiver: it encodes a payload under the
//! pairing's counter, runs the resulting frame back through the decoder and
//! authenticator as a loopback self-check, persists the advanced counter,
//! and only then hands the symbols to the radio.

mod receive;
mod send;

pub use receive::{Link, LinkEvent, Received, RxError};
pub use send::{Sender, TxError};
