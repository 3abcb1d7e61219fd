#![forbid(unsafe_code)]

//! Transmitter pipeline.
//!
//! A sender owns a [`Pairing`] (secret plus transmit counter). Each send
//! encodes the payload, runs the frame back through the FEC decoder and the
//! authenticator as a loopback self-check, persists the advanced counter,
//! and returns the 31 symbols for the radio. The self-check runs against a
//! copy of the counter one behind the new value, exactly the state the
//! receiver will be in.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use rf433_core::{Frame, LinkConfig};
use rf433_crypto::{
    authenticate, encode_packet, encode_resync, Packet, Pairing, PairingError, Secret,
};
use rf433_fec::FecCodec;

#[derive(Debug, Error)]
pub enum TxError {
    #[error("pairing state: {0}")]
    Pairing(#[from] PairingError),

    #[error("no pairing file configured")]
    NotPaired,

    #[error("loopback self-check failed")]
    SelfCheck,
}

pub struct Sender {
    codec: FecCodec,
    pairing: Pairing,
    /// Where to persist the advanced counter, when the pairing is backed
    /// by a file.
    state_path: Option<PathBuf>,
}

impl Sender {
    /// Sender over an in-memory pairing; nothing is persisted.
    pub fn new(pairing: Pairing) -> Self {
        Self {
            codec: FecCodec::new(),
            pairing,
            state_path: None,
        }
    }

    /// Sender backed by a pairing state file; every successful send writes
    /// the advanced counter back before the frame is released.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TxError> {
        let pairing = Pairing::load(&path)?;
        Ok(Self {
            codec: FecCodec::new(),
            pairing,
            state_path: Some(path.as_ref().to_path_buf()),
        })
    }

    /// Sender from the host configuration; requires `secret_file`.
    pub fn from_config(config: &LinkConfig) -> Result<Self, TxError> {
        match &config.secret_file {
            Some(path) => Self::load(path),
            None => Err(TxError::NotPaired),
        }
    }

    /// Current transmit counter.
    pub fn counter(&self) -> u64 {
        self.pairing.counter
    }

    /// Encode one ordinary message. `payload` beyond 6 bytes is truncated.
    pub fn send(&mut self, payload: &[u8]) -> Result<Frame, TxError> {
        let secret = self.pairing.secret();
        let packet = encode_packet(&secret, payload, &mut self.pairing.counter);
        self.finish(&secret, &packet)
    }

    /// Encode a resynchronization message, advancing the counter to the
    /// next multiple of 256.
    pub fn send_resync(&mut self) -> Result<Frame, TxError> {
        let secret = self.pairing.secret();
        let packet = encode_resync(&secret, &mut self.pairing.counter);
        self.finish(&secret, &packet)
    }

    fn finish(&mut self, secret: &Secret, packet: &Packet) -> Result<Frame, TxError> {
        let frame = self.codec.encode(&packet.to_bytes());

        // Loopback self-check before anything reaches the radio.
        let (packed, _) = self.codec.decode(&frame).map_err(|_| TxError::SelfCheck)?;
        let decoded = Packet::from_bytes(&packed);
        if decoded != *packet {
            return Err(TxError::SelfCheck);
        }
        let mut check_counter = self.pairing.counter.wrapping_sub(1);
        if !authenticate(secret, &decoded, &mut check_counter) {
            return Err(TxError::SelfCheck);
        }

        if let Some(path) = &self.state_path {
            self.pairing.save(path)?;
        }
        debug!(counter = self.pairing.counter, resync = packet.resync, "frame ready");
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_advances_the_counter_per_message() {
        let mut sender = Sender::new(Pairing::new(b"secret", 0));
        sender.send(b"first!").unwrap();
        sender.send(b"second").unwrap();
        assert_eq!(sender.counter(), 2);
    }

    #[test]
    fn resync_aligns_the_counter_to_256() {
        let mut sender = Sender::new(Pairing::new(b"secret", 0x305));
        sender.send_resync().unwrap();
        assert_eq!(sender.counter(), 0x400);
    }

    #[test]
    fn unconfigured_pairing_is_reported() {
        let config = LinkConfig {
            secret_file: None,
            ..LinkConfig::default()
        };
        assert!(matches!(Sender::from_config(&config), Err(TxError::NotPaired)));
    }

    #[test]
    fn file_backed_sender_persists_the_counter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairing.dat");
        Pairing::new(b"secret", 7).save(&path).unwrap();

        let mut sender = Sender::load(&path).unwrap();
        sender.send(b"hello!").unwrap();
        drop(sender);

        let sender = Sender::load(&path).unwrap();
        assert_eq!(sender.counter(), 8);
    }
}
