#![forbid(unsafe_code)]

//! Receiver pipeline: mailbox frame -> FEC decode -> packet parse ->
//! authenticate -> payload.

use thiserror::Error;
use tracing::{debug, info, warn};

use rf433_core::store::{ByteStore, CounterStore};
use rf433_core::Frame;
use rf433_crypto::{authenticate_packet, AuthOutcome, Packet, Secret, PAYLOAD_SIZE};
use rf433_fec::{FecCodec, Quality};
use rf433_framer::Rx433;

/// Why one incoming frame produced no payload. Local and silent to the
/// protocol; the next frame is unaffected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RxError {
    #[error("frame uncorrectable at every alignment")]
    Uncorrectable,

    #[error("authentication tag mismatch")]
    MacMismatch,

    #[error("counter would move backward")]
    ReplayRejected,
}

/// One authenticated message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Received {
    pub payload: [u8; PAYLOAD_SIZE],
    /// The message was a resynchronization packet; its payload bytes are
    /// counter bits, not application data.
    pub resync: bool,
    pub quality: Quality,
}

/// Something the polling loop surfaced to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    Message(Received),
    /// Legacy Home Easy code: unauthenticated, passed straight through.
    HomeEasy(u32),
}

/// Receiver half of a pairing: the shared secret plus the persisted
/// anti-replay counter.
pub struct Link<S: ByteStore> {
    codec: FecCodec,
    secret: Secret,
    counter: CounterStore<S>,
}

impl<S: ByteStore> Link<S> {
    /// Open the link over the host's counter storage. A store failing its
    /// integrity check is reinitialized with the counter at 1, which
    /// forces the sender to resync; see [`Link::reformatted`].
    pub fn open(secret: Secret, store: S) -> rf433_core::Result<Self> {
        let counter = CounterStore::open(store)?;
        if counter.reformatted() {
            info!("counter storage reinitialized, awaiting resync");
        }
        Ok(Self {
            codec: FecCodec::new(),
            secret,
            counter,
        })
    }

    /// True if opening the link had to reformat the counter storage.
    pub fn reformatted(&self) -> bool {
        self.counter.reformatted()
    }

    /// Currently persisted receive counter.
    pub fn counter(&self) -> u64 {
        self.counter.load()
    }

    /// Hand the counter storage back to the host.
    pub fn into_store(self) -> S {
        self.counter.into_inner()
    }

    /// Run one frame through FEC decode and authentication. The persisted
    /// counter advances only on acceptance.
    pub fn receive(&mut self, frame: &Frame) -> Result<Received, RxError> {
        let (packed, quality) = self.codec.decode(frame).map_err(|_| {
            debug!("frame uncorrectable");
            RxError::Uncorrectable
        })?;
        let packet = Packet::from_bytes(&packed);

        let mut counter = self.counter.load();
        match authenticate_packet(&self.secret, &packet, &mut counter) {
            AuthOutcome::Accepted => {
                self.counter.save(counter);
                debug!(
                    counter,
                    shift = quality.shift,
                    corrections = quality.corrections,
                    resync = packet.resync,
                    "message accepted"
                );
                Ok(Received {
                    payload: packet.payload,
                    resync: packet.resync,
                    quality,
                })
            }
            AuthOutcome::MacMismatch => {
                debug!("authentication tag mismatch");
                Err(RxError::MacMismatch)
            }
            AuthOutcome::ReplayRejected => {
                warn!("resync packet behind persisted counter, rejected");
                Err(RxError::ReplayRejected)
            }
        }
    }

    /// Drain the receiver mailboxes: Home Easy codes pass straight
    /// through, frames run the full pipeline. Frames that fail are
    /// swallowed here (already logged); `None` means nothing acceptable
    /// arrived.
    pub fn poll(&mut self, rx: &mut Rx433) -> Option<LinkEvent> {
        if let Some(code) = rx.take_home_easy() {
            return Some(LinkEvent::HomeEasy(code));
        }
        let frame = rx.take_frame()?;
        self.receive(&frame).ok().map(LinkEvent::Message)
    }
}
