#![forbid(unsafe_code)]

//! Single-slot handoff between the edge-interrupt producer and the polling
//! consumer.
//!
//! The slot holds at most one value; a new post overwrites an unread one
//! (a stale frame is worthless once a fresher one exists). On a real host
//! the consumer must mask the edge interrupt around [`Mailbox::take`] so
//! the copy-and-clear is atomic; that masking is the host's obligation and
//! lives outside this crate.

pub struct Mailbox<T> {
    slot: Option<T>,
}

impl<T> Mailbox<T> {
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Producer side: publish a value, replacing any unread one.
    pub fn post(&mut self, value: T) {
        self.slot = Some(value);
    }

    /// Consumer side: read-and-clear.
    pub fn take(&mut self) -> Option<T> {
        self.slot.take()
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_clears_the_slot() {
        let mut mb = Mailbox::new();
        mb.post(7u32);
        assert_eq!(mb.take(), Some(7));
        assert_eq!(mb.take(), None);
    }

    #[test]
    fn newer_post_replaces_unread_value() {
        let mut mb = Mailbox::new();
        mb.post(1u32);
        mb.post(2u32);
        assert_eq!(mb.take(), Some(2));
    }
}
