#![no_main]

use libfuzzer_sys::fuzz_target;
use rf433_core::PACKED_BYTES;
use rf433_crypto::{authenticate, Packet, Secret};

// Packet parsing accepts all 2^105 bit patterns; authentication of an
// arbitrary packet against an arbitrary counter must never panic and must
// never move the counter on failure.
fuzz_target!(|data: &[u8]| {
    if data.len() < PACKED_BYTES + 8 {
        return;
    }
    let mut packed = [0u8; PACKED_BYTES];
    packed.copy_from_slice(&data[..PACKED_BYTES]);
    let mut counter_bytes = [0u8; 8];
    counter_bytes.copy_from_slice(&data[PACKED_BYTES..PACKED_BYTES + 8]);

    let packet = Packet::from_bytes(&packed);
    assert_eq!(packet.to_bytes()[..13], packed[..13]);

    let secret = Secret::new(b"fuzzing-secret");
    let mut counter = u64::from_le_bytes(counter_bytes);
    let before = counter;
    if !authenticate(&secret, &packet, &mut counter) {
        assert_eq!(counter, before);
    }
});
