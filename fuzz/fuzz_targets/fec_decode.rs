#![no_main]

use libfuzzer_sys::fuzz_target;
use rf433_core::{Frame, FRAME_SYMBOLS};
use rf433_fec::FecCodec;

// Arbitrary 31-byte inputs (including out-of-field values, which read as
// erasures) must decode cleanly or fail cleanly, never panic.
fuzz_target!(|data: &[u8]| {
    if data.len() < FRAME_SYMBOLS {
        return;
    }
    let mut frame: Frame = [0; FRAME_SYMBOLS];
    frame.copy_from_slice(&data[..FRAME_SYMBOLS]);

    let codec = FecCodec::new();
    if let Ok((packed, _)) = codec.decode(&frame) {
        // Whatever decoded must re-encode to a valid codeword that decodes
        // back to the same bytes.
        let clean = codec.encode(&packed);
        let (again, quality) = codec.decode(&clean).expect("re-encode decodes");
        assert_eq!(again, packed);
        assert_eq!(quality.corrections, 0);
    }
});
