#![no_main]

use libfuzzer_sys::fuzz_target;
use rf433_framer::Rx433;

// A random edge stream (arbitrary u32 deltas, including wrapping values)
// must never panic the interrupt-context decoders.
fuzz_target!(|data: &[u8]| {
    let mut rx = Rx433::new();
    for chunk in data.chunks_exact(4) {
        let delta = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        rx.on_edge(delta);
        let _ = rx.take_frame();
        let _ = rx.take_home_easy();
    }
});
