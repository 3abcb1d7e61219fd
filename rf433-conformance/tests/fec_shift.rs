use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rf433_core::{Frame, PACKED_BYTES};
use rf433_fec::FecCodec;

fn random_packet(rng: &mut StdRng) -> [u8; PACKED_BYTES] {
    let mut packed = [0u8; PACKED_BYTES];
    rng.fill(&mut packed[..]);
    packed[PACKED_BYTES - 1] &= 0x80;
    packed
}

/// Drop the first symbol, append a zero: the framer started one slot late.
fn shift_left(frame: &mut Frame) {
    frame.copy_within(1.., 0);
    frame[30] = 0;
}

/// Insert a zero at the front, drop the last symbol: one slot early.
fn shift_right(frame: &mut Frame) {
    frame.copy_within(..30, 1);
    frame[0] = 0;
}

#[test]
fn shifts_up_to_three_positions_recover() {
    let codec = FecCodec::new();
    let mut rng = StdRng::seed_from_u64(222);
    let mut realigned = 0;
    for case in 0..60 {
        let packed = random_packet(&mut rng);
        let mut frame = codec.encode(&packed);

        let amount = case % 3 + 1;
        let left = case % 2 == 0;
        for _ in 0..amount {
            if left {
                shift_left(&mut frame);
            } else {
                shift_right(&mut frame);
            }
        }

        // A wrong alignment tried before the true one is occasionally
        // within correction distance of some other codeword; the search
        // stops there and the MAC layer discards the frame. Whenever the
        // search does land on the true alignment the data must come back
        // exactly, and that has to be the overwhelmingly common outcome.
        let expected_shift = if left { -(amount as i8) } else { amount as i8 };
        let (recovered, quality) = codec.decode(&frame).unwrap();
        if quality.shift == expected_shift {
            assert_eq!(recovered, packed, "case {case}");
            realigned += 1;
        }
    }
    assert!(realigned >= 54, "only {realigned} of 60 cases realigned");
}

#[test]
fn noise_and_shift_combine() {
    let codec = FecCodec::new();
    let mut rng = StdRng::seed_from_u64(777);
    for case in 0..40 {
        let packed = random_packet(&mut rng);
        let mut frame = codec.encode(&packed);

        // Two single-bit errors plus a three-position shift: the shift
        // costs up to three tail symbols, five total, still in budget.
        for _ in 0..2 {
            let sym = rng.gen_range(0..28);
            frame[sym] ^= 1 << rng.gen_range(0..5);
        }
        for _ in 0..3 {
            shift_left(&mut frame);
        }

        let (recovered, _) = codec.decode(&frame).unwrap();
        assert_eq!(recovered, packed, "case {case}");
    }
}
