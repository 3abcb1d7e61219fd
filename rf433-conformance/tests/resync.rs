use rf433_crypto::{authenticate, encode_packet, encode_resync, Secret};

#[test]
fn resync_sets_the_receiver_to_v_plus_one() {
    let secret = Secret::new(b"resync");
    let mut tx = 0x1234_5605u64;
    let packet = encode_resync(&secret, &mut tx);
    // The sender advanced to the next multiple of 256.
    assert_eq!(tx, 0x1234_5700);
    assert!(packet.resync);

    // A receiver far behind catches up in one message.
    let mut rx = 3u64;
    assert!(authenticate(&secret, &packet, &mut rx));
    assert_eq!(rx, 0x1234_5701);
}

#[test]
fn resync_carries_the_full_counter_width() {
    let secret = Secret::new(b"resync");
    let mut tx = 0xfedc_ba98_7654_3210u64;
    let packet = encode_resync(&secret, &mut tx);
    assert_eq!(tx, 0xfedc_ba98_7654_3300);

    let mut rx = 1u64;
    assert!(authenticate(&secret, &packet, &mut rx));
    assert_eq!(rx, 0xfedc_ba98_7654_3301);
}

#[test]
fn resync_behind_the_receiver_is_rejected_outright() {
    let secret = Secret::new(b"resync");
    let mut tx = 0x500u64;
    let packet = encode_resync(&secret, &mut tx); // counter 0x600

    // Receiver has already advanced further than the packet's counter.
    let mut rx = 0x700u64;
    assert!(!authenticate(&secret, &packet, &mut rx));
    assert_eq!(rx, 0x700);
}

#[test]
fn ordinary_traffic_resumes_after_a_resync() {
    let secret = Secret::new(b"resync");
    let mut tx = 0x42u64;
    let mut rx = 0x9999u64; // receiver ahead: ordinary packets all fail

    let stale = encode_packet(&secret, b"stale.", &mut tx);
    assert!(!authenticate(&secret, &stale, &mut rx));

    // The sender resyncs past the receiver...
    tx = 0xa000;
    let resync = encode_resync(&secret, &mut tx);
    assert!(authenticate(&secret, &resync, &mut rx));
    assert_eq!(rx, 0xa101);

    // ...and ordinary messages flow again.
    let packet = encode_packet(&secret, b"fresh.", &mut tx);
    assert!(authenticate(&secret, &packet, &mut rx));
    assert_eq!(rx, tx + 1);
}
