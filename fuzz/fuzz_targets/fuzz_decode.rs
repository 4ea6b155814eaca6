#![no_main]
use libfuzzer_sys::fuzz_target;
use zenargb::{Decoder, Limits};

fuzz_target!(|data: &[u8]| {
    // Open and decode arbitrary bytes — must never panic
    let limits = Limits {
        max_pixels: Some(4096 * 4096),
        max_memory_bytes: Some(256 * 1024 * 1024),
        ..Default::default()
    };
    let mut decoder = Decoder::new().with_limits(limits);
    if decoder.open(data).is_err() {
        assert_eq!(decoder.format(), None);
        return;
    }

    let Ok(pixels) = decoder.decode_argb32_to_vec() else {
        return;
    };
    assert_eq!(pixels.len(), decoder.pixel_count());
    assert_eq!(decoder.format(), None);
});
