#![no_main]
use libfuzzer_sys::fuzz_target;
use zenargb::*;

fn decode(data: &[u8]) -> (u32, u32, Vec<u32>) {
    let mut decoder = Decoder::new();
    decoder.open(data).expect("encoded image must open");
    let (w, h) = (decoder.width(), decoder.height());
    let pixels = decoder.decode_argb32_to_vec().expect("encoded image must decode");
    (w, h, pixels)
}

fuzz_target!(|data: &[u8]| {
    // First byte picks the width, the rest are pixels; PNG must reproduce them exactly
    let Some((&w, rest)) = data.split_first() else {
        return;
    };
    let width = u32::from(w % 64) + 1;
    let pixels: Vec<u32> = rest
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    let height = (pixels.len() as u32) / width;
    if height == 0 {
        return;
    }
    let pixels = &pixels[..(width * height) as usize];

    let mut encoder = Encoder::new();
    encoder
        .encode_argb32_png(pixels, width, height)
        .expect("valid pixels must encode");
    let (dw, dh, decoded) = decode(encoder.encoded_bytes());
    assert_eq!((dw, dh), (width, height));
    assert_eq!(decoded, pixels, "roundtrip pixel mismatch");

    // JPEG is lossy; only the geometry has to survive
    encoder
        .encode_argb32_jpeg(pixels, width, height)
        .expect("valid pixels must encode");
    let (dw, dh, decoded) = decode(encoder.encoded_bytes());
    assert_eq!((dw, dh), (width, height));
    assert!(!has_translucent_pixels(&decoded));
});
