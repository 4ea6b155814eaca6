//! Failure paths: every error leaves the decoder or encoder reusable.

use zenargb::*;

fn noise_png(w: u32, h: u32) -> Vec<u8> {
    let mut state: u32 = 0xDEAD_BEEF;
    let pixels: Vec<u32> = (0..w * h)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state | ALPHA_MASK
        })
        .collect();
    let mut enc = Encoder::new();
    enc.encode_argb32_png(&pixels, w, h).unwrap();
    enc.take_encoded()
}

fn small_jpeg() -> Vec<u8> {
    let mut enc = Encoder::new();
    enc.encode_argb32_jpeg(&[0xFF11_2233; 9], 3, 3).unwrap();
    enc.take_encoded()
}

/// Offset of the SOS marker, found by walking the marker segments.
fn sos_offset(jpeg: &[u8]) -> usize {
    let mut pos = 2;
    loop {
        assert_eq!(jpeg[pos], 0xFF, "marker expected at {pos}");
        if jpeg[pos + 1] == 0xDA {
            return pos;
        }
        let len = usize::from(u16::from_be_bytes([jpeg[pos + 2], jpeg[pos + 3]]));
        pos += 2 + len;
    }
}

// ── Format detection ────────────────────────────────────────────────

#[test]
fn short_input_is_unrecognized() {
    let png = noise_png(2, 2);
    let mut dec = Decoder::new();
    for len in 0..4 {
        assert!(
            matches!(dec.open(&png[..len]), Err(CodecError::UnrecognizedFormat)),
            "len={len}"
        );
        assert_eq!(ImageFormat::detect(&png[..len]), None);
    }
}

#[test]
fn unknown_magic_is_unrecognized() {
    let mut dec = Decoder::new();
    for data in [&b"GIF89a"[..], b"BM\0\0\0\0", b"RIFF....WEBP", &[0u8; 16]] {
        assert!(matches!(dec.open(data), Err(CodecError::UnrecognizedFormat)));
        assert_eq!(dec.format(), None);
    }
}

#[test]
fn only_first_byte_selects_format() {
    assert_eq!(ImageFormat::detect(&[0xFF, 0, 0, 0]), Some(ImageFormat::Jpeg));
    assert_eq!(ImageFormat::detect(&[0x89, 0, 0, 0]), Some(ImageFormat::Png));
}

// ── Open failures ───────────────────────────────────────────────────

#[test]
fn bad_png_signature_fails_open() {
    let mut dec = Decoder::new();
    let data = [0x89, b'X', b'Y', b'Z', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    let err = dec.open(&data).unwrap_err();
    assert!(matches!(err, CodecError::MalformedHeader(_)), "{err}");
    assert_eq!(dec.format(), None);
}

#[test]
fn png_truncated_before_pixels_fails_open() {
    let png = noise_png(4, 4);
    let mut dec = Decoder::new();
    // Signature plus half of IHDR.
    assert!(dec.open(&png[..20]).is_err());
    assert_eq!(dec.format(), None);
    assert_eq!((dec.width(), dec.height()), (0, 0));
}

#[test]
fn jpeg_without_soi_fails_open() {
    let mut dec = Decoder::new();
    assert!(dec.open(&[0xFF, 0x00, 0x00, 0x00, 0x00]).is_err());
    assert_eq!(dec.format(), None);
}

#[test]
fn jpeg_truncated_header_fails_open() {
    let jpeg = small_jpeg();
    let mut dec = Decoder::new();
    assert!(dec.open(&jpeg[..6]).is_err());
    assert_eq!(dec.format(), None);
}

// ── Decode failures ─────────────────────────────────────────────────

#[test]
fn png_truncated_pixels_fails_decode() {
    let png = noise_png(64, 64);
    let cut = &png[..png.len() / 2];

    let mut dec = Decoder::new();
    assert_eq!(dec.open(cut).unwrap(), ImageFormat::Png);
    let mut out = vec![0u32; dec.pixel_count()];
    let err = dec.decode_argb32(&mut out).unwrap_err();
    assert!(
        matches!(err, CodecError::Library { format: ImageFormat::Png, .. }),
        "{err}"
    );
    // The failed decode released the image; the decoder is reusable.
    assert_eq!(dec.format(), None);
    dec.open(&png).unwrap();
    dec.decode_argb32(&mut out).unwrap();
}

#[test]
fn jpeg_missing_huffman_table_fails_decode() {
    let good = small_jpeg();
    let mut bad = good.clone();
    // First scan component: point both DC and AC at table 3, never defined.
    // Headers still parse; the tables are resolved when decoding starts.
    let sos = sos_offset(&bad);
    bad[sos + 6] = 0x33;

    let mut dec = Decoder::new();
    assert_eq!(dec.open(&bad).unwrap(), ImageFormat::Jpeg);
    assert_eq!((dec.width(), dec.height()), (3, 3));
    let mut out = vec![0u32; dec.pixel_count()];
    let err = dec.decode_argb32(&mut out).unwrap_err();
    assert!(
        matches!(err, CodecError::Library { format: ImageFormat::Jpeg, .. }),
        "{err}"
    );
    assert_eq!(dec.format(), None);

    dec.open(&good).unwrap();
    dec.decode_argb32(&mut out).unwrap();
    assert!(out.iter().all(|&px| px >> 24 == 0xFF));
}

#[test]
fn undersized_destination_is_rejected() {
    let png = noise_png(2, 2);
    let mut dec = Decoder::new();
    dec.open(&png).unwrap();
    let mut out = [0u32; 3];
    assert!(matches!(
        dec.decode_argb32(&mut out),
        Err(CodecError::BufferTooSmall { needed: 4, actual: 3 })
    ));
    assert_eq!(out, [0; 3], "nothing written on rejection");
    assert_eq!(dec.format(), None);
}

#[test]
fn undersized_destination_is_rejected_for_jpeg() {
    let jpeg = small_jpeg();
    let mut dec = Decoder::new();
    dec.open(&jpeg).unwrap();
    let mut out = [0u32; 8];
    assert!(matches!(
        dec.decode_argb32(&mut out),
        Err(CodecError::BufferTooSmall { needed: 9, actual: 8 })
    ));
}

// ── Limits ──────────────────────────────────────────────────────────

#[test]
fn limits_max_width_rejects_on_open() {
    let limits = Limits {
        max_width: Some(3),
        ..Default::default()
    };
    let png = noise_png(4, 1);
    let mut dec = Decoder::new().with_limits(limits.clone());
    assert!(matches!(dec.open(&png), Err(CodecError::LimitExceeded(_))));
    assert_eq!(dec.format(), None);

    let mut enc = Encoder::new();
    enc.encode_argb32_jpeg(&[0xFF00_0000; 4], 4, 1).unwrap();
    let mut dec = Decoder::new().with_limits(limits);
    assert!(matches!(
        dec.open(enc.encoded_bytes()),
        Err(CodecError::LimitExceeded(_))
    ));
}

#[test]
fn limits_max_pixels_rejects_on_open() {
    let limits = Limits {
        max_pixels: Some(15),
        ..Default::default()
    };
    let mut dec = Decoder::new().with_limits(limits);
    assert!(matches!(
        dec.open(&noise_png(4, 4)),
        Err(CodecError::LimitExceeded(_))
    ));
    // Within the limit.
    dec.open(&noise_png(3, 5)).unwrap();
    assert_eq!(dec.decode_argb32_to_vec().unwrap().len(), 15);
}

#[test]
fn limits_memory_rejects_allocation() {
    let limits = Limits {
        max_memory_bytes: Some(8),
        ..Default::default()
    };
    let jpeg = small_jpeg();
    let mut dec = Decoder::new().with_limits(limits);
    let err = match dec.open(&jpeg) {
        Ok(_) => dec.decode_argb32_to_vec().unwrap_err(),
        Err(err) => err,
    };
    assert!(matches!(err, CodecError::LimitExceeded(_)), "{err}");
    assert_eq!(dec.format(), None);
}

// ── Encode failures ─────────────────────────────────────────────────

#[test]
fn zero_dimensions_are_invalid() {
    let mut enc = Encoder::new();
    for (w, h) in [(0, 1), (1, 0), (0, 0)] {
        for format in [ImageFormat::Jpeg, ImageFormat::Png] {
            assert!(matches!(
                enc.encode_argb32(format, &[0xFF00_0000], w, h),
                Err(CodecError::InvalidDimensions { .. })
            ));
        }
    }
}

#[test]
fn short_pixel_slice_is_rejected() {
    let mut enc = Encoder::new();
    assert!(matches!(
        enc.encode_argb32_png(&[0xFF00_0000; 5], 3, 2),
        Err(CodecError::BufferTooSmall { needed: 6, actual: 5 })
    ));
    assert_eq!(enc.encoded_byte_count(), 0);
}

#[test]
fn long_pixel_slice_encodes_leading_pixels() {
    let mut pixels = vec![0xFF10_2030u32; 6];
    pixels.extend_from_slice(&[0x0000_0000; 3]);
    let mut enc = Encoder::new();
    enc.encode_argb32_png(&pixels, 3, 2).unwrap();

    let mut dec = Decoder::new();
    dec.open(enc.encoded_bytes()).unwrap();
    assert_eq!(dec.decode_argb32_to_vec().unwrap(), &pixels[..6]);
}

#[test]
fn jpeg_dimension_ceiling() {
    let pixels = vec![0xFF00_0000u32; 70_000];
    let mut enc = Encoder::new();
    assert!(matches!(
        enc.encode_argb32_jpeg(&pixels, 70_000, 1),
        Err(CodecError::DimensionsTooLarge { width: 70_000, height: 1 })
    ));
    // PNG has no such ceiling.
    enc.encode_argb32_png(&pixels, 70_000, 1).unwrap();
}

#[test]
fn output_limit_aborts_and_discards_partial_output() {
    let pixels = vec![0xFF80_4020u32; 32 * 32];
    for format in [ImageFormat::Jpeg, ImageFormat::Png] {
        let mut enc = Encoder::new();
        enc.set_max_output_bytes(Some(16));
        let err = enc.encode_argb32(format, &pixels, 32, 32).unwrap_err();
        assert!(matches!(err, CodecError::LimitExceeded(_)), "{format:?}: {err}");
        assert_eq!(enc.encoded_byte_count(), 0);
        assert!(enc.encoded_bytes().is_empty());

        // Lifting the cap makes the same encoder usable again.
        enc.set_max_output_bytes(None);
        enc.encode_argb32(format, &pixels, 32, 32).unwrap();
        assert_eq!(ImageFormat::detect(enc.encoded_bytes()), Some(format));
    }
}

#[test]
fn error_messages_are_descriptive() {
    let err = CodecError::BufferTooSmall {
        needed: 4,
        actual: 3,
    };
    assert_eq!(err.to_string(), "buffer too small: need 4, got 3");
    assert_eq!(
        CodecError::UnrecognizedFormat.to_string(),
        "unrecognized format magic bytes"
    );
}
