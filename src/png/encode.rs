//! PNG encode: opaque images are written as RGB, everything else as RGBA.

use png::{BitDepth, ColorType};

use super::PngCompression;
use crate::buffer::BufferSink;
use crate::channel::ErrorChannel;
use crate::error::CodecError;
use crate::pixel::{Argb32, pack_rgb_row, pack_rgba_row};
use crate::transform::has_translucent_pixels;

/// Compress `pixels` (exactly `width * height`) as an 8-bit PNG.
pub(crate) fn encode_argb32(
    pixels: &[Argb32],
    width: u32,
    height: u32,
    compression: PngCompression,
    sink: BufferSink<'_>,
    channel: &ErrorChannel,
) -> Result<(), CodecError> {
    let translucent = has_translucent_pixels(pixels);
    let (color, bpp) = if translucent {
        (ColorType::Rgba, 4)
    } else {
        (ColorType::Rgb, 3)
    };
    log::debug!("png encode {width}x{height} as {color:?}");

    let w = width as usize;
    let size = pixels
        .len()
        .checked_mul(bpp)
        .ok_or(CodecError::DimensionsTooLarge { width, height })?;
    let mut samples = Vec::new();
    samples
        .try_reserve_exact(size)
        .map_err(|_| CodecError::AllocationFailure { bytes: size })?;
    samples.resize(size, 0);

    for (src, dst) in pixels.chunks_exact(w).zip(samples.chunks_exact_mut(w * bpp)) {
        if translucent {
            pack_rgba_row(src, dst)?;
        } else {
            pack_rgb_row(src, dst)?;
        }
    }

    let mut encoder = png::Encoder::new(sink, width, height);
    encoder.set_color(color);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(compression.to_png());

    let mut writer = channel.check(encoder.write_header())?;
    channel.check(writer.write_image_data(&samples))?;
    channel.check(writer.finish())
}
