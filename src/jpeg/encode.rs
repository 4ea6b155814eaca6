//! JPEG encode: scanlines are produced on demand as the library asks.

use core::cell::Cell;

use jpeg_encoder::{ImageBuffer, JpegColorType, rgb_to_ycbcr};

use crate::buffer::BufferSink;
use crate::channel::ErrorChannel;
use crate::error::CodecError;
use crate::pixel::{Argb32, pack_rgb_row};

/// Row producer handed to the library.
///
/// Each `fill_buffers` call repacks one row into the shared RGB scratch row
/// and feeds it to the component buffers as YCbCr.
struct Argb32Rows<'a> {
    pixels: &'a [Argb32],
    width: u16,
    height: u16,
    scratch: Cell<Vec<u8>>,
    channel: &'a ErrorChannel,
}

impl ImageBuffer for Argb32Rows<'_> {
    fn get_jpeg_color_type(&self) -> JpegColorType {
        JpegColorType::Ycbcr
    }

    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn fill_buffers(&self, y: u16, buffers: &mut [Vec<u8>; 4]) {
        // Rows past the end pad the last MCU row with the final scanline.
        let y = y.min(self.height.saturating_sub(1));
        let w = usize::from(self.width);
        let start = usize::from(y) * w;
        let Some(row) = self.pixels.get(start..start + w) else {
            self.channel.raise(CodecError::BufferTooSmall {
                needed: start + w,
                actual: self.pixels.len(),
            });
            fill_neutral(buffers, w);
            return;
        };

        let mut scratch = self.scratch.take();
        match pack_rgb_row(row, &mut scratch) {
            Ok(()) => {
                for rgb in scratch.chunks_exact(3) {
                    let (luma, cb, cr) = rgb_to_ycbcr(rgb[0], rgb[1], rgb[2]);
                    buffers[0].push(luma);
                    buffers[1].push(cb);
                    buffers[2].push(cr);
                }
            }
            Err(err) => {
                self.channel.raise(err);
                fill_neutral(buffers, w);
            }
        }
        self.scratch.set(scratch);
    }
}

/// Keep the library's row bookkeeping intact after a raised fault; the
/// output is discarded at the next checkpoint anyway.
fn fill_neutral(buffers: &mut [Vec<u8>; 4], w: usize) {
    buffers[0].extend(core::iter::repeat_n(0, w));
    buffers[1].extend(core::iter::repeat_n(128, w));
    buffers[2].extend(core::iter::repeat_n(128, w));
}

/// Compress `pixels` (exactly `width * height`) as baseline YCbCr JPEG.
pub(crate) fn encode_argb32(
    pixels: &[Argb32],
    width: u32,
    height: u32,
    quality: u8,
    sink: BufferSink<'_>,
    channel: &ErrorChannel,
) -> Result<(), CodecError> {
    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(CodecError::DimensionsTooLarge { width, height });
    };

    let mut scratch = Vec::new();
    let row_bytes = usize::from(w) * 3;
    scratch
        .try_reserve_exact(row_bytes)
        .map_err(|_| CodecError::AllocationFailure { bytes: row_bytes })?;
    scratch.resize(row_bytes, 0);

    let rows = Argb32Rows {
        pixels,
        width: w,
        height: h,
        scratch: Cell::new(scratch),
        channel,
    };

    // The library's scale starts at 1.
    let encoder = jpeg_encoder::Encoder::new(sink, quality.clamp(1, 100));
    channel.check(encoder.encode_image(rows))
}
