//! PNG decode: header on open, whole-image row decode on decode.

use png::{BitDepth, ColorType, Transformations};

use crate::channel::ErrorChannel;
use crate::error::CodecError;
use crate::format::ImageFormat;
use crate::limits::Limits;
use crate::pixel::{Argb32, SampleLayout, unpack_row};

/// Read context bound to the caller's input bytes.
pub(crate) struct PngContext<'a> {
    reader: png::Reader<&'a [u8]>,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

/// Configure the reader and parse everything up to the first IDAT.
pub(crate) fn open<'a>(
    data: &'a [u8],
    limits: Option<&Limits>,
    channel: &ErrorChannel,
) -> Result<PngContext<'a>, CodecError> {
    let mut decoder = png::Decoder::new(data);
    // Palette, tRNS and sub-byte depths expand; 16-bit samples drop to 8.
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    // Text metadata never affects pixels.
    decoder.set_ignore_text_chunk(true);
    if let Some(bytes) = limits.and_then(Limits::memory_budget) {
        let mut png_limits = png::Limits::default();
        png_limits.bytes = bytes;
        decoder.set_limits(png_limits);
    }

    let reader = channel
        .check(decoder.read_info())
        .map_err(|err| match err {
            CodecError::Library { message, .. } => CodecError::MalformedHeader(message),
            other => other,
        })?;

    let info = reader.info();
    let (width, height) = (info.width, info.height);
    if width == 0 || height == 0 {
        return Err(CodecError::MalformedHeader(format!(
            "png image is {width}x{height}"
        )));
    }

    Ok(PngContext {
        reader,
        width,
        height,
    })
}

fn sample_layout(color: ColorType, depth: BitDepth) -> Result<SampleLayout, CodecError> {
    if depth != BitDepth::Eight {
        return Err(CodecError::library(
            ImageFormat::Png,
            format!("unexpected {depth:?} output after normalization"),
        ));
    }
    match color {
        ColorType::Grayscale => Ok(SampleLayout::Gray8),
        ColorType::GrayscaleAlpha => Ok(SampleLayout::GrayAlpha8),
        ColorType::Rgb => Ok(SampleLayout::Rgb8),
        ColorType::Rgba => Ok(SampleLayout::Rgba8),
        ColorType::Indexed => Err(CodecError::library(
            ImageFormat::Png,
            "palette survived expansion",
        )),
    }
}

/// Decode the image into row buffers and repack each row into `dst`.
pub(crate) fn decode_argb32(
    mut ctx: PngContext<'_>,
    dst: &mut [Argb32],
    limits: Option<&Limits>,
    channel: &ErrorChannel,
) -> Result<(), CodecError> {
    let (color, depth) = ctx.reader.output_color_type();
    let layout = sample_layout(color, depth)?;

    let size = ctx.reader.output_buffer_size();
    if let Some(limits) = limits {
        limits.check_memory(size)?;
    }
    let mut rows = Vec::new();
    rows.try_reserve_exact(size)
        .map_err(|_| CodecError::AllocationFailure { bytes: size })?;
    rows.resize(size, 0);

    let frame = channel.check(ctx.reader.next_frame(&mut rows))?;

    let w = ctx.width as usize;
    let row_bytes = w * layout.bytes_per_pixel();
    if frame.line_size < row_bytes || frame.height != ctx.height {
        return Err(CodecError::library(
            ImageFormat::Png,
            format!(
                "frame rows of {} bytes x {} for a {}x{} image",
                frame.line_size,
                frame.height,
                ctx.width,
                ctx.height
            ),
        ));
    }

    for (src, out) in rows
        .chunks_exact(frame.line_size)
        .zip(dst.chunks_exact_mut(w))
    {
        unpack_row(layout, &src[..row_bytes], out)?;
    }

    Ok(())
}
