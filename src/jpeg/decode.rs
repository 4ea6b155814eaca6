//! JPEG decode: header read on open, scanline conversion on decode.

use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

use crate::channel::ErrorChannel;
use crate::error::CodecError;
use crate::format::ImageFormat;
use crate::limits::Limits;
use crate::pixel::{ALPHA_MASK, Argb32, SampleLayout, unpack_row};

/// Decompression context bound to the caller's input bytes.
pub(crate) struct JpegContext<'a> {
    decoder: JpegDecoder<'a>,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

/// Bind a decoder to `data` and read the headers.
///
/// Dimension caps from [`Limits`] are applied by the caller once the header
/// is known; the library only gets its format ceiling.
pub(crate) fn open<'a>(
    data: &'a [u8],
    channel: &ErrorChannel,
) -> Result<JpegContext<'a>, CodecError> {
    let max = usize::from(u16::MAX);
    let options = DecoderOptions::default()
        .jpeg_set_out_colorspace(ColorSpace::RGB)
        .set_max_width(max)
        .set_max_height(max);

    let mut decoder = JpegDecoder::new_with_options(options, data);
    channel
        .check(decoder.decode_headers())
        .map_err(into_header_error)?;

    let width = u32::from(decoder.width());
    let height = u32::from(decoder.height());
    if width == 0 || height == 0 {
        return Err(CodecError::MalformedHeader(format!(
            "jpeg frame is {width}x{height}"
        )));
    }

    Ok(JpegContext {
        decoder,
        width,
        height,
    })
}

fn into_header_error(err: CodecError) -> CodecError {
    match err {
        CodecError::Library { message, .. } => CodecError::MalformedHeader(message),
        other => other,
    }
}

/// Decode every scanline of an opened image into `dst`.
///
/// The context is consumed; the library state is gone when this returns,
/// whatever the outcome.
pub(crate) fn decode_argb32(
    mut ctx: JpegContext<'_>,
    dst: &mut [Argb32],
    limits: Option<&Limits>,
    channel: &ErrorChannel,
) -> Result<(), CodecError> {
    let (width, height) = (ctx.width, ctx.height);
    let w = width as usize;
    let h = height as usize;
    let count = w
        .checked_mul(h)
        .ok_or(CodecError::DimensionsTooLarge { width, height })?;
    if let Some(limits) = limits {
        let scratch = count
            .checked_mul(3)
            .ok_or(CodecError::DimensionsTooLarge { width, height })?;
        limits.check_memory(scratch)?;
    }

    let samples = channel.check(ctx.decoder.decode())?;

    // Grayscale streams may come back single-channel; the sample count tells.
    let channels = samples.len() / count;
    let layout = SampleLayout::from_channels(channels)
        .filter(|_| samples.len() == count * channels)
        .ok_or_else(|| {
            CodecError::library(
                ImageFormat::Jpeg,
                format!(
                    "{} samples for a {width}x{height} image ({:?})",
                    samples.len(),
                    ctx.decoder.get_output_colorspace()
                ),
            )
        })?;

    let row_bytes = w * channels;
    for (src, out) in samples
        .chunks_exact(row_bytes)
        .zip(dst[..count].chunks_exact_mut(w))
    {
        unpack_row(layout, src, out)?;
        if layout.has_alpha() {
            out.iter_mut().for_each(|px| *px |= ALPHA_MASK);
        }
    }

    Ok(())
}
