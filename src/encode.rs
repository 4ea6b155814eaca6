use crate::buffer::{BufferSink, GrowableByteBuffer};
use crate::channel::ErrorChannel;
use crate::error::CodecError;
use crate::format::ImageFormat;
use crate::pixel::Argb32;
use crate::png::PngCompression;
use crate::{jpeg, png};

/// Default JPEG quality.
pub const DEFAULT_QUALITY: u8 = 75;

/// JPEG/PNG encoder from packed ARGB32 pixels.
///
/// The encoded result of the last successful call is held until the next
/// encode call or until it is taken with [`take_encoded`](Self::take_encoded).
///
/// ```no_run
/// use zenargb::Encoder;
///
/// let pixels = [0xFF33_6699u32; 4];
/// let mut encoder = Encoder::new();
/// encoder.encode_argb32_png(&pixels, 2, 2)?;
/// let png_bytes = encoder.take_encoded();
/// # Ok::<(), zenargb::CodecError>(())
/// ```
#[derive(Debug)]
pub struct Encoder {
    quality: u8,
    png_compression: PngCompression,
    output: GrowableByteBuffer,
    channel: ErrorChannel,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            png_compression: PngCompression::Default,
            output: GrowableByteBuffer::new(),
            channel: ErrorChannel::new(),
        }
    }

    /// JPEG quality, 0 to 100.
    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Set JPEG quality; values above 100 are clamped. PNG ignores it.
    pub fn set_quality(&mut self, quality: u8) {
        self.quality = quality.min(100);
    }

    /// Builder form of [`set_quality`](Self::set_quality).
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.set_quality(quality);
        self
    }

    pub fn png_compression(&self) -> PngCompression {
        self.png_compression
    }

    pub fn set_png_compression(&mut self, compression: PngCompression) {
        self.png_compression = compression;
    }

    /// Fail encodes whose output would grow past `max_bytes`.
    pub fn set_max_output_bytes(&mut self, max_bytes: Option<usize>) {
        self.output.set_max_len(max_bytes);
    }

    /// Result of the last successful encode; empty after a failure.
    pub fn encoded_bytes(&self) -> &[u8] {
        self.output.as_slice()
    }

    pub fn encoded_byte_count(&self) -> usize {
        self.output.len()
    }

    /// Move the encoded result out, leaving no held bytes.
    pub fn take_encoded(&mut self) -> Vec<u8> {
        self.output.take()
    }

    /// Make room for `additional` more output bytes.
    pub fn reserve(&mut self, additional: usize) -> Result<(), CodecError> {
        self.output.reserve(additional)
    }

    /// Append raw bytes to the output.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.output.write(bytes)
    }

    /// Encode as baseline JPEG at the configured quality. Alpha is dropped.
    pub fn encode_argb32_jpeg(
        &mut self,
        pixels: &[Argb32],
        width: u32,
        height: u32,
    ) -> Result<(), CodecError> {
        self.encode_argb32(ImageFormat::Jpeg, pixels, width, height)
    }

    /// Encode as 8-bit PNG: RGB when every pixel is opaque, RGBA otherwise.
    pub fn encode_argb32_png(
        &mut self,
        pixels: &[Argb32],
        width: u32,
        height: u32,
    ) -> Result<(), CodecError> {
        self.encode_argb32(ImageFormat::Png, pixels, width, height)
    }

    /// Encode `pixels` into `format`.
    ///
    /// `pixels` must hold at least `width * height` values; the first
    /// `width * height` are encoded row by row.
    pub fn encode_argb32(
        &mut self,
        format: ImageFormat,
        pixels: &[Argb32],
        width: u32,
        height: u32,
    ) -> Result<(), CodecError> {
        self.output.clear();
        self.channel.arm();

        let result = self.encode_inner(format, pixels, width, height);
        let result = self.channel.settle(result);
        if result.is_err() {
            self.output.clear();
        }
        result
    }

    fn encode_inner(
        &mut self,
        format: ImageFormat,
        pixels: &[Argb32],
        width: u32,
        height: u32,
    ) -> Result<(), CodecError> {
        let pixels = image_pixels(pixels, width, height)?;
        let sink = BufferSink::new(&mut self.output, &self.channel);
        match format {
            ImageFormat::Jpeg => {
                log::debug!("jpeg encode {width}x{height} at quality {}", self.quality);
                jpeg::encode_argb32(pixels, width, height, self.quality, sink, &self.channel)
            }
            ImageFormat::Png => png::encode_argb32(
                pixels,
                width,
                height,
                self.png_compression,
                sink,
                &self.channel,
            ),
        }
    }

    /// Encode an [`imgref::ImgRef`] as PNG, honoring its stride.
    #[cfg(feature = "imgref")]
    pub fn encode_png_img(&mut self, img: imgref::ImgRef<'_, Argb32>) -> Result<(), CodecError> {
        self.encode_img(ImageFormat::Png, img)
    }

    /// Encode an [`imgref::ImgRef`] as JPEG, honoring its stride.
    #[cfg(feature = "imgref")]
    pub fn encode_jpeg_img(&mut self, img: imgref::ImgRef<'_, Argb32>) -> Result<(), CodecError> {
        self.encode_img(ImageFormat::Jpeg, img)
    }

    #[cfg(feature = "imgref")]
    fn encode_img(
        &mut self,
        format: ImageFormat,
        img: imgref::ImgRef<'_, Argb32>,
    ) -> Result<(), CodecError> {
        let (width, height) = (img.width(), img.height());
        let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
            return Err(CodecError::DimensionsTooLarge {
                width: u32::MAX,
                height: u32::MAX,
            });
        };
        if img.stride() == width {
            return self.encode_argb32(format, img.buf(), w, h);
        }

        let count = width
            .checked_mul(height)
            .ok_or(CodecError::DimensionsTooLarge { width: w, height: h })?;
        let mut packed = Vec::new();
        packed
            .try_reserve_exact(count)
            .map_err(|_| CodecError::AllocationFailure {
                bytes: count.saturating_mul(core::mem::size_of::<Argb32>()),
            })?;
        for row in img.rows() {
            packed.extend_from_slice(row);
        }
        self.encode_argb32(format, &packed, w, h)
    }
}

/// Validate dimensions and return exactly the `width * height` pixels.
fn image_pixels(pixels: &[Argb32], width: u32, height: u32) -> Result<&[Argb32], CodecError> {
    if width == 0 || height == 0 {
        return Err(CodecError::InvalidDimensions { width, height });
    }
    let count = (width as usize)
        .checked_mul(height as usize)
        .ok_or(CodecError::DimensionsTooLarge { width, height })?;
    pixels.get(..count).ok_or(CodecError::BufferTooSmall {
        needed: count,
        actual: pixels.len(),
    })
}
