use crate::channel::ErrorChannel;
use crate::error::CodecError;
use crate::format::ImageFormat;
use crate::limits::Limits;
use crate::pixel::Argb32;
use crate::{jpeg, png};

/// Library context of the image bound by the last successful [`Decoder::open`].
enum OpenState<'a> {
    Unset,
    Jpeg(jpeg::JpegContext<'a>),
    Png(png::PngContext<'a>),
}

/// Whole-image JPEG/PNG decoder producing packed ARGB32 pixels.
///
/// `open` sniffs the format and reads the header; `decode_argb32` decodes
/// the pixels and releases the library context whatever the outcome. The
/// decoder may be reopened afterwards.
///
/// ```no_run
/// use zenargb::Decoder;
///
/// let data: &[u8] = &[]; // your JPEG/PNG bytes
/// let mut decoder = Decoder::new();
/// decoder.open(data)?;
/// let mut pixels = vec![0u32; decoder.pixel_count()];
/// decoder.decode_argb32(&mut pixels)?;
/// # Ok::<(), zenargb::CodecError>(())
/// ```
pub struct Decoder<'a> {
    state: OpenState<'a>,
    width: u32,
    height: u32,
    limits: Option<Limits>,
    channel: ErrorChannel,
}

impl Default for Decoder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Decoder<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Decoder")
            .field("format", &self.format())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("limits", &self.limits)
            .finish()
    }
}

impl<'a> Decoder<'a> {
    pub fn new() -> Self {
        Self {
            state: OpenState::Unset,
            width: 0,
            height: 0,
            limits: None,
            channel: ErrorChannel::new(),
        }
    }

    /// Apply resource limits to subsequent opens and decodes.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Image width; valid after a successful [`open`](Self::open).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height; valid after a successful [`open`](Self::open).
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Format of the currently opened image, `None` when nothing is open.
    pub fn format(&self) -> Option<ImageFormat> {
        match self.state {
            OpenState::Unset => None,
            OpenState::Jpeg(_) => Some(ImageFormat::Jpeg),
            OpenState::Png(_) => Some(ImageFormat::Png),
        }
    }

    /// `width * height`, the destination length `decode_argb32` needs.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Detect the format of `data` and read its header.
    ///
    /// Any previously opened image is released first. On failure the decoder
    /// is left unset.
    pub fn open(&mut self, data: &'a [u8]) -> Result<ImageFormat, CodecError> {
        self.state = OpenState::Unset;
        self.width = 0;
        self.height = 0;
        self.channel.arm();

        let result = self.open_inner(data);
        self.channel.settle(result)
    }

    fn open_inner(&mut self, data: &'a [u8]) -> Result<ImageFormat, CodecError> {
        let format = ImageFormat::detect(data).ok_or(CodecError::UnrecognizedFormat)?;
        log::debug!("detected {format:?} input, {} bytes", data.len());

        let limits = self.limits.as_ref();
        let (state, width, height) = match format {
            ImageFormat::Jpeg => {
                let ctx = jpeg::open(data, &self.channel)?;
                let (w, h) = (ctx.width, ctx.height);
                (OpenState::Jpeg(ctx), w, h)
            }
            ImageFormat::Png => {
                let ctx = png::open(data, limits, &self.channel)?;
                let (w, h) = (ctx.width, ctx.height);
                (OpenState::Png(ctx), w, h)
            }
        };
        if let Some(limits) = limits {
            limits.check(width, height)?;
        }

        self.state = state;
        self.width = width;
        self.height = height;
        Ok(format)
    }

    /// Decode the opened image into `dst`.
    ///
    /// `dst` must hold at least `width * height` pixels; the first
    /// `width * height` are written row by row in straight alpha. The opened
    /// state is consumed on success and on failure.
    pub fn decode_argb32(&mut self, dst: &mut [Argb32]) -> Result<(), CodecError> {
        let state = core::mem::replace(&mut self.state, OpenState::Unset);
        self.channel.arm();

        let result = self.decode_inner(state, dst);
        self.channel.settle(result)
    }

    fn decode_inner(&self, state: OpenState<'a>, dst: &mut [Argb32]) -> Result<(), CodecError> {
        if matches!(state, OpenState::Unset) {
            return Err(CodecError::NotOpened);
        }
        let (width, height) = (self.width, self.height);
        let count = (width as usize)
            .checked_mul(height as usize)
            .ok_or(CodecError::DimensionsTooLarge { width, height })?;
        if dst.len() < count {
            return Err(CodecError::BufferTooSmall {
                needed: count,
                actual: dst.len(),
            });
        }

        let dst = &mut dst[..count];
        let limits = self.limits.as_ref();
        match state {
            OpenState::Unset => Err(CodecError::NotOpened),
            OpenState::Jpeg(ctx) => jpeg::decode_argb32(ctx, dst, limits, &self.channel),
            OpenState::Png(ctx) => png::decode_argb32(ctx, dst, limits, &self.channel),
        }
    }

    /// Allocate a `width * height` buffer and decode into it.
    pub fn decode_argb32_to_vec(&mut self) -> Result<Vec<Argb32>, CodecError> {
        if matches!(self.state, OpenState::Unset) {
            return self.channel.settle(Err(CodecError::NotOpened));
        }
        let mut pixels = match self.alloc_pixels() {
            Ok(pixels) => pixels,
            Err(err) => {
                self.state = OpenState::Unset;
                return self.channel.settle(Err(err));
            }
        };
        self.decode_argb32(&mut pixels)?;
        Ok(pixels)
    }

    fn alloc_pixels(&self) -> Result<Vec<Argb32>, CodecError> {
        let (width, height) = (self.width, self.height);
        let count = (width as usize)
            .checked_mul(height as usize)
            .ok_or(CodecError::DimensionsTooLarge { width, height })?;
        let bytes = count
            .checked_mul(core::mem::size_of::<Argb32>())
            .ok_or(CodecError::DimensionsTooLarge { width, height })?;
        if let Some(limits) = &self.limits {
            limits.check_memory(bytes)?;
        }

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(count)
            .map_err(|_| CodecError::AllocationFailure { bytes })?;
        pixels.resize(count, 0);
        Ok(pixels)
    }

    /// Decode into an [`imgref::ImgVec`] of packed ARGB32 pixels.
    #[cfg(feature = "imgref")]
    pub fn decode_to_imgvec(&mut self) -> Result<imgref::ImgVec<Argb32>, CodecError> {
        let (width, height) = (self.width as usize, self.height as usize);
        let pixels = self.decode_argb32_to_vec()?;
        Ok(imgref::ImgVec::new(pixels, width, height))
    }
}
