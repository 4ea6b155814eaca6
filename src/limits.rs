use crate::error::CodecError;

/// Caps a [`Decoder`](crate::Decoder) enforces on untrusted input.
///
/// Dimension caps are checked as soon as `open` has read the header. The
/// memory cap covers every buffer a decode allocates: the ARGB32 destination
/// of [`decode_argb32_to_vec`](crate::Decoder::decode_argb32_to_vec), the RGB
/// scratch the JPEG decoder fills, and the PNG row buffer (also handed to the
/// `png` reader as its own allocation limit). `None` leaves a dimension
/// unbounded.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Cap on `width * height`.
    pub max_pixels: Option<u64>,
    /// Cap on any single decode buffer, in bytes.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Reject a header whose dimensions exceed a cap.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), CodecError> {
        if let Some(max) = self.max_width.filter(|&max| u64::from(width) > max) {
            return Err(CodecError::LimitExceeded(format!(
                "image is {width} pixels wide, decoder allows {max}"
            )));
        }
        if let Some(max) = self.max_height.filter(|&max| u64::from(height) > max) {
            return Err(CodecError::LimitExceeded(format!(
                "image is {height} pixels high, decoder allows {max}"
            )));
        }
        let pixels = u64::from(width) * u64::from(height);
        if let Some(max) = self.max_pixels.filter(|&max| pixels > max) {
            return Err(CodecError::LimitExceeded(format!(
                "{width}x{height} image has {pixels} pixels, decoder allows {max}"
            )));
        }
        Ok(())
    }

    /// Reject a decode buffer of `bytes` over the memory cap.
    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), CodecError> {
        match self.max_memory_bytes {
            Some(max) if bytes as u64 > max => Err(CodecError::LimitExceeded(format!(
                "decode buffer of {bytes} bytes, decoder allows {max}"
            ))),
            _ => Ok(()),
        }
    }

    /// Memory cap in the form the `png` reader takes.
    pub(crate) fn memory_budget(&self) -> Option<usize> {
        self.max_memory_bytes
            .map(|max| usize::try_from(max).unwrap_or(usize::MAX))
    }
}
