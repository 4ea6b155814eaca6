/// Compressed image format, detected from the first input byte.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// JPEG (lossy, no alpha). Starts with the SOI marker `FF D8`.
    Jpeg,
    /// PNG (lossless, alpha). Starts with the signature `89 'P' 'N' 'G'`.
    Png,
}

/// Inputs shorter than this are never sniffed.
pub(crate) const MIN_SNIFF_LEN: usize = 4;

impl ImageFormat {
    /// Identify the format from magic bytes.
    ///
    /// Only the first byte is inspected: `0xFF` is JPEG, `0x89` is PNG.
    /// Returns `None` for inputs shorter than 4 bytes.
    pub fn detect(data: &[u8]) -> Option<Self> {
        if data.len() < MIN_SNIFF_LEN {
            return None;
        }
        match data[0] {
            0xFF => Some(Self::Jpeg),
            0x89 => Some(Self::Png),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    /// Whether the format can carry an alpha channel.
    pub fn supports_alpha(&self) -> bool {
        matches!(self, Self::Png)
    }
}
