use crate::format::ImageFormat;

/// Errors from ARGB32 decoding and encoding.
///
/// Every failing [`Decoder`](crate::Decoder) or [`Encoder`](crate::Encoder)
/// operation reports one of these and leaves no library context behind.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CodecError {
    #[error("unrecognized format magic bytes")]
    UnrecognizedFormat,

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("allocation of {bytes} bytes failed")]
    AllocationFailure { bytes: usize },

    #[error("{format:?} library error: {message}")]
    Library {
        format: ImageFormat,
        message: String,
    },

    #[error("buffer too small: need {needed}, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("decoder has no opened image")]
    NotOpened,
}

impl CodecError {
    pub(crate) fn library(format: ImageFormat, message: impl Into<String>) -> Self {
        CodecError::Library {
            format,
            message: message.into(),
        }
    }
}
