//! PNG binding on the `png` crate.
//!
//! Decoding normalizes every color type and bit depth to 8-bit gray, gray
//! alpha, RGB or RGBA rows before repacking; encoding picks RGB when the
//! image is fully opaque and RGBA otherwise.

mod decode;
mod encode;

pub(crate) use decode::{PngContext, decode_argb32, open};
pub(crate) use encode::encode_argb32;

use crate::channel::LibraryError;
use crate::error::CodecError;
use crate::format::ImageFormat;

/// zlib effort for PNG output.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PngCompression {
    Fast,
    #[default]
    Default,
    Best,
}

impl PngCompression {
    pub(crate) fn to_png(self) -> png::Compression {
        match self {
            PngCompression::Fast => png::Compression::Fast,
            PngCompression::Default => png::Compression::Default,
            PngCompression::Best => png::Compression::Best,
        }
    }
}

impl LibraryError for png::DecodingError {
    fn into_codec_error(self) -> CodecError {
        match self {
            png::DecodingError::LimitsExceeded => {
                CodecError::LimitExceeded("png decoder memory limit".into())
            }
            other => CodecError::library(ImageFormat::Png, format!("{other}")),
        }
    }
}

impl LibraryError for png::EncodingError {
    fn into_codec_error(self) -> CodecError {
        CodecError::library(ImageFormat::Png, format!("{self}"))
    }
}
