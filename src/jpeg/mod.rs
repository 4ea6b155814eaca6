//! JPEG binding: `zune-jpeg` decodes, `jpeg-encoder` encodes.
//!
//! JPEG carries no transparency. Decoded pixels are always opaque and
//! encoding drops alpha.

mod decode;
mod encode;

pub(crate) use decode::{JpegContext, decode_argb32, open};
pub(crate) use encode::encode_argb32;

use crate::channel::LibraryError;
use crate::error::CodecError;
use crate::format::ImageFormat;

impl LibraryError for zune_jpeg::errors::DecodeErrors {
    fn into_codec_error(self) -> CodecError {
        CodecError::library(ImageFormat::Jpeg, format!("{self:?}"))
    }
}

impl LibraryError for jpeg_encoder::EncodingError {
    fn into_codec_error(self) -> CodecError {
        CodecError::library(ImageFormat::Jpeg, format!("{self}"))
    }
}
