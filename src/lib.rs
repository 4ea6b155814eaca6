//! # zenargb
//!
//! JPEG and PNG decoding to, and encoding from, packed ARGB32 pixel buffers.
//!
//! A pixel is one `u32` laid out as `(a << 24) | (r << 16) | (g << 8) | b`,
//! in straight (non-premultiplied) alpha. Bitstream work is delegated to
//! [`zune-jpeg`](https://crates.io/crates/zune-jpeg),
//! [`jpeg-encoder`](https://crates.io/crates/jpeg-encoder) and
//! [`png`](https://crates.io/crates/png); this crate handles format
//! detection, row repacking between library samples and packed pixels, and
//! error containment so that no library failure leaves state behind.
//!
//! ## Supported Formats
//!
//! - **JPEG**: decode of baseline and progressive, grayscale and color;
//!   encode as baseline YCbCr. No alpha.
//! - **PNG**: decode of every color type and bit depth (normalized to
//!   8 bits per channel); encode as 8-bit RGB when opaque, RGBA otherwise.
//!
//! ## Non-Goals
//!
//! - Pixel layouts other than packed ARGB32
//! - Streaming or incremental decode
//! - Animated formats
//! - Color management
//!
//! ## Usage
//!
//! ```no_run
//! use zenargb::{Decoder, Encoder, premultiply_alpha};
//!
//! let data: &[u8] = &[]; // your JPEG/PNG bytes
//!
//! let mut decoder = Decoder::new();
//! let format = decoder.open(data)?;
//! let (width, height) = (decoder.width(), decoder.height());
//! println!("{format:?} {width}x{height}");
//!
//! let mut pixels = vec![0u32; decoder.pixel_count()];
//! decoder.decode_argb32(&mut pixels)?;
//!
//! let mut encoder = Encoder::new().with_quality(90);
//! encoder.encode_argb32_jpeg(&pixels, width, height)?;
//! let jpeg = encoder.take_encoded();
//!
//! premultiply_alpha(&mut pixels);
//! # Ok::<(), zenargb::CodecError>(())
//! ```

#![forbid(unsafe_code)]

mod buffer;
mod channel;
mod decode;
mod encode;
mod error;
mod format;
mod jpeg;
mod limits;
mod pixel;
mod png;
mod transform;

// Re-exports
pub use buffer::{GrowableByteBuffer, MIN_CAPACITY};
pub use decode::Decoder;
pub use encode::{DEFAULT_QUALITY, Encoder};
pub use error::CodecError;
pub use format::ImageFormat;
pub use limits::Limits;
pub use pixel::{ALPHA_MASK, Argb32, pack_argb, unpack_argb};
pub use crate::png::PngCompression;
pub use transform::{demultiply_alpha, has_translucent_pixels, premultiply_alpha, swap_red_and_blue};
