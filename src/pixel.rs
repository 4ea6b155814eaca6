//! Packed ARGB32 pixels and row repacking to and from library sample rows.
//!
//! A pixel is one `u32`: `(a << 24) | (r << 16) | (g << 8) | b`. On
//! little-endian targets that value sits in memory as B,G,R,A bytes, so
//! converting a library row is a byte swizzle done with `garb` over a
//! `bytemuck` byte view of the destination row. Big-endian targets take the
//! scalar path.

use crate::error::CodecError;

/// One packed pixel, alpha in the high byte, blue in the low byte.
pub type Argb32 = u32;

/// Alpha mask of a packed pixel.
pub const ALPHA_MASK: u32 = 0xFF00_0000;

/// Pack straight-alpha channels into an ARGB32 value.
#[inline]
pub const fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> Argb32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Split an ARGB32 value into `(a, r, g, b)`.
#[inline]
pub const fn unpack_argb(pixel: Argb32) -> (u8, u8, u8, u8) {
    (
        (pixel >> 24) as u8,
        (pixel >> 16) as u8,
        (pixel >> 8) as u8,
        pixel as u8,
    )
}

/// Interleaved 8-bit sample layout of a library scanline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SampleLayout {
    /// Single channel, 8-bit grayscale.
    Gray8,
    /// Grayscale followed by alpha.
    GrayAlpha8,
    /// 3 channels, 8-bit RGB.
    Rgb8,
    /// 4 channels, 8-bit RGBA.
    Rgba8,
}

impl SampleLayout {
    /// Bytes per pixel for this layout.
    pub(crate) fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::GrayAlpha8 => 2,
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }

    /// Whether samples carry their own alpha.
    pub(crate) fn has_alpha(&self) -> bool {
        matches!(self, Self::GrayAlpha8 | Self::Rgba8)
    }

    pub(crate) fn from_channels(channels: usize) -> Option<Self> {
        match channels {
            1 => Some(Self::Gray8),
            2 => Some(Self::GrayAlpha8),
            3 => Some(Self::Rgb8),
            4 => Some(Self::Rgba8),
            _ => None,
        }
    }
}

fn check_row(src_len: usize, bpp: usize, pixels: usize) -> Result<(), CodecError> {
    let needed = pixels.checked_mul(bpp).ok_or(CodecError::BufferTooSmall {
        needed: usize::MAX,
        actual: src_len,
    })?;
    if src_len != needed {
        return Err(CodecError::BufferTooSmall {
            needed,
            actual: src_len,
        });
    }
    Ok(())
}

/// Convert one library row into packed pixels.
///
/// Layouts without alpha produce alpha 255; gray samples are replicated into
/// red, green and blue. `src` must hold exactly `dst.len()` pixels.
pub(crate) fn unpack_row(
    layout: SampleLayout,
    src: &[u8],
    dst: &mut [Argb32],
) -> Result<(), CodecError> {
    check_row(src.len(), layout.bytes_per_pixel(), dst.len())?;
    if dst.is_empty() {
        return Ok(());
    }

    #[cfg(target_endian = "little")]
    {
        let needed = dst.len() * layout.bytes_per_pixel();
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(dst);
        let swizzled = match layout {
            SampleLayout::Gray8 => garb::gray_to_bgra(src, bytes),
            SampleLayout::GrayAlpha8 => garb::gray_alpha_to_bgra(src, bytes),
            SampleLayout::Rgb8 => garb::rgb_to_bgra(src, bytes),
            SampleLayout::Rgba8 => garb::rgba_to_bgra(src, bytes),
        };
        swizzled.map_err(|_| CodecError::BufferTooSmall {
            needed,
            actual: src.len(),
        })
    }

    #[cfg(not(target_endian = "little"))]
    {
        unpack_row_scalar(layout, src, dst);
        Ok(())
    }
}

#[cfg_attr(target_endian = "little", allow(dead_code))]
fn unpack_row_scalar(layout: SampleLayout, src: &[u8], dst: &mut [Argb32]) {
    let bpp = layout.bytes_per_pixel();
    for (px, s) in dst.iter_mut().zip(src.chunks_exact(bpp)) {
        *px = match layout {
            SampleLayout::Gray8 => pack_argb(255, s[0], s[0], s[0]),
            SampleLayout::GrayAlpha8 => pack_argb(s[1], s[0], s[0], s[0]),
            SampleLayout::Rgb8 => pack_argb(255, s[0], s[1], s[2]),
            SampleLayout::Rgba8 => pack_argb(s[3], s[0], s[1], s[2]),
        };
    }
}

/// Convert packed pixels into an RGB8 row, dropping alpha.
pub(crate) fn pack_rgb_row(src: &[Argb32], dst: &mut [u8]) -> Result<(), CodecError> {
    check_row(dst.len(), 3, src.len())?;
    if src.is_empty() {
        return Ok(());
    }

    #[cfg(target_endian = "little")]
    {
        garb::bgra_to_rgb(bytemuck::cast_slice(src), dst).map_err(|_| {
            CodecError::BufferTooSmall {
                needed: src.len() * 3,
                actual: dst.len(),
            }
        })
    }

    #[cfg(not(target_endian = "little"))]
    {
        for (&px, d) in src.iter().zip(dst.chunks_exact_mut(3)) {
            let (_, r, g, b) = unpack_argb(px);
            d.copy_from_slice(&[r, g, b]);
        }
        Ok(())
    }
}

/// Convert packed pixels into an RGBA8 row.
pub(crate) fn pack_rgba_row(src: &[Argb32], dst: &mut [u8]) -> Result<(), CodecError> {
    check_row(dst.len(), 4, src.len())?;
    if src.is_empty() {
        return Ok(());
    }

    #[cfg(target_endian = "little")]
    {
        garb::bgra_to_rgba(bytemuck::cast_slice(src), dst).map_err(|_| {
            CodecError::BufferTooSmall {
                needed: src.len() * 4,
                actual: dst.len(),
            }
        })
    }

    #[cfg(not(target_endian = "little"))]
    {
        for (&px, d) in src.iter().zip(dst.chunks_exact_mut(4)) {
            let (a, r, g, b) = unpack_argb(px);
            d.copy_from_slice(&[r, g, b, a]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_and_unpack_agree() {
        let px = pack_argb(0x80, 0x11, 0x22, 0x33);
        assert_eq!(px, 0x8011_2233);
        assert_eq!(unpack_argb(px), (0x80, 0x11, 0x22, 0x33));
    }

    #[test]
    fn gray_row_replicates_sample() {
        let mut dst = [0u32; 3];
        unpack_row(SampleLayout::Gray8, &[0, 128, 255], &mut dst).unwrap();
        assert_eq!(dst, [0xFF00_0000, 0xFF80_8080, 0xFFFF_FFFF]);
    }

    #[test]
    fn gray_alpha_row_keeps_alpha() {
        let mut dst = [0u32; 2];
        unpack_row(SampleLayout::GrayAlpha8, &[10, 0, 200, 99], &mut dst).unwrap();
        assert_eq!(dst, [0x000A_0A0A, 0x63C8_C8C8]);
    }

    #[test]
    fn rgb_row_is_opaque() {
        let mut dst = [0u32; 2];
        unpack_row(SampleLayout::Rgb8, &[1, 2, 3, 4, 5, 6], &mut dst).unwrap();
        assert_eq!(dst, [0xFF01_0203, 0xFF04_0506]);
    }

    #[test]
    fn rgba_row_orders_channels() {
        let mut dst = [0u32; 1];
        unpack_row(SampleLayout::Rgba8, &[0x11, 0x22, 0x33, 0x80], &mut dst).unwrap();
        assert_eq!(dst, [0x8011_2233]);
    }

    #[test]
    fn scalar_and_swizzle_paths_match() {
        let src: Vec<u8> = (0..64u8).map(|v| v.wrapping_mul(37)).collect();
        for layout in [
            SampleLayout::Gray8,
            SampleLayout::GrayAlpha8,
            SampleLayout::Rgb8,
            SampleLayout::Rgba8,
        ] {
            let n = 5;
            let bytes = &src[..n * layout.bytes_per_pixel()];
            let mut fast = vec![0u32; n];
            let mut slow = vec![0u32; n];
            unpack_row(layout, bytes, &mut fast).unwrap();
            unpack_row_scalar(layout, bytes, &mut slow);
            assert_eq!(fast, slow, "{layout:?}");
        }
    }

    #[test]
    fn pack_rgb_drops_alpha() {
        let mut dst = [0u8; 6];
        pack_rgb_row(&[0x8011_2233, 0xFF44_5566], &mut dst).unwrap();
        assert_eq!(dst, [0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
    }

    #[test]
    fn pack_rgba_appends_alpha() {
        let mut dst = [0u8; 4];
        pack_rgba_row(&[0x8011_2233], &mut dst).unwrap();
        assert_eq!(dst, [0x11, 0x22, 0x33, 0x80]);
    }

    #[test]
    fn mismatched_row_is_rejected() {
        let mut dst = [0u32; 2];
        let err = unpack_row(SampleLayout::Rgb8, &[1, 2, 3], &mut dst).unwrap_err();
        assert!(matches!(err, CodecError::BufferTooSmall { needed: 6, actual: 3 }));
    }
}
