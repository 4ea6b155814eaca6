//! In-place alpha and channel-order transforms over packed ARGB32 buffers.
//!
//! Decoding always yields straight alpha. Premultiplication only happens
//! when a caller asks for it here.

use crate::pixel::{ALPHA_MASK, Argb32, pack_argb, unpack_argb};

/// True if any pixel's alpha byte is not 255.
pub fn has_translucent_pixels(pixels: &[Argb32]) -> bool {
    pixels.iter().any(|&px| px & ALPHA_MASK != ALPHA_MASK)
}

/// Scale red, green and blue by alpha.
///
/// Alpha 0 clears the pixel to 0, alpha 255 leaves it alone, anything else
/// maps each channel to `c * a / 255` (truncating).
pub fn premultiply_alpha(pixels: &mut [Argb32]) {
    for px in pixels.iter_mut() {
        let (a, r, g, b) = unpack_argb(*px);
        match a {
            0 => *px = 0,
            255 => {}
            _ => {
                let a32 = u32::from(a);
                let scale = |c: u8| (u32::from(c) * a32 / 255) as u8;
                *px = pack_argb(a, scale(r), scale(g), scale(b));
            }
        }
    }
}

/// Undo [`premultiply_alpha`].
///
/// Alpha 0 and 255 leave the pixel alone; otherwise each channel becomes
/// `c * 255 / a` (truncating), saturated at 255 for inputs that were never
/// premultiplied.
pub fn demultiply_alpha(pixels: &mut [Argb32]) {
    for px in pixels.iter_mut() {
        let (a, r, g, b) = unpack_argb(*px);
        if a == 0 || a == 255 {
            continue;
        }
        let a32 = u32::from(a);
        let scale = |c: u8| (u32::from(c) * 255 / a32).min(255) as u8;
        *px = pack_argb(a, scale(r), scale(g), scale(b));
    }
}

/// Exchange the red and blue fields of every pixel.
pub fn swap_red_and_blue(pixels: &mut [Argb32]) {
    if pixels.is_empty() {
        return;
    }

    // Little-endian ARGB32 is B,G,R,A in memory, so this is a byte 0/2 swap.
    #[cfg(target_endian = "little")]
    {
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(pixels);
        if garb::rgba_to_bgra_inplace(bytes).is_ok() {
            return;
        }
    }

    for px in pixels.iter_mut() {
        let v = *px;
        *px = (v & 0xFF00_FF00) | ((v >> 16) & 0xFF) | ((v << 16) & 0x00FF_0000);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translucency_scan() {
        assert!(!has_translucent_pixels(&[]));
        assert!(!has_translucent_pixels(&[0xFF00_0000, 0xFFFF_FFFF]));
        assert!(has_translucent_pixels(&[0xFF00_0000, 0xFE00_0000]));
        assert!(has_translucent_pixels(&[0x0000_0000]));
    }

    #[test]
    fn premultiply_cases() {
        let mut px = [0x00FF_FFFF, 0xFF12_3456, 0x8080_4020];
        premultiply_alpha(&mut px);
        // 0x80 * 0x80 / 255 = 64, 0x40 * 0x80 / 255 = 32, 0x20 * 0x80 / 255 = 16
        assert_eq!(px, [0, 0xFF12_3456, 0x8040_2010]);
    }

    #[test]
    fn demultiply_cases() {
        let mut px = [0x00FF_FFFF, 0xFF12_3456, 0x8040_2010];
        demultiply_alpha(&mut px);
        // 64 * 255 / 128 = 127, 32 * 255 / 128 = 63, 16 * 255 / 128 = 31
        assert_eq!(px, [0x00FF_FFFF, 0xFF12_3456, 0x807F_3F1F]);
    }

    #[test]
    fn demultiply_saturates() {
        let mut px = [0x10FF_FFFF];
        demultiply_alpha(&mut px);
        assert_eq!(px, [0x10FF_FFFF]);
    }

    #[test]
    fn swap_moves_only_red_and_blue() {
        let mut px = [0x8011_2233, 0xFFAB_CDEF];
        swap_red_and_blue(&mut px);
        assert_eq!(px, [0x8033_2211, 0xFFEF_CDAB]);
    }
}
