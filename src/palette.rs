//! Colors and material palettes.
//!
//! Colors are plain 4-byte values, copied rather than shared, so a tint
//! applied to one pixel can never leak into another.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// RGBA color, 8 bits per channel. `#[repr(C)]` so frame buffers cast
/// straight to `&[u8]`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Scale the color channels by `factor` (clamped to 0..1), leaving
    /// alpha untouched.
    pub fn scale_rgb(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * f) as u8,
            g: (self.g as f32 * f) as u8,
            b: (self.b as f32 * f) as u8,
            a: self.a,
        }
    }

    /// Linear blend toward `other`: `t` = 0 keeps `self`, `t` = 1 lands on
    /// `other`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// Map a 0..1 health ratio onto `bands` fixed alpha steps.
///
/// Full health is opaque and every lost band knocks alpha down by an even
/// step, so damage reads as discrete fading rather than a smooth ramp.
/// A ratio of zero (or a zero band count) is fully transparent.
pub fn banded_alpha(ratio: f32, bands: u32) -> u8 {
    if bands == 0 || ratio <= 0.0 {
        return 0;
    }
    let band = (ratio.min(1.0) * bands as f32).ceil() as u32;
    (band * 255 / bands) as u8
}

/// Fixed palette, one base and one surface shade per material plus a few
/// effect colors.
pub mod colors {
    use super::Rgba;

    pub const DIRT: Rgba = Rgba::opaque(121, 85, 58);
    pub const DIRT_SURFACE: Rgba = Rgba::opaque(88, 128, 62);
    pub const GOLD: Rgba = Rgba::opaque(230, 188, 64);
    pub const GOLD_SURFACE: Rgba = Rgba::opaque(245, 208, 96);
    pub const DIAMOND: Rgba = Rgba::opaque(122, 218, 232);
    pub const DIAMOND_SURFACE: Rgba = Rgba::opaque(164, 236, 244);
    pub const EGG: Rgba = Rgba::opaque(236, 228, 204);
    pub const EGG_SURFACE: Rgba = Rgba::opaque(246, 240, 222);
    pub const MAGIC: Rgba = Rgba::opaque(168, 96, 230);
    pub const MAGIC_SURFACE: Rgba = Rgba::opaque(196, 140, 244);
    pub const SERPENT: Rgba = Rgba::opaque(88, 156, 76);
    pub const SERPENT_SURFACE: Rgba = Rgba::opaque(110, 178, 94);
    pub const SERPENT_EYE: Rgba = Rgba::opaque(242, 242, 236);
    pub const TOMBSTONE: Rgba = Rgba::opaque(146, 146, 154);
    pub const TOMBSTONE_SURFACE: Rgba = Rgba::opaque(172, 172, 180);
    pub const BLOOD: Rgba = Rgba::opaque(152, 32, 32);

    pub const SKY_TERRA_TOP: Rgba = Rgba::opaque(18, 24, 58);
    pub const SKY_TERRA_BOTTOM: Rgba = Rgba::opaque(64, 110, 158);
    pub const SKY_GILDED_TOP: Rgba = Rgba::opaque(44, 20, 52);
    pub const SKY_GILDED_BOTTOM: Rgba = Rgba::opaque(150, 96, 70);
    pub const SKY_BURROW_TOP: Rgba = Rgba::opaque(12, 12, 16);
    pub const SKY_BURROW_BOTTOM: Rgba = Rgba::opaque(40, 36, 44);
}
