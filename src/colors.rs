//! Color constants and fixed-point fading for the simulator renderer.
//!
//! ## Rgb565 Color Format
//!
//! Rgb565 uses 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue.
//! - Red: 0-31 (5 bits)
//! - Green: 0-63 (6 bits)
//! - Blue: 0-31 (5 bits)
//!
//! # Opacity Without Alpha
//!
//! The panel has no alpha channel and the scene background is black, so an
//! element at opacity `a` is drawn as its colors faded toward black by `a`.
//! Overlays work the same way on everything painted beneath them.

use embedded_graphics::pixelcolor::{IntoStorage, Rgb565, RgbColor};

// =============================================================================
// UI Colors (debug page)
// =============================================================================

/// Pure black (0, 0, 0). Scene background.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white (31, 63, 31). Values on the debug page.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Pure green (0, 63, 0). Debug page title and log prompt.
pub const GREEN: Rgb565 = Rgb565::GREEN;

/// Pure yellow (31, 63, 0). Highlighted statistics.
pub const YELLOW: Rgb565 = Rgb565::YELLOW;

/// Orange (31, 32, 0). Log text.
pub const ORANGE: Rgb565 = Rgb565::new(31, 32, 0);

/// Dark gray (8, 16, 8). Section headers and dividers.
pub const GRAY: Rgb565 = Rgb565::new(8, 16, 8);

// =============================================================================
// Sprite Palette
// =============================================================================

/// Dark outline shared by all item sprites.
pub const OUTLINE: Rgb565 = Rgb565::new(3, 6, 3);

/// Diamond highlight.
pub const DIAMOND_LIGHT: Rgb565 = Rgb565::new(20, 63, 30);
/// Diamond body.
pub const DIAMOND: Rgb565 = Rgb565::new(9, 55, 27);
/// Diamond shadow.
pub const DIAMOND_DARK: Rgb565 = Rgb565::new(2, 36, 20);

/// Emerald highlight.
pub const EMERALD_LIGHT: Rgb565 = Rgb565::new(14, 63, 16);
/// Emerald body.
pub const EMERALD: Rgb565 = Rgb565::new(2, 52, 8);
/// Emerald shadow.
pub const EMERALD_DARK: Rgb565 = Rgb565::new(0, 30, 4);

/// Iron highlight.
pub const IRON_LIGHT: Rgb565 = Rgb565::new(29, 59, 29);
/// Iron body.
pub const IRON: Rgb565 = Rgb565::new(21, 43, 21);
/// Iron shadow.
pub const IRON_DARK: Rgb565 = Rgb565::new(13, 27, 13);

/// Gold highlight.
pub const GOLD_LIGHT: Rgb565 = Rgb565::new(31, 62, 12);
/// Gold body.
pub const GOLD: Rgb565 = Rgb565::new(31, 50, 0);
/// Gold shadow.
pub const GOLD_DARK: Rgb565 = Rgb565::new(20, 32, 0);

/// Tool handle.
pub const WOOD: Rgb565 = Rgb565::new(17, 26, 6);
/// Tool handle shadow.
pub const WOOD_DARK: Rgb565 = Rgb565::new(10, 16, 3);

/// Logo text.
pub const LOGO_GREEN: Rgb565 = Rgb565::new(8, 50, 6);
/// Logo grass top.
pub const LOGO_GRASS: Rgb565 = Rgb565::new(4, 40, 2);
/// Logo dirt.
pub const LOGO_DIRT: Rgb565 = Rgb565::new(16, 24, 8);

// =============================================================================
// Fixed-Point Fading
// =============================================================================

/// Fixed-point weight representing 1.0.
pub const WEIGHT_ONE: u16 = 256;

/// Convert an 8-bit opacity to a fixed-point weight (255 maps to exactly 1.0).
#[inline]
pub const fn opacity_weight(opacity: u8) -> u16 { opacity as u16 + (opacity as u16 >> 7) }

/// Combine two fixed-point weights.
#[inline]
pub const fn mul_weight(
    a: u16,
    b: u16,
) -> u16 {
    ((a as u32 * b as u32) >> 8) as u16
}

/// Linear interpolation between two Rgb565 colors.
///
/// Operates on the raw RGB components extracted from Rgb565 format, with an
/// 8-bit fixed-point weight: 0 yields `from`, [`WEIGHT_ONE`] yields `to`.
pub fn lerp_rgb565(
    from: Rgb565,
    to: Rgb565,
    weight: u16,
) -> Rgb565 {
    // Rgb565: RRRRRGGGGGGBBBBB (5-6-5 bits)
    let from_raw = from.into_storage();
    let to_raw = to.into_storage();

    let from_r = i32::from((from_raw >> 11) & 0x1F);
    let from_g = i32::from((from_raw >> 5) & 0x3F);
    let from_b = i32::from(from_raw & 0x1F);

    let to_r = i32::from((to_raw >> 11) & 0x1F);
    let to_g = i32::from((to_raw >> 5) & 0x3F);
    let to_b = i32::from(to_raw & 0x1F);

    let t = i32::from(weight.min(WEIGHT_ONE));
    let step = |delta: i32| -> i32 { (delta * t) / i32::from(WEIGHT_ONE) };

    let r = (from_r + step(to_r - from_r)).clamp(0, 31);
    let g = (from_g + step(to_g - from_g)).clamp(0, 63);
    let b = (from_b + step(to_b - from_b)).clamp(0, 31);

    Rgb565::new(r as u8, g as u8, b as u8)
}

/// Fade `color` toward the black background by a fixed-point weight.
#[inline]
pub fn fade(
    color: Rgb565,
    weight: u16,
) -> Rgb565 {
    lerp_rgb565(BLACK, color, weight)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opacity_weight_endpoints() {
        assert_eq!(opacity_weight(0), 0);
        assert_eq!(opacity_weight(255), WEIGHT_ONE);
        assert_eq!(opacity_weight(128), 129);
    }

    #[test]
    fn test_mul_weight() {
        assert_eq!(mul_weight(WEIGHT_ONE, WEIGHT_ONE), WEIGHT_ONE);
        assert_eq!(mul_weight(WEIGHT_ONE, 96), 96);
        assert_eq!(mul_weight(128, 128), 64);
        assert_eq!(mul_weight(0, WEIGHT_ONE), 0);
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp_rgb565(BLACK, WHITE, 0), BLACK);
        assert_eq!(lerp_rgb565(BLACK, WHITE, WEIGHT_ONE), WHITE);
        assert_eq!(lerp_rgb565(GOLD, DIAMOND, WEIGHT_ONE), DIAMOND);
    }

    #[test]
    fn test_lerp_weight_clamped() {
        assert_eq!(lerp_rgb565(BLACK, WHITE, 1000), WHITE);
    }

    #[test]
    fn test_lerp_midpoint() {
        let mid = lerp_rgb565(BLACK, WHITE, 128);
        assert_eq!(mid, Rgb565::new(15, 31, 15));
    }

    #[test]
    fn test_fade() {
        assert_eq!(fade(GOLD, opacity_weight(255)), GOLD);
        assert_eq!(fade(GOLD, opacity_weight(0)), BLACK);

        let half = fade(WHITE, opacity_weight(127));
        assert!(half.r() > 0 && half.r() < 31, "half fade should be gray");
    }

    #[test]
    fn test_fade_monotonic() {
        let mut previous = 0;
        for opacity in 0..=255u8 {
            let g = fade(EMERALD, opacity_weight(opacity)).g();
            assert!(g >= previous, "fade must brighten with opacity ({opacity})");
            previous = g;
        }
    }
}
