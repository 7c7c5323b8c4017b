//! Compile-time scene configuration.
//!
//! All timing, capacity and layout values are `const`. Panel-specific values
//! are grouped into [`ScenePreset`]s; the preset used by the application is
//! selected with the `st7789` cargo feature, the same way the firmware picks
//! its display controller at build time.
//!
//! # Compile-Time Validation
//!
//! Presets and timing constants are checked with `const` assertions, so an
//! invalid configuration (a pool larger than the pool capacity, a zero fade
//! duration) fails the build instead of the boot animation.

use crate::element::SpriteKind;
use crate::pool::Bounds;

// =============================================================================
// Design Resolution
// =============================================================================

/// Width the sprite artwork was designed for.
pub const DESIGN_RESOLUTION_WIDTH: u32 = 240;

/// Height the sprite artwork was designed for. The display scale factor is
/// `actual_height / DESIGN_RESOLUTION_HEIGHT`.
pub const DESIGN_RESOLUTION_HEIGHT: u32 = 240;

/// Fixed-point scale representing 1.0 (256 = 100%).
pub const SCALE_UNITY: u16 = 256;

/// Safe area as a percentage of the panel size.
pub const SAFE_AREA_PERCENT: u32 = 80;

// =============================================================================
// Intro Timing
// =============================================================================

/// Offset of the logo fade-in from the start of the intro timeline.
pub const INTRO_FADE_IN_AT_MS: u32 = 10;

/// Offset of the logo fade-out from the start of the intro timeline.
pub const INTRO_FADE_OUT_AT_MS: u32 = 2000;

/// Duration of each logo fade.
pub const INTRO_FADE_MS: u32 = 1000;

/// Logo and decoration size as a percentage of the screen.
pub const HERO_EXTENT_PERCENT: u8 = 80;

const _: () = assert!(INTRO_FADE_IN_AT_MS + INTRO_FADE_MS <= INTRO_FADE_OUT_AT_MS);

// =============================================================================
// Ambient Timing
// =============================================================================

/// Duration of a particle fade-in and of its fade-out.
pub const PARTICLE_FADE_MS: u32 = 3000;

/// Exclusive upper bound of a particle's random start delay.
pub const PARTICLE_MAX_START_DELAY_MS: u32 = 2048;

/// Exclusive upper bound of a particle's random repeat delay.
pub const PARTICLE_MAX_REPEAT_DELAY_MS: u32 = 1024;

/// Duration of the decoration's one-shot fade-in.
pub const DECORATION_FADE_MS: u32 = 1000;

/// Duration of one half of the decoration's bobbing cycle.
pub const DECORATION_BOB_HALF_PERIOD_MS: u32 = 1500;

/// Opacity of the full-screen overlay between particles and decoration.
pub const OVERLAY_OPACITY: u8 = 160;

const _: () = assert!(PARTICLE_FADE_MS > 0);
const _: () = assert!(PARTICLE_MAX_START_DELAY_MS > 0);
const _: () = assert!(PARTICLE_MAX_REPEAT_DELAY_MS > 0);
const _: () = assert!(DECORATION_FADE_MS > 0);
const _: () = assert!(DECORATION_BOB_HALF_PERIOD_MS > 0);

// =============================================================================
// Static Capacities
// =============================================================================

/// Maximum number of live visual elements.
pub const MAX_ELEMENTS: usize = 24;

/// Maximum number of concurrently running timelines.
pub const MAX_TIMELINES: usize = 24;

/// Maximum number of entries in one timeline.
pub const MAX_TIMELINE_ENTRIES: usize = 4;

/// Maximum number of particles in one pool.
pub const MAX_POOL_SIZE: usize = 8;

/// Maximum number of particle pools (one per sprite kind).
pub const MAX_POOLS: usize = 4;

/// Maximum number of completion events collected in one tick.
pub const MAX_COMPLETIONS: usize = 16;

// =============================================================================
// Presets
// =============================================================================

/// One particle pool of the ambient scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Sprite shown by every particle of the pool.
    pub sprite: SpriteKind,
    /// Number of particles.
    pub count: usize,
}

/// Region particles are scattered over, centred on the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleArea {
    /// The whole panel.
    FullScreen,
    /// The panel shrunk to [`SAFE_AREA_PERCENT`].
    SafeArea,
}

/// Panel-specific configuration of the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScenePreset {
    /// Short human-readable name.
    pub name: &'static str,
    /// Panel width in pixels.
    pub width: u32,
    /// Panel height in pixels.
    pub height: u32,
    /// Ambient particle pools, in creation (and paint) order.
    pub pools: [PoolConfig; MAX_POOLS],
    /// Where particles may appear.
    pub particle_area: ParticleArea,
    /// Whether the decoration follows the display scale factor or keeps its design size.
    pub decoration_scaled: bool,
    /// Vertical bobbing amplitude of the decoration in pixels (0 disables bobbing).
    pub decoration_bob_px: u32,
}

impl ScenePreset {
    /// Total number of particles across all pools.
    pub const fn total_particles(&self) -> usize {
        let mut total = 0;
        let mut i = 0;
        while i < MAX_POOLS {
            total += self.pools[i].count;
            i += 1;
        }
        total
    }

    /// Fixed-point display scale factor of this panel.
    #[inline]
    pub const fn scale(&self) -> u16 { scale_factor(self.height) }

    /// Scale applied to the decoration.
    #[inline]
    pub const fn decoration_scale(&self) -> u16 {
        if self.decoration_scaled {
            self.scale()
        } else {
            SCALE_UNITY
        }
    }

    /// Bounds used for random particle placement.
    pub const fn particle_bounds(&self) -> Bounds {
        match self.particle_area {
            ParticleArea::FullScreen => Bounds::new(self.width, self.height),
            ParticleArea::SafeArea => {
                let (width, height) = safe_area(self.width, self.height);
                Bounds::new(width, height)
            }
        }
    }

    const fn is_valid(&self) -> bool {
        let mut i = 0;
        while i < MAX_POOLS {
            if self.pools[i].count > MAX_POOL_SIZE {
                return false;
            }
            i += 1;
        }
        self.width > 0 && self.height > 0 && self.total_particles() + 3 <= MAX_ELEMENTS
    }
}

const fn pools(count: usize) -> [PoolConfig; MAX_POOLS] {
    [
        PoolConfig {
            sprite: SpriteKind::Diamond,
            count,
        },
        PoolConfig {
            sprite: SpriteKind::Emerald,
            count,
        },
        PoolConfig {
            sprite: SpriteKind::IronIngot,
            count,
        },
        PoolConfig {
            sprite: SpriteKind::GoldIngot,
            count,
        },
    ]
}

/// 128x128 ST7735 panel: 4 particles per kind over the full panel.
pub const ST7735_PRESET: ScenePreset = ScenePreset {
    name: "st7735",
    width: 128,
    height: 128,
    pools: pools(4),
    particle_area: ParticleArea::FullScreen,
    decoration_scaled: true,
    decoration_bob_px: 0,
};

/// 240x240 ST7789 panel: 3 particles per kind inside the safe area, bobbing decoration.
pub const ST7789_PRESET: ScenePreset = ScenePreset {
    name: "st7789",
    width: 240,
    height: 240,
    pools: pools(3),
    particle_area: ParticleArea::SafeArea,
    decoration_scaled: false,
    decoration_bob_px: 6,
};

const _: () = assert!(ST7735_PRESET.is_valid());
const _: () = assert!(ST7789_PRESET.is_valid());

/// Preset compiled into the application.
#[cfg(feature = "st7789")]
pub const ACTIVE_PRESET: ScenePreset = ST7789_PRESET;

/// Preset compiled into the application.
#[cfg(not(feature = "st7789"))]
pub const ACTIVE_PRESET: ScenePreset = ST7735_PRESET;

// =============================================================================
// Layout Helpers
// =============================================================================

/// Fixed-point scale factor for a panel of the given height (256 = design size).
#[inline]
pub const fn scale_factor(height: u32) -> u16 { (SCALE_UNITY as u32 * height / DESIGN_RESOLUTION_HEIGHT) as u16 }

/// Safe area of a panel, [`SAFE_AREA_PERCENT`] of each dimension.
#[inline]
pub const fn safe_area(
    width: u32,
    height: u32,
) -> (u32, u32) {
    (
        width * SAFE_AREA_PERCENT / 100,
        height * SAFE_AREA_PERCENT / 100,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_factor() {
        assert_eq!(scale_factor(240), SCALE_UNITY);
        assert_eq!(scale_factor(128), 136);
        assert_eq!(scale_factor(480), 512);
    }

    #[test]
    fn test_safe_area() {
        assert_eq!(safe_area(240, 240), (192, 192));
        assert_eq!(safe_area(128, 128), (102, 102));
    }

    #[test]
    fn test_preset_particle_totals() {
        assert_eq!(ST7735_PRESET.total_particles(), 16);
        assert_eq!(ST7789_PRESET.total_particles(), 12);
    }

    #[test]
    fn test_preset_bounds() {
        assert_eq!(ST7735_PRESET.particle_bounds(), Bounds::new(128, 128));
        assert_eq!(ST7789_PRESET.particle_bounds(), Bounds::new(192, 192));
    }

    #[test]
    fn test_decoration_scale() {
        assert_eq!(ST7735_PRESET.decoration_scale(), 136);
        assert_eq!(ST7789_PRESET.decoration_scale(), SCALE_UNITY);
    }

    #[test]
    fn test_intro_playtime() {
        assert_eq!(INTRO_FADE_OUT_AT_MS + INTRO_FADE_MS, 3000);
    }
}
