//! Simulator configuration constants.
//!
//! Scene timing and panel presets live in the common crate
//! (`ambient_scene_common::config`). These are the host-side values: frame
//! pacing, the power-on sequence and window settings, all of which need
//! `std::time::Duration`.

use std::time::Duration;

// =============================================================================
// Timing Configuration
// =============================================================================

/// Target frame time (~50 FPS). The main loop sleeps if frame completes early.
pub const FRAME_TIME: Duration = Duration::from_millis(20);

/// Scene time advanced per frame, in milliseconds.
pub const FRAME_MS: u32 = FRAME_TIME.as_millis() as u32;

/// Interval between frame statistics log lines.
pub const METRICS_REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Frames simulated without a window (10 s of scene time).
#[cfg_attr(feature = "window", allow(dead_code))]
pub const HEADLESS_FRAMES: u32 = 500;

// =============================================================================
// Power-On Sequence
// =============================================================================

/// Settle time after clearing the panel, before switching it on.
pub const PANEL_SETTLE_DELAY: Duration = Duration::from_millis(40);

/// Delay between switching the panel on and starting the scene.
pub const PANEL_ON_DELAY: Duration = Duration::from_millis(10);

// =============================================================================
// Window Configuration
// =============================================================================

/// Pixel scale of the simulator window.
#[cfg_attr(not(feature = "window"), allow(dead_code))]
pub const WINDOW_SCALE: u32 = 3;

/// Simulator window title.
#[cfg_attr(not(feature = "window"), allow(dead_code))]
pub const WINDOW_TITLE: &str = "Ambient Scene Sim";
