//! Animation core for the boot and ambient display.
//!
//! This crate contains the platform-agnostic scene logic shared by the
//! simulator and any panel driver:
//!
//! - [`easing`]: Normalized easing curves
//! - [`tween`]: Tweened value driver and its hook tags
//! - [`timeline`]: Offset-scheduled, repeating tween sequences
//! - [`animator`]: Tick-driven owner of running timelines
//! - [`element`]: The [`Surface`] display seam and the in-memory element tree
//! - [`pool`]: Particle pools with randomized looping fades
//! - [`scene`]: Intro to ambient scene director
//! - [`config`]: Timing constants, capacities and panel presets
//! - [`profiling`]: Scene log ring buffer and statistics
//! - [`error`]: Construction errors
//!
//! # no_std Compatibility
//!
//! This crate is `no_std` and allocation free. Randomness is injected through
//! [`rand::RngCore`] and time through the `dt_ms` passed to every tick, so it
//! has no clock or entropy dependency of its own.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod animator;
pub mod config;
pub mod easing;
pub mod element;
pub mod error;
pub mod pool;
pub mod profiling;
pub mod scene;
pub mod timeline;
pub mod tween;

// Re-export commonly used items
pub use animator::{Animator, TimelineId};
pub use config::*;
pub use easing::Easing;
pub use element::{Align, Element, ElementId, ElementKind, ElementTree, Extent, SpriteKind, Surface};
pub use error::SceneError;
pub use pool::{Bounds, ParticlePool};
pub use profiling::{SceneLog, SceneStats};
pub use scene::{AnimationContext, SceneDirector, SceneState};
pub use timeline::{RepeatCount, Timeline};
pub use tween::{CompleteHook, Property, StartHook, TweenSpec};
