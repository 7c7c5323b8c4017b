//! Tweened value driver.
//!
//! A [`Tween`] interpolates one scalar from `start` to `end` over a duration
//! and writes every sample to a property of its target element. The
//! callbacks of a classic tween engine are tags here:
//!
//! - [`Property`] is the per-tick write callback
//! - [`StartHook`] runs inline, right before the first write of a run
//! - [`CompleteHook`] is returned as a [`Completion`] for the owner to handle
//!   after the tick, never while the animator is iterating its timelines
//!
//! ```text
//! Pending --advance--> Running --elapsed >= duration--> Done
//!    ^                                                   |
//!    +----------------------- reset --------------------+
//! ```

use rand::RngCore;

use crate::easing::Easing;
use crate::element::{Align, ElementId, Surface};
use crate::error::SceneError;
use crate::pool::{Bounds, random_offset};

/// Element attribute a tween writes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Property {
    /// Opacity, clamped to `0..=255`.
    Opacity,
    /// Horizontal offset from the element's anchor.
    OffsetX,
    /// Vertical offset from the element's anchor.
    OffsetY,
}

/// Action run once when a tween begins a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartHook {
    /// Move the target to a uniformly random offset from the screen centre.
    Reposition(Bounds),
}

/// Event emitted when a tween finishes a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompleteHook {
    /// The intro logo has faded out.
    IntroFinished,
    /// The ambient decoration has faded in.
    DecorationShown,
}

/// A finished tween that carried a [`CompleteHook`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    /// Element the tween animated.
    pub target: ElementId,
    /// Hook attached to the tween.
    pub hook: CompleteHook,
}

/// Immutable description of one interpolation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TweenSpec {
    /// Element written to.
    pub target: ElementId,
    /// Attribute written to.
    pub property: Property,
    /// Value at elapsed time 0.
    pub start: i32,
    /// Value at elapsed time `duration_ms` and after.
    pub end: i32,
    /// Length of one run in milliseconds (at least 1).
    pub duration_ms: u32,
    /// Curve shaping the interpolation.
    pub easing: Easing,
    /// Runs once before the first write of every run.
    pub on_start: Option<StartHook>,
    /// Emitted once at the end of every run.
    pub on_complete: Option<CompleteHook>,
}

impl TweenSpec {
    /// Describe a tween with the default ease-in-out curve and no hooks.
    pub const fn new(
        target: ElementId,
        property: Property,
        start: i32,
        end: i32,
        duration_ms: u32,
    ) -> Result<Self, SceneError> {
        if duration_ms == 0 {
            return Err(SceneError::ZeroDuration);
        }
        Ok(Self {
            target,
            property,
            start,
            end,
            duration_ms,
            easing: Easing::EaseInOut,
            on_start: None,
            on_complete: None,
        })
    }

    /// Fade `target` from `from` to `to` opacity.
    #[inline]
    pub const fn fade(
        target: ElementId,
        from: u8,
        to: u8,
        duration_ms: u32,
    ) -> Result<Self, SceneError> {
        Self::new(target, Property::Opacity, from as i32, to as i32, duration_ms)
    }

    /// Replace the easing curve.
    #[must_use]
    pub const fn with_easing(
        mut self,
        easing: Easing,
    ) -> Self {
        self.easing = easing;
        self
    }

    /// Attach a start hook.
    #[must_use]
    pub const fn on_start(
        mut self,
        hook: StartHook,
    ) -> Self {
        self.on_start = Some(hook);
        self
    }

    /// Attach a completion hook.
    #[must_use]
    pub const fn on_complete(
        mut self,
        hook: CompleteHook,
    ) -> Self {
        self.on_complete = Some(hook);
        self
    }

    /// Interpolated value after `elapsed_ms` of a run.
    ///
    /// Returns `end` exactly once the duration has elapsed.
    pub fn value_at(
        &self,
        elapsed_ms: u32,
    ) -> i32 {
        if elapsed_ms >= self.duration_ms {
            return self.end;
        }
        let progress = self.easing.sample(elapsed_ms as f32 / self.duration_ms as f32);
        let span = (i64::from(self.end) - i64::from(self.start)) as f32;
        let value = i64::from(self.start) + (span * progress) as i64;
        value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Pending,
    Running,
    Done,
}

/// Running state of one [`TweenSpec`].
#[derive(Clone, Copy, Debug)]
pub struct Tween {
    spec: TweenSpec,
    phase: Phase,
}

impl Tween {
    /// Wrap a spec, ready to run.
    pub const fn new(spec: TweenSpec) -> Self {
        Self {
            spec,
            phase: Phase::Pending,
        }
    }

    /// The spec this tween plays.
    #[inline]
    pub const fn spec(&self) -> &TweenSpec { &self.spec }

    /// Whether the current run has written its end value.
    #[inline]
    pub fn is_done(&self) -> bool { self.phase == Phase::Done }

    /// Whether the current run has started.
    #[inline]
    pub fn has_started(&self) -> bool { self.phase != Phase::Pending }

    /// Rewind for another run; the start hook fires again on the next advance.
    #[inline]
    pub fn reset(&mut self) { self.phase = Phase::Pending; }

    /// Drive the tween to `elapsed_ms` since the start of its run.
    ///
    /// The first call of a run fires the start hook before writing. The call
    /// that reaches the duration writes `end` exactly and returns the
    /// completion, if a hook is attached. Later calls do nothing until
    /// [`Tween::reset`].
    pub fn advance_to<S, R>(
        &mut self,
        elapsed_ms: u32,
        surface: &mut S,
        rng: &mut R,
    ) -> Option<Completion>
    where
        S: Surface + ?Sized,
        R: RngCore + ?Sized,
    {
        match self.phase {
            Phase::Done => return None,
            Phase::Pending => {
                if let Some(hook) = self.spec.on_start {
                    run_start_hook(hook, self.spec.target, surface, rng);
                }
                self.phase = Phase::Running;
            }
            Phase::Running => {}
        }

        let value = self.spec.value_at(elapsed_ms);
        write_property(surface, self.spec.target, self.spec.property, value);

        if elapsed_ms < self.spec.duration_ms {
            return None;
        }
        self.phase = Phase::Done;
        self.spec.on_complete.map(|hook| Completion {
            target: self.spec.target,
            hook,
        })
    }
}

fn run_start_hook<S, R>(
    hook: StartHook,
    target: ElementId,
    surface: &mut S,
    rng: &mut R,
) where
    S: Surface + ?Sized,
    R: RngCore + ?Sized,
{
    match hook {
        StartHook::Reposition(bounds) => {
            let (x, y) = random_offset(bounds, rng);
            surface.set_position(target, Align::Center, x, y);
        }
    }
}

fn write_property<S>(
    surface: &mut S,
    target: ElementId,
    property: Property,
    value: i32,
) where
    S: Surface + ?Sized,
{
    match property {
        Property::Opacity => surface.set_opacity(target, value.clamp(0, 255) as u8),
        Property::OffsetX => {
            if let Some((align, _, y)) = surface.position(target) {
                surface.set_position(target, align, value, y);
            }
        }
        Property::OffsetY => {
            if let Some((align, x, _)) = surface.position(target) {
                surface.set_position(target, align, x, value);
            }
        }
    }
}
