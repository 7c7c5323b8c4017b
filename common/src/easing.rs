//! Easing curves for tweened values.
//!
//! Every curve maps the normalized time `t` in `[0, 1]` to progress in `[0, 1]`
//! with `f(0) = 0` and `f(1) = 1` exactly. The boundaries are returned as
//! literals instead of being computed, so the final sample of a tween always
//! lands on its end value bit-for-bit.
//!
//! ```text
//! value = start + (end - start) * f(elapsed / duration)
//! ```

use core::f32::consts::PI;

/// Normalized easing curve.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Easing {
    /// Constant rate.
    Linear,
    /// Smoothstep ease-in-out: `3t² - 2t³`. Used for every fade.
    #[default]
    EaseInOut,
    /// Sine ease-in-out: `-(cos(πt) - 1) / 2`. Used for position bobbing.
    SineInOut,
}

impl Easing {
    /// Sample the curve at normalized time `t`.
    ///
    /// Values outside `[0, 1]` (and NaN) are clamped to the nearest boundary.
    #[inline]
    pub fn sample(
        self,
        t: f32,
    ) -> f32 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            Self::Linear => t,
            Self::EaseInOut => t * t * (3.0 - 2.0 * t),
            Self::SineInOut => -(libm::cosf(PI * t) - 1.0) / 2.0,
        }
    }
}
