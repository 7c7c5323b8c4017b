//! Scene construction errors.
//!
//! Every variant is a configuration or capacity error raised while building
//! elements, tweens, timelines or pools. Nothing here is retried: a failed
//! construction leaves no partial state behind and the caller decides whether
//! the subsystem can start at all.

use thiserror::Error;

/// Errors raised while configuring or starting animations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SceneError {
    /// A tween was given a zero-length duration.
    #[error("tween duration must be at least 1 ms")]
    ZeroDuration,

    /// A finite repeat count of zero was requested.
    #[error("repeat count must be at least 1")]
    ZeroRepeatCount,

    /// Random placement bounds with zero width or height.
    #[error("placement bounds must be non-empty")]
    EmptyBounds,

    /// An entry whose offset plus duration does not fit in the timeline clock.
    #[error("timeline entry ends past the end of the clock")]
    OffsetOverflow,

    /// A timeline already holds its maximum number of entries.
    #[error("timeline entry capacity exceeded")]
    TooManyEntries,

    /// The animator already runs its maximum number of timelines.
    #[error("animator timeline capacity exceeded")]
    TooManyTimelines,

    /// The element tree has no free slot left.
    #[error("element capacity exceeded")]
    TooManyElements,

    /// A particle pool larger than the static pool capacity.
    #[error("pool of {requested} particles exceeds capacity {capacity}")]
    PoolTooLarge {
        /// Requested particle count.
        requested: usize,
        /// Static pool capacity.
        capacity: usize,
    },

    /// More particle pools than the scene can hold.
    #[error("too many particle pools")]
    TooManyPools,

    /// The target element already has an active timeline.
    #[error("element already has an active timeline")]
    ElementBusy,

    /// `enter_scene` was called after the scene had already been entered.
    #[error("scene already entered")]
    AlreadyEntered,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_too_large_message() {
        let err = SceneError::PoolTooLarge {
            requested: 12,
            capacity: 8,
        };
        assert_eq!(err.to_string(), "pool of 12 particles exceeds capacity 8");
    }

    #[test]
    fn test_errors_compare_by_variant() {
        assert_eq!(SceneError::ZeroDuration, SceneError::ZeroDuration);
        assert_ne!(SceneError::ZeroDuration, SceneError::ElementBusy);
    }
}
