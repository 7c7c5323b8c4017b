//! Scene log and statistics.
//!
//! [`SceneLog`] is a small ring buffer of timestamped messages shown on the
//! simulator's debug page. [`SceneStats`] is a snapshot of the scene's load.
//! Frame timing needs a platform clock and lives in the simulator crate.
//!
//! # Usage
//!
//! ```ignore
//! let mut log = SceneLog::new();
//! log.push(10, "intro started");
//! log.push(3008, "ambient scene entered");
//!
//! for line in log.iter() {
//!     println!("{}", line); // "    0.010 intro started"
//! }
//! ```

use heapless::{Deque, String};

use crate::scene::SceneState;

// =============================================================================
// Scene Log Configuration
// =============================================================================

/// Maximum number of log lines to keep in the ring buffer.
pub const LOG_BUFFER_SIZE: usize = 8;

/// Maximum characters per log line, timestamp included.
pub const LOG_LINE_LENGTH: usize = 40;

/// Width of the right-aligned seconds field of the timestamp.
const SECONDS_WIDTH: usize = 5;

// =============================================================================
// Scene Log Ring Buffer
// =============================================================================

/// Ring buffer of timestamped scene events.
///
/// Stores the last [`LOG_BUFFER_SIZE`] lines. Old lines are dropped when the
/// buffer is full; long messages are truncated.
pub struct SceneLog {
    buffer: Deque<String<LOG_LINE_LENGTH>, LOG_BUFFER_SIZE>,
}

impl SceneLog {
    /// Create an empty log.
    pub const fn new() -> Self { Self { buffer: Deque::new() } }

    /// Append `msg` stamped with the scene clock `now_ms`.
    pub fn push(
        &mut self,
        now_ms: u32,
        msg: &str,
    ) {
        if self.buffer.is_full() {
            self.buffer.pop_front();
        }

        let mut line: String<LOG_LINE_LENGTH> = String::new();
        push_timestamp(&mut line, now_ms);
        line.push(' ').ok();
        for c in msg.chars() {
            if line.push(c).is_err() {
                break;
            }
        }

        self.buffer.push_back(line).ok();
    }

    /// Iterate over lines (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &str> { self.buffer.iter().map(heapless::string::StringInner::as_str) }

    /// Most recent line.
    pub fn last(&self) -> Option<&str> { self.buffer.back().map(heapless::string::StringInner::as_str) }

    /// Number of lines.
    #[inline]
    pub fn len(&self) -> usize { self.buffer.len() }

    /// Whether the log is empty.
    #[inline]
    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }
}

impl Default for SceneLog {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Scene Statistics
// =============================================================================

/// Snapshot of the scene's state and load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneStats {
    /// Current phase.
    pub state: SceneState,
    /// Milliseconds of scene time since `enter_scene`.
    pub clock_ms: u32,
    /// Live elements on the surface.
    pub elements: usize,
    /// Running timelines.
    pub timelines: usize,
    /// Particles across all pools.
    pub particles: usize,
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Push a u32 value to a heapless string (no format! macro).
pub fn push_u32<const N: usize>(
    s: &mut String<N>,
    mut val: u32,
) {
    if val == 0 {
        s.push('0').ok();
        return;
    }

    let mut digits = [0u8; 10];
    let mut i = 0;
    while val > 0 {
        digits[i] = (val % 10) as u8;
        val /= 10;
        i += 1;
    }

    while i > 0 {
        i -= 1;
        s.push((b'0' + digits[i]) as char).ok();
    }
}

/// Push `ms` as right-aligned seconds with millisecond precision, e.g. `"    3.008"`.
pub fn push_timestamp<const N: usize>(
    s: &mut String<N>,
    ms: u32,
) {
    let mut secs: String<10> = String::new();
    push_u32(&mut secs, ms / 1000);
    for _ in secs.len()..SECONDS_WIDTH {
        s.push(' ').ok();
    }
    s.push_str(&secs).ok();
    s.push('.').ok();

    let frac = ms % 1000;
    if frac < 100 {
        s.push('0').ok();
    }
    if frac < 10 {
        s.push('0').ok();
    }
    push_u32(s, frac);
}

// =============================================================================
// Tests
// =============================================================================
