//! Frame timing metrics for the simulator loop.
//!
//! The scene-side counterpart (scene log and statistics) lives in the common
//! crate; this module only measures the host frame loop.
//!
//! # Usage
//!
//! ```ignore
//! let mut metrics = FrameMetrics::new();
//!
//! // In main loop:
//! let frame_start = Instant::now();
//! // ... tick and render ...
//! let render_time = frame_start.elapsed();
//! // ... sleep ...
//! metrics.record_frame(frame_start.elapsed(), render_time, sleep_time);
//! ```

use std::time::{Duration, Instant};

use ambient_scene_common::profiling::push_u32;
use heapless::String;

/// Frame timing statistics.
///
/// Updated every frame in the main loop.
pub struct FrameMetrics {
    // Frame timing (microseconds for precision)
    /// Total frame time (tick + render + sleep)
    pub frame_time_us: u32,
    /// Time spent ticking the scene and drawing it
    pub render_time_us: u32,
    /// Time spent sleeping (rate limiting)
    pub sleep_time_us: u32,

    /// Minimum frame time observed
    pub frame_time_min_us: u32,
    /// Maximum frame time observed
    pub frame_time_max_us: u32,
    /// Exponential moving average of the frame time
    frame_time_avg_us: f32,

    /// Total frames since startup
    pub total_frames: u64,
    /// Sprites painted in the last scene frame
    pub sprites_drawn: u32,

    start_time: Instant,
}

impl FrameMetrics {
    /// Exponential moving average alpha (0.1 for smooth updates).
    const EMA_ALPHA: f32 = 0.1;

    /// Create new metrics, starting the uptime timer.
    pub fn new() -> Self {
        Self {
            frame_time_us: 0,
            render_time_us: 0,
            sleep_time_us: 0,
            frame_time_min_us: u32::MAX,
            frame_time_max_us: 0,
            frame_time_avg_us: 0.0,
            total_frames: 0,
            sprites_drawn: 0,
            start_time: Instant::now(),
        }
    }

    /// Record timing for one frame.
    pub fn record_frame(
        &mut self,
        total_time: Duration,
        render_time: Duration,
        sleep_time: Duration,
    ) {
        let total_us = total_time.as_micros() as u32;

        self.frame_time_us = total_us;
        self.render_time_us = render_time.as_micros() as u32;
        self.sleep_time_us = sleep_time.as_micros() as u32;

        self.frame_time_min_us = self.frame_time_min_us.min(total_us);
        self.frame_time_max_us = self.frame_time_max_us.max(total_us);

        if self.total_frames == 0 {
            self.frame_time_avg_us = total_us as f32;
        } else {
            self.frame_time_avg_us =
                Self::EMA_ALPHA.mul_add(total_us as f32, (1.0 - Self::EMA_ALPHA) * self.frame_time_avg_us);
        }

        self.total_frames += 1;
    }

    /// Average frame time in microseconds.
    #[inline]
    pub const fn frame_time_avg_us(&self) -> u32 { self.frame_time_avg_us as u32 }

    /// Minimum frame time, 0 before the first frame.
    #[inline]
    pub const fn frame_time_min_us(&self) -> u32 {
        if self.frame_time_min_us == u32::MAX {
            0
        } else {
            self.frame_time_min_us
        }
    }

    /// Time since the metrics were created.
    #[inline]
    pub fn uptime(&self) -> Duration { self.start_time.elapsed() }

    /// Format uptime as HH:MM:SS.
    pub fn uptime_string(&self) -> String<12> { format_hms(self.uptime().as_secs()) }
}

impl Default for FrameMetrics {
    fn default() -> Self { Self::new() }
}

fn format_hms(total_secs: u64) -> String<12> {
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    let mut s = String::new();
    for (i, part) in [hours, mins, secs].into_iter().enumerate() {
        if i > 0 {
            s.push(':').ok();
        }
        if part < 10 {
            s.push('0').ok();
        }
        push_u32(&mut s, part as u32);
    }
    s
}

// =============================================================================
// Unit Tests
// =============================================================================
