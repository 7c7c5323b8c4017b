//! Timeline sequencer.
//!
//! A [`Timeline`] schedules tweens at fixed offsets from its own start. Offsets
//! are independent: an entry added at [`Timeline::playtime`] runs right after
//! every earlier entry has finished, which is how back-to-back chains are built.
//!
//! ```text
//! cycle k:  k * period ........ k * period + playtime ...... (k + 1) * period
//!           |<------- entries run ------->|<- repeat delay ->|
//!
//! period = playtime + repeat_delay
//! ```
//!
//! Every tween is rewound at a cycle boundary, so its start hook fires again
//! at `k * period + offset`.

use heapless::Vec;
use log::warn;
use rand::RngCore;

use crate::config::{MAX_COMPLETIONS, MAX_TIMELINE_ENTRIES};
use crate::element::{ElementId, Surface};
use crate::error::SceneError;
use crate::tween::{Completion, Tween, TweenSpec};

/// Completions collected during one tick.
pub type Completions = Vec<Completion, MAX_COMPLETIONS>;

/// How many times a timeline plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepeatCount {
    /// Play this many cycles in total (at least 1).
    Times(u16),
    /// Loop until stopped.
    Infinite,
}

impl Default for RepeatCount {
    fn default() -> Self { Self::Times(1) }
}

/// A tween scheduled at an offset from the timeline start.
#[derive(Clone, Copy, Debug)]
pub struct TimelineEntry {
    /// Start of the tween relative to the start of each cycle.
    pub offset_ms: u32,
    tween: Tween,
}

impl TimelineEntry {
    /// The scheduled tween's description.
    #[inline]
    pub const fn spec(&self) -> &TweenSpec { self.tween.spec() }

    /// End of the tween relative to the start of each cycle.
    #[inline]
    pub const fn end_ms(&self) -> u32 { self.offset_ms + self.tween.spec().duration_ms }
}

/// Offset-scheduled composition of tweens.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    entries: Vec<TimelineEntry, MAX_TIMELINE_ENTRIES>,
    repeat_delay_ms: u32,
    repeat: RepeatCount,
    /// Cycles completed so far.
    cycle: u32,
    /// Position inside the current cycle.
    cursor_ms: u32,
    finished: bool,
}

impl Timeline {
    /// An empty timeline playing once, without repeat delay.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            repeat_delay_ms: 0,
            repeat: RepeatCount::Times(1),
            cycle: 0,
            cursor_ms: 0,
            finished: false,
        }
    }

    /// Schedule `spec` at `offset_ms` from the start of each cycle.
    pub fn add(
        &mut self,
        offset_ms: u32,
        spec: TweenSpec,
    ) -> Result<(), SceneError> {
        if offset_ms.checked_add(spec.duration_ms).is_none() {
            return Err(SceneError::OffsetOverflow);
        }
        self.entries
            .push(TimelineEntry {
                offset_ms,
                tween: Tween::new(spec),
            })
            .map_err(|_| SceneError::TooManyEntries)
    }

    /// Latest end time over all entries (0 when empty).
    pub fn playtime(&self) -> u32 { self.entries.iter().map(TimelineEntry::end_ms).max().unwrap_or(0) }

    /// Idle time between the end of one cycle and the start of the next.
    #[inline]
    pub fn set_repeat_delay(
        &mut self,
        delay_ms: u32,
    ) {
        self.repeat_delay_ms = delay_ms;
    }

    /// Configured repeat delay.
    #[inline]
    pub const fn repeat_delay(&self) -> u32 { self.repeat_delay_ms }

    /// Set how many cycles to play.
    pub fn set_repeat_count(
        &mut self,
        repeat: RepeatCount,
    ) -> Result<(), SceneError> {
        if repeat == RepeatCount::Times(0) {
            return Err(SceneError::ZeroRepeatCount);
        }
        self.repeat = repeat;
        Ok(())
    }

    /// Configured repeat count.
    #[inline]
    pub const fn repeat_count(&self) -> RepeatCount { self.repeat }

    /// Length of one cycle including the repeat delay.
    #[inline]
    pub fn period(&self) -> u32 { self.playtime().saturating_add(self.repeat_delay_ms) }

    /// Scheduled entries in insertion order.
    #[inline]
    pub fn entries(&self) -> &[TimelineEntry] { &self.entries }

    /// Elements written by this timeline.
    pub fn targets(&self) -> impl Iterator<Item = ElementId> + '_ { self.entries.iter().map(|entry| entry.spec().target) }

    /// Whether the timeline targets `element`.
    pub fn targets_element(
        &self,
        element: ElementId,
    ) -> bool {
        self.targets().any(|target| target == element)
    }

    /// Whether every cycle has played.
    #[inline]
    pub const fn is_finished(&self) -> bool { self.finished }

    /// Cycles completed so far.
    #[inline]
    pub const fn cycles_completed(&self) -> u32 { self.cycle }

    /// Advance playback by `dt_ms`, collecting completion events into `out`.
    ///
    /// A single call may cross several cycle boundaries; each crossed cycle
    /// drives every entry to its end first, so every completion and start hook
    /// still fires. An empty timeline finishes on its first advance.
    pub(crate) fn advance<S, R>(
        &mut self,
        dt_ms: u32,
        surface: &mut S,
        rng: &mut R,
        out: &mut Completions,
    ) where
        S: Surface + ?Sized,
        R: RngCore + ?Sized,
    {
        if self.finished {
            return;
        }
        if self.entries.is_empty() {
            self.finished = true;
            return;
        }

        let playtime = self.playtime();
        let period = self.period();
        let mut target = self.cursor_ms.saturating_add(dt_ms);

        loop {
            self.drive_entries(target.min(playtime), surface, rng, out);

            if self.is_last_cycle() && target >= playtime {
                self.cycle += 1;
                self.cursor_ms = playtime;
                self.finished = true;
                return;
            }
            if target < period {
                self.cursor_ms = target;
                return;
            }

            target -= period;
            self.cycle = self.cycle.saturating_add(1);
            self.cursor_ms = 0;
            for entry in &mut self.entries {
                entry.tween.reset();
            }
        }
    }

    fn is_last_cycle(&self) -> bool {
        match self.repeat {
            RepeatCount::Times(count) => self.cycle + 1 >= u32::from(count),
            RepeatCount::Infinite => false,
        }
    }

    fn drive_entries<S, R>(
        &mut self,
        position_ms: u32,
        surface: &mut S,
        rng: &mut R,
        out: &mut Completions,
    ) where
        S: Surface + ?Sized,
        R: RngCore + ?Sized,
    {
        for entry in &mut self.entries {
            if position_ms < entry.offset_ms {
                continue;
            }
            let Some(completion) = entry.tween.advance_to(position_ms - entry.offset_ms, surface, rng) else {
                continue;
            };
            if out.push(completion).is_err() {
                warn!("completion buffer full, dropping {:?}", completion);
            }
        }
    }
}
