//! Tick-driven scheduler owning every running timeline.
//!
//! Timelines are moved into the [`Animator`] when started and advanced
//! together once per tick, in start order. Completion events are collected
//! during the pass and returned to the caller, so nothing mutates the
//! timeline list while it is being iterated. Finished timelines are dropped
//! after the pass.

use heapless::Vec;
use log::debug;
use rand::RngCore;

use crate::config::MAX_TIMELINES;
use crate::element::{ElementId, Surface};
use crate::error::SceneError;
use crate::timeline::{Completions, Timeline};
use crate::tween::TweenSpec;

/// Handle to a running timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimelineId(u32);

/// Owner of all running timelines.
#[derive(Debug)]
pub struct Animator {
    timelines: Vec<(TimelineId, Timeline), MAX_TIMELINES>,
    next_id: u32,
}

impl Animator {
    /// An animator with nothing running.
    pub const fn new() -> Self {
        Self {
            timelines: Vec::new(),
            next_id: 0,
        }
    }

    /// Start playing `timeline`.
    ///
    /// Fails with [`SceneError::ElementBusy`] if one of its targets is already
    /// animated by another running timeline.
    pub fn start(
        &mut self,
        timeline: Timeline,
    ) -> Result<TimelineId, SceneError> {
        if timeline.targets().any(|target| self.is_active_for(target)) {
            return Err(SceneError::ElementBusy);
        }
        if self.timelines.is_full() {
            return Err(SceneError::TooManyTimelines);
        }

        let id = TimelineId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        debug!(
            "timeline {:?} started: {} entries, playtime {} ms",
            id,
            timeline.entries().len(),
            timeline.playtime()
        );
        // Capacity checked above
        let _ = self.timelines.push((id, timeline));
        Ok(id)
    }

    /// Start a one-shot timeline holding just `spec` at offset 0.
    pub fn start_tween(
        &mut self,
        spec: TweenSpec,
    ) -> Result<TimelineId, SceneError> {
        let mut timeline = Timeline::new();
        timeline.add(0, spec)?;
        self.start(timeline)
    }

    /// Stop a timeline. Returns whether it was still running.
    pub fn stop(
        &mut self,
        id: TimelineId,
    ) -> bool {
        let before = self.timelines.len();
        self.timelines.retain(|(running, _)| *running != id);
        let stopped = self.timelines.len() != before;
        if stopped {
            debug!("timeline {:?} stopped", id);
        }
        stopped
    }

    /// Stop every timeline that writes to `element`. Returns how many were stopped.
    pub fn cancel_element(
        &mut self,
        element: ElementId,
    ) -> usize {
        let before = self.timelines.len();
        self.timelines.retain(|(_, timeline)| !timeline.targets_element(element));
        let cancelled = before - self.timelines.len();
        if cancelled > 0 {
            debug!("cancelled {} timeline(s) of {:?}", cancelled, element);
        }
        cancelled
    }

    /// Advance every running timeline by `dt_ms`.
    ///
    /// Returns the completion events fired during the pass, in firing order.
    pub fn tick<S, R>(
        &mut self,
        dt_ms: u32,
        surface: &mut S,
        rng: &mut R,
    ) -> Completions
    where
        S: Surface + ?Sized,
        R: RngCore + ?Sized,
    {
        let mut completions = Completions::new();
        for (_, timeline) in &mut self.timelines {
            timeline.advance(dt_ms, surface, rng, &mut completions);
        }
        self.timelines.retain(|(_, timeline)| !timeline.is_finished());
        completions
    }

    /// Whether `id` is still running.
    pub fn is_running(
        &self,
        id: TimelineId,
    ) -> bool {
        self.timelines.iter().any(|(running, _)| *running == id)
    }

    /// Whether a running timeline writes to `element`.
    pub fn is_active_for(
        &self,
        element: ElementId,
    ) -> bool {
        self.timelines.iter().any(|(_, timeline)| timeline.targets_element(element))
    }

    /// Number of running timelines.
    #[inline]
    pub fn len(&self) -> usize { self.timelines.len() }

    /// Whether nothing is running.
    #[inline]
    pub fn is_empty(&self) -> bool { self.timelines.is_empty() }
}

impl Default for Animator {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;

    use super::*;
    use crate::element::{ElementKind, ElementTree, SpriteKind};
    use crate::timeline::RepeatCount;
    use crate::tween::{CompleteHook, Completion};

    fn setup() -> (ElementTree<8>, StepRng) { (ElementTree::new(128, 128), StepRng::new(0, 1)) }

    #[test]
    fn test_element_busy() {
        let (mut tree, _) = setup();
        let id = tree.create_element(ElementKind::Sprite(SpriteKind::Diamond)).unwrap();
        let mut animator = Animator::new();

        animator.start_tween(TweenSpec::fade(id, 0, 255, 100).unwrap()).unwrap();
        assert!(animator.is_active_for(id));
        assert_eq!(
            animator.start_tween(TweenSpec::fade(id, 255, 0, 100).unwrap()),
            Err(SceneError::ElementBusy),
            "second timeline on the same element must be refused"
        );
        assert_eq!(animator.len(), 1);
    }

    #[test]
    fn test_timeline_capacity() {
        let mut tree: ElementTree<32> = ElementTree::new(128, 128);
        let mut animator = Animator::new();
        for _ in 0..MAX_TIMELINES {
            let id = tree.create_element(ElementKind::Overlay).unwrap();
            animator.start_tween(TweenSpec::fade(id, 0, 255, 100).unwrap()).unwrap();
        }

        let id = tree.create_element(ElementKind::Overlay).unwrap();
        assert_eq!(
            animator.start_tween(TweenSpec::fade(id, 0, 255, 100).unwrap()),
            Err(SceneError::TooManyTimelines)
        );
        assert_eq!(animator.len(), MAX_TIMELINES);
    }

    #[test]
    fn test_finished_timelines_removed() {
        let (mut tree, mut rng) = setup();
        let a = tree.create_element(ElementKind::Sprite(SpriteKind::Diamond)).unwrap();
        let b = tree.create_element(ElementKind::Sprite(SpriteKind::Emerald)).unwrap();
        let mut animator = Animator::new();

        let short = animator
            .start_tween(TweenSpec::fade(a, 0, 255, 50).unwrap().on_complete(CompleteHook::DecorationShown))
            .unwrap();
        let mut looping = Timeline::new();
        looping.add(0, TweenSpec::fade(b, 0, 255, 50).unwrap()).unwrap();
        looping.set_repeat_count(RepeatCount::Infinite).unwrap();
        let looping = animator.start(looping).unwrap();

        let completions = animator.tick(50, &mut tree, &mut rng);
        assert_eq!(
            completions.as_slice(),
            &[Completion {
                target: a,
                hook: CompleteHook::DecorationShown,
            }]
        );
        assert!(!animator.is_running(short), "finished timeline is dropped after the pass");
        assert!(animator.is_running(looping));
        assert!(animator.tick(50, &mut tree, &mut rng).is_empty());
    }

    #[test]
    fn test_stop_and_cancel() {
        let (mut tree, mut rng) = setup();
        let a = tree.create_element(ElementKind::Sprite(SpriteKind::Diamond)).unwrap();
        let b = tree.create_element(ElementKind::Sprite(SpriteKind::Emerald)).unwrap();
        let mut animator = Animator::new();

        let first = animator.start_tween(TweenSpec::fade(a, 0, 255, 100).unwrap()).unwrap();
        animator.start_tween(TweenSpec::fade(b, 0, 255, 100).unwrap()).unwrap();

        assert!(animator.stop(first));
        assert!(!animator.stop(first), "stopping twice is a no-op");
        assert_eq!(animator.cancel_element(b), 1);
        assert!(animator.is_empty());

        tree.set_opacity(a, 7);
        let _ = animator.tick(100, &mut tree, &mut rng);
        assert_eq!(tree.get(a).unwrap().opacity, 7, "stopped timeline must not write");
    }

    #[test]
    fn test_ids_unique() {
        let (mut tree, _) = setup();
        let a = tree.create_element(ElementKind::Sprite(SpriteKind::Diamond)).unwrap();
        let mut animator = Animator::new();

        let first = animator.start_tween(TweenSpec::fade(a, 0, 255, 100).unwrap()).unwrap();
        animator.stop(first);
        let second = animator.start_tween(TweenSpec::fade(a, 0, 255, 100).unwrap()).unwrap();
        assert_ne!(first, second);
    }
}
