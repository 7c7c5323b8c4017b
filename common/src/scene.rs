//! Scene director.
//!
//! Owns the animator, the element handles and the random generator, and
//! sequences the presentation:
//!
//! ```text
//! Uninitialized --enter_scene--> Intro --IntroFinished--> Ambient
//! ```
//!
//! `Intro` fades the logo in and out. When the fade-out completes the logo is
//! destroyed asynchronously and the ambient scene is built: one particle pool
//! per preset entry, a dimming overlay and the decoration on top. `Ambient`
//! is terminal.
//!
//! # Tick Order
//!
//! 1. Advance every timeline, collecting completion events
//! 2. Handle every event (this is where the ambient scene gets built); the
//!    first failure is returned after the rest have run
//! 3. Reap elements destroyed during the tick and cancel their timelines

use heapless::{String, Vec};
use log::{debug, info, warn};
use rand::RngCore;

use crate::animator::Animator;
use crate::config::{
    DECORATION_BOB_HALF_PERIOD_MS, DECORATION_FADE_MS, HERO_EXTENT_PERCENT, INTRO_FADE_IN_AT_MS, INTRO_FADE_MS,
    INTRO_FADE_OUT_AT_MS, MAX_POOLS, OVERLAY_OPACITY, ScenePreset,
};
use crate::easing::Easing;
use crate::element::{Align, ElementId, ElementKind, Extent, SpriteKind, Surface};
use crate::error::SceneError;
use crate::pool::{ParticleLayout, ParticlePool};
use crate::profiling::{LOG_LINE_LENGTH, SceneLog, SceneStats, push_u32};
use crate::timeline::{RepeatCount, Timeline};
use crate::tween::{CompleteHook, Completion, Property, TweenSpec};

/// Presentation phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SceneState {
    /// Nothing shown yet.
    #[default]
    Uninitialized,
    /// Logo fading in and out.
    Intro,
    /// Particles, overlay and decoration.
    Ambient,
}

/// Handles of everything the director created.
#[derive(Debug, Default)]
pub struct AnimationContext {
    /// Intro logo, cleared once reaped.
    pub logo: Option<ElementId>,
    /// Ambient particle pools, in paint order.
    pub pools: Vec<ParticlePool, MAX_POOLS>,
    /// Dimming overlay between particles and decoration.
    pub overlay: Option<ElementId>,
    /// Ambient decoration.
    pub decoration: Option<ElementId>,
}

impl AnimationContext {
    /// Particles across all pools.
    pub fn particle_count(&self) -> usize { self.pools.iter().map(ParticlePool::len).sum() }

    /// Elements the director currently owns.
    pub fn element_count(&self) -> usize {
        self.particle_count()
            + usize::from(self.logo.is_some())
            + usize::from(self.overlay.is_some())
            + usize::from(self.decoration.is_some())
    }
}

/// Drives the intro and ambient scene on a [`Surface`].
pub struct SceneDirector<R> {
    preset: ScenePreset,
    state: SceneState,
    animator: Animator,
    context: AnimationContext,
    rng: R,
    log: SceneLog,
    clock_ms: u32,
}

impl<R: RngCore> SceneDirector<R> {
    /// A director for `preset`, drawing randomness from `rng`.
    pub fn new(
        preset: ScenePreset,
        rng: R,
    ) -> Self {
        Self {
            preset,
            state: SceneState::Uninitialized,
            animator: Animator::new(),
            context: AnimationContext::default(),
            rng,
            log: SceneLog::new(),
            clock_ms: 0,
        }
    }

    /// Show the logo and start the intro timeline.
    pub fn enter_scene<S>(
        &mut self,
        surface: &mut S,
    ) -> Result<(), SceneError>
    where
        S: Surface + ?Sized,
    {
        if self.state != SceneState::Uninitialized {
            return Err(SceneError::AlreadyEntered);
        }

        let logo = surface.create_element(ElementKind::Sprite(SpriteKind::Logo))?;
        surface.set_opacity(logo, 0);
        surface.set_scale(logo, self.preset.scale());
        surface.set_extent(logo, Extent::Percent(HERO_EXTENT_PERCENT));
        surface.set_position(logo, Align::Center, 0, 0);

        if let Err(err) = intro_timeline(logo).and_then(|timeline| self.animator.start(timeline)) {
            surface.destroy_element(logo);
            return Err(err);
        }

        self.context.logo = Some(logo);
        self.state = SceneState::Intro;
        info!("intro started on {} ({}x{})", self.preset.name, self.preset.width, self.preset.height);
        self.log.push(self.clock_ms, "intro started");
        Ok(())
    }

    /// Advance the scene by `dt_ms`.
    ///
    /// Errors come from building the ambient scene; elements destroyed during
    /// the tick are reaped either way.
    pub fn tick<S>(
        &mut self,
        dt_ms: u32,
        surface: &mut S,
    ) -> Result<(), SceneError>
    where
        S: Surface + ?Sized,
    {
        self.clock_ms = self.clock_ms.saturating_add(dt_ms);

        let completions = self.animator.tick(dt_ms, surface, &mut self.rng);
        let mut handled = Ok(());
        for completion in &completions {
            if let Err(err) = self.handle_completion(*completion, surface) {
                warn!("completion {:?} failed: {}", completion, err);
                handled = handled.and(Err(err));
            }
        }

        for element in surface.reap_destroyed() {
            self.animator.cancel_element(element);
            if self.context.logo == Some(element) {
                self.context.logo = None;
                debug!("logo reaped");
            }
        }

        handled
    }

    fn handle_completion<S>(
        &mut self,
        completion: Completion,
        surface: &mut S,
    ) -> Result<(), SceneError>
    where
        S: Surface + ?Sized,
    {
        match completion.hook {
            CompleteHook::IntroFinished => {
                if self.state != SceneState::Intro || self.context.logo != Some(completion.target) {
                    warn!("ignoring stray intro completion for {:?}", completion.target);
                    return Ok(());
                }
                surface.destroy_element_async(completion.target);
                self.enter_ambient(surface)
            }
            CompleteHook::DecorationShown => {
                if self.context.decoration != Some(completion.target) {
                    return Ok(());
                }
                self.start_bobbing(completion.target)
            }
        }
    }

    fn enter_ambient<S>(
        &mut self,
        surface: &mut S,
    ) -> Result<(), SceneError>
    where
        S: Surface + ?Sized,
    {
        if let Err(err) = self.build_ambient(surface) {
            self.teardown_ambient(surface);
            warn!("ambient scene failed: {}", err);
            self.log.push(self.clock_ms, "ambient scene failed");
            return Err(err);
        }

        self.state = SceneState::Ambient;
        let particles = self.context.particle_count();
        info!("ambient scene entered: {} particles in {} pools", particles, self.context.pools.len());

        let mut line: String<LOG_LINE_LENGTH> = String::new();
        line.push_str("ambient, particles ").ok();
        push_u32(&mut line, particles as u32);
        self.log.push(self.clock_ms, &line);
        Ok(())
    }

    fn build_ambient<S>(
        &mut self,
        surface: &mut S,
    ) -> Result<(), SceneError>
    where
        S: Surface + ?Sized,
    {
        let layout = ParticleLayout {
            bounds: self.preset.particle_bounds(),
            scale: self.preset.scale(),
        };
        for config in self.preset.pools {
            let pool = ParticlePool::spawn(config.count, config.sprite, layout, &mut self.animator, surface, &mut self.rng)?;
            if let Err(mut pool) = self.context.pools.push(pool) {
                pool.despawn(&mut self.animator, surface);
                return Err(SceneError::TooManyPools);
            }
        }

        let overlay = surface.create_element(ElementKind::Overlay)?;
        surface.set_extent(overlay, Extent::Percent(100));
        surface.set_position(overlay, Align::Center, 0, 0);
        surface.set_opacity(overlay, OVERLAY_OPACITY);
        self.context.overlay = Some(overlay);

        let decoration = surface.create_element(ElementKind::Sprite(SpriteKind::DiamondPickaxe))?;
        surface.set_scale(decoration, self.preset.decoration_scale());
        surface.set_extent(decoration, Extent::Percent(HERO_EXTENT_PERCENT));
        surface.set_position(decoration, Align::Center, 0, 0);
        surface.set_opacity(decoration, 0);
        self.context.decoration = Some(decoration);

        let mut fade_in = TweenSpec::fade(decoration, 0, u8::MAX, DECORATION_FADE_MS)?;
        if self.preset.decoration_bob_px > 0 {
            fade_in = fade_in.on_complete(CompleteHook::DecorationShown);
        }
        self.animator.start_tween(fade_in)?;
        Ok(())
    }

    fn teardown_ambient<S>(
        &mut self,
        surface: &mut S,
    ) where
        S: Surface + ?Sized,
    {
        for pool in &mut self.context.pools {
            pool.despawn(&mut self.animator, surface);
        }
        self.context.pools.clear();
        for element in [self.context.overlay.take(), self.context.decoration.take()].into_iter().flatten() {
            self.animator.cancel_element(element);
            surface.destroy_element(element);
        }
    }

    fn start_bobbing(
        &mut self,
        decoration: ElementId,
    ) -> Result<(), SceneError> {
        let amplitude = self.preset.decoration_bob_px as i32;
        let half = DECORATION_BOB_HALF_PERIOD_MS;

        let mut timeline = Timeline::new();
        timeline.add(
            0,
            TweenSpec::new(decoration, Property::OffsetY, 0, -amplitude, half)?.with_easing(Easing::SineInOut),
        )?;
        timeline.add(
            half,
            TweenSpec::new(decoration, Property::OffsetY, -amplitude, 0, half)?.with_easing(Easing::SineInOut),
        )?;
        timeline.set_repeat_count(RepeatCount::Infinite)?;
        self.animator.start(timeline)?;

        debug!("decoration bobbing by {} px", amplitude);
        self.log.push(self.clock_ms, "decoration bobbing");
        Ok(())
    }

    /// Current phase.
    #[inline]
    pub const fn state(&self) -> SceneState { self.state }

    /// Preset the scene was built from.
    #[inline]
    pub const fn preset(&self) -> &ScenePreset { &self.preset }

    /// Handles of the scene's elements and pools.
    #[inline]
    pub const fn context(&self) -> &AnimationContext { &self.context }

    /// The scheduler running the scene's timelines.
    #[inline]
    pub const fn animator(&self) -> &Animator { &self.animator }

    /// Scene time since construction.
    #[inline]
    pub const fn clock_ms(&self) -> u32 { self.clock_ms }

    /// Timestamped scene events.
    #[inline]
    pub const fn log(&self) -> &SceneLog { &self.log }

    /// Snapshot of the scene's load.
    pub fn stats(&self) -> SceneStats {
        SceneStats {
            state: self.state,
            clock_ms: self.clock_ms,
            elements: self.context.element_count(),
            timelines: self.animator.len(),
            particles: self.context.particle_count(),
        }
    }
}

fn intro_timeline(logo: ElementId) -> Result<Timeline, SceneError> {
    let mut timeline = Timeline::new();
    timeline.add(INTRO_FADE_IN_AT_MS, TweenSpec::fade(logo, 0, u8::MAX, INTRO_FADE_MS)?)?;
    timeline.add(
        INTRO_FADE_OUT_AT_MS,
        TweenSpec::fade(logo, u8::MAX, 0, INTRO_FADE_MS)?.on_complete(CompleteHook::IntroFinished),
    )?;
    Ok(timeline)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rand::rngs::mock::StepRng;

    use super::*;
    use crate::config::{ST7735_PRESET, ST7789_PRESET};
    use crate::element::ElementTree;

    const TICK_MS: u32 = 16;

    fn setup(preset: ScenePreset) -> (SceneDirector<SmallRng>, ElementTree) {
        let tree = ElementTree::new(preset.width, preset.height);
        (SceneDirector::new(preset, SmallRng::seed_from_u64(2024)), tree)
    }

    fn run(
        director: &mut SceneDirector<SmallRng>,
        tree: &mut ElementTree,
        ticks: usize,
    ) {
        for _ in 0..ticks {
            director.tick(TICK_MS, tree).unwrap();
        }
    }

    #[test]
    fn test_enter_scene_shows_invisible_logo() {
        let (mut director, mut tree) = setup(ST7735_PRESET);
        assert_eq!(director.state(), SceneState::Uninitialized);

        director.enter_scene(&mut tree).unwrap();
        assert_eq!(director.state(), SceneState::Intro);

        let logo = director.context().logo.unwrap();
        let element = tree.get(logo).unwrap();
        assert_eq!(element.opacity, 0);
        assert_eq!(element.scale, 136);
        assert_eq!(element.extent, Extent::Percent(HERO_EXTENT_PERCENT));
        assert_eq!(director.animator().len(), 1);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_enter_scene_twice_rejected() {
        let (mut director, mut tree) = setup(ST7735_PRESET);
        director.enter_scene(&mut tree).unwrap();
        assert_eq!(director.enter_scene(&mut tree), Err(SceneError::AlreadyEntered));
        assert_eq!(tree.len(), 1, "second call must not create a logo");
    }

    #[test]
    fn test_logo_fades_in_then_out() {
        let (mut director, mut tree) = setup(ST7735_PRESET);
        director.enter_scene(&mut tree).unwrap();
        let logo = director.context().logo.unwrap();

        // 1024 ms: fade-in (10..1010 ms) done
        run(&mut director, &mut tree, 64);
        assert_eq!(tree.get(logo).unwrap().opacity, 255);
        // 2496 ms: fade-out half way
        run(&mut director, &mut tree, 92);
        let opacity = tree.get(logo).unwrap().opacity;
        assert!(opacity > 0 && opacity < 255, "logo should be mid fade-out, got {opacity}");
    }

    #[test]
    fn test_transition_to_ambient_st7735() {
        let (mut director, mut tree) = setup(ST7735_PRESET);
        director.enter_scene(&mut tree).unwrap();
        let logo = director.context().logo.unwrap();

        // 187 * 16 = 2992 ms, fade-out not finished yet
        run(&mut director, &mut tree, 187);
        assert_eq!(director.state(), SceneState::Intro);
        assert!(tree.contains(logo));

        // 188 * 16 = 3008 ms
        run(&mut director, &mut tree, 1);
        assert_eq!(director.state(), SceneState::Ambient);
        assert!(!tree.contains(logo), "logo must be reaped at the transition");
        assert_eq!(director.context().logo, None);

        let context = director.context();
        assert_eq!(context.particle_count(), 16);
        assert_eq!(context.pools.len(), 4);
        for (pool, sprite) in context.pools.iter().zip([
            SpriteKind::Diamond,
            SpriteKind::Emerald,
            SpriteKind::IronIngot,
            SpriteKind::GoldIngot,
        ]) {
            assert_eq!(pool.sprite(), sprite);
            assert_eq!(tree.count_sprites(sprite), 4);
        }
        assert_eq!(tree.count_sprites(SpriteKind::DiamondPickaxe), 1);
        assert_eq!(tree.len(), 16 + 2, "particles plus overlay and decoration");
        assert_eq!(tree.count_sprites(SpriteKind::Logo), 0);
    }

    #[test]
    fn test_transition_to_ambient_st7789() {
        let (mut director, mut tree) = setup(ST7789_PRESET);
        director.enter_scene(&mut tree).unwrap();
        run(&mut director, &mut tree, 188);

        assert_eq!(director.state(), SceneState::Ambient);
        assert_eq!(director.context().particle_count(), 12);
        assert_eq!(tree.len(), 12 + 2);
    }

    #[test]
    fn test_transition_happens_exactly_once() {
        let (mut director, mut tree) = setup(ST7735_PRESET);
        director.enter_scene(&mut tree).unwrap();

        let mut transitions = 0;
        let mut previous = director.state();
        for _ in 0..2000 {
            director.tick(TICK_MS, &mut tree).unwrap();
            if director.state() != previous {
                transitions += 1;
                previous = director.state();
            }
        }
        assert_eq!(transitions, 1);
        assert_eq!(director.state(), SceneState::Ambient);
        assert_eq!(director.context().particle_count(), 16, "pools are never resized");
        assert_eq!(tree.len(), 18);
    }

    #[test]
    fn test_paint_order() {
        let (mut director, mut tree) = setup(ST7735_PRESET);
        director.enter_scene(&mut tree).unwrap();
        run(&mut director, &mut tree, 188);

        let kinds: std::vec::Vec<ElementKind> = tree.iter().map(|(_, element)| element.kind).collect();
        assert_eq!(kinds.len(), 18);
        assert_eq!(kinds[16], ElementKind::Overlay, "overlay above particles");
        assert_eq!(kinds[17], ElementKind::Sprite(SpriteKind::DiamondPickaxe), "decoration on top");
    }

    #[test]
    fn test_overlay_and_decoration_setup() {
        let (mut director, mut tree) = setup(ST7735_PRESET);
        director.enter_scene(&mut tree).unwrap();
        run(&mut director, &mut tree, 188);

        let overlay = tree.get(director.context().overlay.unwrap()).unwrap();
        assert_eq!(overlay.opacity, OVERLAY_OPACITY);
        assert_eq!(overlay.extent, Extent::Percent(100));

        let decoration = director.context().decoration.unwrap();
        assert_eq!(tree.get(decoration).unwrap().scale, 136, "st7735 scales the decoration");

        // One-shot fade-in of the decoration
        run(&mut director, &mut tree, 70);
        assert_eq!(tree.get(decoration).unwrap().opacity, 255);
        assert!(!director.animator().is_active_for(decoration), "no bobbing without amplitude");
        assert_eq!(director.animator().len(), 16);
    }

    #[test]
    fn test_decoration_bobs_st7789() {
        let (mut director, mut tree) = setup(ST7789_PRESET);
        director.enter_scene(&mut tree).unwrap();
        run(&mut director, &mut tree, 188);

        let decoration = director.context().decoration.unwrap();
        assert_eq!(tree.get(decoration).unwrap().scale, 256, "st7789 keeps the design size");

        let mut lowest = 0;
        let mut highest = 0;
        for _ in 0..500 {
            director.tick(TICK_MS, &mut tree).unwrap();
            let (align, x, y) = tree.position(decoration).unwrap();
            assert_eq!((align, x), (Align::Center, 0));
            lowest = lowest.min(y);
            highest = highest.max(y);
        }
        assert_eq!(lowest, -6, "bob reaches its full amplitude");
        assert_eq!(highest, 0);
        assert!(director.animator().is_active_for(decoration), "bobbing loops forever");
    }

    #[test]
    fn test_particles_stay_within_bounds() {
        let (mut director, mut tree) = setup(ST7789_PRESET);
        director.enter_scene(&mut tree).unwrap();
        run(&mut director, &mut tree, 1000);

        // Safe area of 240 is 192: offsets within [-96, 96)
        for pool in &director.context().pools {
            for particle in pool.iter() {
                let (_, x, y) = tree.position(particle.element).unwrap();
                assert!((-96..96).contains(&x) && (-96..96).contains(&y), "particle at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_same_seed_same_scene() {
        let (mut a, mut tree_a) = setup(ST7735_PRESET);
        let (mut b, mut tree_b) = setup(ST7735_PRESET);
        a.enter_scene(&mut tree_a).unwrap();
        b.enter_scene(&mut tree_b).unwrap();
        run(&mut a, &mut tree_a, 600);
        run(&mut b, &mut tree_b, 600);

        let positions_a: std::vec::Vec<_> = tree_a.iter().map(|(_, element)| (element.x, element.y, element.opacity)).collect();
        let positions_b: std::vec::Vec<_> = tree_b.iter().map(|(_, element)| (element.x, element.y, element.opacity)).collect();
        assert_eq!(positions_a, positions_b);
    }

    #[test]
    fn test_ambient_failure_propagates_without_partial_state() {
        // Room for the logo and a handful of particles only
        let mut tree = ElementTree::<6>::new(128, 128);
        let mut director = SceneDirector::new(ST7735_PRESET, StepRng::new(0, 1));
        director.enter_scene(&mut tree).unwrap();

        let mut result = Ok(());
        for _ in 0..188 {
            result = director.tick(TICK_MS, &mut tree);
            if result.is_err() {
                break;
            }
        }
        assert_eq!(result, Err(SceneError::TooManyElements));
        assert_eq!(director.state(), SceneState::Intro, "failed build never reaches ambient");
        assert!(tree.is_empty(), "logo reaped and partial pools removed");
        assert!(director.animator().is_empty());
    }

    #[test]
    fn test_failed_completion_does_not_drop_later_ones() {
        let mut tree = ElementTree::<6>::new(128, 128);
        let mut director = SceneDirector::new(ST7735_PRESET, StepRng::new(0, 1));
        let logo = tree.create_element(ElementKind::Sprite(SpriteKind::Logo)).unwrap();
        director.state = SceneState::Intro;
        director.context.logo = Some(logo);

        // Two intro completions in the same tick, both failing to build the ambient scene
        let mut timeline = Timeline::new();
        for _ in 0..2 {
            let fade_out = TweenSpec::fade(logo, u8::MAX, 0, 100).unwrap().on_complete(CompleteHook::IntroFinished);
            timeline.add(0, fade_out).unwrap();
        }
        director.animator.start(timeline).unwrap();

        assert_eq!(director.tick(100, &mut tree), Err(SceneError::TooManyElements));
        let failures = director.log().iter().filter(|line| line.ends_with("ambient scene failed")).count();
        assert_eq!(failures, 2, "second completion must still be handled");
        assert_eq!(director.state(), SceneState::Intro);
        assert!(tree.is_empty(), "logo reaped after both completions ran");
    }

    #[test]
    fn test_stats_and_log() {
        let (mut director, mut tree) = setup(ST7735_PRESET);
        director.enter_scene(&mut tree).unwrap();
        run(&mut director, &mut tree, 188);

        let stats = director.stats();
        assert_eq!(stats.state, SceneState::Ambient);
        assert_eq!(stats.clock_ms, 3008);
        assert_eq!(stats.elements, 18);
        assert_eq!(stats.particles, 16);
        assert_eq!(stats.timelines, 17, "one per particle plus the decoration fade");

        assert_eq!(director.log().len(), 2);
        assert_eq!(director.log().last(), Some("    3.008 ambient, particles 16"));
    }
}
