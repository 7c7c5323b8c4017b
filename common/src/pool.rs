//! Particle pools.
//!
//! A pool owns a fixed set of elements showing one sprite. Every element gets
//! its own infinitely repeating timeline:
//!
//! ```text
//! |-- delay --|== fade in (reposition) ==|== fade out ==|-- repeat delay --|
//!   [0, 2048)          3000 ms               3000 ms         [0, 1024)
//! ```
//!
//! The start and repeat delays are drawn once per particle when the pool is
//! created, so particles drift out of phase. The position is redrawn at the
//! start of every fade-in and never while the particle is visible.

use heapless::Vec;
use log::{debug, info};
use rand::{Rng, RngCore};

use crate::animator::{Animator, TimelineId};
use crate::config::{MAX_POOL_SIZE, PARTICLE_FADE_MS, PARTICLE_MAX_REPEAT_DELAY_MS, PARTICLE_MAX_START_DELAY_MS};
use crate::element::{Align, ElementId, ElementKind, SpriteKind, Surface};
use crate::error::SceneError;
use crate::timeline::{RepeatCount, Timeline};
use crate::tween::{StartHook, TweenSpec};

/// Size of the region random positions are drawn from, centred on the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    /// Horizontal extent in pixels.
    pub width: u32,
    /// Vertical extent in pixels.
    pub height: u32,
}

impl Bounds {
    /// Bounds of the given size.
    #[inline]
    pub const fn new(
        width: u32,
        height: u32,
    ) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool { self.width == 0 || self.height == 0 }
}

/// Uniformly random offset from the centre, inside `bounds`.
///
/// `x` lies in `[-width/2, width - width/2)`, likewise `y`. Empty bounds yield
/// the centre.
pub fn random_offset<R>(
    bounds: Bounds,
    rng: &mut R,
) -> (i32, i32)
where
    R: RngCore + ?Sized,
{
    (axis_offset(bounds.width, rng), axis_offset(bounds.height, rng))
}

fn axis_offset<R>(
    extent: u32,
    rng: &mut R,
) -> i32
where
    R: RngCore + ?Sized,
{
    if extent == 0 {
        return 0;
    }
    let half = (extent / 2) as i32;
    rng.gen_range(0..extent) as i32 - half
}

/// Placement and sizing shared by every particle of a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParticleLayout {
    /// Region particles are scattered over.
    pub bounds: Bounds,
    /// Fixed-point sprite scale.
    pub scale: u16,
}

/// One pooled element and the timeline animating it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Particle {
    /// The element.
    pub element: ElementId,
    /// Its running fade timeline.
    pub timeline: TimelineId,
}

/// Fixed set of particles sharing one sprite.
#[derive(Debug)]
pub struct ParticlePool {
    sprite: SpriteKind,
    particles: Vec<Particle, MAX_POOL_SIZE>,
}

impl ParticlePool {
    /// Create `count` particles of `sprite` and start their timelines.
    ///
    /// On any error every element and timeline created so far is removed
    /// again before the error is returned.
    pub fn spawn<S, R>(
        count: usize,
        sprite: SpriteKind,
        layout: ParticleLayout,
        animator: &mut Animator,
        surface: &mut S,
        rng: &mut R,
    ) -> Result<Self, SceneError>
    where
        S: Surface + ?Sized,
        R: RngCore + ?Sized,
    {
        if count > MAX_POOL_SIZE {
            return Err(SceneError::PoolTooLarge {
                requested: count,
                capacity: MAX_POOL_SIZE,
            });
        }
        if layout.bounds.is_empty() {
            return Err(SceneError::EmptyBounds);
        }

        let mut pool = Self {
            sprite,
            particles: Vec::new(),
        };
        for _ in 0..count {
            match spawn_particle(sprite, layout, animator, surface, rng) {
                Ok(particle) => {
                    // Capacity checked above
                    let _ = pool.particles.push(particle);
                }
                Err(err) => {
                    pool.despawn(animator, surface);
                    return Err(err);
                }
            }
        }

        info!("pool of {} {:?} particles created", count, sprite);
        Ok(pool)
    }

    /// Stop every timeline and destroy every element of the pool.
    pub fn despawn<S>(
        &mut self,
        animator: &mut Animator,
        surface: &mut S,
    ) where
        S: Surface + ?Sized,
    {
        while let Some(particle) = self.particles.pop() {
            animator.stop(particle.timeline);
            surface.destroy_element(particle.element);
        }
        debug!("pool of {:?} particles despawned", self.sprite);
    }

    /// Sprite shown by the pool.
    #[inline]
    pub const fn sprite(&self) -> SpriteKind { self.sprite }

    /// Number of particles.
    #[inline]
    pub fn len(&self) -> usize { self.particles.len() }

    /// Whether the pool has no particles.
    #[inline]
    pub fn is_empty(&self) -> bool { self.particles.is_empty() }

    /// Iterate over the particles.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Particle> { self.particles.iter() }
}

fn spawn_particle<S, R>(
    sprite: SpriteKind,
    layout: ParticleLayout,
    animator: &mut Animator,
    surface: &mut S,
    rng: &mut R,
) -> Result<Particle, SceneError>
where
    S: Surface + ?Sized,
    R: RngCore + ?Sized,
{
    let element = surface.create_element(ElementKind::Sprite(sprite))?;
    surface.set_scale(element, layout.scale);
    surface.set_position(element, Align::TopLeft, 0, 0);
    surface.set_opacity(element, 0);

    match fade_timeline(element, layout.bounds, rng).and_then(|timeline| animator.start(timeline)) {
        Ok(timeline) => Ok(Particle { element, timeline }),
        Err(err) => {
            surface.destroy_element(element);
            Err(err)
        }
    }
}

fn fade_timeline<R>(
    element: ElementId,
    bounds: Bounds,
    rng: &mut R,
) -> Result<Timeline, SceneError>
where
    R: RngCore + ?Sized,
{
    let fade_in = TweenSpec::fade(element, 0, u8::MAX, PARTICLE_FADE_MS)?.on_start(StartHook::Reposition(bounds));
    let fade_out = TweenSpec::fade(element, u8::MAX, 0, PARTICLE_FADE_MS)?;

    let mut timeline = Timeline::new();
    timeline.add(rng.gen_range(0..PARTICLE_MAX_START_DELAY_MS), fade_in)?;
    timeline.add(timeline.playtime(), fade_out)?;
    timeline.set_repeat_delay(rng.gen_range(0..PARTICLE_MAX_REPEAT_DELAY_MS));
    timeline.set_repeat_count(RepeatCount::Infinite)?;
    Ok(timeline)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rand::rngs::mock::StepRng;

    use super::*;
    use crate::config::{MAX_ELEMENTS, SCALE_UNITY};
    use crate::element::{ElementTree, Extent, Reaped};

    /// Forwards to an element tree and counts repositioning calls.
    struct RecordingSurface {
        tree: ElementTree,
        repositions: usize,
    }

    impl RecordingSurface {
        fn new() -> Self {
            Self {
                tree: ElementTree::new(128, 128),
                repositions: 0,
            }
        }
    }

    impl Surface for RecordingSurface {
        fn create_element(
            &mut self,
            kind: ElementKind,
        ) -> Result<ElementId, SceneError> {
            self.tree.create_element(kind)
        }

        fn set_opacity(
            &mut self,
            id: ElementId,
            opacity: u8,
        ) {
            self.tree.set_opacity(id, opacity);
        }

        fn set_position(
            &mut self,
            id: ElementId,
            align: Align,
            x: i32,
            y: i32,
        ) {
            if align == Align::Center {
                self.repositions += 1;
            }
            self.tree.set_position(id, align, x, y);
        }

        fn position(
            &self,
            id: ElementId,
        ) -> Option<(Align, i32, i32)> {
            self.tree.position(id)
        }

        fn set_scale(
            &mut self,
            id: ElementId,
            scale: u16,
        ) {
            self.tree.set_scale(id, scale);
        }

        fn set_extent(
            &mut self,
            id: ElementId,
            extent: Extent,
        ) {
            self.tree.set_extent(id, extent);
        }

        fn destroy_element(
            &mut self,
            id: ElementId,
        ) {
            self.tree.destroy_element(id);
        }

        fn destroy_element_async(
            &mut self,
            id: ElementId,
        ) {
            self.tree.destroy_element_async(id);
        }

        fn reap_destroyed(&mut self) -> Reaped { self.tree.reap_destroyed() }

        fn resolution(&self) -> (u32, u32) { self.tree.resolution() }
    }

    const LAYOUT: ParticleLayout = ParticleLayout {
        bounds: Bounds::new(128, 128),
        scale: 136,
    };

    #[test]
    fn test_random_offset_within_bounds() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..1000 {
            let (x, y) = random_offset(Bounds::new(100, 7), &mut rng);
            assert!((-50..50).contains(&x), "x out of bounds: {x}");
            assert!((-3..4).contains(&y), "y out of bounds: {y}");
        }
        assert_eq!(random_offset(Bounds::new(0, 0), &mut rng), (0, 0));
    }

    #[test]
    fn test_spawn_creates_exactly_count_elements() {
        for count in 0..=MAX_POOL_SIZE {
            let mut surface: ElementTree = ElementTree::new(128, 128);
            let mut animator = Animator::new();
            let mut rng = SmallRng::seed_from_u64(count as u64);

            let pool = ParticlePool::spawn(count, SpriteKind::Emerald, LAYOUT, &mut animator, &mut surface, &mut rng)
                .unwrap();

            assert_eq!(pool.len(), count);
            assert_eq!(surface.count_sprites(SpriteKind::Emerald), count);
            assert_eq!(animator.len(), count, "one timeline per particle");
            for particle in pool.iter() {
                let element = surface.get(particle.element).unwrap();
                assert_eq!(element.opacity, 0, "particles start invisible");
                assert_eq!(element.scale, 136);
                assert!(animator.is_active_for(particle.element));
            }
        }
    }

    #[test]
    fn test_spawn_rejects_oversized_pool() {
        let mut surface: ElementTree = ElementTree::new(128, 128);
        let mut animator = Animator::new();
        let mut rng = StepRng::new(0, 1);

        let result = ParticlePool::spawn(MAX_POOL_SIZE + 1, SpriteKind::Diamond, LAYOUT, &mut animator, &mut surface, &mut rng);
        assert_eq!(
            result.unwrap_err(),
            SceneError::PoolTooLarge {
                requested: MAX_POOL_SIZE + 1,
                capacity: MAX_POOL_SIZE,
            }
        );
        assert!(surface.is_empty());
    }

    #[test]
    fn test_spawn_rejects_empty_bounds() {
        let mut surface: ElementTree = ElementTree::new(128, 128);
        let mut animator = Animator::new();
        let mut rng = StepRng::new(0, 1);
        let layout = ParticleLayout {
            bounds: Bounds::new(0, 128),
            scale: SCALE_UNITY,
        };

        let result = ParticlePool::spawn(3, SpriteKind::Diamond, layout, &mut animator, &mut surface, &mut rng);
        assert_eq!(result.unwrap_err(), SceneError::EmptyBounds);
    }

    #[test]
    fn test_spawn_rolls_back_on_element_exhaustion() {
        let mut surface = ElementTree::<3>::new(128, 128);
        let mut animator = Animator::new();
        let mut rng = SmallRng::seed_from_u64(3);

        let result = ParticlePool::spawn(5, SpriteKind::GoldIngot, LAYOUT, &mut animator, &mut surface, &mut rng);
        assert_eq!(result.unwrap_err(), SceneError::TooManyElements);
        assert!(surface.is_empty(), "no element may survive a failed spawn");
        assert!(animator.is_empty(), "no timeline may survive a failed spawn");
    }

    #[test]
    fn test_reposition_only_at_fade_in_start() {
        let mut surface = RecordingSurface::new();
        let mut animator = Animator::new();
        // StepRng(0, 0) always draws 0: start delay 0, repeat delay 0
        let mut rng = StepRng::new(0, 0);

        ParticlePool::spawn(1, SpriteKind::Diamond, LAYOUT, &mut animator, &mut surface, &mut rng).unwrap();
        assert_eq!(surface.repositions, 0, "nothing moves before the first tick");

        // Cycle is 6000 ms: fade-in [0, 3000), fade-out [3000, 6000)
        let mut now = 0;
        let mut reposition_times = std::vec::Vec::new();
        while now < 30_000 {
            let before = surface.repositions;
            let _ = animator.tick(20, &mut surface, &mut rng);
            now += 20;
            if surface.repositions != before {
                assert_eq!(surface.repositions, before + 1, "one reposition per fade-in");
                reposition_times.push(now);
            }
        }
        // The first run starts on the first tick, later runs on the tick reaching each cycle boundary
        assert_eq!(reposition_times, [20, 6000, 12_000, 18_000, 24_000, 30_000]);
    }

    #[test]
    fn test_particles_loop_forever() {
        let mut surface: ElementTree = ElementTree::new(128, 128);
        let mut animator = Animator::new();
        let mut rng = SmallRng::seed_from_u64(42);

        let pool = ParticlePool::spawn(4, SpriteKind::IronIngot, LAYOUT, &mut animator, &mut surface, &mut rng).unwrap();
        for _ in 0..10_000 {
            let completions = animator.tick(16, &mut surface, &mut rng);
            assert!(completions.is_empty());
        }
        assert_eq!(animator.len(), 4, "infinite timelines never finish");
        assert!(pool.iter().all(|particle| surface.contains(particle.element)));
        assert!(surface.len() <= MAX_ELEMENTS);
    }

    #[test]
    fn test_despawn_removes_everything() {
        let mut surface: ElementTree = ElementTree::new(128, 128);
        let mut animator = Animator::new();
        let mut rng = SmallRng::seed_from_u64(5);

        let mut pool = ParticlePool::spawn(3, SpriteKind::Diamond, LAYOUT, &mut animator, &mut surface, &mut rng).unwrap();
        pool.despawn(&mut animator, &mut surface);
        assert!(pool.is_empty());
        assert!(surface.is_empty());
        assert!(animator.is_empty());
    }
}
