//! Simulator window pages.
//!
//! The window shows one page at a time; `Y` flips between them. The scene
//! keeps ticking either way, only what gets drawn changes.
//!
//! | Page | Draws | Sprite count |
//! |------|-------|--------------|
//! | [`Page::Scene`] | The element tree as the panel shows it | painted sprites |
//! | [`Page::Debug`] | Scene statistics, frame timing and the scene log | none |

use ambient_scene_common::{ElementTree, SceneLog, SceneStats};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::profiling::FrameMetrics;
use crate::render::draw_scene;
use crate::screens::draw_debug_page;

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum Page {
    #[default]
    Scene,
    Debug,
}

/// Everything a page may need besides the element tree.
pub struct PageContext<'a> {
    pub metrics: &'a FrameMetrics,
    pub stats: SceneStats,
    pub log: &'a SceneLog,
    pub fps: f32,
}

impl Page {
    #[inline]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Scene => Self::Debug,
            Self::Debug => Self::Scene,
        }
    }

    /// Short label for logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Scene => "scene",
            Self::Debug => "debug",
        }
    }

    /// Draw the page, returning the sprites painted when it shows the scene.
    pub fn draw<D>(
        self,
        display: &mut D,
        tree: &ElementTree,
        context: &PageContext<'_>,
    ) -> Option<usize>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        match self {
            Self::Scene => Some(draw_scene(display, tree)),
            Self::Debug => {
                draw_debug_page(display, context.metrics, &context.stats, context.log, context.fps);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ambient_scene_common::{ElementKind, SceneState, SpriteKind, Surface};
    use embedded_graphics_simulator::SimulatorDisplay;

    use super::*;
    use crate::colors::{BLACK, DIAMOND};

    fn scene_with_diamond() -> ElementTree {
        let mut tree: ElementTree = ElementTree::new(128, 128);
        tree.create_element(ElementKind::Sprite(SpriteKind::Diamond)).ok();
        tree
    }

    fn draw_page(page: Page) -> (SimulatorDisplay<Rgb565>, Option<usize>) {
        let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(128, 128));
        let metrics = FrameMetrics::new();
        let log = SceneLog::new();
        let context = PageContext {
            metrics: &metrics,
            stats: SceneStats {
                state: SceneState::Ambient,
                clock_ms: 0,
                elements: 1,
                timelines: 0,
                particles: 0,
            },
            log: &log,
            fps: 50.0,
        };
        let drawn = page.draw(&mut display, &scene_with_diamond(), &context);
        (display, drawn)
    }

    #[test]
    fn test_toggle_flips_between_pages() {
        assert_eq!(Page::default(), Page::Scene);
        assert_eq!(Page::Scene.toggle(), Page::Debug);
        assert_eq!(Page::Debug.toggle().toggle(), Page::Debug);
    }

    #[test]
    fn test_names() {
        assert_eq!(Page::Scene.name(), "scene");
        assert_eq!(Page::Debug.name(), "debug");
    }

    #[test]
    fn test_scene_page_reports_sprites() {
        let (display, drawn) = draw_page(Page::Scene);
        assert_eq!(drawn, Some(1), "one opaque diamond painted");
        let diamond_pixels = display.bounding_box().points().filter(|&p| display.get_pixel(p) == DIAMOND).count();
        assert!(diamond_pixels > 0, "scene page shows the sprite");
    }

    #[test]
    fn test_debug_page_hides_scene() {
        let (display, drawn) = draw_page(Page::Debug);
        assert_eq!(drawn, None, "debug page paints no sprites");
        let diamond_pixels = display.bounding_box().points().filter(|&p| display.get_pixel(p) == DIAMOND).count();
        let lit = display.bounding_box().points().filter(|&p| display.get_pixel(p) != BLACK).count();
        assert_eq!(diamond_pixels, 0, "scene is not drawn under the debug page");
        assert!(lit > 0, "debug page draws its text");
    }
}
