//! Element tree rendering.
//!
//! Redraws the whole scene every frame: clear to black, then paint each live
//! sprite bottom to top.
//!
//! # Opacity and Overlays
//!
//! Rgb565 has no alpha channel. Because the background is black, an element at
//! opacity `a` is painted with every color faded toward black by `a`. An
//! overlay is a black rectangle, so instead of drawing it the renderer applies
//! it to everything beneath: each sprite is further faded by
//! `1 - overlay_opacity` for every overlay above it whose box intersects its
//! own. Fully transparent results are skipped.
//!
//! # Geometry
//!
//! | Extent | Box size |
//! |--------|----------|
//! | `Natural` sprite | design size × scale |
//! | `Natural` overlay | full screen |
//! | `Percent(p)` | p% of the screen |
//!
//! `TopLeft` places the box at `(x, y)`; `Center` centres it on
//! `(width / 2 + x, height / 2 + y)`. The sprite is drawn at design size ×
//! scale, centred in its box.

use ambient_scene_common::{Align, Element, ElementKind, ElementTree, Extent, MAX_ELEMENTS, Surface};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use heapless::Vec;

use crate::colors::{BLACK, WEIGHT_ONE, fade, mul_weight, opacity_weight};
use crate::sprites::{Sprite, sprite};

/// Screen box of an element.
pub fn element_box(
    element: &Element,
    screen: Size,
) -> Rectangle {
    let size = match (element.extent, element.kind) {
        (Extent::Percent(percent), _) => Size::new(
            screen.width * u32::from(percent) / 100,
            screen.height * u32::from(percent) / 100,
        ),
        (Extent::Natural, ElementKind::Sprite(kind)) => sprite(kind).scaled_size(element.scale),
        (Extent::Natural, ElementKind::Overlay) => screen,
    };

    let top_left = match element.align {
        Align::TopLeft => Point::new(element.x, element.y),
        Align::Center => Point::new(
            (screen.width / 2) as i32 + element.x - (size.width / 2) as i32,
            (screen.height / 2) as i32 + element.y - (size.height / 2) as i32,
        ),
    };

    Rectangle::new(top_left, size)
}

#[inline]
fn overlaps(
    a: &Rectangle,
    b: &Rectangle,
) -> bool {
    let common = a.intersection(b);
    common.size.width > 0 && common.size.height > 0
}

/// Draw the element tree.
///
/// Returns the number of sprites painted (invisible ones are skipped).
pub fn draw_scene<D>(
    display: &mut D,
    tree: &ElementTree,
) -> usize
where
    D: DrawTarget<Color = Rgb565>,
{
    display.clear(BLACK).ok();

    let (width, height) = tree.resolution();
    let screen = Size::new(width, height);

    // Snapshot in paint order so overlays above each sprite can be looked up
    let mut painted: Vec<Element, MAX_ELEMENTS> = Vec::new();
    for (_, element) in tree.iter() {
        painted.push(*element).ok();
    }

    let mut drawn = 0;
    for (index, element) in painted.iter().enumerate() {
        let ElementKind::Sprite(kind) = element.kind else {
            continue;
        };

        let bounds = element_box(element, screen);
        let weight = painted[index + 1..]
            .iter()
            .filter(|above| above.kind == ElementKind::Overlay)
            .filter(|above| overlaps(&bounds, &element_box(above, screen)))
            .fold(opacity_weight(element.opacity), |weight, overlay| {
                mul_weight(weight, WEIGHT_ONE - opacity_weight(overlay.opacity))
            });

        if weight == 0 {
            continue;
        }

        draw_sprite(display, sprite(kind), element.scale, bounds.center(), weight);
        drawn += 1;
    }

    drawn
}

/// Draw a sprite centred on `center`, faded by a fixed-point weight.
fn draw_sprite<D>(
    display: &mut D,
    sprite: &Sprite,
    scale: u16,
    center: Point,
    weight: u16,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let size = sprite.scaled_size(scale);
    let origin = center - Point::new((size.width / 2) as i32, (size.height / 2) as i32);

    // Cell edges in 1/256 px; edges rather than sizes are rounded so cells never gap
    let unit = sprite.pixel * u32::from(scale);
    let edge = |cells: u32| -> u32 { (cells * unit) >> 8 };

    for layer in sprite.layers {
        let style = PrimitiveStyle::with_fill(fade(layer.color, weight));
        for &(dx, dy, w, h) in layer.cells {
            let (x0, y0) = (edge(dx as u32), edge(dy as u32));
            let (x1, y1) = (edge(dx as u32 + w), edge(dy as u32 + h));
            if x1 == x0 || y1 == y0 {
                continue;
            }
            Rectangle::new(
                origin + Point::new(x0 as i32, y0 as i32),
                Size::new(x1 - x0, y1 - y0),
            )
            .into_styled(style)
            .draw(display)
            .ok();
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
