//! Visual elements and the display surface they live on.
//!
//! The animation core never draws anything itself. It talks to the display
//! through the [`Surface`] trait: create an element, set its opacity, position
//! and scale, destroy it. [`ElementTree`] is the retained in-memory
//! implementation used by the simulator renderer and by the tests.
//!
//! # Two-Phase Destruction
//!
//! An element may be destroyed from a completion handler while the animator
//! is still unwinding the tick that fired it. [`Surface::destroy_element_async`]
//! only marks the element; it keeps accepting writes until
//! [`Surface::reap_destroyed`] frees it at the end of the tick and hands the
//! freed handles back so their timelines can be cancelled.

use heapless::Vec;
use log::warn;

use crate::config::{MAX_ELEMENTS, SCALE_UNITY};
use crate::error::SceneError;

/// Sprite artwork an element can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    /// Boot logo shown during the intro.
    Logo,
    /// Looping decoration shown in the ambient scene.
    DiamondPickaxe,
    /// Diamond particle.
    Diamond,
    /// Emerald particle.
    Emerald,
    /// Iron ingot particle.
    IronIngot,
    /// Gold ingot particle.
    GoldIngot,
}

/// What an element draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// An image.
    Sprite(SpriteKind),
    /// A black rectangle covering its extent, used to dim what lies beneath.
    Overlay,
}

/// Reference point an element's offset is measured from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Align {
    /// Offset from the top-left corner of the screen.
    #[default]
    TopLeft,
    /// Offset from the screen centre (element centred on it).
    Center,
}

/// Size of an element's box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Extent {
    /// The sprite's own size times its scale.
    #[default]
    Natural,
    /// A percentage of the screen in both dimensions.
    Percent(u8),
}

/// Generation-checked handle to an element.
///
/// A handle stays unique after its element is freed, so stale handles never
/// alias a newer element that reuses the same slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementId {
    slot: u8,
    generation: u16,
}

impl ElementId {
    /// Slot index inside the element tree.
    #[inline]
    pub const fn slot(self) -> usize { self.slot as usize }
}

/// Attributes of a live element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Element {
    /// What the element draws.
    pub kind: ElementKind,
    /// Anchor of the offset.
    pub align: Align,
    /// Horizontal offset from the anchor.
    pub x: i32,
    /// Vertical offset from the anchor.
    pub y: i32,
    /// Opacity (0 = invisible, 255 = opaque).
    pub opacity: u8,
    /// Fixed-point scale (256 = design size).
    pub scale: u16,
    /// Box size.
    pub extent: Extent,
}

impl Element {
    /// A fresh element: top-left, fully opaque, design scale.
    pub const fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            align: Align::TopLeft,
            x: 0,
            y: 0,
            opacity: u8::MAX,
            scale: SCALE_UNITY,
            extent: Extent::Natural,
        }
    }
}

/// Handles freed by one [`Surface::reap_destroyed`] call.
pub type Reaped = Vec<ElementId, MAX_ELEMENTS>;

/// Display operations the animation core consumes.
pub trait Surface {
    /// Create an element on the active screen, on top of all existing ones.
    fn create_element(
        &mut self,
        kind: ElementKind,
    ) -> Result<ElementId, SceneError>;

    /// Set an element's opacity.
    fn set_opacity(
        &mut self,
        id: ElementId,
        opacity: u8,
    );

    /// Place an element at an offset from an anchor.
    fn set_position(
        &mut self,
        id: ElementId,
        align: Align,
        x: i32,
        y: i32,
    );

    /// Current anchor and offset of an element.
    fn position(
        &self,
        id: ElementId,
    ) -> Option<(Align, i32, i32)>;

    /// Set an element's fixed-point scale (256 = design size).
    fn set_scale(
        &mut self,
        id: ElementId,
        scale: u16,
    );

    /// Set an element's box size.
    fn set_extent(
        &mut self,
        id: ElementId,
        extent: Extent,
    );

    /// Free an element immediately.
    fn destroy_element(
        &mut self,
        id: ElementId,
    );

    /// Mark an element for destruction at the end of the current tick.
    ///
    /// Safe to call from a handler running on behalf of the same element.
    fn destroy_element_async(
        &mut self,
        id: ElementId,
    );

    /// Free every element marked by [`Surface::destroy_element_async`].
    fn reap_destroyed(&mut self) -> Reaped;

    /// Panel resolution `(width, height)` in pixels.
    fn resolution(&self) -> (u32, u32);
}

#[derive(Clone, Copy)]
struct Slot {
    generation: u16,
    element: Option<Element>,
    doomed: bool,
}

impl Slot {
    const EMPTY: Self = Self {
        generation: 0,
        element: None,
        doomed: false,
    };
}

/// Retained element store with creation-order painting.
pub struct ElementTree<const N: usize = MAX_ELEMENTS> {
    slots: [Slot; N],
    /// Slot indices in paint order (first = bottom).
    order: Vec<u8, N>,
    width: u32,
    height: u32,
}

impl<const N: usize> ElementTree<N> {
    const CAPACITY_FITS_SLOT: () = assert!(N <= u8::MAX as usize + 1);

    /// Create an empty tree for a panel of the given resolution.
    pub const fn new(
        width: u32,
        height: u32,
    ) -> Self {
        let () = Self::CAPACITY_FITS_SLOT;
        Self {
            slots: [Slot::EMPTY; N],
            order: Vec::new(),
            width,
            height,
        }
    }

    /// Number of live elements (including ones awaiting reaping).
    #[inline]
    pub fn len(&self) -> usize { self.order.len() }

    /// Whether the tree holds no element.
    #[inline]
    pub fn is_empty(&self) -> bool { self.order.is_empty() }

    /// Look up a live element.
    pub fn get(
        &self,
        id: ElementId,
    ) -> Option<&Element> {
        let slot = self.slots.get(id.slot())?;
        if slot.generation == id.generation {
            slot.element.as_ref()
        } else {
            None
        }
    }

    /// Whether the handle refers to a live element.
    #[inline]
    pub fn contains(
        &self,
        id: ElementId,
    ) -> bool {
        self.get(id).is_some()
    }

    /// Whether the element is marked for destruction but not yet reaped.
    pub fn is_doomed(
        &self,
        id: ElementId,
    ) -> bool {
        self.slots
            .get(id.slot())
            .is_some_and(|slot| slot.generation == id.generation && slot.element.is_some() && slot.doomed)
    }

    /// Iterate over live elements from bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.order.iter().filter_map(|&slot| {
            let entry = &self.slots[slot as usize];
            entry.element.as_ref().map(|element| {
                (
                    ElementId {
                        slot,
                        generation: entry.generation,
                    },
                    element,
                )
            })
        })
    }

    /// Count live elements showing the given sprite.
    pub fn count_sprites(
        &self,
        sprite: SpriteKind,
    ) -> usize {
        self.iter()
            .filter(|(_, element)| element.kind == ElementKind::Sprite(sprite))
            .count()
    }

    fn get_mut(
        &mut self,
        id: ElementId,
    ) -> Option<&mut Element> {
        let slot = self.slots.get_mut(id.slot())?;
        if slot.generation == id.generation {
            slot.element.as_mut()
        } else {
            None
        }
    }

    fn with_element(
        &mut self,
        id: ElementId,
        op: &str,
        apply: impl FnOnce(&mut Element),
    ) {
        match self.get_mut(id) {
            Some(element) => apply(element),
            None => warn!("{} on stale element {:?}", op, id),
        }
    }

    fn free(
        &mut self,
        id: ElementId,
    ) -> bool {
        let Some(slot) = self.slots.get_mut(id.slot()) else {
            return false;
        };
        if slot.generation != id.generation || slot.element.is_none() {
            return false;
        }
        slot.element = None;
        slot.doomed = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.order.retain(|&index| index as usize != id.slot());
        true
    }
}

impl<const N: usize> Surface for ElementTree<N> {
    fn create_element(
        &mut self,
        kind: ElementKind,
    ) -> Result<ElementId, SceneError> {
        let slot = self
            .slots
            .iter()
            .position(|slot| slot.element.is_none())
            .ok_or(SceneError::TooManyElements)?;

        self.order.push(slot as u8).map_err(|_| SceneError::TooManyElements)?;
        let entry = &mut self.slots[slot];
        entry.element = Some(Element::new(kind));
        entry.doomed = false;

        Ok(ElementId {
            slot: slot as u8,
            generation: entry.generation,
        })
    }

    fn set_opacity(
        &mut self,
        id: ElementId,
        opacity: u8,
    ) {
        self.with_element(id, "set_opacity", |element| element.opacity = opacity);
    }

    fn set_position(
        &mut self,
        id: ElementId,
        align: Align,
        x: i32,
        y: i32,
    ) {
        self.with_element(id, "set_position", |element| {
            element.align = align;
            element.x = x;
            element.y = y;
        });
    }

    fn position(
        &self,
        id: ElementId,
    ) -> Option<(Align, i32, i32)> {
        self.get(id).map(|element| (element.align, element.x, element.y))
    }

    fn set_scale(
        &mut self,
        id: ElementId,
        scale: u16,
    ) {
        self.with_element(id, "set_scale", |element| element.scale = scale);
    }

    fn set_extent(
        &mut self,
        id: ElementId,
        extent: Extent,
    ) {
        self.with_element(id, "set_extent", |element| element.extent = extent);
    }

    fn destroy_element(
        &mut self,
        id: ElementId,
    ) {
        if !self.free(id) {
            warn!("destroy on stale element {:?}", id);
        }
    }

    fn destroy_element_async(
        &mut self,
        id: ElementId,
    ) {
        match self.slots.get_mut(id.slot()) {
            Some(slot) if slot.generation == id.generation && slot.element.is_some() => slot.doomed = true,
            _ => warn!("async destroy on stale element {:?}", id),
        }
    }

    fn reap_destroyed(&mut self) -> Reaped {
        let mut reaped = Reaped::new();
        for slot in 0..N {
            let entry = self.slots[slot];
            if entry.doomed && entry.element.is_some() {
                // `Reaped` holds MAX_ELEMENTS handles; larger trees reap the rest next tick
                if reaped.is_full() {
                    break;
                }
                let id = ElementId {
                    slot: slot as u8,
                    generation: entry.generation,
                };
                if self.free(id) {
                    reaped.push(id).ok();
                }
            }
        }
        reaped
    }

    #[inline]
    fn resolution(&self) -> (u32, u32) { (self.width, self.height) }
}
