//! Pixel-art sprite definitions.
//!
//! Each sprite is a stack of single-color layers, each layer a list of filled
//! rectangles `(dx, dy, width, height)` on a square or rectangular grid. A grid
//! cell is `pixel` design pixels wide, so the design size of a sprite is
//! `grid * pixel` at the 240px design resolution; the renderer scales it by the
//! element's fixed-point scale.
//!
//! ```text
//! Diamond (16x16)      Ingot (16x16)
//! ....XXXXXXXX....     ................
//! ..XXooo.....XX..     ...XXXXXXXXXX...
//! .Xooo.......##X.     ..Xoooooooo..X..
//! ..XX.o....##XX..     .Xooo......###X.
//! ....XX...#XX....     .X##########..X.
//! ......XXXX......     .XXXXXXXXXXXXXX.
//! ```

use ambient_scene_common::SpriteKind;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::colors::{
    DIAMOND,
    DIAMOND_DARK,
    DIAMOND_LIGHT,
    EMERALD,
    EMERALD_DARK,
    EMERALD_LIGHT,
    GOLD,
    GOLD_DARK,
    GOLD_LIGHT,
    IRON,
    IRON_DARK,
    IRON_LIGHT,
    LOGO_DIRT,
    LOGO_GRASS,
    LOGO_GREEN,
    OUTLINE,
    WOOD,
    WOOD_DARK,
};

/// Filled rectangle `(dx, dy, width, height)` in grid cells.
pub type Cell = (i32, i32, u32, u32);

/// Rectangles sharing one color.
pub struct Layer {
    /// Fill color at full opacity.
    pub color: Rgb565,
    /// Rectangles of this layer.
    pub cells: &'static [Cell],
}

/// Pixel-art image.
pub struct Sprite {
    /// Grid width in cells.
    pub grid_width: u32,
    /// Grid height in cells.
    pub grid_height: u32,
    /// Design pixels per grid cell.
    pub pixel: u32,
    /// Layers, painted in order.
    pub layers: &'static [Layer],
}

impl Sprite {
    /// Size at the design resolution.
    #[inline]
    pub const fn design_size(&self) -> Size { Size::new(self.grid_width * self.pixel, self.grid_height * self.pixel) }

    /// Size at a fixed-point scale (256 = design size).
    pub const fn scaled_size(
        &self,
        scale: u16,
    ) -> Size {
        let design = self.design_size();
        Size::new(
            design.width * scale as u32 / 256,
            design.height * scale as u32 / 256,
        )
    }
}

// =============================================================================
// Particles
// =============================================================================

const DIAMOND_OUTLINE: &[Cell] = &[
    (4, 1, 8, 1),
    (2, 2, 2, 2),
    (12, 2, 2, 2),
    (1, 4, 1, 3),
    (14, 4, 1, 3),
    (2, 7, 2, 2),
    (12, 7, 2, 2),
    (4, 9, 2, 2),
    (10, 9, 2, 2),
    (6, 11, 4, 2),
    (7, 13, 2, 1),
];
const DIAMOND_BODY: &[Cell] = &[(4, 2, 8, 2), (2, 4, 12, 3), (4, 7, 8, 2), (6, 9, 4, 2)];
const DIAMOND_SHINE: &[Cell] = &[(5, 2, 3, 1), (3, 4, 3, 1), (6, 7, 1, 2)];
const DIAMOND_SHADE: &[Cell] = &[(11, 4, 3, 3), (9, 7, 3, 2), (8, 9, 2, 2)];

const EMERALD_OUTLINE: &[Cell] = &[
    (5, 0, 6, 1),
    (3, 1, 2, 2),
    (11, 1, 2, 2),
    (2, 3, 1, 10),
    (13, 3, 1, 10),
    (3, 13, 2, 2),
    (11, 13, 2, 2),
    (5, 15, 6, 1),
];
const EMERALD_BODY: &[Cell] = &[(5, 1, 6, 14), (3, 3, 10, 10)];
const EMERALD_SHINE: &[Cell] = &[(5, 2, 2, 4), (4, 4, 1, 5)];
const EMERALD_SHADE: &[Cell] = &[(10, 8, 2, 5), (8, 12, 3, 2)];

const INGOT_OUTLINE: &[Cell] = &[
    (3, 4, 10, 1),
    (2, 5, 1, 2),
    (13, 5, 1, 2),
    (1, 7, 1, 4),
    (14, 7, 1, 4),
    (1, 11, 14, 1),
];
const INGOT_BODY: &[Cell] = &[(3, 5, 10, 2), (2, 7, 12, 4)];
const INGOT_SHINE: &[Cell] = &[(4, 5, 8, 1), (3, 7, 3, 1)];
const INGOT_SHADE: &[Cell] = &[(2, 10, 12, 1), (11, 7, 3, 3)];

/// Diamond particle.
pub static DIAMOND_SPRITE: Sprite = Sprite {
    grid_width: 16,
    grid_height: 16,
    pixel: 1,
    layers: &[
        Layer {
            color: OUTLINE,
            cells: DIAMOND_OUTLINE,
        },
        Layer {
            color: DIAMOND,
            cells: DIAMOND_BODY,
        },
        Layer {
            color: DIAMOND_LIGHT,
            cells: DIAMOND_SHINE,
        },
        Layer {
            color: DIAMOND_DARK,
            cells: DIAMOND_SHADE,
        },
    ],
};

/// Emerald particle.
pub static EMERALD_SPRITE: Sprite = Sprite {
    grid_width: 16,
    grid_height: 16,
    pixel: 1,
    layers: &[
        Layer {
            color: OUTLINE,
            cells: EMERALD_OUTLINE,
        },
        Layer {
            color: EMERALD,
            cells: EMERALD_BODY,
        },
        Layer {
            color: EMERALD_LIGHT,
            cells: EMERALD_SHINE,
        },
        Layer {
            color: EMERALD_DARK,
            cells: EMERALD_SHADE,
        },
    ],
};

/// Iron ingot particle.
pub static IRON_INGOT_SPRITE: Sprite = Sprite {
    grid_width: 16,
    grid_height: 16,
    pixel: 1,
    layers: &[
        Layer {
            color: OUTLINE,
            cells: INGOT_OUTLINE,
        },
        Layer {
            color: IRON,
            cells: INGOT_BODY,
        },
        Layer {
            color: IRON_LIGHT,
            cells: INGOT_SHINE,
        },
        Layer {
            color: IRON_DARK,
            cells: INGOT_SHADE,
        },
    ],
};

/// Gold ingot particle.
pub static GOLD_INGOT_SPRITE: Sprite = Sprite {
    grid_width: 16,
    grid_height: 16,
    pixel: 1,
    layers: &[
        Layer {
            color: OUTLINE,
            cells: INGOT_OUTLINE,
        },
        Layer {
            color: GOLD,
            cells: INGOT_BODY,
        },
        Layer {
            color: GOLD_LIGHT,
            cells: INGOT_SHINE,
        },
        Layer {
            color: GOLD_DARK,
            cells: INGOT_SHADE,
        },
    ],
};

// =============================================================================
// Decoration and Logo
// =============================================================================

/// Diamond pickaxe decoration, 96x96 at design size.
pub static DIAMOND_PICKAXE_SPRITE: Sprite = Sprite {
    grid_width: 16,
    grid_height: 16,
    pixel: 6,
    layers: &[
        Layer {
            color: WOOD_DARK,
            cells: &[(2, 13, 2, 2), (4, 11, 2, 2), (6, 9, 2, 2), (8, 7, 2, 2)],
        },
        Layer {
            color: WOOD,
            cells: &[(2, 13, 1, 1), (4, 11, 1, 1), (6, 9, 1, 1), (8, 7, 1, 1)],
        },
        Layer {
            color: DIAMOND,
            cells: &[(3, 1, 8, 2), (1, 2, 2, 2), (11, 2, 2, 2), (10, 4, 4, 2), (13, 6, 2, 5)],
        },
        Layer {
            color: DIAMOND_LIGHT,
            cells: &[(4, 1, 5, 1), (13, 6, 1, 3)],
        },
        Layer {
            color: DIAMOND_DARK,
            cells: &[(11, 3, 1, 1), (14, 8, 1, 3), (10, 5, 2, 1)],
        },
    ],
};

/// Boot logo: a grass block beside three title bars, 160x64 at design size.
pub static LOGO_SPRITE: Sprite = Sprite {
    grid_width: 40,
    grid_height: 16,
    pixel: 4,
    layers: &[
        Layer {
            color: LOGO_DIRT,
            cells: &[(0, 2, 14, 12)],
        },
        Layer {
            color: LOGO_GRASS,
            cells: &[(0, 2, 14, 4), (2, 6, 2, 2), (8, 6, 2, 1)],
        },
        Layer {
            color: LOGO_GREEN,
            cells: &[(17, 3, 22, 3), (17, 8, 16, 2), (17, 12, 19, 2)],
        },
    ],
};

/// Artwork for a sprite kind.
pub const fn sprite(kind: SpriteKind) -> &'static Sprite {
    match kind {
        SpriteKind::Logo => &LOGO_SPRITE,
        SpriteKind::DiamondPickaxe => &DIAMOND_PICKAXE_SPRITE,
        SpriteKind::Diamond => &DIAMOND_SPRITE,
        SpriteKind::Emerald => &EMERALD_SPRITE,
        SpriteKind::IronIngot => &IRON_INGOT_SPRITE,
        SpriteKind::GoldIngot => &GOLD_INGOT_SPRITE,
    }
}
