//! Pre-computed static text styles for the debug page.
//!
//! Styles are `const`, so they are built at compile time and never constructed
//! per frame. Text whose color varies uses [`LABEL_FONT`] with
//! `MonoTextStyle::new(LABEL_FONT, color)`.

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle, ascii::FONT_6X10},
    pixelcolor::Rgb565,
    text::{Alignment, TextStyle, TextStyleBuilder},
};
use profont::PROFONT_12_POINT;

use crate::colors::{GREEN, WHITE};

/// Right-aligned text. Used for the FPS counter in the header.
pub const RIGHT_ALIGNED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Right).build();

/// Small label font (6x10 pixels). Exposed for creating dynamic-color styles.
pub const LABEL_FONT: &MonoFont = &FONT_6X10;

/// Small white text for statistic values.
pub const LABEL_STYLE_WHITE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_6X10, WHITE);

/// Green page title (`ProFont` 12pt).
pub const TITLE_STYLE_GREEN: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_12_POINT, GREEN);
