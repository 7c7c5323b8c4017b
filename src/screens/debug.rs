//! Debug page rendering.
//!
//! Displays scene statistics, frame timing and the scene log. Accessible by
//! pressing `Y` to toggle from the scene page. The layout is a single column
//! so it fits the 128px panel; on taller panels more log lines are shown.
//!
//! # Layout
//!
//! ```text
//! ┌────────────────────────┐
//! │ SCENE            50FPS │
//! ├────────────────────────┤
//! │ State  Ambient         │
//! │ Clock  12.3s           │
//! │ Elems  18              │
//! │ Tlines 17              │
//! │ Parts  16              │
//! │ Frame  20.1/25.0ms     │
//! │ Avg    20.1ms          │
//! │ Up     00:01:02        │
//! ├────────────────────────┤
//! │ >3.008 ambient, partic │
//! └────────────────────────┘
//! ```

use core::fmt::Write;

use ambient_scene_common::{SceneLog, SceneState, SceneStats};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;
use heapless::String;

use crate::colors::{BLACK, GRAY, GREEN, ORANGE, YELLOW};
use crate::profiling::FrameMetrics;
use crate::styles::{LABEL_FONT, LABEL_STYLE_WHITE, RIGHT_ALIGNED, TITLE_STYLE_GREEN};

// =============================================================================
// Layout Constants
// =============================================================================

/// Header Y position (text baseline)
const HEADER_Y: i32 = 11;

/// Y position of divider below header
const HEADER_DIVIDER_Y: i32 = 15;

/// Y position where stats rows start (baseline)
const STATS_Y: i32 = 25;

/// Line height for stats
const STAT_LINE_HEIGHT: i32 = 10;

/// Number of stats rows
const STAT_ROWS: i32 = 8;

/// Y position of divider above log
const LOG_DIVIDER_Y: i32 = STATS_Y + STAT_ROWS * STAT_LINE_HEIGHT - 6;

/// Y position of the first log line (baseline)
const LOG_Y: i32 = LOG_DIVIDER_Y + 11;

/// Height of each log line
const LOG_LINE_HEIGHT: i32 = 10;

/// Left margin
const MARGIN_X: i32 = 2;

/// X position of stat values
const VALUE_X: i32 = MARGIN_X + 7 * 6;

// =============================================================================
// Colors
// =============================================================================

/// Section label color (dimmer)
const LABEL_COLOR: Rgb565 = GRAY;

/// Highlight color for frame timing
const HIGHLIGHT_COLOR: Rgb565 = YELLOW;

/// Log prompt color
const LOG_PROMPT_COLOR: Rgb565 = GREEN;

/// Log text color
const LOG_TEXT_COLOR: Rgb565 = ORANGE;

/// Log terminal background (very dark green tint)
const LOG_BG: Rgb565 = Rgb565::new(1, 2, 1);

/// Divider line color
const DIVIDER_COLOR: Rgb565 = GRAY;

// =============================================================================
// Debug Page Drawing
// =============================================================================

/// Draw the debug page.
///
/// Clears the display and renders the header with FPS, the scene statistics
/// and frame timing rows, and the newest scene log lines that fit.
pub fn draw_debug_page<D>(
    display: &mut D,
    metrics: &FrameMetrics,
    stats: &SceneStats,
    log: &SceneLog,
    fps: f32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    display.clear(BLACK).ok();
    let screen = display.bounding_box().size;

    draw_header(display, screen, fps);
    draw_horizontal_line(display, screen, HEADER_DIVIDER_Y);
    draw_stats(display, metrics, stats);
    draw_horizontal_line(display, screen, LOG_DIVIDER_Y);
    draw_log_terminal(display, screen, log);
}

fn draw_header<D>(
    display: &mut D,
    screen: Size,
    fps: f32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Text::new("SCENE", Point::new(MARGIN_X, HEADER_Y), TITLE_STYLE_GREEN)
        .draw(display)
        .ok();

    let mut fps_str: String<12> = String::new();
    let _ = write!(fps_str, "{fps:.0}FPS");
    Text::with_text_style(
        &fps_str,
        Point::new(screen.width as i32 - MARGIN_X, HEADER_Y),
        LABEL_STYLE_WHITE,
        RIGHT_ALIGNED,
    )
    .draw(display)
    .ok();
}

const fn state_name(state: SceneState) -> &'static str {
    match state {
        SceneState::Uninitialized => "Off",
        SceneState::Intro => "Intro",
        SceneState::Ambient => "Ambient",
    }
}

/// Draw one `label value` row.
fn draw_row<D>(
    display: &mut D,
    y: i32,
    label: &str,
    value: &str,
    value_style: MonoTextStyle<'_, Rgb565>,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let label_style = MonoTextStyle::new(LABEL_FONT, LABEL_COLOR);
    Text::new(label, Point::new(MARGIN_X, y), label_style).draw(display).ok();
    Text::new(value, Point::new(VALUE_X, y), value_style).draw(display).ok();
}

fn draw_stats<D>(
    display: &mut D,
    metrics: &FrameMetrics,
    stats: &SceneStats,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let highlight_style = MonoTextStyle::new(LABEL_FONT, HIGHLIGHT_COLOR);
    let mut y = STATS_Y;

    draw_row(display, y, "State", state_name(stats.state), LABEL_STYLE_WHITE);
    y += STAT_LINE_HEIGHT;

    let mut s: String<16> = String::new();
    let _ = write!(s, "{:.1}s", stats.clock_ms as f32 / 1000.0);
    draw_row(display, y, "Clock", &s, LABEL_STYLE_WHITE);
    y += STAT_LINE_HEIGHT;

    let mut s: String<16> = String::new();
    let _ = write!(s, "{}", stats.elements);
    draw_row(display, y, "Elems", &s, LABEL_STYLE_WHITE);
    y += STAT_LINE_HEIGHT;

    let mut s: String<16> = String::new();
    let _ = write!(s, "{}", stats.timelines);
    draw_row(display, y, "Tlines", &s, LABEL_STYLE_WHITE);
    y += STAT_LINE_HEIGHT;

    let mut s: String<16> = String::new();
    let _ = write!(s, "{}", stats.particles);
    draw_row(display, y, "Parts", &s, LABEL_STYLE_WHITE);
    y += STAT_LINE_HEIGHT;

    // Current / max
    let mut s: String<16> = String::new();
    let _ = write!(
        s,
        "{:.1}/{:.1}ms",
        metrics.frame_time_us as f32 / 1000.0,
        metrics.frame_time_max_us as f32 / 1000.0
    );
    draw_row(display, y, "Frame", &s, highlight_style);
    y += STAT_LINE_HEIGHT;

    let mut s: String<16> = String::new();
    let _ = write!(s, "{:.1}ms", metrics.frame_time_avg_us() as f32 / 1000.0);
    draw_row(display, y, "Avg", &s, highlight_style);
    y += STAT_LINE_HEIGHT;

    draw_row(display, y, "Up", &metrics.uptime_string(), LABEL_STYLE_WHITE);
}

/// Draw the newest log lines that fit below the stats.
fn draw_log_terminal<D>(
    display: &mut D,
    screen: Size,
    log: &SceneLog,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let prompt_style = MonoTextStyle::new(LABEL_FONT, LOG_PROMPT_COLOR);
    let text_style = MonoTextStyle::new(LABEL_FONT, LOG_TEXT_COLOR);

    let top = LOG_DIVIDER_Y + 2;
    let height = (screen.height as i32 - top).max(0);
    Rectangle::new(Point::new(0, top), Size::new(screen.width, height as u32))
        .into_styled(PrimitiveStyle::with_fill(LOG_BG))
        .draw(display)
        .ok();

    let fits = ((screen.height as i32 - LOG_Y) / LOG_LINE_HEIGHT + 1).max(0) as usize;
    let mut y = LOG_Y;
    for line in log.iter().skip(log.len().saturating_sub(fits)) {
        Text::new(">", Point::new(MARGIN_X, y), prompt_style).draw(display).ok();
        Text::new(line.trim_start(), Point::new(MARGIN_X + 6, y), text_style)
            .draw(display)
            .ok();
        y += LOG_LINE_HEIGHT;
    }
}

/// Draw a horizontal divider line.
fn draw_horizontal_line<D>(
    display: &mut D,
    screen: Size,
    y: i32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Line::new(Point::new(2, y), Point::new(screen.width as i32 - 2, y))
        .into_styled(PrimitiveStyle::with_stroke(DIVIDER_COLOR, 1))
        .draw(display)
        .ok();
}

// =============================================================================
// Unit Tests
// =============================================================================
