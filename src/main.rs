// Crate-level lints: Allow common embedded/graphics patterns that pedantic lints flag
#![allow(clippy::cast_possible_truncation)] // Intentional u32->i32 casts for pixel math
#![allow(clippy::cast_precision_loss)] // u32->f32 in timing statistics
#![allow(clippy::cast_possible_wrap)] // u32->i32 wrapping is acceptable for our value ranges
#![allow(clippy::cast_sign_loss)] // i32->u32 where we know sign is positive
// The debug page is only reachable from the window loop
#![cfg_attr(not(feature = "window"), allow(dead_code))]

//! Desktop simulator for the boot and ambient display.
//!
//! Runs the scene director from `ambient-scene-common` against an in-memory
//! element tree and draws the tree with `embedded-graphics`, the same way the
//! panel firmware would:
//!
//! 1. Power-on: clear the panel to black, let it settle, switch it on
//! 2. Intro: the logo fades in, holds, and fades out (3 s)
//! 3. Ambient: particles twinkle at random places under a dimming overlay,
//!    with the decoration on top
//!
//! The panel preset is chosen at build time (`st7789` feature, ST7735
//! otherwise). Randomness comes from a `SmallRng` seeded from OS entropy, so
//! every run scatters particles differently.
//!
//! # Modes
//!
//! | Build | Behaviour |
//! |-------|-----------|
//! | default | Headless: simulates [`config::HEADLESS_FRAMES`] frames without sleeping and logs statistics |
//! | `--features window` | SDL window paced at [`config::FRAME_TIME`] |
//!
//! # Controls (window mode)
//!
//! | Key | Action |
//! |-----|--------|
//! | `Y` | Switch between Scene and Debug page |
//! | `Esc` | Quit |
//!
//! Key repeat is ignored to prevent toggle spam when holding keys.
//!
//! # Logging
//!
//! Uses `env_logger`; `RUST_LOG` overrides the default `info` level
//! (`RUST_LOG=debug` shows timeline starts and cancellations).

mod colors;
mod config;
mod pages;
mod profiling;
mod render;
mod screens;
mod sprites;
mod styles;

use std::process::ExitCode;
use std::thread;
use std::time::Instant;

use ambient_scene_common::{ACTIVE_PRESET, ElementTree, SceneDirector, SceneError, SceneStats};
use colors::BLACK;
use config::{FRAME_MS, PANEL_ON_DELAY, PANEL_SETTLE_DELAY};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::SimulatorDisplay;
use log::{error, info};
use profiling::FrameMetrics;
use rand::SeedableRng;
use rand::rngs::SmallRng;

type Director = SceneDirector<SmallRng>;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("scene failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), SceneError> {
    let preset = ACTIVE_PRESET;
    info!(
        "simulating {} panel ({}x{}, {} particles)",
        preset.name,
        preset.width,
        preset.height,
        preset.total_particles()
    );

    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(preset.width, preset.height));
    let mut tree: ElementTree = ElementTree::new(preset.width, preset.height);
    let mut director = SceneDirector::new(preset, SmallRng::from_entropy());

    power_on(&mut display);
    director.enter_scene(&mut tree)?;

    run_loop(&mut display, &mut tree, &mut director)
}

/// Panel power-on sequence: black frame, settle, switch on.
fn power_on<D>(display: &mut D)
where
    D: DrawTarget<Color = Rgb565>,
{
    display.clear(BLACK).ok();
    thread::sleep(PANEL_SETTLE_DELAY);
    info!("panel on");
    thread::sleep(PANEL_ON_DELAY);
}

fn report(
    metrics: &FrameMetrics,
    stats: &SceneStats,
    fps: f32,
) {
    info!(
        "{:?} t={}ms | {} elements, {} timelines, {} particles | {:.0} fps, frame {}/{}/{}us, render {}us, sleep {}us, {} sprites",
        stats.state,
        stats.clock_ms,
        stats.elements,
        stats.timelines,
        stats.particles,
        fps,
        metrics.frame_time_min_us(),
        metrics.frame_time_avg_us(),
        metrics.frame_time_max_us,
        metrics.render_time_us,
        metrics.sleep_time_us,
        metrics.sprites_drawn,
    );
}

// =============================================================================
// Headless Loop
// =============================================================================

#[cfg(not(feature = "window"))]
fn run_loop(
    display: &mut SimulatorDisplay<Rgb565>,
    tree: &mut ElementTree,
    director: &mut Director,
) -> Result<(), SceneError> {
    use std::time::Duration;

    use config::{HEADLESS_FRAMES, METRICS_REPORT_INTERVAL};

    let frames_per_report = (METRICS_REPORT_INTERVAL.as_millis() as u32 / FRAME_MS).max(1);
    let mut metrics = FrameMetrics::new();

    for frame in 1..=HEADLESS_FRAMES {
        let frame_start = Instant::now();
        director.tick(FRAME_MS, tree)?;
        metrics.sprites_drawn = render::draw_scene(display, tree) as u32;
        let elapsed = frame_start.elapsed();
        metrics.record_frame(elapsed, elapsed, Duration::ZERO);

        if frame % frames_per_report == 0 {
            // Scene time runs at the nominal frame rate regardless of host speed
            report(&metrics, &director.stats(), 1000.0 / FRAME_MS as f32);
        }
    }

    for line in director.log().iter() {
        info!("scene log: {}", line.trim_start());
    }
    info!("headless run done after {} frames", metrics.total_frames);
    Ok(())
}

// =============================================================================
// Window Loop
// =============================================================================

#[cfg(feature = "window")]
fn run_loop(
    display: &mut SimulatorDisplay<Rgb565>,
    tree: &mut ElementTree,
    director: &mut Director,
) -> Result<(), SceneError> {
    use config::{FRAME_TIME, METRICS_REPORT_INTERVAL, WINDOW_SCALE, WINDOW_TITLE};
    use embedded_graphics_simulator::sdl2::Keycode;
    use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorEvent, Window};
    use pages::{Page, PageContext};

    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new(WINDOW_TITLE, &output_settings);
    window.update(display);

    let mut current_page = Page::default();
    let mut metrics = FrameMetrics::new();

    // FPS counter state
    let mut last_fps_calc = Instant::now();
    let mut fps_frame_count = 0u32;
    let mut current_fps = 0.0f32;

    loop {
        let frame_start = Instant::now();

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => return Ok(()),
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    match keycode {
                        Keycode::Escape => return Ok(()),
                        Keycode::Y => {
                            current_page = current_page.toggle();
                            info!("page: {}", current_page.name());
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        director.tick(FRAME_MS, tree)?;
        let context = PageContext {
            metrics: &metrics,
            stats: director.stats(),
            log: director.log(),
            fps: current_fps,
        };
        if let Some(drawn) = current_page.draw(display, tree, &context) {
            metrics.sprites_drawn = drawn as u32;
        }

        let render_time = frame_start.elapsed();
        window.update(display);

        // FPS over the report interval
        fps_frame_count += 1;
        let since_calc = last_fps_calc.elapsed();
        if since_calc >= METRICS_REPORT_INTERVAL {
            current_fps = fps_frame_count as f32 / since_calc.as_secs_f32();
            fps_frame_count = 0;
            last_fps_calc = Instant::now();
            report(&metrics, &director.stats(), current_fps);
        }

        // Sleep to maintain target frame rate (~50 FPS)
        let pre_sleep = frame_start.elapsed();
        if let Some(remaining) = FRAME_TIME.checked_sub(pre_sleep) {
            thread::sleep(remaining);
        }
        let sleep_time = frame_start.elapsed().saturating_sub(pre_sleep);

        metrics.record_frame(frame_start.elapsed(), render_time, sleep_time);
    }
}
