//! Screen modules besides the scene itself.
//!
//! - **Debug Page** ([`debug`]): Scene statistics, frame timing and the scene log
//!   (toggled with `Y` in the simulator window)
//!
//! The scene page is drawn by [`crate::render`].

mod debug;

pub use debug::draw_debug_page;
