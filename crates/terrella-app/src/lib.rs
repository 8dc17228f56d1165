//! Terrella application framework: window creation, event handling, and
//! the per-frame driver that keeps the terminator current.

pub mod driver;
pub mod overlay;
pub mod platform;
pub mod window;
