//! Input handling: frame-coherent mouse tracking and the damped orbit
//! camera controller.

pub mod mouse;
pub mod orbit;

pub use mouse::MouseState;
pub use orbit::{OrbitBounds, OrbitController};
