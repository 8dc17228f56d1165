//! Globe scene: sphere mesh generation and the GPU pipelines for the
//! textured globe, the night-side terminator shell, and the viewer marker.

pub mod globe;
pub mod marker;
pub mod mesh;
pub mod night;

pub use globe::{GlobeRenderer, GlobeUniform};
pub use marker::{MARKER_SCALE, MarkerRenderer, MarkerUniform};
pub use mesh::{SphereMesh, SphereVertex, generate_sphere};
pub use night::{NightShellRenderer, NightUniform};
