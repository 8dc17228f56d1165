//! wgpu rendering plumbing: GPU context, camera, depth buffer, surface
//! normalization, and asynchronous texture loading.

pub mod camera;
pub mod depth;
pub mod gpu;
pub mod surface;
pub mod texture;

pub use camera::{Camera, CameraUniform};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use surface::{PhysicalSize, SurfaceResizeEvent, SurfaceWrapper};
pub use texture::{DecodedImage, GlobeTexture, TextureError, load_image_in_background};
