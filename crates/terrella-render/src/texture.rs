//! Globe texture handling.
//!
//! The equirectangular Earth image is decoded on a background thread and
//! delivered over a one-shot channel, so the first frames render before
//! the asset is ready. Until it arrives (or forever, if decoding fails)
//! the globe samples a 1×1 placeholder in a neutral ocean tone; a load
//! failure is logged and the viewer keeps running.

use crossbeam_channel::{Receiver, bounded};
use std::path::{Path, PathBuf};

/// Error type for texture loading failures.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// The file could not be read.
    #[error("failed to read texture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but could not be decoded as an image.
    #[error("failed to decode texture {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// A decoded RGBA8 image ready for GPU upload.
pub struct DecodedImage {
    /// Tightly packed RGBA8 pixels, row-major.
    pub pixels: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Decode an image file into RGBA8.
pub fn decode_image(path: &Path) -> Result<DecodedImage, TextureError> {
    let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image::load_from_memory(&bytes).map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = image.into_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        pixels: rgba.into_raw(),
        width,
        height,
    })
}

/// Decode an image on a background thread, delivering the single result
/// over a one-shot channel polled by the frame loop.
pub fn load_image_in_background(path: PathBuf) -> Receiver<Result<DecodedImage, TextureError>> {
    let (tx, rx) = bounded(1);
    std::thread::Builder::new()
        .name("texture-decode".to_string())
        .spawn(move || {
            let result = decode_image(&path);
            match &result {
                Ok(image) => {
                    log::info!(
                        "Decoded texture {} ({}x{})",
                        path.display(),
                        image.width,
                        image.height
                    );
                }
                Err(e) => log::error!("Texture load failed: {e}"),
            }
            // The receiver may already be gone on shutdown.
            let _ = tx.send(result);
        })
        .expect("failed to spawn texture decode thread");
    rx
}

/// GPU texture + sampler + view for the globe surface.
pub struct GlobeTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl GlobeTexture {
    /// Neutral ocean tone shown until the real texture arrives.
    pub const PLACEHOLDER_PIXEL: [u8; 4] = [24, 49, 83, 255];

    /// Create a 1×1 placeholder texture.
    pub fn placeholder(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::from_pixels(device, queue, &Self::PLACEHOLDER_PIXEL, 1, 1)
    }

    /// Create a texture from a decoded image.
    pub fn from_image(device: &wgpu::Device, queue: &wgpu::Queue, image: &DecodedImage) -> Self {
        Self::from_pixels(device, queue, &image.pixels, image.width, image.height)
    }

    fn from_pixels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("globe-texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            pixels,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("globe-sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_missing_file_reports_io_error() {
        let rx = load_image_in_background(PathBuf::from("/nonexistent/earth.png"));
        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(result, Err(TextureError::Io { .. })));
    }

    #[test]
    fn test_garbage_bytes_report_decode_error() {
        let dir = std::env::temp_dir().join("terrella-texture-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("not_an_image.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let result = decode_image(&path);
        assert!(matches!(result, Err(TextureError::Decode { .. })));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_failure_is_not_fatal() {
        // The receiver yields exactly one error and the channel closes;
        // the caller keeps the placeholder texture and carries on.
        let rx = load_image_in_background(PathBuf::from("/nonexistent/earth.png"));
        let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(first.is_err());
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn test_placeholder_pixel_is_opaque() {
        assert_eq!(GlobeTexture::PLACEHOLDER_PIXEL[3], 255);
    }
}
