//! Viewer location marker: a small unlit dot pinned to the globe surface.
//!
//! The marker position is set once at startup (fallback coordinates) and
//! at most once more, if the geolocation query resolves; it never animates.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use terrella_render::{CameraUniform, DepthBuffer};

use crate::mesh::{SphereMesh, SphereVertex, generate_sphere};

/// WGSL source for the marker shader.
pub const MARKER_SHADER_SOURCE: &str = include_str!("marker.wgsl");

/// Marker radius in globe-radius units.
pub const MARKER_SCALE: f32 = 0.02;

/// Subdivision level for the marker dot; it is tiny on screen.
const MARKER_SUBDIVISIONS: u32 = 2;

/// Warm amber, readable on both hemispheres.
const MARKER_COLOR: [f32; 4] = [1.0, 0.72, 0.2, 1.0];

/// GPU uniform for the marker.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MarkerUniform {
    /// Model matrix: translation to the surface point × marker scale.
    pub model: [[f32; 4]; 4],
    /// Marker color.
    pub color: [f32; 4],
}

/// Renders the viewer marker.
pub struct MarkerRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
}

impl MarkerRenderer {
    /// Create the marker renderer, initially at `surface_position`.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        surface_position: Vec3,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let mesh: SphereMesh = generate_sphere(MARKER_SUBDIVISIONS);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("marker-shader"),
            source: wgpu::ShaderSource::Wgsl(MARKER_SHADER_SOURCE.into()),
        });

        let uniform_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("marker-uniform-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(
                        std::mem::size_of::<MarkerUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("marker-pipeline-layout"),
            bind_group_layouts: &[camera_bind_group_layout, &uniform_bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("marker-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_marker"),
                buffers: &[SphereVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthBuffer::FORMAT,
                depth_write_enabled: true,
                depth_compare: DepthBuffer::COMPARE_FUNCTION, // reverse-Z
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_marker"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None, // opaque
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("marker-vertices"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("marker-indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform = Self::uniform_for(surface_position);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("marker-uniform"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("marker-uniform-bg"),
            layout: &uniform_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            uniform_buffer,
            uniform_bind_group,
        }
    }

    fn uniform_for(surface_position: Vec3) -> MarkerUniform {
        let model = Mat4::from_translation(surface_position)
            * Mat4::from_scale(Vec3::splat(MARKER_SCALE));
        MarkerUniform {
            model: model.to_cols_array_2d(),
            color: MARKER_COLOR,
        }
    }

    /// Move the marker to a resolved geolocation. Called at most once,
    /// when the background query succeeds.
    pub fn set_position(&self, queue: &wgpu::Queue, surface_position: Vec3) {
        let uniform = Self::uniform_for(surface_position);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Draw the marker, sharing the globe pass camera bind group.
    pub fn render<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
    ) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera_bind_group, &[]);
        pass.set_bind_group(1, &self.uniform_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_uniform_size_is_gpu_aligned() {
        let size = std::mem::size_of::<MarkerUniform>();
        assert_eq!(size % 16, 0, "MarkerUniform size ({size} bytes) must be 16-byte aligned");
    }

    #[test]
    fn test_marker_model_places_center_on_surface() {
        let surface = Vec3::new(0.0, 0.70710678, 0.70710678);
        let uniform = MarkerRenderer::uniform_for(surface);
        let model = Mat4::from_cols_array_2d(&uniform.model);
        let center = model.transform_point3(Vec3::ZERO);
        assert!(
            (center - surface).length() < 1e-6,
            "marker center must sit exactly at the surface point"
        );
    }

    #[test]
    fn test_marker_is_small_relative_to_globe() {
        assert!(MARKER_SCALE < 0.1, "marker must stay a dot, not a blob");
    }
}
