//! Night-side shell pass.
//!
//! A shell sphere slightly larger than the globe, alpha-blended over it
//! and clipped in the fragment shader to the half-space facing away from
//! the sun. The clip plane passes through the globe center, so the edge is
//! always a great circle; diffuse shading alone would smear it.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use terrella_render::{CameraUniform, DepthBuffer};

use crate::mesh::{SphereMesh, SphereVertex};

/// WGSL source for the night shell shader.
pub const NIGHT_SHADER_SOURCE: &str = include_str!("night.wgsl");

/// GPU uniform for the night shell, mirrored as two vec4s in WGSL.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct NightUniform {
    /// Model matrix: uniform scale to the shell radius.
    pub model: [[f32; 4]; 4],
    /// xyz = clip plane normal (the negated sun direction), w = plane
    /// offset; zero offset keeps the plane through the globe center.
    pub plane: [f32; 4],
    /// x = overlay opacity, yzw unused.
    pub params: [f32; 4],
}

/// Renders the translucent night hemisphere.
pub struct NightShellRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    shell_scale: f32,
    opacity: f32,
}

impl NightShellRenderer {
    /// Create the night shell renderer.
    ///
    /// `shell_scale` is the shell radius relative to the globe (slightly
    /// above 1.0); `opacity` is the overlay strength, realistic in the
    /// 0.4–0.5 range.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        mesh: &SphereMesh,
        shell_scale: f32,
        opacity: f32,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("night-shader"),
            source: wgpu::ShaderSource::Wgsl(NIGHT_SHADER_SOURCE.into()),
        });

        let uniform_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("night-uniform-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(
                        std::mem::size_of::<NightUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("night-pipeline-layout"),
            bind_group_layouts: &[camera_bind_group_layout, &uniform_bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("night-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_night"),
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
                // Translucent overlay: test against the globe but do not
                // occlude the marker drawn after it.
                depth_write_enabled: false,
                depth_compare: DepthBuffer::COMPARE_FUNCTION,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_night"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("night-vertices"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("night-indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform = NightUniform {
            model: Mat4::from_scale(Vec3::splat(shell_scale)).to_cols_array_2d(),
            plane: [0.0, -1.0, 0.0, 0.0],
            params: [opacity, 0.0, 0.0, 0.0],
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("night-uniform"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("night-uniform-bg"),
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
            shell_scale,
            opacity,
        }
    }

    /// Upload this frame's clip plane (normal = negated sun direction,
    /// offset = 0).
    pub fn update(&self, queue: &wgpu::Queue, plane_normal: Vec3, plane_offset: f32) {
        let n = plane_normal.normalize();
        let uniform = NightUniform {
            model: Mat4::from_scale(Vec3::splat(self.shell_scale)).to_cols_array_2d(),
            plane: [n.x, n.y, n.z, plane_offset],
            params: [self.opacity, 0.0, 0.0, 0.0],
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Draw the shell. Must run after the opaque globe pass, sharing its
    /// camera bind group.
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
    fn test_night_uniform_size_is_gpu_aligned() {
        let size = std::mem::size_of::<NightUniform>();
        assert_eq!(size % 16, 0, "NightUniform size ({size} bytes) must be 16-byte aligned");
    }

    #[test]
    fn test_clip_half_space_agrees_with_terminator() {
        // The fragment keep-test is dot(n, plane_normal) + offset > 0 with
        // plane_normal = -sun. The antisolar point must be kept, the
        // subsolar point discarded.
        let sun = Vec3::new(0.6, 0.48, -0.64).normalize();
        let plane_normal = -sun;
        let offset = 0.0;

        let antisolar = -sun;
        assert!(antisolar.dot(plane_normal) + offset > 0.0, "antisolar side must be shaded");

        let subsolar = sun;
        assert!(subsolar.dot(plane_normal) + offset <= 0.0, "subsolar side must be clipped away");
    }
}
