//! GPU pipeline for the textured, sun-shaded globe.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use terrella_render::{CameraUniform, DepthBuffer, GlobeTexture};

use crate::mesh::{SphereMesh, SphereVertex};

/// WGSL source for the globe shader.
pub const GLOBE_SHADER_SOURCE: &str = include_str!("globe.wgsl");

/// Ambient floor so the night hemisphere stays faintly visible under the
/// overlay instead of going fully black.
const AMBIENT: f32 = 0.15;

/// GPU uniform for globe rendering.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GlobeUniform {
    /// Model matrix (identity for the unit globe).
    pub model: [[f32; 4]; 4],
    /// Normalized sun direction in globe-local space.
    pub sun_direction: [f32; 3],
    /// Ambient shading floor.
    pub ambient: f32,
}

/// Renders the globe sphere with the equirectangular texture and diffuse
/// shading from the sun direction.
pub struct GlobeRenderer {
    pipeline: wgpu::RenderPipeline,
    camera_bind_group_layout: wgpu::BindGroupLayout,
    globe_bind_group_layout: wgpu::BindGroupLayout,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    globe_uniform_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    globe_bind_group: wgpu::BindGroup,
}

impl GlobeRenderer {
    /// Create the globe renderer with an initial (typically placeholder)
    /// texture.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        mesh: &SphereMesh,
        texture: &GlobeTexture,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("globe-shader"),
            source: wgpu::ShaderSource::Wgsl(GLOBE_SHADER_SOURCE.into()),
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("globe-camera-bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(
                            std::mem::size_of::<CameraUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let globe_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("globe-bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: std::num::NonZeroU64::new(
                                std::mem::size_of::<GlobeUniform>() as u64,
                            ),
                        },
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("globe-pipeline-layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &globe_bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("globe-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_globe"),
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
                entry_point: Some("fs_globe"),
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
            label: Some("globe-vertices"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globe-indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let globe_uniform = GlobeUniform {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            sun_direction: [0.0, 1.0, 0.0],
            ambient: AMBIENT,
        };
        let globe_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globe-uniform"),
            contents: bytemuck::bytes_of(&globe_uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globe-camera-uniform"),
            contents: &[0u8; std::mem::size_of::<CameraUniform>()],
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globe-camera-bg"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let globe_bind_group = Self::build_globe_bind_group(
            device,
            &globe_bind_group_layout,
            texture,
            &globe_uniform_buffer,
        );

        log::info!(
            "Globe renderer initialized ({} triangles)",
            mesh.triangle_count()
        );

        Self {
            pipeline,
            camera_bind_group_layout,
            globe_bind_group_layout,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            globe_uniform_buffer,
            camera_buffer,
            camera_bind_group,
            globe_bind_group,
        }
    }

    fn build_globe_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        texture: &GlobeTexture,
        uniform_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globe-bg"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
        })
    }

    /// Swap in a newly arrived texture (the async load finishing after
    /// first render).
    pub fn set_texture(&mut self, device: &wgpu::Device, texture: &GlobeTexture) {
        self.globe_bind_group = Self::build_globe_bind_group(
            device,
            &self.globe_bind_group_layout,
            texture,
            &self.globe_uniform_buffer,
        );
    }

    /// The camera bind group layout, shared by the other sphere passes.
    pub fn camera_bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.camera_bind_group_layout
    }

    /// The camera bind group, shared by the night shell and marker passes.
    pub fn camera_bind_group(&self) -> &wgpu::BindGroup {
        &self.camera_bind_group
    }

    /// Upload this frame's camera and sun direction.
    pub fn update(&self, queue: &wgpu::Queue, camera: &CameraUniform, sun_direction: Vec3) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(camera));

        let globe_uniform = GlobeUniform {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            sun_direction: sun_direction.normalize().to_array(),
            ambient: AMBIENT,
        };
        queue.write_buffer(
            &self.globe_uniform_buffer,
            0,
            bytemuck::bytes_of(&globe_uniform),
        );
    }

    /// Draw the globe.
    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        pass.set_bind_group(1, &self.globe_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_globe_uniform_size_is_gpu_aligned() {
        let size = std::mem::size_of::<GlobeUniform>();
        assert_eq!(size % 16, 0, "GlobeUniform size ({size} bytes) must be 16-byte aligned");
    }

    #[test]
    fn test_ambient_floor_keeps_night_side_visible() {
        assert!(AMBIENT > 0.0, "a zero ambient floor blacks out the night hemisphere");
        assert!(AMBIENT < 0.5, "ambient should stay well below full daylight");
    }
}
