//! Unit-sphere mesh generation with equirectangular UVs.
//!
//! The UV mapping must agree with the solar model's direction convention:
//! `u = 0.5 + atan2(z, x) / 2π`, `v = 0.5 − asin(y) / π`, which puts the
//! texture seam on the -X meridian (longitude ±180°). A mismatch here
//! rotates the terminator out of register with the continents.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::collections::HashMap;

/// Vertex layout shared by every sphere pipeline: position (vec3),
/// normal (vec3), uv (vec2). On a unit sphere the normal equals the
/// position.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SphereVertex {
    /// Position on the unit sphere.
    pub position: [f32; 3],
    /// Outward normal.
    pub normal: [f32; 3],
    /// Equirectangular UV.
    pub uv: [f32; 2],
}

impl SphereVertex {
    /// Vertex buffer layout for the sphere pipelines.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SphereVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 24,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// An indexed triangle mesh on the unit sphere.
pub struct SphereMesh {
    /// Vertex data.
    pub vertices: Vec<SphereVertex>,
    /// Triangle indices.
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Generate a subdivided icosphere. Subdivision 4 yields ~5k triangles
/// and 5 yields ~20k, plenty for a full-window globe.
pub fn generate_sphere(subdivisions: u32) -> SphereMesh {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;

    let mut positions: Vec<Vec3> = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
    .iter()
    .map(|p| p.normalize())
    .collect();

    let mut indices: Vec<u32> = vec![
        0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, 1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6, 7,
        1, 8, 3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, 4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9,
        8, 1,
    ];

    for _ in 0..subdivisions {
        split_triangles(&mut positions, &mut indices);
    }

    let vertices = positions
        .iter()
        .map(|pos| SphereVertex {
            position: pos.to_array(),
            normal: pos.to_array(),
            uv: equirect_uv(*pos),
        })
        .collect();

    SphereMesh { vertices, indices }
}

/// Equirectangular UV for a point on the unit sphere.
fn equirect_uv(pos: Vec3) -> [f32; 2] {
    let u = 0.5 + pos.z.atan2(pos.x) / std::f32::consts::TAU;
    let v = 0.5 - pos.y.asin() / std::f32::consts::PI;
    [u, v]
}

/// Split every triangle into four, reprojecting edge midpoints onto the
/// sphere. Midpoints are cached per edge so shared edges stay welded.
fn split_triangles(positions: &mut Vec<Vec3>, indices: &mut Vec<u32>) {
    let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
    let mut next = Vec::with_capacity(indices.len() * 4);

    let mut midpoint = |a: u32, b: u32, positions: &mut Vec<Vec3>| -> u32 {
        let key = if a < b { (a, b) } else { (b, a) };
        *midpoints.entry(key).or_insert_with(|| {
            let mid = (positions[a as usize] + positions[b as usize]).normalize();
            positions.push(mid);
            (positions.len() - 1) as u32
        })
    };

    for tri in indices.chunks(3) {
        let (a, b, c) = (tri[0], tri[1], tri[2]);
        let ab = midpoint(a, b, positions);
        let bc = midpoint(b, c, positions);
        let ca = midpoint(c, a, positions);

        next.extend_from_slice(&[a, ab, ca, b, bc, ab, c, ca, bc, ab, bc, ca]);
    }

    *indices = next;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertices_on_unit_sphere() {
        let mesh = generate_sphere(4);
        for v in &mesh.vertices {
            let len = Vec3::from_array(v.position).length();
            assert!(
                (len - 1.0).abs() < 1e-5,
                "vertex not on unit sphere: length = {len}"
            );
        }
    }

    #[test]
    fn test_normals_equal_positions() {
        let mesh = generate_sphere(2);
        for v in &mesh.vertices {
            assert_eq!(v.position, v.normal);
        }
    }

    #[test]
    fn test_indices_in_bounds() {
        let mesh = generate_sphere(3);
        let n = mesh.vertices.len() as u32;
        for &idx in &mesh.indices {
            assert!(idx < n, "index {idx} out of bounds (vertex count = {n})");
        }
    }

    #[test]
    fn test_subdivision_quadruples_triangles() {
        let coarse = generate_sphere(2);
        let fine = generate_sphere(3);
        assert_eq!(fine.triangle_count(), coarse.triangle_count() * 4);
    }

    #[test]
    fn test_uvs_in_range() {
        let mesh = generate_sphere(3);
        for v in &mesh.vertices {
            assert!((0.0..=1.0).contains(&v.uv[0]), "U out of range: {}", v.uv[0]);
            assert!((0.0..=1.0).contains(&v.uv[1]), "V out of range: {}", v.uv[1]);
        }
    }

    #[test]
    fn test_uv_convention_matches_solar_frame() {
        // +X is longitude 0 (u = 0.5), the north pole is v = 0.
        let uv = equirect_uv(Vec3::X);
        assert!((uv[0] - 0.5).abs() < 1e-6, "u at +X should be 0.5, got {}", uv[0]);
        assert!((uv[1] - 0.5).abs() < 1e-6, "v at +X should be 0.5, got {}", uv[1]);

        let north = equirect_uv(Vec3::Y);
        assert!(north[1].abs() < 1e-6, "v at the north pole should be 0, got {}", north[1]);
    }

    #[test]
    fn test_vertex_stride_matches_layout() {
        assert_eq!(std::mem::size_of::<SphereVertex>(), 32);
    }
}
