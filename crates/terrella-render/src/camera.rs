//! Camera system for view and projection matrix generation.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

/// GPU-side camera uniform: view-projection matrix plus camera position.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    /// Column-major view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// xyz = camera position, w = padding.
    pub camera_pos: [f32; 4],
}

/// A perspective camera that generates view and projection matrices with
/// reverse-Z depth mapping.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Position in world space.
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

impl Camera {
    /// Compute the view matrix (inverse of camera transform).
    pub fn view_matrix(&self) -> Mat4 {
        let rotation_matrix = Mat4::from_quat(self.rotation);
        let translation_matrix = Mat4::from_translation(self.position);
        (translation_matrix * rotation_matrix).inverse()
    }

    /// Compute the projection matrix with reverse-Z: near/far swapped so
    /// the near plane maps to z=1 and the far plane to z=0.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    /// Compute the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// The up direction vector (+Y in camera space).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Update the aspect ratio from window dimensions. Degenerate (zero)
    /// dimensions are ignored so a minimized window cannot poison the
    /// projection with a division by zero.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }

    /// Convert the camera to a uniform suitable for GPU upload.
    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection_matrix().to_cols_array_2d(),
            camera_pos: [self.position.x, self.position.y, self.position.z, 0.0],
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: std::f32::consts::FRAC_PI_4, // 45 degrees
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_camera_looks_down_neg_z() {
        let camera = Camera::default();
        let forward = camera.forward();
        assert!((forward.x).abs() < 1e-6);
        assert!((forward.y).abs() < 1e-6);
        assert!((forward.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_aspect_ratio_updates() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(1920.0, 1080.0);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_dimension_resize_is_ignored() {
        let mut camera = Camera::default();
        let before = camera.aspect_ratio;
        camera.set_aspect_ratio(0.0, 1080.0);
        camera.set_aspect_ratio(1920.0, 0.0);
        assert_eq!(camera.aspect_ratio, before, "degenerate resize must not change aspect");
        assert!(camera.projection_matrix().is_finite());
    }

    #[test]
    fn test_view_matrix_inverse_is_camera_transform() {
        let camera = Camera {
            position: Vec3::new(0.0, 2.0, 6.5),
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            ..Camera::default()
        };
        let inv_view = camera.view_matrix().inverse();
        let reconstructed_pos = inv_view.col(3).truncate();
        assert!((reconstructed_pos - camera.position).length() < 1e-4);
    }

    #[test]
    fn test_uniform_is_gpu_aligned() {
        let size = std::mem::size_of::<CameraUniform>();
        assert_eq!(size, 80);
        assert_eq!(size % 16, 0, "CameraUniform must be 16-byte aligned");
    }

    #[test]
    fn test_view_projection_combines_correctly() {
        let camera = Camera::default();
        let vp = camera.view_projection_matrix();
        let expected = camera.projection_matrix() * camera.view_matrix();
        for col in 0..4 {
            for row in 0..4 {
                assert!(
                    (vp.col(col)[row] - expected.col(col)[row]).abs() < 1e-6,
                    "mismatch at col={col}, row={row}"
                );
            }
        }
    }
}
