//! Damped orbit camera controller.
//!
//! Left-drag spins the globe viewpoint with rotational inertia that decays
//! exponentially after release; the scroll wheel zooms within fixed bounds
//! expressed in sphere radii. Panning is deliberately not supported: the
//! camera always looks at the globe center.

use glam::{Quat, Vec2, Vec3};
use tracing::debug;

/// Zoom limits in sphere-radius units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitBounds {
    /// Closest allowed camera distance.
    pub min_distance: f32,
    /// Farthest allowed camera distance.
    pub max_distance: f32,
}

impl Default for OrbitBounds {
    fn default() -> Self {
        Self {
            min_distance: 3.0,
            max_distance: 10.0,
        }
    }
}

/// Pitch clamp short of the poles, in radians.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.05;

/// Orbit camera controller with damped rotational inertia.
#[derive(Clone, Debug)]
pub struct OrbitController {
    yaw: f32,
    pitch: f32,
    distance: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    /// Velocity decay rate per second; higher stops the spin sooner.
    damping: f32,
    /// Radians of rotation per pixel of drag.
    rotate_speed: f32,
    /// Distance change per scroll line, as a fraction of current distance.
    zoom_speed: f32,
    bounds: OrbitBounds,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new(OrbitBounds::default())
    }
}

impl OrbitController {
    /// Create a controller at a mid-range distance looking at the equator.
    pub fn new(bounds: OrbitBounds) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: (bounds.min_distance + bounds.max_distance) * 0.5,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            damping: 5.0,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            bounds,
        }
    }

    /// Feed a drag delta in pixels. Sets the angular velocity so the orbit
    /// keeps coasting after the button is released.
    pub fn apply_drag(&mut self, delta: Vec2) {
        self.yaw_velocity = -delta.x * self.rotate_speed * self.damping;
        self.pitch_velocity = -delta.y * self.rotate_speed * self.damping;
    }

    /// Feed a scroll amount in lines; positive zooms in. Clamped to bounds.
    pub fn apply_scroll(&mut self, lines: f32) {
        let factor = 1.0 - lines * self.zoom_speed;
        let next = (self.distance * factor)
            .clamp(self.bounds.min_distance, self.bounds.max_distance);
        if (next - self.distance).abs() > f32::EPSILON {
            debug!("Orbit zoom: {:.2} -> {next:.2} radii", self.distance);
        }
        self.distance = next;
    }

    /// Advance the controller by `dt` seconds: integrate angular velocity
    /// and decay it exponentially.
    pub fn advance(&mut self, dt: f32) {
        self.yaw += self.yaw_velocity * dt;
        self.pitch = (self.pitch + self.pitch_velocity * dt).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let decay = (-self.damping * dt).exp();
        self.yaw_velocity *= decay;
        self.pitch_velocity *= decay;
    }

    /// Current camera rotation: yaw around the polar axis, then pitch.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    /// Camera position on the orbit sphere; the view axis (-Z) points at
    /// the globe center from here.
    pub fn position(&self) -> Vec3 {
        self.rotation() * Vec3::new(0.0, 0.0, self.distance)
    }

    /// Current distance from the globe center.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Current pitch in radians.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Whether the orbit has effectively come to rest.
    pub fn is_at_rest(&self) -> bool {
        self.yaw_velocity.abs() < 1e-4 && self.pitch_velocity.abs() < 1e-4
    }
}
