//! Terminator state: the light placement and clipping plane derived from
//! the sun direction each frame.
//!
//! The hard day/night edge comes from the clip plane, not from diffuse
//! falloff: the night shell is clipped to the half-space facing away from
//! the sun, which produces a sharp great-circle terminator regardless of
//! the lighting model.

use chrono::{DateTime, Utc};
use glam::DVec3;

use crate::clock::SimClock;
use crate::direction::subsolar_direction;
use crate::subsolar::{SubsolarPoint, subsolar_point};

/// Distance of the light source from the globe center, in sphere radii.
/// Purely for shading; the clip plane defines the hard boundary.
pub const LIGHT_DISTANCE_RADII: f64 = 5.0;

/// A half-space boundary: points with `dot(p, normal) + offset > 0` are
/// in shadow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipPlane {
    /// Plane normal; points away from the sun.
    pub normal: DVec3,
    /// Signed offset; zero means the plane passes through the globe center.
    pub offset: f64,
}

/// Lighting/clipping configuration for one frame.
#[derive(Clone, Copy, Debug)]
pub struct TerminatorState {
    /// Unit direction from the globe center toward the sun.
    pub sun_direction: DVec3,
    /// Light position in globe-local space.
    pub light_position: DVec3,
    /// The plane whose anti-sun half-space is in shadow.
    pub clip_plane: ClipPlane,
}

impl TerminatorState {
    /// Build terminator state from a unit sun direction.
    pub fn from_direction(sun_direction: DVec3) -> Self {
        let sun_direction = sun_direction.normalize();
        Self {
            sun_direction,
            light_position: sun_direction * LIGHT_DISTANCE_RADII,
            clip_plane: ClipPlane {
                normal: -sun_direction,
                offset: 0.0,
            },
        }
    }

    /// Build terminator state for an instant, running the full chain
    /// instant → subsolar point → direction → plane.
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self::from_direction(subsolar_direction(&subsolar_point(instant)))
    }

    /// Whether a surface point (unit vector from the globe center) is on
    /// the sunlit side of the terminator.
    pub fn is_lit(&self, surface_normal: DVec3) -> bool {
        surface_normal.dot(self.sun_direction) > 0.0
    }
}

/// Aggregate solar state recomputed each frame from the simulated clock.
///
/// Owned by the frame driver and passed by reference each tick; nothing in
/// here is captured in closures or mutated from elsewhere.
#[derive(Clone, Debug)]
pub struct SolarState {
    /// The simulated clock.
    pub clock: SimClock,
    /// Subsolar point for the current instant.
    pub subsolar: SubsolarPoint,
    /// Terminator configuration for the current instant.
    pub terminator: TerminatorState,
}

impl SolarState {
    /// Create the state and compute the initial frame's values.
    pub fn new(clock: SimClock) -> Self {
        let instant = clock.now();
        Self {
            clock,
            subsolar: subsolar_point(instant),
            terminator: TerminatorState::from_instant(instant),
        }
    }

    /// Advance the clock by `dt` real seconds and recompute everything
    /// from the new instant.
    pub fn tick(&mut self, dt: f64) {
        self.clock.tick(dt);
        let instant = self.clock.now();
        self.subsolar = subsolar_point(instant);
        self.terminator = TerminatorState::from_instant(instant);
    }

    /// The current simulated instant.
    pub fn instant(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
