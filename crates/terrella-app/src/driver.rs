//! The per-frame driver.
//!
//! Owns the renderable solar state explicitly (no closure-captured scene
//! globals) and, once per redraw: advances the simulated clock, recomputes
//! subsolar point → sun direction → clip plane, and regenerates the
//! overlay readout. Everything downstream reads from this struct.

use std::time::Instant;

use glam::Vec3;
use terrella_solar::{SimClock, SolarState};
use tracing::warn;

use crate::overlay::{OverlayReadout, readout};

/// Maximum accepted frame time. A frame longer than this (debugger pause,
/// laptop suspend) is clamped so the simulation slows down instead of
/// lurching.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Per-frame driver state.
pub struct FrameDriver {
    solar: SolarState,
    overlay: OverlayReadout,
    previous_time: Option<Instant>,
}

impl FrameDriver {
    /// Create the driver and compute the first frame's state.
    pub fn new(clock: SimClock) -> Self {
        let solar = SolarState::new(clock);
        let overlay = readout(solar.instant());
        Self {
            solar,
            overlay,
            previous_time: None,
        }
    }

    /// Run one frame against wall-clock time. Returns the real dt in
    /// seconds (already clamped).
    pub fn frame(&mut self) -> f64 {
        let now = Instant::now();
        let dt = match self.previous_time {
            Some(prev) => now.duration_since(prev).as_secs_f64(),
            None => 0.0,
        };
        self.previous_time = Some(now);

        let dt = if dt > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                dt * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            MAX_FRAME_TIME
        } else {
            dt
        };

        self.advance(dt);
        dt
    }

    /// Advance by an explicit dt (testable without wall-clock time).
    pub fn advance(&mut self, dt: f64) {
        self.solar.tick(dt);
        self.overlay = readout(self.solar.instant());
    }

    /// The solar state computed for this frame.
    pub fn solar(&self) -> &SolarState {
        &self.solar
    }

    /// The overlay readout computed for this frame.
    pub fn overlay(&self) -> &OverlayReadout {
        &self.overlay
    }

    /// Sun direction as f32 for GPU upload.
    pub fn sun_direction(&self) -> Vec3 {
        self.solar.terminator.sun_direction.as_vec3()
    }

    /// Clip plane normal (negated sun direction) as f32 for GPU upload.
    pub fn clip_plane_normal(&self) -> Vec3 {
        self.solar.terminator.clip_plane.normal.as_vec3()
    }

    /// Clip plane offset for GPU upload.
    pub fn clip_plane_offset(&self) -> f32 {
        self.solar.terminator.clip_plane.offset as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn driver_at(speed_factor: f64) -> FrameDriver {
        let start = chrono::Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap();
        FrameDriver::new(SimClock::new(start, speed_factor))
    }

    #[test]
    fn test_update_is_pure_in_the_instant() {
        // Two updates at the same instant (dt = 0) must produce identical
        // direction vectors: no hidden accumulation.
        let mut driver = driver_at(1.0);
        driver.advance(0.0);
        let first = driver.sun_direction();
        driver.advance(0.0);
        let second = driver.sun_direction();
        assert_eq!(first, second);
    }

    #[test]
    fn test_two_drivers_agree_frame_by_frame() {
        let mut a = driver_at(600.0);
        let mut b = driver_at(600.0);
        for _ in 0..120 {
            a.advance(1.0 / 60.0);
            b.advance(1.0 / 60.0);
            assert_eq!(a.sun_direction(), b.sun_direction());
            assert_eq!(a.overlay(), b.overlay());
        }
    }

    #[test]
    fn test_clip_normal_opposes_sun() {
        let mut driver = driver_at(3600.0);
        for _ in 0..24 {
            driver.advance(1.0);
            let sum = driver.sun_direction() + driver.clip_plane_normal();
            assert!(sum.length() < 1e-6, "clip normal must stay the negated sun direction");
            assert_eq!(driver.clip_plane_offset(), 0.0);
        }
    }

    #[test]
    fn test_overlay_tracks_simulated_clock() {
        let mut driver = driver_at(3600.0);
        let before = driver.overlay().time.clone();
        driver.advance(1.0); // one simulated hour
        let after = driver.overlay().time.clone();
        assert_ne!(before, after, "overlay must follow the simulated instant");
        assert!(after.starts_with("13:"), "expected 13:xx after one simulated hour, got {after}");
    }

    #[test]
    fn test_first_wallclock_frame_has_zero_dt() {
        let mut driver = driver_at(1.0);
        let dt = driver.frame();
        assert_eq!(dt, 0.0, "first frame has no previous timestamp to diff against");
    }
}
