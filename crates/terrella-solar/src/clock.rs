//! Simulated time source driving the terminator.
//!
//! The clock maps real elapsed seconds to simulated seconds through a
//! configurable speed factor. At the default factor of 1.0 the simulated
//! instant tracks wall-clock time; larger factors fast-forward the day
//! (useful for watching solstice/equinox transitions without waiting
//! months). The factor is always an explicit value, never a baked-in
//! multiplier.

use chrono::{DateTime, Duration, Utc};

/// Simulated clock: a fixed start instant plus accumulated simulated seconds.
#[derive(Clone, Debug)]
pub struct SimClock {
    /// The instant the simulation started from.
    start: DateTime<Utc>,
    /// Simulated seconds elapsed since `start`.
    simulated_elapsed: f64,
    /// Simulated seconds per real second. 1.0 = wall-clock time.
    speed_factor: f64,
    /// Whether the clock is paused.
    pub paused: bool,
}

impl SimClock {
    /// Create a clock starting at the given instant with the given speed factor.
    pub fn new(start: DateTime<Utc>, speed_factor: f64) -> Self {
        Self {
            start,
            simulated_elapsed: 0.0,
            speed_factor,
            paused: false,
        }
    }

    /// Create a clock starting at the current wall-clock instant.
    pub fn starting_now(speed_factor: f64) -> Self {
        Self::new(Utc::now(), speed_factor)
    }

    /// Advance the clock by `dt` real seconds.
    pub fn tick(&mut self, dt: f64) {
        if self.paused {
            return;
        }
        self.simulated_elapsed += dt * self.speed_factor;
    }

    /// The current simulated instant.
    pub fn now(&self) -> DateTime<Utc> {
        self.start + Duration::nanoseconds((self.simulated_elapsed * 1e9) as i64)
    }

    /// The simulated seconds elapsed since the start instant.
    pub fn simulated_elapsed(&self) -> f64 {
        self.simulated_elapsed
    }

    /// The configured speed factor (simulated seconds per real second).
    pub fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    /// Change the speed factor. Takes effect from the next tick; already
    /// elapsed simulated time is unaffected.
    pub fn set_speed_factor(&mut self, speed_factor: f64) {
        self.speed_factor = speed_factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_realtime_clock_tracks_elapsed_seconds() {
        let mut clock = SimClock::new(start(), 1.0);
        clock.tick(90.0);
        assert_eq!(clock.now(), start() + Duration::seconds(90));
    }

    #[test]
    fn test_speed_factor_scales_simulated_time() {
        let mut clock = SimClock::new(start(), 600.0);
        clock.tick(1.0);
        assert_eq!(clock.now(), start() + Duration::minutes(10));
    }

    #[test]
    fn test_paused_clock_does_not_advance() {
        let mut clock = SimClock::new(start(), 1.0);
        clock.paused = true;
        clock.tick(1000.0);
        assert_eq!(clock.now(), start());
        assert!((clock.simulated_elapsed() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clock_is_monotonic_over_many_ticks() {
        let mut clock = SimClock::new(start(), 60.0);
        let mut previous = clock.now();
        for _ in 0..1000 {
            clock.tick(1.0 / 60.0);
            let now = clock.now();
            assert!(now >= previous, "clock went backwards: {previous} -> {now}");
            previous = now;
        }
    }

    #[test]
    fn test_speed_change_preserves_elapsed_time() {
        let mut clock = SimClock::new(start(), 1.0);
        clock.tick(60.0);
        clock.set_speed_factor(600.0);
        clock.tick(1.0);
        assert_eq!(clock.now(), start() + Duration::seconds(60 + 600));
    }

    #[test]
    fn test_subsecond_precision() {
        let mut clock = SimClock::new(start(), 1.0);
        clock.tick(0.25);
        let dt = clock.now() - start();
        let millis = dt.num_milliseconds();
        assert_eq!(millis, 250, "expected 250 ms of simulated time, got {millis}");
    }
}
