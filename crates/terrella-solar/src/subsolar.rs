//! Subsolar point computation via the declination/hour-angle method.
//!
//! Declination comes from a single-harmonic fit of the axial-tilt cycle,
//! accurate to a couple of degrees. Longitude comes from the hour angle
//! relative to solar noon at (0°, 0°), where solar noon is 12:00 UTC
//! corrected by the equation of time. This keeps the lit hemisphere
//! registered to the globe texture rather than to the camera; the
//! altitude/azimuth formulation lives in a camera-local frame and is
//! deliberately not implemented (see the frame-convention tests).

use chrono::{DateTime, Datelike, Timelike, Utc};
use std::f64::consts::TAU;

/// Maximum solar declination in degrees, set by Earth's axial tilt.
pub const MAX_DECLINATION_DEG: f64 = 23.44;

/// Degrees of longitude the subsolar point sweeps per hour.
pub const DEGREES_PER_HOUR: f64 = 15.0;

/// The point on Earth's surface where the sun is directly overhead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubsolarPoint {
    /// Subsolar latitude (solar declination) in degrees, within ±23.44.
    pub latitude_deg: f64,
    /// Subsolar longitude in degrees, in `(-180, 180]`. Positive = east.
    pub longitude_deg: f64,
}

/// Solar declination in degrees for a zero-based day of year.
///
/// `-23.44 · cos(2π · (day + 10) / 365)`: the +10 offset anchors the
/// minimum near the December solstice. Leap days shift the phase by less
/// than the fit's own error, so no leap correction is applied here; the
/// day count itself comes from true calendar arithmetic.
pub fn solar_declination_deg(day_of_year0: u32) -> f64 {
    -MAX_DECLINATION_DEG * (TAU * (day_of_year0 as f64 + 10.0) / 365.0).cos()
}

/// Equation of time in minutes for a one-based ordinal day.
///
/// Spencer's three-term harmonic fit. Positive values mean the sundial
/// runs ahead of clock time (solar noon earlier than 12:00 UTC).
pub fn equation_of_time_minutes(ordinal_day: u32) -> f64 {
    let b = TAU * (ordinal_day as f64 - 81.0) / 365.0;
    9.87 * (2.0 * b).sin() - 7.53 * b.cos() - 1.5 * b.sin()
}

/// Solar noon at the reference meridian (0°, 0°), as seconds of the UTC day.
pub fn solar_noon_utc_seconds(ordinal_day: u32) -> f64 {
    12.0 * 3600.0 - equation_of_time_minutes(ordinal_day) * 60.0
}

/// Compute the subsolar point for an instant.
pub fn subsolar_point(instant: DateTime<Utc>) -> SubsolarPoint {
    let latitude_deg = solar_declination_deg(instant.ordinal0());

    let seconds_of_day =
        instant.num_seconds_from_midnight() as f64 + instant.nanosecond() as f64 * 1e-9;
    let hours_since_noon = (seconds_of_day - solar_noon_utc_seconds(instant.ordinal())) / 3600.0;

    // The sun tracks west as UTC advances past solar noon.
    let longitude_deg = wrap_longitude_deg(-hours_since_noon * DEGREES_PER_HOUR);

    SubsolarPoint {
        latitude_deg,
        longitude_deg,
    }
}

/// Wrap a longitude in degrees into `(-180, 180]`.
pub fn wrap_longitude_deg(mut deg: f64) -> f64 {
    deg %= 360.0;
    if deg <= -180.0 {
        deg += 360.0;
    } else if deg > 180.0 {
        deg -= 360.0;
    }
    deg
}
