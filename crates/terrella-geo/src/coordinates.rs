//! Geographic coordinates and marker placement.

use glam::DVec3;
use terrella_solar::direction_from_degrees;

/// A latitude/longitude pair in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoCoordinates {
    /// Latitude in degrees, positive north. Valid range `[-90, 90]`.
    pub latitude_deg: f64,
    /// Longitude in degrees, positive east. Valid range `(-180, 180]`.
    pub longitude_deg: f64,
}

/// Coordinates used when the geolocation query fails or never resolves.
pub const FALLBACK_COORDINATES: GeoCoordinates = GeoCoordinates {
    latitude_deg: 45.464,
    longitude_deg: 9.190,
};

impl GeoCoordinates {
    /// Create coordinates, returning `None` if either component is out of
    /// range or not finite.
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Option<Self> {
        let valid = latitude_deg.is_finite()
            && longitude_deg.is_finite()
            && (-90.0..=90.0).contains(&latitude_deg)
            && longitude_deg > -180.0
            && longitude_deg <= 180.0;
        valid.then_some(Self {
            latitude_deg,
            longitude_deg,
        })
    }

    /// Unit direction from the globe center toward these coordinates,
    /// using the same spherical convention as the solar model so marker
    /// and terminator stay in the same frame.
    pub fn direction(&self) -> DVec3 {
        direction_from_degrees(self.latitude_deg, self.longitude_deg)
    }
}

/// The point on the sphere of the given radius at these coordinates.
pub fn surface_position(coords: GeoCoordinates, radius: f64) -> DVec3 {
    coords.direction() * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_valid() {
        assert!(
            GeoCoordinates::new(
                FALLBACK_COORDINATES.latitude_deg,
                FALLBACK_COORDINATES.longitude_deg
            )
            .is_some()
        );
    }

    #[test]
    fn test_marker_lies_exactly_on_the_sphere() {
        let radius = 1.0;
        let pos = surface_position(FALLBACK_COORDINATES, radius);
        assert!(
            (pos.length() - radius).abs() < 1e-12,
            "marker must sit on the sphere surface, |p| = {}",
            pos.length()
        );
    }

    #[test]
    fn test_marker_matches_solar_frame_convention() {
        // The marker for the fallback coordinates must equal the direction
        // vector the solar model produces for the same (lat, lon).
        let pos = surface_position(FALLBACK_COORDINATES, 1.0);
        let expected = direction_from_degrees(45.464, 9.190);
        assert_eq!(pos, expected);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(GeoCoordinates::new(91.0, 0.0).is_none());
        assert!(GeoCoordinates::new(-90.5, 0.0).is_none());
        assert!(GeoCoordinates::new(0.0, -180.0).is_none());
        assert!(GeoCoordinates::new(0.0, 180.5).is_none());
        assert!(GeoCoordinates::new(f64::NAN, 0.0).is_none());
        assert!(GeoCoordinates::new(0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_boundaries_accepted() {
        assert!(GeoCoordinates::new(90.0, 180.0).is_some());
        assert!(GeoCoordinates::new(-90.0, -179.999).is_some());
    }
}
