//! Geographic coordinates to globe-local direction vectors.
//!
//! The globe frame: Y is the polar axis, the sphere is centered at the
//! origin, and longitude is offset by 180° so the equirectangular texture
//! seam lands on the back of the default view. The sign/offset convention
//! here must match the mesh UV mapping exactly or the lit hemisphere
//! rotates out of register with the visible texture.

use glam::DVec3;

use crate::subsolar::{SubsolarPoint, wrap_longitude_deg};

/// Convert latitude/longitude in degrees to a unit vector in the globe frame.
pub fn direction_from_degrees(lat_deg: f64, lon_deg: f64) -> DVec3 {
    let colatitude = (90.0 - lat_deg).to_radians();
    let theta = (lon_deg + 180.0).to_radians();
    DVec3::new(
        -colatitude.sin() * theta.cos(),
        colatitude.cos(),
        colatitude.sin() * theta.sin(),
    )
}

/// Recover latitude/longitude in degrees from a globe-frame unit vector.
///
/// Longitude is returned in `(-180, 180]`. At the poles the longitude is
/// undefined and comes back as an arbitrary value on that meridian circle.
pub fn degrees_from_direction(v: DVec3) -> (f64, f64) {
    let lat = 90.0 - v.y.clamp(-1.0, 1.0).acos().to_degrees();
    let theta = v.z.atan2(-v.x);
    let lon = wrap_longitude_deg(theta.to_degrees() - 180.0);
    (lat, lon)
}

/// Unit direction toward the sun for a subsolar point.
pub fn subsolar_direction(point: &SubsolarPoint) -> DVec3 {
    direction_from_degrees(point.latitude_deg, point.longitude_deg)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Angular difference between two longitudes, in degrees.
    fn lon_distance(a: f64, b: f64) -> f64 {
        wrap_longitude_deg(a - b).abs()
    }

    #[test]
    fn test_direction_is_unit_length_everywhere() {
        let mut lat = -90.0;
        while lat <= 90.0 {
            let mut lon = -180.0;
            while lon <= 180.0 {
                let v = direction_from_degrees(lat, lon);
                assert!(
                    (v.length() - 1.0).abs() < 1e-6,
                    "({lat}, {lon}): |v| = {} not unit",
                    v.length()
                );
                lon += 7.5;
            }
            lat += 7.5;
        }
    }

    #[test]
    fn test_poles_map_to_polar_axis() {
        let north = direction_from_degrees(90.0, 0.0);
        assert!((north - DVec3::Y).length() < 1e-9, "north pole should be +Y, got {north}");

        let south = direction_from_degrees(-90.0, 0.0);
        assert!((south - DVec3::NEG_Y).length() < 1e-9, "south pole should be -Y, got {south}");
    }

    #[test]
    fn test_texture_seam_convention() {
        // (0, 0) sits opposite the seam: theta = 180°, giving +X.
        let origin = direction_from_degrees(0.0, 0.0);
        assert!((origin - DVec3::X).length() < 1e-9, "(0,0) should map to +X, got {origin}");

        // The antimeridian is the seam itself: -X.
        let seam = direction_from_degrees(0.0, 180.0);
        assert!((seam - DVec3::NEG_X).length() < 1e-9, "(0,180) should map to -X, got {seam}");
    }

    #[test]
    fn test_cardinal_round_trips() {
        // The frame convention under test is the declination/hour-angle
        // (globe-texture) frame, not a camera-local altitude/azimuth frame.
        let cases = [(0.0, 0.0), (90.0, 0.0), (-45.0, 90.0), (0.0, -180.0)];
        for (lat, lon) in cases {
            let v = direction_from_degrees(lat, lon);
            let (lat2, lon2) = degrees_from_direction(v);
            assert!(
                (lat - lat2).abs() < 1e-9,
                "({lat}, {lon}): latitude round-tripped to {lat2}"
            );
            // Longitude is meaningless at the poles.
            if lat.abs() < 90.0 - 1e-9 {
                assert!(
                    lon_distance(lon, lon2) < 1e-9,
                    "({lat}, {lon}): longitude round-tripped to {lon2}"
                );
            }
        }
    }

    #[test]
    fn test_round_trip_dense_grid() {
        let mut lat = -85.0;
        while lat <= 85.0 {
            let mut lon = -175.0;
            while lon <= 175.0 {
                let (lat2, lon2) = degrees_from_direction(direction_from_degrees(lat, lon));
                assert!((lat - lat2).abs() < 1e-9, "lat {lat} -> {lat2}");
                assert!(lon_distance(lon, lon2) < 1e-9, "lon {lon} -> {lon2} (lat {lat})");
                lon += 17.0;
            }
            lat += 17.0;
        }
    }

    #[test]
    fn test_east_longitude_has_positive_z() {
        // 90°E: theta = 270°, so x ≈ 0, z = -1... the convention places
        // east longitudes at negative theta sine. Pin the exact octant so
        // any sign regression is caught.
        let v = direction_from_degrees(0.0, 90.0);
        assert!(v.x.abs() < 1e-9);
        assert!((v.z - (-1.0)).abs() < 1e-9, "(0,90) should map to -Z, got {v}");

        let w = direction_from_degrees(0.0, -90.0);
        assert!((w.z - 1.0).abs() < 1e-9, "(0,-90) should map to +Z, got {w}");
    }
}
