//! Solar terminator model: simulated time, subsolar point, sun direction,
//! and the clipping plane that splits the globe into day and night.
//!
//! Everything here is a pure function of an instant in time. The frame
//! driver recomputes the full chain every frame rather than updating
//! incrementally, so no drift or accumulated floating-point error can
//! creep in between frames.

pub mod clock;
pub mod direction;
pub mod subsolar;
pub mod terminator;

pub use clock::SimClock;
pub use direction::{direction_from_degrees, degrees_from_direction, subsolar_direction};
pub use subsolar::{
    DEGREES_PER_HOUR, MAX_DECLINATION_DEG, SubsolarPoint, equation_of_time_minutes,
    solar_declination_deg, solar_noon_utc_seconds, subsolar_point,
};
pub use terminator::{ClipPlane, LIGHT_DISTANCE_RADII, SolarState, TerminatorState};
