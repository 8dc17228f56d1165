//! Viewer geolocation: a one-shot provider abstraction with a fixed
//! fallback, and placement of the resulting marker on the globe surface.

pub mod coordinates;
pub mod provider;

pub use coordinates::{FALLBACK_COORDINATES, GeoCoordinates, surface_position};
pub use provider::{
    ConfiguredProvider, GeolocationError, GeolocationProvider, UnavailableProvider,
    locate_in_background,
};
