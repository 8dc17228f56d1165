//! One-shot geolocation providers.
//!
//! A provider is asked for coordinates exactly once per process. The query
//! runs on a background thread and races against first render; until it
//! resolves the app shows the fallback marker, and a failed or lost query
//! leaves the fallback in place permanently. No retries.

use crossbeam_channel::{Receiver, bounded};

use crate::coordinates::GeoCoordinates;

/// Why a geolocation query produced no coordinates.
#[derive(Debug, thiserror::Error)]
pub enum GeolocationError {
    /// The user or platform refused the query.
    #[error("geolocation permission denied")]
    Denied,

    /// No position source is available on this system.
    #[error("geolocation unavailable: {0}")]
    Unavailable(String),

    /// The query did not resolve in time.
    #[error("geolocation query timed out")]
    Timeout,

    /// The provider returned values outside valid coordinate ranges.
    #[error("geolocation returned invalid coordinates ({0}, {1})")]
    InvalidCoordinates(f64, f64),
}

/// A source of the viewer's coordinates. `locate` is called at most once.
pub trait GeolocationProvider {
    /// Request the current coordinates. Blocking; run on a worker thread.
    fn locate(&self) -> Result<GeoCoordinates, GeolocationError>;
}

/// Provider backed by coordinates the user configured.
pub struct ConfiguredProvider {
    latitude_deg: f64,
    longitude_deg: f64,
}

impl ConfiguredProvider {
    /// Create a provider returning the given coordinates.
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
        }
    }
}

impl GeolocationProvider for ConfiguredProvider {
    fn locate(&self) -> Result<GeoCoordinates, GeolocationError> {
        GeoCoordinates::new(self.latitude_deg, self.longitude_deg).ok_or(
            GeolocationError::InvalidCoordinates(self.latitude_deg, self.longitude_deg),
        )
    }
}

/// Provider for systems with no position source; always errors.
pub struct UnavailableProvider;

impl GeolocationProvider for UnavailableProvider {
    fn locate(&self) -> Result<GeoCoordinates, GeolocationError> {
        Err(GeolocationError::Unavailable(
            "no position source on this platform".to_string(),
        ))
    }
}

/// Run the provider on a background thread, delivering its single result
/// over a one-shot channel. The receiver end is polled by the frame loop;
/// if the thread dies or the send is never made, the receiver simply stays
/// empty and the fallback coordinates remain in effect.
pub fn locate_in_background<P>(provider: P) -> Receiver<Result<GeoCoordinates, GeolocationError>>
where
    P: GeolocationProvider + Send + 'static,
{
    let (tx, rx) = bounded(1);
    std::thread::Builder::new()
        .name("geolocation".to_string())
        .spawn(move || {
            let result = provider.locate();
            if let Err(e) = &result {
                log::warn!("Geolocation query failed: {e}");
            }
            // The receiver may already be gone on shutdown.
            let _ = tx.send(result);
        })
        .expect("failed to spawn geolocation thread");
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::{FALLBACK_COORDINATES, surface_position};
    use std::time::Duration;
    use terrella_solar::direction_from_degrees;

    #[test]
    fn test_configured_provider_returns_its_coordinates() {
        let provider = ConfiguredProvider::new(60.17, 24.94);
        let coords = provider.locate().unwrap();
        assert!((coords.latitude_deg - 60.17).abs() < f64::EPSILON);
        assert!((coords.longitude_deg - 24.94).abs() < f64::EPSILON);
    }

    #[test]
    fn test_configured_provider_rejects_garbage() {
        let provider = ConfiguredProvider::new(1234.0, 0.0);
        assert!(matches!(
            provider.locate(),
            Err(GeolocationError::InvalidCoordinates(..))
        ));
    }

    #[test]
    fn test_failed_query_leaves_fallback_marker() {
        // Simulated geolocation error: the marker must equal the direction
        // vector for (45.464, 9.190) exactly.
        let rx = locate_in_background(UnavailableProvider);
        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(result.is_err());

        let marker = result.map(|c| surface_position(c, 1.0)).unwrap_or_else(|_| {
            surface_position(FALLBACK_COORDINATES, 1.0)
        });
        assert_eq!(marker, direction_from_degrees(45.464, 9.190));
    }

    #[test]
    fn test_background_query_delivers_exactly_once() {
        let rx = locate_in_background(ConfiguredProvider::new(45.0, 9.0));
        let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(first.is_ok());
        // The channel is one-shot: the sender is dropped after its send.
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }
}
