//! Device location, as an awaitable single-result operation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(format!("latitude {latitude} out of range"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(format!("longitude {longitude} out of range"));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Mirrors what the attendance flow asks of the platform: a fresh,
/// high-accuracy fix within a bounded time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
    /// Zero means a cached position is never acceptable.
    pub maximum_age: Duration,
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_millis(5000),
            maximum_age: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationResult {
    Located(Coordinates),
    PermissionDenied,
    Unavailable(String),
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self, options: &LocationOptions) -> LocationResult;
}

/// Location supplied up front (CLI flags or `HRM_LATITUDE`/`HRM_LONGITUDE`).
///
/// Without coordinates the provider behaves like a platform where the user
/// never granted location access.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredLocation {
    coordinates: Option<Coordinates>,
}

impl ConfiguredLocation {
    pub fn new(coordinates: Option<Coordinates>) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl LocationProvider for ConfiguredLocation {
    async fn current_position(&self, _options: &LocationOptions) -> LocationResult {
        match self.coordinates {
            Some(c) => LocationResult::Located(c),
            None => LocationResult::PermissionDenied,
        }
    }
}

/// Runs the provider under `options.timeout`; an expired timer counts as an
/// unavailable position.
pub async fn locate<P>(provider: &P, options: &LocationOptions) -> LocationResult
where
    P: LocationProvider + ?Sized,
{
    match tokio::time::timeout(options.timeout, provider.current_position(options)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout_ms = options.timeout.as_millis() as u64, "Location request timed out");
            LocationResult::Unavailable("timeout".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stalled;

    #[async_trait]
    impl LocationProvider for Stalled {
        async fn current_position(&self, _options: &LocationOptions) -> LocationResult {
            tokio::time::sleep(Duration::from_secs(60)).await;
            LocationResult::Located(Coordinates {
                latitude: 0.0,
                longitude: 0.0,
            })
        }
    }

    #[test]
    fn default_options_request_fresh_accurate_fix() {
        let opts = LocationOptions::default();
        assert!(opts.enable_high_accuracy);
        assert_eq!(opts.timeout, Duration::from_millis(5000));
        assert_eq!(opts.maximum_age, Duration::ZERO);
    }

    #[test]
    fn coordinates_are_range_checked() {
        assert!(Coordinates::new(23.8, 90.4).is_ok());
        assert!(Coordinates::new(91.0, 0.0).is_err());
        assert!(Coordinates::new(0.0, -181.0).is_err());
    }

    #[tokio::test]
    async fn configured_location_without_coordinates_is_denied() {
        let provider = ConfiguredLocation::default();
        let result = locate(&provider, &LocationOptions::default()).await;
        assert_eq!(result, LocationResult::PermissionDenied);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_provider_times_out() {
        let result = locate(&Stalled, &LocationOptions::default()).await;
        assert!(matches!(result, LocationResult::Unavailable(_)));
    }
}
