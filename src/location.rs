use std::time::Duration;

use futures::future::BoxFuture;

use crate::error::LocationError;
use crate::model::attendance::Coordinates;

/// Options for a one-shot position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Age of a cached fix the provider may return. Zero means a fresh fix only.
    pub maximum_age: Duration,
}

impl LocationOptions {
    pub fn fresh_fix(timeout: Duration) -> Self {
        Self {
            high_accuracy: true,
            timeout,
            maximum_age: Duration::ZERO,
        }
    }
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self::fresh_fix(Duration::from_millis(10_000))
    }
}

/// Device geolocation capability.
pub trait LocationProvider: Send + Sync {
    fn current_position(
        &self,
        options: LocationOptions,
    ) -> BoxFuture<'_, Result<Coordinates, LocationError>>;
}

/// Provider for hosts without any geolocation capability.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLocation;

impl LocationProvider for NoLocation {
    fn current_position(
        &self,
        _options: LocationOptions,
    ) -> BoxFuture<'_, Result<Coordinates, LocationError>> {
        Box::pin(async { Err(LocationError::Unsupported) })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationStatus {
    Loading,
    Known(Coordinates),
    Unavailable(LocationError),
}

impl LocationStatus {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            LocationStatus::Known(coords) => Some(*coords),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LocationStatus::Loading)
    }

    /// Unavailable is the only state offering the manual retry action.
    pub fn can_retry(&self) -> bool {
        matches!(self, LocationStatus::Unavailable(_))
    }
}

/// Runs one request, converting an overrun of `options.timeout` into [`LocationError::Timeout`].
pub async fn fetch_once(
    provider: &dyn LocationProvider,
    options: LocationOptions,
) -> Result<Coordinates, LocationError> {
    match tokio::time::timeout(options.timeout, provider.current_position(options)).await {
        Ok(result) => result,
        Err(_) => Err(LocationError::Timeout(options.timeout.as_millis() as u64)),
    }
}
