//! Offline estimators.

use tracing::warn;

use super::{EstimatorError, RouteEstimator};
use crate::domain::{Route, RouteSegment, TransportMode, duration_from_secs};
use crate::spatial::{Location, haversine_m};

/// Great-circle distance at a constant speed.
#[derive(Debug, Clone, Copy)]
pub struct StraightLineEstimator {
    mode: TransportMode,
    speed_kmh: f64,
}

impl StraightLineEstimator {
    pub fn new(mode: TransportMode, speed_kmh: f64) -> Self {
        Self { mode, speed_kmh }
    }

    /// Car at 50 km/h.
    pub fn driving() -> Self {
        Self::new(TransportMode::Car, 50.0)
    }

    /// Walking at 4.8 km/h.
    pub fn walking() -> Self {
        Self::new(TransportMode::Walking, 4.8)
    }
}

impl RouteEstimator for StraightLineEstimator {
    async fn calculate_route(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<Route, EstimatorError> {
        if self.speed_kmh.is_nan() || self.speed_kmh <= 0.0 {
            return Err(EstimatorError::Unavailable(format!(
                "invalid speed {} km/h",
                self.speed_kmh
            )));
        }
        let meters = haversine_m(origin.coords(), destination.coords());
        let secs = meters / (self.speed_kmh / 3.6);
        let segment = RouteSegment::new(
            self.mode,
            origin.clone(),
            destination.clone(),
            duration_from_secs(secs),
            meters,
        );
        Ok(Route::single(format!("straight-line-{}", self.mode), segment))
    }
}

/// Tries `primary`, then `secondary` if the primary fails.
#[derive(Debug, Clone)]
pub struct FallbackEstimator<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> FallbackEstimator<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl<P: RouteEstimator, S: RouteEstimator> RouteEstimator for FallbackEstimator<P, S> {
    async fn calculate_route(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<Route, EstimatorError> {
        match self.primary.calculate_route(origin, destination).await {
            Ok(route) => Ok(route),
            Err(e) => {
                warn!(error = %e, "primary estimator failed, using fallback");
                self.secondary.calculate_route(origin, destination).await
            }
        }
    }
}
