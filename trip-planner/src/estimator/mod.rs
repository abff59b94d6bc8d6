//! Single-mode leg estimators.
//!
//! The planner never computes road or footpath routes itself. It asks a
//! [`RouteEstimator`] for each leg and combines the answers. The default
//! estimator talks to an OSRM server; [`StraightLineEstimator`] covers for it
//! when the server is unreachable.

mod client;
mod error;
mod straight_line;
mod types;

pub use client::{DEFAULT_BASE_URL, OsrmConfig, OsrmEstimator, OsrmProfile};
pub use error::EstimatorError;
pub use straight_line::{FallbackEstimator, StraightLineEstimator};
pub use types::{OsrmRoute, OsrmRouteResponse};

use crate::domain::Route;
use crate::spatial::Location;

/// Estimates a single-mode route between two points.
#[allow(async_fn_in_trait)]
pub trait RouteEstimator {
    async fn calculate_route(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<Route, EstimatorError>;
}
