//! Caching layer for leg estimates.
//!
//! The composer asks for many legs that differ only in their via-point, and
//! repeated requests for the same trip produce the same via-points. Caching
//! by rounded coordinates lets those repeats skip the routing service.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::Route;
use crate::estimator::{EstimatorError, RouteEstimator};
use crate::spatial::Location;

/// Coordinate scale for cache keys; five decimal places is about a meter.
const KEY_SCALE: f64 = 1e5;

/// Cache key: (origin lat, origin lon, destination lat, destination lon),
/// each scaled and rounded.
type RouteKey = (i64, i64, i64, i64);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 10_000,
        }
    }
}

fn route_key(origin: &Location, destination: &Location) -> RouteKey {
    let scale = |v: f64| (v * KEY_SCALE).round() as i64;
    (
        scale(origin.latitude),
        scale(origin.longitude),
        scale(destination.latitude),
        scale(destination.longitude),
    )
}

/// An estimator with caching.
///
/// Only successful estimates are cached.
pub struct CachedEstimator<E> {
    inner: E,
    routes: MokaCache<RouteKey, Arc<Route>>,
}

impl<E> CachedEstimator<E> {
    /// Create a new cached estimator.
    pub fn new(inner: E, config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, routes }
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.routes.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.routes.invalidate_all();
    }
}

impl<E: RouteEstimator> RouteEstimator for CachedEstimator<E> {
    async fn calculate_route(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<Route, EstimatorError> {
        let key = route_key(origin, destination);

        if let Some(cached) = self.routes.get(&key).await {
            trace!(?key, "route cache hit");
            return Ok(Route::clone(&cached));
        }

        let route = self.inner.calculate_route(origin, destination).await?;
        self.routes.insert(key, Arc::new(route.clone())).await;
        Ok(route)
    }
}
