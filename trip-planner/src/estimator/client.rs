//! OSRM HTTP estimator.
//!
//! Queries the `route/v1/{profile}` endpoint of an OSRM server and turns the
//! best route into a single-segment [`Route`].

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::debug;

use super::error::EstimatorError;
use super::types::OsrmRouteResponse;
use super::RouteEstimator;
use crate::domain::{Route, RouteSegment, TransportMode, duration_from_secs};
use crate::spatial::Location;

/// Default base URL: the public OSRM demo server.
pub const DEFAULT_BASE_URL: &str = "http://router.project-osrm.org/route/v1";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default average walking speed, km/h.
const DEFAULT_WALKING_SPEED_KMH: f64 = 4.8;

/// OSRM routing profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsrmProfile {
    Driving,
    Foot,
}

impl OsrmProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            OsrmProfile::Driving => "driving",
            OsrmProfile::Foot => "foot",
        }
    }

    pub fn mode(&self) -> TransportMode {
        match self {
            OsrmProfile::Driving => TransportMode::Car,
            OsrmProfile::Foot => TransportMode::Walking,
        }
    }
}

/// Configuration for an [`OsrmEstimator`].
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL up to and including `route/v1`
    pub base_url: String,
    pub profile: OsrmProfile,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Floor for foot durations, km/h. Demo servers often route `foot` with
    /// car speeds.
    pub walking_speed_kmh: f64,
}

impl OsrmConfig {
    /// Create a config for `profile` against the public demo server.
    pub fn new(profile: OsrmProfile) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
            walking_speed_kmh: DEFAULT_WALKING_SPEED_KMH,
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_walking_speed(mut self, kmh: f64) -> Self {
        self.walking_speed_kmh = kmh;
        self
    }
}

/// OSRM route client.
///
/// Uses a semaphore to limit concurrent requests to the server.
#[derive(Debug, Clone)]
pub struct OsrmEstimator {
    http: reqwest::Client,
    base_url: String,
    profile: OsrmProfile,
    walking_speed_kmh: f64,
    semaphore: Arc<Semaphore>,
}

impl OsrmEstimator {
    pub fn new(config: OsrmConfig) -> Result<Self, EstimatorError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            profile: config.profile,
            walking_speed_kmh: config.walking_speed_kmh,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    pub fn profile(&self) -> OsrmProfile {
        self.profile
    }

    /// OSRM takes `lon,lat` pairs.
    pub fn route_url(&self, origin: &Location, destination: &Location) -> String {
        format!(
            "{}/{}/{:.6},{:.6};{:.6},{:.6}?overview=false&alternatives=false&steps=false",
            self.base_url,
            self.profile.as_str(),
            origin.longitude,
            origin.latitude,
            destination.longitude,
            destination.latitude,
        )
    }

    /// Route duration in seconds, floored by walking speed for foot routes.
    fn effective_duration(&self, duration_s: f64, distance_m: f64) -> f64 {
        match self.profile {
            OsrmProfile::Driving => duration_s,
            OsrmProfile::Foot if self.walking_speed_kmh > 0.0 => {
                duration_s.max(distance_m / (self.walking_speed_kmh / 3.6))
            }
            OsrmProfile::Foot => duration_s,
        }
    }
}

impl RouteEstimator for OsrmEstimator {
    async fn calculate_route(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<Route, EstimatorError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| EstimatorError::Unavailable("semaphore closed".to_string()))?;

        let url = self.route_url(origin, destination);
        debug!(%url, "requesting OSRM route");
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // OSRM reports routing failures as 400 with a JSON body
            if let Ok(parsed) = serde_json::from_str::<OsrmRouteResponse>(&body) {
                return Err(EstimatorError::NoRoute(parsed.code));
            }
            return Err(EstimatorError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let parsed: OsrmRouteResponse =
            serde_json::from_str(&body).map_err(|e| EstimatorError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        if !parsed.is_ok() {
            return Err(EstimatorError::NoRoute(parsed.code));
        }
        let best = parsed
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| EstimatorError::NoRoute("no routes returned".to_string()))?;

        let duration = duration_from_secs(self.effective_duration(best.duration, best.distance));
        let segment = RouteSegment::new(
            self.profile.mode(),
            origin.clone(),
            destination.clone(),
            duration,
            best.distance,
        )
        .with_geometry(best.geometry);

        Ok(Route::single(
            format!("osrm-{}", self.profile.as_str()),
            segment,
        ))
    }
}
