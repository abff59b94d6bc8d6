//! Multimodal route composition.
//!
//! The composer answers "where should I park?". It samples via-points around
//! the destination, asks the driving estimator for origin → via and the
//! walking estimator for via → destination, and ranks the pairs. Estimator
//! calls for different via-points run concurrently, bounded by
//! [`ComposerConfig::concurrency`]. A failed or timed-out leg drops its
//! candidate and nothing else.

use chrono::Duration;
use futures::StreamExt;
use futures::stream;
use tracing::{debug, warn};

use super::candidates::{nearest_to, via_points};
use super::config::ComposerConfig;
use super::rank::{DriveWalkCandidate, ScoreWeights, ScoredCandidate, rank_candidates};
use crate::domain::{Route, RouteSegment, TransportMode, fractional_minutes};
use crate::estimator::{EstimatorError, RouteEstimator};
use crate::spatial::Location;

/// Errors from route planning.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlanError {
    /// Every drive-then-walk candidate failed or walked too far.
    #[error("no drive-then-walk candidate route found")]
    NoCandidateRoute,

    /// No walk from the start lands within tolerance of the budget.
    #[error("no walk found within tolerance of {target_minutes} minutes")]
    NoFinishRoute { target_minutes: i64 },

    /// None of the requested modes produced a route.
    #[error("no route found for the requested modes")]
    NoRoute,

    /// The walk limit does not fit in a duration.
    #[error("walk limit of {minutes} minutes is out of range")]
    WalkLimitOutOfRange { minutes: i64 },
}

/// Walking preferences for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoutePreferences {
    /// Longest acceptable walk, minutes. Unset or non-positive means the
    /// configured default.
    pub max_walk_minutes: Option<i64>,
    /// Walk the traveller would like, minutes. Unset or non-positive means
    /// the maximum.
    pub preferred_walk_minutes: Option<i64>,
}

impl RoutePreferences {
    pub fn new(max_walk_minutes: i64, preferred_walk_minutes: i64) -> Self {
        Self {
            max_walk_minutes: Some(max_walk_minutes),
            preferred_walk_minutes: Some(preferred_walk_minutes),
        }
    }

    /// Effective walk limit in minutes.
    pub fn max_walk(&self, config: &ComposerConfig) -> i64 {
        self.max_walk_minutes
            .filter(|&m| m > 0)
            .unwrap_or(config.default_max_walk_mins)
    }

    /// Effective preferred walk in minutes.
    pub fn preferred_walk(&self, config: &ComposerConfig) -> i64 {
        self.preferred_walk_minutes
            .filter(|&m| m > 0)
            .unwrap_or_else(|| self.max_walk(config))
    }
}

/// A planning request.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub origin: Location,
    pub destination: Location,
    pub modes: Vec<TransportMode>,
    pub preferences: RoutePreferences,
}

/// Combines driving and walking estimates into multimodal routes.
///
/// Generic over the estimators so tests can use in-memory mocks.
pub struct Composer<'a, D, W> {
    driving: &'a D,
    walking: &'a W,
    config: &'a ComposerConfig,
}

impl<'a, D: RouteEstimator, W: RouteEstimator> Composer<'a, D, W> {
    pub fn new(driving: &'a D, walking: &'a W, config: &'a ComposerConfig) -> Self {
        Self {
            driving,
            walking,
            config,
        }
    }

    /// Rank drive-then-walk routes from `origin` to `destination`.
    ///
    /// Returns at most [`ComposerConfig::max_results`] routes, best first.
    pub async fn compose_drive_walk(
        &self,
        origin: &Location,
        destination: &Location,
        preferences: &RoutePreferences,
    ) -> Result<Vec<Route>, PlanError> {
        let max_walk_mins = preferences.max_walk(self.config);
        let preferred_walk_mins = preferences.preferred_walk(self.config);
        let max_walk = Duration::try_minutes(max_walk_mins).ok_or(
            PlanError::WalkLimitOutOfRange {
                minutes: max_walk_mins,
            },
        )?;

        let radius = self.config.walk_radius_m(max_walk_mins as f64);
        let points = via_points(
            destination,
            radius,
            &self.config.ring_fractions,
            self.config.ring_samples,
        );
        let vias = nearest_to(origin, points, self.config.candidate_count);
        debug!(
            count = vias.len(),
            radius_m = radius,
            max_walk_mins,
            "evaluating via-points"
        );

        let candidates: Vec<DriveWalkCandidate> = stream::iter(vias.into_iter().enumerate())
            .map(|(index, via)| self.evaluate(index, via, origin, destination, max_walk))
            .buffer_unordered(self.config.concurrency.max(1))
            .filter_map(|candidate| async move { candidate })
            .collect()
            .await;

        if candidates.is_empty() {
            return Err(PlanError::NoCandidateRoute);
        }

        let weights = ScoreWeights {
            drive: self.config.drive_weight,
            walk_deviation: self.config.walk_deviation_weight,
        };
        let ranked = rank_candidates(
            candidates,
            preferred_walk_mins as f64,
            weights,
            self.config.max_results,
        );

        Ok(ranked
            .into_iter()
            .enumerate()
            .map(|(i, scored)| self.build_route(i + 1, scored, origin, destination))
            .collect())
    }

    /// Find a walk of roughly `budget` that ends near `destination`.
    ///
    /// Walks are estimated from `latest_start` to each ring point around the
    /// destination; the one whose duration is closest to `budget`, within
    /// [`ComposerConfig::finish_tolerance`], wins.
    pub async fn finish_route(
        &self,
        destination: &Location,
        latest_start: &Location,
        budget: Duration,
    ) -> Result<Route, PlanError> {
        let no_route = PlanError::NoFinishRoute {
            target_minutes: budget.num_minutes(),
        };
        if budget <= Duration::zero() {
            return Err(no_route);
        }

        let radius = self.config.walk_radius_m(fractional_minutes(budget));
        let points = via_points(
            destination,
            radius,
            &self.config.ring_fractions,
            self.config.ring_samples,
        );

        let target_ms = budget.num_milliseconds() as f64;
        let low = target_ms * (1.0 - self.config.finish_tolerance);
        let high = target_ms * (1.0 + self.config.finish_tolerance);

        let walks: Vec<(usize, Route)> = stream::iter(points.into_iter().enumerate())
            .map(|(index, point)| async move {
                match self.timed(self.walking, latest_start, &point).await {
                    Ok(route) => Some((index, route)),
                    Err(e) => {
                        debug!(error = %e, "finish walk estimate failed");
                        None
                    }
                }
            })
            .buffer_unordered(self.config.concurrency.max(1))
            .filter_map(|walk| async move { walk })
            .collect()
            .await;

        let best = walks
            .into_iter()
            .map(|(index, route)| {
                let ms = route.total_duration().num_milliseconds() as f64;
                (index, ms, route)
            })
            .filter(|(_, ms, _)| (low..=high).contains(ms))
            .min_by(|a, b| {
                (a.1 - target_ms)
                    .abs()
                    .total_cmp(&(b.1 - target_ms).abs())
                    .then(a.0.cmp(&b.0))
            })
            .map(|(_, _, route)| route)
            .ok_or(no_route)?;

        let minutes = best.total_duration().num_minutes();
        let mut route = best;
        route.id = format!("finish-walk ({minutes}m)");
        Ok(route)
    }

    /// Plan routes for every requested mode.
    ///
    /// Car and walking each get a direct route. When both are requested,
    /// ranked drive-then-walk routes are appended. Other modes are skipped.
    pub async fn plan(&self, request: &RouteRequest) -> Result<Vec<Route>, PlanError> {
        let mut modes: Vec<TransportMode> = Vec::with_capacity(request.modes.len());
        for mode in &request.modes {
            if !modes.contains(mode) {
                modes.push(*mode);
            }
        }

        let mut routes = Vec::new();
        for mode in &modes {
            let result = match mode {
                TransportMode::Car => {
                    self.timed(self.driving, &request.origin, &request.destination)
                        .await
                }
                TransportMode::Walking => {
                    self.timed(self.walking, &request.origin, &request.destination)
                        .await
                }
                other => {
                    debug!(mode = %other, "no estimator for mode, skipping");
                    continue;
                }
            };
            match result {
                Ok(mut route) => {
                    route.id = format!("{mode}-route");
                    routes.push(route);
                }
                Err(e) => warn!(%mode, error = %e, "single-mode route failed"),
            }
        }

        if modes.contains(&TransportMode::Car) && modes.contains(&TransportMode::Walking) {
            match self
                .compose_drive_walk(&request.origin, &request.destination, &request.preferences)
                .await
            {
                Ok(composed) => routes.extend(composed),
                Err(e) => debug!(error = %e, "no drive-then-walk routes"),
            }
        }

        if routes.is_empty() {
            return Err(PlanError::NoRoute);
        }
        Ok(routes)
    }

    async fn evaluate(
        &self,
        index: usize,
        via: Location,
        origin: &Location,
        destination: &Location,
        max_walk: Duration,
    ) -> Option<DriveWalkCandidate> {
        let (drive, walk) = futures::join!(
            self.timed(self.driving, origin, &via),
            self.timed(self.walking, &via, destination),
        );

        let drive = match drive {
            Ok(route) => route,
            Err(e) => {
                debug!(index, error = %e, "drive leg failed, skipping via-point");
                return None;
            }
        };
        let walk = match walk {
            Ok(route) => route,
            Err(e) => {
                debug!(index, error = %e, "walk leg failed, skipping via-point");
                return None;
            }
        };
        if walk.total_duration() > max_walk {
            debug!(
                index,
                walk_secs = walk.total_duration().num_seconds(),
                "walk exceeds limit, skipping via-point"
            );
            return None;
        }

        Some(DriveWalkCandidate {
            index,
            via,
            drive,
            walk,
        })
    }

    async fn timed<E: RouteEstimator>(
        &self,
        estimator: &E,
        from: &Location,
        to: &Location,
    ) -> Result<Route, EstimatorError> {
        tokio::time::timeout(self.config.leg_timeout(), estimator.calculate_route(from, to))
            .await
            .map_err(|_| EstimatorError::Timeout(self.config.leg_timeout_secs))?
    }

    fn build_route(
        &self,
        rank: usize,
        scored: ScoredCandidate,
        origin: &Location,
        destination: &Location,
    ) -> Route {
        let DriveWalkCandidate {
            via, drive, walk, ..
        } = scored.candidate;
        let drive_mins = drive.total_duration().num_minutes();
        let walk_mins = walk.total_duration().num_minutes();

        let drive_segment = RouteSegment::new(
            TransportMode::Car,
            origin.clone(),
            via.clone(),
            drive.total_duration(),
            drive.distance_m(),
        )
        .with_instructions(format!(
            "Drive to parking location at {} (optimal: {drive_mins}m drive, {walk_mins}m walk)",
            via.label()
        ))
        .with_geometry(drive.geometry().map(String::from));

        let walk_segment = RouteSegment::new(
            TransportMode::Walking,
            via,
            destination.clone(),
            walk.total_duration(),
            walk.distance_m(),
        )
        .with_instructions(format!(
            "Walk from parking to destination ({walk_mins} minutes)"
        ))
        .with_geometry(walk.geometry().map(String::from));

        let mut route = Route::new(
            format!("optimal-drive-walk-{rank} (drive: {drive_mins}m, walk: {walk_mins}m)"),
            origin.clone(),
            destination.clone(),
        );
        route.push_segment(drive_segment);
        route.push_segment(walk_segment);
        route.add_overhead(self.config.transition_overhead());
        debug!(id = %route.id, score = scored.score, "composed route");
        route
    }
}
