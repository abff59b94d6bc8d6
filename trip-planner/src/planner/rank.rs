//! Drive-then-walk candidate scoring.

use chrono::Duration;

use crate::domain::{Route, fractional_minutes};
use crate::spatial::Location;

/// A via-point with both of its legs estimated.
#[derive(Debug, Clone)]
pub struct DriveWalkCandidate {
    /// Position in the via-point list, used to break score ties.
    pub index: usize,
    pub via: Location,
    pub drive: Route,
    pub walk: Route,
}

impl DriveWalkCandidate {
    pub fn drive_duration(&self) -> Duration {
        self.drive.total_duration()
    }

    pub fn walk_duration(&self) -> Duration {
        self.walk.total_duration()
    }
}

/// Weights of the composite score.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub drive: f64,
    pub walk_deviation: f64,
}

/// A candidate and its composite score.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: DriveWalkCandidate,
    pub score: f64,
}

/// `drive · minutes(drive) + walk_deviation · |minutes(walk) − preferred|`.
///
/// Lower is better.
pub fn composite_score(
    drive: Duration,
    walk: Duration,
    preferred_walk_mins: f64,
    weights: ScoreWeights,
) -> f64 {
    weights.drive * fractional_minutes(drive)
        + weights.walk_deviation * (fractional_minutes(walk) - preferred_walk_mins).abs()
}

/// Score candidates and keep the best `limit`, best first.
///
/// Equal scores keep via-point order.
pub fn rank_candidates(
    candidates: Vec<DriveWalkCandidate>,
    preferred_walk_mins: f64,
    weights: ScoreWeights,
    limit: usize,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|candidate| {
            let score = composite_score(
                candidate.drive_duration(),
                candidate.walk_duration(),
                preferred_walk_mins,
                weights,
            );
            ScoredCandidate { candidate, score }
        })
        .collect();

    scored.sort_by(|a, b| {
        a.score
            .total_cmp(&b.score)
            .then(a.candidate.index.cmp(&b.candidate.index))
    });
    scored.truncate(limit);
    scored
}
