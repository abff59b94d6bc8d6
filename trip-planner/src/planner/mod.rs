//! Multimodal route planning.
//!
//! Single-mode legs come from [`RouteEstimator`](crate::estimator::RouteEstimator)s;
//! this module decides which legs to ask for and how to combine and rank
//! them. The main entry point is [`Composer`].

mod candidates;
mod compose;
mod config;
mod rank;


pub use candidates::{nearest_to, via_points};
pub use compose::{Composer, PlanError, RoutePreferences, RouteRequest};
pub use config::ComposerConfig;
pub use rank::{DriveWalkCandidate, ScoreWeights, ScoredCandidate, composite_score, rank_candidates};
