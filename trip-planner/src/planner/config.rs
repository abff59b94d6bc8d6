//! Composer configuration.

use chrono::Duration;

/// Tuning parameters for drive-then-walk composition.
#[derive(Debug, Clone)]
pub struct ComposerConfig {
    /// Average walking speed (km/h), used to size the via-point rings.
    pub walking_speed_kmh: f64,

    /// Ring radii as fractions of the walking radius.
    pub ring_fractions: Vec<f64>,

    /// Points sampled on each ring.
    pub ring_samples: usize,

    /// Via-points kept after filtering by distance to the origin.
    pub candidate_count: usize,

    /// Maximum number of composed routes to return.
    pub max_results: usize,

    /// Weight of drive minutes in the composite score.
    pub drive_weight: f64,

    /// Weight of the walk's deviation from the preferred duration.
    pub walk_deviation_weight: f64,

    /// Time to park and switch modes (minutes).
    pub transition_overhead_mins: i64,

    /// Accepted relative deviation from the walk budget when finishing a
    /// route.
    pub finish_tolerance: f64,

    /// Walk limit used when the request sets none (minutes).
    pub default_max_walk_mins: i64,

    /// Candidates evaluated at once.
    pub concurrency: usize,

    /// Timeout for a single estimator call (seconds).
    pub leg_timeout_secs: u64,
}

impl ComposerConfig {
    /// Set the number of candidates evaluated at once.
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n;
        self
    }

    /// Set the per-leg timeout.
    pub fn with_leg_timeout(mut self, secs: u64) -> Self {
        self.leg_timeout_secs = secs;
        self
    }

    pub fn with_walking_speed(mut self, kmh: f64) -> Self {
        self.walking_speed_kmh = kmh;
        self
    }

    pub fn with_max_results(mut self, n: usize) -> Self {
        self.max_results = n;
        self
    }

    /// Returns the transition overhead as a Duration.
    pub fn transition_overhead(&self) -> Duration {
        Duration::minutes(self.transition_overhead_mins)
    }

    /// Returns the per-leg timeout as a std Duration, for `tokio::time`.
    pub fn leg_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.leg_timeout_secs)
    }

    /// Meters walkable in `minutes` at the configured speed.
    pub fn walk_radius_m(&self, minutes: f64) -> f64 {
        minutes / 60.0 * self.walking_speed_kmh * 1000.0
    }
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            walking_speed_kmh: 4.8,
            ring_fractions: vec![0.9, 1.0],
            ring_samples: 20,
            candidate_count: 5,
            max_results: 3,
            drive_weight: 0.6,
            walk_deviation_weight: 0.4,
            transition_overhead_mins: 5,
            finish_tolerance: 0.2,
            default_max_walk_mins: 10,
            concurrency: 5,
            leg_timeout_secs: 10,
        }
    }
}
