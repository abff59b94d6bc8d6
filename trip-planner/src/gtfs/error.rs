//! GTFS loading and query errors.

use std::path::PathBuf;

/// Errors from loading or querying a [`GtfsIndex`](super::GtfsIndex).
#[derive(Debug, Clone, thiserror::Error)]
pub enum GtfsError {
    /// A feed file is missing or unreadable.
    #[error("failed to load {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    /// No trip serves the stop.
    #[error("no trips contain stop {0}")]
    NoTripForStop(String),

    /// The trip has no stop times.
    #[error("trip {0} has no stop times")]
    NoPattern(String),

    /// The stop is not visited by the trip.
    #[error("stop {stop} not in trip {trip}")]
    StopNotInTrip { stop: String, trip: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = GtfsError::NoTripForStop("S1".into());
        assert_eq!(err.to_string(), "no trips contain stop S1");

        let err = GtfsError::NoPattern("T9".into());
        assert_eq!(err.to_string(), "trip T9 has no stop times");

        let err = GtfsError::StopNotInTrip {
            stop: "S1".into(),
            trip: "T9".into(),
        };
        assert_eq!(err.to_string(), "stop S1 not in trip T9");

        let err = GtfsError::Load {
            path: PathBuf::from("feed/stops.txt"),
            message: "missing header".into(),
        };
        assert_eq!(err.to_string(), "failed to load feed/stops.txt: missing header");
    }
}
