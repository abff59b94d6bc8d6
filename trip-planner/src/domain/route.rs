//! Route types.
//!
//! A `Route` is the planner's output: an ordered list of single-mode
//! segments from an origin to a destination, with running totals.

use chrono::Duration;

use super::TransportMode;
use crate::spatial::Location;

/// One single-mode leg of a route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSegment {
    pub mode: TransportMode,
    pub origin: Location,
    pub destination: Location,
    pub duration: Duration,
    /// Distance in meters.
    pub distance_m: f64,
    pub instructions: Option<String>,
    /// Encoded polyline, when the estimator supplies one.
    pub geometry: Option<String>,
}

impl RouteSegment {
    /// Creates a segment without instructions or geometry.
    pub fn new(
        mode: TransportMode,
        origin: Location,
        destination: Location,
        duration: Duration,
        distance_m: f64,
    ) -> Self {
        Self {
            mode,
            origin,
            destination,
            duration,
            distance_m,
            instructions: None,
            geometry: None,
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_geometry(mut self, geometry: Option<String>) -> Self {
        self.geometry = geometry;
        self
    }
}

/// A complete route from origin to destination.
///
/// Segments can only be appended; totals and the mode list are kept in step
/// with them.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub id: String,
    pub origin: Location,
    pub destination: Location,
    segments: Vec<RouteSegment>,
    total_duration: Duration,
    distance_m: f64,
    modes: Vec<TransportMode>,
}

impl Route {
    /// Creates an empty route.
    pub fn new(id: impl Into<String>, origin: Location, destination: Location) -> Self {
        Self {
            id: id.into(),
            origin,
            destination,
            segments: Vec::new(),
            total_duration: Duration::zero(),
            distance_m: 0.0,
            modes: Vec::new(),
        }
    }

    /// Creates a route made of a single segment.
    pub fn single(id: impl Into<String>, segment: RouteSegment) -> Self {
        let mut route = Self::new(id, segment.origin.clone(), segment.destination.clone());
        route.push_segment(segment);
        route
    }

    /// Appends a segment, updating totals and the mode list.
    pub fn push_segment(&mut self, segment: RouteSegment) {
        self.total_duration += segment.duration;
        self.distance_m += segment.distance_m;
        if !self.modes.contains(&segment.mode) {
            self.modes.push(segment.mode);
        }
        self.segments.push(segment);
    }

    /// Adds time not attributable to any segment (parking, alighting).
    pub fn add_overhead(&mut self, overhead: Duration) {
        self.total_duration += overhead;
    }

    pub fn segments(&self) -> &[RouteSegment] {
        &self.segments
    }

    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    /// Total distance in meters.
    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }

    /// Modes in order of first appearance.
    pub fn modes(&self) -> &[TransportMode] {
        &self.modes
    }

    /// Summed duration of all segments using `mode`.
    pub fn duration_for(&self, mode: TransportMode) -> Duration {
        self.segments
            .iter()
            .filter(|s| s.mode == mode)
            .fold(Duration::zero(), |acc, s| acc + s.duration)
    }

    /// Geometry of the first segment that has one.
    pub fn geometry(&self) -> Option<&str> {
        self.segments.iter().find_map(|s| s.geometry.as_deref())
    }
}

/// Converts fractional seconds to a `Duration` at millisecond precision.
///
/// Negative and non-finite inputs become zero.
pub fn duration_from_secs(secs: f64) -> Duration {
    if !secs.is_finite() || secs <= 0.0 {
        return Duration::zero();
    }
    Duration::milliseconds((secs * 1000.0).round() as i64)
}

/// A duration in fractional minutes.
pub fn fractional_minutes(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / 60_000.0
}
