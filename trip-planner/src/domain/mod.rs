//! Domain types for the trip planner.
//!
//! Upstream data arrives in loosely-typed shapes (IDs that may be numbers or
//! strings, speeds that may be lists). This module normalizes them once at
//! the ingestion boundary so the rest of the crate works with strong types.

mod ids;
mod mode;
mod route;
mod speed;

pub use ids::{NodeId, RawId, parse_id_str};
pub use mode::TransportMode;
pub use route::{Route, RouteSegment, duration_from_secs, fractional_minutes};
pub use speed::{DEFAULT_SPEED_KMH, RawSpeed, parse_speed_str};
