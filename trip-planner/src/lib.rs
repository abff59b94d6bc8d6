//! Multimodal trip planner core.
//!
//! Answers: "how do I get from here to there, driving part of the way and
//! walking the rest?" Also loads transport graphs for A* search and indexes
//! static GTFS feeds.

pub mod cache;
pub mod config;
pub mod domain;
pub mod estimator;
pub mod graph;
pub mod gtfs;
pub mod planner;
pub mod spatial;
