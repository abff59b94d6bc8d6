//! Transport graph: model, loaders and pathfinding.
//!
//! A [`Graph`] is loaded once from a node-link JSON document and then shared
//! read-only (typically behind an `Arc`) between requests. Each call to
//! [`Graph::astar`] or [`Graph::nodes_within`] allocates its own search
//! state.

mod astar;
mod error;
mod loader;
mod model;
mod reach;

pub use astar::HEURISTIC_SPEED_KMH;
pub use error::GraphError;
pub use loader::{load_graph_from_file, load_graph_from_json, load_graphs_from_directory};
pub use model::{Edge, Graph, Node, PathMetrics};
