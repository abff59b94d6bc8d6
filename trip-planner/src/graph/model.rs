//! In-memory transport graph.

use std::collections::HashMap;

use crate::domain::{NodeId, TransportMode};
use crate::spatial::{Coords, haversine_m};

/// A graph vertex: an intersection, stop or dock.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub latitude: f64,
    pub longitude: f64,
    /// Number of streets meeting at this node.
    pub street_count: u32,
}

impl Node {
    pub fn new(id: NodeId, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            latitude,
            longitude,
            street_count: 0,
        }
    }

    pub fn coords(&self) -> Coords {
        (self.latitude, self.longitude)
    }
}

/// A directed edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    /// Length in meters.
    pub length_m: f64,
    pub max_speed_kmh: f64,
    /// Traversal cost in seconds. This is the search weight.
    pub travel_time_s: f64,
    pub traffic_multiplier: f64,
    pub mode: Option<TransportMode>,
    pub name: Option<String>,
}

impl Edge {
    /// An edge with the given cost and neutral defaults elsewhere.
    pub fn new(from: NodeId, to: NodeId, travel_time_s: f64) -> Self {
        Self {
            from,
            to,
            length_m: 0.0,
            max_speed_kmh: crate::domain::DEFAULT_SPEED_KMH,
            travel_time_s,
            traffic_multiplier: 1.0,
            mode: None,
            name: None,
        }
    }

    pub fn with_length(mut self, length_m: f64) -> Self {
        self.length_m = length_m;
        self
    }
}

/// Totals along a node path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathMetrics {
    pub travel_time_s: f64,
    pub length_m: f64,
}

/// A directed multigraph over [`NodeId`]s.
///
/// Built once by the loader and read-only afterwards. Edges may point at ids
/// with no node entry; the search treats those as unreachable.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: HashMap<NodeId, Node>,
    adjacency: HashMap<NodeId, Vec<Edge>>,
    modes: Vec<TransportMode>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, replacing any previous node with the same id.
    pub fn add_node(&mut self, node: Node) {
        self.nodes.insert(node.id, node);
    }

    /// Append an edge to its source's adjacency list.
    pub fn add_edge(&mut self, edge: Edge) {
        self.adjacency.entry(edge.from).or_default().push(edge);
    }

    pub fn set_modes(&mut self, modes: Vec<TransportMode>) {
        self.modes = modes;
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Outgoing edges of `id`, empty if it has none.
    pub fn neighbors(&self, id: NodeId) -> &[Edge] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Modes declared by the source document.
    pub fn modes(&self) -> &[TransportMode] {
        &self.modes
    }

    /// The node closest to `(latitude, longitude)` and its distance in
    /// meters. Equidistant nodes resolve to the lowest id.
    pub fn nearest_node(&self, latitude: f64, longitude: f64) -> Option<(NodeId, f64)> {
        self.nodes
            .values()
            .map(|node| (node.id, haversine_m((latitude, longitude), node.coords())))
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
    }

    /// Sum travel time and length along `path`.
    ///
    /// Between consecutive nodes the fastest parallel edge is used. Returns
    /// `None` if any hop has no edge. A single-node or empty path has zero
    /// totals.
    pub fn path_metrics(&self, path: &[NodeId]) -> Option<PathMetrics> {
        let mut metrics = PathMetrics {
            travel_time_s: 0.0,
            length_m: 0.0,
        };
        for hop in path.windows(2) {
            let edge = self
                .neighbors(hop[0])
                .iter()
                .filter(|e| e.to == hop[1])
                .min_by(|a, b| a.travel_time_s.total_cmp(&b.travel_time_s))?;
            metrics.travel_time_s += edge.travel_time_s;
            metrics.length_m += edge.length_m;
        }
        Some(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        let mut graph = Graph::new();
        for id in 1..=3 {
            graph.add_node(Node::new(NodeId(id), 45.0, -73.0 + id as f64 * 0.001));
        }
        graph.add_edge(Edge::new(NodeId(1), NodeId(2), 10.0).with_length(100.0));
        graph.add_edge(Edge::new(NodeId(1), NodeId(2), 7.0).with_length(120.0));
        graph.add_edge(Edge::new(NodeId(2), NodeId(3), 5.0).with_length(50.0));
        graph
    }

    #[test]
    fn counts_and_lookup() {
        let graph = triangle();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.contains(NodeId(2)));
        assert!(!graph.contains(NodeId(4)));
        assert_eq!(graph.neighbors(NodeId(1)).len(), 2);
        assert!(graph.neighbors(NodeId(3)).is_empty());
        assert!(graph.neighbors(NodeId(99)).is_empty());
    }

    #[test]
    fn path_metrics_picks_fastest_parallel_edge() {
        let graph = triangle();
        let metrics = graph
            .path_metrics(&[NodeId(1), NodeId(2), NodeId(3)])
            .unwrap();
        assert_eq!(metrics.travel_time_s, 12.0);
        assert_eq!(metrics.length_m, 170.0);
    }

    #[test]
    fn nearest_node_snaps_to_closest() {
        let graph = triangle();
        let (id, dist) = graph.nearest_node(45.0001, -72.9979).unwrap();
        assert_eq!(id, NodeId(2));
        assert!(dist > 10.0 && dist < 15.0, "{dist}");

        let (id, dist) = graph.nearest_node(45.0, -72.997).unwrap();
        assert_eq!(id, NodeId(3));
        assert!(dist < 1e-6);
    }

    #[test]
    fn nearest_node_ties_and_empty() {
        let mut graph = Graph::new();
        graph.add_node(Node::new(NodeId(9), 45.001, -73.0));
        graph.add_node(Node::new(NodeId(4), 45.001, -73.0));
        graph.add_node(Node::new(NodeId(7), 45.002, -73.0));
        assert_eq!(graph.nearest_node(45.0, -73.0).unwrap().0, NodeId(4));
        assert!(Graph::new().nearest_node(45.0, -73.0).is_none());
    }

    #[test]
    fn path_metrics_missing_hop() {
        let graph = triangle();
        assert!(graph.path_metrics(&[NodeId(3), NodeId(1)]).is_none());
    }

    #[test]
    fn path_metrics_trivial_paths() {
        let graph = triangle();
        let single = graph.path_metrics(&[NodeId(1)]).unwrap();
        assert_eq!(single.travel_time_s, 0.0);
        assert_eq!(graph.path_metrics(&[]).unwrap().length_m, 0.0);
    }
}
