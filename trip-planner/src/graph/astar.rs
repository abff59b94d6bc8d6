//! A* search over travel time.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::{Graph, GraphError};
use crate::domain::NodeId;
use crate::spatial::equirectangular_km;

/// Reference speed for the heuristic, in km/h.
///
/// Must be at least the fastest effective speed of any edge in the graph for
/// the heuristic to stay admissible.
pub const HEURISTIC_SPEED_KMH: f64 = 100.0;

#[derive(Debug, Clone, Copy)]
pub(super) struct FrontierEntry {
    pub(super) f_score: f64,
    pub(super) node: NodeId,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the BinaryHeap pops the lowest f first
        other.f_score.total_cmp(&self.f_score)
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Graph {
    /// Estimated seconds from `from` to `to`.
    ///
    /// Zero when either node is unknown.
    pub fn heuristic(&self, from: NodeId, to: NodeId) -> f64 {
        match (self.node(from), self.node(to)) {
            (Some(a), Some(b)) => {
                let km = equirectangular_km(a.coords(), b.coords());
                km / HEURISTIC_SPEED_KMH * 3600.0
            }
            _ => 0.0,
        }
    }

    /// Fastest path from `start` to `goal`, inclusive of both ends.
    pub fn astar(&self, start: NodeId, goal: NodeId) -> Result<Vec<NodeId>, GraphError> {
        self.astar_with_cost(start, goal).map(|(path, _)| path)
    }

    /// Fastest path and its total travel time in seconds.
    pub fn astar_with_cost(
        &self,
        start: NodeId,
        goal: NodeId,
    ) -> Result<(Vec<NodeId>, f64), GraphError> {
        let no_path = GraphError::NoPathFound { start, goal };
        if !self.contains(start) || !self.contains(goal) {
            return Err(no_path);
        }

        let mut frontier = BinaryHeap::new();
        let mut g_score: HashMap<NodeId, f64> = HashMap::new();
        let mut came_from: HashMap<NodeId, NodeId> = HashMap::new();
        let mut closed: HashSet<NodeId> = HashSet::new();

        g_score.insert(start, 0.0);
        frontier.push(FrontierEntry {
            f_score: self.heuristic(start, goal),
            node: start,
        });

        while let Some(FrontierEntry { node: current, .. }) = frontier.pop() {
            if current == goal {
                let cost = g_score.get(&goal).copied().unwrap_or(0.0);
                return Ok((reconstruct(&came_from, goal), cost));
            }
            // Stale entry for a node already expanded
            if !closed.insert(current) {
                continue;
            }

            let current_g = g_score.get(&current).copied().unwrap_or(f64::INFINITY);
            for edge in self.neighbors(current) {
                let next = edge.to;
                if !self.contains(next) || closed.contains(&next) {
                    continue;
                }

                let tentative = current_g + edge.travel_time_s;
                if g_score.get(&next).is_none_or(|&known| tentative < known) {
                    g_score.insert(next, tentative);
                    came_from.insert(next, current);
                    frontier.push(FrontierEntry {
                        f_score: tentative + self.heuristic(next, goal),
                        node: next,
                    });
                }
            }
        }

        Err(no_path)
    }
}

fn reconstruct(came_from: &HashMap<NodeId, NodeId>, goal: NodeId) -> Vec<NodeId> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node};

    fn node(id: i64, lat: f64, lon: f64) -> Node {
        Node::new(NodeId(id), lat, lon)
    }

    fn chain() -> Graph {
        let mut graph = Graph::new();
        graph.add_node(node(1, 45.5000, -73.5700));
        graph.add_node(node(2, 45.5010, -73.5700));
        graph.add_node(node(3, 45.5020, -73.5700));
        graph.add_edge(Edge::new(NodeId(1), NodeId(2), 10.0));
        graph.add_edge(Edge::new(NodeId(2), NodeId(3), 10.0));
        graph
    }

    #[test]
    fn finds_chain_path() {
        let graph = chain();
        let (path, cost) = graph.astar_with_cost(NodeId(1), NodeId(3)).unwrap();
        assert_eq!(path, vec![NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(cost, 20.0);
    }

    #[test]
    fn path_to_self_is_single_node() {
        let graph = chain();
        let (path, cost) = graph.astar_with_cost(NodeId(2), NodeId(2)).unwrap();
        assert_eq!(path, vec![NodeId(2)]);
        assert_eq!(cost, 0.0);
    }

    #[test]
    fn edges_are_directed() {
        let graph = chain();
        let err = graph.astar(NodeId(3), NodeId(1)).unwrap_err();
        assert!(matches!(
            err,
            GraphError::NoPathFound { start: NodeId(3), goal: NodeId(1) }
        ));
    }

    #[test]
    fn unknown_endpoints_fail() {
        let graph = chain();
        assert!(graph.astar(NodeId(1), NodeId(99)).is_err());
        assert!(graph.astar(NodeId(99), NodeId(1)).is_err());
        assert!(graph.astar(NodeId(99), NodeId(99)).is_err());
    }

    #[test]
    fn prefers_cheaper_detour() {
        let mut graph = chain();
        graph.add_node(node(4, 45.5010, -73.5690));
        graph.add_edge(Edge::new(NodeId(1), NodeId(3), 50.0));
        graph.add_edge(Edge::new(NodeId(1), NodeId(4), 3.0));
        graph.add_edge(Edge::new(NodeId(4), NodeId(3), 3.0));

        let (path, cost) = graph.astar_with_cost(NodeId(1), NodeId(3)).unwrap();
        assert_eq!(path, vec![NodeId(1), NodeId(4), NodeId(3)]);
        assert_eq!(cost, 6.0);
    }

    #[test]
    fn uses_cheapest_parallel_edge() {
        let mut graph = chain();
        graph.add_edge(Edge::new(NodeId(1), NodeId(2), 4.0));
        let (_, cost) = graph.astar_with_cost(NodeId(1), NodeId(3)).unwrap();
        assert_eq!(cost, 14.0);
    }

    #[test]
    fn dangling_edges_are_skipped() {
        let mut graph = chain();
        graph.add_edge(Edge::new(NodeId(1), NodeId(42), 1.0));
        graph.add_edge(Edge::new(NodeId(42), NodeId(3), 1.0));
        let path = graph.astar(NodeId(1), NodeId(3)).unwrap();
        assert_eq!(path, vec![NodeId(1), NodeId(2), NodeId(3)]);
    }

    #[test]
    fn heuristic_is_zero_for_unknown_nodes() {
        let graph = chain();
        assert_eq!(graph.heuristic(NodeId(1), NodeId(42)), 0.0);
        assert_eq!(graph.heuristic(NodeId(1), NodeId(1)), 0.0);
    }

    #[test]
    fn heuristic_never_exceeds_edge_cost_at_reference_speed() {
        let graph = chain();
        // 0.001 deg of latitude is ~111 m, about 4 s at 100 km/h
        let h = graph.heuristic(NodeId(1), NodeId(2));
        assert!(h > 3.9 && h < 4.1, "got {h}");
    }
}
