//! Time-bounded reachability.

use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::Graph;
use super::astar::FrontierEntry;
use super::model::Edge;
use crate::domain::{DEFAULT_SPEED_KMH, NodeId};

impl Graph {
    /// Every node reachable from `start` within `max_secs`, with its earliest
    /// arrival time in seconds.
    ///
    /// Edges without a positive travel time are costed at
    /// [`DEFAULT_SPEED_KMH`] over their length.
    pub fn nodes_within(&self, start: NodeId, max_secs: f64) -> HashMap<NodeId, f64> {
        self.nodes_within_at(start, max_secs, DEFAULT_SPEED_KMH)
    }

    /// As [`Graph::nodes_within`], costing untimed edges at
    /// `fallback_speed_kmh` instead.
    ///
    /// `start` is always in the result at 0 when it is a known node. Edges
    /// whose cost cannot be computed are not traversed.
    pub fn nodes_within_at(
        &self,
        start: NodeId,
        max_secs: f64,
        fallback_speed_kmh: f64,
    ) -> HashMap<NodeId, f64> {
        let mut arrival: HashMap<NodeId, f64> = HashMap::new();
        if !self.contains(start) {
            return arrival;
        }

        let mut frontier = BinaryHeap::new();
        let mut settled: HashSet<NodeId> = HashSet::new();
        arrival.insert(start, 0.0);
        frontier.push(FrontierEntry {
            f_score: 0.0,
            node: start,
        });

        while let Some(FrontierEntry { f_score, node }) = frontier.pop() {
            if !settled.insert(node) {
                continue;
            }
            for edge in self.neighbors(node) {
                if !self.contains(edge.to) || settled.contains(&edge.to) {
                    continue;
                }
                let Some(cost) = edge_cost(edge, fallback_speed_kmh) else {
                    continue;
                };
                let reached = f_score + cost;
                if reached > max_secs {
                    continue;
                }
                let improved = match arrival.entry(edge.to) {
                    Entry::Occupied(mut known) if reached < *known.get() => {
                        known.insert(reached);
                        true
                    }
                    Entry::Occupied(_) => false,
                    Entry::Vacant(slot) => {
                        slot.insert(reached);
                        true
                    }
                };
                if improved {
                    frontier.push(FrontierEntry {
                        f_score: reached,
                        node: edge.to,
                    });
                }
            }
        }

        arrival
    }
}

fn edge_cost(edge: &Edge, fallback_speed_kmh: f64) -> Option<f64> {
    let secs = if edge.travel_time_s > 0.0 {
        edge.travel_time_s
    } else {
        edge.length_m / (fallback_speed_kmh / 3.6)
    };
    (secs.is_finite() && secs >= 0.0).then_some(secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;

    // 1 -> 2 -> 3 -> 4 at 60 s a hop, plus an untimed 500 m shortcut 1 -> 3
    fn street() -> Graph {
        let mut graph = Graph::new();
        for id in 1..=4 {
            graph.add_node(Node::new(NodeId(id), 45.5 + id as f64 * 0.001, -73.57));
        }
        graph.add_edge(Edge::new(NodeId(1), NodeId(2), 60.0));
        graph.add_edge(Edge::new(NodeId(2), NodeId(3), 60.0));
        graph.add_edge(Edge::new(NodeId(3), NodeId(4), 60.0));
        graph.add_edge(Edge::new(NodeId(1), NodeId(3), 0.0).with_length(500.0));
        graph
    }

    #[test]
    fn bounded_by_time() {
        let graph = street();
        let reached = graph.nodes_within(NodeId(2), 90.0);
        assert_eq!(reached.len(), 2);
        assert_eq!(reached[&NodeId(2)], 0.0);
        assert_eq!(reached[&NodeId(3)], 60.0);
        assert!(!reached.contains_key(&NodeId(1)));
    }

    #[test]
    fn untimed_edges_use_fallback_speed() {
        let graph = street();
        // 500 m at 50 km/h is 36 s, beating 120 s through node 2
        let reached = graph.nodes_within(NodeId(1), 100.0);
        assert!((reached[&NodeId(3)] - 36.0).abs() < 1e-9);
        assert!((reached[&NodeId(4)] - 96.0).abs() < 1e-9);
        assert_eq!(reached[&NodeId(2)], 60.0);

        // at walking pace the shortcut is slower than the timed route
        let walking = graph.nodes_within_at(NodeId(1), 1000.0, 5.0);
        assert_eq!(walking[&NodeId(3)], 120.0);

        let stalled = graph.nodes_within_at(NodeId(1), 1000.0, 0.0);
        assert_eq!(stalled[&NodeId(3)], 120.0);
    }

    #[test]
    fn limit_is_inclusive() {
        let graph = street();
        let reached = graph.nodes_within(NodeId(2), 120.0);
        assert_eq!(reached[&NodeId(4)], 120.0);
    }

    #[test]
    fn unknown_start_and_zero_budget() {
        let graph = street();
        assert!(graph.nodes_within(NodeId(99), 1000.0).is_empty());
        let reached = graph.nodes_within(NodeId(1), 0.0);
        assert_eq!(reached.len(), 1);
        assert_eq!(reached[&NodeId(1)], 0.0);
    }

    #[test]
    fn agrees_with_astar_on_timed_edges() {
        let mut graph = Graph::new();
        for id in 1..=4 {
            graph.add_node(Node::new(NodeId(id), 45.5 + id as f64 * 0.001, -73.57));
        }
        graph.add_edge(Edge::new(NodeId(1), NodeId(2), 30.0));
        graph.add_edge(Edge::new(NodeId(1), NodeId(3), 90.0));
        graph.add_edge(Edge::new(NodeId(2), NodeId(3), 40.0));
        graph.add_edge(Edge::new(NodeId(3), NodeId(4), 15.0));

        let reached = graph.nodes_within(NodeId(1), f64::INFINITY);
        assert_eq!(reached.len(), 4);
        for goal in 2..=4 {
            let (_, cost) = graph.astar_with_cost(NodeId(1), NodeId(goal)).unwrap();
            assert_eq!(reached[&NodeId(goal)], cost);
        }
    }
}
