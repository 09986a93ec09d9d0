//! Graph engine.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use canvas_model::{Edge, Graph, Node};

/// Node id -> ids reachable by one outgoing edge, in first-seen edge order.
pub type Adjacency<'a> = HashMap<&'a str, Vec<&'a str>>;

/// Outcome of cycle detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub has_cycle: bool,
    /// Endpoints of the first back-edge found; empty when acyclic.
    pub cycle_nodes: Vec<String>,
}

/// Outcome of a topological sort.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologicalResult<'a> {
    /// Every node exactly once; empty when a cycle exists.
    pub order: Vec<&'a Node>,
    pub has_cycle: bool,
    pub cycle_nodes: Vec<String>,
}

impl<'a> TopologicalResult<'a> {
    pub fn ids(&self) -> Vec<&'a str> {
        self.order.iter().map(|n| n.id.as_str()).collect()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Stateless graph algorithms.
pub struct GraphEngine;

impl GraphEngine {
    /// Build the adjacency map for every node.
    ///
    /// Nodes without outgoing edges map to an empty list. Edges whose source
    /// is not a node are ignored; edges to a missing target are kept so the
    /// caller can still see them, but traversals skip unknown ids.
    pub fn adjacency(graph: &Graph) -> Adjacency<'_> {
        let mut adj: Adjacency<'_> = graph
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), Vec::new()))
            .collect();

        for edge in &graph.edges {
            if let Some(targets) = adj.get_mut(edge.from.as_str()) {
                if !targets.contains(&edge.to.as_str()) {
                    targets.push(edge.to.as_str());
                }
            }
        }

        adj
    }

    /// Three-colour depth-first cycle detection.
    ///
    /// Roots are visited in node insertion order and neighbours in edge
    /// order, which decides which cycle is reported when there are several.
    pub fn detect_cycle(graph: &Graph) -> CycleReport {
        let adj = Self::adjacency(graph);
        let mut color: HashMap<&str, Color> = graph
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), Color::White))
            .collect();

        for root in &graph.nodes {
            if color.get(root.id.as_str()) != Some(&Color::White) {
                continue;
            }

            // (node, index of the next neighbour to visit)
            let mut stack: Vec<(&str, usize)> = vec![(root.id.as_str(), 0)];
            color.insert(root.id.as_str(), Color::Gray);

            while let Some(frame) = stack.last_mut() {
                let (current, next) = *frame;
                let neighbors = adj.get(current).map(Vec::as_slice).unwrap_or(&[]);

                let Some(&neighbor) = neighbors.get(next) else {
                    color.insert(current, Color::Black);
                    stack.pop();
                    continue;
                };
                frame.1 += 1;

                match color.get(neighbor) {
                    Some(Color::Gray) => {
                        let mut cycle_nodes = vec![neighbor.to_string()];
                        if neighbor != current {
                            cycle_nodes.push(current.to_string());
                        }
                        debug!("Cycle detected via back-edge {} -> {}", current, neighbor);
                        return CycleReport {
                            has_cycle: true,
                            cycle_nodes,
                        };
                    }
                    Some(Color::White) => {
                        color.insert(neighbor, Color::Gray);
                        stack.push((neighbor, 0));
                    }
                    // Finished, or not a node at all.
                    _ => {}
                }
            }
        }

        CycleReport::default()
    }

    /// Kahn topological sort with lexicographic tie-breaking on node id.
    ///
    /// In-degree is counted on edge targets, so for every edge
    /// `(from, to)` the `from` node is emitted before `to`. On a cyclic
    /// graph the order is empty and the cycle witness is returned.
    pub fn topological_sort(graph: &Graph) -> TopologicalResult<'_> {
        let cycle = Self::detect_cycle(graph);
        if cycle.has_cycle {
            return TopologicalResult {
                order: Vec::new(),
                has_cycle: true,
                cycle_nodes: cycle.cycle_nodes,
            };
        }

        let adj = Self::adjacency(graph);
        let nodes: HashMap<&str, &Node> = graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();

        let mut in_degree: HashMap<&str, usize> = nodes.keys().map(|id| (*id, 0)).collect();
        for targets in adj.values() {
            for target in targets {
                if let Some(degree) = in_degree.get_mut(target) {
                    *degree += 1;
                }
            }
        }

        let mut ready: BTreeSet<&str> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(id, _)| *id)
            .collect();

        let mut order = Vec::with_capacity(graph.nodes.len());
        while let Some(current) = ready.pop_first() {
            if let Some(node) = nodes.get(current) {
                order.push(*node);
            }
            for target in adj.get(current).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(target) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert(*target);
                    }
                }
            }
        }

        TopologicalResult {
            order,
            has_cycle: false,
            cycle_nodes: Vec::new(),
        }
    }

    /// Nodes sharing an edge with `node_id` in either direction, in node order.
    pub fn connected_nodes<'a>(graph: &'a Graph, node_id: &str) -> Vec<&'a Node> {
        let mut connected: HashSet<&str> = HashSet::new();
        for edge in &graph.edges {
            if edge.from == node_id {
                connected.insert(edge.to.as_str());
            }
            if edge.to == node_id {
                connected.insert(edge.from.as_str());
            }
        }
        graph
            .nodes
            .iter()
            .filter(|n| connected.contains(n.id.as_str()))
            .collect()
    }

    /// Edges between two nodes in either direction.
    pub fn edges_between<'a>(graph: &'a Graph, a: &str, b: &str) -> Vec<&'a Edge> {
        graph
            .edges
            .iter()
            .filter(|e| (e.from == a && e.to == b) || (e.from == b && e.to == a))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_model::{EdgeRelationship, ResourceKind};

    fn node(id: &str) -> Node {
        Node::new(ResourceKind::PubsubTopic, id).with_id(id)
    }

    fn edge(from: &str, to: &str) -> Edge {
        Edge::new(from, to, EdgeRelationship::DependsOn)
    }

    #[test]
    fn test_adjacency_includes_isolated_nodes() {
        let graph = Graph::new()
            .with_node(node("a"))
            .with_node(node("b"))
            .with_edge(edge("a", "b"))
            .with_edge(edge("ghost", "a"));

        let adj = GraphEngine::adjacency(&graph);
        assert_eq!(adj["a"], vec!["b"]);
        assert!(adj["b"].is_empty());
        assert!(!adj.contains_key("ghost"));
    }

    #[test]
    fn test_reverse_edge_pair_is_a_cycle() {
        let graph = Graph::new()
            .with_node(node("a"))
            .with_node(node("b"))
            .with_edge(edge("a", "b"))
            .with_edge(edge("b", "a"));

        let report = GraphEngine::detect_cycle(&graph);
        assert!(report.has_cycle);
        assert_eq!(report.cycle_nodes, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_diamond_is_acyclic() {
        let graph = Graph::new()
            .with_node(node("a"))
            .with_node(node("b"))
            .with_node(node("c"))
            .with_node(node("d"))
            .with_edge(edge("a", "b"))
            .with_edge(edge("a", "c"))
            .with_edge(edge("b", "d"))
            .with_edge(edge("c", "d"));

        assert!(!GraphEngine::detect_cycle(&graph).has_cycle);
        assert_eq!(GraphEngine::topological_sort(&graph).ids(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_sort_tie_breaks_lexicographically() {
        let graph = Graph::new()
            .with_node(node("z"))
            .with_node(node("m"))
            .with_node(node("a"))
            .with_edge(edge("z", "a"));

        // m and z are ready first; m < z. a only after z.
        assert_eq!(GraphEngine::topological_sort(&graph).ids(), vec!["m", "z", "a"]);
    }

    #[test]
    fn test_sort_independent_of_edge_order() {
        let edges = vec![edge("a", "b"), edge("c", "b"), edge("b", "d"), edge("a", "d")];
        let nodes = || {
            Graph::new()
                .with_node(node("c"))
                .with_node(node("a"))
                .with_node(node("d"))
                .with_node(node("b"))
        };

        let forward = edges.iter().cloned().fold(nodes(), Graph::with_edge);
        let reversed = edges.iter().rev().cloned().fold(nodes(), Graph::with_edge);

        let order = GraphEngine::topological_sort(&forward).ids();
        assert_eq!(order, GraphEngine::topological_sort(&reversed).ids());
        assert_eq!(order, vec!["a", "c", "b", "d"]);

        let mut all = order.clone();
        all.sort_unstable();
        assert_eq!(all, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_sort_ignores_dangling_edges() {
        let graph = Graph::new()
            .with_node(node("a"))
            .with_node(node("b"))
            .with_edge(edge("ghost", "a"))
            .with_edge(edge("b", "missing"));

        let result = GraphEngine::topological_sort(&graph);
        assert!(!result.has_cycle);
        assert_eq!(result.ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_sort_on_cycle_returns_empty_order() {
        let graph = Graph::new()
            .with_node(node("a"))
            .with_node(node("b"))
            .with_node(node("c"))
            .with_edge(edge("a", "b"))
            .with_edge(edge("b", "c"))
            .with_edge(edge("c", "a"));

        let result = GraphEngine::topological_sort(&graph);
        assert!(result.has_cycle);
        assert!(result.order.is_empty());
        assert_eq!(result.cycle_nodes.len(), 2);
    }

    #[test]
    fn test_neighbor_queries() {
        let graph = Graph::new()
            .with_node(node("a"))
            .with_node(node("b"))
            .with_node(node("c"))
            .with_edge(edge("a", "b"))
            .with_edge(edge("c", "a"))
            .with_edge(edge("b", "a"));

        let connected: Vec<_> = GraphEngine::connected_nodes(&graph, "a")
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(connected, vec!["b", "c"]);
        assert_eq!(GraphEngine::edges_between(&graph, "b", "a").len(), 2);
        assert!(GraphEngine::edges_between(&graph, "b", "c").is_empty());
    }
}
