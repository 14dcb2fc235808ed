//! Weighted, undirected entity co-occurrence graph

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// An entity node, keyed by its exact surface text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Exact mention text (case- and whitespace-sensitive)
    pub text: String,

    /// Category tag of the mention that first created this node
    pub label: String,
}

/// Edge payload: number of co-occurrences between two entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooccurrence {
    pub weight: u32,
}

/// Entity graph with at most one edge per unordered pair and no self-loops
///
/// Nodes keep insertion order, which downstream stages rely on for
/// reproducible output.
#[derive(Debug, Clone, Default)]
pub struct CooccurrenceGraph {
    graph: UnGraph<Entity, Cooccurrence>,
    index: HashMap<String, NodeIndex>,
}

impl CooccurrenceGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with pre-allocated capacity
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: UnGraph::with_capacity(nodes, edges),
            index: HashMap::with_capacity(nodes),
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, text: &str) -> bool {
        self.index.contains_key(text)
    }

    /// Label stored for an entity
    pub fn label(&self, text: &str) -> Option<&str> {
        self.index
            .get(text)
            .map(|&idx| self.graph[idx].label.as_str())
    }

    /// Weight of the edge between two entities, if they co-occurred
    pub fn weight(&self, a: &str, b: &str) -> Option<u32> {
        let (&ia, &ib) = (self.index.get(a)?, self.index.get(b)?);
        self.graph.find_edge(ia, ib).map(|e| self.graph[e].weight)
    }

    /// Get or create a node; an existing node keeps its original label
    pub fn ensure_node(&mut self, text: &str, label: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(text) {
            return idx;
        }

        let idx = self.graph.add_node(Entity {
            text: text.to_string(),
            label: label.to_string(),
        });
        self.index.insert(text.to_string(), idx);
        idx
    }

    /// Add `amount` to the edge between two distinct nodes, creating it if needed
    ///
    /// Returns `None` (and does nothing) for a self-pair.
    pub fn add_weight(&mut self, a: NodeIndex, b: NodeIndex, amount: u32) -> Option<EdgeIndex> {
        if a == b {
            return None;
        }

        match self.graph.find_edge(a, b) {
            Some(edge) => {
                self.graph[edge].weight += amount;
                Some(edge)
            }
            None => Some(self.graph.add_edge(a, b, Cooccurrence { weight: amount })),
        }
    }

    /// Entities in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Edges as `(endpoint, endpoint, weight)` in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, u32)> + '_ {
        self.graph.edge_references().map(move |e| {
            (
                self.graph[e.source()].text.as_str(),
                self.graph[e.target()].text.as_str(),
                e.weight().weight,
            )
        })
    }

    /// Edges keyed by their lexicographically ordered endpoint pair
    ///
    /// Independent of insertion order, so two graphs built from the same
    /// co-occurrences compare equal.
    pub fn edge_map(&self) -> BTreeMap<(String, String), u32> {
        self.edges()
            .map(|(a, b, w)| {
                let key = if a <= b {
                    (a.to_string(), b.to_string())
                } else {
                    (b.to_string(), a.to_string())
                };
                (key, w)
            })
            .collect()
    }

    /// Nodes keyed by text, with their labels
    pub fn node_map(&self) -> BTreeMap<String, String> {
        self.nodes()
            .map(|e| (e.text.clone(), e.label.clone()))
            .collect()
    }

    /// Direct access to the underlying petgraph structure
    pub fn inner(&self) -> &UnGraph<Entity, Cooccurrence> {
        &self.graph
    }

    pub fn node_index(&self, text: &str) -> Option<NodeIndex> {
        self.index.get(text).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_label_wins() {
        let mut g = CooccurrenceGraph::new();
        let a = g.ensure_node("Paris", "GPE");
        let again = g.ensure_node("Paris", "PERSON");
        assert_eq!(a, again);
        assert_eq!(g.label("Paris"), Some("GPE"));
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn weight_accumulates_on_one_edge() {
        let mut g = CooccurrenceGraph::new();
        let a = g.ensure_node("A", "X");
        let b = g.ensure_node("B", "X");
        g.add_weight(a, b, 1);
        g.add_weight(b, a, 1);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.weight("A", "B"), Some(2));
        assert_eq!(g.weight("B", "A"), Some(2));
    }

    #[test]
    fn self_pair_ignored() {
        let mut g = CooccurrenceGraph::new();
        let a = g.ensure_node("A", "X");
        assert!(g.add_weight(a, a, 1).is_none());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn edge_map_orders_endpoints() {
        let mut g = CooccurrenceGraph::new();
        let z = g.ensure_node("Zed", "X");
        let a = g.ensure_node("Amy", "X");
        g.add_weight(z, a, 3);
        let map = g.edge_map();
        assert_eq!(map.get(&("Amy".to_string(), "Zed".to_string())), Some(&3));
    }
}
