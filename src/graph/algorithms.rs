//! Graph algorithms for neighborhood extraction

use crate::graph::CooccurrenceGraph;
use petgraph::visit::EdgeRef;

/// Extract the edges incident to `target`, with both endpoints, into a new graph
///
/// Returns `None` when `target` is not an entity of `graph`; callers surface
/// that as a user-facing "not found" state. Edges between two neighbors are
/// not copied. The target is always the first node of the result, even when it
/// has no incident edges, and neighbors follow in source insertion order.
pub fn filter_neighborhood(graph: &CooccurrenceGraph, target: &str) -> Option<CooccurrenceGraph> {
    let Some(target_idx) = graph.node_index(target) else {
        log::debug!("Target entity '{}' not present in graph", target);
        return None;
    };

    let inner = graph.inner();

    // petgraph yields adjacency newest-first; sort for a stable layout
    let mut incident: Vec<_> = inner
        .edges(target_idx)
        .map(|e| {
            let other = if e.source() == target_idx { e.target() } else { e.source() };
            (other, e.weight().weight)
        })
        .collect();
    incident.sort_unstable_by_key(|&(other, _)| other);

    let mut neighborhood = CooccurrenceGraph::with_capacity(incident.len() + 1, incident.len());
    let source = &inner[target_idx];
    let center = neighborhood.ensure_node(&source.text, &source.label);

    for (other, weight) in incident {
        let entity = &inner[other];
        let idx = neighborhood.ensure_node(&entity.text, &entity.label);
        neighborhood.add_weight(center, idx, weight);
    }

    log::debug!(
        "Neighborhood of '{}': {} nodes, {} edges",
        target,
        neighborhood.node_count(),
        neighborhood.edge_count()
    );

    Some(neighborhood)
}
