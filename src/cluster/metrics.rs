//! Community statistics and metrics

use crate::cluster::Community;
use crate::graph::CooccurrenceGraph;
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Weighted Newman modularity of a partition
///
/// `membership` is indexed by node insertion order. Graphs without edges
/// have modularity 0.
pub fn modularity(graph: &CooccurrenceGraph, membership: &[usize], resolution: f64) -> f64 {
    let inner = graph.inner();
    let total: f64 = inner
        .edge_references()
        .map(|e| f64::from(e.weight().weight))
        .sum();
    if total == 0.0 {
        return 0.0;
    }

    // indexed by community id so the sum runs in a fixed order
    let size = membership.iter().max().map_or(0, |&max| max + 1);
    let mut internal = vec![0.0; size];
    let mut degree = vec![0.0; size];

    for edge in inner.edge_references() {
        let w = f64::from(edge.weight().weight);
        let a = membership[edge.source().index()];
        let b = membership[edge.target().index()];
        degree[a] += w;
        degree[b] += w;
        if a == b {
            internal[a] += w;
        }
    }

    internal
        .iter()
        .zip(&degree)
        .map(|(&inside, &d)| inside / total - resolution * (d / (2.0 * total)).powi(2))
        .sum()
}

/// Calculate density (actual edges / potential undirected edges)
pub fn calculate_density(graph: &CooccurrenceGraph, members: &[usize]) -> f32 {
    let n = members.len();
    if n <= 1 {
        return 1.0; // By convention, singleton communities have density 1
    }

    let potential_edges = n * (n - 1) / 2;
    let member_set: std::collections::HashSet<usize> = members.iter().copied().collect();

    let actual_edges = graph
        .inner()
        .edge_references()
        .filter(|e| member_set.contains(&e.source().index()) && member_set.contains(&e.target().index()))
        .count();

    actual_edges as f32 / potential_edges as f32
}

/// Members with the highest weighted degree inside their community (top 5)
pub fn identify_central_nodes(graph: &CooccurrenceGraph, members: &[usize]) -> Vec<String> {
    let member_set: std::collections::HashSet<usize> = members.iter().copied().collect();
    let inner = graph.inner();

    let mut strength: Vec<(usize, u32)> = members.iter().map(|&m| (m, 0)).collect();
    let position: HashMap<usize, usize> = members.iter().enumerate().map(|(i, &m)| (m, i)).collect();

    for edge in inner.edge_references() {
        let (a, b) = (edge.source().index(), edge.target().index());
        if member_set.contains(&a) && member_set.contains(&b) {
            strength[position[&a]].1 += edge.weight().weight;
            strength[position[&b]].1 += edge.weight().weight;
        }
    }

    // stable sort keeps insertion order among equals
    strength.sort_by(|x, y| y.1.cmp(&x.1));

    strength
        .iter()
        .take(5)
        .map(|&(idx, _)| inner[petgraph::graph::NodeIndex::new(idx)].text.clone())
        .collect()
}

/// Group a partition into community records, largest first
pub fn summarize_communities(graph: &CooccurrenceGraph, membership: &[usize]) -> Vec<Community> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (node, &community) in membership.iter().enumerate() {
        if groups.len() <= community {
            groups.resize_with(community + 1, Vec::new);
        }
        groups[community].push(node);
    }

    let inner = graph.inner();
    let mut communities: Vec<Community> = groups
        .into_iter()
        .enumerate()
        .filter(|(_, members)| !members.is_empty())
        .map(|(id, members)| {
            let internal_weight = inner
                .edge_references()
                .filter(|e| {
                    membership[e.source().index()] == id && membership[e.target().index()] == id
                })
                .map(|e| e.weight().weight)
                .sum();
            let density = calculate_density(graph, &members);
            let central_nodes = identify_central_nodes(graph, &members);
            let mut names: Vec<String> = members
                .iter()
                .map(|&m| inner[petgraph::graph::NodeIndex::new(m)].text.clone())
                .collect();
            names.sort();

            Community {
                id,
                size: names.len(),
                members: names,
                internal_weight,
                density,
                central_nodes,
            }
        })
        .collect();

    communities.sort_by(|a, b| b.size.cmp(&a.size).then(a.id.cmp(&b.id)));
    communities
}
