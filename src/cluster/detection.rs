//! Community detection: seeded, weighted Louvain

use crate::config::Config;
use crate::error::{GraphError, Result};
use crate::graph::CooccurrenceGraph;
use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Parameters for a Louvain run
#[derive(Debug, Clone)]
pub struct LouvainParams {
    pub seed: u64,
    pub resolution: f64,
    pub min_modularity_gain: f64,
    pub max_passes: Option<usize>,
    pub time_budget: Option<Duration>,
}

impl From<&Config> for LouvainParams {
    fn from(config: &Config) -> Self {
        Self {
            seed: config.seed,
            resolution: config.resolution,
            min_modularity_gain: config.min_modularity_gain,
            max_passes: config.max_passes,
            time_budget: config.time_budget(),
        }
    }
}

impl Default for LouvainParams {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Result of community detection
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Community id per node, indexed by node insertion order; ids are `0..k`
    pub membership: Vec<usize>,

    /// Local-moving sweeps performed across all levels
    pub passes: usize,

    /// Aggregation levels performed
    pub levels: usize,
}

impl Partition {
    pub fn community_count(&self) -> usize {
        self.membership.iter().max().map_or(0, |&max| max + 1)
    }
}

/// Weighted undirected graph over dense indices, self-loops kept apart
struct WeightedGraph {
    adjacency: Vec<Vec<(usize, f64)>>,
    self_loops: Vec<f64>,
    degrees: Vec<f64>,

    /// Twice the total edge weight
    total: f64,
}

impl WeightedGraph {
    fn from_cooccurrence(graph: &CooccurrenceGraph) -> Self {
        let inner = graph.inner();
        let n = inner.node_count();
        let mut adjacency = vec![Vec::new(); n];

        for edge in inner.edge_references() {
            let (a, b) = (edge.source().index(), edge.target().index());
            let w = f64::from(edge.weight().weight);
            adjacency[a].push((b, w));
            adjacency[b].push((a, w));
        }

        Self::from_parts(adjacency, vec![0.0; n])
    }

    fn from_parts(adjacency: Vec<Vec<(usize, f64)>>, self_loops: Vec<f64>) -> Self {
        let degrees: Vec<f64> = adjacency
            .iter()
            .zip(&self_loops)
            .map(|(list, &own)| 2.0 * own + list.iter().map(|&(_, w)| w).sum::<f64>())
            .collect();
        let total = degrees.iter().sum();

        Self {
            adjacency,
            self_loops,
            degrees,
            total,
        }
    }

    fn len(&self) -> usize {
        self.adjacency.len()
    }

    fn modularity(&self, community: &[usize], resolution: f64) -> f64 {
        if self.total == 0.0 {
            return 0.0;
        }

        let n = self.len();
        let mut inner = vec![0.0; n];
        let mut tot = vec![0.0; n];

        for node in 0..n {
            let c = community[node];
            tot[c] += self.degrees[node];
            inner[c] += 2.0 * self.self_loops[node];
            for &(other, w) in &self.adjacency[node] {
                if community[other] == c {
                    inner[c] += w;
                }
            }
        }

        inner
            .iter()
            .zip(&tot)
            .map(|(&i, &t)| i / self.total - resolution * (t / self.total).powi(2))
            .sum()
    }

    /// Collapse each community into one node; returns the graph and the
    /// dense id assigned to each community label
    fn aggregate(&self, community: &[usize]) -> (WeightedGraph, Vec<usize>) {
        let dense = renumber(community);
        let k = dense.iter().filter(|&&id| id != usize::MAX).count();

        let mut self_loops = vec![0.0; k];
        let mut links: BTreeMap<(usize, usize), f64> = BTreeMap::new();

        for node in 0..self.len() {
            let c = dense[community[node]];
            self_loops[c] += self.self_loops[node];
            for &(other, w) in &self.adjacency[node] {
                let d = dense[community[other]];
                if c == d {
                    // each internal edge is seen from both ends
                    self_loops[c] += w / 2.0;
                } else {
                    *links.entry((c, d)).or_insert(0.0) += w;
                }
            }
        }

        let mut adjacency = vec![Vec::new(); k];
        for ((c, d), w) in links {
            adjacency[c].push((d, w));
        }

        (Self::from_parts(adjacency, self_loops), dense)
    }
}

/// Map labels to `0..k` by first appearance; unused labels map to `usize::MAX`
fn renumber(labels: &[usize]) -> Vec<usize> {
    let size = labels.iter().max().map_or(0, |&max| max + 1);
    let mut dense = vec![usize::MAX; size];
    let mut next = 0;

    for &label in labels {
        if dense[label] == usize::MAX {
            dense[label] = next;
            next += 1;
        }
    }

    dense
}

/// Caller-imposed limits on the detection loop
struct Budget {
    max_passes: Option<usize>,
    time_budget: Option<Duration>,
    started: Instant,
    passes: usize,
}

impl Budget {
    fn new(params: &LouvainParams) -> Self {
        Self {
            max_passes: params.max_passes,
            time_budget: params.time_budget,
            started: Instant::now(),
            passes: 0,
        }
    }

    fn begin_pass(&mut self) -> Result<()> {
        let elapsed = self.started.elapsed();
        let out_of_passes = self.max_passes.map_or(false, |max| self.passes >= max);
        let out_of_time = self.time_budget.map_or(false, |budget| elapsed >= budget);

        if out_of_passes || out_of_time {
            log::warn!(
                "Community detection stopped after {} passes ({:?})",
                self.passes,
                elapsed
            );
            return Err(GraphError::Timeout {
                passes: self.passes,
                elapsed,
            });
        }

        self.passes += 1;
        Ok(())
    }
}

/// Move single nodes between communities until no move improves modularity
///
/// Returns the community label of each node and whether any node moved.
fn local_moving(
    graph: &WeightedGraph,
    params: &LouvainParams,
    rng: &mut StdRng,
    budget: &mut Budget,
) -> Result<(Vec<usize>, bool)> {
    let n = graph.len();
    let mut community: Vec<usize> = (0..n).collect();
    let mut tot = graph.degrees.clone();

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);

    let mut link_weight = vec![0.0; n];
    let mut touched = vec![false; n];
    let mut candidates: Vec<usize> = Vec::new();

    let mut quality = graph.modularity(&community, params.resolution);
    let mut moved_any = false;

    loop {
        budget.begin_pass()?;
        let mut moves = 0;

        for &node in &order {
            let current = community[node];
            let degree = graph.degrees[node];

            // current community is always the first candidate
            candidates.push(current);
            touched[current] = true;
            for &(other, w) in &graph.adjacency[node] {
                let c = community[other];
                if !touched[c] {
                    touched[c] = true;
                    candidates.push(c);
                }
                link_weight[c] += w;
            }

            tot[current] -= degree;

            let scale = params.resolution * degree / graph.total;
            let mut best = current;
            let mut best_gain = link_weight[current] - tot[current] * scale;
            for &c in &candidates[1..] {
                let gain = link_weight[c] - tot[c] * scale;
                if gain > best_gain {
                    best = c;
                    best_gain = gain;
                }
            }

            tot[best] += degree;
            community[node] = best;
            if best != current {
                moves += 1;
            }

            for &c in &candidates {
                link_weight[c] = 0.0;
                touched[c] = false;
            }
            candidates.clear();
        }

        if moves == 0 {
            break;
        }
        moved_any = true;

        let next = graph.modularity(&community, params.resolution);
        log::debug!("Local moving: {} moves, modularity {:.6}", moves, next);
        if next - quality < params.min_modularity_gain {
            break;
        }
        quality = next;
    }

    Ok((community, moved_any))
}

/// Partition `graph` into communities with the Louvain method
///
/// Edge weights participate in the modularity objective. For a fixed graph
/// and seed the result is reproducible. Returned ids are `0..k` in order of
/// first appearance over the graph's nodes.
pub fn louvain(graph: &CooccurrenceGraph, params: &LouvainParams) -> Result<Partition> {
    if graph.is_empty() {
        return Err(GraphError::EmptyGraph);
    }

    let mut level = WeightedGraph::from_cooccurrence(graph);
    let mut membership: Vec<usize> = (0..level.len()).collect();

    if level.total == 0.0 {
        log::debug!("Graph has no weighted edges; every node is its own community");
        return Ok(Partition {
            membership,
            passes: 0,
            levels: 0,
        });
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut budget = Budget::new(params);
    let mut levels = 0;

    loop {
        let (community, moved) = local_moving(&level, params, &mut rng, &mut budget)?;
        if !moved {
            break;
        }

        let (next, dense) = level.aggregate(&community);
        for m in membership.iter_mut() {
            *m = dense[community[*m]];
        }
        levels += 1;

        log::debug!(
            "Louvain level {}: {} -> {} nodes",
            levels,
            level.len(),
            next.len()
        );

        if next.len() == level.len() {
            break;
        }
        level = next;
    }

    let dense = renumber(&membership);
    for m in membership.iter_mut() {
        *m = dense[*m];
    }

    Ok(Partition {
        membership,
        passes: budget.passes,
        levels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Mention;
    use crate::graph::builder::GraphBuilder;

    fn graph_from_edges(edges: &[(&str, &str, u32)]) -> CooccurrenceGraph {
        let mut builder = GraphBuilder::new();
        for &(a, b, w) in edges {
            for _ in 0..w {
                builder
                    .add_sentence(&[Mention::new(a, "X"), Mention::new(b, "X")])
                    .unwrap();
            }
        }
        builder.build()
    }

    fn two_triangles() -> CooccurrenceGraph {
        graph_from_edges(&[
            ("a1", "a2", 5),
            ("a2", "a3", 5),
            ("a1", "a3", 5),
            ("b1", "b2", 5),
            ("b2", "b3", 5),
            ("b1", "b3", 5),
            ("a3", "b1", 1),
        ])
    }

    #[test]
    fn empty_graph_rejected() {
        let g = CooccurrenceGraph::new();
        assert!(matches!(
            louvain(&g, &LouvainParams::default()),
            Err(GraphError::EmptyGraph)
        ));
    }

    #[test]
    fn separates_weakly_linked_triangles() {
        let g = two_triangles();
        let partition = louvain(&g, &LouvainParams::default()).unwrap();
        let m = &partition.membership;

        assert_eq!(partition.community_count(), 2);
        assert_eq!(m[0], m[1]);
        assert_eq!(m[1], m[2]);
        assert_eq!(m[3], m[4]);
        assert_eq!(m[4], m[5]);
        assert_ne!(m[0], m[3]);
        // first node starts community 0
        assert_eq!(m[0], 0);
    }

    #[test]
    fn reproducible_for_fixed_seed() {
        let g = two_triangles();
        let params = LouvainParams {
            seed: 7,
            ..LouvainParams::default()
        };
        let first = louvain(&g, &params).unwrap();
        let second = louvain(&g, &params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn edgeless_nodes_stay_apart() {
        let mut g = CooccurrenceGraph::new();
        g.ensure_node("x", "X");
        g.ensure_node("y", "X");
        let partition = louvain(&g, &LouvainParams::default()).unwrap();
        assert_eq!(partition.membership, vec![0, 1]);
        assert_eq!(partition.passes, 0);
    }

    #[test]
    fn pass_budget_exhaustion_is_timeout() {
        let g = two_triangles();
        let params = LouvainParams {
            max_passes: Some(0),
            ..LouvainParams::default()
        };
        match louvain(&g, &params) {
            Err(GraphError::Timeout { passes, .. }) => assert_eq!(passes, 0),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[test]
    fn zero_time_budget_is_timeout() {
        let g = two_triangles();
        let params = LouvainParams {
            time_budget: Some(Duration::ZERO),
            ..LouvainParams::default()
        };
        assert!(matches!(louvain(&g, &params), Err(GraphError::Timeout { .. })));
    }

    #[test]
    fn aggregation_preserves_total_weight() {
        let g = two_triangles();
        let level = WeightedGraph::from_cooccurrence(&g);
        let community = vec![0, 0, 0, 3, 3, 3];
        let (next, dense) = level.aggregate(&community);

        assert_eq!(next.len(), 2);
        assert_eq!(dense[0], 0);
        assert_eq!(dense[3], 1);
        assert!((next.total - level.total).abs() < 1e-9);
        assert!((next.self_loops[0] - 15.0).abs() < 1e-9);
        let q_before = level.modularity(&community, 1.0);
        let q_after = next.modularity(&[0, 1], 1.0);
        assert!((q_before - q_after).abs() < 1e-9);
    }

    #[test]
    fn renumber_by_first_appearance() {
        assert_eq!(renumber(&[4, 4, 1, 4])[4], 0);
        assert_eq!(renumber(&[4, 4, 1, 4])[1], 1);
        assert_eq!(renumber(&[4, 4, 1, 4])[0], usize::MAX);
    }
}
