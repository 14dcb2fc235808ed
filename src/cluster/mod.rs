//! Community analysis and color assignment module

pub mod detection;
pub mod metrics;

use crate::config::Config;
use crate::error::{GraphError, Result};
use crate::graph::CooccurrenceGraph;
use detection::{louvain, LouvainParams};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A community of entities in a neighborhood graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Community {
    /// Community id as assigned by detection
    pub id: usize,

    /// Member entity texts, sorted
    pub members: Vec<String>,

    /// Size of the community
    pub size: usize,

    /// Sum of co-occurrence weights between members
    pub internal_weight: u32,

    /// Density: actual edges / potential edges
    pub density: f32,

    /// Members with the highest in-community weighted degree
    pub central_nodes: Vec<String>,
}

/// Community and color index for every node of a graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorAssignment {
    /// Entity text -> community id
    pub communities: BTreeMap<String, usize>,

    /// Entity text -> `community id mod palette_size`
    pub colors: BTreeMap<String, usize>,

    /// Modularity of the partition
    pub modularity: f64,

    /// Local-moving sweeps the detection took
    pub passes: usize,
}

impl ColorAssignment {
    pub fn community_count(&self) -> usize {
        self.communities
            .values()
            .collect::<std::collections::BTreeSet<_>>()
            .len()
    }
}

/// Partition `subgraph` into communities and map each node to a color index
///
/// Fails with [`GraphError::EmptyGraph`] when there are no nodes; callers are
/// expected to have handled the not-found and no-connections states before
/// getting here.
pub fn assign_colors(subgraph: &CooccurrenceGraph, config: &Config) -> Result<ColorAssignment> {
    config.validate()?;
    if subgraph.is_empty() {
        return Err(GraphError::EmptyGraph);
    }

    let partition = louvain(subgraph, &LouvainParams::from(config))?;

    let mut communities = BTreeMap::new();
    let mut colors = BTreeMap::new();
    for (entity, &community) in subgraph.nodes().zip(&partition.membership) {
        communities.insert(entity.text.clone(), community);
        colors.insert(entity.text.clone(), community % config.palette_size);
    }

    let modularity = metrics::modularity(subgraph, &partition.membership, config.resolution);

    log::info!(
        "Found {} communities over {} entities (modularity {:.4}, {} passes)",
        partition.community_count(),
        subgraph.node_count(),
        modularity,
        partition.passes
    );

    Ok(ColorAssignment {
        communities,
        colors,
        modularity,
        passes: partition.passes,
    })
}

/// Community records for an assignment, largest first
pub fn describe_communities(subgraph: &CooccurrenceGraph, assignment: &ColorAssignment) -> Vec<Community> {
    let membership: Vec<usize> = subgraph
        .nodes()
        .map(|e| assignment.communities.get(&e.text).copied().unwrap_or(0))
        .collect();
    metrics::summarize_communities(subgraph, &membership)
}
