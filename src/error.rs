//! Error types for graph construction and community coloring

use std::time::Duration;
use thiserror::Error;

/// Errors raised by the graph core
///
/// A target entity missing from the graph is not an error; see
/// [`crate::graph::algorithms::filter_neighborhood`].
#[derive(Debug, Error)]
pub enum GraphError {
    /// Malformed sentence/entity input handed to the builder
    #[error("malformed entity input: {0}")]
    Input(String),

    /// Community assignment was asked to partition a graph with no nodes
    #[error("community assignment requires a graph with at least one node")]
    EmptyGraph,

    /// Community detection did not converge within the configured budget
    #[error("community detection exceeded its budget after {passes} passes ({elapsed:?})")]
    Timeout { passes: usize, elapsed: Duration },

    /// Configuration values out of range
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GraphError>;
