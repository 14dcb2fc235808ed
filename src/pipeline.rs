//! Orchestration: document to graph, graph and target to visualization

use crate::cluster::assign_colors;
use crate::config::Config;
use crate::data::{EntityRecognizer, TextExtractor};
use crate::error::Result;
use crate::graph::algorithms::filter_neighborhood;
use crate::graph::builder::build_graph;
use crate::graph::CooccurrenceGraph;
use crate::viz::RenderPayload;
use std::path::Path;

/// Outcome of a visualization request
///
/// The two empty states are expected results for a user-supplied target and
/// should be shown as warnings, not treated as failures.
#[derive(Debug, Clone)]
pub enum Visualization {
    /// Target entity is not in the graph
    NotFound { target: String },

    /// Target exists but never co-occurred with another entity
    NoConnections { target: String },

    /// Colored neighborhood ready for rendering
    Ready(RenderPayload),
}

impl Visualization {
    /// User-facing message for the empty states
    pub fn warning(&self) -> Option<String> {
        match self {
            Visualization::NotFound { target } => Some(format!(
                "The target entity '{}' is not found in the graph.",
                target
            )),
            Visualization::NoConnections { target } => Some(format!(
                "No connections found for the target entity '{}'.",
                target
            )),
            Visualization::Ready(_) => None,
        }
    }
}

/// Build a fresh co-occurrence graph for one document
pub fn process_document(
    extractor: &dyn TextExtractor,
    recognizer: &dyn EntityRecognizer,
    source: &Path,
) -> anyhow::Result<CooccurrenceGraph> {
    let text = extractor.extract_text(source)?;
    log::debug!("Extracted {} bytes of text", text.len());

    let sentences = recognizer.recognize(&text)?;
    log::info!("Recognized {} sentences", sentences.len());

    let graph = build_graph(&sentences)?;
    log::info!(
        "Built graph with {} entities and {} co-occurrence edges",
        graph.node_count(),
        graph.edge_count()
    );

    Ok(graph)
}

/// Filter the neighborhood of `target` and color it by community
pub fn visualize(graph: &CooccurrenceGraph, target: &str, config: &Config) -> Result<Visualization> {
    let Some(neighborhood) = filter_neighborhood(graph, target) else {
        log::warn!("The target entity '{}' is not found in the graph", target);
        return Ok(Visualization::NotFound {
            target: target.to_string(),
        });
    };

    if neighborhood.edge_count() == 0 {
        log::warn!("No connections found for the target entity '{}'", target);
        return Ok(Visualization::NoConnections {
            target: target.to_string(),
        });
    }

    let assignment = assign_colors(&neighborhood, config)?;
    Ok(Visualization::Ready(RenderPayload::new(&neighborhood, target, &assignment)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Mention, PlainTextExtractor, PreRecognized};
    use crate::error::GraphError;

    fn graph() -> CooccurrenceGraph {
        build_graph(&vec![
            vec![Mention::new("Alice", "PERSON"), Mention::new("Acme", "ORG")],
            vec![Mention::new("Loner", "PERSON"), Mention::new("Loner", "PERSON")],
        ])
        .unwrap()
    }

    #[test]
    fn not_found_state() {
        let outcome = visualize(&graph(), "Carol", &Config::default()).unwrap();
        assert!(matches!(outcome, Visualization::NotFound { .. }));
        assert!(outcome.warning().unwrap().contains("'Carol' is not found"));
    }

    #[test]
    fn no_connections_state() {
        let outcome = visualize(&graph(), "Loner", &Config::default()).unwrap();
        assert!(matches!(outcome, Visualization::NoConnections { .. }));
        assert!(outcome.warning().is_some());
    }

    #[test]
    fn ready_state() {
        let outcome = visualize(&graph(), "Acme", &Config::default()).unwrap();
        match outcome {
            Visualization::Ready(payload) => {
                assert_eq!(payload.nodes.len(), 2);
                assert_eq!(payload.edges.len(), 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn timeout_leaves_graph_usable() {
        let g = graph();
        let config = Config {
            max_passes: Some(0),
            ..Config::default()
        };
        assert!(matches!(
            visualize(&g, "Acme", &config),
            Err(GraphError::Timeout { .. })
        ));
        assert!(visualize(&g, "Acme", &Config::default()).is_ok());
    }

    #[test]
    fn processes_document_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, r#"[[["Alice","PERSON"],["Bob","PERSON"]]]"#).unwrap();
        let g = process_document(&PlainTextExtractor, &PreRecognized, &path).unwrap();
        assert_eq!(g.weight("Alice", "Bob"), Some(1));

        std::fs::write(&path, r#"{"not": "sentences"}"#).unwrap();
        let err = process_document(&PlainTextExtractor, &PreRecognized, &path).unwrap_err();
        assert!(err.downcast_ref::<GraphError>().is_some());
    }
}
