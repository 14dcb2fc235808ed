//! Graph construction module

use crate::data::{Mention, Sentence};
use crate::error::{GraphError, Result};
use crate::graph::CooccurrenceGraph;
use itertools::Itertools;

/// Builder for accumulating a co-occurrence graph sentence by sentence
///
/// Each document gets its own builder; graphs are never merged across
/// documents.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: CooccurrenceGraph,

    /// Sentences processed so far
    sentences: usize,
}

impl GraphBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new graph builder with the given node capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            graph: CooccurrenceGraph::with_capacity(capacity, capacity * 2),
            sentences: 0,
        }
    }

    /// Pair every two positions `i < j` of one sentence
    ///
    /// Both entities become nodes (first label wins). Pairs with identical
    /// text are skipped; all others add 1 to their edge, so an entity
    /// repeated in a sentence adds once per position pair.
    pub fn add_sentence(&mut self, sentence: &[Mention]) -> Result<()> {
        let position = self.sentences;
        if let Some(bad) = sentence.iter().position(|m| m.text.is_empty()) {
            return Err(GraphError::Input(format!(
                "sentence {} mention {} has empty text",
                position, bad
            )));
        }

        for (left, right) in sentence.iter().tuple_combinations() {
            let a = self.graph.ensure_node(&left.text, &left.label);
            let b = self.graph.ensure_node(&right.text, &right.label);
            self.graph.add_weight(a, b, 1);
        }

        self.sentences += 1;
        Ok(())
    }

    /// Number of sentences consumed
    pub fn sentence_count(&self) -> usize {
        self.sentences
    }

    /// Current state of the graph
    pub fn graph(&self) -> &CooccurrenceGraph {
        &self.graph
    }

    /// Finish and return the graph
    pub fn build(self) -> CooccurrenceGraph {
        log::debug!(
            "Built co-occurrence graph from {} sentences: {} nodes, {} edges",
            self.sentences,
            self.graph.node_count(),
            self.graph.edge_count()
        );
        self.graph
    }
}

/// Build a graph from a full stream of recognized sentences
pub fn build_graph<'a, I>(sentences: I) -> Result<CooccurrenceGraph>
where
    I: IntoIterator<Item = &'a Sentence>,
{
    let mut builder = GraphBuilder::new();
    for sentence in sentences {
        builder.add_sentence(sentence)?;
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(items: &[(&str, &str)]) -> Sentence {
        items.iter().map(|&(t, l)| Mention::new(t, l)).collect()
    }

    #[test]
    fn end_to_end_example_graph() {
        let sentences = vec![
            sentence(&[("Alice", "PERSON"), ("Acme", "ORG")]),
            sentence(&[("Alice", "PERSON"), ("Bob", "PERSON")]),
            sentence(&[("Alice", "PERSON"), ("Acme", "ORG")]),
        ];
        let graph = build_graph(&sentences).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.weight("Alice", "Acme"), Some(2));
        assert_eq!(graph.weight("Alice", "Bob"), Some(1));
        assert_eq!(graph.weight("Acme", "Bob"), None);
    }

    #[test]
    fn short_sentences_contribute_nothing() {
        let sentences = vec![sentence(&[]), sentence(&[("Solo", "PERSON")])];
        let graph = build_graph(&sentences).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn repeated_entity_never_self_loops() {
        let sentences = vec![sentence(&[("Rome", "GPE"), ("Rome", "GPE")])];
        let graph = build_graph(&sentences).unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn repeated_mentions_inflate_weight_per_position_pair() {
        // A A B: positions (0,2) and (1,2) both pair A with B
        let sentences = vec![sentence(&[("A", "X"), ("A", "X"), ("B", "Y")])];
        let graph = build_graph(&sentences).unwrap();
        assert_eq!(graph.weight("A", "B"), Some(2));

        // A B A B: four cross pairs
        let sentences = vec![sentence(&[("A", "X"), ("B", "Y"), ("A", "X"), ("B", "Y")])];
        let graph = build_graph(&sentences).unwrap();
        assert_eq!(graph.weight("A", "B"), Some(4));
    }

    #[test]
    fn later_label_does_not_overwrite() {
        let sentences = vec![
            sentence(&[("Jordan", "PERSON"), ("Acme", "ORG")]),
            sentence(&[("Jordan", "GPE"), ("Acme", "ORG")]),
        ];
        let graph = build_graph(&sentences).unwrap();
        assert_eq!(graph.label("Jordan"), Some("PERSON"));
    }

    #[test]
    fn surface_text_is_exact() {
        let sentences = vec![sentence(&[("acme", "ORG"), ("Acme", "ORG"), ("Acme ", "ORG")])];
        let graph = build_graph(&sentences).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn empty_text_is_input_error() {
        let mut builder = GraphBuilder::new();
        builder.add_sentence(&sentence(&[("A", "X"), ("B", "X")])).unwrap();
        let err = builder
            .add_sentence(&sentence(&[("A", "X"), ("", "X")]))
            .unwrap_err();
        assert!(matches!(err, GraphError::Input(ref msg) if msg.contains("sentence 1")));
    }
}
