//! Visualization hand-off module
//!
//! Produces the structural and categorical data an external renderer needs:
//! nodes with labels and colors, edges with weights. Layout and drawing are
//! left to the renderer.

use crate::cluster::{describe_communities, ColorAssignment, Community};
use crate::graph::CooccurrenceGraph;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// 20-color categorical palette; color indices wrap around it
pub const PALETTE: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728", "#ff9896",
    "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f", "#c7c7c7",
    "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

/// Hex color for a color index
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderNode {
    pub id: String,
    pub label: String,
    pub community: usize,
    pub color_index: usize,
    pub color: String,
    pub is_target: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderEdge {
    pub source: String,
    pub target: String,
    pub weight: u32,
}

/// Everything the renderer consumes for one neighborhood
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderPayload {
    pub title: String,
    pub target: String,
    pub modularity: f64,
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
    pub communities: Vec<Community>,
}

impl RenderPayload {
    /// Combine a neighborhood graph and its coloring
    pub fn new(subgraph: &CooccurrenceGraph, target: &str, assignment: &ColorAssignment) -> Self {
        let nodes = subgraph
            .nodes()
            .map(|entity| {
                let community = assignment.communities.get(&entity.text).copied().unwrap_or(0);
                let color_index = assignment.colors.get(&entity.text).copied().unwrap_or(0);
                RenderNode {
                    id: entity.text.clone(),
                    label: entity.label.clone(),
                    community,
                    color_index,
                    color: palette_color(color_index).to_string(),
                    is_target: entity.text == target,
                }
            })
            .collect();

        let edges = subgraph
            .edges()
            .map(|(a, b, weight)| RenderEdge {
                source: a.to_string(),
                target: b.to_string(),
                weight,
            })
            .collect();

        Self {
            title: format!("Knowledge Graph for '{}' and Connected Entities", target),
            target: target.to_string(),
            modularity: assignment.modularity,
            nodes,
            edges,
            communities: describe_communities(subgraph, assignment),
        }
    }
}

/// Write renderer input files for a payload; returns the written paths
pub fn generate_exports(payload: &RenderPayload, output_dir: &Path) -> Result<Vec<PathBuf>> {
    log::info!("Writing renderer input for '{}' to {}", payload.target, output_dir.display());
    fs::create_dir_all(output_dir)?;

    let graphml = output_dir.join("neighborhood.graphml");
    write_graphml(payload, &graphml)?;

    let json = output_dir.join("neighborhood.json");
    let mut file = File::create(&json)?;
    file.write_all(serde_json::to_string_pretty(payload)?.as_bytes())?;

    Ok(vec![graphml, json])
}

/// Write an undirected GraphML file with label, community, color and weight keys
pub fn write_graphml(payload: &RenderPayload, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;

    // Write GraphML header
    writeln!(file, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(file, "<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">")?;
    writeln!(file, "  <key id=\"label\" for=\"node\" attr.name=\"label\" attr.type=\"string\"/>")?;
    writeln!(file, "  <key id=\"community\" for=\"node\" attr.name=\"community\" attr.type=\"int\"/>")?;
    writeln!(file, "  <key id=\"color\" for=\"node\" attr.name=\"color\" attr.type=\"string\"/>")?;
    writeln!(file, "  <key id=\"weight\" for=\"edge\" attr.name=\"weight\" attr.type=\"int\"/>")?;
    writeln!(file, "  <graph id=\"{}\" edgedefault=\"undirected\">", escape_xml(&payload.title))?;

    for node in &payload.nodes {
        writeln!(file, "    <node id=\"{}\">", escape_xml(&node.id))?;
        writeln!(file, "      <data key=\"label\">{}</data>", escape_xml(&node.label))?;
        writeln!(file, "      <data key=\"community\">{}</data>", node.community)?;
        writeln!(file, "      <data key=\"color\">{}</data>", node.color)?;
        writeln!(file, "    </node>")?;
    }

    for (edge_id, edge) in payload.edges.iter().enumerate() {
        writeln!(
            file,
            "    <edge id=\"e{}\" source=\"{}\" target=\"{}\">",
            edge_id,
            escape_xml(&edge.source),
            escape_xml(&edge.target)
        )?;
        writeln!(file, "      <data key=\"weight\">{}</data>", edge.weight)?;
        writeln!(file, "    </edge>")?;
    }

    // Write GraphML footer
    writeln!(file, "  </graph>")?;
    writeln!(file, "</graphml>")?;

    Ok(())
}

fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
