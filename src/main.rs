use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use entity_graph_analyzer::config::Config;
use entity_graph_analyzer::data::{PlainTextExtractor, PreRecognized};
use entity_graph_analyzer::pipeline::{self, Visualization};
use entity_graph_analyzer::viz;

#[derive(Parser, Debug)]
#[clap(
    name = "entity-graph-analyzer",
    about = "Entity co-occurrence graph and community-colored neighborhood export"
)]
struct Cli {
    /// Path to a JSON file of recognized sentences
    #[clap(long)]
    input: PathBuf,

    /// Entity whose neighborhood is extracted
    #[clap(long)]
    target: String,

    /// Output directory for renderer input
    #[clap(long, default_value = "graph_results")]
    output_dir: PathBuf,

    /// Optional JSON configuration file
    #[clap(long)]
    config: Option<PathBuf>,

    /// Number of colors before community ids wrap around
    #[clap(long)]
    palette_size: Option<usize>,

    /// Seed for community detection
    #[clap(long)]
    seed: Option<u64>,

    /// Wall-clock budget for community detection in milliseconds
    #[clap(long)]
    time_budget_ms: Option<u64>,

    /// Skip writing GraphML/JSON exports
    #[clap(long)]
    skip_export: bool,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let mut config = match &args.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    if let Some(palette_size) = args.palette_size {
        config.palette_size = palette_size;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.time_budget_ms.is_some() {
        config.time_budget_ms = args.time_budget_ms;
    }
    config.validate()?;

    log::info!("Starting entity graph analysis");
    log::info!("Input: {}", args.input.display());
    log::info!("Target: {}", args.target);

    // 1. Build the document graph
    let graph = pipeline::process_document(&PlainTextExtractor, &PreRecognized, &args.input)?;

    // 2. Filter and color the target's neighborhood
    let payload = match pipeline::visualize(&graph, &args.target, &config)? {
        Visualization::Ready(payload) => payload,
        empty => {
            if let Some(message) = empty.warning() {
                log::warn!("{}", message);
            }
            return Ok(());
        }
    };

    for community in &payload.communities {
        log::info!(
            "Community {}: {} entities, internal weight {}, central: {}",
            community.id,
            community.size,
            community.internal_weight,
            community.central_nodes.join(", ")
        );
    }

    // 3. Hand off to the renderer
    if !args.skip_export {
        let written = viz::generate_exports(&payload, &args.output_dir)?;
        for path in written {
            log::info!("Wrote {}", path.display());
        }
    }

    log::info!("Analysis complete");

    Ok(())
}
