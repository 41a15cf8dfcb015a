use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokviz_core::{tokenize, PipelineConfig, Visualizer};
use tokviz_embed::{EmbeddingSource, HashedSource, SeededSource, UniformSource};
use tokviz_types::{API_VERSION, SERVICE_NAME};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tokviz")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline and print the response JSON.
    Visualize {
        text: String,
        /// Seed the uniform embedding source for a reproducible run.
        #[arg(long, conflicts_with = "hashed")]
        seed: Option<u64>,
        /// Use the deterministic hashed embedding source.
        #[arg(long)]
        hashed: bool,
        /// YAML pipeline config (vocabulary, zero-length positions, dim).
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
    /// Print one token per line.
    Tokenize { text: String },
    /// Print the service identity.
    Health,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Visualize {
            text,
            seed,
            hashed,
            config,
            pretty,
        } => {
            let pipeline = match config {
                Some(path) => PipelineConfig::from_path(path)?,
                None => PipelineConfig::default(),
            };
            let source: Arc<dyn EmbeddingSource> = match (hashed, seed) {
                (true, _) => Arc::new(HashedSource),
                (false, Some(seed)) => Arc::new(SeededSource::new(seed)),
                (false, None) => Arc::new(UniformSource),
            };
            let resp = Visualizer::new(pipeline, source).visualize(&text)?;
            let out = if pretty {
                serde_json::to_string_pretty(&resp)?
            } else {
                serde_json::to_string(&resp)?
            };
            println!("{out}");
        }
        Command::Tokenize { text } => {
            for token in tokenize(&text) {
                println!("{token}");
            }
        }
        Command::Health => {
            let status = serde_json::json!({
                "status": "healthy",
                "service": SERVICE_NAME,
                "version": API_VERSION,
            });
            println!("{status}");
        }
    }

    Ok(())
}
