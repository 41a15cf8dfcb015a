use std::sync::Arc;

use thiserror::Error;
use tokviz_embed::{EmbeddingSource, UniformSource};
use tokviz_types::{Corpus, VisualizeResponse};
use tracing::debug;

pub mod config;
pub use config::{ConfigError, PipelineConfig};

pub mod reconcile;
pub mod reduce;
pub use reduce::ReduceError;

pub mod synth;

pub mod tokenizer;
pub use tokenizer::tokenize;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("dimensionality reduction failed: {0}")]
    Reduce(#[from] ReduceError),
}

/// Text → tokens → vectors → 3D destinations, one request at a time.
///
/// Holds only immutable configuration and the embedding source; every call
/// builds its corpus and matrices from scratch.
pub struct Visualizer {
    config: PipelineConfig,
    source: Arc<dyn EmbeddingSource>,
}

impl Visualizer {
    pub fn new(config: PipelineConfig, source: Arc<dyn EmbeddingSource>) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Tokenize `text` and append the output vocabulary.
    pub fn assemble_corpus(&self, text: &str) -> Corpus {
        Corpus::new(tokenize(text), self.config.output_vocabulary())
    }

    pub fn visualize(&self, text: &str) -> Result<VisualizeResponse, PipelineError> {
        let corpus = self.assemble_corpus(text);
        let zero_length = self.config.zero_length();

        let vectors = synth::synthesize(&corpus, self.source.as_ref(), self.config.dim(), zero_length);
        assert_eq!(vectors.len(), corpus.len(), "vector/corpus length mismatch");

        let mut destinations = reduce::project(&vectors)?;
        reconcile::reconcile(&mut destinations, zero_length);

        debug!(
            total = corpus.len(),
            input = corpus.input_len(),
            output = corpus.len() - corpus.input_len(),
            "visualized corpus"
        );
        let tokens = reconcile::assemble(corpus, destinations);
        for tv in &tokens {
            debug!(
                "  {} ({}): destination=[{:.3}, {:.3}, {:.3}]",
                tv.token,
                if tv.is_input { "input" } else { "output" },
                tv.destination[0],
                tv.destination[1],
                tv.destination[2]
            );
        }

        Ok(VisualizeResponse { tokens })
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new(PipelineConfig::default(), Arc::new(UniformSource))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokviz_embed::HashedSource;

    #[test]
    fn corpus_appends_vocabulary_after_input() {
        let viz = Visualizer::default();
        let corpus = viz.assemble_corpus("Hello, world!");
        assert_eq!(corpus.len(), 19);
        assert_eq!(corpus.input_len(), 4);
        assert_eq!(corpus.tokens()[4].text, "The");
        assert_eq!(corpus.tokens()[18].text, ".");
    }

    #[test]
    fn hashed_source_gives_stable_destinations() {
        let viz = Visualizer::new(PipelineConfig::default(), Arc::new(HashedSource));
        let a = viz.visualize("a quick test").unwrap();
        let b = viz.visualize("a quick test").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn single_token_vocabulary_collapses_to_origin() {
        let cfg = PipelineConfig::new(vec!["only".into()], Default::default(), 20).unwrap();
        let viz = Visualizer::new(cfg, Arc::new(UniformSource));
        let resp = viz.visualize("").unwrap();
        assert_eq!(resp.tokens.len(), 1);
        assert_eq!(resp.tokens[0].destination, [0.0, 0.0, 0.0]);
    }
}
