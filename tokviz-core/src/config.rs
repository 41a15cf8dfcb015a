use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tokviz_types::{ZeroLengthSet, DEFAULT_DIM, REFERENCE_OUTPUT_VOCABULARY};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("output vocabulary must not be empty")]
    EmptyVocabulary,
    #[error("vector dimensionality must be positive")]
    ZeroDim,
}

/// Immutable per-process pipeline settings.
///
/// The output vocabulary is never empty, so every corpus has at least one token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    output_vocabulary: Vec<String>,
    zero_length: ZeroLengthSet,
    dim: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPipelineConfig {
    output_vocabulary: Option<Vec<String>>,
    zero_length: Option<ZeroLengthSet>,
    dim: Option<usize>,
}

impl PipelineConfig {
    pub fn new(
        output_vocabulary: Vec<String>,
        zero_length: ZeroLengthSet,
        dim: usize,
    ) -> Result<Self, ConfigError> {
        if output_vocabulary.is_empty() {
            return Err(ConfigError::EmptyVocabulary);
        }
        if dim == 0 {
            return Err(ConfigError::ZeroDim);
        }
        Ok(Self {
            output_vocabulary,
            zero_length,
            dim,
        })
    }

    /// Load from YAML. Missing keys fall back to the reference values.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawPipelineConfig = serde_yaml::from_str(text)?;
        Self::new(
            raw.output_vocabulary.unwrap_or_else(reference_vocabulary),
            raw.zero_length.unwrap_or_default(),
            raw.dim.unwrap_or(DEFAULT_DIM),
        )
    }

    pub fn output_vocabulary(&self) -> &[String] {
        &self.output_vocabulary
    }

    pub fn zero_length(&self) -> &ZeroLengthSet {
        &self.zero_length
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_vocabulary: reference_vocabulary(),
            zero_length: ZeroLengthSet::default(),
            dim: DEFAULT_DIM,
        }
    }
}

fn reference_vocabulary() -> Vec<String> {
    REFERENCE_OUTPUT_VOCABULARY.iter().map(|s| s.to_string()).collect()
}
