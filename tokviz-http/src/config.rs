//! Process configuration, read once from the environment at startup.

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::HeaderValue;
use thiserror::Error;
use tokviz_core::PipelineConfig;
use tokviz_embed::{EmbeddingSource, HashedSource, SeededSource, UniformSource};

pub use tokviz_types::{API_VERSION, SERVICE_NAME};

pub const ENV_HOST: &str = "SERVER_HOST";
/// Set by hosting platforms; takes precedence over `SERVER_PORT`.
pub const ENV_PORT: &str = "PORT";
pub const ENV_SERVER_PORT: &str = "SERVER_PORT";
pub const ENV_CORS_ORIGINS: &str = "CORS_ORIGINS";
pub const ENV_WORKER_THREADS: &str = "TOKVIZ_WORKER_THREADS";
pub const ENV_PIPELINE_CONFIG: &str = "TOKVIZ_PIPELINE_CONFIG";
pub const ENV_EMBEDDING: &str = "TOKVIZ_EMBEDDING";
pub const ENV_SEED: &str = "TOKVIZ_SEED";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("pipeline config: {0}")]
    Pipeline(#[from] tokviz_core::ConfigError),
}

/// Which embedding source backs the vector synthesizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmbeddingKind {
    Uniform,
    Hashed,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<HeaderValue>,
    pub worker_threads: usize,
    pub pipeline_config: Option<PathBuf>,
    pub embedding: EmbeddingKind,
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            cors_origins: vec![HeaderValue::from_static(DEFAULT_CORS_ORIGIN)],
            worker_threads: 1,
            pipeline_config: None,
            embedding: EmbeddingKind::Uniform,
            seed: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        if let Some(host) = lookup(ENV_HOST) {
            cfg.host = host;
        }
        let port = lookup(ENV_PORT)
            .filter(|v| !v.is_empty())
            .map(|v| (ENV_PORT, v))
            .or_else(|| lookup(ENV_SERVER_PORT).map(|v| (ENV_SERVER_PORT, v)));
        if let Some((key, value)) = port {
            cfg.port = parse(key, &value)?;
        }
        if let Some(origins) = lookup(ENV_CORS_ORIGINS) {
            cfg.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    HeaderValue::from_str(s).map_err(|e| ConfigError::Invalid {
                        key: ENV_CORS_ORIGINS,
                        reason: e.to_string(),
                    })
                })
                .collect::<Result<_, _>>()?;
        }
        if let Some(threads) = lookup(ENV_WORKER_THREADS) {
            cfg.worker_threads = parse(ENV_WORKER_THREADS, &threads)?;
            if cfg.worker_threads == 0 {
                return Err(ConfigError::Invalid {
                    key: ENV_WORKER_THREADS,
                    reason: "must be at least 1".into(),
                });
            }
        }
        cfg.pipeline_config = lookup(ENV_PIPELINE_CONFIG)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        if let Some(kind) = lookup(ENV_EMBEDDING) {
            cfg.embedding = match kind.to_lowercase().as_str() {
                "uniform" | "random" => EmbeddingKind::Uniform,
                "hashed" | "lexical" => EmbeddingKind::Hashed,
                other => {
                    return Err(ConfigError::Invalid {
                        key: ENV_EMBEDDING,
                        reason: format!("unknown embedding source '{other}'"),
                    })
                }
            };
        }
        if let Some(seed) = lookup(ENV_SEED) {
            cfg.seed = Some(parse(ENV_SEED, &seed)?);
        }

        Ok(cfg)
    }

    /// Host and port to bind; the host may be a name and is resolved at bind time.
    pub fn bind_target(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }

    pub fn load_pipeline(&self) -> Result<PipelineConfig, ConfigError> {
        match &self.pipeline_config {
            Some(path) => Ok(PipelineConfig::from_path(path)?),
            None => Ok(PipelineConfig::default()),
        }
    }

    pub fn embedding_source(&self) -> Arc<dyn EmbeddingSource> {
        match (self.embedding, self.seed) {
            (EmbeddingKind::Hashed, _) => Arc::new(HashedSource),
            (EmbeddingKind::Uniform, Some(seed)) => Arc::new(SeededSource::new(seed)),
            (EmbeddingKind::Uniform, None) => Arc::new(UniformSource),
        }
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}
