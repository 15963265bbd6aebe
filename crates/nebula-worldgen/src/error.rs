//! World generation error types.

use nebula_config::ConfigError;
use nebula_facet::PipelineError;

/// Errors raised while assembling or running the world generator.
#[derive(Debug, thiserror::Error)]
pub enum WorldGenError {
    /// The configuration could not be loaded or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The facet pipeline could not be assembled or a provider failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// A worker thread could not be started.
    #[error("failed to start generation workers: {0}")]
    Workers(#[from] std::io::Error),
}
