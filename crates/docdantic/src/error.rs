//! CLI error types.

use docdantic_config::ConfigError;
use docdantic_model::ModelError;
use docdantic_renderer::RenderError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Model(#[from] ModelError),

    #[error("{path}: {source}")]
    Render {
        path: String,
        #[source]
        source: RenderError,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Pattern(#[from] glob::PatternError),

    #[error("{0}")]
    Validation(String),
}
