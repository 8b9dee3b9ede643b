//! CLI error types.

use kako_config::ConfigError;
use kako_renderer::RenderError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid post dump: {0}")]
    Json(#[from] serde_json::Error),
}
