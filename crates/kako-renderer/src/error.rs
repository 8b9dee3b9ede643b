//! Rendering errors.

/// Error rendering a post.
///
/// Untrusted input never produces one of these: unknown posts, unknown
/// boards in quotes and broken markup all degrade to plain output. Errors
/// indicate the renderer was set up wrong.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// The board a post belongs to is not configured.
    #[error("board not configured: {0}")]
    MissingBoard(String),
}
