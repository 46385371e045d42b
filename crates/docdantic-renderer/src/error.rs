//! Renderer error types.

/// Error raised while preprocessing a document.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Configuration block under a directive is not valid JSON.
    #[error("invalid docdantic configuration for directive on line {line}: {source}")]
    Configuration {
        /// 1-based line number of the directive.
        line: usize,
        /// JSON parse failure.
        #[source]
        source: serde_json::Error,
    },
}
