/// Errors that can occur while running a review.
///
/// Each variant wraps a specific failure domain. Library crates use this type
/// directly; the binary converts to `miette::Report` at the boundary.
///
/// # Examples
///
/// ```
/// use zai_review_core::ReviewError;
///
/// let err = ReviewError::Config("missing API key".into());
/// assert!(err.to_string().contains("missing API key"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ReviewError {
    /// Invalid or missing configuration, or a run outside a pull-request event.
    #[error("{0}")]
    #[diagnostic(
        code(zai_review::config),
        help("check the action inputs and that the workflow is triggered by pull_request")
    )]
    Config(String),

    /// Network-level failure talking to either API.
    #[error("transport error: {0}")]
    #[diagnostic(code(zai_review::transport))]
    Transport(String),

    /// Chat-completion API error or unusable response.
    #[error("{0}")]
    #[diagnostic(code(zai_review::llm))]
    Llm(String),

    /// GitHub REST API error response.
    #[error("GitHub API error: {0}")]
    #[diagnostic(code(zai_review::github))]
    GitHub(String),

    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    #[diagnostic(code(zai_review::io))]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    #[diagnostic(code(zai_review::serialization))]
    Serialization(#[from] serde_json::Error),
}
