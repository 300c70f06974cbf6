use thiserror::Error;

/// Result type for summarizer operations
pub type Result<T> = std::result::Result<T, SummarizerError>;

/// Errors that can occur during summarization
#[derive(Error, Debug)]
pub enum SummarizerError {
    /// The model backend failed or produced an unusable result
    #[error("Model error: {0}")]
    Model(String),

    /// Every chunk failed, or no summarizable chunks existed
    #[error("Failed to generate any summary")]
    EmptyResult,

    /// Unknown backend mode string
    #[error("Unsupported summarizer mode '{0}' (expected 'onnx' or 'stub')")]
    InvalidMode(String),

    /// Unknown model id
    #[error("Unknown summarization model '{requested}'. Available: {available}")]
    UnknownModel { requested: String, available: String },
}

impl SummarizerError {
    /// Create a model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }
}
