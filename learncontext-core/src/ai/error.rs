use thiserror::Error;

/// Failures at the model transport boundary. These are the only errors the
/// tutor and grading flows surface to callers.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("Network error: {0}")]
    Transport(anyhow::Error),

    /// Rendered verbatim so the caller can show the provider's own message.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(anyhow::Error),
}

impl From<serde_json::Error> for AiError {
    fn from(source: serde_json::Error) -> Self {
        Self::MalformedResponse(anyhow::anyhow!(source))
    }
}
