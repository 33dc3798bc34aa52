use thiserror::Error;

/// Failures a caller of the summarization engine can act on
#[derive(Debug, Error)]
pub enum DigestError {
    /// No topic survived across all fragments; an empty summary is never returned
    #[error("no main points were generated from any transcript fragment")]
    NoTopics,

    #[error("transcript is empty")]
    EmptyTranscript,

    /// Transport failure talking to the generation service
    #[error("generation failed: {0}")]
    Generation(String),

    /// Payload could not be coerced into the expected shape
    #[error("invalid generation payload: {0}")]
    Schema(String),
}

impl From<serde_json::Error> for DigestError {
    fn from(err: serde_json::Error) -> Self {
        DigestError::Schema(err.to_string())
    }
}

impl From<anyhow::Error> for DigestError {
    fn from(err: anyhow::Error) -> Self {
        DigestError::Generation(format!("{:#}", err))
    }
}
