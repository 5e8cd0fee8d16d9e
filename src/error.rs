use thiserror::Error;

/// Failures that stop an analysis before a triage verdict exists.
///
/// Quality rejection and "no wound" are not errors; they are regular
/// outcomes of [`crate::report::AnalysisOutcome`].
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No image data provided")]
    EmptyPayload,

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Analysis error: {0}")]
    Internal(String),
}

impl AnalysisError {
    /// Message placed in the outward-facing error record.
    ///
    /// Decode failures keep the short wording clients already match on;
    /// the underlying cause only goes to the log.
    pub fn public_message(&self) -> String {
        match self {
            AnalysisError::Decode(_) => "Failed to decode image".to_string(),
            other => other.to_string(),
        }
    }
}
