//! Error types for the pipeline.

use thiserror::Error;

use crate::stage::StageKind;

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Longest slice of model output kept for diagnostics.
pub const MAX_EXCERPT_LEN: usize = 500;

/// Errors that abort a pipeline run.
///
/// Validation-loop non-convergence is not an error; it is reported on the
/// pipeline output instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Output could not be parsed, even after repair
    #[error("Malformed {stage} response: {reason}")]
    MalformedResponse {
        stage: StageKind,
        reason: String,
        excerpt: String,
    },

    /// Output parsed but did not match the stage record
    #[error("{stage} response does not match schema: {detail}")]
    SchemaMismatch { stage: StageKind, detail: String },

    #[error("Backend unavailable during {stage} stage: {source}")]
    BackendUnavailable {
        stage: StageKind,
        #[source]
        source: tfgen_llm::LlmError,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to write output: {0}")]
    Output(#[from] tfgen_iac::IacError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] tfgen_core::CoreError),
}

impl PipelineError {
    pub fn malformed(stage: StageKind, reason: impl Into<String>, text: &str) -> Self {
        Self::MalformedResponse {
            stage,
            reason: reason.into(),
            excerpt: excerpt(text),
        }
    }

    /// Stage the error was raised in, if any.
    pub fn stage(&self) -> Option<StageKind> {
        match self {
            Self::MalformedResponse { stage, .. }
            | Self::SchemaMismatch { stage, .. }
            | Self::BackendUnavailable { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// First [`MAX_EXCERPT_LEN`] characters of `text`.
pub fn excerpt(text: &str) -> String {
    match text.char_indices().nth(MAX_EXCERPT_LEN) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
