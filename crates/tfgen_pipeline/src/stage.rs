//! Stage identifiers and the stage invoker.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use tfgen_core::Documentation;
use tfgen_llm::GenerationBackend;

use crate::decode::{decode, decode_documentation, StageRecord};
use crate::error::{PipelineError, PipelineResult};

/// The five pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Requirements,
    Architecture,
    CodeGeneration,
    Validation,
    Documentation,
}

impl StageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requirements => "requirements",
            Self::Architecture => "architecture",
            Self::CodeGeneration => "code_generation",
            Self::Validation => "validation",
            Self::Documentation => "documentation",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Submits stage prompts to the generation backend and decodes the replies.
///
/// The invoker never touches session history itself; it only chooses which
/// session id each call runs under.
#[derive(Clone)]
pub struct StageInvoker {
    backend: Arc<dyn GenerationBackend>,
}

impl StageInvoker {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Submit a prompt and return the complete, unparsed response.
    pub async fn invoke(
        &self,
        stage: StageKind,
        session_id: &str,
        prompt: &str,
    ) -> PipelineResult<String> {
        info!(stage = %stage, session = %session_id, backend = self.backend.name(), "Invoking stage");

        let response = self
            .backend
            .invoke(session_id, prompt)
            .await
            .map_err(|source| PipelineError::BackendUnavailable { stage, source })?;

        debug!(stage = %stage, chars = response.len(), "Stage response received");
        Ok(response)
    }

    /// Invoke a structured stage and decode its record.
    pub async fn run<T: StageRecord>(&self, session_id: &str, prompt: &str) -> PipelineResult<T> {
        let raw = self.invoke(T::STAGE, session_id, prompt).await?;
        decode::<T>(&raw)
    }

    /// Invoke the documentation stage. Only backend failures are errors.
    pub async fn run_documentation(
        &self,
        session_id: &str,
        prompt: &str,
    ) -> PipelineResult<Documentation> {
        let raw = self
            .invoke(StageKind::Documentation, session_id, prompt)
            .await?;
        Ok(decode_documentation(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfgen_core::ValidationResult;
    use tfgen_llm::{MockBackend, MockResponse};

    #[tokio::test]
    async fn test_run_decodes_record() {
        let mock = MockBackend::new().add_response(
            r#"{"validation_status": "passed", "syntax_valid": true,
                "configuration_valid": true, "errors": [], "error_count": 0, "summary": "ok"}"#,
        );
        let invoker = StageInvoker::new(Arc::new(mock.clone()));

        let result: ValidationResult = invoker.run("s1", "validate").await.unwrap();
        assert!(!result.should_regenerate());
        assert_eq!(mock.captured_calls()[0].session_id, "s1");
    }

    #[tokio::test]
    async fn test_backend_failure_is_unavailable() {
        let mock = MockBackend::new().add_failure(MockResponse::Unavailable("503".to_string()));
        let invoker = StageInvoker::new(Arc::new(mock));

        let err = invoker
            .invoke(StageKind::Architecture, "s", "p")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::BackendUnavailable {
                stage: StageKind::Architecture,
                ..
            }
        ));
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(StageKind::CodeGeneration.to_string(), "code_generation");
        assert_eq!(
            serde_json::to_string(&StageKind::Validation).unwrap(),
            "\"validation\""
        );
    }
}
