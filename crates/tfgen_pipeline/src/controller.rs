//! Pipeline controller: runs the five stages in order and persists output.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tfgen_core::{Architecture, CodeBundle, Documentation, Requirements, ValidationResult};
use tfgen_iac::{write_code_bundle, write_documentation, write_json};
use tfgen_llm::GenerationBackend;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::prompts;
use crate::stage::{StageInvoker, StageKind};
use crate::validation_loop::{Termination, ValidationLoop};

pub const REQUIREMENTS_FILE: &str = "requirements.json";
pub const ARCHITECTURE_FILE: &str = "architecture.json";
pub const RUN_SUMMARY_FILE: &str = "run.json";

/// Everything a pipeline run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub run_id: String,
    pub requirements: Requirements,
    pub architecture: Architecture,
    pub code: CodeBundle,
    pub validation: ValidationResult,
    pub documentation: Documentation,
    pub output_dir: PathBuf,
    pub termination: Termination,
    pub iterations: u32,
    /// Non-fatal problems, including validation non-convergence
    pub warnings: Vec<String>,
    pub written_files: Vec<PathBuf>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PipelineOutput {
    pub fn converged(&self) -> bool {
        self.termination.is_accepted()
    }
}

/// Summary persisted as `run.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub terraform_version: String,
    pub termination: Termination,
    pub iterations: u32,
    pub validation_status: String,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub files: Vec<PathBuf>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Sequences requirements, architecture, code generation with validation,
/// and documentation.
pub struct PipelineController {
    invoker: StageInvoker,
    config: PipelineConfig,
}

impl PipelineController {
    pub fn new(backend: Arc<dyn GenerationBackend>, config: PipelineConfig) -> Self {
        Self {
            invoker: StageInvoker::new(backend),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the whole pipeline for one infrastructure description.
    ///
    /// Stage failures abort the run. Files of completed stages that were
    /// already persisted (metadata) are left in place.
    pub async fn run(&self, user_input: &str) -> PipelineResult<PipelineOutput> {
        self.config.validate()?;
        if user_input.trim().is_empty() {
            return Err(PipelineError::InvalidConfig(
                "infrastructure description is empty".to_string(),
            ));
        }

        let run_id = uuid::Uuid::new_v4().to_string();
        let started_at = Utc::now();
        let output_dir = self.config.output_dir.clone();
        let mut written_files = Vec::new();
        let mut warnings = Vec::new();

        info!(run_id = %run_id, output = ?output_dir, "Starting pipeline");

        // Requirements
        let requirements: Requirements = self
            .invoker
            .run(
                &session(&run_id, StageKind::Requirements),
                &prompts::requirements_prompt(user_input),
            )
            .await?;
        info!(
            stage = %StageKind::Requirements,
            application = %requirements.application_name,
            components = requirements.components.len(),
            "Requirements extracted"
        );
        self.write_metadata(&requirements, &output_dir, REQUIREMENTS_FILE, &mut written_files)?;

        // Architecture
        let architecture: Architecture = self
            .invoker
            .run(
                &session(&run_id, StageKind::Architecture),
                &prompts::architecture_prompt(&requirements)?,
            )
            .await?;
        info!(
            stage = %StageKind::Architecture,
            name = %architecture.architecture_name,
            modules = architecture.modules.len(),
            "Architecture designed"
        );
        warnings.extend(architecture.check().warnings);
        self.write_metadata(&architecture, &output_dir, ARCHITECTURE_FILE, &mut written_files)?;

        // Code generation and validation share one session
        let outcome = ValidationLoop::new(
            &self.invoker,
            &architecture,
            session(&run_id, StageKind::CodeGeneration),
            self.config.max_validation_iterations,
        )
        .run()
        .await?;

        if !outcome.termination.is_accepted() {
            let message = format!(
                "Validation did not converge after {} iteration(s); {} issue(s) remain: {}",
                outcome.iterations,
                outcome.validation.errors.len(),
                outcome.validation.summary
            );
            warn!("{}", message);
            warnings.push(message);
        }

        // Documentation
        let documentation = self
            .invoker
            .run_documentation(
                &session(&run_id, StageKind::Documentation),
                &prompts::documentation_prompt(&architecture, &outcome.bundle, &outcome.validation)?,
            )
            .await?;

        written_files.extend(write_code_bundle(&outcome.bundle, &output_dir)?);
        written_files.extend(write_documentation(&documentation, &output_dir)?);

        let finished_at = Utc::now();
        if self.config.write_metadata {
            let summary = RunSummary {
                run_id: run_id.clone(),
                terraform_version: outcome.bundle.terraform_version.clone(),
                termination: outcome.termination,
                iterations: outcome.iterations,
                validation_status: outcome.validation.validation_status.to_string(),
                warnings: warnings.clone(),
                files: written_files
                    .iter()
                    .map(|p| p.strip_prefix(&output_dir).unwrap_or(p).to_path_buf())
                    .collect(),
                started_at,
                finished_at,
            };
            written_files.push(write_json(&summary, &output_dir, RUN_SUMMARY_FILE)?);
        }

        info!(
            run_id = %run_id,
            files = written_files.len(),
            converged = outcome.termination.is_accepted(),
            "Pipeline complete"
        );

        Ok(PipelineOutput {
            run_id,
            requirements,
            architecture,
            code: outcome.bundle,
            validation: outcome.validation,
            documentation,
            output_dir,
            termination: outcome.termination,
            iterations: outcome.iterations,
            warnings,
            written_files,
            started_at,
            finished_at,
        })
    }

    fn write_metadata<T: Serialize>(
        &self,
        value: &T,
        output_dir: &Path,
        filename: &str,
        written: &mut Vec<PathBuf>,
    ) -> PipelineResult<()> {
        if self.config.write_metadata {
            written.push(write_json(value, output_dir, filename)?);
        }
        Ok(())
    }
}

/// Session id for a stage within a run.
fn session(run_id: &str, stage: StageKind) -> String {
    let suffix = match stage {
        StageKind::CodeGeneration | StageKind::Validation => "codegen",
        other => other.as_str(),
    };
    format!("{}-{}", run_id, suffix)
}
