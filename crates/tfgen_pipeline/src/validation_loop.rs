//! Validation/regeneration loop.
//!
//! ```text
//! Generating ─▶ Validating ─┬─▶ Accepted
//!                  ▲        ├─▶ Exhausted
//!                  │        ▼
//!                  └── Regenerating
//! ```
//!
//! Generation, validation and regeneration all run under one session id, so
//! every regeneration call sees all earlier attempts and feedback.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tfgen_core::{Architecture, CodeBundle, ValidationResult};

use crate::error::{PipelineError, PipelineResult};
use crate::feedback::format_feedback;
use crate::prompts;
use crate::stage::StageInvoker;

/// Loop states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    /// Initial code generation
    Generating,
    Validating,
    /// Generating again from validation feedback
    Regenerating,
    /// Terminal: validation accepted the bundle
    Accepted,
    /// Terminal: iteration cap reached without acceptance
    Exhausted,
}

/// How the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Accepted,
    Exhausted,
}

impl Termination {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Result of a loop run. The bundle and validation are always the last
/// ones seen, accepted or not.
#[derive(Debug, Clone)]
pub struct LoopOutcome {
    pub bundle: CodeBundle,
    pub validation: ValidationResult,
    pub termination: Termination,
    /// Validation rounds performed
    pub iterations: u32,
    /// Every state entered, in order
    pub transitions: Vec<LoopState>,
}

impl LoopOutcome {
    pub fn regenerations(&self) -> usize {
        self.transitions
            .iter()
            .filter(|s| **s == LoopState::Regenerating)
            .count()
    }
}

/// Drives (generate, validate) rounds for one architecture.
pub struct ValidationLoop<'a> {
    invoker: &'a StageInvoker,
    architecture: &'a Architecture,
    session_id: String,
    max_iterations: u32,
}

impl<'a> ValidationLoop<'a> {
    pub fn new(
        invoker: &'a StageInvoker,
        architecture: &'a Architecture,
        session_id: impl Into<String>,
        max_iterations: u32,
    ) -> Self {
        Self {
            invoker,
            architecture,
            session_id: session_id.into(),
            max_iterations,
        }
    }

    /// Run the loop to a terminal state.
    ///
    /// Decode and backend failures on any call abort the loop; failed
    /// validations do not.
    pub async fn run(&self) -> PipelineResult<LoopOutcome> {
        if self.max_iterations == 0 {
            return Err(PipelineError::InvalidConfig(
                "max_validation_iterations must be at least 1".to_string(),
            ));
        }

        let mut transitions = vec![LoopState::Generating];
        info!(session = %self.session_id, "Generating Terraform code");
        let prompt = prompts::code_generation_prompt(self.architecture)?;
        let mut bundle: CodeBundle = self.invoker.run(&self.session_id, &prompt).await?;

        let mut iteration = 1;
        loop {
            transitions.push(LoopState::Validating);
            info!(
                session = %self.session_id,
                iteration,
                max = self.max_iterations,
                files = bundle.file_count(),
                "Validating Terraform code"
            );
            let prompt = prompts::validation_prompt(&bundle)?;
            let validation: ValidationResult = self.invoker.run(&self.session_id, &prompt).await?;

            if !validation.should_regenerate() {
                info!(iteration, "Validation accepted: {}", validation.summary);
                transitions.push(LoopState::Accepted);
                return Ok(LoopOutcome {
                    bundle,
                    validation,
                    termination: Termination::Accepted,
                    iterations: iteration,
                    transitions,
                });
            }

            if iteration >= self.max_iterations {
                warn!(
                    iteration,
                    errors = validation.errors.len(),
                    "Validation did not converge, keeping last generated code"
                );
                transitions.push(LoopState::Exhausted);
                return Ok(LoopOutcome {
                    bundle,
                    validation,
                    termination: Termination::Exhausted,
                    iterations: iteration,
                    transitions,
                });
            }

            transitions.push(LoopState::Regenerating);
            info!(
                iteration,
                status = %validation.validation_status,
                errors = validation.errors.len(),
                "Validation failed, regenerating from feedback"
            );
            let feedback = format_feedback(&validation);
            let prompt = prompts::regeneration_prompt(self.architecture, &bundle, &feedback)?;
            bundle = self.invoker.run(&self.session_id, &prompt).await?;
            iteration += 1;
        }
    }
}
