//! # tfgen_pipeline
//!
//! Turns a natural-language infrastructure request into Terraform code and
//! documentation through a chain of generation stages.
//!
//! ## Stages
//!
//! 1. **Requirements** - structured requirements from the user's text
//! 2. **Architecture** - modules, dependencies and deployment order
//! 3. **Code generation** - Terraform modules and environment configs
//! 4. **Validation** - model critique, looped with regeneration until accepted
//!    or the iteration cap is hit
//! 5. **Documentation** - README and optional guides
//!
//! Model output goes through [`normalize`] and [`decode`], which strip code
//! fences, repair small JSON defects and check the result against the
//! stage's schema.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tfgen_llm::LlmAdapter;
//! use tfgen_pipeline::{PipelineConfig, PipelineController};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = Arc::new(LlmAdapter::from_env()?);
//! let controller = PipelineController::new(backend, PipelineConfig::new("./output", 5));
//! let output = controller.run("A web app with a Postgres database").await?;
//! if !output.converged() {
//!     eprintln!("{:?}", output.warnings);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod decode;
pub mod error;
pub mod feedback;
pub mod normalize;
pub mod prompts;
pub mod scenarios;
pub mod schema;
pub mod stage;
pub mod validation_loop;

pub use config::{PipelineConfig, Settings, DEFAULT_CONFIG_FILE, DEFAULT_MAX_VALIDATION_ITERATIONS};
pub use controller::{PipelineController, PipelineOutput, RunSummary, RUN_SUMMARY_FILE};
pub use decode::{decode, decode_documentation, parse_json, StageRecord};
pub use error::{PipelineError, PipelineResult, MAX_EXCERPT_LEN};
pub use feedback::format_feedback;
pub use normalize::normalize;
pub use scenarios::{Scenario, SCENARIOS};
pub use stage::{StageInvoker, StageKind};
pub use validation_loop::{LoopOutcome, LoopState, Termination, ValidationLoop};
