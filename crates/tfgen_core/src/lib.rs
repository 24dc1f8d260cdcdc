//! # tfgen_core
//!
//! Stage records exchanged by the tfgen pipeline.
//!
//! Each stage of the pipeline produces exactly one of these records and hands
//! it, by value, to the next stage:
//!
//! ```text
//! user text ─▶ Requirements ─▶ Architecture ─▶ CodeBundle ⇄ ValidationResult ─▶ Documentation
//! ```
//!
//! All records are plain serde values so they can be embedded in prompts as
//! JSON and decoded from model output.

pub mod architecture;
pub mod bundle;
pub mod documentation;
pub mod error;
pub mod requirements;
pub mod validation;

pub use architecture::{
    Architecture, ArchitectureCheck, ArchitectureModule, IamConfig, NetworkingConfig, Resource,
};
pub use bundle::{CodeBundle, EnvironmentConfig, TerraformFile, TerraformModule, ENVIRONMENT_FILES};
pub use documentation::{DocumentKind, Documentation, DEFAULT_README_HEADING};
pub use error::{CoreError, CoreResult};
pub use requirements::{Component, ComponentCategory, Environment, Requirements};
pub use validation::{
    Severity, ValidationError, ValidationResult, ValidationStatus, MAX_ERRORS, MAX_MESSAGE_LEN,
    MAX_SUMMARY_LEN,
};

/// Serialize a stage record as indented JSON, the form embedded in prompts
/// and written as metadata.
pub fn to_pretty_json<T: serde::Serialize>(value: &T) -> CoreResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
