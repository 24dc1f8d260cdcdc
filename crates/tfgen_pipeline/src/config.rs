//! Pipeline configuration.
//!
//! Settings come from an optional TOML file, then environment overrides;
//! the CLI applies its own flags last.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use tfgen_llm::LlmSettings;

use crate::error::{PipelineError, PipelineResult};

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "tfgen.toml";

pub const DEFAULT_MAX_VALIDATION_ITERATIONS: u32 = 20;

/// Settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub output_dir: PathBuf,
    /// Upper bound on validation rounds, at least 1
    pub max_validation_iterations: u32,
    /// Write requirements.json, architecture.json and run.json
    pub write_metadata: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./output"),
            max_validation_iterations: DEFAULT_MAX_VALIDATION_ITERATIONS,
            write_metadata: true,
        }
    }
}

impl PipelineConfig {
    pub fn new(output_dir: impl Into<PathBuf>, max_validation_iterations: u32) -> Self {
        Self {
            output_dir: output_dir.into(),
            max_validation_iterations,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.max_validation_iterations == 0 {
            return Err(PipelineError::InvalidConfig(
                "max_validation_iterations must be at least 1".to_string(),
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(PipelineError::InvalidConfig(
                "output_dir must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Full tfgen settings as stored in `tfgen.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub pipeline: PipelineConfig,
    pub llm: LlmSettings,
}

impl Settings {
    /// Load settings from `path`, or from `tfgen.toml` in the working
    /// directory if it exists, then apply environment overrides.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file is not.
    pub fn load(path: Option<&Path>) -> PipelineResult<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        settings.apply_env_overrides()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> PipelineResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::InvalidConfig(format!("Failed to read config file at {:?}: {}", path, e))
        })?;
        let settings = Self::from_toml(&content).map_err(|e| match e {
            PipelineError::InvalidConfig(msg) => {
                PipelineError::InvalidConfig(format!("{:?}: {}", path, msg))
            }
            other => other,
        })?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> PipelineResult<Self> {
        toml::from_str(content)
            .map_err(|e| PipelineError::InvalidConfig(format!("Failed to parse config: {}", e)))
    }

    /// Apply `TFGEN_OUTPUT_DIR`, `TFGEN_MAX_ITERATIONS` and `TFGEN_LLM_MODEL`.
    pub fn apply_env_overrides(&mut self) -> PipelineResult<()> {
        if let Some(dir) = env_value("TFGEN_OUTPUT_DIR") {
            self.pipeline.output_dir = PathBuf::from(dir);
        }
        if let Some(raw) = env_value("TFGEN_MAX_ITERATIONS") {
            self.pipeline.max_validation_iterations = raw.parse().map_err(|_| {
                PipelineError::InvalidConfig(format!(
                    "TFGEN_MAX_ITERATIONS must be a positive integer, got {:?}",
                    raw
                ))
            })?;
        }
        if let Some(model) = env_value("TFGEN_LLM_MODEL") {
            self.llm.model = Some(model);
        }
        Ok(())
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
