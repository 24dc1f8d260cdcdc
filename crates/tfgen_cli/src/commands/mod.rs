//! CLI command definitions.

use clap::{Parser, Subcommand};

pub mod generate;
pub mod inspect;
pub mod scenarios;

/// tfgen - Terraform from natural-language infrastructure requests
#[derive(Parser)]
#[command(name = "tfgen")]
#[command(version, about = "tfgen - Terraform from natural-language infrastructure requests")]
#[command(long_about = r#"
tfgen turns a plain-language description of cloud infrastructure into
Terraform modules, environment configurations and documentation.

PIPELINE:
  requirements  → Structured requirements from the description
  architecture  → Modules, dependencies and deployment order
  code          → Terraform modules and environment configs
  validation    → Model review, regenerating until accepted or capped
  documentation → README and optional guides

CONFIGURATION:
  tfgen.toml in the working directory (or --config), then TFGEN_OUTPUT_DIR,
  TFGEN_MAX_ITERATIONS and TFGEN_LLM_MODEL, then command-line flags.
  API keys are read from OPENAI_API_KEY or ANTHROPIC_API_KEY.
  RUST_LOG overrides the log filter; TFGEN_LOG_JSON=true switches to JSON logs.

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments or configuration
  3 - Validation did not converge (with --strict)
  4 - Generation backend unavailable
  5 - Malformed or mismatched model output
  6 - Output write failure
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "TFGEN_LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate Terraform and documentation from a description
    Generate(generate::GenerateArgs),

    /// List built-in demo scenarios
    Scenarios,

    /// Show the contents of a generated output directory
    Inspect(inspect::InspectArgs),
}
