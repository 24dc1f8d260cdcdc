//! tfgen CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments or configuration
//! - 3: Validation did not converge (with --strict)
//! - 4: Generation backend unavailable
//! - 5: Malformed or mismatched model output
//! - 6: Output write failure

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tfgen_iac::IacError;
use tfgen_llm::LlmError;
use tfgen_pipeline::PipelineError;

mod commands;

use commands::generate::NotConverged;
use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const NOT_CONVERGED: u8 = 3;
    pub const BACKEND_UNAVAILABLE: u8 = 4;
    pub const MALFORMED_OUTPUT: u8 = 5;
    pub const OUTPUT_ERROR: u8 = 6;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let default_directives = if cli.verbose {
        "tfgen=debug,warn"
    } else if cli.quiet {
        "tfgen=warn,warn"
    } else {
        "tfgen=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));
    let registry = tracing_subscriber::registry().with(filter);
    let log_result = if cli.log_json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().with_target(false)).try_init()
    };

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::execute(args).await,
        Commands::Scenarios => commands::scenarios::execute(),
        Commands::Inspect(args) => commands::inspect::execute(args),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if cause.downcast_ref::<NotConverged>().is_some() {
            return ExitCodes::NOT_CONVERGED;
        }
        if let Some(err) = cause.downcast_ref::<PipelineError>() {
            return match err {
                PipelineError::BackendUnavailable { .. } => ExitCodes::BACKEND_UNAVAILABLE,
                PipelineError::MalformedResponse { .. } | PipelineError::SchemaMismatch { .. } => {
                    ExitCodes::MALFORMED_OUTPUT
                }
                PipelineError::InvalidConfig(_) => ExitCodes::INVALID_ARGS,
                PipelineError::Output(_) => ExitCodes::OUTPUT_ERROR,
                PipelineError::Serialization(_) => ExitCodes::GENERAL_ERROR,
            };
        }
        if let Some(err) = cause.downcast_ref::<LlmError>() {
            return match err {
                LlmError::NotConfigured | LlmError::UnknownProvider(_) => ExitCodes::INVALID_ARGS,
                _ => ExitCodes::BACKEND_UNAVAILABLE,
            };
        }
        if let Some(err) = cause.downcast_ref::<IacError>() {
            return match err {
                IacError::NotATree(_) => ExitCodes::INVALID_ARGS,
                _ => ExitCodes::OUTPUT_ERROR,
            };
        }
    }
    ExitCodes::GENERAL_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use tfgen_pipeline::StageKind;

    fn code_for(err: impl std::error::Error + Send + Sync + 'static) -> u8 {
        let result: anyhow::Result<()> = Err(err).context("while running");
        categorize_error(&result.unwrap_err())
    }

    #[test]
    fn test_pipeline_errors_map_to_exit_codes() {
        assert_eq!(
            code_for(PipelineError::BackendUnavailable {
                stage: StageKind::Validation,
                source: LlmError::Unavailable {
                    attempts: 5,
                    last_error: "503".to_string()
                },
            }),
            ExitCodes::BACKEND_UNAVAILABLE
        );
        assert_eq!(
            code_for(PipelineError::SchemaMismatch {
                stage: StageKind::Requirements,
                detail: "missing".to_string()
            }),
            ExitCodes::MALFORMED_OUTPUT
        );
        assert_eq!(
            code_for(PipelineError::InvalidConfig("bad".to_string())),
            ExitCodes::INVALID_ARGS
        );
        assert_eq!(
            code_for(PipelineError::Output(IacError::UnsafePath("..".to_string()))),
            ExitCodes::OUTPUT_ERROR
        );
    }

    #[test]
    fn test_other_errors_map_to_exit_codes() {
        assert_eq!(code_for(LlmError::NotConfigured), ExitCodes::INVALID_ARGS);
        assert_eq!(
            code_for(NotConverged { iterations: 3 }),
            ExitCodes::NOT_CONVERGED
        );
        assert_eq!(
            categorize_error(&anyhow::anyhow!("something else")),
            ExitCodes::GENERAL_ERROR
        );
    }
}
