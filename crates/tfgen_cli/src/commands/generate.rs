//! Generate command - run the full pipeline for one description.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use thiserror::Error;
use tracing::info;

use tfgen_llm::{LlmAdapter, LlmProvider};
use tfgen_pipeline::{PipelineController, PipelineOutput, Scenario, Settings, SCENARIOS};

/// Returned under `--strict` when validation hit the iteration cap.
#[derive(Error, Debug)]
#[error("Validation did not converge after {iterations} iteration(s)")]
pub struct NotConverged {
    pub iterations: u32,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["description", "input_file", "scenario"]),
))]
pub struct GenerateArgs {
    /// Infrastructure description
    description: Option<String>,

    /// Read the description from a file
    #[arg(short, long)]
    input_file: Option<PathBuf>,

    /// Use a built-in scenario (id or number, see `tfgen scenarios`)
    #[arg(short, long)]
    scenario: Option<String>,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum validation rounds
    #[arg(long)]
    max_iterations: Option<u32>,

    /// Settings file (defaults to ./tfgen.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// LLM provider (openai, anthropic)
    #[arg(long)]
    provider: Option<LlmProvider>,

    /// Model override
    #[arg(long)]
    model: Option<String>,

    /// Fail when validation does not converge
    #[arg(long)]
    strict: bool,
}

pub async fn execute(args: GenerateArgs) -> Result<()> {
    let description = resolve_description(&args)?;

    let mut settings = Settings::load(args.config.as_deref()).context("Failed to load settings")?;
    if let Some(output) = args.output {
        settings.pipeline.output_dir = output;
    }
    if let Some(max) = args.max_iterations {
        settings.pipeline.max_validation_iterations = max;
    }
    if let Some(provider) = args.provider {
        settings.llm.provider = Some(provider);
    }
    if let Some(model) = args.model {
        settings.llm.model = Some(model);
    }
    settings.pipeline.validate()?;

    let backend =
        LlmAdapter::from_settings(&settings.llm).context("Failed to configure LLM backend")?;
    info!(
        provider = %backend.provider(),
        model = backend.model(),
        output = ?settings.pipeline.output_dir,
        "Generating infrastructure"
    );

    let controller = PipelineController::new(Arc::new(backend), settings.pipeline);
    let output = controller
        .run(&description)
        .await
        .context("Pipeline failed")?;

    print_summary(&output);

    if args.strict && !output.converged() {
        return Err(NotConverged {
            iterations: output.iterations,
        }
        .into());
    }
    Ok(())
}

fn resolve_description(args: &GenerateArgs) -> Result<String> {
    if let Some(text) = &args.description {
        return Ok(text.clone());
    }
    if let Some(path) = &args.input_file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {:?}", path));
    }
    if let Some(key) = &args.scenario {
        let scenario = Scenario::find(key).ok_or_else(|| {
            let ids: Vec<&str> = SCENARIOS.iter().map(|s| s.id).collect();
            anyhow::anyhow!(
                "Unknown scenario '{}'. Available: {}",
                key,
                ids.join(", ")
            )
        })?;
        println!("📝 Scenario: {}", scenario.name);
        return Ok(scenario.description.to_string());
    }
    anyhow::bail!("Provide a description, --input-file or --scenario")
}

fn print_summary(output: &PipelineOutput) {
    println!();
    println!("✅ Pipeline complete (run {})", output.run_id);
    println!();
    println!("   Application:  {}", output.requirements.application_name);
    println!("   Architecture: {}", output.architecture.architecture_name);
    println!("   Components:   {}", output.requirements.components.len());

    println!();
    println!("📦 Modules:");
    for module in &output.code.modules {
        println!("   - {} ({} files)", module.module_name, module.files.len());
    }

    println!();
    println!("🌍 Environments:");
    for (name, env) in &output.code.environments {
        println!("   - {} ({} files)", name, env.files().len());
    }

    println!();
    println!("📚 Documentation:");
    for (kind, _) in output.documentation.populated() {
        println!("   - {}", kind.filename());
    }

    println!();
    if output.converged() {
        println!(
            "🔍 Validation passed after {} iteration(s): {}",
            output.iterations, output.validation.summary
        );
    } else {
        println!(
            "⚠️  Validation did not converge after {} iteration(s): {}",
            output.iterations, output.validation.summary
        );
    }
    for warning in &output.warnings {
        println!("   ⚠️  {}", warning);
    }

    let elapsed = output.finished_at - output.started_at;
    println!();
    println!(
        "📁 {} files written to {:?} in {}s",
        output.written_files.len(),
        output.output_dir,
        elapsed.num_seconds()
    );
}
