//! Inspect command - list a generated output directory.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::warn;

use tfgen_core::DocumentKind;
use tfgen_iac::read_code_bundle;
use tfgen_pipeline::{RunSummary, RUN_SUMMARY_FILE};

#[derive(Args)]
pub struct InspectArgs {
    /// Output directory of a previous `tfgen generate` run
    dir: PathBuf,
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let bundle = read_code_bundle(&args.dir)
        .with_context(|| format!("Failed to read generated tree at {:?}", args.dir))?;

    println!("📁 {:?}", args.dir);
    if !bundle.terraform_version.is_empty() {
        println!("   Terraform version: {}", bundle.terraform_version);
    }

    let summary_path = args.dir.join(RUN_SUMMARY_FILE);
    if summary_path.exists() {
        let content = fs::read_to_string(&summary_path)?;
        match serde_json::from_str::<RunSummary>(&content) {
            Ok(summary) => {
                println!("   Run: {}", summary.run_id);
                println!(
                    "   Validation: {} after {} iteration(s) ({:?})",
                    summary.validation_status, summary.iterations, summary.termination
                );
                for warning in &summary.warnings {
                    println!("   ⚠️  {}", warning);
                }
            }
            Err(e) => warn!("Ignoring unreadable {:?}: {}", summary_path, e),
        }
    }

    println!();
    println!("📦 Modules:");
    for module in &bundle.modules {
        println!("   {}", module.path);
        for file in &module.files {
            println!("     - {} ({} bytes)", file.filename, file.content.len());
        }
    }

    println!();
    println!("🌍 Environments:");
    for (name, env) in &bundle.environments {
        let files: Vec<&str> = env.files().into_iter().map(|(f, _)| f).collect();
        println!("   {}: {}", name, files.join(", "));
    }

    let docs: Vec<&str> = DocumentKind::ALL
        .iter()
        .map(|k| k.filename())
        .filter(|f| args.dir.join(f).exists())
        .collect();
    if !docs.is_empty() {
        println!();
        println!("📚 Documentation: {}", docs.join(", "));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tfgen_core::{CodeBundle, TerraformFile, TerraformModule};
    use tfgen_iac::write_code_bundle;

    #[test]
    fn test_inspect_generated_tree() {
        let dir = TempDir::new().unwrap();
        let bundle = CodeBundle {
            terraform_version: ">= 1.5".to_string(),
            modules: vec![TerraformModule {
                module_name: "vpc".to_string(),
                path: "modules/vpc".to_string(),
                files: vec![TerraformFile::new("main.tf", "resource \"x\" \"y\" {}")],
            }],
            environments: Default::default(),
        };
        write_code_bundle(&bundle, dir.path()).unwrap();
        fs::write(dir.path().join(RUN_SUMMARY_FILE), "not json").unwrap();

        let args = InspectArgs {
            dir: dir.path().to_path_buf(),
        };
        assert!(execute(args).is_ok());
    }

    #[test]
    fn test_inspect_rejects_non_tree() {
        let dir = TempDir::new().unwrap();
        let args = InspectArgs {
            dir: dir.path().to_path_buf(),
        };
        let err = execute(args).unwrap_err();
        assert!(err.downcast_ref::<tfgen_iac::IacError>().is_some());
    }
}
