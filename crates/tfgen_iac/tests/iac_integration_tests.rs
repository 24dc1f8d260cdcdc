//! Integration tests for the file tree writer and reader.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;

use tfgen_core::{CodeBundle, Documentation, EnvironmentConfig, TerraformFile, TerraformModule};
use tfgen_iac::{read_code_bundle, write_code_bundle, write_documentation, write_json, IacError};
use tempfile::tempdir;

fn sample_bundle() -> CodeBundle {
    let mut environments = BTreeMap::new();
    environments.insert(
        "dev".to_string(),
        EnvironmentConfig {
            main_tf: Some("module \"network\" {\n  source = \"../../modules/network\"\n}\n".to_string()),
            variables_tf: Some("variable \"project_id\" {}\n".to_string()),
            outputs_tf: None,
            provider_tf: Some("provider \"google\" {}\n".to_string()),
            terraform_tfvars_example: Some("project_id = \"my-project\"\n".to_string()),
        },
    );
    environments.insert(
        "prod".to_string(),
        EnvironmentConfig {
            main_tf: Some("# prod\n".to_string()),
            ..Default::default()
        },
    );

    CodeBundle {
        terraform_version: ">= 1.5".to_string(),
        modules: vec![
            TerraformModule {
                module_name: "compute".to_string(),
                path: "modules/compute".to_string(),
                files: vec![
                    TerraformFile::new("main.tf", "resource \"google_cloud_run_service\" \"api\" {}\n"),
                    TerraformFile::new("outputs.tf", "output \"url\" {}\n"),
                ],
            },
            TerraformModule {
                module_name: "network".to_string(),
                path: "modules/network".to_string(),
                files: vec![
                    TerraformFile::new("main.tf", "resource \"google_compute_network\" \"vpc\" {}\n"),
                    TerraformFile::new("variables.tf", "variable \"region\" {}\n"),
                ],
            },
        ],
        environments,
    }
}

fn entry_set(bundle: &CodeBundle) -> BTreeSet<(PathBuf, String)> {
    bundle.file_entries().into_iter().collect()
}

#[test]
fn test_write_code_bundle_layout() {
    let temp = tempdir().unwrap();
    let bundle = sample_bundle();

    let written = write_code_bundle(&bundle, temp.path()).unwrap();
    assert_eq!(written.len(), bundle.file_count());

    let root = temp.path();
    assert!(root.join("modules/compute/main.tf").exists());
    assert!(root.join("modules/network/variables.tf").exists());
    assert!(root.join("environments/dev/main.tf").exists());
    assert!(root.join("environments/dev/terraform.tfvars.example").exists());
    assert!(root.join("environments/prod/main.tf").exists());

    // Absent environment fields are not written
    assert!(!root.join("environments/dev/outputs.tf").exists());
    assert!(!root.join("environments/prod/provider.tf").exists());

    let content = fs::read_to_string(root.join("environments/dev/provider.tf")).unwrap();
    assert_eq!(content, "provider \"google\" {}\n");
}

#[test]
fn test_code_bundle_round_trip() {
    let temp = tempdir().unwrap();
    let bundle = sample_bundle();

    write_code_bundle(&bundle, temp.path()).unwrap();
    let reread = read_code_bundle(temp.path()).unwrap();

    assert_eq!(entry_set(&reread), entry_set(&bundle));
    assert_eq!(reread.modules[0].path, "modules/compute");
    assert_eq!(reread.environments.len(), 2);
}

#[test]
fn test_reader_picks_up_terraform_version_from_run_summary() {
    let temp = tempdir().unwrap();
    let bundle = sample_bundle();

    write_code_bundle(&bundle, temp.path()).unwrap();
    write_json(
        &serde_json::json!({ "terraform_version": ">= 1.5" }),
        temp.path(),
        "run.json",
    )
    .unwrap();

    let reread = read_code_bundle(temp.path()).unwrap();
    assert_eq!(reread.terraform_version, ">= 1.5");
}

#[test]
fn test_reader_ignores_unknown_environment_files() {
    let temp = tempdir().unwrap();
    let env_dir = temp.path().join("environments/dev");
    fs::create_dir_all(&env_dir).unwrap();
    fs::write(env_dir.join("main.tf"), "# main").unwrap();
    fs::write(env_dir.join("notes.txt"), "scratch").unwrap();

    let bundle = read_code_bundle(temp.path()).unwrap();
    let dev = &bundle.environments["dev"];
    assert_eq!(dev.main_tf.as_deref(), Some("# main"));
    assert_eq!(dev.files().len(), 1);
    assert!(bundle.modules.is_empty());
}

#[test]
fn test_reader_rejects_non_tree() {
    let temp = tempdir().unwrap();
    let result = read_code_bundle(temp.path());
    assert!(matches!(result, Err(IacError::NotATree(_))));
}

#[test]
fn test_write_documentation_readme_only() {
    let temp = tempdir().unwrap();
    let doc = Documentation::readme_only("# Infra\n");

    let written = write_documentation(&doc, temp.path()).unwrap();
    assert_eq!(written, vec![temp.path().join("README.md")]);
    assert!(!temp.path().join("DEPLOYMENT.md").exists());
    assert!(!temp.path().join("architecture.mmd").exists());
}

#[test]
fn test_write_documentation_all_documents() {
    let temp = tempdir().unwrap();
    let doc = Documentation {
        readme: "# Infra\n".to_string(),
        deployment_guide: Some("# Deploy\n".to_string()),
        security_guide: Some("# Security\n".to_string()),
        troubleshooting: Some("   ".to_string()),
        architecture_diagram: Some("graph TD\n  A-->B\n".to_string()),
    };

    let written = write_documentation(&doc, temp.path()).unwrap();
    assert_eq!(written.len(), 4);
    assert!(temp.path().join("DEPLOYMENT.md").exists());
    assert!(temp.path().join("SECURITY.md").exists());
    assert!(temp.path().join("architecture.mmd").exists());
    // Blank documents are skipped
    assert!(!temp.path().join("TROUBLESHOOTING.md").exists());
}

#[test]
fn test_unsafe_module_name_rejected() {
    let temp = tempdir().unwrap();
    let mut bundle = sample_bundle();
    bundle.modules[0].module_name = "../escape".to_string();

    let result = write_code_bundle(&bundle, temp.path());
    assert!(matches!(result, Err(IacError::UnsafePath(_))));
}

#[test]
fn test_unsafe_filename_rejected() {
    let temp = tempdir().unwrap();
    let mut bundle = sample_bundle();
    bundle.modules[1].files[0].filename = "/etc/hosts".to_string();

    let result = write_code_bundle(&bundle, temp.path());
    assert!(matches!(result, Err(IacError::UnsafePath(_))));
}

#[test]
fn test_unsafe_later_entry_writes_nothing() {
    let temp = tempdir().unwrap();
    let mut bundle = sample_bundle();
    bundle.modules[1].module_name = "../escape".to_string();

    let result = write_code_bundle(&bundle, temp.path());
    assert!(matches!(result, Err(IacError::UnsafePath(_))));
    assert!(!temp.path().join("modules/compute/main.tf").exists());
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}
