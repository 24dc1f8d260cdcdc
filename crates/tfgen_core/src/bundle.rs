//! Generated Terraform code bundle.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment config fields and the file each one is written to.
pub const ENVIRONMENT_FILES: [&str; 5] = [
    "main.tf",
    "variables.tf",
    "outputs.tf",
    "provider.tf",
    "terraform.tfvars.example",
];

/// A single generated file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TerraformFile {
    pub filename: String,
    pub content: String,
}

impl TerraformFile {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// A reusable module and its files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TerraformModule {
    pub module_name: String,
    /// Relative module path, e.g. `modules/vpc`
    pub path: String,
    pub files: Vec<TerraformFile>,
}

/// Environment-specific configuration that instantiates the modules.
///
/// Fields absent from the model output stay `None` and are not written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvironmentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_tf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables_tf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs_tf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_tf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform_tfvars_example: Option<String>,
}

impl EnvironmentConfig {
    /// Present fields paired with their file names, in [`ENVIRONMENT_FILES`] order.
    pub fn files(&self) -> Vec<(&'static str, &str)> {
        [
            &self.main_tf,
            &self.variables_tf,
            &self.outputs_tf,
            &self.provider_tf,
            &self.terraform_tfvars_example,
        ]
        .into_iter()
        .zip(ENVIRONMENT_FILES)
        .filter_map(|(content, name)| content.as_deref().map(|c| (name, c)))
        .collect()
    }

    /// Set the field that is written to `filename`. Returns false for unknown names.
    pub fn set_file(&mut self, filename: &str, content: String) -> bool {
        let slot = match filename {
            "main.tf" => &mut self.main_tf,
            "variables.tf" => &mut self.variables_tf,
            "outputs.tf" => &mut self.outputs_tf,
            "provider.tf" => &mut self.provider_tf,
            "terraform.tfvars.example" => &mut self.terraform_tfvars_example,
            _ => return false,
        };
        *slot = Some(content);
        true
    }
}

/// The complete generated artifact set for one run.
///
/// Regeneration replaces the whole bundle; it is never patched in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeBundle {
    pub terraform_version: String,
    pub modules: Vec<TerraformModule>,
    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentConfig>,
}

impl CodeBundle {
    pub fn file_count(&self) -> usize {
        let module_files: usize = self.modules.iter().map(|m| m.files.len()).sum();
        let env_files: usize = self.environments.values().map(|e| e.files().len()).sum();
        module_files + env_files
    }

    /// Every file of the bundle as a path relative to the output root,
    /// following the `modules/<name>/<file>` and `environments/<env>/<file>` layout.
    pub fn file_entries(&self) -> Vec<(PathBuf, String)> {
        let mut entries = Vec::with_capacity(self.file_count());
        for module in &self.modules {
            for file in &module.files {
                let path = PathBuf::from("modules")
                    .join(&module.module_name)
                    .join(&file.filename);
                entries.push((path, file.content.clone()));
            }
        }
        for (env_name, env) in &self.environments {
            for (filename, content) in env.files() {
                let path = PathBuf::from("environments").join(env_name).join(filename);
                entries.push((path, content.to_string()));
            }
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bundle() -> CodeBundle {
        let mut environments = BTreeMap::new();
        environments.insert(
            "prod".to_string(),
            EnvironmentConfig {
                main_tf: Some("module \"vpc\" {}".to_string()),
                provider_tf: Some("provider \"google\" {}".to_string()),
                ..Default::default()
            },
        );
        CodeBundle {
            terraform_version: "1.5".to_string(),
            modules: vec![TerraformModule {
                module_name: "vpc".to_string(),
                path: "modules/vpc".to_string(),
                files: vec![
                    TerraformFile::new("main.tf", "resource \"google_compute_network\" \"vpc\" {}"),
                    TerraformFile::new("outputs.tf", "output \"id\" {}"),
                ],
            }],
            environments,
        }
    }

    #[test]
    fn test_file_entries_layout() {
        let bundle = sample_bundle();
        let paths: Vec<String> = bundle
            .file_entries()
            .into_iter()
            .map(|(p, _)| p.to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(
            paths,
            vec![
                "modules/vpc/main.tf",
                "modules/vpc/outputs.tf",
                "environments/prod/main.tf",
                "environments/prod/provider.tf",
            ]
        );
        assert_eq!(bundle.file_count(), 4);
    }

    #[test]
    fn test_missing_environment_fields_deserialize() {
        let json = r#"{"terraform_version": "1.5", "modules": [], "environments": {"dev": {"main_tf": "x"}}}"#;
        let bundle: CodeBundle = serde_json::from_str(json).unwrap();
        let dev = &bundle.environments["dev"];
        assert_eq!(dev.files(), vec![("main.tf", "x")]);
        assert!(dev.variables_tf.is_none());
    }

    #[test]
    fn test_set_file() {
        let mut env = EnvironmentConfig::default();
        assert!(env.set_file("terraform.tfvars.example", "project_id = \"x\"".to_string()));
        assert!(!env.set_file("backend.tf", String::new()));
        assert_eq!(env.files().len(), 1);
    }
}
