//! Architecture design: Terraform modules, their resources and dependencies.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A Terraform resource planned inside a module.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    /// Terraform resource type, e.g. `google_cloud_run_service`
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

/// A planned Terraform module.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArchitectureModule {
    pub module_name: String,
    pub purpose: String,
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NetworkingConfig {
    #[serde(default)]
    pub vpc_required: bool,
    #[serde(default)]
    pub vpc_name: String,
    #[serde(default)]
    pub subnets: Vec<serde_json::Value>,
    #[serde(default)]
    pub firewall_rules: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IamConfig {
    #[serde(default)]
    pub service_accounts: Vec<serde_json::Value>,
    #[serde(default)]
    pub roles: Vec<serde_json::Value>,
}

/// Architecture produced from the requirements.
///
/// Every name in `deployment_order` must reference a module of this
/// architecture, and every dependency must reference another module that is
/// deployed earlier. See [`Architecture::check`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Architecture {
    pub architecture_name: String,
    pub description: String,
    pub modules: Vec<ArchitectureModule>,
    #[serde(default)]
    pub networking: NetworkingConfig,
    #[serde(default)]
    pub iam: IamConfig,
    pub deployment_order: Vec<String>,
}

/// Outcome of checking architecture invariants.
#[derive(Debug, Default)]
pub struct ArchitectureCheck {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ArchitectureCheck {
    fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Convert into a result, failing when any error was recorded.
    pub fn into_result(self) -> CoreResult<Vec<String>> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(CoreError::InvalidArchitecture(self.errors))
        }
    }
}

impl Architecture {
    /// Check the structural invariants of the architecture.
    pub fn check(&self) -> ArchitectureCheck {
        let mut check = ArchitectureCheck::default();

        let mut names = HashSet::new();
        for module in &self.modules {
            if !names.insert(module.module_name.as_str()) {
                check.add_error(format!("Duplicate module name '{}'", module.module_name));
            }
        }

        for module in &self.modules {
            for dep in &module.dependencies {
                if dep == &module.module_name {
                    check.add_error(format!("Module '{}' depends on itself", dep));
                } else if !names.contains(dep.as_str()) {
                    check.add_error(format!(
                        "Module '{}' depends on unknown module '{}'",
                        module.module_name, dep
                    ));
                }
            }
        }

        let mut position: HashMap<&str, usize> = HashMap::new();
        for (index, name) in self.deployment_order.iter().enumerate() {
            if !names.contains(name.as_str()) {
                check.add_error(format!("Deployment order references unknown module '{}'", name));
            }
            if position.insert(name.as_str(), index).is_some() {
                check.add_error(format!("Module '{}' appears twice in deployment order", name));
            }
        }

        for module in &self.modules {
            let Some(&own) = position.get(module.module_name.as_str()) else {
                check.add_warning(format!(
                    "Module '{}' is missing from deployment order",
                    module.module_name
                ));
                continue;
            };
            for dep in &module.dependencies {
                if let Some(&dep_pos) = position.get(dep.as_str()) {
                    if dep_pos > own {
                        check.add_error(format!(
                            "Module '{}' is deployed before its dependency '{}'",
                            module.module_name, dep
                        ));
                    }
                }
            }
        }

        check
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str, deps: &[&str]) -> ArchitectureModule {
        ArchitectureModule {
            module_name: name.to_string(),
            purpose: format!("{} module", name),
            resources: Vec::new(),
            outputs: Vec::new(),
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
        }
    }

    fn architecture(modules: Vec<ArchitectureModule>, order: &[&str]) -> Architecture {
        Architecture {
            architecture_name: "test".to_string(),
            description: "test architecture".to_string(),
            modules,
            networking: NetworkingConfig::default(),
            iam: IamConfig::default(),
            deployment_order: order.iter().map(|o| o.to_string()).collect(),
        }
    }

    #[test]
    fn test_valid_architecture() {
        let arch = architecture(
            vec![module("vpc", &[]), module("iam", &[]), module("cloud_run", &["vpc", "iam"])],
            &["vpc", "iam", "cloud_run"],
        );
        let warnings = arch.check().into_result().unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unknown_names_are_errors() {
        let arch = architecture(
            vec![module("cloud_run", &["vpc"])],
            &["cloud_run", "database"],
        );
        let check = arch.check();
        assert_eq!(check.errors.len(), 2);
        assert!(check.errors.iter().any(|e| e.contains("unknown module 'vpc'")));
        assert!(check.errors.iter().any(|e| e.contains("'database'")));
    }

    #[test]
    fn test_dependency_order_violation() {
        let arch = architecture(
            vec![module("vpc", &[]), module("cloud_run", &["vpc"])],
            &["cloud_run", "vpc"],
        );
        match arch.check().into_result() {
            Err(CoreError::InvalidArchitecture(errors)) => {
                assert!(errors[0].contains("deployed before its dependency 'vpc'"));
            }
            other => panic!("expected InvalidArchitecture, got {:?}", other),
        }
    }

    #[test]
    fn test_self_dependency_and_missing_order() {
        let arch = architecture(vec![module("vpc", &["vpc"]), module("gcs", &[])], &["vpc"]);
        let check = arch.check();
        assert!(check.errors.iter().any(|e| e.contains("depends on itself")));
        assert_eq!(check.warnings.len(), 1);
        assert!(arch.check().into_result().is_err());
    }

    #[test]
    fn test_networking_and_iam_default() {
        let json = r#"{
            "architecture_name": "a",
            "description": "d",
            "modules": [{"module_name": "vpc", "purpose": "net", "resources": [
                {"type": "google_compute_network", "name": "main", "properties": {"auto_create_subnetworks": false}}
            ]}],
            "deployment_order": ["vpc"]
        }"#;
        let arch: Architecture = serde_json::from_str(json).unwrap();
        assert!(!arch.networking.vpc_required);
        assert!(arch.iam.roles.is_empty());
        assert_eq!(arch.modules[0].resources[0].resource_type, "google_compute_network");
    }
}
