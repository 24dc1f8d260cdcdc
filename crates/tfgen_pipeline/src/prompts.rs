//! Prompt templates for each stage.
//!
//! Every prompt embeds the previous stage's record as pretty JSON followed by
//! a fixed task instruction and the expected output shape.

use tfgen_core::{
    to_pretty_json, Architecture, CodeBundle, CoreResult, Requirements, ValidationResult,
};

const REQUIREMENTS_SHAPE: &str = r#"{
  "application_name": "short-kebab-name",
  "description": "What the application does",
  "components": [
    {
      "type": "compute | storage | database | networking | messaging | other",
      "service": "cloud service identifier",
      "requirements": { "key": "value" },
      "notes": "free text"
    }
  ],
  "regions": ["us-central1"],
  "environment": "dev | staging | prod",
  "estimated_scale": { "key": "value" }
}"#;

const ARCHITECTURE_SHAPE: &str = r#"{
  "architecture_name": "name",
  "description": "Architecture overview",
  "modules": [
    {
      "module_name": "vpc",
      "purpose": "What the module provisions",
      "resources": [
        { "type": "google_compute_network", "name": "main", "properties": {} }
      ],
      "outputs": ["network_id"],
      "dependencies": []
    }
  ],
  "networking": { "vpc_required": true, "vpc_name": "main", "subnets": [], "firewall_rules": [] },
  "iam": { "service_accounts": [], "roles": [] },
  "deployment_order": ["vpc"]
}"#;

const CODE_SHAPE: &str = r#"{
  "terraform_version": "1.5",
  "modules": [
    {
      "module_name": "vpc",
      "path": "modules/vpc",
      "files": [
        { "filename": "main.tf", "content": "..." },
        { "filename": "variables.tf", "content": "..." },
        { "filename": "outputs.tf", "content": "..." }
      ]
    }
  ],
  "environments": {
    "prod": {
      "main_tf": "...",
      "variables_tf": "...",
      "outputs_tf": "...",
      "provider_tf": "...",
      "terraform_tfvars_example": "..."
    }
  }
}"#;

const VALIDATION_SHAPE: &str = r#"{
  "validation_status": "passed | failed",
  "syntax_valid": true,
  "configuration_valid": true,
  "errors": [
    { "severity": "error | warning | info", "file": "path/to/file", "message": "max 100 chars", "fix": "max 100 chars" }
  ],
  "error_count": 0,
  "summary": "max 200 chars"
}"#;

const DOCUMENTATION_SHAPE: &str = r##"{
  "readme": "# Title ...",
  "deployment_guide": "# Deployment ...",
  "security_guide": "# Security ...",
  "troubleshooting": "# Troubleshooting ...",
  "architecture_diagram": "graph TD ..."
}"##;

fn respond_with(shape: &str) -> String {
    format!(
        "Respond with a single JSON object in a ```json code block, matching this structure:\n\n{}",
        shape
    )
}

pub fn requirements_prompt(user_input: &str) -> String {
    format!(
        "Extract structured infrastructure requirements from this request:\n\n\
         {}\n\n\
         Identify every component the application needs, the target regions, the \
         environment and the expected scale. Use only the listed component types.\n\n{}",
        user_input.trim(),
        respond_with(REQUIREMENTS_SHAPE)
    )
}

pub fn architecture_prompt(requirements: &Requirements) -> CoreResult<String> {
    Ok(format!(
        "Design a cloud infrastructure architecture based on these requirements:\n\n\
         {}\n\n\
         Group resources into focused Terraform modules. Every dependency must name \
         another module, and deployment_order must list every module after the \
         modules it depends on.\n\n{}",
        to_pretty_json(requirements)?,
        respond_with(ARCHITECTURE_SHAPE)
    ))
}

pub fn code_generation_prompt(architecture: &Architecture) -> CoreResult<String> {
    Ok(format!(
        "Generate complete Terraform code for this architecture:\n\n\
         {}\n\n\
         Write one module per architecture module with main.tf, variables.tf and \
         outputs.tf, plus environment configurations that call the modules. Pin \
         provider versions, expose configurable values as variables and export \
         important attributes as outputs.\n\n{}",
        to_pretty_json(architecture)?,
        respond_with(CODE_SHAPE)
    ))
}

pub fn validation_prompt(code: &CodeBundle) -> CoreResult<String> {
    Ok(format!(
        "Validate this Terraform code thoroughly:\n\n\
         {}\n\n\
         Check for syntax errors, missing required arguments, invalid resource \
         references, security issues such as public access, and best-practice \
         violations. Report at most 10 findings, keep each message and fix under \
         100 characters and the summary under 200 characters. Set error_count to \
         the number of findings.\n\n{}",
        to_pretty_json(code)?,
        respond_with(VALIDATION_SHAPE)
    ))
}

pub fn regeneration_prompt(
    architecture: &Architecture,
    previous: &CodeBundle,
    feedback: &str,
) -> CoreResult<String> {
    Ok(format!(
        "The previous Terraform code had validation errors. Please fix them.\n\n\
         ORIGINAL ARCHITECTURE:\n{}\n\n\
         PREVIOUS CODE:\n{}\n\n\
         VALIDATION FEEDBACK:\n{}\n\
         Generate corrected Terraform code that addresses all the issues above. \
         Return the complete code, not only the changed files.\n\n{}",
        to_pretty_json(architecture)?,
        to_pretty_json(previous)?,
        feedback,
        respond_with(CODE_SHAPE)
    ))
}

pub fn documentation_prompt(
    architecture: &Architecture,
    code: &CodeBundle,
    validation: &ValidationResult,
) -> CoreResult<String> {
    Ok(format!(
        "Generate comprehensive documentation for this Terraform infrastructure:\n\n\
         ARCHITECTURE:\n{}\n\n\
         TERRAFORM CODE:\n{}\n\n\
         VALIDATION RESULTS:\n{}\n\n\
         Include a README, a deployment guide, a security guide, a troubleshooting \
         guide and a Mermaid architecture diagram. The README is required.\n\n{}",
        to_pretty_json(architecture)?,
        to_pretty_json(code)?,
        to_pretty_json(validation)?,
        respond_with(DOCUMENTATION_SHAPE)
    ))
}
