//! JSON schemas for the structured stage records.
//!
//! Model output is checked against these before deserialization so that a
//! mismatch reports every offending field at once.

use serde_json::{json, Value};

use tfgen_core::{ComponentCategory, Environment, MAX_ERRORS, MAX_MESSAGE_LEN, MAX_SUMMARY_LEN};

fn string_array() -> Value {
    json!({ "type": "array", "items": { "type": "string" } })
}

pub fn requirements() -> Value {
    json!({
        "type": "object",
        "required": ["application_name", "description", "components", "environment"],
        "properties": {
            "application_name": { "type": "string" },
            "description": { "type": "string" },
            "components": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["type", "service"],
                    "properties": {
                        "type": { "enum": ComponentCategory::ALL },
                        "service": { "type": "string" },
                        "requirements": { "type": "object" },
                        "notes": { "type": "string" }
                    }
                }
            },
            "regions": string_array(),
            "environment": { "enum": Environment::ALL },
            "estimated_scale": { "type": "object" }
        }
    })
}

pub fn architecture() -> Value {
    json!({
        "type": "object",
        "required": ["architecture_name", "description", "modules", "deployment_order"],
        "properties": {
            "architecture_name": { "type": "string" },
            "description": { "type": "string" },
            "modules": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["module_name", "purpose", "resources"],
                    "properties": {
                        "module_name": { "type": "string", "minLength": 1 },
                        "purpose": { "type": "string" },
                        "resources": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "required": ["type", "name"],
                                "properties": {
                                    "type": { "type": "string" },
                                    "name": { "type": "string" },
                                    "properties": { "type": "object" }
                                }
                            }
                        },
                        "outputs": string_array(),
                        "dependencies": string_array()
                    }
                }
            },
            "networking": {
                "type": "object",
                "properties": {
                    "vpc_required": { "type": "boolean" },
                    "vpc_name": { "type": "string" },
                    "subnets": { "type": "array" },
                    "firewall_rules": { "type": "array" }
                }
            },
            "iam": {
                "type": "object",
                "properties": {
                    "service_accounts": { "type": "array" },
                    "roles": { "type": "array" }
                }
            },
            "deployment_order": string_array()
        }
    })
}

pub fn code_bundle() -> Value {
    let optional_file = json!({ "type": "string" });
    json!({
        "type": "object",
        "required": ["terraform_version", "modules"],
        "properties": {
            "terraform_version": { "type": "string" },
            "modules": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["module_name", "path", "files"],
                    "properties": {
                        "module_name": { "type": "string", "minLength": 1 },
                        "path": { "type": "string" },
                        "files": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "required": ["filename", "content"],
                                "properties": {
                                    "filename": { "type": "string", "minLength": 1 },
                                    "content": { "type": "string" }
                                }
                            }
                        }
                    }
                }
            },
            "environments": {
                "type": "object",
                "additionalProperties": {
                    "type": "object",
                    "properties": {
                        "main_tf": optional_file,
                        "variables_tf": optional_file,
                        "outputs_tf": optional_file,
                        "provider_tf": optional_file,
                        "terraform_tfvars_example": optional_file
                    }
                }
            }
        }
    })
}

pub fn validation_result() -> Value {
    json!({
        "type": "object",
        "required": [
            "validation_status",
            "syntax_valid",
            "configuration_valid",
            "error_count",
            "summary"
        ],
        "properties": {
            "validation_status": { "enum": ["passed", "failed"] },
            "syntax_valid": { "type": "boolean" },
            "configuration_valid": { "type": "boolean" },
            "errors": {
                "type": "array",
                "maxItems": MAX_ERRORS,
                "items": {
                    "type": "object",
                    "required": ["severity", "file", "message", "fix"],
                    "properties": {
                        "severity": { "enum": ["error", "warning", "info"] },
                        "file": { "type": "string" },
                        "message": { "type": "string", "maxLength": MAX_MESSAGE_LEN },
                        "fix": { "type": "string", "maxLength": MAX_MESSAGE_LEN }
                    }
                }
            },
            "error_count": { "type": "integer", "minimum": 0 },
            "summary": { "type": "string", "maxLength": MAX_SUMMARY_LEN }
        }
    })
}
