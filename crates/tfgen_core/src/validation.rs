//! Validation results produced by the validation stage.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound on the number of reported errors.
pub const MAX_ERRORS: usize = 10;
/// Upper bound on the length of an error message or fix suggestion.
pub const MAX_MESSAGE_LEN: usize = 100;
/// Upper bound on the length of the summary.
pub const MAX_SUMMARY_LEN: usize = 200;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Passed,
    Failed,
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => f.write_str("passed"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A single finding reported against a generated file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationError {
    pub severity: Severity,
    pub file: String,
    pub message: String,
    pub fix: String,
}

impl ValidationError {
    pub fn new(
        severity: Severity,
        file: impl Into<String>,
        message: impl Into<String>,
        fix: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            file: file.into(),
            message: message.into(),
            fix: fix.into(),
        }
    }
}

/// Result of one validation round. Replaced, never mutated, each iteration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationResult {
    pub validation_status: ValidationStatus,
    pub syntax_valid: bool,
    pub configuration_valid: bool,
    #[serde(default)]
    pub errors: Vec<ValidationError>,
    /// Cached `errors.len()`.
    pub error_count: usize,
    pub summary: String,
}

impl ValidationResult {
    pub fn passed(summary: impl Into<String>) -> Self {
        Self {
            validation_status: ValidationStatus::Passed,
            syntax_valid: true,
            configuration_valid: true,
            errors: Vec::new(),
            error_count: 0,
            summary: summary.into(),
        }
    }

    pub fn failed(errors: Vec<ValidationError>, summary: impl Into<String>) -> Self {
        Self {
            validation_status: ValidationStatus::Failed,
            syntax_valid: true,
            configuration_valid: false,
            error_count: errors.len(),
            errors,
            summary: summary.into(),
        }
    }

    /// Whether `error_count` agrees with the error list.
    pub fn is_consistent(&self) -> bool {
        self.error_count == self.errors.len()
    }

    pub fn has_severity(&self, severity: Severity) -> bool {
        self.errors.iter().any(|e| e.severity == severity)
    }

    pub fn count_severity(&self, severity: Severity) -> usize {
        self.errors.iter().filter(|e| e.severity == severity).count()
    }

    /// Whether the bundle that produced this result must be regenerated.
    ///
    /// A failed status always forces regeneration, and so does any
    /// error-severity entry even when the status says `passed`.
    pub fn should_regenerate(&self) -> bool {
        self.validation_status == ValidationStatus::Failed || self.has_severity(Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_status_regenerates() {
        let result = ValidationResult::failed(
            vec![ValidationError::new(Severity::Error, "a.tf", "x", "y")],
            "broken",
        );
        assert!(result.should_regenerate());
        assert!(result.is_consistent());
    }

    #[test]
    fn test_passed_with_warnings_accepts() {
        let mut result = ValidationResult::passed("fine");
        result.errors = vec![
            ValidationError::new(Severity::Warning, "main.tf", "no labels", "add labels"),
            ValidationError::new(Severity::Info, "main.tf", "consider cmek", "use kms"),
        ];
        result.error_count = 2;
        assert!(!result.should_regenerate());
    }

    #[test]
    fn test_passed_with_error_entry_regenerates() {
        let mut result = ValidationResult::passed("claims fine");
        result.errors = vec![ValidationError::new(Severity::Error, "main.tf", "bad ref", "fix ref")];
        result.error_count = 1;
        assert!(result.should_regenerate());
    }

    #[test]
    fn test_failed_without_entries_regenerates() {
        let result = ValidationResult::failed(Vec::new(), "failed");
        assert!(result.should_regenerate());
    }

    #[test]
    fn test_severity_counts() {
        let result = ValidationResult::failed(
            vec![
                ValidationError::new(Severity::Error, "a.tf", "1", "1"),
                ValidationError::new(Severity::Warning, "a.tf", "2", "2"),
                ValidationError::new(Severity::Error, "b.tf", "3", "3"),
            ],
            "",
        );
        assert_eq!(result.count_severity(Severity::Error), 2);
        assert_eq!(result.count_severity(Severity::Info), 0);
    }
}
