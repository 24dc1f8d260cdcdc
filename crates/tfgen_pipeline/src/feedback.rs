//! Regeneration feedback built from a validation result.

use std::fmt::Write;

use tfgen_core::{Severity, ValidationError, ValidationResult};

const HEADER: &str = "The Terraform code has the following issues that need to be fixed:\n";
const ERRORS_HEADING: &str = "\n**CRITICAL ERRORS:**\n";
const WARNINGS_HEADING: &str = "\n**WARNINGS:**\n";

/// Render a validation result as critique for the next generation prompt.
///
/// Error-severity entries come first, then warnings, each group in its
/// original order. Info entries are left out. Each entry renders as
/// `- [file] message` followed by an indented `Fix:` line.
pub fn format_feedback(result: &ValidationResult) -> String {
    let mut feedback = String::from(HEADER);

    for (severity, heading) in [
        (Severity::Error, ERRORS_HEADING),
        (Severity::Warning, WARNINGS_HEADING),
    ] {
        let mut entries = result
            .errors
            .iter()
            .filter(|e| e.severity == severity)
            .peekable();
        if entries.peek().is_none() {
            continue;
        }
        feedback.push_str(heading);
        for entry in entries {
            push_entry(&mut feedback, entry);
        }
    }

    if !result.summary.trim().is_empty() {
        let _ = write!(feedback, "\n**SUMMARY:** {}\n", result.summary.trim());
    }

    feedback
}

fn push_entry(feedback: &mut String, entry: &ValidationError) {
    let _ = writeln!(feedback, "- [{}] {}", entry.file, entry.message);
    let _ = writeln!(feedback, "  Fix: {}", entry.fix);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(severity: Severity, file: &str, message: &str) -> ValidationError {
        ValidationError::new(severity, file, message, format!("fix {}", message))
    }

    #[test]
    fn test_single_error_rendered() {
        let result = ValidationResult::failed(
            vec![ValidationError::new(Severity::Error, "a.tf", "x", "y")],
            "",
        );
        let feedback = format_feedback(&result);
        assert!(feedback.contains("- [a.tf] x\n  Fix: y\n"));
        assert!(feedback.contains("**CRITICAL ERRORS:**"));
        assert!(!feedback.contains("**WARNINGS:**"));
        assert!(!feedback.contains("**SUMMARY:**"));
    }

    #[test]
    fn test_errors_precede_warnings_in_order() {
        let result = ValidationResult::failed(
            vec![
                entry(Severity::Warning, "w1.tf", "w1"),
                entry(Severity::Error, "e1.tf", "e1"),
                entry(Severity::Info, "i1.tf", "i1"),
                entry(Severity::Warning, "w2.tf", "w2"),
                entry(Severity::Error, "e2.tf", "e2"),
            ],
            "Two errors",
        );
        let feedback = format_feedback(&result);

        let pos = |needle: &str| feedback.find(needle).unwrap();
        assert!(pos("[e1.tf]") < pos("[e2.tf]"));
        assert!(pos("[e2.tf]") < pos("[w1.tf]"));
        assert!(pos("[w1.tf]") < pos("[w2.tf]"));
        assert!(!feedback.contains("i1"));
        assert!(feedback.ends_with("**SUMMARY:** Two errors\n"));
    }

    #[test]
    fn test_deterministic() {
        let result = ValidationResult::failed(vec![entry(Severity::Warning, "a", "b")], "s");
        assert_eq!(format_feedback(&result), format_feedback(&result));
    }
}
