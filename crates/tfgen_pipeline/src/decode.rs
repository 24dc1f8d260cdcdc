//! Structured decoding of model output into stage records.
//!
//! Decoding runs in three steps: parse JSON (with a short chain of repair
//! strategies), check it against the stage's JSON schema, then deserialize
//! and apply per-record checks.

use jsonschema::JSONSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use tfgen_core::{
    Architecture, CodeBundle, CoreError, Documentation, Requirements, ValidationResult,
};

use crate::error::{PipelineError, PipelineResult};
use crate::normalize::normalize;
use crate::schema;
use crate::stage::StageKind;

/// A record produced by a structured stage.
pub trait StageRecord: DeserializeOwned {
    const STAGE: StageKind;

    /// JSON schema the raw value must satisfy.
    fn schema() -> Value;

    /// Checks that need the typed record.
    fn finish(self) -> PipelineResult<Self> {
        Ok(self)
    }
}

impl StageRecord for Requirements {
    const STAGE: StageKind = StageKind::Requirements;

    fn schema() -> Value {
        schema::requirements()
    }
}

impl StageRecord for Architecture {
    const STAGE: StageKind = StageKind::Architecture;

    fn schema() -> Value {
        schema::architecture()
    }

    fn finish(self) -> PipelineResult<Self> {
        let check = self.check();
        for warning in &check.warnings {
            warn!(stage = %Self::STAGE, "{}", warning);
        }
        match check.into_result() {
            Ok(_) => Ok(self),
            Err(CoreError::InvalidArchitecture(errors)) => Err(PipelineError::SchemaMismatch {
                stage: Self::STAGE,
                detail: errors.join("; "),
            }),
            Err(other) => Err(other.into()),
        }
    }
}

impl StageRecord for CodeBundle {
    const STAGE: StageKind = StageKind::CodeGeneration;

    fn schema() -> Value {
        schema::code_bundle()
    }
}

impl StageRecord for ValidationResult {
    const STAGE: StageKind = StageKind::Validation;

    fn schema() -> Value {
        schema::validation_result()
    }

    fn finish(mut self) -> PipelineResult<Self> {
        if !self.is_consistent() {
            warn!(
                stage = %Self::STAGE,
                reported = self.error_count,
                actual = self.errors.len(),
                "error_count does not match error list, using list length"
            );
            self.error_count = self.errors.len();
        }
        Ok(self)
    }
}

/// Decode raw model output into a stage record.
pub fn decode<T: StageRecord>(raw: &str) -> PipelineResult<T> {
    let text = normalize(raw);
    let value = parse_json(T::STAGE, &text)?;
    check_schema(T::STAGE, &T::schema(), &value)?;

    let record: T = serde_json::from_value(value).map_err(|e| PipelineError::SchemaMismatch {
        stage: T::STAGE,
        detail: e.to_string(),
    })?;
    record.finish()
}

/// Decode documentation output. Never fails.
///
/// Accepts a JSON document (optionally wrapped in a `documentation` key),
/// or markdown starting with a heading. Anything else is wrapped in a
/// placeholder README under the default heading.
pub fn decode_documentation(raw: &str) -> Documentation {
    let stage = StageKind::Documentation;
    let trimmed = raw.trim();

    if !trimmed.contains("```json") && trimmed.starts_with('#') {
        debug!(stage = %stage, "Treating response as markdown README");
        return Documentation::readme_only(trimmed);
    }

    let text = normalize(raw);
    if text.starts_with('#') {
        return Documentation::readme_only(text);
    }

    match parse_json(stage, &text).and_then(documentation_from_value) {
        Ok(doc) => return doc,
        Err(e) => debug!(stage = %stage, "Documentation is not JSON: {}", e),
    }

    warn!(stage = %stage, "Unrecognised documentation format, synthesizing README");
    Documentation::placeholder(trimmed)
}

fn documentation_from_value(value: Value) -> PipelineResult<Documentation> {
    let stage = StageKind::Documentation;
    let value = match value {
        Value::Object(mut map) if map.get("documentation").map_or(false, Value::is_object) => {
            map.remove("documentation").unwrap_or(Value::Null)
        }
        other => other,
    };

    let doc: Documentation =
        serde_json::from_value(value).map_err(|e| PipelineError::SchemaMismatch {
            stage,
            detail: e.to_string(),
        })?;

    if doc.readme.trim().is_empty() {
        return Err(PipelineError::SchemaMismatch {
            stage,
            detail: "readme is empty".to_string(),
        });
    }
    Ok(doc)
}

/// Validate a parsed value against a JSON schema, collecting every error.
pub fn check_schema(stage: StageKind, schema: &Value, value: &Value) -> PipelineResult<()> {
    let compiled = JSONSchema::compile(schema).map_err(|e| PipelineError::SchemaMismatch {
        stage,
        detail: format!("invalid schema: {}", e),
    })?;

    let details: Vec<String> = match compiled.validate(value) {
        Ok(()) => return Ok(()),
        Err(errors) => errors
            .map(|e| {
                let path = e.instance_path.to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{}: {}", path, e)
                }
            })
            .collect(),
    };

    Err(PipelineError::SchemaMismatch {
        stage,
        detail: details.join("; "),
    })
}

/// A repair strategy: given the current text and the error it produced,
/// return a candidate to try next, or `None` if the strategy does not apply.
type Repair = fn(&str, &serde_json::Error) -> Option<String>;

/// Repairs in the order they are tried. Each is applied at most once, to
/// the output of the previous step when that step applied.
const REPAIRS: [(&str, Repair); 3] = [
    ("embedded_json", extract_embedded_json),
    ("missing_comma", insert_missing_comma),
    ("unterminated_string", close_unterminated_string),
];

/// Parse JSON text, falling back to the repair chain.
pub fn parse_json(stage: StageKind, text: &str) -> PipelineResult<Value> {
    let first_error = match serde_json::from_str::<Value>(text) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    let mut current = text.to_string();
    let mut error_message = first_error.to_string();
    let mut last_error = first_error;

    for (name, repair) in REPAIRS {
        let Some(candidate) = repair(&current, &last_error) else {
            continue;
        };
        match serde_json::from_str::<Value>(&candidate) {
            Ok(value) => {
                debug!(stage = %stage, repair = name, "Recovered malformed JSON");
                return Ok(value);
            }
            Err(e) => {
                debug!(stage = %stage, repair = name, "Repair did not parse: {}", e);
                current = candidate;
                error_message = e.to_string();
                last_error = e;
            }
        }
    }

    Err(PipelineError::malformed(stage, error_message, text))
}

/// Cut the outermost `{...}` or `[...]` span out of surrounding prose.
fn extract_embedded_json(text: &str, _error: &serde_json::Error) -> Option<String> {
    let start = text.find(|c| c == '{' || c == '[')?;
    let span = matching_span(&text[start..])?;
    if start == 0 && span.len() == text.len() {
        return None;
    }
    Some(span.to_string())
}

/// Prefix of `text` (which starts with an opening bracket) up to and
/// including its matching closing bracket. Brackets inside strings are
/// ignored.
fn matching_span(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Insert a `,` where the parser expected a delimiter between elements.
fn insert_missing_comma(text: &str, error: &serde_json::Error) -> Option<String> {
    if !error.to_string().starts_with("expected `,`") {
        return None;
    }
    let offset = byte_offset(text, error.line(), error.column())?;
    let mut repaired = String::with_capacity(text.len() + 1);
    repaired.push_str(&text[..offset]);
    repaired.push(',');
    repaired.push_str(&text[offset..]);
    Some(repaired)
}

/// Byte offset of the character at a 1-based line and column.
fn byte_offset(text: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 || column == 0 {
        return None;
    }
    let line_start = if line == 1 {
        0
    } else {
        text.match_indices('\n').nth(line - 2).map(|(i, _)| i + 1)?
    };
    let offset = line_start + column - 1;
    (offset <= text.len() && text.is_char_boundary(offset)).then_some(offset)
}

/// Close a string cut off by truncation, then close every open bracket.
fn close_unterminated_string(text: &str, error: &serde_json::Error) -> Option<String> {
    if !error.is_eof() {
        return None;
    }
    let scan = scan_structure(text);
    if scan.quotes % 2 == 0 {
        return None;
    }

    let mut repaired = text.to_string();
    if scan.trailing_escape {
        repaired.pop();
    }
    repaired.push('"');
    repaired.extend(scan.open.iter().rev().map(|open| match open {
        '{' => '}',
        _ => ']',
    }));
    Some(repaired)
}

struct StructureScan {
    /// Unescaped double quotes
    quotes: usize,
    /// Brackets still open at the end, outermost first
    open: Vec<char>,
    /// Text ends in the middle of an escape sequence
    trailing_escape: bool,
}

fn scan_structure(text: &str) -> StructureScan {
    let mut scan = StructureScan {
        quotes: 0,
        open: Vec::new(),
        trailing_escape: false,
    };
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => {
                    in_string = false;
                    scan.quotes += 1;
                }
                _ => {}
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                scan.quotes += 1;
            }
            '{' | '[' => scan.open.push(c),
            '}' | ']' => {
                scan.open.pop();
            }
            _ => {}
        }
    }
    scan.trailing_escape = escaped;
    scan
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfgen_core::{DocumentKind, Severity, DEFAULT_README_HEADING};

    fn parse(text: &str) -> PipelineResult<Value> {
        parse_json(StageKind::Validation, text)
    }

    #[test]
    fn test_parse_valid_json() {
        assert_eq!(parse(r#"{"a": 1}"#).unwrap()["a"], 1);
    }

    #[test]
    fn test_missing_comma_repaired() {
        let value = parse(r#"{"a": 1 "b": 2}"#).unwrap();
        assert_eq!(value["a"], 1);
        assert_eq!(value["b"], 2);

        let multiline = "{\n  \"items\": [\n    {\"x\": 1}\n    {\"x\": 2}\n  ]\n}";
        let value = parse(multiline).unwrap();
        assert_eq!(value["items"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_unterminated_string_repaired() {
        let value = parse(r#"{"summary": "cut off here"#).unwrap();
        assert_eq!(value["summary"], "cut off here");

        let nested = r#"{"errors": [{"file": "main.tf", "message": "trunc"#;
        let value = parse(nested).unwrap();
        assert_eq!(value["errors"][0]["message"], "trunc");
    }

    #[test]
    fn test_embedded_json_extracted_from_prose() {
        let value = parse("Sure! {\"a\": {\"b\": \"}\"}} Let me know.").unwrap();
        assert_eq!(value["a"]["b"], "}");
    }

    #[test]
    fn test_unrepairable_is_malformed() {
        let err = parse("not json at all").unwrap_err();
        match err {
            PipelineError::MalformedResponse { stage, excerpt, .. } => {
                assert_eq!(stage, StageKind::Validation);
                assert_eq!(excerpt, "not json at all");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_validation_result() {
        let raw = r#"```json
{
  "validation_status": "failed",
  "syntax_valid": true,
  "configuration_valid": false,
  "errors": [
    {"severity": "error", "file": "a.tf", "message": "x", "fix": "y"}
  ],
  "error_count": 3,
  "summary": "One error"
}
```"#;
        let result: ValidationResult = decode(raw).unwrap();
        assert_eq!(result.errors[0].severity, Severity::Error);
        // Reconciled to the list length
        assert_eq!(result.error_count, 1);
        assert!(result.should_regenerate());
    }

    #[test]
    fn test_validation_bounds_enforced() {
        let long = "m".repeat(101);
        let raw = format!(
            r#"{{"validation_status": "passed", "syntax_valid": true, "configuration_valid": true,
               "errors": [{{"severity": "warning", "file": "a.tf", "message": "{}", "fix": "f"}}],
               "error_count": 1, "summary": "ok"}}"#,
            long
        );
        let err = decode::<ValidationResult>(&raw).unwrap_err();
        assert!(matches!(err, PipelineError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_missing_field_is_schema_mismatch() {
        let err = decode::<ValidationResult>(r#"{"validation_status": "passed"}"#).unwrap_err();
        match err {
            PipelineError::SchemaMismatch { stage, detail } => {
                assert_eq!(stage, StageKind::Validation);
                assert!(detail.contains("syntax_valid"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_architecture_invariants_enforced() {
        let raw = r#"{
            "architecture_name": "demo",
            "description": "d",
            "modules": [
                {"module_name": "app", "purpose": "p", "resources": [], "dependencies": ["db"]}
            ],
            "deployment_order": ["app"]
        }"#;
        match decode::<Architecture>(raw).unwrap_err() {
            PipelineError::SchemaMismatch { stage, detail } => {
                assert_eq!(stage, StageKind::Architecture);
                assert!(detail.contains("unknown module 'db'"), "{}", detail);
            }
            other => panic!("expected SchemaMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_documentation_json() {
        let raw = r##"```json
{"documentation": {"readme": "# App\n", "security_guide": "# Sec\n"}}
```"##;
        let doc = decode_documentation(raw);
        assert_eq!(doc.readme, "# App\n");
        assert_eq!(doc.get(DocumentKind::SecurityGuide), Some("# Sec\n"));
        assert!(doc.deployment_guide.is_none());
    }

    #[test]
    fn test_documentation_markdown() {
        let doc = decode_documentation("# My Infra\n\nSome text.\n\n```hcl\nx = 1\n```\n");
        assert!(doc.readme.starts_with("# My Infra"));
        assert!(doc.readme.contains("x = 1"));
    }

    #[test]
    fn test_documentation_placeholder() {
        let doc = decode_documentation("not json and no heading");
        assert!(doc.readme.starts_with(DEFAULT_README_HEADING));
        assert!(doc.readme.contains("not json and no heading"));
    }
}
