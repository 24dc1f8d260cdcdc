//! Response normalization: strip code fences around model output.

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// Turn raw model output into text ready for decoding.
///
/// - Surrounding whitespace is trimmed.
/// - With a `` ```json `` fence, the text between that marker and the *last*
///   closing fence is taken, so payloads that themselves contain fenced
///   examples survive intact. An unclosed `` ```json `` fence keeps
///   everything after the marker.
/// - With any other fence, the text between the first opening and the last
///   closing fence is taken only if it starts with `{` or `[`.
/// - Otherwise the trimmed text is returned unchanged.
///
/// Never fails.
pub fn normalize(raw: &str) -> String {
    let text = raw.trim();

    if let Some(start) = text.find(JSON_FENCE) {
        let body_start = start + JSON_FENCE.len();
        let body = &text[body_start..];
        return match body.rfind(FENCE) {
            Some(end) => body[..end].trim().to_string(),
            None => body.trim().to_string(),
        };
    }

    if let Some(start) = text.find(FENCE) {
        let after_marker = start + FENCE.len();
        if let Some(end) = text[after_marker..].rfind(FENCE) {
            let inner = &text[after_marker..after_marker + end];
            // Skip a language tag line; a block on one line has none
            let body = if starts_with_json(inner) {
                inner
            } else {
                inner.find('\n').map_or(inner, |i| &inner[i + 1..])
            };
            let candidate = body.trim();
            if starts_with_json(candidate) {
                return candidate.to_string();
            }
        }
    }

    text.to_string()
}

fn starts_with_json(text: &str) -> bool {
    let text = text.trim_start();
    text.starts_with('{') || text.starts_with('[')
}
