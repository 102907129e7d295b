//! JSON extraction from free-form model output
//!
//! Models wrap their JSON in prose or markdown fences. The extractor finds
//! the first `{` that opens a balanced object, tracking string literals and
//! escapes so braces inside strings don't count.

use serde_json::Value;

use super::SummarizerError;

/// Locate the first balanced `{...}` span in `text`
///
/// If the earliest `{` never closes, scanning resumes at the next `{`.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();

    for (start, _) in text.match_indices('{') {
        if let Some(end) = balanced_end(&bytes[start..]) {
            return Some(&text[start..start + end]);
        }
    }

    None
}

/// Length of the balanced object starting at `bytes[0] == b'{'`
fn balanced_end(bytes: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

/// Extract and parse the analysis object embedded in model output
pub fn parse_analysis_text(text: &str) -> Result<Value, SummarizerError> {
    let span = extract_json_object(text).ok_or(SummarizerError::NoJson)?;
    serde_json::from_str(span).map_err(|e| SummarizerError::MalformedResponse(e.to_string()))
}
