//! Analysis Normalizer
//!
//! Everything a remote text model returns is treated as adversarial input.
//! [`normalize`] checks each field independently and replaces anything of
//! the wrong type, shape, or range with a default. It rejects nothing and
//! never fails.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::memory::{
    valid_concepts, DEFAULT_COMPLEXITY, DEFAULT_DOMAIN, DEFAULT_SUMMARY, MAX_COMPLEXITY,
    MAX_CONCEPTS, MIN_COMPLEXITY, PLACEHOLDER_CONCEPT,
};

/// Validated content fields for a learning entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Key concepts (1-5)
    pub concepts: Vec<String>,
    /// Summary of what was learned
    pub summary: String,
    /// Complexity rating (1-5)
    pub complexity: u8,
    /// Knowledge domain
    pub domain: String,
}

impl AnalysisResult {
    /// Check every field invariant
    pub fn is_valid(&self) -> bool {
        (1..=MAX_CONCEPTS).contains(&self.concepts.len())
            && (MIN_COMPLEXITY..=MAX_COMPLEXITY).contains(&self.complexity)
    }
}

impl Default for AnalysisResult {
    fn default() -> Self {
        normalize(None)
    }
}

/// Normalize an untrusted analysis object
///
/// `raw` may be absent, not an object, or an object with any subset of
/// fields holding any JSON type.
pub fn normalize(raw: Option<&Value>) -> AnalysisResult {
    let object = raw.and_then(Value::as_object);
    let field = |name: &str| object.and_then(|o| o.get(name));

    AnalysisResult {
        concepts: normalize_concepts(field("concepts")),
        summary: normalize_string(field("summary"), DEFAULT_SUMMARY),
        complexity: normalize_complexity(field("complexity")),
        domain: normalize_string(field("domain"), DEFAULT_DOMAIN),
    }
}

/// A sequence keeps its first five string elements; anything else becomes the placeholder
fn normalize_concepts(value: Option<&Value>) -> Vec<String> {
    valid_concepts(string_items(value), PLACEHOLDER_CONCEPT)
}

/// String elements of a sequence; empty for anything that is not a sequence
pub(crate) fn string_items(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn normalize_string(value: Option<&Value>, default: &str) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| default.to_string())
}

/// Integral numbers in 1..=5 are kept (`4` and `4.0` alike); anything else is 3
pub(crate) fn normalize_complexity(value: Option<&Value>) -> u8 {
    value
        .and_then(|v| {
            v.as_i64().or_else(|| {
                v.as_f64()
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| f as i64)
            })
        })
        .filter(|c| (i64::from(MIN_COMPLEXITY)..=i64::from(MAX_COMPLEXITY)).contains(c))
        .map(|c| c as u8)
        .unwrap_or(DEFAULT_COMPLEXITY)
}

// ============================================================================
// TESTS
// ============================================================================
