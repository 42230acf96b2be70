use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Reference to a single review. Only non-negative integers are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(u64);

impl ReviewId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<u64>().ok().map(Self)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalizes a loosely typed identifier field into at most `limit` ordered
/// identifiers.
///
/// - null → empty
/// - array → first `limit` elements, null elements dropped
/// - string → split on `;` or `,`, trimmed, empty parts dropped, first `limit`
/// - anything else → a single element
pub fn parse_review_ids(value: &Value, limit: usize) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .take(limit)
            .filter_map(scalar_to_string)
            .collect(),
        Value::String(raw) => raw
            .split([';', ','])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .take(limit)
            .map(str::to_string)
            .collect(),
        other => scalar_to_string(other).into_iter().take(limit).collect(),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()),
        // Integral floats (e.g. 42.0 from a numeric column) render without the fraction.
        Value::Number(n) => Some(match (n.as_u64(), n.as_i64(), n.as_f64()) {
            (Some(u), _, _) => u.to_string(),
            (None, Some(i), _) => i.to_string(),
            (None, None, Some(f)) if f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 => {
                format!("{f:.0}")
            }
            _ => n.to_string(),
        }),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_yields_empty_sequence() {
        assert!(parse_review_ids(&Value::Null, 3).is_empty());
    }

    #[test]
    fn array_is_truncated() {
        let ids = parse_review_ids(&json!([1, 2, 3, 4]), 3);
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn delimited_string_is_split_trimmed_and_truncated() {
        let ids = parse_review_ids(&json!(" 10 ; 11,, 12 ,13"), 3);
        assert_eq!(ids, vec!["10", "11", "12"]);
    }

    #[test]
    fn scalar_is_wrapped() {
        assert_eq!(parse_review_ids(&json!(77), 3), vec!["77"]);
        assert_eq!(parse_review_ids(&json!(77.0), 3), vec!["77"]);
        assert!(parse_review_ids(&json!(77), 0).is_empty());
    }

    #[test]
    fn review_id_requires_integer() {
        assert_eq!(ReviewId::parse("12").map(ReviewId::get), Some(12));
        assert_eq!(ReviewId::parse(" 12 ").map(ReviewId::get), Some(12));
        assert_eq!(ReviewId::parse("12.5"), None);
        assert_eq!(ReviewId::parse("-3"), None);
        assert_eq!(ReviewId::parse(""), None);
    }
}
