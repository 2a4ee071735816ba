//! Lenient serde helpers for backend rows
//!
//! The measurement backend is inconsistent about numeric columns: years arrive
//! as `1745`, `"1745"`, `1745.0` or `null` depending on the query.

use super::quantity::parse_leading_int;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum IntLike {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Deserialize an optional integer from a number, a numeric string or null.
/// Non-numeric strings become `None`.
pub fn opt_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<IntLike> = Option::deserialize(deserializer)?;
    Ok(match value {
        None => None,
        Some(IntLike::Int(v)) => Some(v),
        Some(IntLike::Float(v)) if v.is_finite() => Some(v as i64),
        Some(IntLike::Float(_)) => None,
        Some(IntLike::Text(s)) => parse_leading_int(&s),
    })
}
