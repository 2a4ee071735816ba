//! Noisy Quantity Parser
//!
//! Dendro measurements such as pith distance are numeric in spirit but stored
//! as free text with qualifiers: `~12`, `>85`, `&lt;30`, `≥5-7`, `"4`.
//! `parse_quantity` turns one of these into a `ParsedValue`.
//!
//! Parsing never fails. Anything that cannot be interpreted comes back with
//! `value = NaN` and `ValueNote::Unparseable`, so a legitimate zero stays
//! distinguishable from "no number here".

use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualifier prefix found in a raw quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Qualifier {
    Estimation,     // ~
    GreaterThan,    // > or &gt;
    LessThan,       // < or &lt;
    EqualOrLess,    // ≤
    EqualOrGreater, // ≥
    /// `"` marks a measured distance, not a ring count
    MeasuredWidth,
}

impl Qualifier {
    pub fn label(&self) -> &'static str {
        match self {
            Qualifier::Estimation => "Estimation",
            Qualifier::GreaterThan => "Greater than",
            Qualifier::LessThan => "Less than",
            Qualifier::EqualOrLess => "Equal to or less than",
            Qualifier::EqualOrGreater => "Equal to or greater than",
            Qualifier::MeasuredWidth => "Measured width",
        }
    }
}

/// How a raw quantity was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueNote {
    /// Plain integer
    Discrete,
    /// Qualified value, optionally a `lower-upper` range
    Qualified { qualifier: Qualifier, range: bool },
    /// Explicit "no measurement" marker (`x`)
    NoValue,
    Unparseable,
}

impl ValueNote {
    pub fn is_measured_width(&self) -> bool {
        matches!(
            self,
            ValueNote::Qualified { qualifier: Qualifier::MeasuredWidth, .. }
        )
    }
}

impl fmt::Display for ValueNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueNote::Discrete => f.write_str("Discrete"),
            ValueNote::Qualified { qualifier: Qualifier::MeasuredWidth, .. } => {
                f.write_str(Qualifier::MeasuredWidth.label())
            }
            ValueNote::Qualified { qualifier, range: true } => {
                write!(f, "{}, with range", qualifier.label())
            }
            ValueNote::Qualified { qualifier, range: false } => f.write_str(qualifier.label()),
            ValueNote::NoValue => f.write_str("No value"),
            ValueNote::Unparseable => f.write_str("Could not parse"),
        }
    }
}

/// Result of interpreting one raw quantity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedValue {
    /// Input as given
    pub raw: String,
    /// Part of the input that was interpreted (qualifier stripped)
    pub text: String,
    /// Point value; NaN when absent or when the value is a range
    pub value: f64,
    /// Range bounds; NaN unless a range was detected
    pub lower: f64,
    pub upper: f64,
    pub note: ValueNote,
}

impl PartialEq for ParsedValue {
    // NaN fields compare equal to NaN so that two parses of the same input are equal
    fn eq(&self, other: &Self) -> bool {
        fn same(a: f64, b: f64) -> bool {
            (a.is_nan() && b.is_nan()) || a == b
        }
        self.raw == other.raw
            && self.text == other.text
            && same(self.value, other.value)
            && same(self.lower, other.lower)
            && same(self.upper, other.upper)
            && self.note == other.note
    }
}

impl ParsedValue {
    fn unparsed(raw: &str) -> Self {
        ParsedValue {
            raw: raw.to_string(),
            text: raw.to_string(),
            value: f64::NAN,
            lower: f64::NAN,
            upper: f64::NAN,
            note: ValueNote::Unparseable,
        }
    }

    /// Already-integer input
    pub fn discrete(value: i64) -> Self {
        ParsedValue {
            raw: value.to_string(),
            text: value.to_string(),
            value: value as f64,
            lower: f64::NAN,
            upper: f64::NAN,
            note: ValueNote::Discrete,
        }
    }

    pub fn value_int(&self) -> Option<i64> {
        as_int(self.value)
    }

    pub fn lower_int(&self) -> Option<i64> {
        as_int(self.lower)
    }

    pub fn upper_int(&self) -> Option<i64> {
        as_int(self.upper)
    }

    pub fn is_range(&self) -> bool {
        matches!(self.note, ValueNote::Qualified { range: true, .. })
    }

    /// Interpret the remainder after a qualifier, overwriting any previous interpretation
    fn qualify(&mut self, remainder: &str, qualifier: Qualifier) {
        let remainder = remainder.trim();
        self.text = remainder.to_string();

        match split_range(remainder) {
            Some((lower, upper)) => {
                self.value = f64::NAN;
                self.lower = lower as f64;
                self.upper = upper as f64;
                self.note = ValueNote::Qualified { qualifier, range: true };
            }
            None => {
                self.value = parse_leading_int(remainder).map_or(f64::NAN, |v| v as f64);
                self.lower = f64::NAN;
                self.upper = f64::NAN;
                self.note = ValueNote::Qualified { qualifier, range: false };
            }
        }
    }
}

fn as_int(v: f64) -> Option<i64> {
    if v.is_nan() {
        None
    } else {
        Some(v as i64)
    }
}

/// Qualifier markers in check order. A later match overwrites an earlier one.
const QUALIFIER_MARKERS: [(&str, Qualifier); 7] = [
    (">", Qualifier::GreaterThan),
    ("<", Qualifier::LessThan),
    ("&gt;", Qualifier::GreaterThan),
    ("&lt;", Qualifier::LessThan),
    ("≤", Qualifier::EqualOrLess),
    ("≥", Qualifier::EqualOrGreater),
    ("\"", Qualifier::MeasuredWidth),
];

/// Interpret a raw quantity string
///
/// Checks run in a fixed order and each successful check overwrites the
/// previous interpretation: `x`, a single `~`, `>`, `<`, `&gt;`, `&lt;`, `≤`,
/// `≥`, `"`. After a qualifier, the remainder is tested for a `lower-upper` range.
///
/// # Examples
/// ```
/// use dendro_dating::utils::quantity::parse_quantity;
///
/// let parsed = parse_quantity(">85");
/// assert_eq!(parsed.value_int(), Some(85));
/// assert_eq!(parsed.note.to_string(), "Greater than");
///
/// let parsed = parse_quantity("~71-72");
/// assert_eq!((parsed.lower_int(), parsed.upper_int()), (Some(71), Some(72)));
/// assert_eq!(parsed.note.to_string(), "Estimation, with range");
/// ```
pub fn parse_quantity(raw: &str) -> ParsedValue {
    if let Ok(value) = raw.trim().parse::<i64>() {
        let mut parsed = ParsedValue::discrete(value);
        parsed.raw = raw.to_string();
        return parsed;
    }

    let mut result = ParsedValue::unparsed(raw);

    if raw.contains('x') {
        result.note = ValueNote::NoValue;
    }

    // Two tildes (e.g. "~12~15") is not an estimation
    if raw.matches('~').count() == 1 {
        if let Some((_, rest)) = raw.split_once('~') {
            result.qualify(rest, Qualifier::Estimation);
        }
    }

    for (marker, qualifier) in QUALIFIER_MARKERS {
        if let Some((_, rest)) = raw.split_once(marker) {
            result.qualify(rest, qualifier);
        }
    }

    result
}

/// Split `a-b` into two integers. Exactly one `-` is allowed.
fn split_range(s: &str) -> Option<(i64, i64)> {
    if s.matches('-').count() != 1 {
        return None;
    }
    let (lower, upper) = s.split_once('-')?;
    Some((parse_leading_int(lower)?, parse_leading_int(upper)?))
}

/// Parse the integer at the start of `s`, ignoring trailing text
///
/// `" 85 rings"` gives 85, `"-12"` gives -12, `"abc"` gives None.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.as_bytes().first()? {
        b'-' => (-1, &s[1..]),
        b'+' => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|v| sign * v)
}
