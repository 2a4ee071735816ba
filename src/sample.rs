//! Sample measurement sets
//!
//! A `Sample` is the read-only input of the dating engine: every recorded
//! dendro measurement for one physical sample. Measurements are either a plain
//! scalar or a structured `ComplexDating` (felling year, outermost ring date).

use crate::error::DendroResult;
use crate::utils::lenient::opt_int;
use crate::utils::quantity::{parse_leading_int, parse_quantity, ParsedValue};
use crate::vocabulary::DendroVariable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar measurement value as delivered by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl ScalarValue {
    /// Integer reading of the value: integers as-is, floats truncated, text by
    /// its leading integer (`"120 rings"` gives 120)
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ScalarValue::Integer(v) => Some(*v),
            ScalarValue::Number(v) if v.is_finite() => Some(*v as i64),
            ScalarValue::Number(_) => None,
            ScalarValue::Text(s) => parse_leading_int(s),
        }
    }

    /// Integer reading that treats zero as "no usable number"
    pub fn as_nonzero_int(&self) -> Option<i64> {
        self.as_int().filter(|v| *v != 0)
    }

    /// Interpret the value with the qualifier-aware quantity parser
    pub fn parse(&self) -> ParsedValue {
        match self {
            ScalarValue::Integer(v) => ParsedValue::discrete(*v),
            ScalarValue::Number(v) if v.fract() == 0.0 && v.is_finite() => {
                ParsedValue::discrete(*v as i64)
            }
            ScalarValue::Number(v) => parse_quantity(&v.to_string()),
            ScalarValue::Text(s) => parse_quantity(s),
        }
    }

    /// Build from a raw backend string, keeping integers as integers
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(v) => ScalarValue::Integer(v),
            Err(_) => ScalarValue::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Integer(v) => write!(f, "{}", v),
            ScalarValue::Number(v) => write!(f, "{}", v),
            ScalarValue::Text(s) => f.write_str(s),
        }
    }
}

/// Season metadata attached to a dating
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    #[serde(default, deserialize_with = "opt_int")]
    pub season_id: Option<i64>,
    #[serde(default)]
    pub season_name: Option<String>,
    /// 1 = single season, 2 = compound season
    #[serde(default, deserialize_with = "opt_int")]
    pub season_type_id: Option<i64>,
}

/// Structured dating value (felling year, outermost tree-ring date)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexDating {
    #[serde(default, deserialize_with = "opt_int")]
    pub older: Option<i64>,
    #[serde(default, deserialize_with = "opt_int")]
    pub younger: Option<i64>,
    /// Normally "AD"
    #[serde(default)]
    pub age_type: Option<String>,
    /// Id into the dating uncertainty lookup table
    #[serde(default, deserialize_with = "opt_int")]
    pub dating_uncertainty: Option<i64>,
    /// Error uncertainty type, e.g. "Ca"
    #[serde(default)]
    pub error_uncertainty: Option<String>,
    #[serde(default, deserialize_with = "opt_int")]
    pub plus: Option<i64>,
    #[serde(default, deserialize_with = "opt_int")]
    pub minus: Option<i64>,
    #[serde(default)]
    pub season: Option<Season>,
}

impl ComplexDating {
    /// Younger bound if present, otherwise the older one.
    /// Zero counts as absent.
    pub fn younger_or_older(&self) -> Option<i64> {
        nonzero(self.younger).or(nonzero(self.older))
    }

    /// `age_type` when it is set and not "AD"
    pub fn unsupported_age_type(&self) -> Option<&str> {
        self.age_type.as_deref().filter(|t| *t != "AD")
    }
}

pub(crate) fn nonzero(v: Option<i64>) -> Option<i64> {
    v.filter(|v| *v != 0)
}

/// Value of one measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum MeasurementValue {
    /// `None` when the row exists but carries no value
    Scalar(Option<ScalarValue>),
    Complex(ComplexDating),
}

/// One fact about a sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub lookup_id: i64,
    pub value: MeasurementValue,
}

impl Measurement {
    pub fn scalar(variable: DendroVariable, value: impl Into<ScalarValue>) -> Self {
        Measurement {
            lookup_id: variable.lookup_id(),
            value: MeasurementValue::Scalar(Some(value.into())),
        }
    }

    pub fn complex(variable: DendroVariable, dating: ComplexDating) -> Self {
        Measurement {
            lookup_id: variable.lookup_id(),
            value: MeasurementValue::Complex(dating),
        }
    }
}

impl From<i64> for ScalarValue {
    fn from(v: i64) -> Self {
        ScalarValue::Integer(v)
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        ScalarValue::Text(s.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self {
        ScalarValue::Text(s)
    }
}

/// All measurements of one physical sample
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub sample_name: String,
    pub physical_sample_id: i64,
    #[serde(default)]
    pub measurements: Vec<Measurement>,
}

impl Sample {
    pub fn new(sample_name: impl Into<String>, physical_sample_id: i64) -> Self {
        Sample {
            sample_name: sample_name.into(),
            physical_sample_id,
            measurements: Vec::new(),
        }
    }

    /// Builder-style push, mostly for tests and adapters
    pub fn with(mut self, measurement: Measurement) -> Self {
        self.measurements.push(measurement);
        self
    }

    /// First measurement recorded under `lookup_id`
    pub fn by_lookup_id(&self, lookup_id: i64) -> Option<&MeasurementValue> {
        self.measurements
            .iter()
            .find(|m| m.lookup_id == lookup_id)
            .map(|m| &m.value)
    }

    pub fn measurement(&self, variable: DendroVariable) -> Option<&MeasurementValue> {
        self.by_lookup_id(variable.lookup_id())
    }

    /// Look up by canonical variable name. Unknown names are an error.
    pub fn measurement_by_name(&self, name: &str) -> DendroResult<Option<&MeasurementValue>> {
        let variable: DendroVariable = name.parse()?;
        Ok(self.measurement(variable))
    }

    /// Scalar value of `variable`, if recorded and non-null
    pub fn scalar(&self, variable: DendroVariable) -> Option<&ScalarValue> {
        match self.measurement(variable)? {
            MeasurementValue::Scalar(value) => value.as_ref(),
            MeasurementValue::Complex(_) => None,
        }
    }

    /// Structured dating of `variable`, if recorded as one
    pub fn complex(&self, variable: DendroVariable) -> Option<&ComplexDating> {
        match self.measurement(variable)? {
            MeasurementValue::Complex(dating) => Some(dating),
            MeasurementValue::Scalar(_) => None,
        }
    }

    /// Nonzero integer reading of a scalar measurement
    pub fn year_or_count(&self, variable: DendroVariable) -> Option<i64> {
        self.scalar(variable)?.as_nonzero_int()
    }

    /// Whether `variable` is recorded at all, even with a null value
    pub fn has_record(&self, variable: DendroVariable) -> bool {
        self.measurement(variable).is_some()
    }

    /// Tree species label, used for ordering and display
    pub fn tree_species(&self) -> Option<String> {
        self.scalar(DendroVariable::TreeSpecies).map(|v| v.to_string())
    }
}
