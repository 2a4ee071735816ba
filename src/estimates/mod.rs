//! Dating Inference Engine
//!
//! Derives four bounded year estimates for a sample:
//! - oldest / youngest germination year (when the tree started growing)
//! - oldest / youngest felling year (when it was cut)
//!
//! Each estimate walks an ordered fallback chain. Tier 1 is direct
//! dendrochronological evidence; higher tiers are derived calculations and
//! carry warnings explaining how the value was obtained. Warnings are kept in
//! the order they were discovered.

pub mod felling;
pub mod germination;

pub use felling::{oldest_felling_year, youngest_felling_year};
pub use germination::{oldest_germination_year, youngest_germination_year};

use crate::config::DatingOptions;
use crate::sample::{ComplexDating, Sample};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub const OLDEST_GERMINATION: &str = "Oldest germination year";
pub const YOUNGEST_GERMINATION: &str = "Youngest germination year";
pub const OLDEST_FELLING: &str = "Oldest felling year";
pub const YOUNGEST_FELLING: &str = "Youngest felling year";

/// One year estimate with its provenance
///
/// `value == None` means no usable evidence; `reliability` is then `None` and
/// `formula` empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateEstimate {
    pub name: String,
    pub value: Option<i64>,
    /// Measurements the value was computed from
    pub formula: String,
    /// 1 = direct evidence, higher = less direct
    pub reliability: Option<u8>,
    pub dating_uncertainty: Option<i64>,
    pub error_uncertainty: Option<String>,
    pub warnings: Vec<String>,
}

impl DateEstimate {
    pub fn empty(name: &str) -> Self {
        DateEstimate {
            name: name.to_string(),
            value: None,
            formula: String::new(),
            reliability: None,
            dating_uncertainty: None,
            error_uncertainty: None,
            warnings: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    fn resolve(mut self, value: i64, formula: impl Into<String>, reliability: u8) -> Self {
        self.value = Some(value);
        self.formula = formula.into();
        self.reliability = Some(reliability);
        self
    }

    /// Resolve a value derived by arithmetic on measurement data. `None` means
    /// the arithmetic overflowed; the estimate is then left empty.
    fn resolve_derived(self, value: Option<i64>, formula: impl Into<String>, reliability: u8) -> Self {
        match value {
            Some(value) => self.resolve(value, formula, reliability),
            None => {
                tracing::warn!("{}: '{}' overflows, no estimate", self.name, formula.into());
                DateEstimate::empty(&self.name)
            }
        }
    }

    fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Carry the uncertainty annotations of a contributing dating, warning about
    /// an unsupported age type and an error uncertainty
    fn absorb_dating_context(&mut self, dating: &ComplexDating, label: &str) {
        if let Some(age_type) = dating.unsupported_age_type() {
            self.warn(format!("{} has an unsupported age_type: {}", label, age_type));
        }
        if let Some(id) = dating.dating_uncertainty {
            self.dating_uncertainty = Some(id);
        }
        if let Some(error) = dating.error_uncertainty.as_deref().filter(|e| !e.is_empty()) {
            self.error_uncertainty = Some(error.to_string());
            self.warn(format!(
                "The {} has an uncertainty specified as: {}",
                label.to_lowercase(),
                error
            ));
        }
    }
}

/// All four estimates for one sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleDating {
    pub sample_name: String,
    pub physical_sample_id: i64,
    pub oldest_germination: DateEstimate,
    pub youngest_germination: DateEstimate,
    pub oldest_felling: DateEstimate,
    pub youngest_felling: DateEstimate,
}

impl SampleDating {
    pub fn evaluate(sample: &Sample, options: &DatingOptions) -> Self {
        SampleDating {
            sample_name: sample.sample_name.clone(),
            physical_sample_id: sample.physical_sample_id,
            oldest_germination: oldest_germination_year(sample, options),
            youngest_germination: youngest_germination_year(sample, options),
            oldest_felling: oldest_felling_year(sample, options),
            youngest_felling: youngest_felling_year(sample, options),
        }
    }

    /// Widest lifespan interval: oldest germination to youngest felling
    pub fn lifespan(&self) -> Option<(i64, i64)> {
        Some((self.oldest_germination.value?, self.youngest_felling.value?))
    }
}

/// Evaluate many samples in parallel. Output order follows input order.
pub fn evaluate_all(samples: &[Sample], options: &DatingOptions) -> Vec<SampleDating> {
    samples
        .par_iter()
        .map(|sample| SampleDating::evaluate(sample, options))
        .collect()
}
