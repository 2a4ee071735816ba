//! Dating timeline spans
//!
//! Turns the four estimates of a sample into the intervals a chart draws:
//! the certain lifespan plus the uncertainty bands on either side of it.

use crate::config::DatingOptions;
use crate::estimates::{DateEstimate, SampleDating};
use crate::sample::Sample;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    /// Youngest germination to oldest felling; the tree certainly lived here
    Certain,
    /// Oldest to youngest germination year
    GerminationUncertainty,
    /// Oldest to youngest felling year
    FellingUncertainty,
}

/// One interval on the timeline. `start == None` means open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatingSpan {
    pub kind: SpanKind,
    pub start: Option<i64>,
    pub end: i64,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatingTimeline {
    pub sample_name: String,
    pub physical_sample_id: i64,
    pub spans: Vec<DatingSpan>,
}

impl DatingTimeline {
    pub fn span(&self, kind: SpanKind) -> Option<&DatingSpan> {
        self.spans.iter().find(|s| s.kind == kind)
    }
}

/// Warnings of the contributing estimates, first occurrence kept
fn merged_warnings(estimates: &[&DateEstimate]) -> Vec<String> {
    let mut warnings: Vec<String> = Vec::new();
    for warning in estimates.iter().flat_map(|e| e.warnings.iter()) {
        if !warnings.contains(warning) {
            warnings.push(warning.clone());
        }
    }
    warnings
}

fn span(kind: SpanKind, start: Option<i64>, end: i64, sources: &[&DateEstimate]) -> DatingSpan {
    DatingSpan { kind, start, end, warnings: merged_warnings(sources) }
}

impl From<&SampleDating> for DatingTimeline {
    fn from(dating: &SampleDating) -> Self {
        let mut spans = Vec::new();

        let germ_old = &dating.oldest_germination;
        let germ_young = &dating.youngest_germination;
        let fell_old = &dating.oldest_felling;
        let fell_young = &dating.youngest_felling;

        if let Some(end) = germ_young.value {
            spans.push(span(SpanKind::GerminationUncertainty, germ_old.value, end, &[germ_old, germ_young]));
        }
        if let (Some(start), Some(end)) = (germ_young.value, fell_old.value) {
            spans.push(span(SpanKind::Certain, Some(start), end, &[germ_young, fell_old]));
        }
        if let (Some(start), Some(end)) = (fell_old.value, fell_young.value) {
            spans.push(span(SpanKind::FellingUncertainty, Some(start), end, &[fell_old, fell_young]));
        }

        DatingTimeline {
            sample_name: dating.sample_name.clone(),
            physical_sample_id: dating.physical_sample_id,
            spans,
        }
    }
}

/// Timelines for a batch of samples, in input order
pub fn build_timelines(samples: &[Sample], options: &DatingOptions) -> Vec<DatingTimeline> {
    samples
        .par_iter()
        .map(|sample| DatingTimeline::from(&SampleDating::evaluate(sample, options)))
        .collect()
}

/// Earliest and latest year covered by any span, for chart axes
pub fn timeline_extent(timelines: &[DatingTimeline]) -> Option<(i64, i64)> {
    let years = timelines
        .iter()
        .flat_map(|t| t.spans.iter())
        .flat_map(|s| s.start.into_iter().chain(std::iter::once(s.end)));

    years.fold(None, |acc, year| match acc {
        None => Some((year, year)),
        Some((min, max)) => Some((min.min(year), max.max(year))),
    })
}
