//! Dataset Selection
//!
//! Filters sample collections down to datable samples and to samples whose
//! estimated lifespan overlaps a queried timespan. Selection is order
//! preserving and evaluates samples in parallel.

use crate::config::DatingOptions;
use crate::error::{DendroError, DendroResult};
use crate::estimates::{oldest_germination_year, youngest_felling_year};
use crate::sample::Sample;
use crate::vocabulary::DendroVariable;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Whether a sample can be dated at all
///
/// Samples carrying any "Not dated" record (even a null one), and samples
/// without any "Estimated felling year" record, are not datable.
pub fn is_datable(sample: &Sample) -> bool {
    if sample.has_record(DendroVariable::NotDated) {
        tracing::debug!("Discarding sample {}: marked as not dated", sample.sample_name);
        return false;
    }
    if sample.measurement(DendroVariable::EstimatedFellingYear).is_none() {
        tracing::debug!("Discarding sample {}: no felling year record", sample.sample_name);
        return false;
    }
    true
}

/// Keep only datable samples
pub fn strip_non_dated<S: Borrow<Sample>>(samples: &[S]) -> Vec<&Sample> {
    samples
        .iter()
        .map(|s| s.borrow())
        .filter(|s| is_datable(s))
        .collect()
}

/// Inclusive overlap of a `[germination, felling]` interval with `[start, end]`
///
/// Any of four cases includes the interval: it straddles the start (left),
/// lies inside the span (inner), starts inside the span (right), or covers the
/// whole span (outer).
pub fn overlaps(germination: i64, felling: i64, start: i64, end: i64) -> bool {
    let left = germination <= start && felling >= start;
    let inner = germination >= start && felling <= end;
    let right = germination >= start && germination <= end;
    let outer = germination <= start && felling >= end;
    left || inner || right || outer
}

fn check_timespan(start: i64, end: i64) -> DendroResult<()> {
    if start > end {
        return Err(DendroError::InvalidTimespan { start, end });
    }
    Ok(())
}

/// Interval used for timespan queries: oldest germination to youngest felling
fn dating_interval(sample: &Sample, options: &DatingOptions) -> Option<(i64, i64)> {
    let germination = oldest_germination_year(sample, options).value?;
    let felling = youngest_felling_year(sample, options).value?;
    Some((germination, felling))
}

/// Samples whose estimated lifespan overlaps `[start_year, end_year]`
///
/// Samples lacking either an oldest germination year or a youngest felling
/// year are excluded.
pub fn samples_within_timespan<'a, S>(
    samples: &'a [S],
    start_year: i64,
    end_year: i64,
    options: &DatingOptions,
) -> DendroResult<Vec<&'a Sample>>
where
    S: Borrow<Sample> + Sync,
{
    check_timespan(start_year, end_year)?;

    let selected: Vec<&Sample> = samples
        .par_iter()
        .map(|s| s.borrow())
        .filter(|sample| match dating_interval(sample, options) {
            Some((germination, felling)) => overlaps(germination, felling, start_year, end_year),
            None => false,
        })
        .collect();

    tracing::debug!(
        "Timespan {}-{}: selected {} of {} samples",
        start_year,
        end_year,
        selected.len(),
        samples.len()
    );
    Ok(selected)
}

/// One bar of a dating histogram
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start_year: i64,
    pub end_year: i64,
    /// Samples whose lifespan overlaps this bin
    pub datings_num: usize,
}

/// Count datable lifespans per fixed-width year bin
///
/// Bins are `bin_width` years wide starting at `start_year`; the last bin is
/// clipped to `end_year`. A sample counts towards every bin its lifespan
/// overlaps, using the same test as `samples_within_timespan`.
pub fn dating_histogram<S>(
    samples: &[S],
    start_year: i64,
    end_year: i64,
    bin_width: i64,
    options: &DatingOptions,
) -> DendroResult<Vec<HistogramBin>>
where
    S: Borrow<Sample> + Sync,
{
    check_timespan(start_year, end_year)?;
    if bin_width <= 0 {
        return Err(DendroError::InvalidBinWidth(bin_width));
    }

    let intervals: Vec<(i64, i64)> = samples
        .par_iter()
        .filter_map(|s| dating_interval(s.borrow(), options))
        .collect();

    let mut bins = Vec::new();
    let mut bin_start = start_year;
    while bin_start <= end_year {
        let bin_end = bin_start.saturating_add(bin_width - 1).min(end_year);
        let datings_num = intervals
            .iter()
            .filter(|(germination, felling)| overlaps(*germination, *felling, bin_start, bin_end))
            .count();
        bins.push(HistogramBin { start_year: bin_start, end_year: bin_end, datings_num });
        match bin_start.checked_add(bin_width) {
            Some(next) => bin_start = next,
            None => break,
        }
    }

    Ok(bins)
}
