//! Sample ordering for display
//!
//! Sort keys are computed once per sample (in parallel), then the samples are
//! stably sorted. Samples whose key is unknown sort after all known keys.

use crate::config::DatingOptions;
use crate::estimates::SampleDating;
use crate::sample::Sample;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    SampleName,
    GerminationYear,
    FellingYear,
    TreeSpecies,
}

/// Which end of the estimated intervals a year sort uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UncertaintyView {
    /// Widest interval: oldest germination, youngest felling
    #[default]
    Estimates,
    /// Certain interval only: youngest germination, oldest felling
    Certain,
}

#[derive(Debug, PartialEq, Eq)]
enum KeyValue {
    Year(Option<i64>),
    Text(Option<String>),
}

fn key_value(sample: &Sample, key: SortKey, view: UncertaintyView, options: &DatingOptions) -> KeyValue {
    match key {
        SortKey::SampleName => KeyValue::Text(Some(sample.sample_name.clone())),
        SortKey::TreeSpecies => KeyValue::Text(sample.tree_species()),
        SortKey::GerminationYear | SortKey::FellingYear => {
            let dating = SampleDating::evaluate(sample, options);
            KeyValue::Year(dating_year(&dating, key, view))
        }
    }
}

/// Year a dating sorts on for the given key and view
pub fn dating_year(dating: &SampleDating, key: SortKey, view: UncertaintyView) -> Option<i64> {
    match (key, view) {
        (SortKey::GerminationYear, UncertaintyView::Estimates) => {
            dating.oldest_germination.value.or(dating.youngest_germination.value)
        }
        (SortKey::GerminationYear, UncertaintyView::Certain) => dating.youngest_germination.value,
        (SortKey::FellingYear, UncertaintyView::Estimates) => {
            dating.youngest_felling.value.or(dating.oldest_felling.value)
        }
        (SortKey::FellingYear, UncertaintyView::Certain) => dating.oldest_felling.value,
        _ => None,
    }
}

/// Known values ascending, unknown values last
fn known_first<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare(a: &KeyValue, b: &KeyValue) -> Ordering {
    match (a, b) {
        (KeyValue::Year(a), KeyValue::Year(b)) => known_first(a, b),
        (KeyValue::Text(a), KeyValue::Text(b)) => {
            let a = a.as_ref().map(|s| s.to_lowercase());
            let b = b.as_ref().map(|s| s.to_lowercase());
            known_first(&a, &b)
        }
        _ => Ordering::Equal,
    }
}

/// Samples sorted by `key`; ties keep their input order
pub fn sort_samples<'a>(
    samples: &'a [Sample],
    key: SortKey,
    view: UncertaintyView,
    options: &DatingOptions,
) -> Vec<&'a Sample> {
    let mut keyed: Vec<(KeyValue, &Sample)> = samples
        .par_iter()
        .map(|sample| (key_value(sample, key, view, options), sample))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare(a, b));
    keyed.into_iter().map(|(_, sample)| sample).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{ComplexDating, Measurement};
    use crate::vocabulary::DendroVariable;

    fn sample(name: &str, species: Option<&str>, germination: Option<i64>, felling: Option<(i64, i64)>) -> Sample {
        let mut sample = Sample::new(name, 1);
        if let Some(species) = species {
            sample = sample.with(Measurement::scalar(DendroVariable::TreeSpecies, species));
        }
        if let Some(year) = germination {
            sample = sample.with(Measurement::scalar(DendroVariable::InferredGrowthYearMin, year));
        }
        if let Some((older, younger)) = felling {
            sample = sample.with(Measurement::complex(
                DendroVariable::EstimatedFellingYear,
                ComplexDating { older: Some(older), younger: Some(younger), ..Default::default() },
            ));
        }
        sample
    }

    fn names(sorted: &[&Sample]) -> Vec<String> {
        sorted.iter().map(|s| s.sample_name.clone()).collect()
    }

    #[test]
    fn test_sort_by_name_case_insensitive() {
        let samples = vec![sample("b2", None, None, None), sample("A1", None, None, None), sample("a3", None, None, None)];
        let sorted = sort_samples(&samples, SortKey::SampleName, UncertaintyView::Estimates, &DatingOptions::default());
        assert_eq!(names(&sorted), vec!["A1", "a3", "b2"]);
    }

    #[test]
    fn test_sort_by_felling_unknown_last() {
        let samples = vec![
            sample("late", None, None, Some((1800, 1805))),
            sample("none", None, None, None),
            sample("early", None, None, Some((1600, 1610))),
        ];
        let sorted = sort_samples(&samples, SortKey::FellingYear, UncertaintyView::Estimates, &DatingOptions::default());
        assert_eq!(names(&sorted), vec!["early", "late", "none"]);
    }

    #[test]
    fn test_certain_view_uses_inner_bounds() {
        // Estimates view sorts on youngest felling, certain view on oldest felling
        let samples = vec![
            sample("wide", None, None, Some((1600, 1700))),
            sample("narrow", None, None, Some((1650, 1660))),
        ];
        let opts = DatingOptions::default();
        let estimates = sort_samples(&samples, SortKey::FellingYear, UncertaintyView::Estimates, &opts);
        let certain = sort_samples(&samples, SortKey::FellingYear, UncertaintyView::Certain, &opts);
        assert_eq!(names(&estimates), vec!["narrow", "wide"]);
        assert_eq!(names(&certain), vec!["wide", "narrow"]);
    }

    #[test]
    fn test_sort_by_germination_is_stable() {
        let samples = vec![
            sample("first", None, Some(1700), None),
            sample("older", None, Some(1650), None),
            sample("second", None, Some(1700), None),
        ];
        let sorted = sort_samples(&samples, SortKey::GerminationYear, UncertaintyView::Estimates, &DatingOptions::default());
        assert_eq!(names(&sorted), vec!["older", "first", "second"]);
    }

    #[test]
    fn test_sort_by_species() {
        let samples = vec![
            sample("s1", Some("Tall"), None, None),
            sample("s2", None, None, None),
            sample("s3", Some("Ek"), None, None),
        ];
        let sorted = sort_samples(&samples, SortKey::TreeSpecies, UncertaintyView::Estimates, &DatingOptions::default());
        assert_eq!(names(&sorted), vec!["s3", "s1", "s2"]);
    }
}
