//! Germination year estimates
//!
//! Oldest germination:
//!   1. Inferred growth year ≥
//!   2. Outermost tree-ring date - Tree age ≤
//!
//! Youngest germination:
//!   1. Inferred growth year ≤
//!   2. Outermost tree-ring date - Tree age ≥
//!   3. Outermost tree-ring date - Tree rings - Distance to pith
//!   4. Outermost tree-ring date - Tree rings
//!
//! Tiers 2+ are skipped unless `attempt_uncertain_calculations` is set.

use super::{DateEstimate, OLDEST_GERMINATION, YOUNGEST_GERMINATION};
use crate::config::DatingOptions;
use crate::sample::{nonzero, ComplexDating, Sample};
use crate::vocabulary::DendroVariable;

const OUTERMOST_LABEL: &str = "Outermost tree-ring date";

/// Outermost ring year to count back from, plus a note when the older bound
/// had to stand in for a missing younger one
fn outermost_year(dating: &ComplexDating) -> Option<(i64, Option<&'static str>)> {
    match (nonzero(dating.younger), nonzero(dating.older)) {
        (Some(year), _) => Some((year, None)),
        (None, Some(year)) => Some((
            year,
            Some("Using the older outermost tree-ring date for calculation since a younger date was not found"),
        )),
        (None, None) => None,
    }
}

/// Oldest possible germination year
pub fn oldest_germination_year(sample: &Sample, options: &DatingOptions) -> DateEstimate {
    let result = DateEstimate::empty(OLDEST_GERMINATION);

    let direct = DendroVariable::InferredGrowthYearMin;
    if let Some(year) = sample.year_or_count(direct) {
        return result.resolve(year, direct.name(), 1);
    }

    if !options.attempt_uncertain_calculations {
        return result;
    }

    let Some(outermost) = sample.complex(DendroVariable::OutermostTreeRingDate) else {
        return result;
    };
    let Some((outer_year, fallback_note)) = outermost_year(outermost) else {
        return result;
    };
    let Some(tree_age) = sample.year_or_count(DendroVariable::TreeAgeMax) else {
        return result;
    };

    let mut estimate = result;
    estimate.absorb_dating_context(outermost, OUTERMOST_LABEL);

    let formula = format!("{} - {}", OUTERMOST_LABEL, DendroVariable::TreeAgeMax.name());
    estimate.warn(format!("Oldest germination year was calculated using: {}", formula));
    if let Some(note) = fallback_note {
        estimate.warn(note);
    }

    tracing::debug!("{}: oldest germination from tier 2", sample.sample_name);
    estimate.resolve_derived(outer_year.checked_sub(tree_age), formula, 2)
}

/// Youngest possible germination year
pub fn youngest_germination_year(sample: &Sample, options: &DatingOptions) -> DateEstimate {
    let result = DateEstimate::empty(YOUNGEST_GERMINATION);

    let direct = DendroVariable::InferredGrowthYearMax;
    if let Some(year) = sample.year_or_count(direct) {
        return result.resolve(year, direct.name(), 1);
    }

    if !options.attempt_uncertain_calculations {
        return result;
    }

    // Every derived tier counts back from the outermost ring
    let Some(outermost) = sample.complex(DendroVariable::OutermostTreeRingDate) else {
        return result;
    };
    let Some((outer_year, fallback_note)) = outermost_year(outermost) else {
        return result;
    };

    let tree_age = sample.year_or_count(DendroVariable::TreeAgeMin);
    let tree_rings = sample.year_or_count(DendroVariable::TreeRings);
    let pith = sample.scalar(DendroVariable::Pith).map(|raw| raw.parse());

    let (value, formula, reliability) = if let Some(age) = tree_age {
        (
            outer_year.checked_sub(age),
            format!("{} - {}", OUTERMOST_LABEL, DendroVariable::TreeAgeMin.name()),
            2,
        )
    } else if let Some(rings) = tree_rings {
        // A measured width is a distance, it cannot be subtracted as rings
        let pith_rings = pith
            .as_ref()
            .filter(|p| !p.note.is_measured_width())
            .and_then(|p| match nonzero(p.lower_int()) {
                Some(lower) => Some((lower, " (lower value)")),
                None => nonzero(p.value_int()).map(|v| (v, "")),
            });

        match pith_rings {
            Some((pith_value, source)) => (
                outer_year.checked_sub(rings).and_then(|v| v.checked_sub(pith_value)),
                format!("{} - Tree rings - Distance to pith{}", OUTERMOST_LABEL, source),
                3,
            ),
            None => (outer_year.checked_sub(rings), format!("{} - Tree rings", OUTERMOST_LABEL), 4),
        }
    } else {
        return result;
    };

    let mut estimate = result;
    estimate.absorb_dating_context(outermost, OUTERMOST_LABEL);
    if reliability == 2 {
        estimate.warn(format!("Youngest germination year was calculated using: {}", formula));
    } else {
        estimate.warn(format!(
            "There is no dendrochronological estimation of the youngest possible germination year, it was therefore calculated using: {}",
            formula
        ));
    }
    if let Some(note) = fallback_note {
        estimate.warn(note);
    }

    tracing::debug!("{}: youngest germination from tier {}", sample.sample_name, reliability);
    estimate.resolve_derived(value, formula, reliability)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Measurement;

    fn outermost(older: Option<i64>, younger: Option<i64>) -> Measurement {
        Measurement::complex(
            DendroVariable::OutermostTreeRingDate,
            ComplexDating { older, younger, age_type: Some("AD".into()), ..Default::default() },
        )
    }

    #[test]
    fn test_oldest_tier1_wins_over_tier2() {
        let sample = Sample::new("S", 1)
            .with(Measurement::scalar(DendroVariable::InferredGrowthYearMin, 1750))
            .with(outermost(None, Some(1800)))
            .with(Measurement::scalar(DendroVariable::TreeAgeMax, 55));

        let est = oldest_germination_year(&sample, &DatingOptions::default());
        assert_eq!(est.value, Some(1750));
        assert_eq!(est.reliability, Some(1));
        assert_eq!(est.formula, "Inferred growth year ≥");
        assert!(est.warnings.is_empty());
    }

    #[test]
    fn test_oldest_tier2_from_outermost_date() {
        let sample = Sample::new("S", 1)
            .with(outermost(Some(1790), Some(1800)))
            .with(Measurement::scalar(DendroVariable::TreeAgeMax, "120"));

        let est = oldest_germination_year(&sample, &DatingOptions::default());
        assert_eq!(est.value, Some(1680));
        assert_eq!(est.reliability, Some(2));
        assert_eq!(est.formula, "Outermost tree-ring date - Tree age ≤");
        assert_eq!(
            est.warnings,
            vec!["Oldest germination year was calculated using: Outermost tree-ring date - Tree age ≤"]
        );
    }

    #[test]
    fn test_oldest_tier2_uses_older_when_younger_missing() {
        let sample = Sample::new("S", 1)
            .with(outermost(Some(1790), None))
            .with(Measurement::scalar(DendroVariable::TreeAgeMax, 90));

        let est = oldest_germination_year(&sample, &DatingOptions::default());
        assert_eq!(est.value, Some(1700));
        assert_eq!(est.warnings.len(), 2);
        assert!(est.warnings[1].contains("older outermost tree-ring date"));
    }

    #[test]
    fn test_oldest_tier2_warnings_in_discovery_order() {
        let sample = Sample::new("S", 1)
            .with(Measurement::complex(
                DendroVariable::OutermostTreeRingDate,
                ComplexDating {
                    younger: Some(1500),
                    age_type: Some("BC".into()),
                    error_uncertainty: Some("Ca".into()),
                    ..Default::default()
                },
            ))
            .with(Measurement::scalar(DendroVariable::TreeAgeMax, 100));

        let est = oldest_germination_year(&sample, &DatingOptions::default());
        // Unsupported age type is reported, the value is still used
        assert_eq!(est.value, Some(1400));
        assert_eq!(est.error_uncertainty.as_deref(), Some("Ca"));
        assert_eq!(
            est.warnings,
            vec![
                "Outermost tree-ring date has an unsupported age_type: BC",
                "The outermost tree-ring date has an uncertainty specified as: Ca",
                "Oldest germination year was calculated using: Outermost tree-ring date - Tree age ≤",
            ]
        );
    }

    #[test]
    fn test_oldest_without_tree_age_is_empty() {
        let sample = Sample::new("S", 1).with(outermost(None, Some(1800)));
        let est = oldest_germination_year(&sample, &DatingOptions::default());
        assert!(est.is_empty());
        assert_eq!(est.reliability, None);
        assert!(est.formula.is_empty());
        assert!(est.warnings.is_empty());
    }

    #[test]
    fn test_oldest_respects_direct_evidence_only() {
        let sample = Sample::new("S", 1)
            .with(outermost(None, Some(1800)))
            .with(Measurement::scalar(DendroVariable::TreeAgeMax, 50));
        let est = oldest_germination_year(&sample, &DatingOptions::direct_evidence_only());
        assert!(est.is_empty());
    }

    #[test]
    fn test_oldest_zero_growth_year_is_not_evidence() {
        let sample = Sample::new("S", 1).with(Measurement::scalar(DendroVariable::InferredGrowthYearMin, 0));
        assert!(oldest_germination_year(&sample, &DatingOptions::default()).is_empty());
    }

    #[test]
    fn test_youngest_tier1() {
        let sample = Sample::new("S", 1)
            .with(Measurement::scalar(DendroVariable::InferredGrowthYearMax, 1702))
            .with(outermost(None, Some(1800)))
            .with(Measurement::scalar(DendroVariable::TreeAgeMin, 40));

        let est = youngest_germination_year(&sample, &DatingOptions::default());
        assert_eq!(est.value, Some(1702));
        assert_eq!(est.reliability, Some(1));
        assert_eq!(est.formula, "Inferred growth year ≤");
    }

    #[test]
    fn test_youngest_tier2_tree_age() {
        let sample = Sample::new("S", 1)
            .with(outermost(None, Some(1800)))
            .with(Measurement::scalar(DendroVariable::TreeAgeMin, 40))
            .with(Measurement::scalar(DendroVariable::TreeRings, 35));

        let est = youngest_germination_year(&sample, &DatingOptions::default());
        assert_eq!(est.value, Some(1760));
        assert_eq!(est.reliability, Some(2));
        assert_eq!(est.formula, "Outermost tree-ring date - Tree age ≥");
        assert_eq!(
            est.warnings,
            vec!["Youngest germination year was calculated using: Outermost tree-ring date - Tree age ≥"]
        );
    }

    #[test]
    fn test_youngest_tier3_pith_range_uses_lower() {
        let sample = Sample::new("S", 1)
            .with(outermost(None, Some(1800)))
            .with(Measurement::scalar(DendroVariable::TreeRings, 100))
            .with(Measurement::scalar(DendroVariable::Pith, "~5-8"));

        let est = youngest_germination_year(&sample, &DatingOptions::default());
        assert_eq!(est.value, Some(1695));
        assert_eq!(est.reliability, Some(3));
        assert_eq!(est.formula, "Outermost tree-ring date - Tree rings - Distance to pith (lower value)");
        assert!(est.warnings[0].starts_with("There is no dendrochronological estimation"));
    }

    #[test]
    fn test_youngest_tier3_plain_pith() {
        let sample = Sample::new("S", 1)
            .with(outermost(None, Some(1800)))
            .with(Measurement::scalar(DendroVariable::TreeRings, 100))
            .with(Measurement::scalar(DendroVariable::Pith, 12));

        let est = youngest_germination_year(&sample, &DatingOptions::default());
        assert_eq!(est.value, Some(1688));
        assert_eq!(est.formula, "Outermost tree-ring date - Tree rings - Distance to pith");
    }

    #[test]
    fn test_youngest_measured_width_pith_falls_to_tier4() {
        let sample = Sample::new("S", 1)
            .with(outermost(None, Some(1800)))
            .with(Measurement::scalar(DendroVariable::TreeRings, 100))
            .with(Measurement::scalar(DendroVariable::Pith, "\"4"));

        let est = youngest_germination_year(&sample, &DatingOptions::default());
        assert_eq!(est.value, Some(1700));
        assert_eq!(est.reliability, Some(4));
        assert_eq!(est.formula, "Outermost tree-ring date - Tree rings");
        assert_eq!(est.warnings.len(), 1);
    }

    #[test]
    fn test_youngest_unparseable_pith_falls_to_tier4() {
        let sample = Sample::new("S", 1)
            .with(outermost(None, Some(1800)))
            .with(Measurement::scalar(DendroVariable::TreeRings, 100))
            .with(Measurement::scalar(DendroVariable::Pith, "x"));

        let est = youngest_germination_year(&sample, &DatingOptions::default());
        assert_eq!(est.reliability, Some(4));
    }

    #[test]
    fn test_youngest_zero_pith_falls_to_tier4() {
        let sample = Sample::new("S", 1)
            .with(outermost(None, Some(1800)))
            .with(Measurement::scalar(DendroVariable::TreeRings, 100))
            .with(Measurement::scalar(DendroVariable::Pith, 0));

        let est = youngest_germination_year(&sample, &DatingOptions::default());
        assert_eq!(est.value, Some(1700));
        assert_eq!(est.reliability, Some(4));
        assert_eq!(est.formula, "Outermost tree-ring date - Tree rings");
    }

    #[test]
    fn test_extreme_values_leave_estimate_empty() {
        let sample = Sample::new("S", 1)
            .with(outermost(None, Some(1800)))
            .with(Measurement::scalar(DendroVariable::TreeAgeMax, "-9223372036854775807"))
            .with(Measurement::scalar(DendroVariable::TreeRings, i64::MIN + 1));

        let oldest = oldest_germination_year(&sample, &DatingOptions::default());
        assert!(oldest.is_empty());
        assert!(oldest.formula.is_empty());
        assert!(oldest.warnings.is_empty());

        let youngest = youngest_germination_year(&sample, &DatingOptions::default());
        assert!(youngest.is_empty());
        assert_eq!(youngest.reliability, None);

        // Overflow in the pith subtraction alone
        let sample = Sample::new("S", 1)
            .with(outermost(None, Some(i64::MIN + 10)))
            .with(Measurement::scalar(DendroVariable::TreeRings, 5))
            .with(Measurement::scalar(DendroVariable::Pith, 100));
        assert!(youngest_germination_year(&sample, &DatingOptions::default()).is_empty());
    }

    #[test]
    fn test_youngest_direct_evidence_only_stops_after_tier1() {
        let sample = Sample::new("S", 1)
            .with(outermost(None, Some(1800)))
            .with(Measurement::scalar(DendroVariable::TreeAgeMin, 40));

        let est = youngest_germination_year(&sample, &DatingOptions::direct_evidence_only());
        assert!(est.is_empty());
        assert_eq!(est.reliability, None);
    }

    #[test]
    fn test_youngest_chain_exhausted() {
        let sample = Sample::new("S", 1)
            .with(Measurement::scalar(DendroVariable::TreeRings, 100))
            .with(Measurement::scalar(DendroVariable::TreeSpecies, "Ek"));

        let est = youngest_germination_year(&sample, &DatingOptions::default());
        assert_eq!(est.value, None);
        assert_eq!(est.reliability, None);
        assert!(est.formula.is_empty());
    }
}
