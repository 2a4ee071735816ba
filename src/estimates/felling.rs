//! Felling year estimates
//!
//! Both estimates read the single "Estimated felling year" dating. The oldest
//! felling year prefers its `older` bound and widens by `minus`; the youngest
//! prefers `younger` and widens by `plus`. When the preferred bound is missing
//! the other one is used at reliability 2.

use super::{DateEstimate, OLDEST_FELLING, YOUNGEST_FELLING};
use crate::config::DatingOptions;
use crate::sample::{nonzero, Sample};
use crate::vocabulary::DendroVariable;

const FELLING_LABEL: &str = "Estimated felling year";

#[derive(Clone, Copy)]
enum Bound {
    Oldest,
    Youngest,
}

fn felling_year(sample: &Sample, bound: Bound) -> DateEstimate {
    let name = match bound {
        Bound::Oldest => OLDEST_FELLING,
        Bound::Youngest => YOUNGEST_FELLING,
    };
    let result = DateEstimate::empty(name);

    let Some(efy) = sample.complex(DendroVariable::EstimatedFellingYear) else {
        return result;
    };

    let (preferred, fallback) = match bound {
        Bound::Oldest => ((efy.older, "older"), (efy.younger, "younger")),
        Bound::Youngest => ((efy.younger, "younger"), (efy.older, "older")),
    };

    let (year, field, reliability) = match (nonzero(preferred.0), nonzero(fallback.0)) {
        (Some(year), _) => (year, preferred.1, 1),
        (None, Some(year)) => (year, fallback.1, 2),
        (None, None) => return result,
    };

    let mut estimate = result;
    estimate.absorb_dating_context(efy, FELLING_LABEL);

    // The uncertainty modifier only ever widens the felling interval
    let value = match bound {
        Bound::Oldest => match nonzero(efy.minus) {
            Some(minus) => {
                estimate.warn(format!(
                    "The estimated felling year has a minus uncertainty specified as: {}",
                    minus
                ));
                year.checked_sub(minus)
            }
            None => Some(year),
        },
        Bound::Youngest => match nonzero(efy.plus) {
            Some(plus) => {
                estimate.warn(format!(
                    "The estimated felling year has a plus uncertainty specified as: {}",
                    plus
                ));
                year.checked_add(plus)
            }
            None => Some(year),
        },
    };

    if reliability == 2 {
        estimate.warn(format!(
            "No value found for the {} estimated felling year, using the {} year instead",
            preferred.1, fallback.1
        ));
        tracing::debug!("{}: {} from the {} bound", sample.sample_name, name, fallback.1);
    }

    estimate.resolve_derived(value, format!("{} ({})", FELLING_LABEL, field), reliability)
}

/// Oldest possible felling year
///
/// `options` is accepted for symmetry with the germination estimates; both
/// felling tiers use direct evidence.
pub fn oldest_felling_year(sample: &Sample, _options: &DatingOptions) -> DateEstimate {
    felling_year(sample, Bound::Oldest)
}

/// Youngest possible felling year
pub fn youngest_felling_year(sample: &Sample, _options: &DatingOptions) -> DateEstimate {
    felling_year(sample, Bound::Youngest)
}
