//! Dating String Renderer
//!
//! Formats a structured dating (felling year, outermost tree-ring date) as one
//! display string, e.g. `W After circa 1745 - 1750 AD (+2/-1)`.
//!
//! Assembly order:
//! 1. season prefix
//! 2. dating uncertainty prefix (`After ` for "From")
//! 3. error uncertainty
//! 4. years, `older - younger` or whichever is present
//! 5. age type
//! 6. plus/minus suffix

use crate::sample::{nonzero, ComplexDating, Season};
use serde::{Deserialize, Serialize};

const SINGLE_SEASON: i64 = 1;
const COMPOUND_SEASON: i64 = 2;

/// Error uncertainty lookup row, keyed by type (e.g. "Ca")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorUncertaintyEntry {
    pub error_uncertainty_type: String,
    pub description: String,
}

/// Dating uncertainty lookup row, keyed by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatingUncertaintyEntry {
    pub dating_uncertainty_id: i64,
    /// Uncertainty kind, e.g. "From", "To", "Ca"
    pub uncertainty: String,
    #[serde(default)]
    pub description: String,
}

/// Caller-supplied lookup tables used to resolve uncertainty codes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupTables {
    #[serde(default)]
    pub error_uncertainty: Vec<ErrorUncertaintyEntry>,
    #[serde(default)]
    pub dating_uncertainty: Vec<DatingUncertaintyEntry>,
}

impl LookupTables {
    pub fn error_uncertainty_description(&self, error_type: &str) -> Option<&str> {
        self.error_uncertainty
            .iter()
            .find(|e| e.error_uncertainty_type == error_type)
            .map(|e| e.description.as_str())
            .filter(|d| !d.is_empty())
    }

    pub fn dating_uncertainty_kind(&self, id: i64) -> Option<&str> {
        self.dating_uncertainty
            .iter()
            .find(|e| e.dating_uncertainty_id == id)
            .map(|e| e.uncertainty.as_str())
            .filter(|u| !u.is_empty())
    }
}

fn capitalized_initial(word: &str) -> Option<String> {
    word.trim().chars().next().map(|c| c.to_uppercase().collect())
}

fn is_winter(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("winter") || lower.contains("vinter")
}

/// Abbreviated season prefix and whether the younger year spans into the next
fn season_prefix(season: &Season) -> Option<(String, bool)> {
    let name = season.season_name.as_deref().map(str::trim).filter(|n| !n.is_empty())?;
    match season.season_type_id? {
        SINGLE_SEASON => capitalized_initial(name).map(|initial| (initial, false)),
        COMPOUND_SEASON => {
            let initials: Vec<String> = name.split('/').filter_map(capitalized_initial).collect();
            if initials.is_empty() {
                return None;
            }
            Some((initials.join("/"), is_winter(name)))
        }
        _ => None,
    }
}

/// `1745/46` for a season running from 1745 into 1746
fn spanning_year(year: i64) -> String {
    format!("{}/{:02}", year, (year.rem_euclid(100) + 1) % 100)
}

fn years(dating: &ComplexDating, spans_new_year: bool) -> Option<String> {
    let display = |year: i64| {
        if spans_new_year {
            spanning_year(year)
        } else {
            year.to_string()
        }
    };
    match (nonzero(dating.older), nonzero(dating.younger)) {
        (Some(older), Some(younger)) => Some(format!("{} - {}", older, display(younger))),
        (None, Some(younger)) => Some(display(younger)),
        (Some(older), None) => Some(display(older)),
        (None, None) => None,
    }
}

fn modifier_suffix(dating: &ComplexDating) -> Option<String> {
    match (nonzero(dating.plus), nonzero(dating.minus)) {
        (Some(plus), Some(minus)) => Some(format!("(+{}/-{})", plus, minus)),
        (Some(plus), None) => Some(format!("(+{})", plus)),
        (None, Some(minus)) => Some(format!("(-{})", minus)),
        (None, None) => None,
    }
}

/// Render a structured dating as a display string
///
/// Codes missing from `tables` fall back to the raw value (error uncertainty)
/// or are left out (dating uncertainty). A dating with no fields renders as an
/// empty string.
pub fn render_dating(dating: &ComplexDating, tables: &LookupTables) -> String {
    let mut parts: Vec<String> = Vec::new();

    let season = dating.season.as_ref().and_then(season_prefix);
    let spans_new_year = season.as_ref().is_some_and(|(_, spans)| *spans);
    if let Some((prefix, _)) = season {
        parts.push(prefix);
    }

    if let Some(kind) = dating.dating_uncertainty.and_then(|id| tables.dating_uncertainty_kind(id)) {
        parts.push(if kind == "From" { "After".to_string() } else { kind.to_string() });
    }

    if let Some(error) = dating.error_uncertainty.as_deref().filter(|e| !e.is_empty()) {
        let shown = tables.error_uncertainty_description(error).unwrap_or(error);
        parts.push(shown.to_string());
    }

    if let Some(years) = years(dating, spans_new_year) {
        parts.push(years);
    }

    if let Some(age_type) = dating.age_type.as_deref().filter(|a| !a.is_empty()) {
        parts.push(age_type.to_string());
    }

    if let Some(suffix) = modifier_suffix(dating) {
        parts.push(suffix);
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> LookupTables {
        LookupTables {
            error_uncertainty: vec![ErrorUncertaintyEntry {
                error_uncertainty_type: "Ca".into(),
                description: "circa".into(),
            }],
            dating_uncertainty: vec![
                DatingUncertaintyEntry {
                    dating_uncertainty_id: 1,
                    uncertainty: "From".into(),
                    description: "From the year".into(),
                },
                DatingUncertaintyEntry {
                    dating_uncertainty_id: 2,
                    uncertainty: "To".into(),
                    description: "Up to the year".into(),
                },
            ],
        }
    }

    fn season(name: &str, type_id: i64) -> Option<Season> {
        Some(Season { season_id: Some(1), season_name: Some(name.into()), season_type_id: Some(type_id) })
    }

    #[test]
    fn test_render_range_with_age_type() {
        let dating = ComplexDating {
            older: Some(1745),
            younger: Some(1750),
            age_type: Some("AD".into()),
            ..Default::default()
        };
        assert_eq!(render_dating(&dating, &tables()), "1745 - 1750 AD");
    }

    #[test]
    fn test_render_single_year() {
        let younger = ComplexDating { younger: Some(1750), ..Default::default() };
        let older = ComplexDating { older: Some(1745), ..Default::default() };
        assert_eq!(render_dating(&younger, &tables()), "1750");
        assert_eq!(render_dating(&older, &tables()), "1745");
    }

    #[test]
    fn test_render_uncertainties() {
        let dating = ComplexDating {
            younger: Some(1750),
            dating_uncertainty: Some(1),
            error_uncertainty: Some("Ca".into()),
            ..Default::default()
        };
        assert_eq!(render_dating(&dating, &tables()), "After circa 1750");

        let to = ComplexDating { younger: Some(1750), dating_uncertainty: Some(2), ..Default::default() };
        assert_eq!(render_dating(&to, &tables()), "To 1750");
    }

    #[test]
    fn test_unresolved_codes() {
        let dating = ComplexDating {
            younger: Some(1750),
            dating_uncertainty: Some(99),
            error_uncertainty: Some("?".into()),
            ..Default::default()
        };
        assert_eq!(render_dating(&dating, &LookupTables::default()), "? 1750");
    }

    #[test]
    fn test_render_single_season() {
        let dating = ComplexDating { younger: Some(1750), season: season("summer", 1), ..Default::default() };
        assert_eq!(render_dating(&dating, &tables()), "S 1750");
    }

    #[test]
    fn test_render_compound_winter_season() {
        let dating = ComplexDating {
            older: Some(1744),
            younger: Some(1745),
            age_type: Some("AD".into()),
            season: season("Winter/Spring", 2),
            ..Default::default()
        };
        assert_eq!(render_dating(&dating, &tables()), "W/S 1744 - 1745/46 AD");

        let century = ComplexDating { younger: Some(1799), season: season("Winter/Spring", 2), ..Default::default() };
        assert_eq!(render_dating(&century, &tables()), "W/S 1799/00");
    }

    #[test]
    fn test_spanning_year_at_range_limit() {
        assert_eq!(spanning_year(1799), "1799/00");
        assert_eq!(spanning_year(i64::MAX), format!("{}/08", i64::MAX));
        assert_eq!(spanning_year(-1), "-1/00");

        let dating = ComplexDating { younger: Some(i64::MAX), season: season("Winter/Spring", 2), ..Default::default() };
        assert_eq!(render_dating(&dating, &tables()), format!("W/S {}/08", i64::MAX));
    }

    #[test]
    fn test_compound_season_without_winter() {
        let dating = ComplexDating { younger: Some(1745), season: season("Summer/Autumn", 2), ..Default::default() };
        assert_eq!(render_dating(&dating, &tables()), "S/A 1745");
    }

    #[test]
    fn test_unknown_season_type_ignored() {
        let dating = ComplexDating { younger: Some(1745), season: season("Winter", 7), ..Default::default() };
        assert_eq!(render_dating(&dating, &tables()), "1745");
    }

    #[test]
    fn test_render_modifiers() {
        let both = ComplexDating { younger: Some(1750), plus: Some(2), minus: Some(1), ..Default::default() };
        let plus = ComplexDating { younger: Some(1750), plus: Some(2), ..Default::default() };
        let minus = ComplexDating { younger: Some(1750), minus: Some(1), ..Default::default() };
        assert_eq!(render_dating(&both, &tables()), "1750 (+2/-1)");
        assert_eq!(render_dating(&plus, &tables()), "1750 (+2)");
        assert_eq!(render_dating(&minus, &tables()), "1750 (-1)");
    }

    #[test]
    fn test_render_everything() {
        let dating = ComplexDating {
            older: Some(1745),
            younger: Some(1750),
            age_type: Some("AD".into()),
            dating_uncertainty: Some(1),
            error_uncertainty: Some("Ca".into()),
            plus: Some(2),
            minus: Some(1),
            season: season("Winter", 1),
        };
        assert_eq!(render_dating(&dating, &tables()), "W After circa 1745 - 1750 AD (+2/-1)");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_dating(&ComplexDating::default(), &tables()), "");
    }
}
