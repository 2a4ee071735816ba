//! Dendrochronology Measurement Vocabulary
//!
//! Fixed table mapping the named dendro variables to the stable lookup ids used
//! by the measurement database. The table is compiled in; lookups by id or by
//! name are a `match`, never a scan over strings at evaluation time.

use crate::error::{DendroError, DendroResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One named dendrochronological variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DendroVariable {
    TreeSpecies,
    TreeRings,
    EarlywoodLatewood,
    RadiusCount,
    TimeSeries,
    Sapwood,
    Bark,
    WaneyEdge,
    Pith,
    TreeAgeMin,             // Tree age ≥
    TreeAgeMax,             // Tree age ≤
    InferredGrowthYearMin,  // Inferred growth year ≥
    InferredGrowthYearMax,  // Inferred growth year ≤
    EstimatedFellingYear,
    EstimatedFellingYearLowerAccuracy,
    Provenance,
    OutermostTreeRingDate,
    NotDated,
    DateNote,
    ProvenanceComment,
}

/// Static vocabulary entry
#[derive(Debug, Clone, Copy)]
pub struct VariableEntry {
    pub variable: DendroVariable,
    pub name: &'static str,
    pub lookup_id: i64,
}

// ============================================================================
// EMBEDDED VOCABULARY
// ============================================================================

pub static VOCABULARY: &[VariableEntry] = &[
    VariableEntry {
        variable: DendroVariable::TreeSpecies,
        name: "Tree species",
        lookup_id: 121,
    },
    VariableEntry {
        variable: DendroVariable::TreeRings,
        name: "Tree rings",
        lookup_id: 122,
    },
    VariableEntry {
        variable: DendroVariable::EarlywoodLatewood,
        name: "earlywood/late wood",
        lookup_id: 123,
    },
    VariableEntry {
        variable: DendroVariable::RadiusCount,
        name: "No. of radius",
        lookup_id: 124,
    },
    VariableEntry {
        variable: DendroVariable::TimeSeries,
        name: "3 time series",
        lookup_id: 125,
    },
    VariableEntry {
        variable: DendroVariable::Sapwood,
        name: "Sapwood (Sp)",
        lookup_id: 126,
    },
    VariableEntry {
        variable: DendroVariable::Bark,
        name: "Bark (B)",
        lookup_id: 127,
    },
    VariableEntry {
        variable: DendroVariable::WaneyEdge,
        name: "Waney edge (W)",
        lookup_id: 128,
    },
    VariableEntry {
        variable: DendroVariable::Pith,
        name: "Pith (P)",
        lookup_id: 129,
    },
    VariableEntry {
        variable: DendroVariable::TreeAgeMin,
        name: "Tree age ≥",
        lookup_id: 130,
    },
    VariableEntry {
        variable: DendroVariable::TreeAgeMax,
        name: "Tree age ≤",
        lookup_id: 131,
    },
    VariableEntry {
        variable: DendroVariable::InferredGrowthYearMin,
        name: "Inferred growth year ≥",
        lookup_id: 132,
    },
    VariableEntry {
        variable: DendroVariable::InferredGrowthYearMax,
        name: "Inferred growth year ≤",
        lookup_id: 133,
    },
    VariableEntry {
        variable: DendroVariable::EstimatedFellingYear,
        name: "Estimated felling year",
        lookup_id: 134,
    },
    VariableEntry {
        variable: DendroVariable::EstimatedFellingYearLowerAccuracy,
        name: "Estimated felling year, lower accuracy",
        lookup_id: 135,
    },
    VariableEntry {
        variable: DendroVariable::Provenance,
        name: "Provenance",
        lookup_id: 136,
    },
    VariableEntry {
        variable: DendroVariable::OutermostTreeRingDate,
        name: "Outermost tree-ring date",
        lookup_id: 137,
    },
    VariableEntry {
        variable: DendroVariable::NotDated,
        name: "Not dated",
        lookup_id: 138,
    },
    VariableEntry {
        variable: DendroVariable::DateNote,
        name: "Date note",
        lookup_id: 139,
    },
    VariableEntry {
        variable: DendroVariable::ProvenanceComment,
        name: "Provenance comment",
        lookup_id: 140,
    },
];

// ============================================================================
// LOOKUP FUNCTIONS
// ============================================================================

impl DendroVariable {
    /// Stable external identifier of this variable
    pub fn lookup_id(self) -> i64 {
        self.entry().lookup_id
    }

    /// Canonical name, as stored in the measurement database
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    /// Vocabulary entry for this variable.
    ///
    /// The table is ordered like the enum, so the discriminant is the index.
    pub fn entry(self) -> &'static VariableEntry {
        &VOCABULARY[self as usize]
    }

    /// Resolve a lookup id to its variable
    ///
    /// # Examples
    /// ```
    /// use dendro_dating::vocabulary::DendroVariable;
    ///
    /// assert_eq!(DendroVariable::from_lookup_id(129).unwrap(), DendroVariable::Pith);
    /// assert!(DendroVariable::from_lookup_id(42).is_err());
    /// ```
    pub fn from_lookup_id(lookup_id: i64) -> DendroResult<Self> {
        // Ids are contiguous from 121
        let first = VOCABULARY[0].lookup_id;
        if lookup_id < first {
            return Err(DendroError::UnknownLookupId(lookup_id));
        }
        VOCABULARY
            .get((lookup_id - first) as usize)
            .map(|entry| entry.variable)
            .ok_or(DendroError::UnknownLookupId(lookup_id))
    }

    /// Variables carrying a structured dating value instead of a scalar
    pub fn is_complex(self) -> bool {
        matches!(
            self,
            DendroVariable::EstimatedFellingYear | DendroVariable::OutermostTreeRingDate
        )
    }
}

impl FromStr for DendroVariable {
    type Err = DendroError;

    /// Resolve by canonical name. Surrounding whitespace is ignored since the
    /// database carries at least one name with a trailing space.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        VOCABULARY
            .iter()
            .find(|entry| entry.name == wanted)
            .map(|entry| entry.variable)
            .ok_or_else(|| DendroError::UnknownVariable(s.to_string()))
    }
}

impl fmt::Display for DendroVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
