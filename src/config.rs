//! Engine configuration
//!
//! Options are passed explicitly into every engine entry point; there is no
//! global toggle. Both the options and the uncertainty lookup tables can be
//! loaded from JSON files.

use crate::render::LookupTables;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Options controlling how far the dating engine falls back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatingOptions {
    /// When false, germination years come only from the inferred growth year
    /// measurements; derived calculations are skipped.
    pub attempt_uncertain_calculations: bool,
}

impl Default for DatingOptions {
    fn default() -> Self {
        DatingOptions {
            attempt_uncertain_calculations: true,
        }
    }
}

impl DatingOptions {
    /// Only direct dendrochronological evidence, no derived tiers
    pub fn direct_evidence_only() -> Self {
        DatingOptions {
            attempt_uncertain_calculations: false,
        }
    }

    /// Load options from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dating options file: {:?}", path))?;

        let options: DatingOptions = serde_json::from_str(&contents)
            .with_context(|| "Failed to parse dating options JSON")?;

        tracing::info!(
            "Loaded dating options (attempt_uncertain_calculations={})",
            options.attempt_uncertain_calculations
        );
        Ok(options)
    }
}

impl LookupTables {
    /// Load uncertainty lookup tables from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read lookup tables file: {:?}", path))?;

        let tables: LookupTables = serde_json::from_str(&contents)
            .with_context(|| "Failed to parse lookup tables JSON")?;

        tracing::info!(
            "Loaded lookup tables: {} error uncertainty, {} dating uncertainty entries",
            tables.error_uncertainty.len(),
            tables.dating_uncertainty.len()
        );
        Ok(tables)
    }
}
