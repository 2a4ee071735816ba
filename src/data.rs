//! Measurement Row Ingestion
//!
//! The measurement backend delivers two flat tables:
//! - measurement rows: one scalar value per `(physical_sample_id, dendro_lookup_id)`
//! - dating rows: one structured dating per felling-year / outermost-date cell
//!
//! `samples_from_rows` folds them into `Sample`s. Rows arrive either as JSON
//! (serde) or as CSV files loaded with Polars.

use crate::error::DendroError;
use crate::sample::{ComplexDating, Measurement, MeasurementValue, Sample, ScalarValue, Season};
use crate::utils::lenient::opt_int;
use crate::vocabulary::DendroVariable;
use anyhow::{Context, Result};
use polars::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// ROW TYPES
// ============================================================================

/// One scalar measurement cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRow {
    pub physical_sample_id: i64,
    /// Sample name
    pub sample: String,
    pub dendro_lookup_id: i64,
    #[serde(default)]
    pub measurement_value: Option<ScalarValue>,
}

/// One structured dating cell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatingRow {
    pub physical_sample_id: i64,
    pub dendro_lookup_id: i64,
    #[serde(default)]
    pub age_type: Option<String>,
    #[serde(default, deserialize_with = "opt_int")]
    pub older: Option<i64>,
    #[serde(default, deserialize_with = "opt_int")]
    pub younger: Option<i64>,
    #[serde(default, deserialize_with = "opt_int")]
    pub plus: Option<i64>,
    #[serde(default, deserialize_with = "opt_int")]
    pub minus: Option<i64>,
    #[serde(default)]
    pub error_uncertainty: Option<String>,
    #[serde(default, deserialize_with = "opt_int")]
    pub dating_uncertainty: Option<i64>,
    #[serde(default, deserialize_with = "opt_int")]
    pub season_id: Option<i64>,
    #[serde(default)]
    pub season_name: Option<String>,
    #[serde(default, deserialize_with = "opt_int")]
    pub season_type_id: Option<i64>,
}

impl DatingRow {
    pub fn to_dating(&self) -> ComplexDating {
        let season = if self.season_id.is_some() || self.season_name.is_some() {
            Some(Season {
                season_id: self.season_id,
                season_name: self.season_name.clone(),
                season_type_id: self.season_type_id,
            })
        } else {
            None
        };

        ComplexDating {
            older: self.older,
            younger: self.younger,
            age_type: self.age_type.clone(),
            dating_uncertainty: self.dating_uncertainty,
            error_uncertainty: self.error_uncertainty.clone(),
            plus: self.plus,
            minus: self.minus,
            season,
        }
    }
}

// ============================================================================
// GROUPING
// ============================================================================

/// Group flat rows into samples, in order of first appearance
///
/// Measurement rows for structured variables are placeholders; their value
/// comes from the matching dating row. Dating rows for samples with no
/// measurement rows are dropped.
pub fn samples_from_rows(measurements: &[MeasurementRow], datings: &[DatingRow]) -> Vec<Sample> {
    let mut samples: Vec<Sample> = Vec::new();
    let mut index: FxHashMap<i64, usize> = FxHashMap::default();

    for row in measurements {
        let position = *index.entry(row.physical_sample_id).or_insert_with(|| {
            samples.push(Sample::new(row.sample.clone(), row.physical_sample_id));
            samples.len() - 1
        });

        let is_complex = DendroVariable::from_lookup_id(row.dendro_lookup_id)
            .map(|v| v.is_complex())
            .unwrap_or(false);
        if is_complex {
            continue;
        }

        let value = row.measurement_value.clone().map(|v| match v {
            ScalarValue::Text(s) => ScalarValue::from_raw(&s),
            other => other,
        });
        samples[position].measurements.push(Measurement {
            lookup_id: row.dendro_lookup_id,
            value: MeasurementValue::Scalar(value),
        });
    }

    let mut orphaned = 0usize;
    for row in datings {
        match index.get(&row.physical_sample_id) {
            Some(&position) => samples[position].measurements.push(Measurement {
                lookup_id: row.dendro_lookup_id,
                value: MeasurementValue::Complex(row.to_dating()),
            }),
            None => orphaned += 1,
        }
    }
    if orphaned > 0 {
        tracing::warn!("Dropped {} dating rows with no matching sample", orphaned);
    }

    tracing::debug!(
        "Grouped {} measurement rows and {} dating rows into {} samples",
        measurements.len(),
        datings.len(),
        samples.len()
    );
    samples
}

// ============================================================================
// CSV LOADING
// ============================================================================

const MEASUREMENTS: &str = "measurements";
const DATINGS: &str = "datings";

/// Both row tables of a dendro dataset
#[derive(Debug, Clone, Default)]
pub struct MeasurementTables {
    pub measurements: Vec<MeasurementRow>,
    pub datings: Vec<DatingRow>,
}

impl MeasurementTables {
    /// Load both tables from CSV files with header rows
    pub fn load_csv(measurements_path: &Path, datings_path: &Path) -> Result<Self> {
        let measurements_df = read_csv(measurements_path)?;
        let datings_df = read_csv(datings_path)?;

        let tables = MeasurementTables {
            measurements: measurement_rows(&measurements_df)?,
            datings: dating_rows(&datings_df)?,
        };

        tracing::info!(
            "Loaded {} measurement rows and {} dating rows",
            tables.measurements.len(),
            tables.datings.len()
        );
        Ok(tables)
    }

    pub fn into_samples(self) -> Vec<Sample> {
        samples_from_rows(&self.measurements, &self.datings)
    }
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.into()))
        .with_context(|| format!("Failed to create CSV reader: {:?}", path))?
        .finish()
        .with_context(|| format!("Failed to load CSV: {:?}", path))
}

fn int_column(df: &DataFrame, table: &'static str, column: &'static str) -> Result<Vec<Option<i64>>> {
    let series = df
        .column(column)
        .map_err(|_| DendroError::MissingColumn { table, column })?
        .cast(&DataType::Int64)
        .with_context(|| format!("Column '{}' is not numeric", column))?;
    let values = series
        .i64()
        .with_context(|| format!("Column '{}' is not Int64", column))?
        .into_iter()
        .collect();
    Ok(values)
}

fn str_column(df: &DataFrame, table: &'static str, column: &'static str) -> Result<Vec<Option<String>>> {
    let series = df
        .column(column)
        .map_err(|_| DendroError::MissingColumn { table, column })?
        .cast(&DataType::String)
        .with_context(|| format!("Column '{}' cannot be read as text", column))?;
    let values = series
        .str()
        .with_context(|| format!("Column '{}' is not string type", column))?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

/// Optional columns read as all-null when absent
fn optional<T: Clone>(
    df: &DataFrame,
    column: &'static str,
    read: impl FnOnce(&DataFrame, &'static str, &'static str) -> Result<Vec<Option<T>>>,
) -> Result<Vec<Option<T>>> {
    if df.get_column_index(column).is_some() {
        read(df, DATINGS, column)
    } else {
        Ok(vec![None; df.height()])
    }
}

fn measurement_rows(df: &DataFrame) -> Result<Vec<MeasurementRow>> {
    let ids = int_column(df, MEASUREMENTS, "physical_sample_id")?;
    let names = str_column(df, MEASUREMENTS, "sample")?;
    let lookups = int_column(df, MEASUREMENTS, "dendro_lookup_id")?;
    let values = str_column(df, MEASUREMENTS, "measurement_value")?;

    let mut rows = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        // Rows without identity cannot be placed
        let (Some(physical_sample_id), Some(dendro_lookup_id)) = (ids[idx], lookups[idx]) else {
            tracing::warn!("Skipping measurement row {}: missing sample or lookup id", idx);
            continue;
        };
        rows.push(MeasurementRow {
            physical_sample_id,
            sample: names[idx].clone().unwrap_or_default(),
            dendro_lookup_id,
            measurement_value: values[idx].as_deref().map(ScalarValue::from_raw),
        });
    }
    Ok(rows)
}

fn dating_rows(df: &DataFrame) -> Result<Vec<DatingRow>> {
    let ids = int_column(df, DATINGS, "physical_sample_id")?;
    let lookups = int_column(df, DATINGS, "dendro_lookup_id")?;
    let age_type = optional(df, "age_type", str_column)?;
    let older = optional(df, "older", int_column)?;
    let younger = optional(df, "younger", int_column)?;
    let plus = optional(df, "plus", int_column)?;
    let minus = optional(df, "minus", int_column)?;
    let error_uncertainty = optional(df, "error_uncertainty", str_column)?;
    let dating_uncertainty = optional(df, "dating_uncertainty", int_column)?;
    let season_id = optional(df, "season_id", int_column)?;
    let season_name = optional(df, "season_name", str_column)?;
    let season_type_id = optional(df, "season_type_id", int_column)?;

    let mut rows = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let (Some(physical_sample_id), Some(dendro_lookup_id)) = (ids[idx], lookups[idx]) else {
            tracing::warn!("Skipping dating row {}: missing sample or lookup id", idx);
            continue;
        };
        rows.push(DatingRow {
            physical_sample_id,
            dendro_lookup_id,
            age_type: age_type[idx].clone(),
            older: older[idx],
            younger: younger[idx],
            plus: plus[idx],
            minus: minus[idx],
            error_uncertainty: error_uncertainty[idx].clone(),
            dating_uncertainty: dating_uncertainty[idx],
            season_id: season_id[idx],
            season_name: season_name[idx].clone(),
            season_type_id: season_type_id[idx],
        });
    }
    Ok(rows)
}
