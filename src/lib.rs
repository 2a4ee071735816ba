//! Dendrochronological Dating Engine
//!
//! Infers germination and felling year intervals for wood samples from their
//! dendro measurements, and selects, orders and renders the results.
//!
//! Layout:
//! - `utils/`: noisy quantity parsing and lenient serde helpers
//! - `vocabulary` / `sample`: fixed measurement vocabulary and sample model
//! - `estimates/`: the four year estimates with reliability tiers and warnings
//! - `selection`: datable-sample filtering, timespan queries, histograms
//! - `ordering` / `timeline`: display ordering and chart intervals
//! - `render`: dating display strings
//! - `data`: grouping backend rows into samples (JSON or CSV via Polars)

pub mod error;
pub mod utils;
pub mod vocabulary;
pub mod sample;
pub mod config;
pub mod estimates;
pub mod selection;
pub mod ordering;
pub mod timeline;
pub mod render;
pub mod data;

// Re-export commonly used types
pub use error::{DendroError, DendroResult};
pub use utils::{parse_quantity, ParsedValue, Qualifier, ValueNote};
pub use vocabulary::DendroVariable;
pub use sample::{ComplexDating, Measurement, MeasurementValue, Sample, ScalarValue, Season};
pub use config::DatingOptions;
pub use estimates::{
    evaluate_all, oldest_felling_year, oldest_germination_year, youngest_felling_year,
    youngest_germination_year, DateEstimate, SampleDating,
};
pub use selection::{dating_histogram, samples_within_timespan, strip_non_dated, HistogramBin};
pub use ordering::{sort_samples, SortKey, UncertaintyView};
pub use timeline::{build_timelines, DatingSpan, DatingTimeline, SpanKind};
pub use render::{render_dating, LookupTables};
pub use data::{samples_from_rows, DatingRow, MeasurementRow, MeasurementTables};
