//! Utility modules shared across the dating engine
//!
//! - Quantity parsing: interpretation of qualified free-text measurements
//! - Lenient serde helpers for inconsistently typed backend columns

pub mod quantity;
pub mod lenient;

// Re-export commonly used types
pub use quantity::{parse_quantity, parse_leading_int, ParsedValue, Qualifier, ValueNote};
