//! Shared helpers for moving values between polars columns and plain
//! `f64` slices.
//!
//! Every computation in this crate works on `Vec<Option<f64>>` extracted
//! from a column; these helpers keep the extraction and write-back rules
//! in one place.

use crate::error::{ProcessingError, Result};
use polars::prelude::*;

// =============================================================================
// Cell Parsing
// =============================================================================

/// Textual markers that always mean "no value".
pub const MISSING_MARKERS: [&str; 6] = ["na", "n/a", "nan", "null", "none", "missing"];

/// Check if a cell is empty or a missing-value marker.
///
/// # Example
///
/// ```rust,ignore
/// use pima_processing::utils::is_missing_marker;
///
/// assert!(is_missing_marker(""));
/// assert!(is_missing_marker(" NA "));
/// assert!(!is_missing_marker("0"));
/// ```
pub fn is_missing_marker(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.is_empty() || MISSING_MARKERS.iter().any(|&marker| lower == marker)
}

/// Parse one text cell as a number.
///
/// Empty cells, missing markers, non-finite numbers (`inf`, `1e400`) and
/// anything that does not parse as `f64` yield `None`; a missing cell is
/// never turned into zero.
pub fn parse_numeric_cell(s: &str) -> Option<f64> {
    if is_missing_marker(s) {
        return None;
    }
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// =============================================================================
// Column Access
// =============================================================================

/// Names of all columns, in table order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Read a column as `f64` values, with `None` for missing cells.
///
/// Integer columns are widened; NaN and infinities are reported as missing.
pub fn column_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .map_err(|_| ProcessingError::ColumnNotFound(name.to_string()))?;

    // Create float series first to avoid temporary value issue
    let float_series = column.as_materialized_series().cast(&DataType::Float64)?;
    let values = float_series
        .f64()?
        .into_iter()
        .map(|v| v.filter(|val| val.is_finite()))
        .collect();

    Ok(values)
}

/// The present values of a column, dropping missing cells.
pub fn present_values(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().flatten().copied().collect()
}

/// Replace a column with new `Float64` values of the same length.
pub fn replace_column(df: &mut DataFrame, name: &str, values: Vec<Option<f64>>) -> Result<()> {
    let series = Series::new(name.into(), values);
    df.replace(name, series)?;
    Ok(())
}

/// Total number of missing cells across all columns, counting NaN and
/// infinite values the same way [`column_values`] does.
pub fn missing_cell_count(df: &DataFrame) -> usize {
    df.get_columns()
        .iter()
        .map(|col| {
            let Ok(floats) = col.as_materialized_series().cast(&DataType::Float64) else {
                return col.null_count();
            };
            match floats.f64() {
                Ok(ca) => ca.into_iter().filter(|v| !v.is_some_and(f64::is_finite)).count(),
                Err(_) => col.null_count(),
            }
        })
        .sum()
}

// =============================================================================
// Tests
// =============================================================================
