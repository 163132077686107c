use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Quartile statistics and Tukey fences of one column.
///
/// Computed from the post-imputation values of the column, before any
/// clipping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnFences {
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl ColumnFences {
    /// Check if `value` lies within the fences (inclusive).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Median imputation applied to one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputationRecord {
    pub column: String,
    pub median: f64,
    pub values_filled: usize,
}

/// Clipping applied to one treated column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClippingRecord {
    pub column: String,
    pub fences: ColumnFences,
    pub clipped_low: usize,
    pub clipped_high: usize,
}

impl ClippingRecord {
    pub fn total_clipped(&self) -> usize {
        self.clipped_low + self.clipped_high
    }
}

/// What the cleaning pipeline did to a table.
///
/// Serialized into the JSON report written by `--emit-report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,
    /// Number of rows (identical before and after cleaning).
    pub rows: usize,
    /// Number of columns.
    pub columns: usize,
    /// Missing cells before imputation.
    pub missing_before: usize,
    /// One record per column, in table order.
    pub imputations: Vec<ImputationRecord>,
    /// One record per treated column, in processing order.
    pub clippings: Vec<ClippingRecord>,
    /// Human-readable log of the steps taken.
    pub processing_steps: Vec<String>,
}

impl CleaningReport {
    pub fn values_imputed(&self) -> usize {
        self.imputations.iter().map(|r| r.values_filled).sum()
    }

    pub fn values_clipped(&self) -> usize {
        self.clippings.iter().map(ClippingRecord::total_clipped).sum()
    }

    /// Fences computed for `column`, if it was clipped.
    pub fn fences_for(&self, column: &str) -> Option<&ColumnFences> {
        self.clippings
            .iter()
            .find(|r| r.column == column)
            .map(|r| &r.fences)
    }
}

/// Cleaned table together with the report describing the cleaning.
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    pub data: DataFrame,
    pub report: CleaningReport,
}
