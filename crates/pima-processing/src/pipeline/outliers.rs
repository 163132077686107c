//! Outlier handling module.
//!
//! Clips (winsorizes) numeric columns at Tukey fences computed from linear
//! interpolation quartiles. Clipping never removes rows.

use crate::error::{ProcessingError, Result};
use crate::stats;
use crate::types::{ClippingRecord, ColumnFences};
use crate::utils::{column_values, present_values, replace_column};
use polars::prelude::*;
use tracing::debug;

/// Handles outlier detection and treatment.
pub struct OutlierHandler;

impl OutlierHandler {
    /// Fail with [`ProcessingError::MissingColumn`] naming the first of
    /// `columns` (in the given order) that `df` lacks.
    pub fn ensure_columns_present<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Result<()> {
        for column in columns {
            let name = column.as_ref();
            if df.column(name).is_err() {
                return Err(ProcessingError::MissingColumn(name.to_string()));
            }
        }
        Ok(())
    }

    /// Compute quartiles and fences of `values` (present values only).
    ///
    /// `None` when `values` is empty.
    pub fn compute_fences(values: &[f64], multiplier: f64) -> Option<ColumnFences> {
        let sorted = stats::sorted(values);
        let median = stats::quantile_sorted(&sorted, 0.5)?;
        let q1 = stats::quantile_sorted(&sorted, 0.25)?;
        let q3 = stats::quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;

        Some(ColumnFences {
            median,
            q1,
            q3,
            iqr,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        })
    }

    /// Clip one value to the fences.
    #[inline]
    pub fn clip_value(value: f64, fences: &ColumnFences) -> f64 {
        if value < fences.lower {
            fences.lower
        } else if value > fences.upper {
            fences.upper
        } else {
            value
        }
    }

    /// Clip a column's values in place. Missing cells stay missing.
    ///
    /// Returns the number of values raised to the lower fence and lowered
    /// to the upper fence.
    pub fn clip_values(values: &mut [Option<f64>], fences: &ColumnFences) -> (usize, usize) {
        let mut clipped_low = 0;
        let mut clipped_high = 0;

        for val in values.iter_mut().flatten() {
            if *val < fences.lower {
                clipped_low += 1;
            } else if *val > fences.upper {
                clipped_high += 1;
            }
            *val = Self::clip_value(*val, fences);
        }

        (clipped_low, clipped_high)
    }

    /// Clip every column in `columns`, in order, at its own fences.
    ///
    /// Presence of all columns is checked before any column is rewritten.
    pub fn clip_columns<S: AsRef<str>>(
        df: &mut DataFrame,
        columns: &[S],
        multiplier: f64,
        processing_steps: &mut Vec<String>,
    ) -> Result<Vec<ClippingRecord>> {
        Self::ensure_columns_present(df, columns)?;

        let mut records = Vec::with_capacity(columns.len());
        for column in columns {
            let col_name = column.as_ref();
            let mut values = column_values(df, col_name)?;
            let fences = Self::compute_fences(&present_values(&values), multiplier)
                .ok_or_else(|| ProcessingError::EmptyColumn(col_name.to_string()))?;

            let (clipped_low, clipped_high) = Self::clip_values(&mut values, &fences);
            replace_column(df, col_name, values)?;

            debug!(
                "{}: Q1={} Q3={} IQR={} fences=[{}, {}] clipped {} low, {} high",
                col_name, fences.q1, fences.q3, fences.iqr, fences.lower, fences.upper,
                clipped_low, clipped_high
            );
            processing_steps.push(format!(
                "Clipped {} outliers in '{}' to [{:.3}, {:.3}] ({} low, {} high)",
                clipped_low + clipped_high,
                col_name,
                fences.lower,
                fences.upper,
                clipped_low,
                clipped_high
            ));

            records.push(ClippingRecord {
                column: col_name.to_string(),
                fences,
                clipped_low,
                clipped_high,
            });
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values_of(df: &DataFrame, col: &str) -> Vec<f64> {
        present_values(&column_values(df, col).unwrap())
    }

    // ==================== compute_fences tests ====================

    #[test]
    fn test_compute_fences_reference_scenario() {
        let fences =
            OutlierHandler::compute_fences(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0], 1.5).unwrap();

        assert_eq!(fences.q1, 2.25);
        assert_eq!(fences.q3, 4.75);
        assert_eq!(fences.iqr, 2.5);
        assert_eq!(fences.lower, -1.5);
        assert_eq!(fences.upper, 8.5);
        assert_eq!(fences.median, 3.5);
    }

    #[test]
    fn test_compute_fences_degenerate_column() {
        let fences = OutlierHandler::compute_fences(&[7.0; 12], 1.5).unwrap();

        assert_eq!(fences.q1, 7.0);
        assert_eq!(fences.q3, 7.0);
        assert_eq!(fences.iqr, 0.0);
        assert_eq!(fences.lower, 7.0);
        assert_eq!(fences.upper, 7.0);
    }

    #[test]
    fn test_compute_fences_order_independent() {
        let a = OutlierHandler::compute_fences(&[100.0, 3.0, 1.0, 5.0, 2.0, 4.0], 1.5);
        let b = OutlierHandler::compute_fences(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0], 1.5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_compute_fences_empty() {
        assert!(OutlierHandler::compute_fences(&[], 1.5).is_none());
    }

    // ==================== clip_values tests ====================

    #[test]
    fn test_clip_values_counts_and_bounds() {
        let fences = OutlierHandler::compute_fences(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0], 1.5).unwrap();
        let mut values = vec![Some(-10.0), Some(2.0), None, Some(100.0), Some(8.5)];

        let (low, high) = OutlierHandler::clip_values(&mut values, &fences);

        assert_eq!((low, high), (1, 1));
        assert_eq!(
            values,
            vec![Some(-1.5), Some(2.0), None, Some(8.5), Some(8.5)]
        );
    }

    #[test]
    fn test_clip_values_collapse_when_iqr_zero() {
        // Heavily tied column: quartiles are both 0, so is the IQR
        let fences =
            OutlierHandler::compute_fences(&[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 3.0, 9.0], 1.5)
                .unwrap();
        assert_eq!(fences.iqr, 0.0);

        let mut values = vec![Some(0.0), Some(3.0), Some(9.0)];
        let (low, high) = OutlierHandler::clip_values(&mut values, &fences);

        assert_eq!((low, high), (0, 2));
        assert_eq!(values, vec![Some(0.0), Some(0.0), Some(0.0)]);
    }

    // ==================== clip_columns tests ====================

    #[test]
    fn test_clip_columns_reference_scenario() {
        let mut df = df![
            "Insulin" => [1.0, 2.0, 3.0, 4.0, 5.0, 100.0],
            "Outcome" => [0.0, 1.0, 0.0, 1.0, 0.0, 100.0],
        ]
        .unwrap();
        let mut steps = vec![];

        let records =
            OutlierHandler::clip_columns(&mut df, &["Insulin"], 1.5, &mut steps).unwrap();

        assert_eq!(df.height(), 6);
        assert_eq!(values_of(&df, "Insulin"), vec![1.0, 2.0, 3.0, 4.0, 5.0, 8.5]);
        // Columns outside the treated set pass through
        assert_eq!(values_of(&df, "Outcome")[5], 100.0);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].clipped_low, 0);
        assert_eq!(records[0].clipped_high, 1);
        assert!(steps[0].contains("Insulin"));
    }

    #[test]
    fn test_clip_columns_custom_multiplier() {
        let mut df = df![
            "Age" => [1.0, 2.0, 3.0, 4.0, 5.0, 100.0],
        ]
        .unwrap();
        let mut steps = vec![];

        // Fences at Q3 + 0 * IQR = 4.75
        OutlierHandler::clip_columns(&mut df, &["Age"], 0.0, &mut steps).unwrap();

        assert_eq!(values_of(&df, "Age"), vec![2.25, 2.25, 3.0, 4.0, 4.75, 4.75]);
    }

    #[test]
    fn test_clip_columns_missing_column_fails_before_mutation() {
        let mut df = df![
            "Pregnancies" => [1.0, 2.0, 3.0, 4.0, 5.0, 100.0],
        ]
        .unwrap();
        let mut steps = vec![];

        let result =
            OutlierHandler::clip_columns(&mut df, &["Pregnancies", "Glucose"], 1.5, &mut steps);

        assert!(matches!(result, Err(ProcessingError::MissingColumn(ref c)) if c == "Glucose"));
        assert_eq!(values_of(&df, "Pregnancies")[5], 100.0);
        assert!(steps.is_empty());
    }

    #[test]
    fn test_ensure_columns_present_reports_first_missing() {
        let df = df![
            "Age" => [1.0],
        ]
        .unwrap();

        let err = OutlierHandler::ensure_columns_present(&df, &["Age", "BMI", "Glucose"])
            .unwrap_err();
        assert!(matches!(err, ProcessingError::MissingColumn(ref c) if c == "BMI"));
    }
}
