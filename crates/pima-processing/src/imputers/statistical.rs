//! Median imputation for numeric columns.

use crate::error::{ProcessingError, Result};
use crate::stats;
use crate::types::ImputationRecord;
use crate::utils::{column_names, column_values, present_values, replace_column};
use polars::prelude::*;
use tracing::debug;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Compute the median of every column, in table order.
    ///
    /// Fails with [`ProcessingError::EmptyColumn`] on the first column that
    /// has no present value.
    pub fn column_medians(df: &DataFrame) -> Result<Vec<(String, f64)>> {
        column_names(df)
            .into_iter()
            .map(|name| {
                let values = present_values(&column_values(df, &name)?);
                match stats::median(&values) {
                    Some(median) => Ok((name, median)),
                    None => Err(ProcessingError::EmptyColumn(name)),
                }
            })
            .collect()
    }

    /// Replace every missing value of every column with that column's median.
    ///
    /// All medians are computed before the first column is rewritten, so a
    /// failure leaves `df` untouched. Every column is stored as `Float64`
    /// afterwards.
    pub fn apply_median_imputation(
        df: &mut DataFrame,
        processing_steps: &mut Vec<String>,
    ) -> Result<Vec<ImputationRecord>> {
        let medians = Self::column_medians(df)?;

        let mut records = Vec::with_capacity(medians.len());
        for (col_name, median) in medians {
            let filled = Self::fill_with_value(df, &col_name, median, processing_steps, "median")?;
            records.push(ImputationRecord {
                column: col_name,
                median,
                values_filled: filled,
            });
        }

        Ok(records)
    }

    /// Fill the missing cells of one column with `fill_value`.
    ///
    /// Returns the number of cells filled.
    fn fill_with_value(
        df: &mut DataFrame,
        col_name: &str,
        fill_value: f64,
        processing_steps: &mut Vec<String>,
        method: &str,
    ) -> Result<usize> {
        let values = column_values(df, col_name)?;
        let filled = values.iter().filter(|v| v.is_none()).count();

        let result_vec = values
            .into_iter()
            .map(|v| Some(v.unwrap_or(fill_value)))
            .collect();
        replace_column(df, col_name, result_vec)?;

        if filled > 0 {
            processing_steps.push(format!(
                "Filled {} missing values in '{}' with {}: {:.2}",
                filled, col_name, method, fill_value
            ));
            debug!("Filled {} values in {} with {} {}", filled, col_name, method, fill_value);
        }

        Ok(filled)
    }
}
