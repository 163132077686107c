//! Imputation module for handling missing values.
//!
//! Missing numeric cells are filled with the median of their column.

mod statistical;

pub use statistical::StatisticalImputer;
