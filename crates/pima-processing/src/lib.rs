//! Pima Indians Diabetes exploration library
//!
//! Loads the Pima Indians Diabetes table, cleans it once, and computes the
//! read-only views of an exploration report over the cleaned table.
//!
//! # Overview
//!
//! - **Loading**: CSV into a polars `DataFrame` of `Float64` columns, with
//!   empty or unparseable cells kept as missing values
//! - **Cleaning**: median imputation of every column, then clipping of the
//!   treated columns at Tukey fences from linear-interpolation quartiles
//! - **Exploring**: head preview, summary statistics, histograms with a
//!   density estimate, box plots, a correlation matrix and fixed commentary
//! - **Reporting**: the record of a cleaning run as JSON, the cleaned table
//!   as CSV
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use pima_processing::{Explorer, Pipeline, PipelineConfig, load_table};
//! use pima_processing::explorer::View;
//!
//! let config = PipelineConfig::default();
//! let outcome = Pipeline::builder()
//!     .config(config.clone())
//!     .build()?
//!     .process(load_table("diabetes.csv")?)?;
//!
//! println!("{} values clipped", outcome.report.values_clipped());
//!
//! let explorer = Explorer::new(outcome.data, config);
//! println!("{}", explorer.render(&View::Histogram("Glucose".to_string()))?);
//! ```
//!
//! # Configuration
//!
//! Use [`PipelineConfig`] to change the fences or the views:
//!
//! ```rust,ignore
//! use pima_processing::config::*;
//!
//! let config = PipelineConfig::builder()
//!     .treated_columns(["Glucose", "Insulin"])
//!     .fence_multiplier(3.0)
//!     .head_rows(5)
//!     .histogram_bins(20)
//!     .build()?;
//! ```
//!
//! For a one-off cleaning without a pipeline, [`clean`] takes a borrowed
//! table and the columns to clip and returns the cleaned copy.

pub mod config;
pub mod error;
pub mod explorer;
pub mod imputers;
pub mod loader;
pub mod pipeline;
pub mod reporting;
pub mod stats;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{
    ConfigValidationError, DEFAULT_FENCE_MULTIPLIER, MAX_DENSITY_POINTS, MAX_HISTOGRAM_BINS,
    PipelineConfig, PipelineConfigBuilder, TREATED_COLUMNS,
};
pub use error::{ProcessingError, Result as ProcessingResult, ResultExt};
pub use explorer::{ChartType, Explorer, RenderedView, Section, Selection, TableView, View};
pub use imputers::StatisticalImputer;
pub use loader::{load_table, parse_table};
pub use pipeline::{
    CleaningStage, OutlierHandler, Pipeline, PipelineBuilder, ProgressReporter, ProgressUpdate,
    clean,
};
pub use reporting::{ReportGenerator, RunReport, RunSummary, export_cleaned};
pub use types::{CleaningOutcome, CleaningReport, ClippingRecord, ColumnFences, ImputationRecord};
