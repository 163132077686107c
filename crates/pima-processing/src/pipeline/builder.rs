//! Main cleaning pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! turning a freshly loaded table into the cleaned table every view reads.

use crate::config::{DEFAULT_FENCE_MULTIPLIER, PipelineConfig};
use crate::error::Result;
use crate::imputers::StatisticalImputer;
use crate::loader;
use crate::pipeline::outliers::OutlierHandler;
use crate::pipeline::progress::{CleaningStage, ProgressReporter, ProgressUpdate};
use crate::types::{CleaningOutcome, CleaningReport};
use crate::utils::missing_cell_count;
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// The cleaning pipeline: median imputation of every column, then IQR
/// clipping of the treated columns.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use pima_processing::{Pipeline, PipelineConfig};
///
/// let outcome = Pipeline::builder()
///     .config(PipelineConfig::builder().fence_multiplier(3.0).build()?)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .process(dataframe)?;
///
/// println!("{} values clipped", outcome.report.values_clipped());
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// A pipeline can be built once and shared by every caller
static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// The configuration this pipeline was built with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Clean a table.
    ///
    /// # Errors
    ///
    /// - [`MissingColumn`](crate::ProcessingError::MissingColumn) naming the
    ///   first treated column the table lacks.
    /// - [`EmptyColumn`](crate::ProcessingError::EmptyColumn) naming the
    ///   first column without a single value.
    ///
    /// Both are detected before any value is rewritten.
    pub fn process(&self, df: DataFrame) -> Result<CleaningOutcome> {
        match self.process_internal(df) {
            Ok(outcome) => {
                self.report_progress(ProgressUpdate::complete("Cleaning completed successfully"));
                Ok(outcome)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Load a CSV file and clean it.
    pub fn load_and_process(&self, path: impl AsRef<Path>) -> Result<CleaningOutcome> {
        let path = path.as_ref();
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Loading,
            0.0,
            format!("Loading {}...", path.display()),
        ));

        let df = match loader::load_table(path) {
            Ok(df) => df,
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Failed to load {}: {}", path.display(), e);
                return Err(e);
            }
        };

        self.report_progress(ProgressUpdate::new(
            CleaningStage::Loading,
            1.0,
            format!("Loaded {} rows x {} columns", df.height(), df.width()),
        ));
        self.process(df)
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn process_internal(&self, mut df: DataFrame) -> Result<CleaningOutcome> {
        let start_time = Instant::now();
        info!(
            "Starting cleaning pipeline on {} rows x {} columns",
            df.height(),
            df.width()
        );

        let rows = df.height();
        let columns = df.width();
        let missing_before = missing_cell_count(&df);
        let mut processing_steps: Vec<String> = Vec::new();

        // Step 1: every treated column must exist
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Validation,
            0.0,
            "Checking treated columns...",
        ));
        OutlierHandler::ensure_columns_present(&df, &self.config.treated_columns)?;

        // Step 2: median imputation of every column
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Imputation,
            0.0,
            format!("Imputing {} missing values...", missing_before),
        ));
        info!("Step 1: Imputing missing values with column medians...");
        let imputations = StatisticalImputer::apply_median_imputation(&mut df, &mut processing_steps)?;
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Imputation,
            1.0,
            "Imputation complete",
        ));

        // Step 3: clip treated columns one at a time, in declared order
        info!(
            "Step 2: Clipping outliers in {} columns...",
            self.config.treated_columns.len()
        );
        let total = self.config.treated_columns.len();
        let mut clippings = Vec::with_capacity(total);
        for (i, column) in self.config.treated_columns.iter().enumerate() {
            let records = OutlierHandler::clip_columns(
                &mut df,
                std::slice::from_ref(column),
                self.config.fence_multiplier,
                &mut processing_steps,
            )?;
            clippings.extend(records);

            self.report_progress(ProgressUpdate::column_clipped(column, i + 1, total));
        }

        let report = CleaningReport {
            duration_ms: start_time.elapsed().as_millis() as u64,
            rows,
            columns,
            missing_before,
            imputations,
            clippings,
            processing_steps,
        };

        info!(
            "Cleaning complete in {}ms: {} values imputed, {} values clipped",
            report.duration_ms,
            report.values_imputed(),
            report.values_clipped()
        );

        Ok(CleaningOutcome { data: df, report })
    }
}

/// Clean a table with the default fence multiplier, clipping `columns`.
///
/// The input is left untouched; the cleaned copy is returned.
///
/// # Example
///
/// ```rust,ignore
/// use pima_processing::{clean, TREATED_COLUMNS};
///
/// let cleaned = clean(&df, &TREATED_COLUMNS)?;
/// assert_eq!(cleaned.height(), df.height());
/// ```
pub fn clean<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Result<DataFrame> {
    OutlierHandler::ensure_columns_present(df, columns)?;

    let mut cleaned = df.clone();
    let mut steps = Vec::new();
    StatisticalImputer::apply_median_imputation(&mut cleaned, &mut steps)?;
    OutlierHandler::clip_columns(&mut cleaned, columns, DEFAULT_FENCE_MULTIPLIER, &mut steps)?;
    Ok(cleaned)
}

/// Builder for creating a [`Pipeline`] instance.
///
/// Use [`Pipeline::builder()`] to get started.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use pima_processing::{ProgressReporter, ProgressUpdate};
    /// use std::sync::Arc;
    ///
    /// struct StderrReporter;
    ///
    /// impl ProgressReporter for StderrReporter {
    ///     fn report(&self, update: ProgressUpdate) {
    ///         eprintln!("{}: {}", update.stage.display_name(), update.message);
    ///     }
    /// }
    ///
    /// let pipeline = Pipeline::builder()
    ///     .progress_reporter(Arc::new(StderrReporter))
    ///     .build()?;
    /// ```
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(callback));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, crate::config::ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}
