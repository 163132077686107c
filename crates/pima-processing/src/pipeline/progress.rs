//! Progress reporting for the cleaning pipeline.
//!
//! A run is one bounded pass over the table, so updates are informational
//! and there is no way to stop a run halfway.
//!
//! Any `Fn(ProgressUpdate) + Send + Sync` closure is a [`ProgressReporter`]:
//!
//! ```rust,ignore
//! use pima_processing::Pipeline;
//!
//! let outcome = Pipeline::builder()
//!     .on_progress(|update| eprintln!("{:>3.0}% {}", update.progress * 100.0, update.message))
//!     .build()?
//!     .process(df)?;
//! ```

use serde::{Deserialize, Serialize};

/// Where a cleaning run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStage {
    Loading,
    Validation,
    Imputation,
    OutlierClipping,
    Complete,
    Failed,
}

impl CleaningStage {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Data",
            Self::Validation => "Validating Columns",
            Self::Imputation => "Imputing Values",
            Self::OutlierClipping => "Clipping Outliers",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Share of the whole run spent in this stage. The four working
    /// stages sum to 1.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Loading => 0.20,
            Self::Validation => 0.05,
            Self::Imputation => 0.35,
            Self::OutlierClipping => 0.40,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Overall progress when this stage starts.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Loading | Self::Failed => 0.0,
            Self::Validation => 0.20,
            Self::Imputation => 0.25,
            Self::OutlierClipping => 0.60,
            Self::Complete => 1.0,
        }
    }
}

/// One progress event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: CleaningStage,

    /// Overall progress in `[0, 1]`.
    pub progress: f32,

    pub message: String,

    /// Column just clipped, for [`CleaningStage::OutlierClipping`] updates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,

    /// Columns clipped so far and columns to clip in total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns_done: Option<(usize, usize)>,
}

impl ProgressUpdate {
    /// An update `fraction` of the way through `stage`.
    pub fn new(stage: CleaningStage, fraction: f32, message: impl Into<String>) -> Self {
        let fraction = fraction.clamp(0.0, 1.0);
        Self {
            stage,
            progress: (stage.base_progress() + stage.weight() * fraction).clamp(0.0, 1.0),
            message: message.into(),
            column: None,
            columns_done: None,
        }
    }

    /// The update sent after clipping the `done`-th of `total` columns.
    pub fn column_clipped(column: &str, done: usize, total: usize) -> Self {
        let fraction = if total == 0 {
            1.0
        } else {
            done as f32 / total as f32
        };
        Self {
            column: Some(column.to_string()),
            columns_done: Some((done, total)),
            ..Self::new(
                CleaningStage::OutlierClipping,
                fraction,
                format!("Clipped column {}", column),
            )
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self::new(CleaningStage::Complete, 1.0, message)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(CleaningStage::Failed, 0.0, message)
    }
}

/// Receiver of [`ProgressUpdate`]s.
///
/// `Send + Sync` so a pipeline holding one can be shared across threads.
pub trait ProgressReporter: Send + Sync {
    /// Called at each stage boundary and once per clipped column.
    fn report(&self, update: ProgressUpdate);
}

impl<F> ProgressReporter for F
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        self(update)
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_update_progress_within_stage() {
        let update = ProgressUpdate::new(CleaningStage::Imputation, 0.5, "Imputing");
        assert_eq!(update.stage, CleaningStage::Imputation);
        assert!((update.progress - 0.425).abs() < 1e-6);
        assert!(update.column.is_none());

        let overshoot = ProgressUpdate::new(CleaningStage::OutlierClipping, 3.0, "");
        assert_eq!(overshoot.progress, 1.0);
    }

    #[test]
    fn test_column_clipped_update() {
        let update = ProgressUpdate::column_clipped("Age", 4, 8);

        assert_eq!(update.stage, CleaningStage::OutlierClipping);
        assert_eq!(update.column.as_deref(), Some("Age"));
        assert_eq!(update.columns_done, Some((4, 8)));
        assert!((update.progress - 0.8).abs() < 1e-6);
        assert_eq!(update.message, "Clipped column Age");
    }

    #[test]
    fn test_terminal_updates() {
        let done = ProgressUpdate::complete("Done");
        assert_eq!(done.stage, CleaningStage::Complete);
        assert_eq!(done.progress, 1.0);

        let failed = ProgressUpdate::failed("Column 'Glucose' is missing");
        assert_eq!(failed.stage, CleaningStage::Failed);
        assert_eq!(failed.progress, 0.0);
        assert_eq!(failed.message, "Column 'Glucose' is missing");
    }

    #[test]
    fn test_closures_are_reporters() {
        let seen = Mutex::new(Vec::new());
        let reporter = |update: ProgressUpdate| seen.lock().unwrap().push(update.stage);

        reporter.report(ProgressUpdate::new(CleaningStage::Loading, 0.0, "Loading"));
        reporter.report(ProgressUpdate::complete("Done"));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![CleaningStage::Loading, CleaningStage::Complete]
        );
    }

    #[test]
    fn test_stages_are_contiguous() {
        let stages = [
            CleaningStage::Loading,
            CleaningStage::Validation,
            CleaningStage::Imputation,
            CleaningStage::OutlierClipping,
        ];

        let total: f32 = stages.iter().map(|s| s.weight()).sum();
        assert!((total - 1.0).abs() < 1e-6);

        for pair in stages.windows(2) {
            let end_of_previous = pair[0].base_progress() + pair[0].weight();
            assert!((pair[1].base_progress() - end_of_previous).abs() < 1e-6);
        }
    }

    #[test]
    fn test_stage_names_in_json() {
        assert_eq!(
            serde_json::to_string(&CleaningStage::OutlierClipping).unwrap(),
            "\"outlier_clipping\""
        );

        let json = serde_json::to_value(ProgressUpdate::complete("Done")).unwrap();
        assert_eq!(json["stage"], "complete");
        assert!(json.get("column").is_none());
    }
}
