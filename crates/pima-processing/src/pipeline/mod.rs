//! Pipeline module.
//!
//! This module provides the cleaning pipeline and related components.

mod builder;
pub mod outliers;
pub mod progress;

pub use builder::{Pipeline, PipelineBuilder, clean};
pub use outliers::OutlierHandler;
pub use progress::{CleaningStage, ProgressReporter, ProgressUpdate};
