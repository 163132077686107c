//! Report generation module.
//!
//! This module writes the record of a cleaning run and the cleaned table
//! itself to disk.
//!
//! A [`RunReport`] serves both as the JSON printed with `--json` and as
//! the file written with `--emit-report`.
//!
//! # Example
//!
//! ```rust,ignore
//! use pima_processing::reporting::{ReportGenerator, export_cleaned};
//!
//! let report = ReportGenerator::build_report(
//!     "diabetes.csv",
//!     Some("output/cleaned.csv"),
//!     &outcome.report,
//!     pipeline.config(),
//! );
//!
//! let generator = ReportGenerator::new("output");
//! generator.write_report_to_file(&report, "diabetes")?;
//! export_cleaned(&outcome.data, "output/cleaned.csv")?;
//! ```

mod generator;

pub use generator::{ReportGenerator, RunReport, RunSummary, export_cleaned};
