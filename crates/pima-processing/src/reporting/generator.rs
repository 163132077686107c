use crate::config::PipelineConfig;
use crate::error::Result;
use crate::types::{CleaningReport, ClippingRecord, ImputationRecord};
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// Run Report Types
// ============================================================================

/// Everything one cleaning run did, as written by `--emit-report` and
/// printed by `--json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    // Metadata
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Path to the exported cleaned table (if written)
    pub output_file: Option<String>,

    /// Settings the pipeline ran with
    pub config: PipelineConfig,

    /// Headline numbers of the run
    pub summary: RunSummary,

    /// Median imputation per column, in table order
    pub imputations: Vec<ImputationRecord>,
    /// Fences and clip counts per treated column, in processing order
    pub clippings: Vec<ClippingRecord>,
    /// List of processing steps executed
    pub processing_steps: Vec<String>,
}

/// Headline numbers of a cleaning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Total execution time in milliseconds
    pub duration_ms: u64,
    /// Number of rows (unchanged by cleaning)
    pub rows: usize,
    /// Number of columns
    pub columns: usize,
    /// Missing cells found in the source
    pub missing_before: usize,
    /// Cells filled with a column median
    pub values_imputed: usize,
    /// Cells moved onto a fence
    pub values_clipped: usize,
}

// ============================================================================
// Report Generator
// ============================================================================

/// Writes run reports and cleaned tables to disk.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
        }
    }
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Assemble the report of one run.
    pub fn build_report(
        input_file: &str,
        output_file: Option<&str>,
        cleaning: &CleaningReport,
        config: &PipelineConfig,
    ) -> RunReport {
        RunReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            output_file: output_file.map(str::to_string),
            config: config.clone(),
            summary: RunSummary {
                duration_ms: cleaning.duration_ms,
                rows: cleaning.rows,
                columns: cleaning.columns,
                missing_before: cleaning.missing_before,
                values_imputed: cleaning.values_imputed(),
                values_clipped: cleaning.values_clipped(),
            },
            imputations: cleaning.imputations.clone(),
            clippings: cleaning.clippings.clone(),
            processing_steps: cleaning.processing_steps.clone(),
        }
    }

    /// Write `report` as pretty JSON to `<output_dir>/<base_name>_report.json`.
    ///
    /// The output directory is created if needed.
    pub fn write_report_to_file(&self, report: &RunReport, report_base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}

/// Write the cleaned table to `path` as CSV with a header row.
///
/// Parent directories are created if needed.
pub fn export_cleaned(df: &DataFrame, path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut df = df.clone();
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut df)?;

    info!("Cleaned dataset saved: {}", path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_table;
    use crate::types::ColumnFences;
    use crate::utils::column_values;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pima-processing-{}-{}", name, std::process::id()))
    }

    fn sample_cleaning_report() -> CleaningReport {
        CleaningReport {
            duration_ms: 3,
            rows: 6,
            columns: 2,
            missing_before: 1,
            imputations: vec![ImputationRecord {
                column: "Insulin".to_string(),
                median: 3.0,
                values_filled: 1,
            }],
            clippings: vec![ClippingRecord {
                column: "Insulin".to_string(),
                fences: ColumnFences {
                    median: 3.5,
                    q1: 2.25,
                    q3: 4.75,
                    iqr: 2.5,
                    lower: -1.5,
                    upper: 8.5,
                },
                clipped_low: 0,
                clipped_high: 1,
            }],
            processing_steps: vec!["Clipped 1 outliers in 'Insulin'".to_string()],
        }
    }

    #[test]
    fn test_build_report_summary() {
        let report = ReportGenerator::build_report(
            "diabetes.csv",
            Some("cleaned.csv"),
            &sample_cleaning_report(),
            &PipelineConfig::default(),
        );

        assert_eq!(report.input_file, "diabetes.csv");
        assert_eq!(report.output_file.as_deref(), Some("cleaned.csv"));
        assert_eq!(report.summary.values_imputed, 1);
        assert_eq!(report.summary.values_clipped, 1);
        assert_eq!(report.clippings[0].fences.upper, 8.5);
        assert_eq!(report.generated_at.len(), "2024-01-01 00:00:00".len());
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = scratch_dir("report");
        let generator = ReportGenerator::new(&dir);
        let report = ReportGenerator::build_report(
            "diabetes.csv",
            None,
            &sample_cleaning_report(),
            &PipelineConfig::default(),
        );

        let path = generator.write_report_to_file(&report, "diabetes").unwrap();
        assert_eq!(path, dir.join("diabetes_report.json"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["summary"]["values_clipped"], 1);
        assert_eq!(json["clippings"][0]["column"], "Insulin");
        assert_eq!(json["config"]["fence_multiplier"], 1.5);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_export_cleaned_round_trips_through_loader() {
        let dir = scratch_dir("export");
        let df = df![
            "Glucose" => [148.0, 85.0],
            "BMI" => [33.6, 26.6],
        ]
        .unwrap();

        let path = export_cleaned(&df, dir.join("nested").join("cleaned.csv")).unwrap();
        let reloaded = parse_table(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(
            column_values(&reloaded, "BMI").unwrap(),
            vec![Some(33.6), Some(26.6)]
        );

        fs::remove_dir_all(&dir).unwrap();
    }
}
