//! CLI entry point for the Pima Indians Diabetes explorer.

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use pima_processing::{
    ChartType, Explorer, Pipeline, PipelineConfig, ProcessingError, RenderedView,
    ReportGenerator, RunReport, Section, Selection, TableView, export_cleaned,
};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Pima Indians Diabetes Data Exploration",
    long_about = "Loads the Pima Indians Diabetes dataset, imputes missing values with column \
                  medians, clips outliers at the 1.5 x IQR fences and renders one section of \
                  the exploration report.\n\n\
                  EXAMPLES:\n  \
                  # Introduction\n  \
                  pima-explorer -i diabetes.csv\n\n  \
                  # Histogram of glucose levels\n  \
                  pima-explorer -i diabetes.csv --section visualization --chart histogram --column Glucose\n\n  \
                  # Summary statistics as JSON\n  \
                  pima-explorer --section visualization --table summary-statistics --json\n\n  \
                  # Save the cleaning report and the cleaned table\n  \
                  pima-explorer -r outputs --export-cleaned outputs/cleaned.csv"
)]
struct Args {
    /// Path to the CSV file to explore
    #[arg(short, long, default_value = "diabetes.csv")]
    input: String,

    /// Report section to render
    #[arg(short, long, value_enum, default_value = "introduction")]
    section: Section,

    /// Chart to render in the visualization section
    #[arg(long, value_enum, default_value = "tables")]
    chart: ChartType,

    /// Table to render when the chart is `tables`
    #[arg(long, value_enum, default_value = "head")]
    table: TableView,

    /// Column for histograms and box plots (defaults to the first column)
    #[arg(long)]
    column: Option<String>,

    /// JSON file with pipeline and view settings
    ///
    /// Fields left out keep their defaults. Flags below override the file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Multiplier applied to the IQR to place the clipping fences
    #[arg(long)]
    fence_multiplier: Option<f64>,

    /// Number of rows in the head preview
    #[arg(long)]
    head_rows: Option<usize>,

    /// Fixed number of histogram bins, at most 10000 (automatic when omitted)
    #[arg(long)]
    bins: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output and the cleaning summary
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of text
    ///
    /// Disables all progress logs; only outputs the cleaning report and
    /// the rendered view.
    #[arg(long)]
    json: bool,

    /// Write the cleaning report as JSON into this directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long, value_name = "DIR")]
    emit_report: Option<PathBuf>,

    /// Write the cleaned table as CSV to this path
    #[arg(long, value_name = "PATH")]
    export_cleaned: Option<PathBuf>,
}

/// JSON written to stdout with `--json`.
#[derive(Serialize)]
struct JsonOutput<'a> {
    report: &'a RunReport,
    view: &'a RenderedView,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging (disabled if --json is set)
    init_logging(&args.log_level, args.quiet, args.json);

    // Load environment variables from .env file
    dotenv().ok();

    match run(&args) {
        Ok(()) => Ok(()),
        Err(e) if args.json => {
            let payload = match e.downcast_ref::<ProcessingError>() {
                Some(err) => json!({ "error": err }),
                None => json!({ "error": { "code": "ERROR", "message": format!("{:#}", e) } }),
            };
            println!("{}", serde_json::to_string_pretty(&payload)?);
            std::process::exit(1);
        }
        Err(e) => Err(e),
    }
}

fn run(args: &Args) -> Result<()> {
    let config = build_config(args)?;

    let pipeline = Pipeline::builder()
        .config(config.clone())
        .on_progress(|update| {
            debug!(
                "[{:>3.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        })
        .build()?;

    info!("Loading dataset from: {}", args.input);
    let outcome = pipeline
        .load_and_process(&args.input)
        .with_context(|| format!("Failed to prepare {}", args.input))?;

    let output_file = match &args.export_cleaned {
        Some(path) => Some(export_cleaned(&outcome.data, path)?.display().to_string()),
        None => None,
    };

    let report = ReportGenerator::build_report(
        &args.input,
        output_file.as_deref(),
        &outcome.report,
        &config,
    );

    if let Some(dir) = &args.emit_report {
        let path = ReportGenerator::new(dir).write_report_to_file(&report, &extract_file_stem(&args.input))?;
        if !args.json && !args.quiet {
            println!("Report written to {}", path.display());
        }
    }

    let explorer = Explorer::new(outcome.data, config);
    let selection = Selection {
        section: args.section,
        chart: args.chart,
        table: args.table,
        column: args.column.clone(),
    };
    let view = explorer.render_selection(&selection)?;

    if args.json {
        let output = JsonOutput {
            report: &report,
            view: &view,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        if !args.quiet {
            print_cleaning_summary(&report);
        }
        println!("{}", view);
    }

    Ok(())
}

/// Start from the config file (if any) and apply flag overrides.
fn build_config(args: &Args) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Could not read config file {}", path.display()))?;
            PipelineConfig::from_json(&content)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        }
        None => PipelineConfig::default(),
    };

    if let Some(multiplier) = args.fence_multiplier {
        config.fence_multiplier = multiplier;
    }
    if let Some(rows) = args.head_rows {
        config.head_rows = rows;
    }
    if args.bins.is_some() {
        config.histogram_bins = args.bins;
    }

    config.validate()?;
    Ok(config)
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset")
        .to_string()
}

/// Print a human-readable summary of the cleaning run.
///
/// This is the default output when neither `--json` nor `--quiet` are specified.
fn print_cleaning_summary(report: &RunReport) {
    let summary = &report.summary;

    println!();
    println!("{}", "=".repeat(80));
    println!("DATA PREPARED");
    println!("{}", "=".repeat(80));
    println!(
        "Input:  {} ({} rows x {} columns)",
        report.input_file, summary.rows, summary.columns
    );
    if let Some(ref output_file) = report.output_file {
        println!("Output: {}", output_file);
    }
    println!("  Duration: {}ms", summary.duration_ms);
    println!(
        "  Missing values: {} found, {} imputed",
        summary.missing_before, summary.values_imputed
    );
    println!(
        "  Outliers: {} values clipped across {} columns",
        summary.values_clipped,
        report.clippings.len()
    );
    for clipping in report.clippings.iter().filter(|c| c.total_clipped() > 0) {
        println!(
            "  - {}: {} low, {} high (fences {:.3} / {:.3})",
            clipping.column,
            clipping.clipped_low,
            clipping.clipped_high,
            clipping.fences.lower,
            clipping.fences.upper
        );
    }
    println!("{}", "=".repeat(80));
    println!();
}
