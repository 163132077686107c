//! CSV loading.
//!
//! The source is read as text, checked for structural problems the CSV
//! reader would otherwise paper over (ragged rows), then handed to the
//! polars CSV reader with every column read as a string. Each cell is then
//! parsed on its own so an empty or unparseable cell becomes a missing
//! value instead of failing the whole column.

use crate::error::{ProcessingError, Result, ResultExt};
use crate::utils::{column_names, parse_numeric_cell, replace_column};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Load a CSV file into a table whose columns are all `Float64`.
///
/// # Errors
///
/// - [`ProcessingError::SourceNotFound`] if the file cannot be read.
/// - [`ProcessingError::MalformedSource`] if the content is structurally
///   invalid (see [`parse_table`]).
pub fn load_table(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ProcessingError::SourceNotFound {
        path: path.display().to_string(),
        source,
    })?;

    let df = parse_table(&content)?;
    info!(
        "Loaded {}: {} rows x {} columns",
        path.display(),
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Parse CSV text into a table whose columns are all `Float64`.
///
/// The first non-blank line is the header. Blank lines are skipped.
///
/// # Errors
///
/// [`ProcessingError::MalformedSource`] when there is no header, when a
/// row has a different number of fields than the header (naming the
/// 1-based line), or when the CSV reader rejects the content.
pub fn parse_table(content: &str) -> Result<DataFrame> {
    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
        .collect();

    let Some(&(_, header)) = lines.first() else {
        return Err(ProcessingError::MalformedSource(
            "source is empty: no header row".to_string(),
        ));
    };

    let expected = count_fields(header);
    for &(line_no, line) in &lines[1..] {
        let found = count_fields(line);
        if found != expected {
            return Err(ProcessingError::MalformedSource(format!(
                "line {}: expected {} fields, found {}",
                line_no, expected, found
            )));
        }
    }

    let cleaned = lines
        .iter()
        .map(|(_, line)| *line)
        .collect::<Vec<_>>()
        .join("\n");

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(cleaned))
        .finish()
        .map_err(|e| ProcessingError::MalformedSource(e.to_string()))?;

    for name in column_names(&df) {
        let values = text_column_values(&df, &name)?;
        replace_column(&mut df, &name, values)?;
    }

    debug!("Parsed {} data rows, {} columns", df.height(), df.width());
    Ok(df)
}

/// Parse every cell of a text column as a number.
fn text_column_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df.column(name)?;
    let text = column
        .as_materialized_series()
        .cast(&DataType::String)
        .context(format!("Reading column '{}' as text", name))?;
    let values = text
        .str()?
        .into_iter()
        .map(|cell| cell.and_then(parse_numeric_cell))
        .collect();
    Ok(values)
}

/// Number of comma-separated fields in one line, ignoring commas inside
/// double-quoted fields.
fn count_fields(line: &str) -> usize {
    let mut in_quotes = false;
    let mut fields = 1;
    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields += 1,
            _ => {}
        }
    }
    fields
}
