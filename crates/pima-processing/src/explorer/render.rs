//! Plain-text rendering of views for the terminal.

use super::views::{BoxPlot, ColumnSummary, CorrelationMatrix, HeadTable, Histogram, SummaryTable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Widest histogram bar, in characters.
const BAR_WIDTH: usize = 50;

/// Content of a rendered view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ViewBody {
    Text(String),
    Head(HeadTable),
    Summary(SummaryTable),
    Histogram(Histogram),
    BoxPlot(BoxPlot),
    Correlation(CorrelationMatrix),
}

/// A view ready to be shown: a title, its content and optional commentary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedView {
    pub title: String,
    pub body: ViewBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

impl fmt::Display for RenderedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;
        writeln!(f)?;
        write!(f, "{}", self.body)?;

        if let Some(analysis) = &self.analysis {
            writeln!(f)?;
            writeln!(f, "Analysis")?;
            writeln!(f, "--------")?;
            writeln!(f, "{}", analysis)?;
        }
        Ok(())
    }
}

impl fmt::Display for ViewBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => writeln!(f, "{}", text),
            Self::Head(table) => write!(f, "{}", table),
            Self::Summary(table) => write!(f, "{}", table),
            Self::Histogram(histogram) => write!(f, "{}", histogram),
            Self::BoxPlot(plot) => write!(f, "{}", plot),
            Self::Correlation(matrix) => write!(f, "{}", matrix),
        }
    }
}

impl fmt::Display for HeadTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut header = vec![String::new()];
        header.extend(self.columns.iter().cloned());

        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mut cells = vec![i.to_string()];
                cells.extend(row.iter().map(|v| format_cell(*v)));
                cells
            })
            .collect();

        write_table(f, &header, &rows)
    }
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut header = vec![String::new()];
        header.extend(self.columns.iter().map(|c| c.column.clone()));

        let stat_rows: [(&str, fn(&ColumnSummary) -> String); 8] = [
            ("count", |c| format_number(c.count as f64)),
            ("mean", |c| format_cell(c.mean)),
            ("std", |c| format_cell(c.std)),
            ("min", |c| format_cell(c.min)),
            ("25%", |c| format_cell(c.q25)),
            ("50%", |c| format_cell(c.q50)),
            ("75%", |c| format_cell(c.q75)),
            ("max", |c| format_cell(c.max)),
        ];

        let rows: Vec<Vec<String>> = stat_rows
            .iter()
            .map(|(label, cell)| {
                let mut row = vec![label.to_string()];
                row.extend(self.columns.iter().map(cell));
                row
            })
            .collect();

        write_table(f, &header, &rows)
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let max_count = self.bins.iter().map(|b| b.count).max().unwrap_or(0);
        let labels: Vec<String> = self
            .bins
            .iter()
            .enumerate()
            .map(|(i, bin)| {
                let close = if i + 1 == self.bins.len() { ']' } else { ')' };
                format!(
                    "[{}, {}{}",
                    format_number(bin.lower),
                    format_number(bin.upper),
                    close
                )
            })
            .collect();
        let label_width = labels.iter().map(|l| l.len()).max().unwrap_or(0);

        for (label, bin) in labels.iter().zip(&self.bins) {
            let bar_len = if max_count > 0 {
                (bin.count * BAR_WIDTH).div_ceil(max_count)
            } else {
                0
            };
            writeln!(
                f,
                "{:>width$} | {:<bar$} {}",
                label,
                "#".repeat(bar_len),
                bin.count,
                width = label_width,
                bar = BAR_WIDTH
            )?;
        }

        if let Some(peak) = self
            .density
            .iter()
            .max_by(|a, b| a.density.total_cmp(&b.density))
        {
            writeln!(f)?;
            writeln!(
                f,
                "Density estimate over {} points, peak {} at {}",
                self.density.len(),
                format_number(peak.density),
                format_number(peak.x)
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for BoxPlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = vec![
            vec!["min".to_string(), format_number(self.min)],
            vec!["lower whisker".to_string(), format_number(self.lower_whisker)],
            vec!["Q1".to_string(), format_number(self.q1)],
            vec!["median".to_string(), format_number(self.median)],
            vec!["Q3".to_string(), format_number(self.q3)],
            vec!["upper whisker".to_string(), format_number(self.upper_whisker)],
            vec!["max".to_string(), format_number(self.max)],
        ];
        write_table(f, &[String::new(), self.column.clone()], &rows)?;

        writeln!(f)?;
        if self.outliers.is_empty() {
            writeln!(f, "Outliers: none")
        } else {
            let shown: Vec<String> = self.outliers.iter().map(|v| format_number(*v)).collect();
            writeln!(f, "Outliers ({}): {}", shown.len(), shown.join(", "))
        }
    }
}

impl fmt::Display for CorrelationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut header = vec![String::new()];
        header.extend(self.columns.iter().cloned());

        let rows: Vec<Vec<String>> = self
            .columns
            .iter()
            .zip(&self.values)
            .map(|(name, row)| {
                let mut cells = vec![name.clone()];
                cells.extend(row.iter().map(|r| match r {
                    Some(r) => format!("{:.2}", r),
                    None => "NaN".to_string(),
                }));
                cells
            })
            .collect();

        write_table(f, &header, &rows)
    }
}

/// Format a number compactly: integers without decimals, others rounded
/// to six decimal places with trailing zeros dropped.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        let text = format!("{:.6}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn format_cell(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_else(|| "NaN".to_string())
}

/// Write rows under a header, first column left-aligned, others right-aligned.
fn write_table(f: &mut fmt::Formatter<'_>, header: &[String], rows: &[Vec<String>]) -> fmt::Result {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let write_row = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, width))| {
                if i == 0 {
                    format!("{:<width$}", cell, width = width)
                } else {
                    format!("{:>width$}", cell, width = width)
                }
            })
            .collect();
        writeln!(f, "{}", line.join("  ").trim_end())
    };

    write_row(f, header)?;
    for row in rows {
        write_row(f, row)?;
    }
    Ok(())
}
