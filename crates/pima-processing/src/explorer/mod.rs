//! Views over the cleaned table.
//!
//! An [`Explorer`] owns the cleaned table and turns a [`View`] into a
//! [`RenderedView`]. Nothing here mutates the table, so one explorer can
//! serve any number of renders.
//!
//! # Example
//!
//! ```rust,ignore
//! use pima_processing::explorer::{ChartType, Explorer, Section, Selection};
//!
//! let explorer = Explorer::new(outcome.data, config);
//! let view = explorer.resolve(&Selection {
//!     section: Section::Visualization,
//!     chart: ChartType::Histogram,
//!     column: Some("Glucose".to_string()),
//!     ..Selection::default()
//! })?;
//! println!("{}", explorer.render(&view)?);
//! ```

pub mod narrative;
pub mod render;
pub mod views;

pub use render::{RenderedView, ViewBody};
pub use views::{
    BoxPlot, ColumnSummary, CorrelationMatrix, DensityPoint, HeadTable, Histogram, HistogramBin,
    SummaryTable,
};

use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::utils::{column_names, column_values, present_values};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Top-level section of the report.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    #[default]
    Introduction,
    Visualization,
    Conclusion,
}

/// Chart shown in the visualization section.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    #[default]
    Tables,
    Histogram,
    BoxPlot,
    CorrelationHeatmap,
}

/// Table shown for [`ChartType::Tables`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum TableView {
    #[default]
    Head,
    SummaryStatistics,
}

/// What the user picked. Fields that do not apply to the chosen section
/// or chart are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub section: Section,
    pub chart: ChartType,
    pub table: TableView,
    /// Column for histograms and box plots; the first column when `None`.
    pub column: Option<String>,
}

/// A fully resolved view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", content = "column", rename_all = "snake_case")]
pub enum View {
    Introduction,
    Conclusion,
    Head,
    SummaryStatistics,
    Histogram(String),
    BoxPlot(String),
    CorrelationHeatmap,
}

/// Read-only access to the cleaned table.
pub struct Explorer {
    data: DataFrame,
    config: PipelineConfig,
}

static_assertions::assert_impl_all!(Explorer: Send, Sync);

impl Explorer {
    /// Wrap a cleaned table. `config` supplies the view settings
    /// (head rows, histogram bins, density grid).
    pub fn new(data: DataFrame, config: PipelineConfig) -> Self {
        Self { data, config }
    }

    /// The cleaned table.
    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Column names, in table order.
    pub fn columns(&self) -> Vec<String> {
        column_names(&self.data)
    }

    /// Turn a selection into a concrete view.
    ///
    /// Fails with [`ProcessingError::ColumnNotFound`] when the selected
    /// column does not exist, or when the table has no columns to default to.
    pub fn resolve(&self, selection: &Selection) -> Result<View> {
        let view = match selection.section {
            Section::Introduction => View::Introduction,
            Section::Conclusion => View::Conclusion,
            Section::Visualization => match selection.chart {
                ChartType::Tables => match selection.table {
                    TableView::Head => View::Head,
                    TableView::SummaryStatistics => View::SummaryStatistics,
                },
                ChartType::Histogram => View::Histogram(self.pick_column(&selection.column)?),
                ChartType::BoxPlot => View::BoxPlot(self.pick_column(&selection.column)?),
                ChartType::CorrelationHeatmap => View::CorrelationHeatmap,
            },
        };
        Ok(view)
    }

    /// Compute and render one view.
    pub fn render(&self, view: &View) -> Result<RenderedView> {
        debug!("Rendering {:?}", view);

        let rendered = match view {
            View::Introduction => RenderedView {
                title: narrative::INTRODUCTION_TITLE.to_string(),
                body: ViewBody::Text(narrative::INTRODUCTION.to_string()),
                analysis: None,
            },
            View::Conclusion => RenderedView {
                title: narrative::CONCLUSION_TITLE.to_string(),
                body: ViewBody::Text(narrative::CONCLUSION.to_string()),
                analysis: None,
            },
            View::Head => RenderedView {
                title: format!("First {} Rows of Data", self.config.head_rows),
                body: ViewBody::Head(views::head(&self.data, self.config.head_rows)?),
                analysis: None,
            },
            View::SummaryStatistics => RenderedView {
                title: "Summary Statistics".to_string(),
                body: ViewBody::Summary(views::describe(&self.data)?),
                analysis: None,
            },
            View::Histogram(column) => {
                let values = self.present(column)?;
                let histogram = Histogram::new(
                    column.as_str(),
                    &values,
                    self.config.histogram_bins,
                    self.config.density_points,
                )
                .ok_or_else(|| ProcessingError::EmptyColumn(column.clone()))?;

                RenderedView {
                    title: format!("Histogram for {}", column),
                    body: ViewBody::Histogram(histogram),
                    analysis: narrative::histogram_analysis(column).map(str::to_string),
                }
            }
            View::BoxPlot(column) => {
                let values = self.present(column)?;
                let plot = BoxPlot::new(column.as_str(), &values)
                    .ok_or_else(|| ProcessingError::EmptyColumn(column.clone()))?;

                RenderedView {
                    title: format!("Box Plot for {}", column),
                    body: ViewBody::BoxPlot(plot),
                    analysis: Some(narrative::box_plot_analysis(column)),
                }
            }
            View::CorrelationHeatmap => RenderedView {
                title: "Correlation Heatmap".to_string(),
                body: ViewBody::Correlation(views::correlation_matrix(&self.data)?),
                analysis: Some(narrative::HEATMAP_ANALYSIS.to_string()),
            },
        };

        Ok(rendered)
    }

    /// Resolve and render in one step.
    pub fn render_selection(&self, selection: &Selection) -> Result<RenderedView> {
        let view = self.resolve(selection)?;
        self.render(&view)
    }

    fn pick_column(&self, column: &Option<String>) -> Result<String> {
        match column {
            Some(name) if self.data.column(name).is_ok() => Ok(name.clone()),
            Some(name) => Err(ProcessingError::ColumnNotFound(name.clone())),
            None => self
                .columns()
                .into_iter()
                .next()
                .ok_or_else(|| ProcessingError::ColumnNotFound(String::new())),
        }
    }

    fn present(&self, column: &str) -> Result<Vec<f64>> {
        Ok(present_values(&column_values(&self.data, column)?))
    }
}
