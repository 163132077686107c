//! Read-only computations behind each view.
//!
//! Every function here takes the cleaned table (or the present values of
//! one of its columns) and returns plain data; rendering lives in
//! [`super::render`].

use crate::config::MAX_HISTOGRAM_BINS;
use crate::error::Result;
use crate::stats;
use crate::utils::{column_names, column_values, present_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

// =============================================================================
// Tables
// =============================================================================

/// The first rows of the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<f64>>>,
}

/// Take the first `n` rows of `df`.
pub fn head(df: &DataFrame, n: usize) -> Result<HeadTable> {
    let preview = df.head(Some(n));
    let columns = column_names(&preview);

    let mut rows = vec![Vec::with_capacity(columns.len()); preview.height()];
    for name in &columns {
        for (row, value) in rows.iter_mut().zip(column_values(&preview, name)?) {
            row.push(value);
        }
    }

    Ok(HeadTable { columns, rows })
}

/// Descriptive statistics of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    /// Number of present values.
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation; undefined below two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub q25: Option<f64>,
    #[serde(rename = "50%")]
    pub q50: Option<f64>,
    #[serde(rename = "75%")]
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    /// Summarize the present values of a column.
    pub fn from_values(column: impl Into<String>, values: &[f64]) -> Self {
        let sorted = stats::sorted(values);
        Self {
            column: column.into(),
            count: sorted.len(),
            mean: stats::mean(&sorted),
            std: stats::sample_std(&sorted),
            min: sorted.first().copied(),
            q25: stats::quantile_sorted(&sorted, 0.25),
            q50: stats::quantile_sorted(&sorted, 0.5),
            q75: stats::quantile_sorted(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }
}

/// Summary statistics of every column, in table order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    pub columns: Vec<ColumnSummary>,
}

/// Describe every column of `df`.
pub fn describe(df: &DataFrame) -> Result<SummaryTable> {
    let columns = column_names(df)
        .into_iter()
        .map(|name| {
            let values = present_values(&column_values(df, &name)?);
            Ok(ColumnSummary::from_values(name, &values))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SummaryTable { columns })
}

// =============================================================================
// Histogram
// =============================================================================

/// One histogram bin. Bins are half-open except the last, which also
/// holds its upper edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Kernel density estimate evaluated at one point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    pub x: f64,
    pub density: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub column: String,
    pub bins: Vec<HistogramBin>,
    /// Gaussian KDE over the data range. Empty when the data has no spread.
    pub density: Vec<DensityPoint>,
}

impl Histogram {
    /// Build the histogram of `values`.
    ///
    /// `bins` fixes the bin count; `None` picks the larger of the Sturges
    /// and Freedman-Diaconis bin counts. Either way the count is capped at
    /// [`MAX_HISTOGRAM_BINS`]. `None` when `values` is empty.
    pub fn new(
        column: impl Into<String>,
        values: &[f64],
        bins: Option<usize>,
        density_points: usize,
    ) -> Option<Self> {
        let sorted = stats::sorted(values);
        let (&min, &max) = (sorted.first()?, sorted.last()?);

        let (first_edge, last_edge) = if min == max {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        };
        let bin_count = bins
            .unwrap_or_else(|| auto_bin_count(&sorted))
            .clamp(1, MAX_HISTOGRAM_BINS);
        let edges = bin_edges(first_edge, last_edge, bin_count);

        let mut counts = vec![0usize; bin_count];
        for &value in &sorted {
            counts[bin_index(value, &edges)] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: edges[i],
                upper: edges[i + 1],
                count,
            })
            .collect();

        Some(Self {
            column: column.into(),
            bins,
            density: gaussian_kde(&sorted, density_points),
        })
    }

    /// Sum of all bin counts.
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Bin count chosen by the "auto" rule: the larger of the Sturges and
/// Freedman-Diaconis bin counts, Sturges alone when the IQR is zero.
/// Never more than [`MAX_HISTOGRAM_BINS`].
fn auto_bin_count(sorted: &[f64]) -> usize {
    let n = sorted.len() as f64;
    let range = match (sorted.first(), sorted.last()) {
        (Some(min), Some(max)) => max - min,
        _ => return 1,
    };
    if range == 0.0 {
        return 1;
    }

    let sturges = range / (n.log2() + 1.0);
    let iqr = match (
        stats::quantile_sorted(sorted, 0.75),
        stats::quantile_sorted(sorted, 0.25),
    ) {
        (Some(q3), Some(q1)) => q3 - q1,
        _ => 0.0,
    };
    let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);

    let width = if fd > 0.0 { fd.min(sturges) } else { sturges };
    let count = (range / width).ceil();
    if count.is_finite() {
        (count as usize).clamp(1, MAX_HISTOGRAM_BINS)
    } else {
        MAX_HISTOGRAM_BINS
    }
}

/// `bin_count + 1` evenly spaced edges; the last edge is exactly `last`.
fn bin_edges(first: f64, last: f64, bin_count: usize) -> Vec<f64> {
    let step = (last - first) / bin_count as f64;
    let mut edges: Vec<f64> = (0..bin_count).map(|i| first + i as f64 * step).collect();
    edges.push(last);
    edges
}

/// Index of the bin holding `value`, snapping rounding errors to the
/// surrounding edges. `value` must lie within the outer edges.
fn bin_index(value: f64, edges: &[f64]) -> usize {
    let bin_count = edges.len() - 1;
    let (first, last) = (edges[0], edges[bin_count]);

    let mut index = (((value - first) / (last - first)) * bin_count as f64) as usize;
    index = index.min(bin_count - 1);
    if index > 0 && value < edges[index] {
        index -= 1;
    } else if index + 1 < bin_count && value >= edges[index + 1] {
        index += 1;
    }
    index
}

/// Gaussian kernel density estimate with Scott's bandwidth, evaluated on
/// `points` evenly spaced positions spanning the data.
fn gaussian_kde(sorted: &[f64], points: usize) -> Vec<DensityPoint> {
    let (Some(&min), Some(&max), Some(std)) =
        (sorted.first(), sorted.last(), stats::sample_std(sorted))
    else {
        return Vec::new();
    };
    if std == 0.0 || min == max || points < 2 {
        return Vec::new();
    }

    let n = sorted.len() as f64;
    let bandwidth = std * n.powf(-0.2);
    let norm = 1.0 / (n * bandwidth * (2.0 * PI).sqrt());
    let step = (max - min) / (points - 1) as f64;

    (0..points)
        .map(|i| {
            let x = if i == points - 1 { max } else { min + i as f64 * step };
            let sum: f64 = sorted
                .iter()
                .map(|xi| {
                    let z = (x - xi) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum();
            DensityPoint {
                x,
                density: norm * sum,
            }
        })
        .collect()
}

// =============================================================================
// Box plot
// =============================================================================

/// Five-number summary with Tukey whiskers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlot {
    pub column: String,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value at or above `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest value at or below `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    /// Values beyond the whiskers, ascending.
    pub outliers: Vec<f64>,
}

impl BoxPlot {
    const WHISKER_REACH: f64 = 1.5;

    /// `None` when `values` is empty.
    pub fn new(column: impl Into<String>, values: &[f64]) -> Option<Self> {
        let sorted = stats::sorted(values);
        let q1 = stats::quantile_sorted(&sorted, 0.25)?;
        let median = stats::quantile_sorted(&sorted, 0.5)?;
        let q3 = stats::quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;
        let low_reach = q1 - Self::WHISKER_REACH * iqr;
        let high_reach = q3 + Self::WHISKER_REACH * iqr;

        let mut within = sorted
            .iter()
            .copied()
            .filter(|v| *v >= low_reach && *v <= high_reach);
        let lower_whisker = within.next().unwrap_or(q1);
        let upper_whisker = within.last().unwrap_or(lower_whisker);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < lower_whisker || *v > upper_whisker)
            .collect();

        Some(Self {
            column: column.into(),
            min: sorted[0],
            q1,
            median,
            q3,
            max: sorted[sorted.len() - 1],
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

// =============================================================================
// Correlation
// =============================================================================

/// Pairwise Pearson correlations. `values[i][j]` is `None` when either
/// column has no variance over the rows where both are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Correlation of two columns by name.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

/// Correlate every pair of columns of `df`, in table order.
pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
    let columns = column_names(df);
    let data = columns
        .iter()
        .map(|name| column_values(df, name))
        .collect::<Result<Vec<_>>>()?;

    let k = columns.len();
    let mut values = vec![vec![None; k]; k];
    for i in 0..k {
        for j in i..k {
            let (x, y): (Vec<f64>, Vec<f64>) = data[i]
                .iter()
                .zip(&data[j])
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .unzip();

            let r = if i == j {
                stats::sample_std(&x).filter(|s| *s > 0.0).map(|_| 1.0)
            } else {
                stats::pearson(&x, &y)
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix { columns, values })
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== head / describe ====================

    #[test]
    fn test_head_takes_first_rows() {
        let df = df![
            "Glucose" => [148.0, 85.0, 183.0],
            "Outcome" => [1.0, 0.0, 1.0],
        ]
        .unwrap();

        let table = head(&df, 2).unwrap();
        assert_eq!(table.columns, vec!["Glucose", "Outcome"]);
        assert_eq!(
            table.rows,
            vec![vec![Some(148.0), Some(1.0)], vec![Some(85.0), Some(0.0)]]
        );

        // Asking for more rows than exist returns all of them
        assert_eq!(head(&df, 10).unwrap().rows.len(), 3);
    }

    #[test]
    fn test_describe_values() {
        let df = df![
            "Age" => [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0), None],
        ]
        .unwrap();

        let summary = describe(&df).unwrap();
        let age = &summary.columns[0];
        assert_eq!(age.column, "Age");
        assert_eq!(age.count, 5);
        assert_eq!(age.mean, Some(3.0));
        assert!((age.std.unwrap() - 2.5f64.sqrt()).abs() < 1e-12);
        assert_eq!(age.min, Some(1.0));
        assert_eq!(age.q25, Some(2.0));
        assert_eq!(age.q50, Some(3.0));
        assert_eq!(age.q75, Some(4.0));
        assert_eq!(age.max, Some(5.0));
    }

    #[test]
    fn test_describe_single_value_has_no_std() {
        let summary = ColumnSummary::from_values("BMI", &[33.6]);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.std, None);
        assert_eq!(summary.q25, Some(33.6));
    }

    // ==================== histogram ====================

    #[test]
    fn test_histogram_counts_sum_to_n() {
        let values: Vec<f64> = (0..100).map(|i| (i * i % 37) as f64).collect();
        let histogram = Histogram::new("Glucose", &values, None, 50).unwrap();

        assert_eq!(histogram.total(), 100);
        assert_eq!(histogram.bins.first().unwrap().lower, 0.0);
        assert_eq!(histogram.bins.last().unwrap().upper, 36.0);
        assert_eq!(histogram.density.len(), 50);
    }

    #[test]
    fn test_histogram_fixed_bins() {
        let histogram =
            Histogram::new("Age", &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0], Some(5), 10)
                .unwrap();

        let counts: Vec<usize> = histogram.bins.iter().map(|b| b.count).collect();
        // Edges 0, 2, 4, 6, 8, 10; the maximum falls in the last bin
        assert_eq!(counts, vec![2, 2, 2, 2, 2]);
        assert_eq!(histogram.bins[1].lower, 2.0);
    }

    #[test]
    fn test_histogram_auto_bins_sturges_when_iqr_zero() {
        // Ten values, IQR zero: Sturges gives ceil(log2(10) + 1) = 5 bins
        let mut values = vec![1.0; 8];
        values.extend([0.0, 2.0]);
        let histogram = Histogram::new("Insulin", &values, None, 10).unwrap();

        assert_eq!(histogram.bins.len(), 5);
        assert_eq!(histogram.total(), 10);
    }

    #[test]
    fn test_histogram_bin_count_is_capped() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let fixed = Histogram::new("Glucose", &values, Some(usize::MAX / 2), 10).unwrap();
        assert_eq!(fixed.bins.len(), MAX_HISTOGRAM_BINS);
        assert_eq!(fixed.total(), 100);

        // Tiny IQR against a huge range asks for billions of bins
        let mut spread = vec![-1e9, 1e9];
        spread.extend(std::iter::repeat_n(0.0, 49));
        spread.extend(std::iter::repeat_n(1e-9, 49));
        let auto = Histogram::new("Insulin", &spread, None, 10).unwrap();
        assert_eq!(auto.bins.len(), MAX_HISTOGRAM_BINS);
        assert_eq!(auto.total(), 100);
    }

    #[test]
    fn test_histogram_degenerate_range() {
        let histogram = Histogram::new("Age", &[7.0; 12], None, 200).unwrap();

        assert_eq!(histogram.bins.len(), 1);
        assert_eq!(histogram.bins[0].count, 12);
        assert_eq!(histogram.bins[0].lower, 6.5);
        assert_eq!(histogram.bins[0].upper, 7.5);
        assert!(histogram.density.is_empty());
    }

    #[test]
    fn test_histogram_empty() {
        assert!(Histogram::new("Age", &[], None, 200).is_none());
    }

    #[test]
    fn test_kde_integrates_to_about_one() {
        let values: Vec<f64> = (0..200).map(|i| ((i * 7919) % 101) as f64).collect();
        let density = gaussian_kde(&stats::sorted(&values), 400);

        let step = density[1].x - density[0].x;
        let area: f64 = density.iter().map(|p| p.density * step).sum();
        // The grid stops at the data range, so some tail mass is cut off
        assert!(area > 0.85 && area < 1.01, "area = {}", area);
    }

    // ==================== box plot ====================

    #[test]
    fn test_box_plot_whiskers_and_outliers() {
        let plot = BoxPlot::new("Insulin", &[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();

        assert_eq!(plot.q1, 2.25);
        assert_eq!(plot.median, 3.5);
        assert_eq!(plot.q3, 4.75);
        assert_eq!(plot.lower_whisker, 1.0);
        assert_eq!(plot.upper_whisker, 5.0);
        assert_eq!(plot.outliers, vec![100.0]);
        assert_eq!((plot.min, plot.max), (1.0, 100.0));
    }

    #[test]
    fn test_box_plot_on_clipped_values_has_no_outliers() {
        let plot = BoxPlot::new("Insulin", &[1.0, 2.0, 3.0, 4.0, 5.0, 8.5]).unwrap();

        assert!(plot.outliers.is_empty());
        assert_eq!(plot.upper_whisker, 8.5);
    }

    // ==================== correlation ====================

    #[test]
    fn test_correlation_matrix() {
        let df = df![
            "Glucose" => [1.0, 2.0, 3.0, 4.0],
            "BMI" => [2.0, 4.0, 6.0, 8.0],
            "Age" => [4.0, 3.0, 2.0, 1.0],
            "Outcome" => [1.0, 1.0, 1.0, 1.0],
        ]
        .unwrap();

        let matrix = correlation_matrix(&df).unwrap();
        assert_eq!(matrix.columns.len(), 4);
        assert_eq!(matrix.get("Glucose", "Glucose"), Some(1.0));
        assert!((matrix.get("Glucose", "BMI").unwrap() - 1.0).abs() < 1e-12);
        assert!((matrix.get("Glucose", "Age").unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(matrix.get("Glucose", "Age"), matrix.get("Age", "Glucose"));

        // A constant column correlates with nothing, itself included
        assert_eq!(matrix.get("Outcome", "Outcome"), None);
        assert_eq!(matrix.get("Outcome", "Glucose"), None);
    }

    #[test]
    fn test_correlation_uses_pairwise_complete_rows() {
        let df = df![
            "a" => [Some(1.0), Some(2.0), None, Some(4.0)],
            "b" => [Some(2.0), Some(4.0), Some(100.0), Some(8.0)],
        ]
        .unwrap();

        let matrix = correlation_matrix(&df).unwrap();
        assert!((matrix.get("a", "b").unwrap() - 1.0).abs() < 1e-12);
    }
}
