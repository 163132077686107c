//! Configuration types for the cleaning pipeline and the explorer views.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use serde::{Deserialize, Serialize};

/// Columns that receive outlier clipping, in processing order.
///
/// Every other column (such as the `Outcome` label) is imputed but never
/// clipped.
pub const TREATED_COLUMNS: [&str; 8] = [
    "Pregnancies",
    "Glucose",
    "Insulin",
    "BMI",
    "DiabetesPedigreeFunction",
    "Age",
    "BloodPressure",
    "SkinThickness",
];

/// Tukey's fence multiplier.
pub const DEFAULT_FENCE_MULTIPLIER: f64 = 1.5;

/// Upper bound on histogram bins, configured or chosen automatically.
pub const MAX_HISTOGRAM_BINS: usize = 10_000;

/// Upper bound on the density grid size.
pub const MAX_DENSITY_POINTS: usize = 100_000;

/// Configuration for the cleaning pipeline and the views built on top of it.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use pima_processing::config::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .head_rows(5)
///     .histogram_bins(20)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Columns to clip, in processing order. All must exist in the table.
    /// Default: [`TREATED_COLUMNS`]
    pub treated_columns: Vec<String>,

    /// Multiplier applied to the IQR to place the fences.
    /// Default: 1.5
    pub fence_multiplier: f64,

    /// Number of rows shown by the head preview.
    /// Default: 10
    pub head_rows: usize,

    /// Fixed histogram bin count. `None` selects the bin count automatically.
    /// Default: None
    pub histogram_bins: Option<usize>,

    /// Number of grid points the density overlay is evaluated on.
    /// Default: 200
    pub density_points: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            treated_columns: TREATED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            fence_multiplier: DEFAULT_FENCE_MULTIPLIER,
            head_rows: 10,
            histogram_bins: None,
            density_points: 200,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Load a configuration from a JSON document.
    ///
    /// Missing fields take their default values. The result is validated.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.fence_multiplier.is_finite() || self.fence_multiplier < 0.0 {
            return Err(ConfigValidationError::InvalidFenceMultiplier(
                self.fence_multiplier,
            ));
        }

        if self.treated_columns.is_empty() {
            return Err(ConfigValidationError::EmptyColumnSet);
        }

        for (i, column) in self.treated_columns.iter().enumerate() {
            if self.treated_columns[..i].contains(column) {
                return Err(ConfigValidationError::DuplicateColumn(column.clone()));
            }
        }

        if self.head_rows == 0 {
            return Err(ConfigValidationError::InvalidHeadRows(self.head_rows));
        }

        match self.histogram_bins {
            Some(0) => return Err(ConfigValidationError::InvalidHistogramBins(0)),
            Some(bins) if bins > MAX_HISTOGRAM_BINS => {
                return Err(ConfigValidationError::TooManyHistogramBins(bins));
            }
            _ => {}
        }

        if !(2..=MAX_DENSITY_POINTS).contains(&self.density_points) {
            return Err(ConfigValidationError::InvalidDensityPoints(
                self.density_points,
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid fence multiplier: {0} (must be a finite, non-negative number)")]
    InvalidFenceMultiplier(f64),

    #[error("The set of columns to clip must not be empty")]
    EmptyColumnSet,

    #[error("Column '{0}' is listed more than once in the columns to clip")]
    DuplicateColumn(String),

    #[error("Invalid head rows: {0} (must be at least 1)")]
    InvalidHeadRows(usize),

    #[error("Invalid histogram bins: {0} (must be at least 1)")]
    InvalidHistogramBins(usize),

    #[error("Too many histogram bins: {0} (at most {max})", max = MAX_HISTOGRAM_BINS)]
    TooManyHistogramBins(usize),

    #[error("Invalid density points: {0} (must be between 2 and {max})", max = MAX_DENSITY_POINTS)]
    InvalidDensityPoints(usize),
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    treated_columns: Option<Vec<String>>,
    fence_multiplier: Option<f64>,
    head_rows: Option<usize>,
    histogram_bins: Option<usize>,
    density_points: Option<usize>,
}

impl PipelineConfigBuilder {
    /// Set the columns to clip.
    ///
    /// Order is preserved and decides the processing order.
    pub fn treated_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.treated_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the IQR multiplier used to place the fences.
    pub fn fence_multiplier(mut self, multiplier: f64) -> Self {
        self.fence_multiplier = Some(multiplier);
        self
    }

    /// Set the number of rows in the head preview.
    pub fn head_rows(mut self, rows: usize) -> Self {
        self.head_rows = Some(rows);
        self
    }

    /// Use a fixed histogram bin count instead of the automatic rule.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the number of grid points for the density overlay.
    pub fn density_points(mut self, points: usize) -> Self {
        self.density_points = Some(points);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let defaults = PipelineConfig::default();
        let config = PipelineConfig {
            treated_columns: self.treated_columns.unwrap_or(defaults.treated_columns),
            fence_multiplier: self.fence_multiplier.unwrap_or(defaults.fence_multiplier),
            head_rows: self.head_rows.unwrap_or(defaults.head_rows),
            histogram_bins: self.histogram_bins.or(defaults.histogram_bins),
            density_points: self.density_points.unwrap_or(defaults.density_points),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.treated_columns.len(), 8);
        assert_eq!(config.treated_columns[0], "Pregnancies");
        assert_eq!(config.treated_columns[7], "SkinThickness");
        assert_eq!(config.fence_multiplier, 1.5);
        assert_eq!(config.head_rows, 10);
        assert_eq!(config.histogram_bins, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_defaults() {
        let config = PipelineConfig::builder().build().unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = PipelineConfig::builder()
            .treated_columns(["Glucose", "BMI"])
            .fence_multiplier(3.0)
            .head_rows(5)
            .histogram_bins(12)
            .density_points(50)
            .build()
            .unwrap();

        assert_eq!(config.treated_columns, vec!["Glucose", "BMI"]);
        assert_eq!(config.fence_multiplier, 3.0);
        assert_eq!(config.head_rows, 5);
        assert_eq!(config.histogram_bins, Some(12));
        assert_eq!(config.density_points, 50);
    }

    #[test]
    fn test_validation_invalid_fence_multiplier() {
        let result = PipelineConfig::builder().fence_multiplier(-1.0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidFenceMultiplier(_)
        ));

        let result = PipelineConfig::builder().fence_multiplier(f64::NAN).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_column_set() {
        let result = PipelineConfig::builder()
            .treated_columns(Vec::<String>::new())
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyColumnSet
        ));

        let result = PipelineConfig::builder()
            .treated_columns(["Age", "BMI", "Age"])
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::DuplicateColumn(ref c) if c == "Age"
        ));
    }

    #[test]
    fn test_validation_view_settings() {
        assert!(matches!(
            PipelineConfig::builder().head_rows(0).build().unwrap_err(),
            ConfigValidationError::InvalidHeadRows(0)
        ));
        assert!(matches!(
            PipelineConfig::builder().histogram_bins(0).build().unwrap_err(),
            ConfigValidationError::InvalidHistogramBins(0)
        ));
        assert!(matches!(
            PipelineConfig::builder().density_points(1).build().unwrap_err(),
            ConfigValidationError::InvalidDensityPoints(1)
        ));
    }

    #[test]
    fn test_validation_caps_view_sizes() {
        assert!(PipelineConfig::builder()
            .histogram_bins(MAX_HISTOGRAM_BINS)
            .build()
            .is_ok());
        assert!(matches!(
            PipelineConfig::builder()
                .histogram_bins(usize::MAX / 2)
                .build()
                .unwrap_err(),
            ConfigValidationError::TooManyHistogramBins(n) if n == usize::MAX / 2
        ));
        assert!(matches!(
            PipelineConfig::builder()
                .density_points(MAX_DENSITY_POINTS + 1)
                .build()
                .unwrap_err(),
            ConfigValidationError::InvalidDensityPoints(_)
        ));

        let err = PipelineConfig::from_json(r#"{ "histogram_bins": 1000000000 }"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_config_serialization() {
        let config = PipelineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_config_from_partial_json() {
        let json = r#"{
            "fence_multiplier": 2.0,
            "histogram_bins": 15
        }"#;

        let config = PipelineConfig::from_json(json).expect("partial JSON should load");

        assert_eq!(config.fence_multiplier, 2.0);
        assert_eq!(config.histogram_bins, Some(15));
        assert_eq!(config.head_rows, 10);
        assert_eq!(config.treated_columns.len(), 8);
    }

    #[test]
    fn test_config_from_json_rejects_invalid() {
        let err = PipelineConfig::from_json(r#"{ "head_rows": 0 }"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
