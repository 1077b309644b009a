//! Analysis configuration
//!
//! Defaults reproduce the reference run: seed 42, 1000 rows over all 22
//! labels, an 80/20 split with split seed 42.

use crate::amino::AminoAcid;
use crate::generator::{GeneratorConfig, DEFAULT_ROWS, DEFAULT_SEED};
use crate::outcome::{NormalParams, Outcome, OutcomeParams};
use crate::split::{DEFAULT_SPLIT_SEED, DEFAULT_TEST_RATIO};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default number of labels listed per outcome ranking
pub const DEFAULT_TOP_K: usize = 5;

/// Settings for one end-to-end analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Generation seed
    pub seed: u64,
    /// Number of observations
    pub rows: usize,
    /// Closed label set
    pub labels: Vec<AminoAcid>,
    /// Per-outcome generating distributions
    pub params: OutcomeParams,
    /// Fraction of rows held out for scoring
    pub test_ratio: f64,
    /// Split seed, independent of the generation seed
    pub split_seed: u64,
    /// Labels listed per outcome ranking
    pub top_k: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            rows: DEFAULT_ROWS,
            labels: AminoAcid::ALL.to_vec(),
            params: OutcomeParams::default(),
            test_ratio: DEFAULT_TEST_RATIO,
            split_seed: DEFAULT_SPLIT_SEED,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl AnalysisConfig {
    /// Create a builder starting from the defaults
    #[must_use]
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Parse a JSON document; missing fields take their defaults
    ///
    /// # Errors
    /// Returns `Json` for malformed input, or a validation error.
    ///
    /// # Example
    /// ```
    /// use amino_stats::AnalysisConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = AnalysisConfig::from_json(r#"{"seed": 7, "rows": 500}"#)?;
    /// assert_eq!(config.seed, 7);
    /// assert_eq!(config.labels.len(), 22);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings describe a runnable analysis
    ///
    /// # Errors
    /// - `EmptyLabelSet` for an empty label set
    /// - `InvalidInput` for zero rows, a bad ratio, zero `top_k`, or an
    ///   improper distribution
    pub fn validate(&self) -> Result<()> {
        if self.labels.is_empty() {
            return Err(Error::EmptyLabelSet);
        }
        if self.rows == 0 {
            return Err(Error::InvalidInput("rows must be greater than 0".to_string()));
        }
        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(Error::InvalidInput(format!(
                "test_ratio must be in (0, 1), got {}",
                self.test_ratio
            )));
        }
        if self.top_k == 0 {
            return Err(Error::InvalidInput("top_k must be greater than 0".to_string()));
        }
        self.params.validate()
    }

    /// Generator portion of the settings
    #[must_use]
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            rows: self.rows,
            labels: self.labels.clone(),
            params: self.params,
        }
    }
}

/// Builder for `AnalysisConfig`
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    /// Set the generation seed
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Set the number of observations
    #[must_use]
    pub const fn rows(mut self, rows: usize) -> Self {
        self.config.rows = rows;
        self
    }

    /// Set the closed label set
    #[must_use]
    pub fn labels(mut self, labels: impl Into<Vec<AminoAcid>>) -> Self {
        self.config.labels = labels.into();
        self
    }

    /// Set one outcome's generating distribution
    #[must_use]
    pub fn outcome_params(mut self, outcome: Outcome, mean: f64, std_dev: f64) -> Self {
        self.config.params = self
            .config
            .params
            .with(outcome, NormalParams::new(mean, std_dev));
        self
    }

    /// Set the held-out fraction
    #[must_use]
    pub const fn test_ratio(mut self, test_ratio: f64) -> Self {
        self.config.test_ratio = test_ratio;
        self
    }

    /// Set the split seed
    #[must_use]
    pub const fn split_seed(mut self, split_seed: u64) -> Self {
        self.config.split_seed = split_seed;
        self
    }

    /// Set the ranking depth
    #[must_use]
    pub const fn top_k(mut self, top_k: usize) -> Self {
        self.config.top_k = top_k;
        self
    }

    /// Validate and build the config
    ///
    /// # Errors
    /// See [`AnalysisConfig::validate`].
    pub fn build(self) -> Result<AnalysisConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_run() {
        let config = AnalysisConfig::default();
        assert_eq!(config.seed, 42);
        assert_eq!(config.rows, 1000);
        assert_eq!(config.labels.len(), 22);
        assert!((config.test_ratio - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.split_seed, 42);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = AnalysisConfig::builder()
            .seed(1)
            .rows(200)
            .labels(vec![AminoAcid::Leucine, AminoAcid::Glycine])
            .outcome_params(Outcome::Hypertrophy, 7.0, 0.5)
            .test_ratio(0.25)
            .split_seed(9)
            .top_k(1)
            .build()
            .unwrap();
        assert_eq!(config.rows, 200);
        assert_eq!(config.labels, vec![AminoAcid::Leucine, AminoAcid::Glycine]);
        assert_eq!(config.params.get(Outcome::Hypertrophy), NormalParams::new(7.0, 0.5));
        assert_eq!(config.generator_config().rows, 200);
    }

    #[test]
    fn test_builder_rejects_invalid() {
        assert!(matches!(
            AnalysisConfig::builder().labels(Vec::new()).build(),
            Err(Error::EmptyLabelSet)
        ));
        assert!(AnalysisConfig::builder().test_ratio(1.5).build().is_err());
        assert!(AnalysisConfig::builder().rows(0).build().is_err());
        assert!(AnalysisConfig::builder().top_k(0).build().is_err());
    }

    #[test]
    fn test_from_json_defaults_missing_fields() {
        let config =
            AnalysisConfig::from_json(r#"{"labels": ["Leucine", "Beta-Alanine"], "test_ratio": 0.5}"#)
                .unwrap();
        assert_eq!(config.labels, vec![AminoAcid::Leucine, AminoAcid::BetaAlanine]);
        assert_eq!(config.rows, 1000);
        assert!(AnalysisConfig::from_json("{not json").is_err());
        assert!(AnalysisConfig::from_json(r#"{"top_k": 0}"#).is_err());
    }
}
