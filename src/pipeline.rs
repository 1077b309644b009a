//! End-to-end analysis run
//!
//! Generator → (Aggregator, Estimator). Each random stage gets its own
//! `ChaCha8Rng` from the configured seeds, so changing the split seed never
//! changes the generated dataset.

use crate::aggregate::{distributions, LabelDistribution, Summary};
use crate::config::AnalysisConfig;
use crate::correlation::CorrelationMatrix;
use crate::dataset::Dataset;
use crate::estimator::{Estimator, ModelResults};
use crate::generator::Generator;
use crate::outcome::Outcome;
use crate::report::AnalysisReport;
use crate::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info_span;

/// Runs the full pipeline for one configuration
#[derive(Debug, Clone)]
pub struct Analysis {
    config: AnalysisConfig,
}

impl Analysis {
    /// Create an analysis, validating the configuration
    ///
    /// # Errors
    /// See [`AnalysisConfig::validate`].
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Generate, summarize, and fit
    ///
    /// Per-outcome fit failures do not fail the run; they are kept in
    /// [`AnalysisRun::models`].
    ///
    /// # Errors
    /// Returns generator precondition violations and split errors.
    pub fn run(&self) -> Result<AnalysisRun> {
        let _span = info_span!("analysis", seed = self.config.seed, rows = self.config.rows).entered();

        let generator = Generator::new(self.config.generator_config())?;
        let mut data_rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let dataset = generator.generate(&mut data_rng)?;

        let summary = Summary::from_dataset(&dataset);
        let box_stats = Outcome::ALL
            .iter()
            .map(|&outcome| (outcome, distributions(&dataset, outcome)))
            .collect();
        let correlations = CorrelationMatrix::from_dataset(&dataset);

        let estimator = Estimator::for_dataset(&dataset)?;
        let mut split_rng = ChaCha8Rng::seed_from_u64(self.config.split_seed);
        let models = estimator.fit_split(&dataset, self.config.test_ratio, &mut split_rng)?;

        Ok(AnalysisRun {
            config: self.config.clone(),
            dataset,
            summary,
            distributions: box_stats,
            correlations,
            models,
        })
    }
}

/// Everything one run produced
#[derive(Debug)]
pub struct AnalysisRun {
    config: AnalysisConfig,
    dataset: Dataset,
    summary: Summary,
    distributions: Vec<(Outcome, Vec<LabelDistribution>)>,
    correlations: CorrelationMatrix,
    models: ModelResults,
}

impl AnalysisRun {
    /// Configuration the run used
    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Generated dataset
    #[must_use]
    pub const fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Per-label means
    #[must_use]
    pub const fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Per-label box-plot statistics for one outcome
    #[must_use]
    pub fn distributions(&self, outcome: Outcome) -> &[LabelDistribution] {
        self.distributions
            .iter()
            .find(|(o, _)| *o == outcome)
            .map(|(_, d)| d.as_slice())
            .unwrap_or(&[])
    }

    /// Outcome correlations
    #[must_use]
    pub const fn correlations(&self) -> &CorrelationMatrix {
        &self.correlations
    }

    /// Per-outcome model results
    #[must_use]
    pub const fn models(&self) -> &ModelResults {
        &self.models
    }

    /// Serializable report of the run
    ///
    /// # Errors
    /// Returns `InvalidInput` only if the configured `top_k` is zero.
    pub fn report(&self) -> Result<AnalysisReport> {
        AnalysisReport::from_run(self)
    }
}
