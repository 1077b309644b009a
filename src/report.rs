//! Serializable analysis report
//!
//! The report is what presentation collaborators consume: summary rows,
//! rankings, correlations, and one entry per outcome that is either a fitted
//! model with its scores or the reason the fit failed.

use crate::aggregate::SummaryRow;
use crate::amino::AminoAcid;
use crate::config::AnalysisConfig;
use crate::correlation::CorrelationMatrix;
use crate::outcome::Outcome;
use crate::pipeline::AnalysisRun;
use crate::topk::SortOrder;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fit status of one outcome metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelStatus {
    /// Model fitted and scored on the held-out rows
    Fitted {
        /// Mean squared error
        mse: f64,
        /// Coefficient of determination
        r2: f64,
        /// Predicted value per label (the label's indicator coefficient)
        coefficients: Vec<LabelCoefficient>,
    },
    /// Fit failed for this metric only
    Failed {
        /// Error message
        reason: String,
    },
}

/// Coefficient of one label's indicator feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelCoefficient {
    /// Label
    pub amino_acid: AminoAcid,
    /// Coefficient
    pub coefficient: f64,
}

/// Report line for one outcome metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelReport {
    /// Outcome metric
    pub outcome: Outcome,
    /// Fit status
    #[serde(flatten)]
    pub status: ModelStatus,
}

/// Highest-mean labels for one outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    /// Outcome ranked by
    pub outcome: Outcome,
    /// Best labels first
    pub top: Vec<SummaryRow>,
}

/// Full report of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
    /// Settings of the run
    pub config: AnalysisConfig,
    /// Number of generated observations
    pub observations: usize,
    /// Rows used for fitting
    pub train_rows: usize,
    /// Rows held out for scoring
    pub test_rows: usize,
    /// Per-label means
    pub summary: Vec<SummaryRow>,
    /// Highest-mean labels per outcome
    pub rankings: Vec<Ranking>,
    /// Outcome correlations
    pub correlations: CorrelationMatrix,
    /// One entry per outcome metric
    pub models: Vec<ModelReport>,
}

impl AnalysisReport {
    /// Build the report for a finished run
    ///
    /// # Errors
    /// Returns `InvalidInput` if the run's `top_k` is zero.
    pub fn from_run(run: &AnalysisRun) -> Result<Self> {
        let rankings = Outcome::ALL
            .iter()
            .map(|&outcome| {
                run.summary()
                    .top_k(outcome, run.config().top_k, SortOrder::Descending)
                    .map(|top| Ranking { outcome, top })
            })
            .collect::<Result<Vec<_>>>()?;

        let models = run
            .models()
            .iter()
            .map(|(outcome, fit)| {
                let status = match fit {
                    Ok(fit) => ModelStatus::Fitted {
                        mse: fit.mse,
                        r2: fit.r2,
                        coefficients: fit
                            .model
                            .label_coefficients()
                            .into_iter()
                            .map(|(amino_acid, coefficient)| LabelCoefficient {
                                amino_acid,
                                coefficient,
                            })
                            .collect(),
                    },
                    Err(err) => ModelStatus::Failed {
                        reason: err.to_string(),
                    },
                };
                ModelReport { outcome, status }
            })
            .collect();

        Ok(Self {
            generated_at: Utc::now(),
            config: run.config().clone(),
            observations: run.dataset().len(),
            train_rows: run.models().train_rows(),
            test_rows: run.models().test_rows(),
            summary: run.summary().rows().to_vec(),
            rankings,
            correlations: *run.correlations(),
            models,
        })
    }

    /// Pretty-printed JSON
    ///
    /// # Errors
    /// Returns `Json` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for ModelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            ModelStatus::Fitted { mse, r2, .. } => write!(
                f,
                "{} - Mean Squared Error: {mse}, R-squared: {r2}",
                self.outcome.title()
            ),
            ModelStatus::Failed { reason } => {
                // Keep one line per metric
                let first = reason.lines().next().unwrap_or_default();
                write!(f, "{} - fit failed: {first}", self.outcome.title())
            }
        }
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Amino acid analysis: {} observations, seed {} ({})",
            self.observations,
            self.config.seed,
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;

        writeln!(f, "\nAverage effects by amino acid:")?;
        writeln!(
            f,
            "{:<15} {:>5} {:>10} {:>10} {:>10} {:>10}",
            "Amino Acid", "n", "Synthesis", "Recovery", "Strength", "Hypertrophy"
        )?;
        for row in &self.summary {
            writeln!(
                f,
                "{:<15} {:>5} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
                row.amino_acid.name(),
                row.count,
                row.mean(Outcome::MuscleProteinSynthesis),
                row.mean(Outcome::RecoveryRate),
                row.mean(Outcome::MuscleStrength),
                row.mean(Outcome::Hypertrophy),
            )?;
        }

        writeln!(f, "\nMost effective amino acids:")?;
        for ranking in &self.rankings {
            let names: Vec<&str> = ranking.top.iter().map(|r| r.amino_acid.name()).collect();
            writeln!(f, "  {}: {}", ranking.outcome.title(), names.join(", "))?;
        }

        writeln!(
            f,
            "\nLinear models ({} train / {} test rows):",
            self.train_rows, self.test_rows
        )?;
        for model in &self.models {
            writeln!(f, "{model}")?;
        }
        Ok(())
    }
}
