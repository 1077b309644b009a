//! # amino-stats: Synthetic Amino-Acid Effect Analysis
//!
//! **Version**: 0.1.0
//!
//! Generates a seeded synthetic dataset of amino-acid supplement
//! observations, summarizes each outcome per amino acid, and fits one
//! one-hot linear model per outcome scored on a held-out split.
//!
//! ## Pipeline
//!
//! - **Generator**: closed label set, four independent normal outcomes
//! - **Aggregator**: per-label means, box-plot statistics, correlations
//! - **Estimator**: label encoding, train/test split, OLS, MSE and R²
//!
//! Fit failures are isolated per outcome: one degenerate metric never
//! hides the results of the other three.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use amino_stats::{Analysis, AnalysisConfig};
//!
//! let run = Analysis::new(AnalysisConfig::default())?.run()?;
//! for row in run.summary().rows() {
//!     println!("{}: {} observations", row.amino_acid, row.count);
//! }
//! println!("{}", run.report()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod aggregate;
pub mod amino;
pub mod config;
pub mod correlation;
pub mod dataset;
pub mod encoding;
pub mod error;
pub mod estimator;
pub mod generator;
pub mod outcome;
pub mod pipeline;
pub mod regression;
pub mod report;
pub mod split;
pub mod topk;

pub use aggregate::{BoxStats, LabelDistribution, Summary, SummaryRow};
pub use amino::AminoAcid;
pub use config::{AnalysisConfig, AnalysisConfigBuilder};
pub use dataset::{Dataset, Observation};
pub use error::{Error, Result};
pub use estimator::{Estimator, FittedModel, ModelFit, ModelResults};
pub use generator::{Generator, GeneratorConfig};
pub use outcome::{NormalParams, Outcome, OutcomeParams, OutcomeValues};
pub use pipeline::{Analysis, AnalysisRun};
pub use report::AnalysisReport;
pub use split::TrainTestSplit;
