//! Error types for amino-stats
//!
//! Generator failures are precondition violations. Estimator failures are
//! reported per outcome metric and never abort the other fits.

use crate::amino::AminoAcid;
use crate::outcome::Outcome;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// amino-stats error types
#[derive(Error, Debug)]
pub enum Error {
    /// Generator invoked without any amino-acid labels
    #[error("Empty label set: at least one amino acid label is required\nConfigure the generator with a non-empty label set")]
    EmptyLabelSet,

    /// A label has no usable training rows for one outcome metric
    #[error("Degenerate split for {outcome}: no training rows for label '{label}'\nIts indicator column is constant; use a larger dataset or a different split seed")]
    DegenerateSplit {
        /// Outcome metric whose fit failed
        outcome: Outcome,
        /// Label whose indicator column is empty in the training partition
        label: AminoAcid,
    },

    /// Normal equations are singular at a design column
    #[error("Rank-deficient design matrix: column {column} has no pivot")]
    RankDeficient {
        /// Index of the design column without a usable pivot
        column: usize,
    },

    /// Invalid configuration or argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
