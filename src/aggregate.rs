//! Group-by aggregation over the dataset
//!
//! Partitions observations by amino-acid label and reduces each outcome
//! column. Labels with no observations produce no row. Output rows are
//! ordered by label display name so repeated runs over the same dataset
//! print identically.

use crate::amino::AminoAcid;
use crate::dataset::{Dataset, AMINO_ACID_COLUMN};
use crate::outcome::{Outcome, OutcomeValues};
use crate::topk::{select_top_k_indices, SortOrder};
use crate::{Error, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Column name of the per-label observation count
pub const COUNT_COLUMN: &str = "count";

/// Per-label means of every outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Label of the partition
    pub amino_acid: AminoAcid,
    /// Observations in the partition (always >= 1)
    pub count: usize,
    /// Arithmetic mean of each outcome
    #[serde(flatten)]
    pub means: OutcomeValues,
}

impl SummaryRow {
    /// Mean of one outcome
    #[must_use]
    pub const fn mean(&self, outcome: Outcome) -> f64 {
        self.means.get(outcome)
    }
}

/// Ordered sequence of summary rows, one per label present
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Summary {
    rows: Vec<SummaryRow>,
}

impl Summary {
    /// Group the dataset by label and average every outcome
    #[must_use]
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let partitions = partition_by_label(dataset);

        let mut rows: Vec<SummaryRow> = partitions
            .into_iter()
            .map(|(amino_acid, members)| {
                let mut sums = OutcomeValues::default();
                for &row in &members {
                    let obs = &dataset.observations()[row];
                    for outcome in Outcome::ALL {
                        *sums.get_mut(outcome) += obs.value(outcome);
                    }
                }
                #[allow(clippy::cast_precision_loss)]
                let n = members.len() as f64;
                for outcome in Outcome::ALL {
                    *sums.get_mut(outcome) /= n;
                }
                SummaryRow {
                    amino_acid,
                    count: members.len(),
                    means: sums,
                }
            })
            .collect();
        rows.sort_by_key(|row| row.amino_acid.name());

        info!(groups = rows.len(), rows = dataset.len(), "summarized dataset");
        Self { rows }
    }

    /// Summary rows in label-name order
    #[must_use]
    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    /// Number of labels present
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no label is present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for a label, if it was drawn
    #[must_use]
    pub fn get(&self, amino_acid: AminoAcid) -> Option<&SummaryRow> {
        self.rows.iter().find(|row| row.amino_acid == amino_acid)
    }

    /// The `k` labels with the highest (or lowest) mean for an outcome
    ///
    /// # Errors
    /// Returns `InvalidInput` if `k` is zero.
    pub fn top_k(&self, outcome: Outcome, k: usize, order: SortOrder) -> Result<Vec<SummaryRow>> {
        if k == 0 {
            return Err(Error::InvalidInput("k must be greater than 0".to_string()));
        }
        let means: Vec<f64> = self.rows.iter().map(|row| row.mean(outcome)).collect();
        let indices = select_top_k_indices(&means, k, order);
        Ok(indices.into_iter().map(|i| self.rows[i]).collect())
    }

    /// Arrow schema of [`Summary::to_record_batch`]
    #[must_use]
    pub fn schema() -> Schema {
        let mut fields = vec![
            Field::new(AMINO_ACID_COLUMN, DataType::Utf8, false),
            Field::new(COUNT_COLUMN, DataType::Int64, false),
        ];
        fields.extend(
            Outcome::ALL
                .iter()
                .map(|o| Field::new(o.column_name(), DataType::Float64, false)),
        );
        Schema::new(fields)
    }

    /// Columnar view for presentation collaborators
    ///
    /// # Errors
    /// Returns an Arrow error if the batch cannot be assembled.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let labels = StringArray::from_iter_values(self.rows.iter().map(|r| r.amino_acid.name()));
        #[allow(clippy::cast_possible_wrap)]
        let counts = Int64Array::from_iter_values(self.rows.iter().map(|r| r.count as i64));

        let mut columns: Vec<ArrayRef> = vec![Arc::new(labels), Arc::new(counts)];
        for outcome in Outcome::ALL {
            columns.push(Arc::new(Float64Array::from_iter_values(
                self.rows.iter().map(|r| r.mean(outcome)),
            )));
        }

        Ok(RecordBatch::try_new(Arc::new(Self::schema()), columns)?)
    }
}

/// Five-number summary of one label's values for one outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    /// Smallest value
    pub min: f64,
    /// 25th percentile
    pub q1: f64,
    /// 50th percentile
    pub median: f64,
    /// 75th percentile
    pub q3: f64,
    /// Largest value
    pub max: f64,
}

impl BoxStats {
    /// Compute from unsorted values; `None` when empty
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            min: sorted[0],
            q1: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q3: quantile_sorted(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }

    /// Interquartile range
    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Box-plot numbers for one label and outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelDistribution {
    /// Label of the partition
    pub amino_acid: AminoAcid,
    /// Observations in the partition
    pub count: usize,
    /// Five-number summary
    pub stats: BoxStats,
}

/// Per-label box-plot statistics for one outcome, in label-name order
#[must_use]
pub fn distributions(dataset: &Dataset, outcome: Outcome) -> Vec<LabelDistribution> {
    let mut out: Vec<LabelDistribution> = partition_by_label(dataset)
        .into_iter()
        .filter_map(|(amino_acid, members)| {
            let values: Vec<f64> = members
                .iter()
                .map(|&row| dataset.observations()[row].value(outcome))
                .collect();
            BoxStats::from_values(&values).map(|stats| LabelDistribution {
                amino_acid,
                count: members.len(),
                stats,
            })
        })
        .collect();
    out.sort_by_key(|d| d.amino_acid.name());
    out
}

/// Row indices of each label present in the dataset
fn partition_by_label(dataset: &Dataset) -> FxHashMap<AminoAcid, Vec<usize>> {
    let mut partitions: FxHashMap<AminoAcid, Vec<usize>> = FxHashMap::default();
    for (row, obs) in dataset.observations().iter().enumerate() {
        partitions.entry(obs.amino_acid).or_default().push(row);
    }
    partitions
}

/// Linear-interpolation quantile of pre-sorted values
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
