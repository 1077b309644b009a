//! Immutable synthetic dataset
//!
//! A [`Dataset`] is an ordered sequence of [`Observation`]s plus the closed
//! label set it was drawn from. It never changes after construction, so
//! the aggregator and estimator may read it concurrently.

use crate::amino::AminoAcid;
use crate::outcome::{Outcome, OutcomeValues};
use crate::{Error, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Column name of the label column in Arrow views
pub const AMINO_ACID_COLUMN: &str = "amino_acid";

/// One synthetic data point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Label drawn from the closed set
    pub amino_acid: AminoAcid,
    /// Outcome values
    #[serde(flatten)]
    pub values: OutcomeValues,
}

impl Observation {
    /// Create an observation
    #[must_use]
    pub const fn new(amino_acid: AminoAcid, values: OutcomeValues) -> Self {
        Self { amino_acid, values }
    }

    /// Value of one outcome field
    #[must_use]
    pub const fn value(&self, outcome: Outcome) -> f64 {
        self.values.get(outcome)
    }
}

/// Ordered, immutable collection of observations
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    labels: Vec<AminoAcid>,
    observations: Vec<Observation>,
}

impl Dataset {
    /// Build a dataset from observations over a closed label set
    ///
    /// # Errors
    /// Returns `EmptyLabelSet` if `labels` is empty, or `InvalidInput` if the
    /// label set has duplicates or an observation carries a label outside it.
    pub fn from_observations(
        labels: Vec<AminoAcid>,
        observations: Vec<Observation>,
    ) -> Result<Self> {
        if labels.is_empty() {
            return Err(Error::EmptyLabelSet);
        }

        let mut known = [false; AminoAcid::COUNT];
        for &label in &labels {
            let slot = &mut known[label as usize];
            if *slot {
                return Err(Error::InvalidInput(format!("Duplicate label in set: {label}")));
            }
            *slot = true;
        }

        if let Some((row, obs)) = observations
            .iter()
            .enumerate()
            .find(|(_, obs)| !known[obs.amino_acid as usize])
        {
            return Err(Error::InvalidInput(format!(
                "Observation {row} has label {} outside the label set",
                obs.amino_acid
            )));
        }

        Ok(Self {
            labels,
            observations,
        })
    }

    /// The closed label set observations were drawn from
    #[must_use]
    pub fn labels(&self) -> &[AminoAcid] {
        &self.labels
    }

    /// All observations in generation order
    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Number of observations
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the dataset has no observations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Observation at a row index
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&Observation> {
        self.observations.get(row)
    }

    /// One outcome column, in row order
    #[must_use]
    pub fn column(&self, outcome: Outcome) -> Vec<f64> {
        self.observations.iter().map(|obs| obs.value(outcome)).collect()
    }

    /// Arrow schema of [`Dataset::to_record_batch`]
    #[must_use]
    pub fn schema() -> Schema {
        let mut fields = vec![Field::new(AMINO_ACID_COLUMN, DataType::Utf8, false)];
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
        let labels = StringArray::from_iter_values(
            self.observations.iter().map(|obs| obs.amino_acid.name()),
        );
        let mut columns: Vec<ArrayRef> = vec![Arc::new(labels)];
        for outcome in Outcome::ALL {
            let values =
                Float64Array::from_iter_values(self.observations.iter().map(|obs| obs.value(outcome)));
            columns.push(Arc::new(values));
        }

        Ok(RecordBatch::try_new(Arc::new(Self::schema()), columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(aa: AminoAcid, v: f64) -> Observation {
        Observation::new(
            aa,
            OutcomeValues {
                muscle_protein_synthesis: v,
                recovery_rate: v + 1.0,
                muscle_strength: v + 2.0,
                hypertrophy: v + 3.0,
            },
        )
    }

    #[test]
    fn test_rejects_empty_label_set() {
        let err = Dataset::from_observations(vec![], vec![]).unwrap_err();
        assert!(matches!(err, Error::EmptyLabelSet));
    }

    #[test]
    fn test_rejects_label_outside_set() {
        let err = Dataset::from_observations(
            vec![AminoAcid::Leucine],
            vec![obs(AminoAcid::Leucine, 1.0), obs(AminoAcid::Valine, 2.0)],
        )
        .unwrap_err();
        assert!(err.to_string().contains("Valine"));
    }

    #[test]
    fn test_rejects_duplicate_labels() {
        let err = Dataset::from_observations(
            vec![AminoAcid::Leucine, AminoAcid::Leucine],
            vec![],
        )
        .unwrap_err();
        assert!(err.to_string().contains("Duplicate"));
    }

    #[test]
    fn test_record_batch_layout() {
        let dataset = Dataset::from_observations(
            vec![AminoAcid::Leucine, AminoAcid::Glycine],
            vec![obs(AminoAcid::Leucine, 1.0), obs(AminoAcid::Glycine, 4.0)],
        )
        .unwrap();

        let batch = dataset.to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 5);

        let labels = batch.column(0).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(labels.value(1), "Glycine");

        let hypertrophy = batch.column(4).as_any().downcast_ref::<Float64Array>().unwrap();
        assert!((hypertrophy.value(1) - 7.0).abs() < f64::EPSILON);
        assert_eq!(dataset.column(Outcome::RecoveryRate), vec![2.0, 5.0]);
    }
}
