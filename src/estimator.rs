//! Per-outcome linear models over one-hot encoded labels
//!
//! One train/test split is drawn and shared by all four outcome fits. Each
//! fit is independent: a degenerate training partition for one outcome is
//! reported for that outcome alone while the others still fit and score.
//!
//! Rows whose target value is not finite are left out of that outcome's
//! fit and score only.

use crate::amino::AminoAcid;
use crate::dataset::Dataset;
use crate::encoding::{DesignMatrix, LabelEncoder};
use crate::outcome::Outcome;
use crate::regression::{mean_squared_error, r2_score, LinearModel, LinearRegression};
use crate::split::TrainTestSplit;
use crate::{Error, Result};
use rand::Rng;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Linear model for one outcome, tied to the shared label encoding
#[derive(Debug, Clone)]
pub struct FittedModel {
    outcome: Outcome,
    encoder: Arc<LabelEncoder>,
    linear: LinearModel,
}

impl FittedModel {
    /// Outcome this model predicts
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Label encoding the model was fitted against
    #[must_use]
    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }

    /// Underlying least-squares model
    #[must_use]
    pub const fn linear(&self) -> &LinearModel {
        &self.linear
    }

    /// Coefficient of a label's indicator feature
    #[must_use]
    pub fn coefficient(&self, label: AminoAcid) -> Option<f64> {
        self.encoder
            .column_of(label)
            .map(|column| self.linear.coefficients()[column])
    }

    /// Predicted outcome for a label
    #[must_use]
    pub fn predict_label(&self, label: AminoAcid) -> Option<f64> {
        self.coefficient(label)
            .map(|coefficient| self.linear.intercept() + coefficient)
    }

    /// Predictions for encoded rows
    ///
    /// # Errors
    /// Returns `InvalidInput` if the design width does not match the encoding.
    pub fn predict(&self, x: &DesignMatrix) -> Result<Vec<f64>> {
        self.linear.predict(x)
    }

    /// `(label, coefficient)` pairs in feature order
    #[must_use]
    pub fn label_coefficients(&self) -> Vec<(AminoAcid, f64)> {
        self.encoder
            .labels()
            .iter()
            .copied()
            .zip(self.linear.coefficients().iter().copied())
            .collect()
    }
}

/// A fitted model with its held-out scores
#[derive(Debug, Clone)]
pub struct ModelFit {
    /// Fitted model
    pub model: FittedModel,
    /// Mean squared error on the test partition
    pub mse: f64,
    /// Coefficient of determination on the test partition
    pub r2: f64,
}

/// Outcome of fitting every metric against one split
#[derive(Debug)]
pub struct ModelResults {
    train_rows: usize,
    test_rows: usize,
    fits: BTreeMap<Outcome, Result<ModelFit>>,
}

impl ModelResults {
    /// Rows in the training partition
    #[must_use]
    pub const fn train_rows(&self) -> usize {
        self.train_rows
    }

    /// Rows in the held-out partition
    #[must_use]
    pub const fn test_rows(&self) -> usize {
        self.test_rows
    }

    /// Fit result for one outcome
    #[must_use]
    pub fn get(&self, outcome: Outcome) -> Option<&Result<ModelFit>> {
        self.fits.get(&outcome)
    }

    /// Every outcome's result, in outcome order
    pub fn iter(&self) -> impl Iterator<Item = (Outcome, &Result<ModelFit>)> {
        self.fits.iter().map(|(&outcome, fit)| (outcome, fit))
    }

    /// Outcomes that fitted successfully
    pub fn fitted(&self) -> impl Iterator<Item = (Outcome, &ModelFit)> {
        self.iter()
            .filter_map(|(outcome, fit)| fit.as_ref().ok().map(|fit| (outcome, fit)))
    }

    /// Outcomes whose fit failed
    pub fn failures(&self) -> impl Iterator<Item = (Outcome, &Error)> {
        self.iter()
            .filter_map(|(outcome, fit)| fit.as_ref().err().map(|err| (outcome, err)))
    }
}

/// Fits one linear model per outcome
#[derive(Debug, Clone)]
pub struct Estimator {
    encoder: Arc<LabelEncoder>,
    regression: LinearRegression,
}

impl Estimator {
    /// Estimator over a shared label encoding
    #[must_use]
    pub fn new(encoder: Arc<LabelEncoder>) -> Self {
        Self {
            encoder,
            regression: LinearRegression::new(),
        }
    }

    /// Estimator encoding the dataset's own label set
    ///
    /// # Errors
    /// See [`LabelEncoder::new`].
    pub fn for_dataset(dataset: &Dataset) -> Result<Self> {
        Ok(Self::new(Arc::new(LabelEncoder::for_dataset(dataset)?)))
    }

    /// The shared label encoding
    #[must_use]
    pub const fn encoder(&self) -> &Arc<LabelEncoder> {
        &self.encoder
    }

    /// Draw a split from `rng`, then fit every outcome against it
    ///
    /// # Errors
    /// See [`TrainTestSplit::shuffled`] and [`Estimator::fit`].
    pub fn fit_split<R: Rng>(
        &self,
        dataset: &Dataset,
        test_ratio: f64,
        rng: &mut R,
    ) -> Result<ModelResults> {
        let split = TrainTestSplit::shuffled(dataset.len(), test_ratio, rng)?;
        self.fit(dataset, &split)
    }

    /// Fit every outcome against a shared split
    ///
    /// Only encoding problems (split/dataset mismatch, labels outside the
    /// encoding) fail the whole call; per-outcome failures land in the
    /// returned [`ModelResults`].
    ///
    /// # Errors
    /// Returns `InvalidInput` if the split does not cover the dataset or a
    /// label cannot be encoded.
    pub fn fit(&self, dataset: &Dataset, split: &TrainTestSplit) -> Result<ModelResults> {
        if split.len() != dataset.len() {
            return Err(Error::InvalidInput(format!(
                "Split covers {} rows but dataset has {}",
                split.len(),
                dataset.len()
            )));
        }

        let x_train = self.encoder.design_matrix(dataset, split.train())?;
        let x_test = self.encoder.design_matrix(dataset, split.test())?;

        let fit_one =
            |outcome: Outcome| (outcome, self.fit_outcome(dataset, split, &x_train, &x_test, outcome));

        #[cfg(feature = "rayon")]
        let fits: BTreeMap<Outcome, Result<ModelFit>> =
            Outcome::ALL.par_iter().map(|&outcome| fit_one(outcome)).collect();
        #[cfg(not(feature = "rayon"))]
        let fits: BTreeMap<Outcome, Result<ModelFit>> =
            Outcome::ALL.iter().map(|&outcome| fit_one(outcome)).collect();

        for (outcome, fit) in &fits {
            match fit {
                Ok(fit) => info!(%outcome, mse = fit.mse, r2 = fit.r2, "fitted model"),
                Err(err) => warn!(%outcome, error = %err, "model fit failed"),
            }
        }

        Ok(ModelResults {
            train_rows: split.train().len(),
            test_rows: split.test().len(),
            fits,
        })
    }

    fn fit_outcome(
        &self,
        dataset: &Dataset,
        split: &TrainTestSplit,
        x_train: &DesignMatrix,
        x_test: &DesignMatrix,
        outcome: Outcome,
    ) -> Result<ModelFit> {
        let (train_keep, y_train) = finite_targets(dataset, split.train(), outcome);
        let x_fit = x_train.select_rows(&train_keep);

        let linear = self
            .regression
            .fit(&x_fit, &y_train)
            .map_err(|err| self.explain(err, outcome))?;

        let (test_keep, y_test) = finite_targets(dataset, split.test(), outcome);
        let predictions = linear.predict(&x_test.select_rows(&test_keep))?;
        let mse = mean_squared_error(&y_test, &predictions)?;
        let r2 = r2_score(&y_test, &predictions)?;

        Ok(ModelFit {
            model: FittedModel {
                outcome,
                encoder: Arc::clone(&self.encoder),
                linear,
            },
            mse,
            r2,
        })
    }

    /// Name the label behind a rank-deficient column
    fn explain(&self, err: Error, outcome: Outcome) -> Error {
        match err {
            Error::RankDeficient { column } => match self.encoder.label_at(column) {
                Some(label) => Error::DegenerateSplit { outcome, label },
                None => Error::RankDeficient { column },
            },
            other => other,
        }
    }
}

/// Positions (into `rows`) and values of finite targets
fn finite_targets(dataset: &Dataset, rows: &[usize], outcome: Outcome) -> (Vec<usize>, Vec<f64>) {
    rows.iter()
        .enumerate()
        .filter_map(|(pos, &row)| {
            let value = dataset.observations()[row].value(outcome);
            value.is_finite().then_some((pos, value))
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Observation;
    use crate::outcome::OutcomeValues;

    fn obs(aa: AminoAcid, v: f64) -> Observation {
        Observation::new(
            aa,
            OutcomeValues {
                muscle_protein_synthesis: v,
                recovery_rate: v * 2.0,
                muscle_strength: v + 1.0,
                hypertrophy: v - 1.0,
            },
        )
    }

    fn two_label_dataset() -> Dataset {
        Dataset::from_observations(
            vec![AminoAcid::Leucine, AminoAcid::Valine],
            vec![
                obs(AminoAcid::Leucine, 10.0),
                obs(AminoAcid::Valine, 4.0),
                obs(AminoAcid::Leucine, 12.0),
                obs(AminoAcid::Valine, 6.0),
                obs(AminoAcid::Leucine, 11.0),
                obs(AminoAcid::Valine, 5.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_coefficients_are_training_means() {
        let dataset = two_label_dataset();
        let split = TrainTestSplit::from_indices(6, vec![0, 1, 2, 3], vec![4, 5]).unwrap();
        let results = Estimator::for_dataset(&dataset).unwrap().fit(&dataset, &split).unwrap();

        let fit = results.get(Outcome::MuscleProteinSynthesis).unwrap().as_ref().unwrap();
        assert!((fit.model.coefficient(AminoAcid::Leucine).unwrap() - 11.0).abs() < 1e-9);
        assert!((fit.model.coefficient(AminoAcid::Valine).unwrap() - 5.0).abs() < 1e-9);
        // Test rows equal the training means exactly
        assert!(fit.mse.abs() < 1e-12);
        assert!((fit.r2 - 1.0).abs() < 1e-9);
        assert_eq!(results.train_rows(), 4);
        assert_eq!(results.test_rows(), 2);
    }

    #[test]
    fn test_missing_training_label_fails_every_outcome() {
        let dataset = two_label_dataset();
        let split = TrainTestSplit::from_indices(6, vec![0, 2, 4], vec![1, 3, 5]).unwrap();
        let results = Estimator::for_dataset(&dataset).unwrap().fit(&dataset, &split).unwrap();

        assert_eq!(results.failures().count(), 4);
        for (outcome, err) in results.failures() {
            assert!(matches!(
                err,
                Error::DegenerateSplit { outcome: o, label: AminoAcid::Valine } if *o == outcome
            ));
        }
    }

    #[test]
    fn test_split_must_cover_dataset() {
        let dataset = two_label_dataset();
        let split = TrainTestSplit::from_indices(4, vec![0, 1, 2], vec![3]).unwrap();
        let err = Estimator::for_dataset(&dataset).unwrap().fit(&dataset, &split).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_predict_label_outside_encoding() {
        let dataset = two_label_dataset();
        let split = TrainTestSplit::from_indices(6, vec![0, 1, 2, 3], vec![4, 5]).unwrap();
        let results = Estimator::for_dataset(&dataset).unwrap().fit(&dataset, &split).unwrap();
        let fit = results.get(Outcome::RecoveryRate).unwrap().as_ref().unwrap();
        assert!((fit.model.predict_label(AminoAcid::Valine).unwrap() - 10.0).abs() < 1e-9);
        assert!(fit.model.predict_label(AminoAcid::Glycine).is_none());
        assert_eq!(fit.model.label_coefficients().len(), 2);
    }
}
