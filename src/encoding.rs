//! One-hot encoding over a fixed label set
//!
//! The label → feature-index mapping is built once from the closed label
//! set and shared (behind an `Arc`) by the estimator and every fitted
//! model. A label that happens not to be drawn still owns its column, so
//! the feature layout never drifts between runs.

use crate::amino::AminoAcid;
use crate::dataset::Dataset;
use crate::{Error, Result};

/// Fixed mapping from labels to feature columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    labels: Vec<AminoAcid>,
    index: [Option<usize>; AminoAcid::COUNT],
}

impl LabelEncoder {
    /// Build an encoder over a closed label set, in the given order
    ///
    /// # Errors
    /// Returns `EmptyLabelSet` for an empty set, `InvalidInput` for duplicates.
    pub fn new(labels: &[AminoAcid]) -> Result<Self> {
        if labels.is_empty() {
            return Err(Error::EmptyLabelSet);
        }
        let mut index = [None; AminoAcid::COUNT];
        for (column, &label) in labels.iter().enumerate() {
            let slot = &mut index[label as usize];
            if slot.is_some() {
                return Err(Error::InvalidInput(format!("Duplicate label in set: {label}")));
            }
            *slot = Some(column);
        }
        Ok(Self {
            labels: labels.to_vec(),
            index,
        })
    }

    /// Encoder over the dataset's own label set
    ///
    /// # Errors
    /// See [`LabelEncoder::new`].
    pub fn for_dataset(dataset: &Dataset) -> Result<Self> {
        Self::new(dataset.labels())
    }

    /// Number of indicator features
    #[must_use]
    pub fn width(&self) -> usize {
        self.labels.len()
    }

    /// Labels in feature order
    #[must_use]
    pub fn labels(&self) -> &[AminoAcid] {
        &self.labels
    }

    /// Feature column of a label, if it belongs to the set
    #[must_use]
    pub const fn column_of(&self, label: AminoAcid) -> Option<usize> {
        self.index[label as usize]
    }

    /// Label owning a feature column
    #[must_use]
    pub fn label_at(&self, column: usize) -> Option<AminoAcid> {
        self.labels.get(column).copied()
    }

    /// Indicator vector for one label
    ///
    /// # Errors
    /// Returns `InvalidInput` if the label is outside the encoder's set.
    pub fn encode(&self, label: AminoAcid) -> Result<Vec<f64>> {
        let column = self.require(label)?;
        let mut row = vec![0.0; self.width()];
        row[column] = 1.0;
        Ok(row)
    }

    /// Design matrix for selected dataset rows, in the given order
    ///
    /// # Errors
    /// Returns `InvalidInput` if a row index is out of range or a row's label
    /// is outside the encoder's set.
    pub fn design_matrix(&self, dataset: &Dataset, rows: &[usize]) -> Result<DesignMatrix> {
        let mut matrix = DesignMatrix::zeros(rows.len(), self.width());
        for (i, &row) in rows.iter().enumerate() {
            let obs = dataset.get(row).ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Row {row} out of range (dataset has {} rows)",
                    dataset.len()
                ))
            })?;
            let column = self.require(obs.amino_acid)?;
            matrix.set(i, column, 1.0);
        }
        Ok(matrix)
    }

    fn require(&self, label: AminoAcid) -> Result<usize> {
        self.column_of(label).ok_or_else(|| {
            Error::InvalidInput(format!("Label {label} is not part of the encoded set"))
        })
    }
}

/// Dense row-major feature matrix
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl DesignMatrix {
    /// All-zero matrix
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build from row vectors of equal width
    ///
    /// # Errors
    /// Returns `InvalidInput` if rows have different widths.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|r| r.len() != cols) {
            return Err(Error::InvalidInput(format!(
                "Row {bad} has {} columns, expected {cols}",
                rows[bad].len()
            )));
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data: rows.concat(),
        })
    }

    /// Number of rows
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// One row as a slice
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Element at (row, col)
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Set element at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    /// Keep only the given rows, in order
    #[must_use]
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let mut data = Vec::with_capacity(rows.len() * self.cols);
        for &r in rows {
            data.extend_from_slice(self.row(r));
        }
        Self {
            rows: rows.len(),
            cols: self.cols,
            data,
        }
    }

    /// Sum of each column
    #[must_use]
    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.cols];
        for i in 0..self.rows {
            for (sum, v) in sums.iter_mut().zip(self.row(i)) {
                *sum += v;
            }
        }
        sums
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Observation;
    use crate::outcome::OutcomeValues;

    #[test]
    fn test_fixed_mapping_follows_label_order() {
        let encoder =
            LabelEncoder::new(&[AminoAcid::Serine, AminoAcid::Leucine, AminoAcid::Proline]).unwrap();
        assert_eq!(encoder.width(), 3);
        assert_eq!(encoder.column_of(AminoAcid::Leucine), Some(1));
        assert_eq!(encoder.column_of(AminoAcid::Valine), None);
        assert_eq!(encoder.label_at(2), Some(AminoAcid::Proline));
        assert_eq!(encoder.encode(AminoAcid::Serine).unwrap(), vec![1.0, 0.0, 0.0]);
        assert!(encoder.encode(AminoAcid::Valine).is_err());
    }

    #[test]
    fn test_encoder_rejects_bad_sets() {
        assert!(matches!(LabelEncoder::new(&[]), Err(Error::EmptyLabelSet)));
        assert!(LabelEncoder::new(&[AminoAcid::Lysine, AminoAcid::Lysine]).is_err());
    }

    #[test]
    fn test_absent_label_keeps_its_column() {
        let dataset = Dataset::from_observations(
            vec![AminoAcid::Leucine, AminoAcid::Valine],
            vec![Observation::new(AminoAcid::Leucine, OutcomeValues::default())],
        )
        .unwrap();
        let encoder = LabelEncoder::for_dataset(&dataset).unwrap();
        let x = encoder.design_matrix(&dataset, &[0]).unwrap();
        assert_eq!(x.cols(), 2);
        assert_eq!(x.row(0), &[1.0, 0.0]);
        assert_eq!(x.column_sums(), vec![1.0, 0.0]);
        assert!(encoder.design_matrix(&dataset, &[5]).is_err());
    }

    #[test]
    fn test_design_matrix_from_rows() {
        let x = DesignMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(x.rows(), 2);
        assert!((x.get(1, 0) - 3.0).abs() < f64::EPSILON);
        assert_eq!(x.select_rows(&[1]).row(0), &[3.0, 4.0]);
        assert!(DesignMatrix::from_rows(&[vec![1.0], vec![1.0, 2.0]]).is_err());
    }
}
