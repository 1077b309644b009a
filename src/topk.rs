//! Top-K selection for ranking labels by an outcome
//!
//! **Problem**: "which amino acids score highest" only needs the best K
//! rows, not a full sort.
//!
//! **Solution**: bounded binary heap, O(N log K) time and O(K) space.
//! Descending order keeps a min-heap of the K largest values seen so far;
//! ascending order keeps a max-heap of the K smallest. NaN values are
//! never selected.

use crate::Error;
use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, UInt32Array};
use arrow::compute::take_record_batch;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Sort order for Top-K selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Ascending order (smallest K values)
    Ascending,
    /// Descending order (largest K values)
    Descending,
}

/// Trait for Top-K selection on record batches
pub trait TopKSelection {
    /// Select top K rows by a numeric column
    ///
    /// Rows come back best-first. Supported column types are `Float64`
    /// and `Int64`.
    ///
    /// # Errors
    /// Returns error if:
    /// - K is zero
    /// - Column index is out of bounds
    /// - Column data type is not supported
    ///
    /// # Examples
    ///
    /// ```rust
    /// use amino_stats::topk::{TopKSelection, SortOrder};
    /// use arrow::array::{Float64Array, RecordBatch};
    /// use arrow::datatypes::{DataType, Field, Schema};
    /// use std::sync::Arc;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let schema = Arc::new(Schema::new(vec![
    ///     Field::new("hypertrophy", DataType::Float64, false),
    /// ]));
    /// let batch = RecordBatch::try_new(
    ///     schema,
    ///     vec![Arc::new(Float64Array::from(vec![6.1, 5.4, 6.8, 5.9]))],
    /// )?;
    ///
    /// let top2 = batch.top_k(0, 2, SortOrder::Descending)?;
    /// assert_eq!(top2.num_rows(), 2);
    /// # Ok(())
    /// # }
    /// ```
    fn top_k(&self, column_index: usize, k: usize, order: SortOrder) -> crate::Result<RecordBatch>;
}

impl TopKSelection for RecordBatch {
    fn top_k(&self, column_index: usize, k: usize, order: SortOrder) -> crate::Result<RecordBatch> {
        if k == 0 {
            return Err(Error::InvalidInput("k must be greater than 0".to_string()));
        }

        if column_index >= self.num_columns() {
            return Err(Error::InvalidInput(format!(
                "Column index {} out of bounds (batch has {} columns)",
                column_index,
                self.num_columns()
            )));
        }

        let indices = column_top_k(self.column(column_index), k, order)?;

        #[allow(clippy::cast_possible_truncation)]
        let take = UInt32Array::from_iter_values(indices.iter().map(|&i| i as u32));
        Ok(take_record_batch(self, &take)?)
    }
}

fn column_top_k(column: &ArrayRef, k: usize, order: SortOrder) -> crate::Result<Vec<usize>> {
    match column.data_type() {
        DataType::Float64 => {
            let array = column
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| Error::Other("Failed to downcast to Float64Array".to_string()))?;
            Ok(select_top_k(
                (0..array.len())
                    .filter(|&i| !array.is_null(i))
                    .map(|i| (i, array.value(i))),
                k,
                order,
            ))
        }
        DataType::Int64 => {
            let array = column
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| Error::Other("Failed to downcast to Int64Array".to_string()))?;
            Ok(select_top_k(
                (0..array.len())
                    .filter(|&i| !array.is_null(i))
                    .map(|i| (i, array.value(i))),
                k,
                order,
            ))
        }
        dt => Err(Error::InvalidInput(format!(
            "Top-K not supported for data type: {dt:?}"
        ))),
    }
}

/// Indices of the top K values of a slice, best-first
///
/// Returns fewer than `k` indices when the slice holds fewer non-NaN values.
#[must_use]
pub fn select_top_k_indices(values: &[f64], k: usize, order: SortOrder) -> Vec<usize> {
    select_top_k(values.iter().copied().enumerate(), k, order)
}

/// Heap entry; `descending` flips the comparison so the heap top is always
/// the current worst kept candidate
#[derive(Debug)]
struct HeapItem<V> {
    value: V,
    index: usize,
    descending: bool,
}

impl<V: PartialOrd> HeapItem<V> {
    fn rank(&self, other: &Self) -> Ordering {
        let by_value = self
            .value
            .partial_cmp(&other.value)
            .unwrap_or(Ordering::Equal);
        let by_value = if self.descending {
            by_value
        } else {
            by_value.reverse()
        };
        // Stable tie-break: earlier rows rank first
        by_value.then_with(|| other.index.cmp(&self.index))
    }
}

impl<V: PartialOrd> PartialEq for HeapItem<V> {
    fn eq(&self, other: &Self) -> bool {
        self.rank(other) == Ordering::Equal
    }
}

impl<V: PartialOrd> Eq for HeapItem<V> {}

impl<V: PartialOrd> Ord for HeapItem<V> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse: the heap top is the lowest-ranked item
        other.rank(self)
    }
}

impl<V: PartialOrd> PartialOrd for HeapItem<V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn select_top_k<V, I>(values: I, k: usize, order: SortOrder) -> Vec<usize>
where
    V: PartialOrd + Copy,
    I: IntoIterator<Item = (usize, V)>,
{
    if k == 0 {
        return Vec::new();
    }
    let descending = matches!(order, SortOrder::Descending);
    let mut heap: BinaryHeap<HeapItem<V>> = BinaryHeap::with_capacity(k);

    for (index, value) in values {
        // NaN is incomparable with itself
        if value.partial_cmp(&value).is_none() {
            continue;
        }
        let item = HeapItem {
            value,
            index,
            descending,
        };
        if heap.len() < k {
            heap.push(item);
        } else if let Some(worst) = heap.peek() {
            if item.rank(worst) == Ordering::Greater {
                heap.pop();
                heap.push(item);
            }
        }
    }

    let mut result = heap.into_vec();
    result.sort_by(|a, b| b.rank(a));
    result.into_iter().map(|item| item.index).collect()
}
