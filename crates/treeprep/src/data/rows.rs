//! Row accumulation.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Append `new_row` to the single row held by `existing`.
///
/// An empty `existing` (no rows) yields `new_row` wrapped as a one-row
/// matrix. Otherwise the result is the first row of `existing` followed by
/// the values of `new_row`, still as a one-row matrix. The inputs are never
/// modified.
pub fn concat_rows(existing: ArrayView2<'_, f64>, new_row: ArrayView1<'_, f64>) -> Array2<f64> {
    debug_assert!(existing.nrows() <= 1, "accumulator must hold a single row");

    let row: Array1<f64> = if existing.nrows() == 0 {
        new_row.to_owned()
    } else {
        existing.row(0).iter().chain(new_row.iter()).copied().collect()
    };
    row.insert_axis(Axis(0))
}
