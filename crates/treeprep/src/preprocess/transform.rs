//! Per-column transforms.
//!
//! All transforms are element-wise maps that return new arrays; inputs are
//! never modified.

use ndarray::{Array1, Array2, ArrayView1};

use crate::data::{to_numeric_array, RawValue};

use super::spec::{ColumnSpec, ColumnTransform};

/// Center by `mean` and, when `stdev > 0`, scale by `stdev`.
pub fn standardize(values: ArrayView1<'_, f64>, mean: f64, stdev: f64) -> Array1<f64> {
    values.mapv(|x| {
        let centered = x - mean;
        if stdev > 0.0 {
            centered / stdev
        } else {
            centered
        }
    })
}

/// Map values equal to `one_value` to `1.0` and everything else to `0.0`.
///
/// `zero_value` is part of the column spec wire format
/// and does not take part in the decision.
pub fn binarize(values: ArrayView1<'_, f64>, _zero_value: f64, one_value: f64) -> Array1<f64> {
    values.mapv(|x| if x == one_value { 1.0 } else { 0.0 })
}

/// One-hot encode `values` against the ordered `labels`.
///
/// Returns a `(values.len(), labels.len())` matrix. A value matches a label
/// only if it is text equal to that label; values matching no label produce
/// an all-zero row.
pub fn one_hot<S: AsRef<str>>(values: &[RawValue], labels: &[S]) -> Array2<f64> {
    let mut out = Array2::zeros((values.len(), labels.len()));
    for (row, value) in values.iter().enumerate() {
        let position = value
            .as_text()
            .and_then(|text| labels.iter().position(|label| label.as_ref() == text));
        if let Some(col) = position {
            out[[row, col]] = 1.0;
        }
    }
    out
}

/// Apply `spec` to the values of one column.
///
/// Numeric specs coerce the values first and return one output per value.
/// Categorical specs return the one-hot row of the first value, or an
/// all-zero row when `values` is empty.
pub fn transform(values: &[RawValue], spec: &ColumnSpec) -> Array1<f64> {
    match &spec.transform {
        ColumnTransform::Standardize { mean, stdev } => {
            standardize(to_numeric_array(values).view(), *mean, *stdev)
        }
        ColumnTransform::Binarize {
            zero_value,
            one_value,
        } => binarize(to_numeric_array(values).view(), *zero_value, *one_value),
        ColumnTransform::OneHot { values: labels } => {
            let encoded = one_hot(values, labels);
            if encoded.nrows() == 0 {
                Array1::zeros(labels.len())
            } else {
                encoded.row(0).to_owned()
            }
        }
    }
}
