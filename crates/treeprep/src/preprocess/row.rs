//! Row preprocessing.

use ndarray::{Array2, Axis};

use crate::data::{concat_rows, RawValue};
use crate::error::ConfigError;
use crate::utils::Parallelism;

use super::spec::ColumnSpec;
use super::transform::transform;

/// Transform one raw row into a one-row feature matrix.
///
/// Specs are applied in order and their outputs concatenated, so the output
/// column order follows `specs`, not the column order of `raw_row`. An empty
/// `specs` yields a single empty row.
///
/// # Errors
///
/// [`ConfigError::ColumnOutOfRange`] when a spec's index is outside `raw_row`.
pub fn preprocess_row(raw_row: &[RawValue], specs: &[ColumnSpec]) -> Result<Array2<f64>, ConfigError> {
    let mut out = Array2::zeros((0, 0));
    for spec in specs {
        let value = raw_row
            .get(spec.index)
            .ok_or(ConfigError::ColumnOutOfRange {
                index: spec.index,
                n_columns: raw_row.len(),
            })?;
        let column = transform(std::slice::from_ref(value), spec);
        out = concat_rows(out.view(), column.view());
    }

    if out.nrows() == 0 {
        out = Array2::zeros((1, 0));
    }
    Ok(out)
}

/// Preprocess a batch of raw rows into an `(n_rows, width)` matrix.
///
/// Rows are processed in parallel when `parallelism` allows it; output row
/// order follows input order.
pub fn preprocess_rows<R>(
    rows: &[R],
    specs: &[ColumnSpec],
    parallelism: Parallelism,
) -> Result<Array2<f64>, ConfigError>
where
    R: AsRef<[RawValue]> + Sync,
{
    let width: usize = specs.iter().map(ColumnSpec::output_width).sum();
    let processed = parallelism.maybe_par_map(0..rows.len(), |i| {
        preprocess_row(rows[i].as_ref(), specs)
    });

    let mut out = Array2::zeros((rows.len(), width));
    for (mut dst, row) in out.axis_iter_mut(Axis(0)).zip(processed) {
        dst.assign(&row?.row(0));
    }
    Ok(out)
}
