//! Multi-model composition over disjoint feature ranges.

use ndarray::{s, Array1, Array2, ArrayView2};

use crate::data::concat_rows;
use crate::error::{EvalError, Result};
use crate::repr::ModelRangeEntry;
use crate::utils::Parallelism;

use super::embed::embed_with;

/// Embed each feature range of `x` with its model and append the first row.
///
/// Equivalent to [`compose_embeddings_with`] using
/// [`Parallelism::Sequential`].
pub fn compose_embeddings(x: ArrayView2<'_, f64>, entries: &[ModelRangeEntry]) -> Result<Array1<f64>> {
    compose_embeddings_with(x, entries, Parallelism::Sequential)
}

/// Embed each feature range of `x` with its model and append the first row.
///
/// For every entry, in order, the columns `entry.range` of all rows are
/// embedded with `entry.model` (see [`embed_with`](super::embed_with)) and
/// the embedding is appended to the output. The unsliced first row of `x` is
/// appended last. With no entries the output is exactly `x.row(0)`.
///
/// # Errors
///
/// - [`EvalError::EmptyInput`] if `x` has no rows
/// - [`EvalError::RangeOutOfBounds`] if an entry's range exceeds the width of `x`
/// - any error of [`embed_with`](super::embed_with)
pub fn compose_embeddings_with(
    x: ArrayView2<'_, f64>,
    entries: &[ModelRangeEntry],
    parallelism: Parallelism,
) -> Result<Array1<f64>> {
    if x.nrows() == 0 {
        return Err(EvalError::EmptyInput.into());
    }

    let mut out = Array2::zeros((0, 0));
    for entry in entries {
        let (start, end) = (entry.range.start, entry.range.end);
        if start > end || end > x.ncols() {
            return Err(EvalError::RangeOutOfBounds {
                start,
                end,
                n_features: x.ncols(),
            }
            .into());
        }

        let inputs = x.slice(s![.., start..end]);
        let embedding = embed_with(inputs, &entry.model, parallelism)?;
        out = concat_rows(out.view(), embedding.row(0));
    }

    let out = concat_rows(out.view(), x.row(0));
    Ok(out.row(0).to_owned())
}
