//! Ensemble embeddings.

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::error::{EvalError, ModelTypeError, Result};
use crate::repr::{Forest, Model};
use crate::utils::Parallelism;

/// Embed a batch of rows with an ensemble.
///
/// Equivalent to [`embed_with`] using [`Parallelism::Sequential`].
pub fn embed(rows: ArrayView2<'_, f64>, model: &Model) -> Result<Array2<f64>> {
    embed_with(rows, model, Parallelism::Sequential)
}

/// Embed a batch of rows with an ensemble.
///
/// Every tree is evaluated on every row and the predictions are summed per
/// row. With more than one row the sums are divided by their total (an L1
/// normalization across rows); with a single row the sum is divided by the
/// number of trees. The result is a `(1, n_rows)` matrix.
///
/// A zero or non-finite total is not guarded against: the resulting
/// non-finite values are returned as is.
///
/// # Errors
///
/// - [`ModelTypeError::NotAnEnsemble`] for a single-tree model
/// - [`ModelTypeError::EmptyEnsemble`] for an ensemble without trees
/// - [`EvalError::FeatureOutOfRange`] if a tree reads past the end of a row
pub fn embed_with(
    rows: ArrayView2<'_, f64>,
    model: &Model,
    parallelism: Parallelism,
) -> Result<Array2<f64>> {
    let forest = model.as_ensemble()?;
    if forest.is_empty() {
        return Err(ModelTypeError::EmptyEnsemble.into());
    }

    let sums = parallelism.maybe_par_map(0..rows.nrows(), |i| sum_row(forest, rows, i));
    let mut preds = sums.into_iter().collect::<std::result::Result<Array1<f64>, _>>()?;

    if preds.len() > 1 {
        let norm: f64 = preds.iter().sum();
        if norm == 0.0 || !norm.is_finite() {
            tracing::warn!(norm, n_rows = preds.len(), "embedding normalizer is not a finite non-zero value");
        }
        preds.mapv_inplace(|p| p / norm);
    } else {
        let n_trees = forest.n_trees() as f64;
        preds.mapv_inplace(|p| p / n_trees);
    }

    tracing::trace!(n_rows = rows.nrows(), n_trees = forest.n_trees(), "computed embedding");
    Ok(preds.insert_axis(Axis(0)))
}

/// Sum of all tree predictions for row `i`, accumulated in ensemble order.
fn sum_row(forest: &Forest, rows: ArrayView2<'_, f64>, i: usize) -> std::result::Result<f64, EvalError> {
    let row = rows.row(i);
    let mut trees = forest.trees();
    let first = match trees.next() {
        Some(tree) => tree.evaluate(&row)?,
        None => return Ok(0.0),
    };
    trees.try_fold(first, |acc, tree| Ok(acc + tree.evaluate(&row)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    use crate::error::Error;
    use crate::repr::{Tree, TreeNode};

    fn stump(threshold: f64, left: f64, right: f64) -> Tree {
        Tree::from_node(&TreeNode::split(0, threshold, TreeNode::leaf(left), TreeNode::leaf(right)))
    }

    fn ensemble(trees: Vec<Tree>) -> Model {
        Model::Ensemble(trees.into_iter().collect())
    }

    #[test]
    fn multiple_rows_are_l1_normalized() {
        let model = ensemble(vec![stump(0.5, 1.0, 3.0), stump(0.5, 1.0, 1.0)]);
        let rows = array![[0.0], [1.0]];
        // Sums: row0 = 2, row1 = 4, total = 6.
        let out = embed(rows.view(), &model).unwrap();
        assert_eq!(out.dim(), (1, 2));
        assert_abs_diff_eq!(out, array![[2.0 / 6.0, 4.0 / 6.0]], epsilon = 1e-12);
    }

    #[test]
    fn single_row_is_averaged_over_trees() {
        let model = ensemble(vec![Tree::leaf(2.0), Tree::leaf(2.0), Tree::leaf(2.0)]);
        let out = embed(array![[9.0]].view(), &model).unwrap();
        assert_abs_diff_eq!(out, array![[2.0]], epsilon = 1e-12);

        let model = ensemble(vec![stump(0.5, 1.0, 4.0), Tree::leaf(2.0)]);
        let out = embed(array![[1.0]].view(), &model).unwrap();
        assert_abs_diff_eq!(out, array![[3.0]], epsilon = 1e-12);
    }

    #[test]
    fn zero_sum_yields_non_finite_values() {
        let model = ensemble(vec![stump(0.5, -1.0, 1.0)]);
        let out = embed(array![[0.0], [1.0]].view(), &model).unwrap();
        // -1 / 0 and 1 / 0
        assert_eq!(out[[0, 0]], f64::NEG_INFINITY);
        assert_eq!(out[[0, 1]], f64::INFINITY);

        let model = ensemble(vec![Tree::leaf(0.0)]);
        let out = embed(array![[0.0], [1.0]].view(), &model).unwrap();
        assert!(out.iter().all(|x| x.is_nan()));
    }

    #[test]
    fn single_tree_is_rejected() {
        let model = Model::Tree(Tree::leaf(1.0));
        let err = embed(array![[0.0]].view(), &model).unwrap_err();
        assert!(matches!(err, Error::ModelType(ModelTypeError::NotAnEnsemble)));
    }

    #[test]
    fn empty_ensemble_is_rejected() {
        let model = Model::Ensemble(Forest::new());
        let err = embed(array![[0.0]].view(), &model).unwrap_err();
        assert!(matches!(err, Error::ModelType(ModelTypeError::EmptyEnsemble)));
    }

    #[test]
    fn out_of_range_feature_is_an_error() {
        let model = ensemble(vec![Tree::from_node(&TreeNode::split(
            3,
            0.0,
            TreeNode::leaf(1.0),
            TreeNode::leaf(2.0),
        ))]);
        let err = embed(array![[0.0, 1.0]].view(), &model).unwrap_err();
        assert!(matches!(err, Error::Eval(EvalError::FeatureOutOfRange { feature: 3, .. })));
    }

    #[test]
    fn no_rows_gives_empty_embedding() {
        let model = ensemble(vec![Tree::leaf(1.0)]);
        let rows = Array2::<f64>::zeros((0, 2));
        let out = embed(rows.view(), &model).unwrap();
        assert_eq!(out.dim(), (1, 0));
    }

    #[test]
    fn parallel_matches_sequential() {
        let model = ensemble(vec![stump(0.3, 0.1, 0.7), stump(0.6, 0.2, 0.9), Tree::leaf(0.05)]);
        let rows = Array2::from_shape_fn((257, 1), |(i, _)| (i as f64) / 257.0);
        let seq = embed_with(rows.view(), &model, Parallelism::Sequential).unwrap();
        let par = embed_with(rows.view(), &model, Parallelism::Parallel).unwrap();
        assert_eq!(seq, par);
    }
}
