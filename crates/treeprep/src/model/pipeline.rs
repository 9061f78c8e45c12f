//! End-to-end feature pipeline: column preprocessing followed by optional
//! tree-ensemble embeddings.

use std::io::Read;

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::data::RawValue;
use crate::error::{ModelTypeError, Result};
use crate::inference::compose_embeddings;
use crate::preprocess::{preprocess_row, ColumnSpec};
use crate::repr::ModelRangeEntry;
use crate::utils::run_with_threads;

use super::config::{PipelineConfig, PipelineConfigError};

/// Structural problems found while building a [`FeaturePipeline`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// An entry's feature range ends past the preprocessed row.
    #[error("entry {entry}: feature range {start}..{end} exceeds preprocessed width {width}")]
    RangeOutOfBounds {
        entry: usize,
        start: usize,
        end: usize,
        width: usize,
    },

    /// A tree splits on a feature outside its entry's range.
    #[error("entry {entry}, tree {tree}: splits on feature {feature} but the range has {width} features")]
    FeatureOutOfRange {
        entry: usize,
        tree: usize,
        feature: usize,
        width: usize,
    },

    /// A tree is deeper than `max_tree_depth`.
    #[error("entry {entry}, tree {tree}: depth {depth} exceeds max_tree_depth {max_depth}")]
    TreeTooDeep {
        entry: usize,
        tree: usize,
        depth: usize,
        max_depth: usize,
    },

    /// An entry's model is not a non-empty ensemble, so it cannot be embedded.
    #[error("entry {entry}: {source}")]
    InvalidModel {
        entry: usize,
        #[source]
        source: ModelTypeError,
    },

    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] PipelineConfigError),
}

/// Wire form of a [`FeaturePipeline`].
///
/// ```json
/// {
///   "preprocess": [{"index": 0, "type": "numeric", "mean": 0, "stdev": 1}],
///   "trees": [[[0, 1], [[0, 2.5, [1.0], [0.0]]]]]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSchema {
    pub preprocess: Vec<ColumnSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trees: Vec<ModelRangeEntry>,
}

/// Raw rows in, model-ready feature vectors out.
///
/// Each raw row is preprocessed column by column. When tree entries are
/// present the preprocessed row is then embedded range by range and the
/// embeddings are placed in front of the preprocessed features.
#[derive(Debug, Clone)]
pub struct FeaturePipeline {
    specs: Vec<ColumnSpec>,
    trees: Vec<ModelRangeEntry>,
    config: PipelineConfig,
}

impl FeaturePipeline {
    /// Build and validate a pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the config is invalid, an entry's range
    /// exceeds the preprocessed width, an entry's model is a single tree or
    /// an empty ensemble, a tree reads a feature outside its range, or a tree
    /// is deeper than `config.max_tree_depth`.
    pub fn new(
        specs: Vec<ColumnSpec>,
        trees: Vec<ModelRangeEntry>,
        config: PipelineConfig,
    ) -> std::result::Result<Self, PipelineError> {
        config.validate()?;
        let pipeline = Self {
            specs,
            trees,
            config,
        };
        pipeline.validate()?;

        tracing::debug!(
            n_specs = pipeline.specs.len(),
            n_entries = pipeline.trees.len(),
            output_width = pipeline.output_width(),
            "built feature pipeline"
        );
        Ok(pipeline)
    }

    pub fn from_schema(schema: PipelineSchema, config: PipelineConfig) -> std::result::Result<Self, PipelineError> {
        Self::new(schema.preprocess, schema.trees, config)
    }

    pub fn from_json_str(json: &str, config: PipelineConfig) -> Result<Self> {
        let schema: PipelineSchema = serde_json::from_str(json)?;
        Ok(Self::from_schema(schema, config)?)
    }

    pub fn from_reader<R: Read>(reader: R, config: PipelineConfig) -> Result<Self> {
        let schema: PipelineSchema = serde_json::from_reader(reader)?;
        Ok(Self::from_schema(schema, config)?)
    }

    /// Wire form of this pipeline.
    pub fn to_schema(&self) -> PipelineSchema {
        PipelineSchema {
            preprocess: self.specs.clone(),
            trees: self.trees.clone(),
        }
    }

    fn validate(&self) -> std::result::Result<(), PipelineError> {
        let width = self.output_width();
        for (entry_idx, entry) in self.trees.iter().enumerate() {
            if entry.range.end > width {
                return Err(PipelineError::RangeOutOfBounds {
                    entry: entry_idx,
                    start: entry.range.start,
                    end: entry.range.end,
                    width,
                });
            }

            let forest = entry
                .model
                .as_ensemble()
                .map_err(|source| PipelineError::InvalidModel {
                    entry: entry_idx,
                    source,
                })?;
            if forest.is_empty() {
                return Err(PipelineError::InvalidModel {
                    entry: entry_idx,
                    source: ModelTypeError::EmptyEnsemble,
                });
            }

            for (tree_idx, tree) in forest.trees().enumerate() {
                if let Some(feature) = tree.max_feature_index() {
                    if feature >= entry.width() {
                        return Err(PipelineError::FeatureOutOfRange {
                            entry: entry_idx,
                            tree: tree_idx,
                            feature,
                            width: entry.width(),
                        });
                    }
                }
                if let Some(max_depth) = self.config.max_tree_depth {
                    let depth = tree.depth();
                    if depth > max_depth {
                        return Err(PipelineError::TreeTooDeep {
                            entry: entry_idx,
                            tree: tree_idx,
                            depth,
                            max_depth,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn specs(&self) -> &[ColumnSpec] {
        &self.specs
    }

    pub fn trees(&self) -> &[ModelRangeEntry] {
        &self.trees
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Width of a preprocessed row.
    pub fn output_width(&self) -> usize {
        self.specs.iter().map(ColumnSpec::output_width).sum()
    }

    /// Width of a row returned by [`transform_row`](Self::transform_row).
    pub fn transformed_width(&self) -> usize {
        // Each entry embeds the single preprocessed row into one value.
        self.trees.len() + self.output_width()
    }

    // =========================================================================
    // Transforms
    // =========================================================================

    /// Transform one raw row.
    pub fn transform_row(&self, raw_row: &[RawValue]) -> Result<Array1<f64>> {
        let x = preprocess_row(raw_row, &self.specs)?;
        if self.trees.is_empty() {
            return Ok(x.row(0).to_owned());
        }
        compose_embeddings(x.view(), &self.trees)
    }

    /// Transform a batch of raw rows into an `(n_rows, transformed_width)`
    /// matrix, using `config.n_threads` threads.
    pub fn transform_batch<R>(&self, rows: &[R]) -> Result<Array2<f64>>
    where
        R: AsRef<[RawValue]> + Sync,
    {
        let n_threads = self.config.thread_count();
        tracing::debug!(n_rows = rows.len(), n_threads, "transforming batch");

        let transformed = run_with_threads(n_threads, |parallelism| {
            parallelism.maybe_par_map(0..rows.len(), |i| self.transform_row(rows[i].as_ref()))
        });

        let mut out = Array2::zeros((rows.len(), self.transformed_width()));
        for (mut dst, row) in out.axis_iter_mut(Axis(0)).zip(transformed) {
            dst.assign(&row?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    use crate::error::{ConfigError, Error};
    use crate::repr::{Forest, Tree, TreeNode};

    fn stump(feature: usize, threshold: f64) -> Tree {
        Tree::from_node(&TreeNode::split(feature, threshold, TreeNode::leaf(1.0), TreeNode::leaf(0.0)))
    }

    fn pipeline(trees: Vec<ModelRangeEntry>) -> std::result::Result<FeaturePipeline, PipelineError> {
        FeaturePipeline::new(
            vec![
                ColumnSpec::standardize(0, 0.0, 1.0),
                ColumnSpec::one_hot(1, ["a", "b"]),
            ],
            trees,
            PipelineConfig::default(),
        )
    }

    #[test]
    fn preprocess_only() {
        let p = pipeline(Vec::new()).unwrap();
        assert_eq!(p.output_width(), 3);
        assert_eq!(p.transformed_width(), 3);
        let out = p.transform_row(&[2.0.into(), "b".into()]).unwrap();
        assert_eq!(out, array![2.0, 0.0, 1.0]);
    }

    #[test]
    fn with_tree_embeddings() {
        let entry = ModelRangeEntry::new(0..1, Forest::from_iter([stump(0, 2.5), Tree::leaf(0.5)]));
        let p = pipeline(vec![entry]).unwrap();
        assert_eq!(p.transformed_width(), 4);

        let out = p.transform_row(&[2.0.into(), "a".into()]).unwrap();
        // (1.0 + 0.5) / 2 trees, then the preprocessed row.
        assert_abs_diff_eq!(out, array![0.75, 2.0, 1.0, 0.0], epsilon = 1e-12);
    }

    #[test]
    fn range_past_output_width_is_rejected() {
        let entry = ModelRangeEntry::new(2..4, Forest::from_iter([Tree::leaf(1.0)]));
        let err = pipeline(vec![entry]).unwrap_err();
        assert_eq!(
            err,
            PipelineError::RangeOutOfBounds { entry: 0, start: 2, end: 4, width: 3 }
        );
    }

    #[test]
    fn tree_feature_outside_range_is_rejected() {
        let entry = ModelRangeEntry::new(1..3, Forest::from_iter([Tree::leaf(1.0), stump(2, 0.0)]));
        let err = pipeline(vec![entry]).unwrap_err();
        assert_eq!(
            err,
            PipelineError::FeatureOutOfRange { entry: 0, tree: 1, feature: 2, width: 2 }
        );
    }

    #[test]
    fn depth_limit_is_enforced() {
        let deep = Tree::from_node(&TreeNode::split(
            0,
            0.0,
            TreeNode::split(0, -1.0, TreeNode::leaf(1.0), TreeNode::leaf(2.0)),
            TreeNode::leaf(3.0),
        ));
        let entry = ModelRangeEntry::new(0..1, Forest::from_iter([deep]));
        let config = PipelineConfig::builder().max_tree_depth(1).build().unwrap();
        let err = FeaturePipeline::new(vec![ColumnSpec::standardize(0, 0.0, 1.0)], vec![entry], config)
            .unwrap_err();
        assert_eq!(
            err,
            PipelineError::TreeTooDeep { entry: 0, tree: 0, depth: 2, max_depth: 1 }
        );
    }

    #[test]
    fn single_tree_entry_is_rejected() {
        let entry = ModelRangeEntry::new(0..1, stump(0, 2.5));
        let err = pipeline(vec![entry]).unwrap_err();
        assert_eq!(
            err,
            PipelineError::InvalidModel { entry: 0, source: ModelTypeError::NotAnEnsemble }
        );
    }

    #[test]
    fn empty_ensemble_entry_is_rejected() {
        let json = r#"{
            "preprocess": [{"index": 0, "type": "numeric", "mean": 0, "stdev": 1}],
            "trees": [
                [[0, 1], [[0, 2.5, [1.0], [0.0]]]],
                [[0, 1], []]
            ]
        }"#;
        let err = FeaturePipeline::from_json_str(json, PipelineConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Pipeline(PipelineError::InvalidModel {
                entry: 1,
                source: ModelTypeError::EmptyEnsemble
            })
        ));
    }

    #[test]
    fn config_is_kept() {
        let config = PipelineConfig::builder()
            .n_threads(std::num::NonZeroUsize::new(2).unwrap())
            .build()
            .unwrap();
        let p = FeaturePipeline::new(vec![ColumnSpec::standardize(0, 0.0, 1.0)], Vec::new(), config)
            .unwrap();
        assert_eq!(p.config().thread_count(), 2);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = PipelineConfig {
            n_threads: None,
            max_tree_depth: Some(0),
        };
        let err = FeaturePipeline::new(Vec::new(), Vec::new(), config).unwrap_err();
        assert_eq!(err, PipelineError::Config(PipelineConfigError::InvalidMaxDepth(0)));
    }

    #[test]
    fn batch_matches_rows() {
        let entry = ModelRangeEntry::new(0..1, Forest::from_iter([stump(0, 2.5)]));
        let p = pipeline(vec![entry]).unwrap();
        let rows: Vec<Vec<RawValue>> = vec![
            vec![2.0.into(), "a".into()],
            vec![3.0.into(), "b".into()],
            vec![1.0.into(), "c".into()],
        ];
        let out = p.transform_batch(&rows).unwrap();
        assert_eq!(out.dim(), (3, 4));
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(out.row(i), p.transform_row(row).unwrap());
        }
    }

    #[test]
    fn batch_surfaces_row_errors() {
        let p = pipeline(Vec::new()).unwrap();
        let rows: Vec<Vec<RawValue>> = vec![vec![1.0.into(), "a".into()], vec![1.0.into()]];
        let err = p.transform_batch(&rows).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::ColumnOutOfRange { index: 1, n_columns: 1 })
        ));
    }

    #[test]
    fn json_round_trip() {
        let json = r#"{
            "preprocess": [
                {"index": 1, "type": "numeric", "zero_value": 0, "one_value": 1},
                {"index": 0, "type": "categorical", "values": ["x", "y"]}
            ],
            "trees": [[[0, 3], [[2, 0.5, [1.0], [0.0]]]]]
        }"#;
        let p = FeaturePipeline::from_json_str(json, PipelineConfig::default()).unwrap();
        assert_eq!(p.specs().len(), 2);
        assert_eq!(p.trees().len(), 1);

        let schema = serde_json::to_string(&p.to_schema()).unwrap();
        let again = FeaturePipeline::from_json_str(&schema, PipelineConfig::default()).unwrap();
        assert_eq!(again.specs(), p.specs());
        assert_eq!(again.trees(), p.trees());
    }
}
