//! Error types shared across the crate.
//!
//! Each concern has its own error enum; [`Error`] wraps them for callers that
//! drive the whole pipeline and only want one error type.

use crate::model::PipelineError;

/// A column specification could not be turned into a valid transform.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// `type` is neither `numeric` nor `categorical`.
    #[error("{type_name:?} is not a valid spec type (column {index})")]
    UnknownType { index: usize, type_name: String },

    /// Numeric spec carries neither standardize nor binarize fields.
    #[error("column {index}: numeric spec has neither `stdev` nor `zero_value`")]
    InvalidNumericSpec { index: usize },

    /// The selected transform lacks one of its fields.
    #[error("column {index}: missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    /// Spec index points past the end of the raw row.
    #[error("column {index} is out of range for a row with {n_columns} values")]
    ColumnOutOfRange { index: usize, n_columns: usize },
}

/// The model has the wrong shape for the requested operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelTypeError {
    /// Single-tree model where an ensemble is needed.
    #[error("model is a single tree, an ensemble of trees is required")]
    NotAnEnsemble,

    /// Ensemble without trees.
    #[error("ensemble contains no trees")]
    EmptyEnsemble,
}

/// Evaluation failed on the supplied data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// A split on the taken path reads past the end of the row.
    #[error("node {node} splits on feature {feature} but the row has {n_features} features")]
    FeatureOutOfRange {
        node: u32,
        feature: usize,
        n_features: usize,
    },

    /// A model range extends past the input width.
    #[error("feature range {start}..{end} exceeds input width {n_features}")]
    RangeOutOfBounds {
        start: usize,
        end: usize,
        n_features: usize,
    },

    /// Input matrix has no rows.
    #[error("input matrix has no rows")]
    EmptyInput,
}

/// Crate-level error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid column spec.
    #[error("invalid column spec: {0}")]
    Config(#[from] ConfigError),

    /// Wrong model shape.
    #[error("model type mismatch: {0}")]
    ModelType(#[from] ModelTypeError),

    /// Evaluation failure.
    #[error("evaluation failed: {0}")]
    Eval(#[from] EvalError),

    /// Pipeline failed structural validation.
    #[error("invalid pipeline: {0}")]
    Pipeline(#[from] PipelineError),

    /// Malformed JSON input.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
