//! treeprep: feature preprocessing and tree-ensemble embeddings.
//!
//! Turns raw feature rows into dense numeric vectors ready for model
//! scoring:
//!
//! - [`preprocess`] standardizes, binarizes and one-hot encodes columns
//!   according to per-column specifications
//! - [`repr`] holds decision trees and ensembles
//! - [`inference`] evaluates ensembles into embeddings and composes
//!   embeddings of several feature ranges with the original features
//! - [`model`] wires both stages into a [`FeaturePipeline`]
//!
//! # Key Types
//!
//! - [`ColumnSpec`] - how to transform one raw column
//! - [`Tree`] / [`Model`] / [`ModelRangeEntry`] - trees, ensembles and their feature ranges
//! - [`FeaturePipeline`] / [`PipelineConfig`] - end-to-end transformation
//!
//! All operations are synchronous and stateless; inputs are never modified.

pub mod data;
pub mod error;
pub mod inference;
pub mod model;
pub mod preprocess;
pub mod repr;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use data::RawValue;
pub use error::{ConfigError, Error, EvalError, ModelTypeError, Result};
pub use inference::{compose_embeddings, embed};
pub use model::{FeaturePipeline, PipelineConfig};
pub use preprocess::{preprocess_row, ColumnSpec};
pub use repr::{Forest, Model, ModelRangeEntry, Tree, TreeNode};
pub use utils::{run_with_threads, Parallelism};
