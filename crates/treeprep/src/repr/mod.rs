//! Decision tree and ensemble representations.
//!
//! - [`TreeNode`]: nested interchange form (`Leaf` | `Split`)
//! - [`Tree`]: flattened SoA form used for evaluation
//! - [`Forest`] / [`Model`]: ensembles and single-tree models
//! - [`ModelRangeEntry`]: a model bound to a feature range

/// Node identifier: an index into a tree's SoA arrays.
pub type NodeId = u32;

pub mod forest;
pub mod node;
pub mod tree;

pub use forest::{Forest, Model, ModelRangeEntry, ModelRangeEntrySchema, ModelSchema};
pub use node::{FormatError, NodeItem, TreeNode};
pub use tree::Tree;
