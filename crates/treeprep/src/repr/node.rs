//! Nested tree nodes, the interchange form of a decision tree.
//!
//! On the wire a tree is a nested array: a leaf is `[value]` and an internal
//! node is `[feature_index, threshold, left, right]`. A node whose last
//! element is `null` (e.g. `[0.7, null, null, null]`) is also a leaf.

use serde::{Deserialize, Serialize};

/// Malformed tree or model description.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    /// Node array is neither a leaf nor a four-element split.
    #[error("tree node must have 1 or 4 elements, got {0}")]
    InvalidLength(usize),

    /// Four-element node with the wrong element kinds.
    #[error("internal node must be [feature, threshold, left, right]")]
    InvalidSplit,

    /// Split feature is not a non-negative integer.
    #[error("feature index must be a non-negative integer, got {0}")]
    InvalidFeatureIndex(f64),

    /// Range entry with `start > end`.
    #[error("feature range start {start} is after end {end}")]
    InvalidRange { start: usize, end: usize },
}

/// A decision tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<NodeItem>", into = "Vec<NodeItem>")]
pub enum TreeNode {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    pub fn leaf(value: f64) -> Self {
        Self::Leaf(value)
    }

    /// Internal node: rows with `row[feature] <= threshold` go `left`.
    pub fn split(feature: usize, threshold: f64, left: TreeNode, right: TreeNode) -> Self {
        Self::Split {
            feature,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// One element of a node's wire array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeItem {
    Number(f64),
    Node(TreeNode),
    Null,
}

fn feature_index(value: f64) -> Result<usize, FormatError> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= usize::MAX as f64 {
        Ok(value as usize)
    } else {
        Err(FormatError::InvalidFeatureIndex(value))
    }
}

impl TryFrom<Vec<NodeItem>> for TreeNode {
    type Error = FormatError;

    fn try_from(items: Vec<NodeItem>) -> Result<Self, Self::Error> {
        if let [NodeItem::Number(value), rest @ ..] = items.as_slice() {
            if rest.is_empty() || matches!(rest.last(), Some(NodeItem::Null)) {
                return Ok(TreeNode::Leaf(*value));
            }
        }

        if items.len() != 4 {
            return Err(FormatError::InvalidLength(items.len()));
        }

        let mut items = items.into_iter();
        match (items.next(), items.next(), items.next(), items.next()) {
            (
                Some(NodeItem::Number(feature)),
                Some(NodeItem::Number(threshold)),
                Some(NodeItem::Node(left)),
                Some(NodeItem::Node(right)),
            ) => Ok(TreeNode::split(feature_index(feature)?, threshold, left, right)),
            _ => Err(FormatError::InvalidSplit),
        }
    }
}

impl From<TreeNode> for Vec<NodeItem> {
    fn from(node: TreeNode) -> Self {
        match node {
            TreeNode::Leaf(value) => vec![NodeItem::Number(value)],
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => vec![
                NodeItem::Number(feature as f64),
                NodeItem::Number(threshold),
                NodeItem::Node(*left),
                NodeItem::Node(*right),
            ],
        }
    }
}
