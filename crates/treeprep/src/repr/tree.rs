//! Canonical tree representation (SoA) used for evaluation.
//!
//! A [`Tree`] stores its nodes in flat arrays in breadth-first order with the
//! root at id 0. It is built from, and converts back to, the nested
//! [`TreeNode`] interchange form.

use serde::{Deserialize, Serialize};

use crate::data::SampleAccessor;
use crate::error::EvalError;

use super::node::TreeNode;
use super::NodeId;

/// Structure-of-Arrays tree storage for efficient traversal.
///
/// Child indices are local to this tree (0 = root). Split fields of leaf
/// nodes and the leaf value of split nodes are unused and zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TreeNode", into = "TreeNode")]
pub struct Tree {
    split_indices: Box<[usize]>,
    split_thresholds: Box<[f64]>,
    left_children: Box<[NodeId]>,
    right_children: Box<[NodeId]>,
    is_leaf: Box<[bool]>,
    leaf_values: Box<[f64]>,
}

impl Tree {
    /// A tree consisting of a single leaf.
    pub fn leaf(value: f64) -> Self {
        Self::from_node(&TreeNode::Leaf(value))
    }

    /// Flatten a nested tree.
    pub fn from_node(root: &TreeNode) -> Self {
        let mut pending: Vec<&TreeNode> = vec![root];
        let mut split_indices = Vec::new();
        let mut split_thresholds = Vec::new();
        let mut left_children = Vec::new();
        let mut right_children = Vec::new();
        let mut is_leaf = Vec::new();
        let mut leaf_values = Vec::new();

        // Children are appended to `pending` as their parent is visited, so
        // node ids come out in breadth-first order.
        let mut next = 0;
        while let Some(&node) = pending.get(next) {
            match node {
                TreeNode::Leaf(value) => {
                    split_indices.push(0);
                    split_thresholds.push(0.0);
                    left_children.push(0);
                    right_children.push(0);
                    is_leaf.push(true);
                    leaf_values.push(*value);
                }
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let left_id = pending.len() as NodeId;
                    pending.push(left);
                    pending.push(right);
                    split_indices.push(*feature);
                    split_thresholds.push(*threshold);
                    left_children.push(left_id);
                    right_children.push(left_id + 1);
                    is_leaf.push(false);
                    leaf_values.push(0.0);
                }
            }
            next += 1;
        }

        Self {
            split_indices: split_indices.into_boxed_slice(),
            split_thresholds: split_thresholds.into_boxed_slice(),
            left_children: left_children.into_boxed_slice(),
            right_children: right_children.into_boxed_slice(),
            is_leaf: is_leaf.into_boxed_slice(),
            leaf_values: leaf_values.into_boxed_slice(),
        }
    }

    /// Rebuild the nested form.
    pub fn to_node(&self) -> TreeNode {
        self.node_at(0)
    }

    fn node_at(&self, node: NodeId) -> TreeNode {
        if self.is_leaf(node) {
            TreeNode::Leaf(self.leaf_value(node))
        } else {
            TreeNode::split(
                self.split_index(node),
                self.split_threshold(node),
                self.node_at(self.left_child(node)),
                self.node_at(self.right_child(node)),
            )
        }
    }

    // =========================================================================
    // Node accessors
    // =========================================================================

    /// Number of nodes in the tree.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    #[inline]
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.is_leaf[node as usize]
    }

    #[inline]
    pub fn split_index(&self, node: NodeId) -> usize {
        self.split_indices[node as usize]
    }

    #[inline]
    pub fn split_threshold(&self, node: NodeId) -> f64 {
        self.split_thresholds[node as usize]
    }

    #[inline]
    pub fn left_child(&self, node: NodeId) -> NodeId {
        self.left_children[node as usize]
    }

    #[inline]
    pub fn right_child(&self, node: NodeId) -> NodeId {
        self.right_children[node as usize]
    }

    #[inline]
    pub fn leaf_value(&self, node: NodeId) -> f64 {
        self.leaf_values[node as usize]
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Number of splits on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.n_nodes()];
        let mut max_depth = 0;
        // Parents always precede their children in breadth-first order.
        for node in 0..self.n_nodes() {
            let id = node as NodeId;
            if !self.is_leaf(id) {
                let child_depth = depths[node] + 1;
                depths[self.left_child(id) as usize] = child_depth;
                depths[self.right_child(id) as usize] = child_depth;
                max_depth = max_depth.max(child_depth);
            }
        }
        max_depth
    }

    /// Largest feature index referenced by any split, `None` for a lone leaf.
    pub fn max_feature_index(&self) -> Option<usize> {
        (0..self.n_nodes())
            .filter(|&n| !self.is_leaf[n])
            .map(|n| self.split_indices[n])
            .max()
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Walk from the root to the leaf selected by `sample`.
    ///
    /// At each split, rows with `sample[feature] <= threshold` go left and all
    /// others (including `NaN`) go right. Only features on the taken path
    /// are read.
    ///
    /// # Errors
    ///
    /// [`EvalError::FeatureOutOfRange`] if a split on the path reads a
    /// feature the sample does not have.
    #[inline]
    pub fn traverse_to_leaf<S: SampleAccessor + ?Sized>(&self, sample: &S) -> Result<NodeId, EvalError> {
        let mut node: NodeId = 0;

        while !self.is_leaf(node) {
            let feature = self.split_index(node);
            let fvalue = sample.feature(feature).ok_or(EvalError::FeatureOutOfRange {
                node,
                feature,
                n_features: sample.n_features(),
            })?;

            node = if fvalue <= self.split_threshold(node) {
                self.left_child(node)
            } else {
                self.right_child(node)
            };
        }

        Ok(node)
    }

    /// Value of the leaf selected by `sample`.
    #[inline]
    pub fn evaluate<S: SampleAccessor + ?Sized>(&self, sample: &S) -> Result<f64, EvalError> {
        self.traverse_to_leaf(sample).map(|leaf| self.leaf_value(leaf))
    }
}

impl From<&TreeNode> for Tree {
    fn from(node: &TreeNode) -> Self {
        Tree::from_node(node)
    }
}

impl From<TreeNode> for Tree {
    fn from(node: TreeNode) -> Self {
        Tree::from_node(&node)
    }
}

impl From<Tree> for TreeNode {
    fn from(tree: Tree) -> Self {
        tree.to_node()
    }
}
