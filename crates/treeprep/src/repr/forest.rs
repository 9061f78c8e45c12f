//! Forests, models and feature-range assignments.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::ModelTypeError;

use super::node::{FormatError, TreeNode};
use super::tree::Tree;

/// Ordered collection of trees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forest {
    trees: Vec<Tree>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of trees.
    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Iterate over trees in ensemble order.
    pub fn trees(&self) -> std::slice::Iter<'_, Tree> {
        self.trees.iter()
    }
}

impl FromIterator<Tree> for Forest {
    fn from_iter<I: IntoIterator<Item = Tree>>(iter: I) -> Self {
        Self {
            trees: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Model
// =============================================================================

/// A single tree or an ensemble of trees.
///
/// On the wire both are arrays; a tree starts with a number, an ensemble
/// holds arrays (`[]` is an empty ensemble).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ModelSchema", into = "ModelSchema")]
pub enum Model {
    Tree(Tree),
    Ensemble(Forest),
}

impl Model {
    /// The ensemble, or [`ModelTypeError::NotAnEnsemble`] for a single tree.
    pub fn as_ensemble(&self) -> Result<&Forest, ModelTypeError> {
        match self {
            Model::Ensemble(forest) => Ok(forest),
            Model::Tree(_) => Err(ModelTypeError::NotAnEnsemble),
        }
    }

    /// All trees of the model.
    pub fn trees(&self) -> std::slice::Iter<'_, Tree> {
        match self {
            Model::Tree(tree) => std::slice::from_ref(tree).iter(),
            Model::Ensemble(forest) => forest.trees(),
        }
    }
}

impl From<Forest> for Model {
    fn from(forest: Forest) -> Self {
        Model::Ensemble(forest)
    }
}

impl From<Tree> for Model {
    fn from(tree: Tree) -> Self {
        Model::Tree(tree)
    }
}

/// Wire form of a [`Model`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelSchema {
    Tree(TreeNode),
    Ensemble(Vec<TreeNode>),
}

impl From<ModelSchema> for Model {
    fn from(schema: ModelSchema) -> Self {
        match schema {
            ModelSchema::Tree(node) => Model::Tree(Tree::from_node(&node)),
            ModelSchema::Ensemble(nodes) => {
                Model::Ensemble(nodes.iter().map(Tree::from_node).collect())
            }
        }
    }
}

impl From<Model> for ModelSchema {
    fn from(model: Model) -> Self {
        match model {
            Model::Tree(tree) => ModelSchema::Tree(tree.to_node()),
            Model::Ensemble(forest) => ModelSchema::Ensemble(forest.trees().map(Tree::to_node).collect()),
        }
    }
}

// =============================================================================
// ModelRangeEntry
// =============================================================================

/// A model applied to the half-open feature range `range` of each input row.
///
/// Wire form: `[[start, end], model]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ModelRangeEntrySchema", into = "ModelRangeEntrySchema")]
pub struct ModelRangeEntry {
    pub range: Range<usize>,
    pub model: Model,
}

impl ModelRangeEntry {
    pub fn new(range: Range<usize>, model: impl Into<Model>) -> Self {
        Self {
            range,
            model: model.into(),
        }
    }

    /// Number of input features the model sees.
    #[inline]
    pub fn width(&self) -> usize {
        self.range.len()
    }
}

/// Wire form of a [`ModelRangeEntry`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRangeEntrySchema(pub [usize; 2], pub Model);

impl TryFrom<ModelRangeEntrySchema> for ModelRangeEntry {
    type Error = FormatError;

    fn try_from(ModelRangeEntrySchema([start, end], model): ModelRangeEntrySchema) -> Result<Self, Self::Error> {
        if start > end {
            return Err(FormatError::InvalidRange { start, end });
        }
        Ok(Self {
            range: start..end,
            model,
        })
    }
}

impl From<ModelRangeEntry> for ModelRangeEntrySchema {
    fn from(entry: ModelRangeEntry) -> Self {
        ModelRangeEntrySchema([entry.range.start, entry.range.end], entry.model)
    }
}
