//! Tree-ensemble embeddings.
//!
//! - [`embed`] / [`embed_with`]: one embedding value per input row from an ensemble
//! - [`compose_embeddings`] / [`compose_embeddings_with`]: embeddings of several
//!   feature ranges fused with the original features
//!
//! # Example
//!
//! ```
//! use ndarray::array;
//! use treeprep::inference::compose_embeddings;
//! use treeprep::repr::ModelRangeEntry;
//!
//! let entries: Vec<ModelRangeEntry> =
//!     serde_json::from_str("[[[0, 1], [[0, 2.5, [1.0], [0.0]]]]]").unwrap();
//! let x = array![[2.0, 7.0]];
//!
//! let out = compose_embeddings(x.view(), &entries).unwrap();
//! assert_eq!(out.to_vec(), vec![1.0, 2.0, 7.0]);
//! ```

mod compose;
mod embed;

pub use compose::{compose_embeddings, compose_embeddings_with};
pub use embed::{embed, embed_with};
