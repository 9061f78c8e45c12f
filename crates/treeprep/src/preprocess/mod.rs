//! Column preprocessing.
//!
//! Turns raw rows into dense feature rows according to an ordered list of
//! [`ColumnSpec`]s:
//!
//! - numeric columns are standardized (`mean`/`stdev`) or binarized
//!   (`zero_value`/`one_value`)
//! - categorical columns are one-hot encoded against their label list
//!
//! # Example
//!
//! ```
//! use treeprep::data::RawValue;
//! use treeprep::preprocess::{preprocess_row, ColumnSpec};
//!
//! let specs: Vec<ColumnSpec> = serde_json::from_str(r#"[
//!     {"index": 0, "type": "numeric", "mean": 0, "stdev": 1},
//!     {"index": 1, "type": "categorical", "values": ["a", "b"]}
//! ]"#).unwrap();
//!
//! let row: Vec<RawValue> = vec![5.0.into(), "b".into()];
//! let out = preprocess_row(&row, &specs).unwrap();
//! assert_eq!(out.row(0).to_vec(), vec![5.0, 0.0, 1.0]);
//! ```

mod row;
mod spec;
mod transform;

pub use row::{preprocess_row, preprocess_rows};
pub use spec::{ColumnKind, ColumnSpec, ColumnSpecSchema, ColumnTransform};
pub use transform::{binarize, one_hot, standardize, transform};
