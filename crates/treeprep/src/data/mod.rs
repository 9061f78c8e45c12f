//! Raw input values, row accumulation and sample access.
//!
//! - [`RawValue`]: one raw column value as supplied by the caller
//! - [`to_numeric_array`]: numeric coercion of raw values
//! - [`concat_rows`]: builds a single output row column block by column block
//! - [`SampleAccessor`]: bounds-checked feature access for tree traversal

mod accessor;
mod rows;
mod value;

pub use accessor::SampleAccessor;
pub use rows::concat_rows;
pub use value::{to_numeric_array, RawValue};
