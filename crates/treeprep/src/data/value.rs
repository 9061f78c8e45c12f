//! Raw column values and numeric coercion.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// A single raw column value.
///
/// Deserializes from a JSON number, string or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Missing,
}

impl RawValue {
    /// Numeric form of this value.
    ///
    /// Text is trimmed and parsed as a float; unparsable text and missing
    /// values become `NaN`.
    #[inline]
    pub fn to_f64(&self) -> f64 {
        match self {
            RawValue::Number(x) => *x,
            RawValue::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
            RawValue::Missing => f64::NAN,
        }
    }

    /// The label of a textual value, if any.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawValue::Missing, Into::into)
    }
}

/// Coerce raw values into floats, preserving length and order.
pub fn to_numeric_array(values: &[RawValue]) -> Array1<f64> {
    values.iter().map(RawValue::to_f64).collect()
}
