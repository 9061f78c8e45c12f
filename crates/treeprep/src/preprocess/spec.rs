//! Column specifications.
//!
//! [`ColumnSpec`] is the validated runtime type. It (de)serializes through
//! [`ColumnSpecSchema`], the wire form, so an invalid specification is
//! rejected while loading and can never reach a transform.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const NUMERIC: &str = "numeric";
const CATEGORICAL: &str = "categorical";

/// Logical type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// How a column's values are transformed.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnTransform {
    /// `(x - mean) / stdev`, or `x - mean` when `stdev` is not positive.
    Standardize { mean: f64, stdev: f64 },
    /// `1.0` where `x == one_value`, `0.0` elsewhere.
    ///
    /// `zero_value` is carried for compatibility and does not affect output.
    Binarize { zero_value: f64, one_value: f64 },
    /// One indicator column per label.
    OneHot { values: Vec<String> },
}

/// Specification for transforming one input column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColumnSpecSchema", into = "ColumnSpecSchema")]
pub struct ColumnSpec {
    /// Position of the column in the raw row.
    pub index: usize,
    pub transform: ColumnTransform,
}

impl ColumnSpec {
    pub fn standardize(index: usize, mean: f64, stdev: f64) -> Self {
        Self {
            index,
            transform: ColumnTransform::Standardize { mean, stdev },
        }
    }

    pub fn binarize(index: usize, zero_value: f64, one_value: f64) -> Self {
        Self {
            index,
            transform: ColumnTransform::Binarize {
                zero_value,
                one_value,
            },
        }
    }

    pub fn one_hot<S: Into<String>>(index: usize, values: impl IntoIterator<Item = S>) -> Self {
        Self {
            index,
            transform: ColumnTransform::OneHot {
                values: values.into_iter().map(Into::into).collect(),
            },
        }
    }

    #[inline]
    pub fn kind(&self) -> ColumnKind {
        match self.transform {
            ColumnTransform::Standardize { .. } | ColumnTransform::Binarize { .. } => {
                ColumnKind::Numeric
            }
            ColumnTransform::OneHot { .. } => ColumnKind::Categorical,
        }
    }

    /// Number of output values this column contributes to a row.
    #[inline]
    pub fn output_width(&self) -> usize {
        match &self.transform {
            ColumnTransform::OneHot { values } => values.len(),
            _ => 1,
        }
    }
}

// =============================================================================
// Wire schema
// =============================================================================

/// Wire form of a column specification.
///
/// ```json
/// {"index": 0, "type": "numeric", "mean": 3.2, "stdev": 1.1}
/// {"index": 1, "type": "numeric", "zero_value": 0, "one_value": 1}
/// {"index": 2, "type": "categorical", "values": ["a", "b"]}
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnSpecSchema {
    pub index: usize,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdev: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

impl TryFrom<ColumnSpecSchema> for ColumnSpec {
    type Error = ConfigError;

    fn try_from(schema: ColumnSpecSchema) -> Result<Self, Self::Error> {
        let index = schema.index;
        let required = |value: Option<f64>, field| {
            value.ok_or(ConfigError::MissingField { index, field })
        };

        let transform = match schema.type_name.as_str() {
            NUMERIC => {
                // `stdev` takes precedence when both variants are present.
                if schema.stdev.is_some() {
                    ColumnTransform::Standardize {
                        mean: required(schema.mean, "mean")?,
                        stdev: required(schema.stdev, "stdev")?,
                    }
                } else if schema.zero_value.is_some() {
                    ColumnTransform::Binarize {
                        zero_value: required(schema.zero_value, "zero_value")?,
                        one_value: required(schema.one_value, "one_value")?,
                    }
                } else {
                    return Err(ConfigError::InvalidNumericSpec { index });
                }
            }
            CATEGORICAL => ColumnTransform::OneHot {
                values: schema
                    .values
                    .ok_or(ConfigError::MissingField { index, field: "values" })?,
            },
            other => {
                return Err(ConfigError::UnknownType {
                    index,
                    type_name: other.to_owned(),
                })
            }
        };

        Ok(ColumnSpec { index, transform })
    }
}

impl From<ColumnSpec> for ColumnSpecSchema {
    fn from(spec: ColumnSpec) -> Self {
        let index = spec.index;
        match spec.transform {
            ColumnTransform::Standardize { mean, stdev } => Self {
                index,
                type_name: NUMERIC.to_owned(),
                mean: Some(mean),
                stdev: Some(stdev),
                ..Default::default()
            },
            ColumnTransform::Binarize {
                zero_value,
                one_value,
            } => Self {
                index,
                type_name: NUMERIC.to_owned(),
                zero_value: Some(zero_value),
                one_value: Some(one_value),
                ..Default::default()
            },
            ColumnTransform::OneHot { values } => Self {
                index,
                type_name: CATEGORICAL.to_owned(),
                values: Some(values),
                ..Default::default()
            },
        }
    }
}
