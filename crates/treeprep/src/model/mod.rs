//! High-level feature pipeline.
//!
//! [`FeaturePipeline`] bundles the column specifications and tree entries of
//! a trained model description and turns raw rows into model-ready feature
//! vectors. Configure it with [`PipelineConfig::builder`].

mod config;
mod pipeline;

pub use config::{PipelineConfig, PipelineConfigError};
pub use pipeline::{FeaturePipeline, PipelineError, PipelineSchema};
