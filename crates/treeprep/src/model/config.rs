//! Pipeline configuration with builder pattern.
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroUsize;
//! use treeprep::model::PipelineConfig;
//!
//! // All defaults
//! let config = PipelineConfig::builder().build().unwrap();
//! assert!(config.n_threads.is_none());
//!
//! let config = PipelineConfig::builder()
//!     .n_threads(NonZeroUsize::new(4).unwrap())
//!     .max_tree_depth(32)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.max_tree_depth, Some(32));
//! ```

use std::num::NonZeroUsize;

use bon::Builder;

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineConfigError {
    /// `max_tree_depth` of zero.
    #[error("max_tree_depth must be at least 1, got {0}")]
    InvalidMaxDepth(usize),
}

/// Configuration for a [`FeaturePipeline`](super::FeaturePipeline).
#[derive(Debug, Clone, Default, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct PipelineConfig {
    /// Number of threads for batch transforms. `None` uses all available cores.
    pub n_threads: Option<NonZeroUsize>,

    /// Reject trees deeper than this when the pipeline is built.
    /// `None` accepts any depth.
    pub max_tree_depth: Option<usize>,
}

impl<S: pipeline_config_builder::IsComplete> PipelineConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineConfigError`] if `max_tree_depth == 0`.
    pub fn build(self) -> Result<PipelineConfig, PipelineConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl PipelineConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), PipelineConfigError> {
        match self.max_tree_depth {
            Some(0) => Err(PipelineConfigError::InvalidMaxDepth(0)),
            _ => Ok(()),
        }
    }

    /// Thread count in [`run_with_threads`](crate::utils::run_with_threads)
    /// semantics (0 = all cores).
    #[inline]
    pub fn thread_count(&self) -> usize {
        self.n_threads.map_or(0, NonZeroUsize::get)
    }
}
