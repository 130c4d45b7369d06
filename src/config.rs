//! Pipeline configuration.

use crate::errors::{DebiasError, DebiasResult};
use crate::template::DEFAULT_MASK_TOKEN;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for the de-biasing pipeline.
///
/// Loadable from TOML; every key is optional.
///
/// ```toml
/// mask_token = "[MASK]"
/// candidates_per_span = 5
/// max_reduced_recommendations = 3
/// parallel = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DebiasConfig {
    /// Placeholder understood by the mask filler.
    pub mask_token: String,
    /// Words kept from each filler call (N).
    pub candidates_per_span: usize,
    /// Recommendations returned when no candidate is non-biased.
    pub max_reduced_recommendations: usize,
    /// Fan out model calls across threads (requires the `parallel` feature).
    pub parallel: bool,
}

impl Default for DebiasConfig {
    fn default() -> Self {
        Self {
            mask_token: DEFAULT_MASK_TOKEN.to_string(),
            candidates_per_span: 5,
            max_reduced_recommendations: 3,
            parallel: false,
        }
    }
}

impl DebiasConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> DebiasResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| DebiasError::Config {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;

        Self::from_toml_str(&content).map_err(|e| DebiasError::Config {
            message: format!("{}: {}", path.display(), e),
        })
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> DebiasResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| DebiasError::Config {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DebiasResult<()> {
        let problem = if self.mask_token.is_empty() {
            Some("mask_token must not be empty")
        } else if self.candidates_per_span == 0 {
            Some("candidates_per_span must be at least 1")
        } else if self.max_reduced_recommendations == 0 {
            Some("max_reduced_recommendations must be at least 1")
        } else {
            None
        };

        match problem {
            Some(message) => Err(DebiasError::Config {
                message: message.to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn with_mask_token(mut self, mask_token: impl Into<String>) -> Self {
        self.mask_token = mask_token.into();
        self
    }

    pub fn with_candidates_per_span(mut self, n: usize) -> Self {
        self.candidates_per_span = n;
        self
    }

    pub fn with_max_reduced_recommendations(mut self, n: usize) -> Self {
        self.max_reduced_recommendations = n;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
