use serde::{Deserialize, Serialize};

use crate::error::{MurmurError, Result};

/// Configuration for the graph store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GraphConfig {
    /// Tokenizer options shared by indexing and querying.
    #[serde(default)]
    pub tokenizer: TokenizerConfig,

    /// Result limit applied when a search request does not set one.
    /// `None` returns every match.
    #[serde(default)]
    pub default_top_k: Option<usize>,
}

impl GraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> GraphConfigBuilder {
        GraphConfigBuilder::default()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GraphConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_top_k == Some(0) {
            return Err(MurmurError::invalid_config(
                "default_top_k must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Tokenizer options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// Apply NFKC normalization before case-folding.
    #[serde(default = "default_unicode_normalization")]
    pub unicode_normalization: bool,
}

fn default_unicode_normalization() -> bool {
    true
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            unicode_normalization: default_unicode_normalization(),
        }
    }
}

#[derive(Debug, Default)]
pub struct GraphConfigBuilder {
    config: GraphConfig,
}

impl GraphConfigBuilder {
    pub fn unicode_normalization(mut self, enabled: bool) -> Self {
        self.config.tokenizer.unicode_normalization = enabled;
        self
    }

    pub fn default_top_k(mut self, top_k: usize) -> Self {
        self.config.default_top_k = Some(top_k);
        self
    }

    pub fn build(self) -> GraphConfig {
        self.config
    }
}
