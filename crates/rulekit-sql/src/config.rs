//! Grammar configuration

use serde::{Deserialize, Serialize};

/// Default bound on expression nesting
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Settings shared by the parser, compiler and serializer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlDslConfig {
    /// Maximum nesting of parentheses, NOT and AND/OR chains
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for SqlDslConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SqlDslConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Load configuration from a JSON document; absent fields keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
