//! Search configuration: match multipliers and per-query work limits.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::weights::require_positive;

const fn default_exact() -> f64 {
    3.0
}
const fn default_prefix() -> f64 {
    2.0
}
const fn default_contains() -> f64 {
    1.0
}
const fn default_max_candidates() -> u32 {
    5000
}
const fn default_max_tokens() -> u32 {
    32
}
const fn default_limit() -> u32 {
    20
}
const fn default_max_limit() -> u32 {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SearchConfig {
    #[serde(default = "default_exact")]
    pub exact_multiplier: f64,
    #[serde(default = "default_prefix")]
    pub prefix_multiplier: f64,
    #[serde(default = "default_contains")]
    pub contains_multiplier: f64,

    /// Upper bound on keyword rows scanned per query.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: u32,

    /// Upper bound on query tokens; longer queries are rejected.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Result limit used when the caller does not pass one.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Largest limit a caller may request.
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exact_multiplier: default_exact(),
            prefix_multiplier: default_prefix(),
            contains_multiplier: default_contains(),
            max_candidates: default_max_candidates(),
            max_tokens: default_max_tokens(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl SearchConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for non-positive multipliers,
    /// a zero candidate or token cap, or a default limit outside
    /// `1..=max_limit`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("search.exact_multiplier", self.exact_multiplier)?;
        require_positive("search.prefix_multiplier", self.prefix_multiplier)?;
        require_positive("search.contains_multiplier", self.contains_multiplier)?;
        if self.max_candidates == 0 {
            return Err(ConfigError::invalid(
                "search.max_candidates",
                "must be at least 1",
            ));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::invalid("search.max_tokens", "must be at least 1"));
        }
        if self.max_limit == 0 {
            return Err(ConfigError::invalid("search.max_limit", "must be at least 1"));
        }
        if self.default_limit == 0 || self.default_limit > self.max_limit {
            return Err(ConfigError::invalid(
                "search.default_limit",
                format!("must be between 1 and max_limit ({})", self.max_limit),
            ));
        }
        Ok(())
    }
}
