//! Relevance weight configuration.
//!
//! `[weights]` holds the base weight per keyword source; `[entity]` holds the
//! parameters of the occurrence-based entity weight.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_title() -> f64 {
    2.0
}
const fn default_author() -> f64 {
    1.8
}
const fn default_section() -> f64 {
    1.5
}
const fn default_genre() -> f64 {
    1.0
}
const fn default_tag() -> f64 {
    0.8
}
const fn default_entity() -> f64 {
    0.4
}

/// Base weight per keyword source.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct WeightsConfig {
    #[serde(default = "default_title")]
    pub title: f64,
    #[serde(default = "default_author")]
    pub author: f64,
    #[serde(default = "default_section")]
    pub section: f64,
    #[serde(default = "default_genre")]
    pub genre: f64,
    #[serde(default = "default_tag")]
    pub tag: f64,
    /// Fallback for entities; normally overridden by the entity weight.
    #[serde(default = "default_entity")]
    pub entity: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            author: default_author(),
            section: default_section(),
            genre: default_genre(),
            tag: default_tag(),
            entity: default_entity(),
        }
    }
}

impl WeightsConfig {
    /// Every weight must be finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("weights.title", self.title),
            ("weights.author", self.author),
            ("weights.section", self.section),
            ("weights.genre", self.genre),
            ("weights.tag", self.tag),
            ("weights.entity", self.entity),
        ] {
            require_positive(field, value)?;
        }
        Ok(())
    }
}

const fn default_base() -> f64 {
    0.4
}
const fn default_occurrence_bonus() -> f64 {
    0.6
}
const fn default_character_bonus() -> f64 {
    0.10
}
const fn default_place_bonus() -> f64 {
    0.05
}
const fn default_term_bonus() -> f64 {
    0.0
}
const fn default_cap() -> f64 {
    1.1
}

/// Parameters of the entity weight:
/// `base + min(occurrences / max(units, 1), 1) * occurrence_bonus + type_bonus`, capped at `cap`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct EntityWeightConfig {
    #[serde(default = "default_base")]
    pub base: f64,
    #[serde(default = "default_occurrence_bonus")]
    pub occurrence_bonus: f64,
    #[serde(default = "default_character_bonus")]
    pub character_bonus: f64,
    #[serde(default = "default_place_bonus")]
    pub place_bonus: f64,
    #[serde(default = "default_term_bonus")]
    pub term_bonus: f64,
    #[serde(default = "default_cap")]
    pub cap: f64,
}

impl Default for EntityWeightConfig {
    fn default() -> Self {
        Self {
            base: default_base(),
            occurrence_bonus: default_occurrence_bonus(),
            character_bonus: default_character_bonus(),
            place_bonus: default_place_bonus(),
            term_bonus: default_term_bonus(),
            cap: default_cap(),
        }
    }
}

impl EntityWeightConfig {
    /// `base` and `cap` must be positive, bonuses non-negative, and `cap >= base`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("entity.base", self.base)?;
        require_positive("entity.cap", self.cap)?;
        for (field, value) in [
            ("entity.occurrence_bonus", self.occurrence_bonus),
            ("entity.character_bonus", self.character_bonus),
            ("entity.place_bonus", self.place_bonus),
            ("entity.term_bonus", self.term_bonus),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be a non-negative number, got {value}"),
                ));
            }
        }
        if self.cap < self.base {
            return Err(ConfigError::invalid(
                "entity.cap",
                format!("cap {} is below base {}", self.cap, self.base),
            ));
        }
        Ok(())
    }
}

pub(crate) fn require_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must be a positive number, got {value}"),
        ))
    }
}
