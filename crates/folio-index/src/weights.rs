//! Base relevance weight per keyword source.

use folio_config::WeightsConfig;
use folio_core::enums::KeywordSource;

/// Immutable source-to-weight table, built once from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightTable {
    title: f64,
    author: f64,
    section: f64,
    genre: f64,
    tag: f64,
    entity: f64,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::from_config(&WeightsConfig::default())
    }
}

impl WeightTable {
    /// Build from the `[weights]` section. The config has already been validated.
    #[must_use]
    pub const fn from_config(config: &WeightsConfig) -> Self {
        Self {
            title: config.title,
            author: config.author,
            section: config.section,
            genre: config.genre,
            tag: config.tag,
            entity: config.entity,
        }
    }

    /// Base weight for keywords extracted from `source`.
    ///
    /// For [`KeywordSource::Entity`] this is only the fallback; entity
    /// keywords are weighted by [`crate::EntityWeightCalculator`].
    #[must_use]
    pub const fn base(&self, source: KeywordSource) -> f64 {
        match source {
            KeywordSource::Title => self.title,
            KeywordSource::Author => self.author,
            KeywordSource::Section => self.section,
            KeywordSource::Genre => self.genre,
            KeywordSource::Tag => self.tag,
            KeywordSource::Entity => self.entity,
        }
    }
}
