//! Occurrence-based weight for extracted entities.

use folio_config::EntityWeightConfig;
use folio_core::entities::EntityFact;
use folio_core::enums::EntityKind;

/// Computes `base + min(occurrences / max(units, 1), 1) * occurrence_bonus + type_bonus`,
/// capped at `cap`.
///
/// The result never decreases as `occurrence_count` grows, and a book with
/// zero counted units is treated as having one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityWeightCalculator {
    base: f64,
    occurrence_bonus: f64,
    character_bonus: f64,
    place_bonus: f64,
    term_bonus: f64,
    cap: f64,
}

impl Default for EntityWeightCalculator {
    fn default() -> Self {
        Self::from_config(&EntityWeightConfig::default())
    }
}

impl EntityWeightCalculator {
    #[must_use]
    pub const fn from_config(config: &EntityWeightConfig) -> Self {
        Self {
            base: config.base,
            occurrence_bonus: config.occurrence_bonus,
            character_bonus: config.character_bonus,
            place_bonus: config.place_bonus,
            term_bonus: config.term_bonus,
            cap: config.cap,
        }
    }

    #[must_use]
    pub fn weight(&self, fact: &EntityFact) -> f64 {
        self.weight_for(fact.entity_type, fact.occurrence_count, fact.total_unit_count)
    }

    /// Weight from raw statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn weight_for(&self, kind: EntityKind, occurrence_count: u64, total_unit_count: u64) -> f64 {
        let units = total_unit_count.max(1) as f64;
        let ratio = (occurrence_count as f64 / units).min(1.0);
        let raw = ratio.mul_add(self.occurrence_bonus, self.base) + self.type_bonus(kind);
        raw.min(self.cap)
    }

    const fn type_bonus(&self, kind: EntityKind) -> f64 {
        match kind {
            EntityKind::Character => self.character_bonus,
            EntityKind::Place => self.place_bonus,
            EntityKind::Term => self.term_bonus,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn always_present_character_hits_the_cap() {
        let calc = EntityWeightCalculator::default();
        assert!(close(calc.weight_for(EntityKind::Character, 100, 100), 1.10));
    }

    #[test]
    fn rare_character() {
        let calc = EntityWeightCalculator::default();
        assert!(close(calc.weight_for(EntityKind::Character, 2, 100), 0.512));
    }

    #[rstest]
    #[case(EntityKind::Character)]
    #[case(EntityKind::Place)]
    #[case(EntityKind::Term)]
    fn monotonic_in_occurrences(#[case] kind: EntityKind) {
        let calc = EntityWeightCalculator::default();
        let mut previous = 0.0;
        for occurrences in 0..=150 {
            let weight = calc.weight_for(kind, occurrences, 100);
            assert!(weight >= previous, "{kind} weight dropped at {occurrences}");
            assert!(weight <= 1.1 + 1e-12);
            previous = weight;
        }
    }

    #[rstest]
    #[case(EntityKind::Character, 0, 0.5)]
    #[case(EntityKind::Place, 1, 1.05)]
    #[case(EntityKind::Term, 5, 1.0)]
    fn zero_units_counts_as_one(
        #[case] kind: EntityKind,
        #[case] occurrences: u64,
        #[case] expected: f64,
    ) {
        let calc = EntityWeightCalculator::default();
        let weight = calc.weight_for(kind, occurrences, 0);
        assert!(close(weight, expected), "got {weight}");
    }

    #[test]
    fn custom_cap_is_respected() {
        let calc = EntityWeightCalculator::from_config(&EntityWeightConfig {
            cap: 0.6,
            ..EntityWeightConfig::default()
        });
        assert!(close(calc.weight_for(EntityKind::Term, 50, 100), 0.6));
    }
}
