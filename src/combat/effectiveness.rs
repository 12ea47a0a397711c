//! Unit-type effectiveness lookups (rock-paper-scissors style damage bonuses).
//!
//! The matrix is built once per battle from the flat relation list the data
//! layer stores and is never mutated afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One directed effectiveness relation: damage from `attacker_unit_id`
/// against `defender_unit_id` is scaled by `modifier`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectivenessRelation {
    pub attacker_unit_id: u32,
    pub defender_unit_id: u32,
    pub modifier: f64,
}

/// Two-argument effectiveness lookup. Unlisted ordered pairs are neutral (1.0).
#[derive(Debug, Clone, Default)]
pub struct EffectivenessMatrix {
    modifiers: HashMap<(u32, u32), f64>,
}

impl EffectivenessMatrix {
    /// Build the matrix from a relation list. Duplicate (attacker, defender)
    /// pairs keep the last listed value; curated datasets are expected to be
    /// duplicate-free (see [crate::data::validate]).
    pub fn from_relations(relations: &[EffectivenessRelation]) -> Self {
        let mut modifiers = HashMap::with_capacity(relations.len());
        for relation in relations {
            modifiers.insert(
                (relation.attacker_unit_id, relation.defender_unit_id),
                relation.modifier,
            );
        }
        Self { modifiers }
    }

    /// Multiplier for `attacker_unit_id` striking `defender_unit_id`.
    pub fn lookup(&self, attacker_unit_id: u32, defender_unit_id: u32) -> f64 {
        self.modifiers
            .get(&(attacker_unit_id, defender_unit_id))
            .copied()
            .unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relation(attacker: u32, defender: u32, modifier: f64) -> EffectivenessRelation {
        EffectivenessRelation {
            attacker_unit_id: attacker,
            defender_unit_id: defender,
            modifier,
        }
    }

    #[test]
    fn unlisted_pairs_are_neutral() {
        let matrix = EffectivenessMatrix::from_relations(&[relation(1, 2, 1.5)]);
        assert_eq!(matrix.lookup(1, 2), 1.5);
        assert_eq!(matrix.lookup(2, 1), 1.0);
        assert_eq!(matrix.lookup(7, 9), 1.0);
    }

    #[test]
    fn empty_relation_list_is_all_neutral() {
        let matrix = EffectivenessMatrix::from_relations(&[]);
        assert_eq!(matrix.lookup(0, 0), 1.0);
        assert_eq!(matrix.lookup(42, 7), 1.0);
    }

    #[test]
    fn duplicate_pairs_keep_last_listed_value() {
        let matrix =
            EffectivenessMatrix::from_relations(&[relation(3, 4, 0.5), relation(3, 4, 2.0)]);
        assert_eq!(matrix.lookup(3, 4), 2.0);
    }
}
