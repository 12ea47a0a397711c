//! Unit stacks and per-battle combat state.
//!
//! A stack is a homogeneous group of identical units treated as one combat
//! entity. [apply_perks] projects a roster stack plus the side's strategy
//! bonuses into the combat-ready form used by the engine.

use serde::{Deserialize, Serialize};

/// A homogeneous group of identical units within one army, as fetched from
/// the roster. `unit_cost` plays no part in combat and is carried for
/// reporting only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitStack {
    pub unit_type_id: u32,
    pub display_type: String,
    pub quantity: u32,
    pub base_health: f64,
    pub base_strength: f64,
    pub base_defense: f64,
    pub unit_cost: u32,
}

/// Offensive/defensive multipliers granted by the side's chosen strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyBonuses {
    pub offensive_bonus: f64,
    pub defensive_bonus: f64,
}

/// A [UnitStack] augmented for the duration of one battle.
///
/// `effective_health` and `effective_strength` are derived once by
/// [apply_perks] and constant thereafter; only `quantity` and `damage_carry`
/// mutate during the battle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombatUnitStack {
    pub unit_type_id: u32,
    pub display_type: String,
    pub quantity: u32,
    pub unit_cost: u32,
    /// Per-unit health pool: `(base_health + base_defense) * defensive_bonus`.
    pub effective_health: f64,
    /// Per-unit attack: `base_strength * offensive_bonus`.
    pub effective_strength: f64,
    /// Fractional damage left over after the last casualty computation
    /// against this stack. Accumulates across rounds within one battle.
    pub damage_carry: f64,
}

/// Project a roster stack into its combat-ready form for one battle.
pub fn apply_perks(stack: UnitStack, strategy: StrategyBonuses) -> CombatUnitStack {
    CombatUnitStack {
        unit_type_id: stack.unit_type_id,
        display_type: stack.display_type,
        quantity: stack.quantity,
        unit_cost: stack.unit_cost,
        effective_health: (stack.base_health + stack.base_defense) * strategy.defensive_bonus,
        effective_strength: stack.base_strength * strategy.offensive_bonus,
        damage_carry: 0.0,
    }
}

/// Which side of the battle an army fights on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmyRole {
    Attacker,
    Defender,
}

impl ArmyRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Attacker => "attacker",
            Self::Defender => "defender",
        }
    }
}

/// One side's mutable combat state for a single battle simulation.
///
/// Stack order is roster order; it only fixes log ordering, not outcomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArmyCombatState {
    pub army_id: String,
    pub role: ArmyRole,
    pub stacks: Vec<CombatUnitStack>,
}

impl ArmyCombatState {
    pub fn new(army_id: impl Into<String>, role: ArmyRole, stacks: Vec<CombatUnitStack>) -> Self {
        Self {
            army_id: army_id.into(),
            role,
            stacks,
        }
    }

    /// Total surviving unit count across all stacks.
    pub fn total_units(&self) -> u64 {
        self.stacks.iter().map(|s| u64::from(s.quantity)).sum()
    }

    /// Total strength: `quantity * effective_strength` summed over stacks.
    pub fn total_strength(&self) -> f64 {
        self.stacks
            .iter()
            .map(|s| f64::from(s.quantity) * s.effective_strength)
            .sum()
    }

    /// Drop stacks that have been reduced to zero quantity.
    pub fn prune_destroyed(&mut self) {
        self.stacks.retain(|s| s.quantity > 0);
    }

    pub fn is_defeated(&self) -> bool {
        self.stacks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_perks_derives_effective_stats() {
        let stack = UnitStack {
            unit_type_id: 1,
            display_type: "Pikeman".to_string(),
            quantity: 12,
            base_health: 50.0,
            base_strength: 10.0,
            base_defense: 15.0,
            unit_cost: 100,
        };
        let combat = apply_perks(
            stack,
            StrategyBonuses {
                offensive_bonus: 1.5,
                defensive_bonus: 0.8,
            },
        );

        assert_eq!(combat.effective_strength, 15.0);
        assert_eq!(combat.effective_health, 52.0);
        assert_eq!(combat.damage_carry, 0.0);
        assert_eq!(combat.quantity, 12);
        assert_eq!(combat.display_type, "Pikeman");
        assert_eq!(combat.unit_cost, 100);
    }

    #[test]
    fn army_totals_sum_over_stacks() {
        let stacks = vec![
            CombatUnitStack {
                unit_type_id: 1,
                display_type: "Swordsman".to_string(),
                quantity: 10,
                unit_cost: 50,
                effective_health: 60.0,
                effective_strength: 5.0,
                damage_carry: 0.0,
            },
            CombatUnitStack {
                unit_type_id: 2,
                display_type: "Archer".to_string(),
                quantity: 4,
                unit_cost: 80,
                effective_health: 30.0,
                effective_strength: 8.0,
                damage_carry: 0.0,
            },
        ];
        let state = ArmyCombatState::new("army-a", ArmyRole::Attacker, stacks);

        assert_eq!(state.total_units(), 14);
        assert_eq!(state.total_strength(), 82.0);
    }
}
