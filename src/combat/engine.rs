//! Deterministic round-based battle resolver.
//!
//! Two armies exchange all-pairs strikes each round (attacker phase, then
//! defender phase) until one side has no surviving stacks or the round cap is
//! reached. Damage resolution floors against the defender's effective health
//! and carries the fractional remainder forward, so repeated sub-lethal
//! attacks accumulate toward a kill instead of being wasted. No randomness
//! anywhere: identical inputs produce identical results, log order included.

use serde::{Deserialize, Serialize};

use crate::combat::effectiveness::EffectivenessMatrix;
use crate::combat::units::{ArmyCombatState, CombatUnitStack};

/// Round cap when the caller does not supply one.
pub const DEFAULT_MAX_ROUNDS: u32 = 20;

/// One recorded damaging exchange. Exchanges that inflict zero casualties
/// still feed the target's damage carry but are not logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub attacker_army_id: String,
    pub defender_army_id: String,
    pub unit_type: String,
    pub target_type: String,
    pub damage: f64,
    pub casualties: u32,
}

/// All damaging exchanges of one round, in strike order (attacker phase
/// first, then defender phase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundLogEntry {
    pub round: u32,
    pub actions: Vec<ActionLogEntry>,
}

/// Per-side outcome numbers. Casualties are a unit-count delta, strengths
/// are `quantity * effective_strength` sums.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BattleSideStats {
    pub casualties: u64,
    pub starting_strength: f64,
    pub final_strength: f64,
}

/// Terminal output of one simulation. `winner: None` signals a draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleResult {
    pub winner: Option<String>,
    pub attacker_stats: BattleSideStats,
    pub defender_stats: BattleSideStats,
    pub total_rounds: u32,
    pub rounds: Vec<RoundLogEntry>,
}

/// Total damage output of one stack against a target type: surviving unit
/// count times per-unit strength times the type-pairing multiplier.
pub fn compute_damage(attacker: &CombatUnitStack, effectiveness: f64) -> f64 {
    f64::from(attacker.quantity) * attacker.effective_strength * effectiveness
}

/// Apply `damage` to `defender`, converting it into whole-unit casualties
/// against the stack's effective health. Returns the casualty count.
///
/// The fractional remainder is computed from the full uncapped total and
/// stored in `damage_carry`, even when the potential casualties exceed the
/// surviving quantity. A stack killed by overkill keeps that stale carry but
/// is pruned before it could matter.
pub fn apply_damage(defender: &mut CombatUnitStack, damage: f64) -> u32 {
    let total_damage = damage + defender.damage_carry;
    let potential_casualties = (total_damage / defender.effective_health).floor();
    let casualties = potential_casualties.min(f64::from(defender.quantity)) as u32;

    defender.quantity -= casualties;
    defender.damage_carry = total_damage % defender.effective_health;

    casualties
}

/// Indices of stacks still eligible to act or be targeted this phase.
fn surviving_indices(side: &ArmyCombatState) -> Vec<usize> {
    side.stacks
        .iter()
        .enumerate()
        .filter(|(_, stack)| stack.quantity > 0)
        .map(|(index, _)| index)
        .collect()
}

/// One strike phase: every surviving striker stack hits every surviving
/// target stack once. Eligibility is snapshotted at phase entry, so a target
/// emptied mid-phase still absorbs the remaining strikes (for zero
/// casualties) rather than redirecting them.
fn exchange_phase(
    striking: &ArmyCombatState,
    receiving: &mut ArmyCombatState,
    matrix: &EffectivenessMatrix,
    actions: &mut Vec<ActionLogEntry>,
) {
    let strikers = surviving_indices(striking);
    let targets = surviving_indices(receiving);

    for &striker_index in &strikers {
        let striker = &striking.stacks[striker_index];
        for &target_index in &targets {
            let effectiveness = matrix.lookup(
                striker.unit_type_id,
                receiving.stacks[target_index].unit_type_id,
            );
            let damage = compute_damage(striker, effectiveness);
            let target = &mut receiving.stacks[target_index];
            let casualties = apply_damage(target, damage);

            if casualties > 0 {
                actions.push(ActionLogEntry {
                    attacker_army_id: striking.army_id.clone(),
                    defender_army_id: receiving.army_id.clone(),
                    unit_type: striker.display_type.clone(),
                    target_type: target.display_type.clone(),
                    damage,
                    casualties,
                });
            }
        }
    }
}

/// Run the battle to completion and aggregate the result.
///
/// Preconditions (enforced by the orchestration layer, not here): both sides
/// have at least one stack and every stack has positive effective health.
/// Given well-formed states this function is total.
pub fn simulate_battle(
    mut attacker: ArmyCombatState,
    mut defender: ArmyCombatState,
    matrix: &EffectivenessMatrix,
    max_rounds: u32,
) -> BattleResult {
    let starting_units_attacker = attacker.total_units();
    let starting_units_defender = defender.total_units();
    let starting_strength_attacker = attacker.total_strength();
    let starting_strength_defender = defender.total_strength();

    let mut rounds: Vec<RoundLogEntry> = Vec::new();

    for round in 1..=max_rounds {
        let mut actions: Vec<ActionLogEntry> = Vec::new();

        // Attacker phase first; the defender phase then runs against the
        // phase-1-updated state, so a stack emptied in phase 1 cannot
        // retaliate this round.
        exchange_phase(&attacker, &mut defender, matrix, &mut actions);
        exchange_phase(&defender, &mut attacker, matrix, &mut actions);

        attacker.prune_destroyed();
        defender.prune_destroyed();

        rounds.push(RoundLogEntry { round, actions });

        if attacker.is_defeated() || defender.is_defeated() {
            let winner = if attacker.is_defeated() && defender.is_defeated() {
                None
            } else if defender.is_defeated() {
                Some(attacker.army_id.clone())
            } else {
                Some(defender.army_id.clone())
            };
            return summarize(
                &attacker,
                &defender,
                rounds,
                starting_strength_attacker,
                starting_strength_defender,
                starting_units_attacker,
                starting_units_defender,
                winner,
            );
        }
    }

    // Round cap reached with both sides alive: more remaining units wins,
    // equal counts are a draw.
    let winner = match attacker.total_units().cmp(&defender.total_units()) {
        std::cmp::Ordering::Greater => Some(attacker.army_id.clone()),
        std::cmp::Ordering::Less => Some(defender.army_id.clone()),
        std::cmp::Ordering::Equal => None,
    };
    summarize(
        &attacker,
        &defender,
        rounds,
        starting_strength_attacker,
        starting_strength_defender,
        starting_units_attacker,
        starting_units_defender,
        winner,
    )
}

#[allow(clippy::too_many_arguments)]
fn summarize(
    attacker: &ArmyCombatState,
    defender: &ArmyCombatState,
    rounds: Vec<RoundLogEntry>,
    starting_strength_attacker: f64,
    starting_strength_defender: f64,
    starting_units_attacker: u64,
    starting_units_defender: u64,
    winner: Option<String>,
) -> BattleResult {
    BattleResult {
        winner,
        attacker_stats: BattleSideStats {
            casualties: starting_units_attacker - attacker.total_units(),
            starting_strength: starting_strength_attacker,
            final_strength: attacker.total_strength(),
        },
        defender_stats: BattleSideStats {
            casualties: starting_units_defender - defender.total_units(),
            starting_strength: starting_strength_defender,
            final_strength: defender.total_strength(),
        },
        total_rounds: rounds.len() as u32,
        rounds,
    }
}
