use garrison::combat::{
    apply_damage, apply_perks, compute_damage, simulate_battle, ArmyCombatState, ArmyRole,
    CombatUnitStack, EffectivenessMatrix, EffectivenessRelation, StrategyBonuses, UnitStack,
    DEFAULT_MAX_ROUNDS,
};

fn stack(
    unit_type_id: u32,
    name: &str,
    quantity: u32,
    effective_health: f64,
    effective_strength: f64,
) -> CombatUnitStack {
    CombatUnitStack {
        unit_type_id,
        display_type: name.to_string(),
        quantity,
        unit_cost: 0,
        effective_health,
        effective_strength,
        damage_carry: 0.0,
    }
}

fn army(id: &str, role: ArmyRole, stacks: Vec<CombatUnitStack>) -> ArmyCombatState {
    ArmyCombatState::new(id, role, stacks)
}

#[test]
fn matrix_defaults_to_neutral_for_unlisted_pairs() {
    let matrix = EffectivenessMatrix::from_relations(&[
        EffectivenessRelation {
            attacker_unit_id: 1,
            defender_unit_id: 2,
            modifier: 2.0,
        },
        EffectivenessRelation {
            attacker_unit_id: 2,
            defender_unit_id: 1,
            modifier: 0.5,
        },
    ]);

    assert_eq!(matrix.lookup(1, 2), 2.0);
    assert_eq!(matrix.lookup(2, 1), 0.5);
    // Reverse of a listed pair is not implied.
    assert_eq!(matrix.lookup(2, 2), 1.0);
    assert_eq!(matrix.lookup(1, 1), 1.0);
    assert_eq!(matrix.lookup(100, 200), 1.0);
}

#[test]
fn damage_is_linear_in_quantity_strength_and_effectiveness() {
    let attacker = stack(1, "Knight", 7, 100.0, 12.5);
    assert_eq!(compute_damage(&attacker, 1.0), 87.5);
    assert_eq!(compute_damage(&attacker, 2.0), 175.0);
    assert_eq!(compute_damage(&attacker, 0.4), 35.0);
}

#[test]
fn damage_is_zero_for_empty_or_strengthless_stacks() {
    let empty = stack(1, "Knight", 0, 100.0, 12.5);
    assert_eq!(compute_damage(&empty, 3.0), 0.0);

    let strengthless = stack(1, "Militia", 50, 100.0, 0.0);
    assert_eq!(compute_damage(&strengthless, 3.0), 0.0);
}

#[test]
fn casualties_never_exceed_quantity_and_quantity_never_goes_negative() {
    let mut defender = stack(2, "Archer", 4, 10.0, 1.0);
    let casualties = apply_damage(&mut defender, 1000.0);

    assert_eq!(casualties, 4);
    assert_eq!(defender.quantity, 0);
}

#[test]
fn casualties_floor_against_effective_health() {
    let mut defender = stack(2, "Archer", 10, 10.0, 1.0);
    let casualties = apply_damage(&mut defender, 35.0);

    assert_eq!(casualties, 3);
    assert_eq!(defender.quantity, 7);
    assert_eq!(defender.damage_carry, 5.0);
}

#[test]
fn sub_lethal_damage_carries_and_accumulates_to_a_kill() {
    let mut defender = stack(2, "Archer", 5, 10.0, 1.0);

    assert_eq!(apply_damage(&mut defender, 6.0), 0);
    assert_eq!(defender.quantity, 5);
    assert_eq!(defender.damage_carry, 6.0);

    // 6 carried + 6 new = 12: one casualty, 2 left over.
    assert_eq!(apply_damage(&mut defender, 6.0), 1);
    assert_eq!(defender.quantity, 4);
    assert_eq!(defender.damage_carry, 2.0);
}

#[test]
fn overkill_keeps_the_uncapped_remainder() {
    let mut defender = stack(2, "Archer", 1, 10.0, 1.0);
    // 55 damage would kill 5; only 1 exists. The carry is still 55 mod 10.
    let casualties = apply_damage(&mut defender, 55.0);

    assert_eq!(casualties, 1);
    assert_eq!(defender.quantity, 0);
    assert_eq!(defender.damage_carry, 5.0);
}

#[test]
fn perk_application_derives_effective_stats() {
    let roster_stack = UnitStack {
        unit_type_id: 1,
        display_type: "Knight".to_string(),
        quantity: 3,
        base_health: 50.0,
        base_strength: 10.0,
        base_defense: 15.0,
        unit_cost: 200,
    };
    let combat = apply_perks(
        roster_stack,
        StrategyBonuses {
            offensive_bonus: 1.5,
            defensive_bonus: 0.8,
        },
    );

    assert_eq!(combat.effective_strength, 15.0);
    assert_eq!(combat.effective_health, 52.0);
    assert_eq!(combat.damage_carry, 0.0);
}

#[test]
fn overwhelming_attacker_wins_in_finite_rounds() {
    let attacker = army(
        "strong",
        ArmyRole::Attacker,
        vec![stack(1, "Knight", 100, 200.0, 50.0)],
    );
    let defender = army(
        "weak",
        ArmyRole::Defender,
        vec![stack(2, "Militia", 10, 10.0, 0.5)],
    );
    let matrix = EffectivenessMatrix::from_relations(&[]);

    let result = simulate_battle(attacker, defender, &matrix, DEFAULT_MAX_ROUNDS);

    assert_eq!(result.winner.as_deref(), Some("strong"));
    assert!(result.total_rounds <= DEFAULT_MAX_ROUNDS);
    assert_eq!(result.defender_stats.casualties, 10);
    assert_eq!(result.defender_stats.final_strength, 0.0);
}

#[test]
fn equal_remaining_units_at_round_cap_is_a_draw() {
    // Zero effective strength on both sides: nobody ever dies.
    let attacker = army(
        "left",
        ArmyRole::Attacker,
        vec![stack(1, "Pacifist", 10, 10.0, 0.0)],
    );
    let defender = army(
        "right",
        ArmyRole::Defender,
        vec![stack(2, "Pacifist", 10, 10.0, 0.0)],
    );
    let matrix = EffectivenessMatrix::from_relations(&[]);

    let result = simulate_battle(attacker, defender, &matrix, 20);

    assert_eq!(result.winner, None);
    assert_eq!(result.total_rounds, 20);
    assert_eq!(result.attacker_stats.casualties, 0);
    assert_eq!(result.defender_stats.casualties, 0);
    // Zero-casualty exchanges are never logged.
    assert!(result.rounds.iter().all(|r| r.actions.is_empty()));
}

#[test]
fn round_cap_tie_break_favors_more_remaining_units() {
    let attacker = army(
        "few",
        ArmyRole::Attacker,
        vec![stack(1, "Pacifist", 5, 10.0, 0.0)],
    );
    let defender = army(
        "many",
        ArmyRole::Defender,
        vec![stack(2, "Pacifist", 6, 10.0, 0.0)],
    );
    let matrix = EffectivenessMatrix::from_relations(&[]);

    let result = simulate_battle(attacker, defender, &matrix, 5);

    assert_eq!(result.winner.as_deref(), Some("many"));
    assert_eq!(result.total_rounds, 5);
}

#[test]
fn end_to_end_single_round_elimination() {
    // Army A: 10 units, strength 5, health 100. Army B: 1 unit, strength 1,
    // health 10. Neutral effectiveness. A kills B's stack in round 1; B's
    // lone unit chips 1 damage into A's carry and is not logged.
    let attacker = army(
        "army-a",
        ArmyRole::Attacker,
        vec![stack(1, "Legionary", 10, 100.0, 5.0)],
    );
    let defender = army(
        "army-b",
        ArmyRole::Defender,
        vec![stack(2, "Scout", 1, 10.0, 1.0)],
    );
    let matrix = EffectivenessMatrix::from_relations(&[]);

    let result = simulate_battle(attacker, defender, &matrix, DEFAULT_MAX_ROUNDS);

    assert_eq!(result.winner.as_deref(), Some("army-a"));
    assert_eq!(result.total_rounds, 1);
    assert_eq!(result.attacker_stats.casualties, 0);
    assert_eq!(result.defender_stats.casualties, 1);
    assert_eq!(result.attacker_stats.starting_strength, 50.0);
    assert_eq!(result.attacker_stats.final_strength, 50.0);
    assert_eq!(result.defender_stats.starting_strength, 1.0);
    assert_eq!(result.defender_stats.final_strength, 0.0);

    assert_eq!(result.rounds.len(), 1);
    let actions = &result.rounds[0].actions;
    assert_eq!(actions.len(), 1, "only the lethal exchange is logged");
    assert_eq!(actions[0].attacker_army_id, "army-a");
    assert_eq!(actions[0].defender_army_id, "army-b");
    assert_eq!(actions[0].unit_type, "Legionary");
    assert_eq!(actions[0].target_type, "Scout");
    assert_eq!(actions[0].damage, 50.0);
    assert_eq!(actions[0].casualties, 1);
}

#[test]
fn stack_emptied_in_attacker_phase_cannot_retaliate() {
    // Defender's only stack dies in phase 1, so phase 2 has no strikers and
    // the attacker takes no damage at all.
    let attacker = army(
        "a",
        ArmyRole::Attacker,
        vec![stack(1, "Knight", 10, 50.0, 100.0)],
    );
    let defender = army(
        "b",
        ArmyRole::Defender,
        vec![stack(2, "Archer", 5, 10.0, 100.0)],
    );
    let matrix = EffectivenessMatrix::from_relations(&[]);

    let result = simulate_battle(attacker, defender, &matrix, DEFAULT_MAX_ROUNDS);

    assert_eq!(result.winner.as_deref(), Some("a"));
    assert_eq!(result.attacker_stats.casualties, 0);
    assert!(result.rounds[0]
        .actions
        .iter()
        .all(|action| action.attacker_army_id == "a"));
}

#[test]
fn all_pairs_exchange_hits_every_surviving_target() {
    // One attacker stack vs two defender stacks: both defender stacks take
    // a full-strength strike in round 1.
    let attacker = army(
        "a",
        ArmyRole::Attacker,
        vec![stack(1, "Catapult", 2, 100.0, 30.0)],
    );
    let defender = army(
        "b",
        ArmyRole::Defender,
        vec![
            stack(2, "Archer", 10, 20.0, 0.0),
            stack(3, "Pikeman", 10, 30.0, 0.0),
        ],
    );
    let matrix = EffectivenessMatrix::from_relations(&[]);

    let result = simulate_battle(attacker, defender, &matrix, 1);

    let actions = &result.rounds[0].actions;
    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0].target_type, "Archer");
    assert_eq!(actions[0].damage, 60.0);
    assert_eq!(actions[0].casualties, 3);
    assert_eq!(actions[1].target_type, "Pikeman");
    assert_eq!(actions[1].damage, 60.0);
    assert_eq!(actions[1].casualties, 2);
}

#[test]
fn effectiveness_modifier_scales_damage() {
    let attacker = army(
        "a",
        ArmyRole::Attacker,
        vec![stack(1, "Archer", 10, 100.0, 2.0)],
    );
    let defender = army(
        "b",
        ArmyRole::Defender,
        vec![stack(2, "Swordsman", 10, 10.0, 0.0)],
    );
    let matrix = EffectivenessMatrix::from_relations(&[EffectivenessRelation {
        attacker_unit_id: 1,
        defender_unit_id: 2,
        modifier: 1.5,
    }]);

    let result = simulate_battle(attacker, defender, &matrix, 1);

    let actions = &result.rounds[0].actions;
    assert_eq!(actions.len(), 1);
    // 10 * 2.0 * 1.5 = 30 damage against 10 health per unit.
    assert_eq!(actions[0].damage, 30.0);
    assert_eq!(actions[0].casualties, 3);
}

#[test]
fn simulation_is_deterministic() {
    let build = || {
        (
            army(
                "a",
                ArmyRole::Attacker,
                vec![
                    stack(1, "Swordsman", 40, 55.0, 6.0),
                    stack(2, "Archer", 25, 32.0, 9.0),
                ],
            ),
            army(
                "b",
                ArmyRole::Defender,
                vec![
                    stack(3, "Pikeman", 35, 63.6, 4.5),
                    stack(2, "Archer", 20, 38.4, 8.1),
                ],
            ),
        )
    };
    let matrix = EffectivenessMatrix::from_relations(&[
        EffectivenessRelation {
            attacker_unit_id: 2,
            defender_unit_id: 1,
            modifier: 1.5,
        },
        EffectivenessRelation {
            attacker_unit_id: 3,
            defender_unit_id: 1,
            modifier: 1.25,
        },
    ]);

    let (attacker_a, defender_a) = build();
    let (attacker_b, defender_b) = build();
    let first = simulate_battle(attacker_a, defender_a, &matrix, DEFAULT_MAX_ROUNDS);
    let second = simulate_battle(attacker_b, defender_b, &matrix, DEFAULT_MAX_ROUNDS);

    assert_eq!(first, second);
    let first_json = serde_json::to_string(&first).expect("result should serialize");
    let second_json = serde_json::to_string(&second).expect("result should serialize");
    assert_eq!(first_json, second_json);
}

#[test]
fn destroyed_stacks_are_pruned_between_rounds() {
    let attacker = army(
        "a",
        ArmyRole::Attacker,
        vec![stack(1, "Knight", 10, 1000.0, 20.0)],
    );
    let defender = army(
        "b",
        ArmyRole::Defender,
        vec![
            stack(2, "Militia", 2, 10.0, 1.0),
            stack(3, "Pikeman", 500, 40.0, 1.0),
        ],
    );
    let matrix = EffectivenessMatrix::from_relations(&[]);

    let result = simulate_battle(attacker, defender, &matrix, 3);

    // Militia dies in round 1; later rounds only ever log Pikeman targets.
    for round in &result.rounds[1..] {
        assert!(round
            .actions
            .iter()
            .filter(|a| a.attacker_army_id == "a")
            .all(|a| a.target_type == "Pikeman"));
    }
}
