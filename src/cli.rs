use std::env;

use crate::combat::{
    apply_perks, rounds_to_csv, simulate_battle, ArmyCombatState, ArmyRole, EffectivenessMatrix,
    EffectivenessRelation, StrategyBonuses, UnitStack, DEFAULT_MAX_ROUNDS,
};
use crate::data::army::{load_army_index, DEFAULT_ARMIES_PATH};
use crate::data::strategy::{load_strategy_index, DEFAULT_STRATEGIES_PATH};
use crate::data::unit_type::{load_unit_type_index, DEFAULT_UNIT_TYPES_PATH};
use crate::data::validate::{
    validate_army_dataset, validate_strategy_dataset, validate_unit_type_dataset, ValidationReport,
};
use crate::server;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Simulate,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("simulate") => Some(Command::Simulate),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(),
        Some(Command::Simulate) => handle_simulate(args),
        Some(Command::Validate) => handle_validate(),
        None => {
            eprintln!("usage: garrison <serve|simulate|validate>");
            2
        }
    }
}

fn handle_serve() -> i32 {
    let bind_addr = env::var("GARRISON_BIND").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    match server::run_server(&bind_addr) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

/// Run a built-in demo battle and print the round log. `--csv` switches the
/// output to the flat CSV export.
fn handle_simulate(args: &[String]) -> i32 {
    let as_csv = args.iter().any(|arg| arg == "--csv");

    let aggressive = StrategyBonuses {
        offensive_bonus: 1.2,
        defensive_bonus: 0.9,
    };
    let defensive = StrategyBonuses {
        offensive_bonus: 0.9,
        defensive_bonus: 1.2,
    };

    let attacker = ArmyCombatState::new(
        "demo-red",
        ArmyRole::Attacker,
        vec![
            apply_perks(demo_stack(1, "Swordsman", 40, 50.0, 6.0, 5.0), aggressive),
            apply_perks(demo_stack(2, "Archer", 25, 30.0, 9.0, 2.0), aggressive),
        ],
    );
    let defender = ArmyCombatState::new(
        "demo-blue",
        ArmyRole::Defender,
        vec![
            apply_perks(demo_stack(3, "Pikeman", 35, 45.0, 5.0, 8.0), defensive),
            apply_perks(demo_stack(2, "Archer", 20, 30.0, 9.0, 2.0), defensive),
        ],
    );

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

    let result = simulate_battle(attacker, defender, &matrix, DEFAULT_MAX_ROUNDS);

    if as_csv {
        match rounds_to_csv(&result.rounds) {
            Ok(csv) => print!("{csv}"),
            Err(err) => {
                eprintln!("csv export failed: {err}");
                return 1;
            }
        }
    } else {
        for round in &result.rounds {
            println!("round {}", round.round);
            for action in &round.actions {
                println!(
                    "  {} ({}) -> {} ({}): {:.1} damage, {} casualties",
                    action.unit_type,
                    action.attacker_army_id,
                    action.target_type,
                    action.defender_army_id,
                    action.damage,
                    action.casualties
                );
            }
        }
        match &result.winner {
            Some(winner) => println!("winner: {winner} after {} rounds", result.total_rounds),
            None => println!("draw after {} rounds", result.total_rounds),
        }
        println!(
            "attacker casualties: {}, defender casualties: {}",
            result.attacker_stats.casualties, result.defender_stats.casualties
        );
    }
    0
}

fn demo_stack(
    unit_type_id: u32,
    name: &str,
    quantity: u32,
    base_health: f64,
    base_strength: f64,
    base_defense: f64,
) -> UnitStack {
    UnitStack {
        unit_type_id,
        display_type: name.to_string(),
        quantity,
        base_health,
        base_strength,
        base_defense,
        unit_cost: 0,
    }
}

/// Validate the default data files and print diagnostics. Exit code 1 if
/// any error-severity diagnostic is found.
fn handle_validate() -> i32 {
    let unit_types = load_unit_type_index(DEFAULT_UNIT_TYPES_PATH).unwrap_or_default();
    let armies = load_army_index(DEFAULT_ARMIES_PATH).unwrap_or_default();
    let strategies = load_strategy_index(DEFAULT_STRATEGIES_PATH).unwrap_or_default();

    let mut report = ValidationReport::default();
    report.merge(validate_unit_type_dataset(&unit_types));
    report.merge(validate_strategy_dataset(&strategies));
    report.merge(validate_army_dataset(&armies, &unit_types));

    if report.diagnostics.is_empty() {
        println!("all datasets clean");
        return 0;
    }
    for diag in &report.diagnostics {
        println!("[{}] {}: {}", diag.severity, diag.context, diag.message);
    }
    if report.has_errors() {
        1
    } else {
        0
    }
}
