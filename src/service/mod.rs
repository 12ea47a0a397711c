//! Battle orchestration: validates the request against the loaded datasets,
//! prepares both sides, runs the simulation, and assembles the
//! display-ready log plus the record the persistence layer stores.
//!
//! All validation happens here, strictly before the engine runs; the engine
//! itself has no failure modes.

use std::error::Error;
use std::fmt;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::combat::{
    apply_perks, simulate_battle, ArmyCombatState, ArmyRole, BattleSideStats, EffectivenessMatrix,
    RoundLogEntry, DEFAULT_MAX_ROUNDS,
};
use crate::data::army::{load_army_index, units_in_army, ArmyIndex, DEFAULT_ARMIES_PATH};
use crate::data::battle::{BattleIndex, BattleOutcome, StoredBattle, StoredBattleArmy};
use crate::data::strategy::{load_strategy_index, StrategyIndex, DEFAULT_STRATEGIES_PATH};
use crate::data::unit_type::{load_unit_type_index, UnitTypeIndex, DEFAULT_UNIT_TYPES_PATH};

/// The datasets a battle draws on, loaded once per request.
#[derive(Debug, Clone, Default)]
pub struct GameData {
    pub unit_types: UnitTypeIndex,
    pub armies: ArmyIndex,
    pub strategies: StrategyIndex,
}

impl GameData {
    /// Load from the default data files. Missing files load as empty
    /// indices; requests against them fail with not-found errors.
    pub fn load_default() -> Self {
        Self {
            unit_types: load_unit_type_index(DEFAULT_UNIT_TYPES_PATH).unwrap_or_default(),
            armies: load_army_index(DEFAULT_ARMIES_PATH).unwrap_or_default(),
            strategies: load_strategy_index(DEFAULT_STRATEGIES_PATH).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    ArmyNotFound(ArmyRole),
    EmptyArmy(ArmyRole),
    UnknownStrategy(u32),
}

impl fmt::Display for BattleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArmyNotFound(role) => write!(f, "{} army not found", role.as_str()),
            Self::EmptyArmy(role) => write!(f, "{} army has no units", role.as_str()),
            Self::UnknownStrategy(id) => write!(f, "strategy {id} does not exist"),
        }
    }
}

impl Error for BattleError {}

/// Winning army of a finished battle, with display fields resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleWinner {
    pub army_id: String,
    pub name: String,
    pub role: ArmyRole,
}

/// Per-side stats with display fields resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedSideStats {
    pub army_id: String,
    pub name: String,
    pub casualties: u64,
    pub starting_strength: f64,
    pub final_strength: f64,
}

/// Display-ready battle log returned to the caller. `winner: None` is a
/// draw (the JSON shows a null winner plus per-army outcomes).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleLog {
    pub battle_id: String,
    pub date: String,
    pub location: String,
    pub winner: Option<BattleWinner>,
    pub attacker_stats: NamedSideStats,
    pub defender_stats: NamedSideStats,
    pub total_rounds: u32,
    pub rounds: Vec<RoundLogEntry>,
}

/// Output of one orchestrated battle: the log for the response body and the
/// record for the battle store.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedBattle {
    pub log: BattleLog,
    pub record: StoredBattle,
}

/// Run one battle end to end against in-memory datasets.
pub fn start_battle(
    data: &GameData,
    attacker_army_id: &str,
    defender_army_id: &str,
    location: &str,
    attacker_strategy_id: u32,
    defender_strategy_id: u32,
) -> Result<CompletedBattle, BattleError> {
    let attacker_army = data
        .armies
        .find(attacker_army_id)
        .ok_or(BattleError::ArmyNotFound(ArmyRole::Attacker))?;
    let defender_army = data
        .armies
        .find(defender_army_id)
        .ok_or(BattleError::ArmyNotFound(ArmyRole::Defender))?;

    let attacker_strategy = data
        .strategies
        .find(attacker_strategy_id)
        .ok_or(BattleError::UnknownStrategy(attacker_strategy_id))?;
    let defender_strategy = data
        .strategies
        .find(defender_strategy_id)
        .ok_or(BattleError::UnknownStrategy(defender_strategy_id))?;

    let attacker_units = units_in_army(&data.armies, &data.unit_types, attacker_army_id);
    if attacker_units.is_empty() {
        return Err(BattleError::EmptyArmy(ArmyRole::Attacker));
    }
    let defender_units = units_in_army(&data.armies, &data.unit_types, defender_army_id);
    if defender_units.is_empty() {
        return Err(BattleError::EmptyArmy(ArmyRole::Defender));
    }

    let attacker_state = ArmyCombatState::new(
        attacker_army.id.clone(),
        ArmyRole::Attacker,
        attacker_units
            .into_iter()
            .map(|u| apply_perks(u, attacker_strategy.bonuses()))
            .collect(),
    );
    let defender_state = ArmyCombatState::new(
        defender_army.id.clone(),
        ArmyRole::Defender,
        defender_units
            .into_iter()
            .map(|u| apply_perks(u, defender_strategy.bonuses()))
            .collect(),
    );

    let matrix = EffectivenessMatrix::from_relations(&data.unit_types.effectiveness);
    let result = simulate_battle(attacker_state, defender_state, &matrix, DEFAULT_MAX_ROUNDS);

    let winner_role = match result.winner.as_deref() {
        Some(id) if id == attacker_army_id => Some(ArmyRole::Attacker),
        Some(_) => Some(ArmyRole::Defender),
        None => None,
    };
    let winner = winner_role.map(|role| {
        let army = match role {
            ArmyRole::Attacker => attacker_army,
            ArmyRole::Defender => defender_army,
        };
        BattleWinner {
            army_id: army.id.clone(),
            name: army.name.clone(),
            role,
        }
    });

    let battle_id = Uuid::new_v4().to_string();
    let date = Utc::now().to_rfc3339();

    let record = StoredBattle {
        id: battle_id.clone(),
        location: location.to_string(),
        date: date.clone(),
        armies: vec![
            stored_side(
                attacker_army_id,
                attacker_strategy_id,
                ArmyRole::Attacker,
                winner_role,
                result.attacker_stats,
            ),
            stored_side(
                defender_army_id,
                defender_strategy_id,
                ArmyRole::Defender,
                winner_role,
                result.defender_stats,
            ),
        ],
        total_rounds: result.total_rounds,
        rounds: result.rounds.clone(),
    };

    let log = BattleLog {
        battle_id,
        date,
        location: location.to_string(),
        winner,
        attacker_stats: NamedSideStats {
            army_id: attacker_army.id.clone(),
            name: attacker_army.name.clone(),
            casualties: result.attacker_stats.casualties,
            starting_strength: result.attacker_stats.starting_strength,
            final_strength: result.attacker_stats.final_strength,
        },
        defender_stats: NamedSideStats {
            army_id: defender_army.id.clone(),
            name: defender_army.name.clone(),
            casualties: result.defender_stats.casualties,
            starting_strength: result.defender_stats.starting_strength,
            final_strength: result.defender_stats.final_strength,
        },
        total_rounds: result.total_rounds,
        rounds: result.rounds,
    };

    Ok(CompletedBattle { log, record })
}

fn stored_side(
    army_id: &str,
    strategy_id: u32,
    role: ArmyRole,
    winner_role: Option<ArmyRole>,
    stats: BattleSideStats,
) -> StoredBattleArmy {
    // A draw stores `lost` for both rows; the report derives "draw" from
    // the absence of a winning row.
    let outcome = if winner_role == Some(role) {
        BattleOutcome::Won
    } else {
        BattleOutcome::Lost
    };
    StoredBattleArmy {
        army_id: army_id.to_string(),
        strategy_id,
        role,
        outcome,
        starting_strength: stats.starting_strength,
        final_strength: stats.final_strength,
        casualties: stats.casualties,
    }
}

/// One army row of a battle report, display fields resolved against the
/// current datasets ("unknown" when the army or strategy has since been
/// deleted).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportArmy {
    pub army_id: String,
    pub name: String,
    pub strategy: String,
    pub starting_strength: f64,
    pub final_strength: f64,
    pub casualties: u64,
    pub role: ArmyRole,
    pub outcome: &'static str,
}

/// Read-model of one stored battle for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleReport {
    pub battle_id: String,
    pub date: String,
    pub location: String,
    pub winner: Option<BattleWinner>,
    pub armies: Vec<ReportArmy>,
}

/// Build the report for one stored battle. Returns None if the id is
/// unknown.
pub fn battle_report(
    data: &GameData,
    battles: &BattleIndex,
    battle_id: &str,
) -> Option<BattleReport> {
    let stored = battles.find(battle_id)?;
    let drawn = !stored
        .armies
        .iter()
        .any(|row| row.outcome == BattleOutcome::Won);

    let armies: Vec<ReportArmy> = stored
        .armies
        .iter()
        .map(|row| {
            let name = data
                .armies
                .find(&row.army_id)
                .map_or_else(|| "unknown".to_string(), |a| a.name.clone());
            let strategy = data
                .strategies
                .find(row.strategy_id)
                .map_or_else(|| "unknown".to_string(), |s| s.name.clone());
            let outcome = if drawn {
                "draw"
            } else {
                match row.outcome {
                    BattleOutcome::Won => "won",
                    BattleOutcome::Lost => "lost",
                }
            };
            ReportArmy {
                army_id: row.army_id.clone(),
                name,
                strategy,
                starting_strength: row.starting_strength,
                final_strength: row.final_strength,
                casualties: row.casualties,
                role: row.role,
                outcome,
            }
        })
        .collect();

    let winner = stored
        .armies
        .iter()
        .find(|row| row.outcome == BattleOutcome::Won)
        .map(|row| BattleWinner {
            army_id: row.army_id.clone(),
            name: data
                .armies
                .find(&row.army_id)
                .map_or_else(|| "unknown".to_string(), |a| a.name.clone()),
            role: row.role,
        });

    Some(BattleReport {
        battle_id: stored.id.clone(),
        date: stored.date.clone(),
        location: stored.location.clone(),
        winner,
        armies,
    })
}
