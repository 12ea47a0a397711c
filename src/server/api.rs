use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::data::army::{load_army_index, units_in_army, DEFAULT_ARMIES_PATH};
use crate::data::battle::{append_battle, delete_battle, load_battle_index, DEFAULT_BATTLES_PATH};
use crate::data::strategy::{load_strategy_index, DEFAULT_STRATEGIES_PATH};
use crate::data::unit_type::{load_unit_type_index, DEFAULT_UNIT_TYPES_PATH};
use crate::service::{self, BattleError, GameData};

// Serializes read-modify-write cycles on the battle store.
static BATTLE_STORE_MTX: Mutex<()> = Mutex::new(());

#[derive(Debug, Clone, Deserialize)]
pub struct StartBattleRequest {
    pub attacker_army_id: String,
    pub defender_army_id: String,
    pub location: String,
    pub attacker_strategy_id: u32,
    pub defender_strategy_id: u32,
}

#[derive(Debug)]
pub enum StartBattlePayloadError {
    Parse(serde_json::Error),
    Validation(String),
    NotFound(String),
    Internal(String),
}

impl fmt::Display for StartBattlePayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Validation(msg) | Self::NotFound(msg) | Self::Internal(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl std::error::Error for StartBattlePayloadError {}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "garrison-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitTypeListItem {
    pub id: u32,
    pub name: String,
    pub base_health: f64,
    pub strength: f64,
    pub defense: f64,
    pub cost: u32,
}

pub fn unit_types_payload() -> Result<String, serde_json::Error> {
    let index = load_unit_type_index(DEFAULT_UNIT_TYPES_PATH).unwrap_or_default();
    let list: Vec<UnitTypeListItem> = index
        .unit_types
        .into_iter()
        .map(|u| UnitTypeListItem {
            id: u.id,
            name: u.name,
            base_health: u.base_health,
            strength: u.strength,
            defense: u.defense,
            cost: u.cost,
        })
        .collect();
    serde_json::to_string_pretty(&serde_json::json!({
        "unit_types": list,
        "effectiveness": index.effectiveness,
    }))
}

pub fn strategies_payload() -> Result<String, serde_json::Error> {
    let index = load_strategy_index(DEFAULT_STRATEGIES_PATH).unwrap_or_default();
    serde_json::to_string_pretty(&serde_json::json!({ "strategies": index.strategies }))
}

#[derive(Debug, Clone, Serialize)]
pub struct ArmyListItem {
    pub id: String,
    pub name: String,
    pub resources: u32,
    pub total_units: u64,
}

pub fn armies_payload() -> Result<String, serde_json::Error> {
    let index = load_army_index(DEFAULT_ARMIES_PATH).unwrap_or_default();
    let list: Vec<ArmyListItem> = index
        .armies
        .iter()
        .map(|a| ArmyListItem {
            id: a.id.clone(),
            name: a.name.clone(),
            resources: a.resources,
            total_units: index
                .roster(&a.id)
                .iter()
                .map(|row| u64::from(row.quantity))
                .sum(),
        })
        .collect();
    serde_json::to_string_pretty(&serde_json::json!({ "armies": list }))
}

/// Single army with its roster. Ok(None) means unknown id (404).
pub fn army_payload(army_id: &str) -> Result<Option<String>, serde_json::Error> {
    let data = GameData::load_default();
    let Some(army) = data.armies.find(army_id) else {
        return Ok(None);
    };
    let roster = units_in_army(&data.armies, &data.unit_types, army_id);
    let payload = serde_json::to_string_pretty(&serde_json::json!({
        "id": army.id,
        "name": army.name,
        "resources": army.resources,
        "units": roster,
    }))?;
    Ok(Some(payload))
}

pub fn battles_payload() -> Result<String, serde_json::Error> {
    let index = load_battle_index(DEFAULT_BATTLES_PATH);
    serde_json::to_string_pretty(&serde_json::json!({ "battles": index.battles }))
}

pub fn battle_payload(battle_id: &str) -> Result<Option<String>, serde_json::Error> {
    let index = load_battle_index(DEFAULT_BATTLES_PATH);
    let Some(battle) = index.find(battle_id) else {
        return Ok(None);
    };
    Ok(Some(serde_json::to_string_pretty(battle)?))
}

pub fn battle_report_payload(battle_id: &str) -> Result<Option<String>, serde_json::Error> {
    let data = GameData::load_default();
    let battles = load_battle_index(DEFAULT_BATTLES_PATH);
    let Some(report) = service::battle_report(&data, &battles, battle_id) else {
        return Ok(None);
    };
    Ok(Some(serde_json::to_string_pretty(&report)?))
}

pub fn army_battles_payload(army_id: &str) -> Result<Option<String>, serde_json::Error> {
    let armies = load_army_index(DEFAULT_ARMIES_PATH).unwrap_or_default();
    if armies.find(army_id).is_none() {
        return Ok(None);
    }
    let index = load_battle_index(DEFAULT_BATTLES_PATH);
    let battles = index.for_army(army_id);
    Ok(Some(serde_json::to_string_pretty(&serde_json::json!({
        "army_id": army_id,
        "battles": battles,
    }))?))
}

fn validate_start_request(request: &StartBattleRequest) -> Result<(), String> {
    let mut problems: Vec<&str> = Vec::new();
    if request.attacker_army_id.trim().is_empty() {
        problems.push("attacker_army_id must not be empty");
    }
    if request.defender_army_id.trim().is_empty() {
        problems.push("defender_army_id must not be empty");
    }
    if request.location.trim().is_empty() {
        problems.push("location must not be empty");
    }
    if !request.attacker_army_id.trim().is_empty()
        && request.attacker_army_id == request.defender_army_id
    {
        problems.push("an army cannot battle itself");
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems.join("; "))
    }
}

/// Handle POST /api/battles: validate, simulate, persist, return the log.
pub fn start_battle_payload(body: &str) -> Result<String, StartBattlePayloadError> {
    let request: StartBattleRequest =
        serde_json::from_str(body).map_err(StartBattlePayloadError::Parse)?;
    validate_start_request(&request).map_err(StartBattlePayloadError::Validation)?;

    let data = GameData::load_default();
    let completed = service::start_battle(
        &data,
        request.attacker_army_id.trim(),
        request.defender_army_id.trim(),
        request.location.trim(),
        request.attacker_strategy_id,
        request.defender_strategy_id,
    )
    .map_err(|err| match err {
        BattleError::ArmyNotFound(_) => StartBattlePayloadError::NotFound(err.to_string()),
        BattleError::EmptyArmy(_) | BattleError::UnknownStrategy(_) => {
            StartBattlePayloadError::Validation(err.to_string())
        }
    })?;

    {
        let _guard = BATTLE_STORE_MTX
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        append_battle(DEFAULT_BATTLES_PATH, completed.record)
            .map_err(|e| StartBattlePayloadError::Internal(e.to_string()))?;
    }

    serde_json::to_string_pretty(&completed.log).map_err(StartBattlePayloadError::Parse)
}

/// Handle DELETE /api/battles/<id>. Ok(false) means unknown id (404).
pub fn delete_battle_payload(battle_id: &str) -> Result<bool, String> {
    let _guard = BATTLE_STORE_MTX
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    delete_battle(DEFAULT_BATTLES_PATH, battle_id).map_err(|e| e.to_string())
}
