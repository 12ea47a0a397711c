//! Persisted battle records. One record per simulated battle: the per-side
//! rows the report read-model joins against, plus the full round log.

use std::fs;

use serde::{Deserialize, Serialize};

use crate::combat::{ArmyRole, RoundLogEntry};

/// Per-army outcome as stored. A drawn battle stores `lost` for both rows;
/// the report layer derives "draw" from the absence of a winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleOutcome {
    Won,
    Lost,
}

/// One side's row within a stored battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredBattleArmy {
    pub army_id: String,
    pub strategy_id: u32,
    pub role: ArmyRole,
    pub outcome: BattleOutcome,
    pub starting_strength: f64,
    pub final_strength: f64,
    pub casualties: u64,
}

/// A completed battle as persisted. `date` is RFC 3339. The full round log
/// rides along so reports can replay the exchanges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredBattle {
    pub id: String,
    pub location: String,
    pub date: String,
    pub armies: Vec<StoredBattleArmy>,
    #[serde(default)]
    pub total_rounds: u32,
    #[serde(default)]
    pub rounds: Vec<RoundLogEntry>,
}

impl StoredBattle {
    pub fn side(&self, role: ArmyRole) -> Option<&StoredBattleArmy> {
        self.armies.iter().find(|a| a.role == role)
    }

    pub fn involves_army(&self, army_id: &str) -> bool {
        self.armies.iter().any(|a| a.army_id == army_id)
    }
}

/// Index of all stored battles, append order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleIndex {
    pub battles: Vec<StoredBattle>,
}

impl BattleIndex {
    pub fn find(&self, battle_id: &str) -> Option<&StoredBattle> {
        self.battles.iter().find(|b| b.id == battle_id)
    }

    /// All battles an army fought in, on either side, in append order.
    pub fn for_army(&self, army_id: &str) -> Vec<&StoredBattle> {
        self.battles
            .iter()
            .filter(|b| b.involves_army(army_id))
            .collect()
    }
}

pub const DEFAULT_BATTLES_PATH: &str = "data/battles.json";

/// Load the battle index. Returns an empty index if the file is missing or
/// invalid, so a fresh deployment starts with no history.
pub fn load_battle_index(path: &str) -> BattleIndex {
    let Ok(data) = fs::read_to_string(path) else {
        return BattleIndex::default();
    };
    serde_json::from_str(&data).unwrap_or_default()
}

pub fn save_battle_index(path: &str, index: &BattleIndex) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(index)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    if let Some(parent) = std::path::Path::new(path).parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)
}

/// Append one battle to the store (full index rewrite).
pub fn append_battle(path: &str, battle: StoredBattle) -> std::io::Result<()> {
    let mut index = load_battle_index(path);
    index.battles.push(battle);
    save_battle_index(path, &index)
}

/// Delete a battle by id. Returns true if a record was removed.
pub fn delete_battle(path: &str, battle_id: &str) -> std::io::Result<bool> {
    let mut index = load_battle_index(path);
    let before = index.battles.len();
    index.battles.retain(|b| b.id != battle_id);
    if index.battles.len() == before {
        return Ok(false);
    }
    save_battle_index(path, &index)?;
    Ok(true)
}
