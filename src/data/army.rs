//! Army data: armies and their unit rosters. The roster join produces the
//! [crate::combat::UnitStack] list the battle engine consumes.

use std::fs;

use serde::{Deserialize, Serialize};

use crate::combat::UnitStack;
use crate::data::unit_type::UnitTypeIndex;

/// An army as stored in the dataset. `resources` is the buy/sell budget;
/// combat ignores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Army {
    pub id: String,
    pub name: String,
    pub resources: u32,
}

/// Index of all armies and roster rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArmyIndex {
    pub armies: Vec<Army>,
    #[serde(default)]
    pub army_units: Vec<ArmyRosterRow>,
}

/// One roster row: how many units of one type an army fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmyRosterRow {
    pub army_id: String,
    pub unit_type_id: u32,
    pub quantity: u32,
}

impl ArmyIndex {
    pub fn find(&self, army_id: &str) -> Option<&Army> {
        self.armies.iter().find(|a| a.id == army_id)
    }

    /// Roster rows for one army, in stored order.
    pub fn roster(&self, army_id: &str) -> Vec<&ArmyRosterRow> {
        self.army_units
            .iter()
            .filter(|row| row.army_id == army_id)
            .collect()
    }
}

/// Join an army's roster rows with the unit-type index into engine-ready
/// stacks. Rows referencing unknown unit types are skipped; dataset
/// validation reports those as errors separately.
pub fn units_in_army(
    armies: &ArmyIndex,
    unit_types: &UnitTypeIndex,
    army_id: &str,
) -> Vec<UnitStack> {
    armies
        .roster(army_id)
        .into_iter()
        .filter_map(|row| {
            let unit_type = unit_types.find(row.unit_type_id)?;
            Some(UnitStack {
                unit_type_id: unit_type.id,
                display_type: unit_type.name.clone(),
                quantity: row.quantity,
                base_health: unit_type.base_health,
                base_strength: unit_type.strength,
                base_defense: unit_type.defense,
                unit_cost: unit_type.cost,
            })
        })
        .collect()
}

pub const DEFAULT_ARMIES_PATH: &str = "data/armies.json";

/// Load the army index. Returns None if the file is missing or invalid.
pub fn load_army_index(path: &str) -> Option<ArmyIndex> {
    let data = fs::read_to_string(path).ok()?;
    serde_json::from_str(&data).ok()
}

pub fn save_army_index(path: &str, index: &ArmyIndex) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(index)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    if let Some(parent) = std::path::Path::new(path).parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)
}
