//! Unit-type data: base combat stats per type plus the directed
//! effectiveness relation table. Curated by hand or seeded; loaded at
//! runtime to build rosters and the per-battle effectiveness matrix.

use std::fs;

use serde::{Deserialize, Serialize};

use crate::combat::EffectivenessRelation;

/// One unit type as stored in the dataset. `cost` is the purchase price in
/// army resources; combat ignores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitType {
    pub id: u32,
    pub name: String,
    pub base_health: f64,
    pub strength: f64,
    pub defense: f64,
    pub cost: u32,
}

/// Index of all unit types and their effectiveness relations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitTypeIndex {
    #[serde(default)]
    pub data_version: Option<String>,
    pub unit_types: Vec<UnitType>,
    #[serde(default)]
    pub effectiveness: Vec<EffectivenessRelation>,
}

impl UnitTypeIndex {
    pub fn find(&self, id: u32) -> Option<&UnitType> {
        self.unit_types.iter().find(|u| u.id == id)
    }
}

pub const DEFAULT_UNIT_TYPES_PATH: &str = "data/unit_types.json";

/// Load the unit-type index. Returns None if the file is missing or invalid.
pub fn load_unit_type_index(path: &str) -> Option<UnitTypeIndex> {
    let data = fs::read_to_string(path).ok()?;
    serde_json::from_str(&data).ok()
}

pub fn save_unit_type_index(path: &str, index: &UnitTypeIndex) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(index)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    if let Some(parent) = std::path::Path::new(path).parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)
}
