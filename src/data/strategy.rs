//! Strategy data: named bundles of offensive/defensive multipliers chosen
//! per battle per side, independent of army composition.

use std::fs;

use serde::{Deserialize, Serialize};

use crate::combat::StrategyBonuses;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: u32,
    pub name: String,
    #[serde(default = "neutral_bonus")]
    pub offensive_bonus: f64,
    #[serde(default = "neutral_bonus")]
    pub defensive_bonus: f64,
}

fn neutral_bonus() -> f64 {
    1.0
}

impl Strategy {
    pub fn bonuses(&self) -> StrategyBonuses {
        StrategyBonuses {
            offensive_bonus: self.offensive_bonus,
            defensive_bonus: self.defensive_bonus,
        }
    }
}

/// Index of all strategies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyIndex {
    pub strategies: Vec<Strategy>,
}

impl StrategyIndex {
    pub fn find(&self, id: u32) -> Option<&Strategy> {
        self.strategies.iter().find(|s| s.id == id)
    }
}

pub const DEFAULT_STRATEGIES_PATH: &str = "data/strategies.json";

/// Load the strategy index. Returns None if the file is missing or invalid.
pub fn load_strategy_index(path: &str) -> Option<StrategyIndex> {
    let data = fs::read_to_string(path).ok()?;
    serde_json::from_str(&data).ok()
}

pub fn save_strategy_index(path: &str, index: &StrategyIndex) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(index)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    if let Some(parent) = std::path::Path::new(path).parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_bonuses_default_to_neutral() {
        let strategy: Strategy =
            serde_json::from_str(r#"{"id": 1, "name": "Balanced"}"#).expect("should parse");
        assert_eq!(strategy.offensive_bonus, 1.0);
        assert_eq!(strategy.defensive_bonus, 1.0);
    }
}
