//! Flatten a battle round log to CSV (one row per damaging exchange) for
//! offline balance analysis.

use std::error::Error;

use crate::combat::engine::RoundLogEntry;

/// Render the round log as CSV with a header row. Rows keep simulation
/// order: rounds ascending, actions in strike order within a round.
pub fn rounds_to_csv(rounds: &[RoundLogEntry]) -> Result<String, Box<dyn Error>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "round",
        "attacker_army_id",
        "defender_army_id",
        "unit_type",
        "target_type",
        "damage",
        "casualties",
    ])?;

    for round in rounds {
        for action in &round.actions {
            writer.write_record([
                round.round.to_string(),
                action.attacker_army_id.clone(),
                action.defender_army_id.clone(),
                action.unit_type.clone(),
                action.target_type.clone(),
                action.damage.to_string(),
                action.casualties.to_string(),
            ])?;
        }
    }

    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::engine::ActionLogEntry;

    #[test]
    fn csv_has_header_and_one_row_per_action() {
        let rounds = vec![
            RoundLogEntry {
                round: 1,
                actions: vec![ActionLogEntry {
                    attacker_army_id: "a".to_string(),
                    defender_army_id: "b".to_string(),
                    unit_type: "Knight".to_string(),
                    target_type: "Archer".to_string(),
                    damage: 42.5,
                    casualties: 3,
                }],
            },
            RoundLogEntry {
                round: 2,
                actions: vec![],
            },
        ];

        let csv = rounds_to_csv(&rounds).expect("csv export should succeed");
        let lines: Vec<&str> = csv.trim_end().lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("round,attacker_army_id"));
        assert_eq!(lines[1], "1,a,b,Knight,Archer,42.5,3");
    }
}
