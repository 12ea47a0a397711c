//! Dataset validation: catches curation mistakes (duplicate effectiveness
//! pairs, non-positive health, dangling references) before they reach the
//! battle engine, which assumes well-formed inputs.

use std::collections::HashSet;
use std::fmt;

use crate::data::army::ArmyIndex;
use crate::data::strategy::StrategyIndex;
use crate::data::unit_type::UnitTypeIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.diagnostics.extend(other.diagnostics);
    }
}

/// Strategy bonuses outside (0, this] draw a warning; the engine accepts
/// any positive multiplier but values past this are almost certainly typos.
const BONUS_SANITY_CAP: f64 = 5.0;

/// Validate unit types and the effectiveness relation table.
pub fn validate_unit_type_dataset(index: &UnitTypeIndex) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut seen_ids: HashSet<u32> = HashSet::new();
    let mut seen_names: HashSet<&str> = HashSet::new();

    for unit_type in &index.unit_types {
        let context = format!("unit_type:{}", unit_type.id);
        if !seen_ids.insert(unit_type.id) {
            report.push(ValidationSeverity::Error, context.as_str(), "duplicate unit type id");
        }
        if !seen_names.insert(unit_type.name.as_str()) {
            report.push(
                ValidationSeverity::Error,
                context.as_str(),
                format!("duplicate unit type name '{}'", unit_type.name),
            );
        }
        if unit_type.base_health + unit_type.defense <= 0.0 {
            report.push(
                ValidationSeverity::Error,
                context.as_str(),
                "base_health + defense must be positive (effective health pool would be empty)",
            );
        }
        if unit_type.strength < 0.0 {
            report.push(ValidationSeverity::Error, context.as_str(), "strength is negative");
        }
        if unit_type.defense < 0.0 {
            report.push(ValidationSeverity::Error, context.as_str(), "defense is negative");
        }
    }

    let mut seen_pairs: HashSet<(u32, u32)> = HashSet::new();
    for relation in &index.effectiveness {
        let context = format!(
            "effectiveness:{}->{}",
            relation.attacker_unit_id, relation.defender_unit_id
        );
        if !seen_pairs.insert((relation.attacker_unit_id, relation.defender_unit_id)) {
            report.push(
                ValidationSeverity::Error,
                context.as_str(),
                "duplicate (attacker, defender) pair; matrix precedence would be load-order dependent",
            );
        }
        if index.find(relation.attacker_unit_id).is_none() {
            report.push(
                ValidationSeverity::Error,
                context.as_str(),
                "attacker_unit_id references an unknown unit type",
            );
        }
        if index.find(relation.defender_unit_id).is_none() {
            report.push(
                ValidationSeverity::Error,
                context.as_str(),
                "defender_unit_id references an unknown unit type",
            );
        }
        if relation.modifier <= 0.0 {
            report.push(
                ValidationSeverity::Error,
                context.as_str(),
                format!("modifier {} is not positive", relation.modifier),
            );
        } else if relation.modifier > BONUS_SANITY_CAP {
            report.push(
                ValidationSeverity::Warning,
                context.as_str(),
                format!("modifier {} is unusually large", relation.modifier),
            );
        }
    }

    report
}

/// Validate strategies: positive bonuses within the sanity cap.
pub fn validate_strategy_dataset(index: &StrategyIndex) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut seen_ids: HashSet<u32> = HashSet::new();

    for strategy in &index.strategies {
        let context = format!("strategy:{}", strategy.id);
        if !seen_ids.insert(strategy.id) {
            report.push(ValidationSeverity::Error, context.as_str(), "duplicate strategy id");
        }
        for (label, bonus) in [
            ("offensive_bonus", strategy.offensive_bonus),
            ("defensive_bonus", strategy.defensive_bonus),
        ] {
            if bonus <= 0.0 {
                report.push(
                    ValidationSeverity::Error,
                    context.as_str(),
                    format!("{label} {bonus} is not positive"),
                );
            } else if bonus > BONUS_SANITY_CAP {
                report.push(
                    ValidationSeverity::Warning,
                    context.as_str(),
                    format!("{label} {bonus} is unusually large"),
                );
            }
        }
    }

    report
}

/// Validate armies against the unit-type index: known types, positive
/// quantities, non-empty rosters (an empty army cannot enter battle).
pub fn validate_army_dataset(armies: &ArmyIndex, unit_types: &UnitTypeIndex) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut seen_ids: HashSet<&str> = HashSet::new();

    for army in &armies.armies {
        let context = format!("army:{}", army.id);
        if !seen_ids.insert(army.id.as_str()) {
            report.push(ValidationSeverity::Error, context.as_str(), "duplicate army id");
        }
        if armies.roster(&army.id).is_empty() {
            report.push(
                ValidationSeverity::Warning,
                context.as_str(),
                "army has no units and cannot enter battle",
            );
        }
    }

    for row in &armies.army_units {
        let context = format!("army_unit:{}:{}", row.army_id, row.unit_type_id);
        if armies.find(&row.army_id).is_none() {
            report.push(
                ValidationSeverity::Error,
                context.as_str(),
                "roster row references an unknown army",
            );
        }
        if unit_types.find(row.unit_type_id).is_none() {
            report.push(
                ValidationSeverity::Error,
                context.as_str(),
                "roster row references an unknown unit type",
            );
        }
        if row.quantity == 0 {
            report.push(
                ValidationSeverity::Warning,
                context.as_str(),
                "roster row has zero quantity",
            );
        }
    }

    report
}
