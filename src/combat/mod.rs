pub mod effectiveness;
pub mod engine;
pub mod export_csv;
pub mod units;

pub use effectiveness::{EffectivenessMatrix, EffectivenessRelation};
pub use engine::{
    apply_damage, compute_damage, simulate_battle, ActionLogEntry, BattleResult, BattleSideStats,
    RoundLogEntry, DEFAULT_MAX_ROUNDS,
};
pub use export_csv::rounds_to_csv;
pub use units::{
    apply_perks, ArmyCombatState, ArmyRole, CombatUnitStack, StrategyBonuses, UnitStack,
};
