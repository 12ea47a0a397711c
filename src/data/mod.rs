pub mod army;
pub mod battle;
pub mod strategy;
pub mod unit_type;
pub mod validate;
