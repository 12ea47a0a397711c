//! garrison: web backend for a turn-limited army-combat game.
//!
//! The heart of the crate is [combat]: a deterministic, round-based battle
//! resolver over unit stacks, strategy perks, and a type-effectiveness
//! matrix. [data] holds the JSON-file datasets, [service] orchestrates one
//! battle end to end, and [server] exposes the HTTP API.

pub mod cli;
pub mod combat;
pub mod data;
pub mod server;
pub mod service;
