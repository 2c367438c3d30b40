//! Static definition tables for the hex battler engine.
//!
//! Everything here is data supplied by a loader — unit/trait/item
//! definitions and the engine's tunable defaults.
//! The engine (`hb_engine`) consumes these tables but never constructs them.

pub mod ability_def;
pub mod config;
pub mod item_def;
pub mod trait_def;
pub mod unit_def;

pub use ability_def::get_ability_def;
pub use config::EngineConfig;
pub use item_def::{AmplifierCondition, ConditionalAmplifier, ItemDef};
pub use trait_def::{TraitDef, TraitThreshold};
pub use unit_def::UnitDef;
