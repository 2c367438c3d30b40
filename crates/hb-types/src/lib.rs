//! Core types for the hex battler engine — zero game logic beyond serde.
//!
//! This crate defines every type shared across the engine: ids, hex
//! coordinates, the seeded RNG, stat/buff/debuff/unit state, ability and
//! effect descriptors, events, and error types. Mutable game logic lives in
//! `hb_engine`.

pub mod ability;
pub mod debuff;
pub mod effect;
pub mod enums;
pub mod error;
pub mod event;
pub mod hex;
pub mod ids;
pub mod modifier;
pub mod rng;
pub mod targeting;
pub mod unit;

pub use enums::*;
pub use hex::{FractionalHex, HexCoord, HexDirection};
pub use ids::*;
pub use rng::BattleRng;
