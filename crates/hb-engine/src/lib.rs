//! All mutable combat logic for the hex battler lives here: the tick
//! scheduler, the unit/grid/projectile aggregates, targeting, damage, and
//! the effect registry. `hb_data` supplies the static tables this crate
//! reads from; this crate never constructs them.

pub mod ability;
pub mod arena;
pub mod damage;
pub mod effects;
pub mod grid;
pub mod mana;
pub mod pathfind;
pub mod projectile;
pub mod scheduler;
pub mod simulation;
pub mod state_machine;
pub mod stats;
pub mod targeting;
pub mod zone;
