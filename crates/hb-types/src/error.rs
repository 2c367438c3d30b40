//! Error classes.
//!
//! Configuration errors are caller mistakes, fatal before `run`. Engine
//! errors are invariant violations — implementation bugs that abort the
//! simulation and get recorded into the event log as a `Fatal` event before
//! propagating. Expected combat conditions (dodge, no valid target, a
//! blocked path) are never errors — they're ordinary enum outcomes.

use thiserror::Error;

use crate::ids::UnitId;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown effect kind: {0}")]
    UnknownEffectKind(String),
    #[error("malformed selector: {0}")]
    MalformedSelector(String),
    #[error("missing ability id: {0}")]
    MissingAbility(String),
    #[error("stat {stat} out of range: {value}")]
    StatOutOfRange { stat: String, value: f64 },
    #[error("duplicate unit id: {0}")]
    DuplicateUnit(UnitId),
    #[error("hex {0:?} is out of bounds for a {1}x{2} grid")]
    OutOfBounds(crate::hex::HexCoord, u32, u32),
    #[error("cannot add units after the simulation has started")]
    SimulationAlreadyRunning,
}

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("unit {0} has negative HP before death marking")]
    NegativeHpBeforeDeath(UnitId),
    #[error("grid occupancy conflict at {0:?}: already occupied by {1}")]
    OccupancyConflict(crate::hex::HexCoord, UnitId),
    #[error("projectile {0} references a dead source unit {1}")]
    ProjectileDeadSource(crate::ids::ProjectileId, UnitId),
    #[error("unit {0} entered Casting while already mid-cast")]
    DoubleCast(UnitId),
    #[error("unit {0} not found in the arena")]
    UnitNotFound(UnitId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_messages_are_human_readable() {
        let err = ConfigError::UnknownEffectKind("frobnicate".into());
        assert_eq!(err.to_string(), "unknown effect kind: frobnicate");
    }

    #[test]
    fn engine_error_includes_unit_id() {
        let err = EngineError::UnitNotFound(UnitId::new(3));
        assert!(err.to_string().contains("UnitId#3"));
    }
}
