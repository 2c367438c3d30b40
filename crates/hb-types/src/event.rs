//! The append-only event log.
//!
//! Each record is tagged with its tick and a strongly typed payload rather
//! than an untyped map — the payload shape is still exactly what a replayer
//! needs, and `serde` renders it as a tagged JSON object when serialized.

use serde::{Deserialize, Serialize};

use crate::enums::{DamageType, Team};
use crate::hex::HexCoord;
use crate::ids::{BuffId, ProjectileId, UnitId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub tick: u32,
    pub kind: EventKind,
}

impl Event {
    pub fn new(tick: u32, kind: EventKind) -> Self {
        Self { tick, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    SimulationStart {
        seed: u64,
        tick_rate: u32,
        grid_width: u32,
        grid_height: u32,
    },
    SimulationEnd {
        winner_team: Option<Team>,
        total_ticks: u32,
        deaths_per_team: [u32; 2],
    },
    UnitSpawn {
        unit_id: UnitId,
        team: Team,
        pos: HexCoord,
    },
    UnitMove {
        unit_id: UnitId,
        from: HexCoord,
        to: HexCoord,
    },
    UnitAttack {
        unit_id: UnitId,
        target_id: UnitId,
    },
    UnitDamage {
        unit_id: UnitId,
        target_id: UnitId,
        raw_damage: f64,
        final_damage: f64,
        damage_type: DamageType,
        crit: bool,
        dodged: bool,
    },
    UnitHeal {
        unit_id: UnitId,
        target_id: UnitId,
        amount: f64,
    },
    UnitDeath {
        unit_id: UnitId,
    },
    AbilityCast {
        unit_id: UnitId,
        ability_id: String,
    },
    AbilityEffect {
        unit_id: UnitId,
        target_id: Option<UnitId>,
        effect_tag: String,
    },
    ProjectileSpawn {
        projectile_id: ProjectileId,
        source_id: UnitId,
        target_id: UnitId,
    },
    ProjectileHit {
        projectile_id: ProjectileId,
        target_id: UnitId,
    },
    ProjectileMiss {
        projectile_id: ProjectileId,
        target_id: UnitId,
    },
    BuffApply {
        unit_id: UnitId,
        buff_id: BuffId,
        name: String,
    },
    BuffExpire {
        unit_id: UnitId,
        buff_id: BuffId,
    },
    DebuffApply {
        unit_id: UnitId,
        debuff_tag: String,
    },
    StateChange {
        unit_id: UnitId,
        from: String,
        to: String,
    },
    TargetAcquired {
        unit_id: UnitId,
        target_id: UnitId,
    },
    Fatal {
        message: String,
    },
}

/// Append-only event log plus the seed needed to reproduce it: the log plus
/// the seed is sufficient to reconstruct the battle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    pub events: Vec<Event>,
}

impl EventLog {
    pub fn push(&mut self, tick: u32, kind: EventKind) {
        self.events.push(Event::new(tick, kind));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }
}
