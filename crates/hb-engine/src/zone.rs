//! Persistent ground zones (`create_zone`: a persistent AoE tag on a hex
//! set that applies a per-tick effect for a duration) and scheduled
//! periodic effects (`dot`, `heal_over_time`, `interval_trigger`).
//!
//! Neither has a home on `Unit` itself, so the engine aggregate owns them
//! directly, ticked in scheduler phase 1 alongside buffs/debuffs.

use hb_types::effect::EffectDescriptor;
use hb_types::enums::Affiliation;
use hb_types::ids::UnitId;
use hb_types::HexCoord;

/// A scheduled repeated application of one effect against a single target —
/// the engine-level mechanism backing `dot`, `heal_over_time`, and
/// `interval_trigger`.
#[derive(Debug, Clone)]
pub struct PeriodicEffect {
    pub caster: UnitId,
    pub target: UnitId,
    pub inner: EffectDescriptor,
    pub star_index: usize,
    pub remaining_ticks: u32,
    pub interval_ticks: u32,
    pub ticks_until_next: u32,
}

impl PeriodicEffect {
    /// Ticks down by one; returns `true` if this tick should fire the inner
    /// effect. The caller is responsible for removing expired entries.
    pub fn tick(&mut self) -> bool {
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        if self.ticks_until_next == 0 {
            self.ticks_until_next = self.interval_ticks.max(1) - 1;
            true
        } else {
            self.ticks_until_next -= 1;
            false
        }
    }

    pub fn expired(&self) -> bool {
        self.remaining_ticks == 0
    }
}

/// A persistent AoE tag on a fixed hex set.
#[derive(Debug, Clone)]
pub struct Zone {
    pub caster: UnitId,
    pub hexes: Vec<HexCoord>,
    pub inner: EffectDescriptor,
    pub affiliation: Affiliation,
    pub star_index: usize,
    pub remaining_ticks: u32,
    pub interval_ticks: u32,
    pub ticks_until_next: u32,
}

impl Zone {
    pub fn tick(&mut self) -> bool {
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        if self.ticks_until_next == 0 {
            self.ticks_until_next = self.interval_ticks.max(1) - 1;
            true
        } else {
            self.ticks_until_next -= 1;
            false
        }
    }

    pub fn expired(&self) -> bool {
        self.remaining_ticks == 0
    }
}
