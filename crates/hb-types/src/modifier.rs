//! Stat modifiers and buffs — the additive/percentage deltas that feed the
//! effective-stat rule, and the buff objects `buff`/`buff_team` attach to a
//! unit.

use serde::{Deserialize, Serialize};

use crate::enums::{StackingPolicy, StatKind};
use crate::ids::BuffId;

/// One additive or percentage delta against a single stat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatModifier {
    pub stat: StatKind,
    pub kind: ModifierKind,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    Flat,
    Percent,
}

/// Where a buff or debuff came from — used only for logging/debugging and
/// by the (external) trait/item managers to identify their own stacks.
/// `EffectGroup`/card and engine-authored content all route through
/// `Ability`; the string is the ability or effect-group id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModifierSource {
    Ability { id: String },
    Item { id: String },
    Trait { id: String },
    Innate,
}

/// An active buff (or debuff expressed as a buff with negative deltas)
/// attached to a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub id: BuffId,
    pub name: String,
    pub source: ModifierSource,
    pub deltas: Vec<StatModifier>,
    pub remaining_ticks: u32,
    pub stacking: StackingPolicy,
    /// For `decaying_buff`: deltas shrink linearly to zero over the
    /// buff's original duration instead of applying at full strength
    /// until expiry.
    pub decaying: bool,
    pub total_ticks: u32,
}

impl Buff {
    /// The deltas this buff currently contributes, after decay is applied.
    pub fn active_deltas(&self) -> Vec<StatModifier> {
        if !self.decaying || self.total_ticks == 0 {
            return self.deltas.clone();
        }
        let fraction = self.remaining_ticks as f64 / self.total_ticks as f64;
        self.deltas
            .iter()
            .map(|d| StatModifier {
                stat: d.stat,
                kind: d.kind,
                value: d.value * fraction,
            })
            .collect()
    }

    /// Advance one tick; returns `true` if the buff has now expired.
    pub fn tick(&mut self) -> bool {
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        self.remaining_ticks == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(stat: StatKind, value: f64) -> StatModifier {
        StatModifier { stat, kind: ModifierKind::Flat, value }
    }

    #[test]
    fn decaying_buff_linearly_shrinks() {
        let mut buff = Buff {
            id: BuffId::new(1),
            name: "test".into(),
            source: ModifierSource::Innate,
            deltas: vec![flat(StatKind::Ad, 100.0)],
            remaining_ticks: 10,
            stacking: StackingPolicy::Refresh,
            decaying: true,
            total_ticks: 10,
        };
        assert_eq!(buff.active_deltas()[0].value, 100.0);
        for _ in 0..5 {
            buff.tick();
        }
        assert_eq!(buff.active_deltas()[0].value, 50.0);
    }

    #[test]
    fn non_decaying_buff_stays_full_strength() {
        let mut buff = Buff {
            id: BuffId::new(2),
            name: "test".into(),
            source: ModifierSource::Innate,
            deltas: vec![flat(StatKind::Armor, 20.0)],
            remaining_ticks: 30,
            stacking: StackingPolicy::Refresh,
            decaying: false,
            total_ticks: 30,
        };
        buff.tick();
        buff.tick();
        assert_eq!(buff.active_deltas()[0].value, 20.0);
    }

    #[test]
    fn tick_reports_expiry() {
        let mut buff = Buff {
            id: BuffId::new(3),
            name: "brief".into(),
            source: ModifierSource::Innate,
            deltas: vec![],
            remaining_ticks: 1,
            stacking: StackingPolicy::Refresh,
            decaying: false,
            total_ticks: 1,
        };
        assert!(buff.tick());
    }
}
