//! Debuff records: the CC and DoT state a unit carries directly, as opposed
//! to the generic `Buff` stat-delta list.

use serde::{Deserialize, Serialize};

use crate::enums::DebuffKind;
use crate::enums::DamageType;
use crate::ids::UnitId;

/// One active debuff instance on a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debuff {
    pub kind: DebuffKind,
    pub remaining_ticks: u32,
    pub total_ticks: u32,
    pub payload: DebuffPayload,
    /// The unit that applied it. Only meaningful for `Taunt` (the unit
    /// target selection is overridden toward) and `Chill` when
    /// `stack_by_source` is set; otherwise unused.
    pub source: Option<UnitId>,
}

/// Kind-specific numeric payload. Stored inline rather than as a trait
/// object since the set of kinds is closed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DebuffPayload {
    /// True damage per tick, applied at the start-of-tick buff/debuff phase.
    Burn { dps: f64 },
    /// Outgoing-heal reduction fraction on the afflicted unit.
    Wound { reduction_pct: f64 },
    /// Attack-speed multiplier (< 1.0) while active.
    Slow { as_multiplier: f64 },
    Chill { as_multiplier: f64 },
    /// Flat or percent resistance reduction. `pct` and `flat` both
    /// optional-by-zero so a single payload covers both application modes.
    Shred { pct: f64, flat: f64 },
    /// No extra payload beyond duration.
    None,
}

impl Debuff {
    pub fn tick(&mut self) -> bool {
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        self.remaining_ticks == 0
    }

    /// Burn's true-damage contribution this tick, or 0 for non-burn debuffs.
    pub fn burn_damage(&self) -> (f64, DamageType) {
        match self.payload {
            DebuffPayload::Burn { dps } => (dps, DamageType::True),
            _ => (0.0, DamageType::True),
        }
    }

    /// Refresh-on-reapply: takes the max value and max remaining duration,
    /// never sums. Used for `ArmorShred`/`MrShred`/`Burn`.
    pub fn intensify_with(&mut self, incoming: &Debuff) {
        self.remaining_ticks = self.remaining_ticks.max(incoming.remaining_ticks);
        self.total_ticks = self.total_ticks.max(incoming.total_ticks);
        self.payload = match (self.payload, incoming.payload) {
            (DebuffPayload::Shred { pct: p1, flat: f1 }, DebuffPayload::Shred { pct: p2, flat: f2 }) => {
                DebuffPayload::Shred { pct: p1.max(p2), flat: f1.max(f2) }
            }
            (DebuffPayload::Burn { dps: d1 }, DebuffPayload::Burn { dps: d2 }) => {
                DebuffPayload::Burn { dps: d1.max(d2) }
            }
            (_, incoming_payload) => incoming_payload,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shred(pct: f64, ticks: u32) -> Debuff {
        Debuff {
            kind: DebuffKind::ArmorShred,
            remaining_ticks: ticks,
            total_ticks: ticks,
            payload: DebuffPayload::Shred { pct, flat: 0.0 },
            source: None,
        }
    }

    #[test]
    fn shred_refresh_takes_max_value_and_max_ticks() {
        // sunder(20%, 60t) then sunder(15%, 90t) => active sunder(20%, 90t)
        let mut active = shred(0.20, 60);
        let incoming = shred(0.15, 90);
        active.intensify_with(&incoming);
        assert_eq!(active.remaining_ticks, 90);
        match active.payload {
            DebuffPayload::Shred { pct, .. } => assert!((pct - 0.20).abs() < 1e-9),
            _ => panic!("expected shred payload"),
        }
    }

    #[test]
    fn burn_intensify_takes_max_dps_and_max_ticks() {
        let mut active = Debuff {
            kind: DebuffKind::Burn,
            remaining_ticks: 90,
            total_ticks: 90,
            payload: DebuffPayload::Burn { dps: 30.0 },
            source: None,
        };
        let incoming = Debuff {
            kind: DebuffKind::Burn,
            remaining_ticks: 120,
            total_ticks: 120,
            payload: DebuffPayload::Burn { dps: 20.0 },
            source: None,
        };
        active.intensify_with(&incoming);
        assert_eq!(active.remaining_ticks, 120);
        match active.payload {
            DebuffPayload::Burn { dps } => assert_eq!(dps, 30.0),
            _ => panic!("expected burn payload"),
        }
    }

    #[test]
    fn tick_down_to_zero_reports_expiry() {
        let mut d = shred(0.1, 1);
        assert!(d.tick());
    }
}
