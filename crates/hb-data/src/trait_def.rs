//! Trait (class synergy) definitions: threshold → trigger + effect list.
//!
//! The engine only needs to know *what* to apply and *when*; counting how
//! many units on a team carry a given trait tag, and deciding which
//! threshold is currently active, is the trait manager's job — an external
//! collaborator registered via `attach_trait_manager`. This type is the
//! shape that collaborator hands the engine.

use serde::{Deserialize, Serialize};

use hb_types::ability::TriggerPoint;
use hb_types::effect::EffectDescriptor;

/// One activation tier of a trait: "at N units of this tag, apply these
/// effects at this trigger point".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitThreshold {
    pub count: u32,
    pub trigger: TriggerPoint,
    pub effects: Vec<EffectDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitDef {
    pub id: String,
    pub name: String,
    pub thresholds: Vec<TraitThreshold>,
}

impl TraitDef {
    /// The highest threshold met by `active_count`, or `None` if the unit
    /// count hasn't reached the first tier yet.
    pub fn active_threshold(&self, active_count: u32) -> Option<&TraitThreshold> {
        self.thresholds
            .iter()
            .filter(|t| t.count <= active_count)
            .max_by_key(|t| t.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hb_types::effect::{EffectDescriptor, EffectKind};
    use hb_types::enums::StatKind;

    fn sample() -> TraitDef {
        TraitDef {
            id: "pyromancer".into(),
            name: "Pyromancer".into(),
            thresholds: vec![
                TraitThreshold {
                    count: 2,
                    trigger: TriggerPoint::OnCast,
                    effects: vec![EffectDescriptor::simple(
                        EffectKind::Buff {
                            duration_ticks: 30,
                            deltas: vec![],
                            stacking: hb_types::enums::StackingPolicy::Refresh,
                        },
                        [10.0, 10.0, 10.0],
                    )],
                },
                TraitThreshold {
                    count: 4,
                    trigger: TriggerPoint::OnCast,
                    effects: vec![EffectDescriptor::simple(
                        EffectKind::PermanentStack {
                            stat: StatKind::Ap,
                            per_trigger: 5.0,
                        },
                        [0.0, 0.0, 0.0],
                    )],
                },
            ],
        }
    }

    #[test]
    fn picks_highest_met_threshold() {
        let def = sample();
        assert_eq!(def.active_threshold(1), None);
        assert_eq!(def.active_threshold(2).unwrap().count, 2);
        assert_eq!(def.active_threshold(3).unwrap().count, 2);
        assert_eq!(def.active_threshold(4).unwrap().count, 4);
        assert_eq!(def.active_threshold(10).unwrap().count, 4);
    }
}
