//! Item definitions: stat bonuses, conditional effects, triggered effects.

use serde::{Deserialize, Serialize};

use hb_types::ability::TriggerHook;
use hb_types::modifier::StatModifier;

/// A condition gating a conditional damage amplifier (e.g. +20% vs targets
/// above 1600 HP).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AmplifierCondition {
    TargetHpAbove(f64),
    TargetHpBelow(f64),
    TargetHpPercentBelow(f64),
    CasterHpBelow(f64),
    CasterHpPercentBelow(f64),
    Always,
}

impl AmplifierCondition {
    pub fn holds(&self, target_hp: f64, target_max_hp: f64, caster_hp: f64, caster_max_hp: f64) -> bool {
        match *self {
            AmplifierCondition::TargetHpAbove(t) => target_hp > t,
            AmplifierCondition::TargetHpBelow(t) => target_hp < t,
            AmplifierCondition::TargetHpPercentBelow(pct) => {
                target_max_hp > 0.0 && target_hp / target_max_hp < pct
            }
            AmplifierCondition::CasterHpBelow(t) => caster_hp < t,
            AmplifierCondition::CasterHpPercentBelow(pct) => {
                caster_max_hp > 0.0 && caster_hp / caster_max_hp < pct
            }
            AmplifierCondition::Always => true,
        }
    }
}

/// A conditional damage amplifier an item grants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConditionalAmplifier {
    pub condition: AmplifierCondition,
    pub amp_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: String,
    pub name: String,
    pub stat_bonuses: Vec<StatModifier>,
    pub conditional_effects: Vec<ConditionalAmplifier>,
    pub triggered_effects: Vec<TriggerHook>,
    /// Grants `ability_crit` on the wearer.
    pub grants_ability_crit: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_condition_holds_above() {
        let cond = AmplifierCondition::TargetHpAbove(1600.0);
        assert!(cond.holds(1601.0, 2000.0, 0.0, 0.0));
        assert!(!cond.holds(1600.0, 2000.0, 0.0, 0.0));
    }

    #[test]
    fn percent_condition_uses_ratio() {
        let cond = AmplifierCondition::TargetHpPercentBelow(0.5);
        assert!(cond.holds(400.0, 1000.0, 0.0, 0.0));
        assert!(!cond.holds(600.0, 1000.0, 0.0, 0.0));
    }

    #[test]
    fn always_condition_always_holds() {
        assert!(AmplifierCondition::Always.holds(0.0, 0.0, 0.0, 0.0));
    }
}
