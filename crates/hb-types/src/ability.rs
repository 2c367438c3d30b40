//! Ability definitions and the trigger-hook seam trait/item managers plug
//! into.

use serde::{Deserialize, Serialize};

use crate::effect::EffectDescriptor;
use crate::enums::{AoeShape, Affiliation, DeliveryKind};
use crate::targeting::SelectorSpec;

/// Projectile flight parameters for `DeliveryKind::Projectile`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileParams {
    pub speed_hexes_per_tick: f64,
    pub homing: bool,
    pub can_miss: bool,
}

/// A reference ability definition — shared by every unit that uses it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDef {
    pub id: String,
    pub mana_cost: f64,
    /// Cast time in ticks, indexed by `star - 1`.
    pub cast_time_ticks: [u32; 3],
    pub delivery: DeliveryKind,
    pub selector: SelectorSpec,
    pub projectile: Option<ProjectileParams>,
    pub aoe_shape: Option<AoeShape>,
    pub affiliation: Affiliation,
    pub effects: Vec<EffectDescriptor>,
    /// If true, mana above `max_mana` at cast resolution carries into the
    /// next cycle instead of resetting to zero.
    pub overflow: bool,
}

impl AbilityDef {
    pub fn cast_time_for_star(&self, star_index: usize) -> u32 {
        self.cast_time_ticks[star_index.min(2)]
    }
}

/// The fixed points in the pipeline a trigger hook can fire at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerPoint {
    OnHit,
    OnTakeDamage,
    OnCast,
    OnKill,
    Interval { every_ticks: u32 },
}

/// A condition + effect pair an external trait/item manager registers.
/// The engine evaluates the condition and, if it holds, applies the effect
/// — it never inspects *why* the hook exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerHook {
    pub id: String,
    pub point: TriggerPoint,
    pub effect: EffectDescriptor,
    /// Optional minimum-HP / above-threshold style gate, evaluated against
    /// the triggering unit's HP percent. `None` always fires.
    pub condition_hp_pct_at_least: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectKind;
    use crate::enums::DamageType;
    use crate::targeting::SelectorKind;

    fn sample_ability() -> AbilityDef {
        AbilityDef {
            id: "test_bolt".into(),
            mana_cost: 100.0,
            cast_time_ticks: [15, 15, 15],
            delivery: DeliveryKind::Instant,
            selector: SelectorSpec::new(SelectorKind::Nearest),
            projectile: None,
            aoe_shape: None,
            affiliation: Affiliation::Enemies,
            effects: vec![EffectDescriptor::simple(
                EffectKind::Damage { damage_type: DamageType::Magical },
                [100.0, 200.0, 300.0],
            )],
            overflow: false,
        }
    }

    #[test]
    fn cast_time_for_star_indexes_correctly() {
        let mut ability = sample_ability();
        ability.cast_time_ticks = [10, 20, 30];
        assert_eq!(ability.cast_time_for_star(0), 10);
        assert_eq!(ability.cast_time_for_star(2), 30);
    }
}
