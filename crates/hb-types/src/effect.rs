//! Effect descriptors: the data-driven tagged union an ability's effect list
//! is built from. Effects are data; `hb_engine::effects` carries the
//! registry that maps each `EffectKind` variant to its application logic via
//! an exhaustive match.

use serde::{Deserialize, Serialize};

use crate::enums::{AoeShape, DamageType, ScalingKey, StackingPolicy};
use crate::modifier::StatModifier;

/// One entry in an ability's effect list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectDescriptor {
    pub kind: EffectKind,
    /// Per-star value array: `values[star - 1]`.
    pub values: [f64; 3],
    /// Optional stat-scaling key; `None` means the value array is used as-is.
    pub scaling: Option<ScalingKey>,
    /// When `scaling` is `MaxHp`/`MissingHp` and this is `true`, resolve
    /// against the *target* instead of the caster.
    pub scaling_targets_defender: bool,
}

impl EffectDescriptor {
    pub fn simple(kind: EffectKind, values: [f64; 3]) -> Self {
        Self { kind, values, scaling: None, scaling_targets_defender: false }
    }

    pub fn value_for_star(&self, star_index: usize) -> f64 {
        self.values[star_index.min(2)]
    }
}

/// Every effect kind the engine can apply, grouped by behaviour: damage,
/// resistance debuffs, crowd control, support, movement, and the
/// meta/compositional kinds that wrap or gate other effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectKind {
    // ---- Damage-producing ----
    Damage { damage_type: DamageType },
    /// AD + AP combined: `values` is the AD component, `ap_ratio` the
    /// additional AP-scaled component (as a fraction of caster AP).
    HybridDamage { ap_ratio: f64 },
    Dot { damage_type: DamageType, duration_ticks: u32, interval_ticks: u32 },
    /// Refresh-don't-stack true damage over time.
    Burn { duration_ticks: u32, interval_ticks: u32 },
    Execute { hp_pct_threshold: f64 },
    PercentHpDamage { damage_type: DamageType },
    SplashDamage { radius: u32, splash_pct: f64, damage_type: DamageType },
    Ricochet { chains: u32, search_radius: u32, damage_type: DamageType },
    MultiHit { hits: u32, damage_type: DamageType },
    DashThrough { damage_type: DamageType },
    ProjectileSwarm { count: u32, spread_deg: f64 },
    ProjectileSpread { count: u32, spread_deg: f64 },

    // ---- Resistance debuffs ----
    Sunder { pct: f64, flat: f64, duration_ticks: u32 },
    Shred { pct: f64, flat: f64, duration_ticks: u32 },

    // ---- Crowd control ----
    Stun { duration_ticks: u32 },
    Slow { as_multiplier: f64, duration_ticks: u32 },
    Chill { as_multiplier: f64, duration_ticks: u32, stack_by_source: bool },
    Silence { duration_ticks: u32 },
    Disarm { duration_ticks: u32 },
    Knockback { distance: u32 },
    Pull { distance: u32 },
    Taunt { duration_ticks: u32 },

    // ---- Support ----
    Heal,
    HealOverTime { duration_ticks: u32, interval_ticks: u32 },
    Shield { duration_ticks: u32 },
    ShieldSelf { duration_ticks: u32 },
    Buff { duration_ticks: u32, deltas: Vec<StatModifier>, stacking: StackingPolicy },
    BuffTeam { duration_ticks: u32, deltas: Vec<StatModifier>, stacking: StackingPolicy },
    DecayingBuff { duration_ticks: u32, deltas: Vec<StatModifier> },
    StackingBuff { deltas: Vec<StatModifier>, cap_stacks: u32 },
    ManaGrant,
    Cleanse,

    // ---- Movement ----
    Dash,

    // ---- Special / meta ----
    EffectGroup { effects: Vec<EffectDescriptor> },
    CreateZone { shape: AoeShape, duration_ticks: u32, interval_ticks: u32, inner: Box<EffectDescriptor> },
    IntervalTrigger { duration_ticks: u32, interval_ticks: u32, inner: Box<EffectDescriptor> },
    PermanentStack { stat: crate::enums::StatKind, per_trigger: f64 },
    ManaReave { extra_cost_pct: f64, duration_ticks: u32 },
    ReplaceAttacks { count: u32, effects: Vec<EffectDescriptor> },
    Transform { into_ability_id: String },
    TransformAfterCasts { casts_required: u32, into_ability_id: String },
    EscalatingAbility { stage_ability_ids: Vec<String> },
}

impl EffectKind {
    /// Human-readable tag, used for `ConfigError::UnknownEffectKind` and
    /// event-log payloads.
    pub fn tag(&self) -> &'static str {
        match self {
            EffectKind::Damage { .. } => "damage",
            EffectKind::HybridDamage { .. } => "hybrid_damage",
            EffectKind::Dot { .. } => "dot",
            EffectKind::Burn { .. } => "burn",
            EffectKind::Execute { .. } => "execute",
            EffectKind::PercentHpDamage { .. } => "percent_hp_damage",
            EffectKind::SplashDamage { .. } => "splash_damage",
            EffectKind::Ricochet { .. } => "ricochet",
            EffectKind::MultiHit { .. } => "multi_hit",
            EffectKind::DashThrough { .. } => "dash_through",
            EffectKind::ProjectileSwarm { .. } => "projectile_swarm",
            EffectKind::ProjectileSpread { .. } => "projectile_spread",
            EffectKind::Sunder { .. } => "sunder",
            EffectKind::Shred { .. } => "shred",
            EffectKind::Stun { .. } => "stun",
            EffectKind::Slow { .. } => "slow",
            EffectKind::Chill { .. } => "chill",
            EffectKind::Silence { .. } => "silence",
            EffectKind::Disarm { .. } => "disarm",
            EffectKind::Knockback { .. } => "knockback",
            EffectKind::Pull { .. } => "pull",
            EffectKind::Taunt { .. } => "taunt",
            EffectKind::Heal => "heal",
            EffectKind::HealOverTime { .. } => "heal_over_time",
            EffectKind::Shield { .. } => "shield",
            EffectKind::ShieldSelf { .. } => "shield_self",
            EffectKind::Buff { .. } => "buff",
            EffectKind::BuffTeam { .. } => "buff_team",
            EffectKind::DecayingBuff { .. } => "decaying_buff",
            EffectKind::StackingBuff { .. } => "stacking_buff",
            EffectKind::ManaGrant => "mana_grant",
            EffectKind::Cleanse => "cleanse",
            EffectKind::Dash => "dash",
            EffectKind::EffectGroup { .. } => "effect_group",
            EffectKind::CreateZone { .. } => "create_zone",
            EffectKind::IntervalTrigger { .. } => "interval_trigger",
            EffectKind::PermanentStack { .. } => "permanent_stack",
            EffectKind::ManaReave { .. } => "mana_reave",
            EffectKind::ReplaceAttacks { .. } => "replace_attacks",
            EffectKind::Transform { .. } => "transform",
            EffectKind::TransformAfterCasts { .. } => "transform_after_casts",
            EffectKind::EscalatingAbility { .. } => "escalating_ability",
        }
    }
}

/// Result of applying one effect: whether it took hold, the numeric value
/// actually applied (damage dealt, HP healed, stacks gained...), and any
/// side-effect descriptors it spawned (an `EffectGroup`'s children, mainly).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectResult {
    pub success: bool,
    pub value_applied: f64,
    pub side_effects: Vec<EffectDescriptor>,
}

impl EffectResult {
    pub fn ok(value_applied: f64) -> Self {
        Self { success: true, value_applied, side_effects: Vec::new() }
    }

    pub fn failed() -> Self {
        Self { success: false, value_applied: 0.0, side_effects: Vec::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_for_star_indexes_correctly() {
        let descriptor = EffectDescriptor::simple(
            EffectKind::Damage { damage_type: DamageType::Physical },
            [10.0, 20.0, 30.0],
        );
        assert_eq!(descriptor.value_for_star(0), 10.0);
        assert_eq!(descriptor.value_for_star(1), 20.0);
        assert_eq!(descriptor.value_for_star(2), 30.0);
    }

    #[test]
    fn value_for_star_clamps_out_of_range_index() {
        let descriptor = EffectDescriptor::simple(EffectKind::Heal, [5.0, 10.0, 15.0]);
        assert_eq!(descriptor.value_for_star(9), 15.0);
    }

    #[test]
    fn tag_matches_expected_snake_case_name() {
        assert_eq!(EffectKind::Damage { damage_type: DamageType::Physical }.tag(), "damage");
        assert_eq!(EffectKind::SplashDamage { radius: 1, splash_pct: 0.5, damage_type: DamageType::Magical }.tag(), "splash_damage");
    }

    #[test]
    fn effect_result_ok_sets_success_and_value() {
        let result = EffectResult::ok(42.0);
        assert!(result.success);
        assert_eq!(result.value_applied, 42.0);
        assert!(result.side_effects.is_empty());
    }
}
