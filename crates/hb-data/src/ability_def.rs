//! Ability definitions, keyed by the same id strings
//! `unit_def::UnitDef::default_ability_id` carries.

use std::collections::HashMap;
use std::sync::OnceLock;

use hb_types::ability::{AbilityDef, ProjectileParams};
use hb_types::effect::EffectDescriptor;
use hb_types::effect::EffectKind;
use hb_types::enums::{Affiliation, AoeShape, DamageType, DeliveryKind, ScalingKey};
use hb_types::targeting::{SelectorKind, SelectorSpec};

fn registry() -> &'static HashMap<String, AbilityDef> {
    static REGISTRY: OnceLock<HashMap<String, AbilityDef>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        sample_abilities()
            .into_iter()
            .map(|def| (def.id.clone(), def))
            .collect()
    })
}

/// Look up an ability definition by id. `"none"` resolves to a no-op
/// placeholder rather than `None`, since units with no real ability still
/// carry `default_ability_id: "none"` and the engine shouldn't special-case
/// the string at every call site.
pub fn get_ability_def(id: &str) -> Option<&'static AbilityDef> {
    registry().get(id)
}

fn sample_abilities() -> Vec<AbilityDef> {
    vec![
        // A unit with no real ability still needs an entry to resolve
        // against; mana_cost of infinity means it never reaches cast
        // threshold even if something grants the unit mana.
        AbilityDef {
            id: "none".into(),
            mana_cost: f64::INFINITY,
            cast_time_ticks: [0, 0, 0],
            delivery: DeliveryKind::Instant,
            selector: SelectorSpec::new(SelectorKind::CurrentTarget),
            projectile: None,
            aoe_shape: None,
            affiliation: Affiliation::Enemies,
            effects: Vec::new(),
            overflow: false,
        },
        AbilityDef {
            id: "piercing_bolt".into(),
            mana_cost: 100.0,
            cast_time_ticks: [15, 15, 15],
            delivery: DeliveryKind::Projectile,
            selector: SelectorSpec::new(SelectorKind::Farthest),
            projectile: Some(ProjectileParams { speed_hexes_per_tick: 6.0, homing: true, can_miss: false }),
            aoe_shape: None,
            affiliation: Affiliation::Enemies,
            effects: vec![EffectDescriptor {
                kind: EffectKind::Damage { damage_type: DamageType::Physical },
                values: [150.0, 220.0, 320.0],
                scaling: Some(ScalingKey::Ad),
                scaling_targets_defender: false,
            }],
            overflow: false,
        },
        AbilityDef {
            id: "fireball".into(),
            mana_cost: 100.0,
            cast_time_ticks: [20, 20, 20],
            delivery: DeliveryKind::Area,
            selector: SelectorSpec::new(SelectorKind::Cluster { radius: 1 }),
            projectile: None,
            aoe_shape: Some(AoeShape::Circle { radius: 2 }),
            affiliation: Affiliation::Enemies,
            effects: vec![EffectDescriptor {
                kind: EffectKind::Damage { damage_type: DamageType::Magical },
                values: [120.0, 180.0, 260.0],
                scaling: Some(ScalingKey::Ap),
                scaling_targets_defender: false,
            }],
            overflow: false,
        },
    ]
}
