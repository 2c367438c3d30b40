//! The effective-stat rule and the scaling formula ability effects draw on.

use hb_types::enums::{ScalingKey, StatKind};
use hb_types::modifier::{ModifierKind, StatModifier};
use hb_types::unit::StatBlock;

/// `effective = (base + Σ flat_mods) × (1 + Σ percent_mods)`, clamped per
/// stat.
pub fn effective_stat(base: f64, stat: StatKind, flat_mods: &[StatModifier], percent_mods: &[StatModifier]) -> f64 {
    let flat_sum: f64 = flat_mods
        .iter()
        .filter(|m| m.stat == stat && m.kind == ModifierKind::Flat)
        .map(|m| m.value)
        .sum();
    let percent_sum: f64 = percent_mods
        .iter()
        .filter(|m| m.stat == stat && m.kind == ModifierKind::Percent)
        .map(|m| m.value)
        .sum();

    let raw = (base + flat_sum) * (1.0 + percent_sum);
    let (lo, hi) = stat.clamp_range();
    raw.clamp(lo, hi)
}

/// Computes every stat at once into a fresh `StatBlock`.
pub fn effective_stat_block(base: &StatBlock, flat_mods: &[StatModifier], percent_mods: &[StatModifier]) -> StatBlock {
    use StatKind::*;
    let all = [
        MaxHp, Ad, Ap, Armor, MagicResist, AttackSpeed, CritChance, CritDamage, DodgeChance, Lifesteal, Omnivamp,
        MaxMana, AttackRange,
    ];
    let mut result = *base;
    for stat in all {
        let value = effective_stat(base.get(stat), stat, flat_mods, percent_mods);
        set_stat(&mut result, stat, value);
    }
    result
}

fn set_stat(stats: &mut StatBlock, stat: StatKind, value: f64) {
    match stat {
        StatKind::MaxHp => stats.max_hp = value,
        StatKind::Ad => stats.ad = value,
        StatKind::Ap => stats.ap = value,
        StatKind::Armor => stats.armor = value,
        StatKind::MagicResist => stats.magic_resist = value,
        StatKind::AttackSpeed => stats.attack_speed = value,
        StatKind::CritChance => stats.crit_chance = value,
        StatKind::CritDamage => stats.crit_damage = value,
        StatKind::DodgeChance => stats.dodge_chance = value,
        StatKind::Lifesteal => stats.lifesteal = value,
        StatKind::Omnivamp => stats.omnivamp = value,
        StatKind::MaxMana => stats.max_mana = value,
        StatKind::AttackRange => stats.attack_range = value,
    }
}

/// The per-star effect value after applying its scaling factor, if any.
/// `caster_hp`/`missing_hp` read the caster directly rather
/// than through `caster_effective`; `max_hp`/`missing_hp` of the defender
/// are used instead when `scaling_targets_defender` is set.
pub fn scaled_value(
    base_value: f64,
    scaling: Option<ScalingKey>,
    caster_effective: &StatBlock,
    caster_hp: f64,
    defender_effective: Option<&StatBlock>,
    defender_hp: Option<f64>,
) -> f64 {
    let Some(key) = scaling else { return base_value };

    let stat_value = match key {
        ScalingKey::Ad => caster_effective.ad,
        ScalingKey::Ap => caster_effective.ap,
        ScalingKey::Armor => caster_effective.armor,
        ScalingKey::MagicResist => caster_effective.magic_resist,
        ScalingKey::CasterHp => caster_hp,
        ScalingKey::MaxHp => defender_effective.map_or(caster_effective.max_hp, |s| s.max_hp),
        ScalingKey::MissingHp => {
            let (max_hp, hp) = defender_effective
                .zip(defender_hp)
                .map(|(s, hp)| (s.max_hp, hp))
                .unwrap_or((caster_effective.max_hp, caster_hp));
            max_hp - hp
        }
    };

    base_value * (stat_value / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hb_types::modifier::ModifierKind;

    #[test]
    fn effective_stat_applies_flat_then_percent() {
        let flats = vec![StatModifier { stat: StatKind::Ad, kind: ModifierKind::Flat, value: 20.0 }];
        let percents = vec![StatModifier { stat: StatKind::Ad, kind: ModifierKind::Percent, value: 0.5 }];
        let value = effective_stat(60.0, StatKind::Ad, &flats, &percents);
        assert_eq!(value, (60.0 + 20.0) * 1.5);
    }

    #[test]
    fn attack_speed_clamps_to_range() {
        let percents = vec![StatModifier { stat: StatKind::AttackSpeed, kind: ModifierKind::Percent, value: 10.0 }];
        let value = effective_stat(1.0, StatKind::AttackSpeed, &[], &percents);
        assert_eq!(value, 5.0);
    }

    #[test]
    fn star_scaling_symmetry_with_ad_ratio() {
        let caster = StatBlock { ad: 200.0, ..StatBlock::default() };
        let value = scaled_value(10.0, Some(ScalingKey::Ad), &caster, 800.0, None, None);
        assert_eq!(value, 20.0);
    }

    #[test]
    fn missing_hp_uses_defender_when_targeted() {
        let caster = StatBlock::default();
        let defender = StatBlock { max_hp: 1000.0, ..StatBlock::default() };
        let value = scaled_value(1.0, Some(ScalingKey::MissingHp), &caster, 500.0, Some(&defender), Some(400.0));
        assert_eq!(value, (1000.0 - 400.0) / 100.0);
    }

    #[test]
    fn no_scaling_returns_base_value() {
        let caster = StatBlock::default();
        assert_eq!(scaled_value(42.0, None, &caster, 1.0, None, None), 42.0);
    }
}
