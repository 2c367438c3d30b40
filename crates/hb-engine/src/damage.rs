//! The damage pipeline. Every function here is pure over value structs —
//! no arena or grid access.

use hb_types::{BattleRng, DamageType};

/// Per-hit inputs the pipeline needs. Crit/dodge only apply to
/// auto-attacks; ability damage skips both unless `ability_crit` grants a
/// crit roll.
#[derive(Debug, Clone, Copy)]
pub struct DamageInput {
    pub base_damage: f64,
    pub damage_type: DamageType,
    pub is_auto_attack: bool,
    pub can_crit: bool,
    pub crit_chance: f64,
    pub crit_damage: f64,
    pub dodge_chance: f64,
    pub target_armor: f64,
    pub target_magic_resist: f64,
    pub target_armor_shred_pct: f64,
    pub target_armor_shred_flat: f64,
    pub target_mr_shred_pct: f64,
    pub target_mr_shred_flat: f64,
    /// `∏(1 + amp_i)` already folded from buffs/items/traits (step 5).
    pub amplifier_multiplier: f64,
    /// `Σ durability_i`, clamped to at most 0.9 internally (step 6).
    pub durability_sum: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageResult {
    /// Pre-mitigation damage — preserved because mana gain uses it.
    pub raw_damage: f64,
    pub final_damage: f64,
    pub damage_type: DamageType,
    pub crit: bool,
    pub dodged: bool,
}

/// Effective resistance after shred:
/// `max(0, resistance × (1 - pct_shred) - flat_shred)`.
fn effective_resistance(resistance: f64, shred_pct: f64, shred_flat: f64) -> f64 {
    (resistance * (1.0 - shred_pct) - shred_flat).max(0.0)
}

/// `R = resistance / (resistance + 100)`; the classic diminishing-returns
/// mitigation curve (100 armor ⇒ 50% reduction).
fn reduction_factor(resistance: f64) -> f64 {
    resistance / (resistance + 100.0)
}

pub fn resolve_damage(input: DamageInput, rng: &mut BattleRng) -> DamageResult {
    let raw_damage = input.base_damage;
    let mut damage = raw_damage;
    let mut crit = false;
    let mut dodged = false;

    if input.is_auto_attack || input.can_crit {
        if rng.roll(input.crit_chance) {
            crit = true;
            damage *= 1.0 + input.crit_damage;
        }
    }

    if input.is_auto_attack && rng.roll(input.dodge_chance) {
        dodged = true;
        return DamageResult {
            raw_damage,
            final_damage: 0.0,
            damage_type: input.damage_type,
            crit,
            dodged,
        };
    }

    damage = mitigate(damage, &input);
    damage *= input.amplifier_multiplier;
    damage *= 1.0 - input.durability_sum.min(0.9);

    DamageResult {
        raw_damage,
        final_damage: damage.max(0.0),
        damage_type: input.damage_type,
        crit,
        dodged,
    }
}

fn mitigate(damage: f64, input: &DamageInput) -> f64 {
    match input.damage_type {
        DamageType::Physical => {
            let armor = effective_resistance(
                input.target_armor,
                input.target_armor_shred_pct,
                input.target_armor_shred_flat,
            );
            damage * (1.0 - reduction_factor(armor))
        }
        DamageType::Magical => {
            let mr = effective_resistance(
                input.target_magic_resist,
                input.target_mr_shred_pct,
                input.target_mr_shred_flat,
            );
            damage * (1.0 - reduction_factor(mr))
        }
        DamageType::True => damage,
    }
}

/// Applies shield absorption then HP loss, atomically — partial damage
/// application is never rolled back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbsorptionResult {
    pub absorbed_by_shield: f64,
    pub hp_lost: f64,
    pub remaining_shield: f64,
}

pub fn absorb_with_shield(final_damage: f64, shield_pool: f64) -> AbsorptionResult {
    let absorbed = final_damage.min(shield_pool);
    let hp_lost = final_damage - absorbed;
    AbsorptionResult {
        absorbed_by_shield: absorbed,
        hp_lost,
        remaining_shield: shield_pool - absorbed,
    }
}

/// Heal reduction from `wound` (heal 100 at wound 33% heals 67).
pub fn apply_wound_to_heal(heal_amount: f64, wound_pct: f64) -> f64 {
    heal_amount * (1.0 - wound_pct)
}

/// Lifesteal (physical only) and omnivamp (all types) self-heal accrued to
/// the attacker from a landed hit.
pub fn lifesteal_and_omnivamp(final_damage: f64, damage_type: DamageType, lifesteal_pct: f64, omnivamp_pct: f64) -> f64 {
    let lifesteal = if damage_type == DamageType::Physical { final_damage * lifesteal_pct } else { 0.0 };
    let omnivamp = final_damage * omnivamp_pct;
    lifesteal + omnivamp
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> DamageInput {
        DamageInput {
            base_damage: 100.0,
            damage_type: DamageType::Physical,
            is_auto_attack: false,
            can_crit: false,
            crit_chance: 0.0,
            crit_damage: 0.5,
            dodge_chance: 0.0,
            target_armor: 0.0,
            target_magic_resist: 0.0,
            target_armor_shred_pct: 0.0,
            target_armor_shred_flat: 0.0,
            target_mr_shred_pct: 0.0,
            target_mr_shred_flat: 0.0,
            amplifier_multiplier: 1.0,
            durability_sum: 0.0,
        }
    }

    #[test]
    fn armor_reduction_matches_worked_examples() {
        let mut rng = BattleRng::new(1);
        for (armor, expected_pct) in [(0.0, 0.0), (50.0, 1.0 / 3.0), (100.0, 0.5), (200.0, 2.0 / 3.0)] {
            let mut input = base_input();
            input.target_armor = armor;
            let result = resolve_damage(input, &mut rng);
            let actual_pct = 1.0 - result.final_damage / 100.0;
            assert!(
                (actual_pct - expected_pct).abs() < 0.0001,
                "armor {armor}: expected {expected_pct}, got {actual_pct}"
            );
        }
    }

    #[test]
    fn true_damage_bypasses_mitigation() {
        let mut rng = BattleRng::new(1);
        let mut input = base_input();
        input.damage_type = DamageType::True;
        input.target_armor = 500.0;
        let result = resolve_damage(input, &mut rng);
        assert_eq!(result.final_damage, 100.0);
    }

    #[test]
    fn dodge_short_circuits_to_zero() {
        let mut rng = BattleRng::new(1);
        let mut input = base_input();
        input.is_auto_attack = true;
        input.dodge_chance = 1.0;
        let result = resolve_damage(input, &mut rng);
        assert_eq!(result.final_damage, 0.0);
        assert!(result.dodged);
    }

    #[test]
    fn crit_multiplies_by_one_plus_crit_damage() {
        let mut rng = BattleRng::new(1);
        let mut input = base_input();
        input.is_auto_attack = true;
        input.crit_chance = 1.0;
        let result = resolve_damage(input, &mut rng);
        assert!(result.crit);
        assert_eq!(result.final_damage, 150.0);
    }

    #[test]
    fn shield_absorbs_before_hp() {
        let result = absorb_with_shield(80.0, 50.0);
        assert_eq!(result.absorbed_by_shield, 50.0);
        assert_eq!(result.hp_lost, 30.0);
        assert_eq!(result.remaining_shield, 0.0);
    }

    #[test]
    fn wound_reduces_heal_by_its_percent() {
        assert_eq!(apply_wound_to_heal(100.0, 0.33), 67.0);
    }

    #[test]
    fn durability_caps_reduction_at_ninety_percent() {
        let mut rng = BattleRng::new(1);
        let mut input = base_input();
        input.durability_sum = 5.0;
        let result = resolve_damage(input, &mut rng);
        assert!((result.final_damage - 10.0).abs() < 0.0001);
    }
}
