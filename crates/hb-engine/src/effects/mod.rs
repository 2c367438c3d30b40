//! The effect registry: an exhaustive match from `EffectKind` to application
//! logic, keyed off the tagged-union dispatch the ability/item/trait layers
//! all route through.
//!
//! Fan-out kinds (splash/ricochet/multi-hit/dash-through) live in
//! [`damage_effects`]; everything else is dispatched directly here.

mod damage_effects;

use std::collections::HashMap;

use hb_types::effect::{EffectDescriptor, EffectKind, EffectResult};
use hb_types::enums::{Affiliation, DamageType, DebuffKind, StackingPolicy};
use hb_types::ids::UnitId;
use hb_types::modifier::{Buff, ModifierSource};
use hb_types::unit::Shield;
use hb_types::debuff::{Debuff, DebuffPayload};
use hb_types::event::EventKind;
use hb_types::{BattleRng, HexCoord};

use hb_data::config::ManaFormulaParams;

use crate::arena::Arena;
use crate::damage::{self, DamageInput};
use crate::grid::Grid;
use crate::mana;
use crate::stats;
use crate::zone::{PeriodicEffect, Zone};

/// An in-flight auto-attack replacement: the next `remaining` auto-attacks
/// a unit lands apply `effects` instead of the plain AD swing.
#[derive(Debug, Clone)]
pub struct AttackOverride {
    pub remaining: u32,
    pub effects: Vec<EffectDescriptor>,
}

pub struct EffectContext<'a> {
    pub arena: &'a mut Arena,
    pub grid: &'a mut Grid,
    pub rng: &'a mut BattleRng,
    pub log: &'a mut Vec<hb_types::event::Event>,
    pub tick: u32,
    pub mana_formula: &'a ManaFormulaParams,
    pub periodic: &'a mut Vec<PeriodicEffect>,
    pub zones: &'a mut Vec<Zone>,
    pub attack_overrides: &'a mut HashMap<UnitId, AttackOverride>,
}

impl EffectContext<'_> {
    fn push_event(&mut self, kind: EventKind) {
        self.log.push(hb_types::event::Event::new(self.tick, kind));
    }
}

/// Applies `descriptor` on behalf of `caster` against `primary_target`
/// (when the kind is single-target) and/or `impact_hex` (when it's
/// AoE-rooted). `affiliation` is the ability's filter, already resolved by
/// the caller into a concrete candidate set where needed.
pub fn apply_effect(
    ctx: &mut EffectContext,
    descriptor: &EffectDescriptor,
    caster: UnitId,
    primary_target: Option<UnitId>,
    impact_hex: Option<HexCoord>,
    affiliation: Affiliation,
    star_index: usize,
) -> EffectResult {
    match &descriptor.kind {
        EffectKind::Damage { damage_type } => {
            damage_effects::apply_single_damage(ctx, descriptor, caster, primary_target, star_index, *damage_type)
        }
        EffectKind::HybridDamage { ap_ratio } => {
            damage_effects::apply_hybrid_damage(ctx, descriptor, caster, primary_target, star_index, *ap_ratio)
        }
        EffectKind::Dot { damage_type, duration_ticks, interval_ticks } => {
            schedule_periodic_damage(ctx, descriptor, caster, primary_target, star_index, *damage_type, *duration_ticks, *interval_ticks)
        }
        EffectKind::Burn { duration_ticks, interval_ticks: _ } => {
            apply_burn(ctx, descriptor, primary_target, star_index, *duration_ticks)
        }
        EffectKind::Execute { hp_pct_threshold } => apply_execute(ctx, primary_target, *hp_pct_threshold),
        EffectKind::PercentHpDamage { damage_type } => {
            damage_effects::apply_percent_hp_damage(ctx, descriptor, caster, primary_target, star_index, *damage_type)
        }
        EffectKind::SplashDamage { radius, splash_pct, damage_type } => damage_effects::apply_splash(
            ctx, descriptor, caster, primary_target, impact_hex, affiliation, star_index, *radius, *splash_pct, *damage_type,
        ),
        EffectKind::Ricochet { chains, search_radius, damage_type } => damage_effects::apply_ricochet(
            ctx, descriptor, caster, primary_target, affiliation, star_index, *chains, *search_radius, *damage_type,
        ),
        EffectKind::MultiHit { hits, damage_type } => {
            damage_effects::apply_multi_hit(ctx, descriptor, caster, primary_target, star_index, *hits, *damage_type)
        }
        EffectKind::DashThrough { damage_type } => {
            damage_effects::apply_dash_through(ctx, descriptor, caster, affiliation, star_index, *damage_type)
        }
        EffectKind::ProjectileSwarm { .. } | EffectKind::ProjectileSpread { .. } => {
            // Spawn-multiple parameters for ability delivery; `hb_engine::ability`
            // reads the descriptor directly when deciding how many
            // projectiles to launch.
            EffectResult::ok(0.0)
        }

        EffectKind::Sunder { pct, flat, duration_ticks } => {
            apply_resist_shred(ctx, primary_target, DebuffKind::ArmorShred, *pct, *flat, *duration_ticks)
        }
        EffectKind::Shred { pct, flat, duration_ticks } => {
            apply_resist_shred(ctx, primary_target, DebuffKind::MrShred, *pct, *flat, *duration_ticks)
        }

        EffectKind::Stun { duration_ticks } => apply_stun(ctx, primary_target, *duration_ticks),
        EffectKind::Slow { as_multiplier, duration_ticks } => {
            apply_simple_debuff(ctx, primary_target, DebuffKind::Slow, DebuffPayload::Slow { as_multiplier: *as_multiplier }, *duration_ticks, None)
        }
        EffectKind::Chill { as_multiplier, duration_ticks, stack_by_source } => apply_chill(
            ctx, caster, primary_target, *as_multiplier, *duration_ticks, *stack_by_source,
        ),
        EffectKind::Silence { duration_ticks } => {
            apply_simple_debuff(ctx, primary_target, DebuffKind::Silence, DebuffPayload::None, *duration_ticks, None)
        }
        EffectKind::Disarm { duration_ticks } => {
            apply_simple_debuff(ctx, primary_target, DebuffKind::Disarm, DebuffPayload::None, *duration_ticks, None)
        }
        EffectKind::Taunt { duration_ticks } => {
            apply_simple_debuff(ctx, primary_target, DebuffKind::Taunt, DebuffPayload::None, *duration_ticks, Some(caster))
        }
        EffectKind::Knockback { distance } => apply_knockback(ctx, caster, primary_target, *distance, false),
        EffectKind::Pull { distance } => apply_knockback(ctx, caster, primary_target, *distance, true),

        EffectKind::Heal => apply_heal(ctx, descriptor, caster, primary_target, star_index),
        EffectKind::HealOverTime { duration_ticks, interval_ticks } => {
            schedule_periodic_heal(ctx, descriptor, caster, primary_target, star_index, *duration_ticks, *interval_ticks)
        }
        EffectKind::Shield { duration_ticks } => apply_shield(ctx, descriptor, caster, primary_target, star_index, *duration_ticks),
        EffectKind::ShieldSelf { duration_ticks } => apply_shield(ctx, descriptor, caster, Some(caster), star_index, *duration_ticks),
        EffectKind::Buff { duration_ticks, deltas, stacking } => {
            apply_buff(ctx, primary_target, caster, deltas.clone(), *duration_ticks, *stacking, false)
        }
        EffectKind::BuffTeam { duration_ticks, deltas, stacking } => {
            apply_buff_team(ctx, caster, deltas.clone(), *duration_ticks, *stacking)
        }
        EffectKind::DecayingBuff { duration_ticks, deltas } => {
            apply_buff(ctx, primary_target, caster, deltas.clone(), *duration_ticks, StackingPolicy::Refresh, true)
        }
        EffectKind::StackingBuff { deltas, cap_stacks } => apply_stacking_buff(ctx, primary_target, caster, deltas.clone(), *cap_stacks),
        EffectKind::ManaGrant => apply_mana_grant(ctx, descriptor, primary_target, star_index),
        EffectKind::Cleanse => apply_cleanse(ctx, primary_target),

        EffectKind::Dash => apply_dash(ctx, caster, primary_target),

        EffectKind::EffectGroup { effects } => apply_group(ctx, effects, caster, primary_target, impact_hex, affiliation, star_index),
        EffectKind::CreateZone { shape, duration_ticks, interval_ticks, inner } => {
            create_zone(ctx, caster, impact_hex, *shape, affiliation, *duration_ticks, *interval_ticks, inner, star_index)
        }
        EffectKind::IntervalTrigger { duration_ticks, interval_ticks, inner } => {
            schedule_periodic_inner(ctx, caster, primary_target, inner, star_index, *duration_ticks, *interval_ticks)
        }
        EffectKind::PermanentStack { stat, per_trigger } => apply_permanent_stack(ctx, primary_target, *stat, *per_trigger),
        EffectKind::ManaReave { extra_cost_pct, duration_ticks } => {
            let mut result = apply_simple_debuff(ctx, primary_target, DebuffKind::ManaReave, DebuffPayload::None, *duration_ticks, None);
            result.value_applied = *extra_cost_pct;
            result
        }
        EffectKind::ReplaceAttacks { count, effects } => apply_replace_attacks(ctx, caster, *count, effects),
        EffectKind::Transform { into_ability_id } => apply_transform(ctx, caster, into_ability_id),
        EffectKind::TransformAfterCasts { casts_required, into_ability_id } => {
            apply_transform_after_casts(ctx, caster, *casts_required, into_ability_id)
        }
        EffectKind::EscalatingAbility { stage_ability_ids } => apply_escalating_ability(ctx, caster, stage_ability_ids),
    }
}

/// Swaps the caster's ability outright, unconditionally.
fn apply_transform(ctx: &mut EffectContext, caster: UnitId, into_ability_id: &str) -> EffectResult {
    let Some(unit) = ctx.arena.get_mut(caster) else { return EffectResult::failed() };
    unit.ability_id = Some(into_ability_id.to_string());
    EffectResult::ok(1.0)
}

/// Swaps the caster's ability once `casts_completed` reaches `casts_required`;
/// a no-op before that.
fn apply_transform_after_casts(ctx: &mut EffectContext, caster: UnitId, casts_required: u32, into_ability_id: &str) -> EffectResult {
    let Some(unit) = ctx.arena.get_mut(caster) else { return EffectResult::failed() };
    if unit.casts_completed < casts_required {
        return EffectResult::failed();
    }
    unit.ability_id = Some(into_ability_id.to_string());
    EffectResult::ok(1.0)
}

/// Picks the ability for the caster's current cast count, clamped to the
/// last stage once `casts_completed` runs past the list.
fn apply_escalating_ability(ctx: &mut EffectContext, caster: UnitId, stage_ability_ids: &[String]) -> EffectResult {
    let Some(unit) = ctx.arena.get_mut(caster) else { return EffectResult::failed() };
    let stage = stage_ability_ids
        .get(unit.casts_completed as usize)
        .or_else(|| stage_ability_ids.last());
    let Some(stage_id) = stage else { return EffectResult::failed() };
    unit.ability_id = Some(stage_id.clone());
    EffectResult::ok(1.0)
}

/// Arms `count` upcoming auto-attacks to apply `effects` instead of a plain
/// AD swing; `hb_engine::scheduler::resolve_auto_attack` consumes these one
/// at a time.
fn apply_replace_attacks(ctx: &mut EffectContext, caster: UnitId, count: u32, effects: &[EffectDescriptor]) -> EffectResult {
    if count == 0 {
        return EffectResult::failed();
    }
    ctx.attack_overrides.insert(caster, AttackOverride { remaining: count, effects: effects.to_vec() });
    EffectResult::ok(count as f64)
}

fn apply_execute(ctx: &mut EffectContext, target: Option<UnitId>, threshold: f64) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    let Some(unit) = ctx.arena.get_mut(target_id) else { return EffectResult::failed() };
    let effective_max_hp = stats::effective_stat_block(&unit.base_stats, &unit.flat_mods, &unit.percent_mods).max_hp;
    if effective_max_hp <= 0.0 {
        return EffectResult::failed();
    }
    if unit.hp / effective_max_hp <= threshold {
        let dealt = unit.hp;
        unit.hp = 0.0;
        ctx.push_event(EventKind::UnitDeath { unit_id: target_id });
        EffectResult::ok(dealt)
    } else {
        EffectResult::failed()
    }
}

fn apply_burn(ctx: &mut EffectContext, descriptor: &EffectDescriptor, target: Option<UnitId>, star_index: usize, duration_ticks: u32) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    let dps = descriptor.value_for_star(star_index);
    let incoming = Debuff {
        kind: DebuffKind::Burn,
        remaining_ticks: duration_ticks,
        total_ticks: duration_ticks,
        payload: DebuffPayload::Burn { dps },
        source: None,
    };
    upsert_debuff(ctx, target_id, incoming);
    EffectResult::ok(dps)
}

fn apply_resist_shred(ctx: &mut EffectContext, target: Option<UnitId>, kind: DebuffKind, pct: f64, flat: f64, duration_ticks: u32) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    let incoming = Debuff {
        kind,
        remaining_ticks: duration_ticks,
        total_ticks: duration_ticks,
        payload: DebuffPayload::Shred { pct, flat },
        source: None,
    };
    upsert_debuff(ctx, target_id, incoming);
    EffectResult::ok(pct.max(flat))
}

fn apply_simple_debuff(
    ctx: &mut EffectContext,
    target: Option<UnitId>,
    kind: DebuffKind,
    payload: DebuffPayload,
    duration_ticks: u32,
    source: Option<UnitId>,
) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    let incoming = Debuff { kind, remaining_ticks: duration_ticks, total_ticks: duration_ticks, payload, source };
    upsert_debuff(ctx, target_id, incoming);
    ctx.push_event(EventKind::DebuffApply { unit_id: target_id, debuff_tag: format!("{kind:?}") });
    EffectResult::ok(1.0)
}

fn apply_chill(ctx: &mut EffectContext, caster: UnitId, target: Option<UnitId>, as_multiplier: f64, duration_ticks: u32, stack_by_source: bool) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    let incoming = Debuff {
        kind: DebuffKind::Chill,
        remaining_ticks: duration_ticks,
        total_ticks: duration_ticks,
        payload: DebuffPayload::Chill { as_multiplier },
        source: Some(caster),
    };
    let Some(unit) = ctx.arena.get_mut(target_id) else { return EffectResult::failed() };
    if stack_by_source {
        if let Some(existing) = unit.debuffs.iter_mut().find(|d| d.kind == DebuffKind::Chill && d.source == Some(caster)) {
            existing.intensify_with(&incoming);
        } else {
            unit.debuffs.push(incoming);
        }
    } else if let Some(existing) = unit.debuffs.iter_mut().find(|d| d.kind == DebuffKind::Chill) {
        existing.intensify_with(&incoming);
    } else {
        unit.debuffs.push(incoming);
    }
    EffectResult::ok(as_multiplier)
}

/// Every debuff kind except `Chill` is one-instance-per-unit, refreshed via
/// `intensify_with` rather than stacked.
fn upsert_debuff(ctx: &mut EffectContext, target_id: UnitId, incoming: Debuff) {
    let Some(unit) = ctx.arena.get_mut(target_id) else { return };
    if let Some(existing) = unit.debuffs.iter_mut().find(|d| d.kind == incoming.kind) {
        existing.intensify_with(&incoming);
    } else {
        unit.debuffs.push(incoming);
    }
}

fn apply_stun(ctx: &mut EffectContext, target: Option<UnitId>, duration_ticks: u32) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    let Some(unit) = ctx.arena.get_mut(target_id) else { return EffectResult::failed() };
    if unit.is_alive() {
        unit.state = crate::state_machine::enter_stun(unit.state.clone(), duration_ticks);
        EffectResult::ok(duration_ticks as f64)
    } else {
        EffectResult::failed()
    }
}

/// Pushes (or pulls) the target along the caster→target axis. Landing on an
/// occupied hex stuns the target instead (see DESIGN.md for the
/// wall-collision decision).
/// Walks `distance` hexes away from (or, for `pull`, toward) the caster,
/// one hex per step, each step taking the in-bounds neighbor that moves
/// farthest/nearest along that axis (ties broken arbitrarily — direction
/// ties don't matter on a hex grid's discrete neighbor set).
fn apply_knockback(ctx: &mut EffectContext, caster: UnitId, target: Option<UnitId>, distance: u32, inverse: bool) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    let Some(caster_pos) = ctx.arena.get(caster).map(|u| u.pos) else { return EffectResult::failed() };
    let Some(origin_pos) = ctx.arena.get(target_id).map(|u| u.pos) else { return EffectResult::failed() };

    let mut current = origin_pos;
    for _ in 0..distance {
        let next = current
            .neighbors()
            .into_iter()
            .filter(|&h| ctx.grid.in_bounds(h))
            .max_by_key(|&h| signed_distance(caster_pos, h, inverse));
        let Some(next) = next else { break };
        current = next;
    }

    if current == origin_pos {
        return EffectResult::ok(0.0);
    }

    if ctx.grid.is_occupied(current) {
        // Pushed into an occupied hex: collision-stun (see DESIGN.md).
        if let Some(unit) = ctx.arena.get_mut(target_id) {
            unit.state = crate::state_machine::enter_stun(unit.state.clone(), 15);
        }
        return EffectResult::ok(0.0);
    }

    ctx.grid.move_unit(origin_pos, current, target_id);
    if let Some(unit) = ctx.arena.get_mut(target_id) {
        unit.pos = current;
    }
    ctx.push_event(EventKind::UnitMove { unit_id: target_id, from: origin_pos, to: current });
    EffectResult::ok(distance as f64)
}

fn signed_distance(from: HexCoord, to: HexCoord, inverse: bool) -> i64 {
    let d = from.distance(to) as i64;
    if inverse {
        -d
    } else {
        d
    }
}

fn apply_heal(ctx: &mut EffectContext, descriptor: &EffectDescriptor, caster: UnitId, target: Option<UnitId>, star_index: usize) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    let base = effect_value(ctx, descriptor, caster, target_id, star_index);

    let Some(unit) = ctx.arena.get_mut(target_id) else { return EffectResult::failed() };
    if !unit.is_alive() {
        return EffectResult::failed();
    }
    let wound_pct = unit
        .debuffs
        .iter()
        .find_map(|d| match d.payload {
            DebuffPayload::Wound { reduction_pct } => Some(reduction_pct),
            _ => None,
        })
        .unwrap_or(0.0);
    let effective_heal = damage::apply_wound_to_heal(base, wound_pct);
    let effective_max_hp = stats::effective_stat_block(&unit.base_stats, &unit.flat_mods, &unit.percent_mods).max_hp;
    unit.hp = (unit.hp + effective_heal).min(effective_max_hp);
    ctx.push_event(EventKind::UnitHeal { unit_id: caster, target_id, amount: effective_heal });
    EffectResult::ok(effective_heal)
}

fn apply_shield(ctx: &mut EffectContext, descriptor: &EffectDescriptor, caster: UnitId, target: Option<UnitId>, star_index: usize, duration_ticks: u32) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    let amount = effect_value(ctx, descriptor, caster, target_id, star_index);
    let Some(unit) = ctx.arena.get_mut(target_id) else { return EffectResult::failed() };
    unit.shields.push(Shield { remaining: amount, remaining_ticks: duration_ticks });
    EffectResult::ok(amount)
}

fn apply_buff(
    ctx: &mut EffectContext,
    target: Option<UnitId>,
    caster: UnitId,
    deltas: Vec<hb_types::modifier::StatModifier>,
    duration_ticks: u32,
    stacking: StackingPolicy,
    decaying: bool,
) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    let Some(unit) = ctx.arena.get_mut(target_id) else { return EffectResult::failed() };

    let buff_id = hb_types::ids::BuffId::new(unit.buffs.len() as u32);
    let name = format!("buff#{}", buff_id.index());
    let new_buff = Buff {
        id: buff_id,
        name: name.clone(),
        source: ModifierSource::Ability { id: "effect".into() },
        deltas,
        remaining_ticks: duration_ticks,
        stacking,
        decaying,
        total_ticks: duration_ticks,
    };

    match stacking {
        StackingPolicy::Refresh => {
            if let Some(existing) = unit.buffs.iter_mut().find(|b| b.name == new_buff.name) {
                existing.remaining_ticks = existing.remaining_ticks.max(duration_ticks);
                existing.total_ticks = existing.total_ticks.max(duration_ticks);
            } else {
                unit.buffs.push(new_buff);
            }
        }
        _ => unit.buffs.push(new_buff),
    }

    ctx.push_event(EventKind::BuffApply { unit_id: target_id, buff_id, name });
    let _ = caster;
    EffectResult::ok(1.0)
}

fn apply_buff_team(ctx: &mut EffectContext, caster: UnitId, deltas: Vec<hb_types::modifier::StatModifier>, duration_ticks: u32, stacking: StackingPolicy) -> EffectResult {
    let Some(caster_unit) = ctx.arena.get(caster) else { return EffectResult::failed() };
    let team = caster_unit.team;
    let ally_ids: Vec<UnitId> = ctx.arena.iter().filter(|u| u.team == team && u.is_alive()).map(|u| u.id).collect();
    for ally in &ally_ids {
        apply_buff(ctx, Some(*ally), caster, deltas.clone(), duration_ticks, stacking, false);
    }
    EffectResult::ok(ally_ids.len() as f64)
}

fn apply_stacking_buff(ctx: &mut EffectContext, target: Option<UnitId>, caster: UnitId, deltas: Vec<hb_types::modifier::StatModifier>, cap_stacks: u32) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    let Some(unit) = ctx.arena.get_mut(target_id) else { return EffectResult::failed() };

    let stack_key = "stacking_buff".to_string();
    let current = unit.stack_counters.entry(stack_key.clone()).or_insert(0);
    if *current >= cap_stacks {
        return EffectResult::failed();
    }
    *current += 1;
    let stacks = *current;

    let scaled_deltas: Vec<_> = deltas
        .iter()
        .map(|m| hb_types::modifier::StatModifier { stat: m.stat, kind: m.kind, value: m.value * stacks as f64 })
        .collect();

    if let Some(existing) = unit.buffs.iter_mut().find(|b| b.name == stack_key) {
        existing.deltas = scaled_deltas;
    } else {
        unit.buffs.push(Buff {
            id: hb_types::ids::BuffId::new(unit.buffs.len() as u32),
            name: stack_key,
            source: ModifierSource::Ability { id: "effect".into() },
            deltas: scaled_deltas,
            remaining_ticks: u32::MAX,
            stacking: StackingPolicy::MultiStack,
            decaying: false,
            total_ticks: u32::MAX,
        });
    }
    let _ = caster;
    EffectResult::ok(stacks as f64)
}

fn apply_mana_grant(ctx: &mut EffectContext, descriptor: &EffectDescriptor, target: Option<UnitId>, star_index: usize) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    let amount = descriptor.value_for_star(star_index);
    let Some(unit) = ctx.arena.get_mut(target_id) else { return EffectResult::failed() };
    let max_mana = stats::effective_stat_block(&unit.base_stats, &unit.flat_mods, &unit.percent_mods).max_mana;
    unit.mana = mana::apply_gain(unit.mana, max_mana, amount);
    EffectResult::ok(amount)
}

fn apply_cleanse(ctx: &mut EffectContext, target: Option<UnitId>) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    let Some(unit) = ctx.arena.get_mut(target_id) else { return EffectResult::failed() };
    let before = unit.debuffs.len();
    unit.debuffs.retain(|d| {
        !matches!(
            d.kind,
            DebuffKind::Stun | DebuffKind::Silence | DebuffKind::Disarm | DebuffKind::Slow | DebuffKind::Chill | DebuffKind::Taunt
        )
    });
    if unit.state.is_stunned() {
        if let Some(restored) = crate::state_machine::tick_stun(&unit.state.clone()) {
            unit.state = restored;
        }
    }
    EffectResult::ok((before - unit.debuffs.len()) as f64)
}

fn apply_dash(ctx: &mut EffectContext, caster: UnitId, target: Option<UnitId>) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    let Some(target_unit) = ctx.arena.get(target_id) else { return EffectResult::failed() };
    let target_pos = target_unit.pos;
    let Some(caster_unit) = ctx.arena.get(caster) else { return EffectResult::failed() };
    let origin = caster_unit.pos;

    let landing = target_pos
        .neighbors()
        .into_iter()
        .filter(|&hex| ctx.grid.is_free(hex) || hex == origin)
        .min_by_key(|&hex| origin.distance(hex));

    let Some(dest) = landing else { return EffectResult::failed() };
    ctx.grid.move_unit(origin, dest, caster);
    if let Some(unit) = ctx.arena.get_mut(caster) {
        unit.pos = dest;
    }
    ctx.push_event(EventKind::UnitMove { unit_id: caster, from: origin, to: dest });
    EffectResult::ok(origin.distance(dest) as f64)
}

fn apply_group(
    ctx: &mut EffectContext,
    effects: &[EffectDescriptor],
    caster: UnitId,
    target: Option<UnitId>,
    impact_hex: Option<HexCoord>,
    affiliation: Affiliation,
    star_index: usize,
) -> EffectResult {
    let mut total = 0.0;
    for inner in effects {
        let result = apply_effect(ctx, inner, caster, target, impact_hex, affiliation, star_index);
        total += result.value_applied;
    }
    EffectResult { success: true, value_applied: total, side_effects: effects.to_vec() }
}

#[allow(clippy::too_many_arguments)]
fn create_zone(
    ctx: &mut EffectContext,
    caster: UnitId,
    impact_hex: Option<HexCoord>,
    shape: hb_types::enums::AoeShape,
    affiliation: Affiliation,
    duration_ticks: u32,
    interval_ticks: u32,
    inner: &EffectDescriptor,
    star_index: usize,
) -> EffectResult {
    let Some(anchor) = impact_hex else { return EffectResult::failed() };
    let hexes = crate::ability::hexes_for_shape(anchor, shape);
    ctx.zones.push(Zone {
        caster,
        hexes,
        inner: inner.clone(),
        affiliation,
        star_index,
        remaining_ticks: duration_ticks,
        interval_ticks,
        ticks_until_next: 0,
    });
    EffectResult::ok(0.0)
}

fn schedule_periodic_damage(
    ctx: &mut EffectContext,
    descriptor: &EffectDescriptor,
    caster: UnitId,
    target: Option<UnitId>,
    star_index: usize,
    damage_type: DamageType,
    duration_ticks: u32,
    interval_ticks: u32,
) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    let inner = EffectDescriptor {
        kind: EffectKind::Damage { damage_type },
        values: descriptor.values,
        scaling: descriptor.scaling,
        scaling_targets_defender: descriptor.scaling_targets_defender,
    };
    ctx.periodic.push(PeriodicEffect {
        caster,
        target: target_id,
        inner,
        star_index,
        remaining_ticks: duration_ticks,
        interval_ticks,
        ticks_until_next: 0,
    });
    EffectResult::ok(0.0)
}

fn schedule_periodic_heal(
    ctx: &mut EffectContext,
    descriptor: &EffectDescriptor,
    caster: UnitId,
    target: Option<UnitId>,
    star_index: usize,
    duration_ticks: u32,
    interval_ticks: u32,
) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    let inner = EffectDescriptor {
        kind: EffectKind::Heal,
        values: descriptor.values,
        scaling: descriptor.scaling,
        scaling_targets_defender: descriptor.scaling_targets_defender,
    };
    ctx.periodic.push(PeriodicEffect {
        caster,
        target: target_id,
        inner,
        star_index,
        remaining_ticks: duration_ticks,
        interval_ticks,
        ticks_until_next: 0,
    });
    EffectResult::ok(0.0)
}

fn schedule_periodic_inner(
    ctx: &mut EffectContext,
    caster: UnitId,
    target: Option<UnitId>,
    inner: &EffectDescriptor,
    star_index: usize,
    duration_ticks: u32,
    interval_ticks: u32,
) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    ctx.periodic.push(PeriodicEffect {
        caster,
        target: target_id,
        inner: inner.clone(),
        star_index,
        remaining_ticks: duration_ticks,
        interval_ticks,
        ticks_until_next: 0,
    });
    EffectResult::ok(0.0)
}

fn apply_permanent_stack(ctx: &mut EffectContext, target: Option<UnitId>, stat: hb_types::enums::StatKind, per_trigger: f64) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    let Some(unit) = ctx.arena.get_mut(target_id) else { return EffectResult::failed() };
    unit.flat_mods.push(hb_types::modifier::StatModifier { stat, kind: hb_types::modifier::ModifierKind::Flat, value: per_trigger });
    EffectResult::ok(per_trigger)
}

/// Resolves an effect's scaled numeric value against the caster's live
/// effective stats.
pub(crate) fn effect_value(ctx: &EffectContext, descriptor: &EffectDescriptor, caster: UnitId, target: UnitId, star_index: usize) -> f64 {
    let base_value = descriptor.value_for_star(star_index);
    let Some(caster_unit) = ctx.arena.get(caster) else { return base_value };
    let caster_stats = stats::effective_stat_block(&caster_unit.base_stats, &caster_unit.flat_mods, &caster_unit.percent_mods);
    let (defender_stats, defender_hp) = if descriptor.scaling_targets_defender {
        match ctx.arena.get(target) {
            Some(defender) => (
                Some(stats::effective_stat_block(&defender.base_stats, &defender.flat_mods, &defender.percent_mods)),
                Some(defender.hp),
            ),
            None => (None, None),
        }
    } else {
        (None, None)
    };
    stats::scaled_value(base_value, descriptor.scaling, &caster_stats, caster_unit.hp, defender_stats.as_ref(), defender_hp)
}

pub(crate) fn resolve_and_apply_damage(
    ctx: &mut EffectContext,
    caster: UnitId,
    target: UnitId,
    raw_value: f64,
    damage_type: DamageType,
) -> f64 {
    let Some(caster_unit) = ctx.arena.get(caster) else { return 0.0 };
    let caster_stats = stats::effective_stat_block(&caster_unit.base_stats, &caster_unit.flat_mods, &caster_unit.percent_mods);
    let ability_crit = caster_unit.ability_crit;

    let Some(target_unit) = ctx.arena.get(target) else { return 0.0 };
    if !target_unit.is_alive() {
        return 0.0;
    }
    let target_stats = stats::effective_stat_block(&target_unit.base_stats, &target_unit.flat_mods, &target_unit.percent_mods);
    let armor_shred = shred_totals(target_unit, DebuffKind::ArmorShred);
    let mr_shred = shred_totals(target_unit, DebuffKind::MrShred);

    let input = DamageInput {
        base_damage: raw_value,
        damage_type,
        is_auto_attack: false,
        can_crit: ability_crit,
        crit_chance: caster_stats.crit_chance,
        crit_damage: caster_stats.crit_damage,
        dodge_chance: 0.0,
        target_armor: target_stats.armor,
        target_magic_resist: target_stats.magic_resist,
        target_armor_shred_pct: armor_shred.0,
        target_armor_shred_flat: armor_shred.1,
        target_mr_shred_pct: mr_shred.0,
        target_mr_shred_flat: mr_shred.1,
        amplifier_multiplier: 1.0,
        durability_sum: 0.0,
    };
    let result = damage::resolve_damage(input, ctx.rng);
    apply_damage_result(ctx, caster, target, result)
}

pub(crate) fn shred_totals(unit: &hb_types::unit::Unit, kind: DebuffKind) -> (f64, f64) {
    unit.debuffs
        .iter()
        .find(|d| d.kind == kind)
        .map(|d| match d.payload {
            DebuffPayload::Shred { pct, flat } => (pct, flat),
            _ => (0.0, 0.0),
        })
        .unwrap_or((0.0, 0.0))
}

pub(crate) fn apply_damage_result(ctx: &mut EffectContext, caster: UnitId, target: UnitId, result: damage::DamageResult) -> f64 {
    let Some(target_unit) = ctx.arena.get_mut(target) else { return 0.0 };
    let shield_pool = target_unit.total_shield();
    let absorption = damage::absorb_with_shield(result.final_damage, shield_pool);

    let mut remaining_to_absorb = absorption.absorbed_by_shield;
    for shield in target_unit.shields.iter_mut() {
        if remaining_to_absorb <= 0.0 {
            break;
        }
        let take = shield.remaining.min(remaining_to_absorb);
        shield.remaining -= take;
        remaining_to_absorb -= take;
    }
    target_unit.shields.retain(|s| s.remaining > 0.0);
    target_unit.hp = (target_unit.hp - absorption.hp_lost).max(0.0);

    let is_casting = target_unit.state.is_casting();
    let target_max_mana = stats::effective_stat_block(&target_unit.base_stats, &target_unit.flat_mods, &target_unit.percent_mods).max_mana;
    let target_mana = target_unit.mana;
    let became_dead = target_unit.hp <= 0.0 && target_unit.is_alive();

    if became_dead {
        if let Some(unit) = ctx.arena.get_mut(target) {
            unit.state = hb_types::unit::UnitState::Dead;
        }
        if let Some(pos) = ctx.arena.get(target).map(|u| u.pos) {
            ctx.grid.remove(pos);
        }
    }

    if !is_casting && !became_dead {
        let gain = mana::damage_taken_mana_gain(ctx.mana_formula, result.raw_damage, result.final_damage);
        if let Some(unit) = ctx.arena.get_mut(target) {
            unit.mana = mana::apply_gain(target_mana, target_max_mana, gain);
        }
    }

    ctx.push_event(EventKind::UnitDamage {
        unit_id: caster,
        target_id: target,
        raw_damage: result.raw_damage,
        final_damage: result.final_damage,
        damage_type: result.damage_type,
        crit: result.crit,
        dodged: result.dodged,
    });
    if became_dead {
        ctx.push_event(EventKind::UnitDeath { unit_id: target });
    }

    if let Some(caster_unit) = ctx.arena.get(caster) {
        let caster_stats = stats::effective_stat_block(&caster_unit.base_stats, &caster_unit.flat_mods, &caster_unit.percent_mods);
        let lifesteal_gain = damage::lifesteal_and_omnivamp(result.final_damage, result.damage_type, caster_stats.lifesteal, caster_stats.omnivamp);
        if lifesteal_gain > 0.0 {
            if let Some(caster_mut) = ctx.arena.get_mut(caster) {
                if caster_mut.is_alive() {
                    let max_hp = stats::effective_stat_block(&caster_mut.base_stats, &caster_mut.flat_mods, &caster_mut.percent_mods).max_hp;
                    caster_mut.hp = (caster_mut.hp + lifesteal_gain).min(max_hp);
                }
            }
        }
    }

    result.final_damage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use hb_types::enums::{StarLevel, Team};
    use hb_types::targeting::{SelectorKind, SelectorSpec};
    use hb_types::unit::{AttackWindup, StatBlock, Unit, UnitState};

    fn sample_unit(id: UnitId, team: Team, pos: HexCoord, hp: f64) -> Unit {
        Unit {
            id,
            name: "test".into(),
            team,
            star: StarLevel::One,
            pos,
            base_stats: StatBlock { max_hp: hp, ..StatBlock::default() },
            flat_mods: vec![],
            percent_mods: vec![],
            hp,
            shields: vec![],
            mana: 0.0,
            debuffs: vec![],
            buffs: vec![],
            stack_counters: Default::default(),
            state: UnitState::Idle,
            ability_id: None,
            default_selector: SelectorSpec::new(SelectorKind::Nearest),
            current_target: None,
            attack_windup: AttackWindup::default(),
            ability_crit: false,
            casts_completed: 0,
        }
    }

    #[allow(clippy::type_complexity)]
    fn ctx_harness() -> (Arena, Grid, BattleRng, Vec<hb_types::event::Event>, ManaFormulaParams, Vec<PeriodicEffect>, Vec<Zone>, HashMap<UnitId, AttackOverride>) {
        (Arena::new(), Grid::new(8, 7), BattleRng::new(1), vec![], ManaFormulaParams::default(), vec![], vec![], HashMap::new())
    }

    #[test]
    fn execute_kills_below_threshold() {
        let (mut arena, mut grid, mut rng, mut log, mana_formula, mut periodic, mut zones, mut attack_overrides) = ctx_harness();
        let id = arena.insert(sample_unit(arena.next_id(), Team::Blue, HexCoord::new(0, 0), 1000.0));
        arena.get_mut(id).unwrap().hp = 50.0;
        let mut ctx = EffectContext {
            arena: &mut arena,
            grid: &mut grid,
            rng: &mut rng,
            log: &mut log,
            tick: 0,
            mana_formula: &mana_formula,
            periodic: &mut periodic,
            zones: &mut zones,
            attack_overrides: &mut attack_overrides,
        };
        let result = apply_execute(&mut ctx, Some(id), 0.10);
        assert!(result.success);
        assert_eq!(ctx.arena.get(id).unwrap().hp, 0.0);
    }

    #[test]
    fn execute_does_nothing_above_threshold() {
        let (mut arena, mut grid, mut rng, mut log, mana_formula, mut periodic, mut zones, mut attack_overrides) = ctx_harness();
        let id = arena.insert(sample_unit(arena.next_id(), Team::Blue, HexCoord::new(0, 0), 1000.0));
        let mut ctx = EffectContext {
            arena: &mut arena,
            grid: &mut grid,
            rng: &mut rng,
            log: &mut log,
            tick: 0,
            mana_formula: &mana_formula,
            periodic: &mut periodic,
            zones: &mut zones,
            attack_overrides: &mut attack_overrides,
        };
        let result = apply_execute(&mut ctx, Some(id), 0.10);
        assert!(!result.success);
    }

    #[test]
    fn heal_respects_wound() {
        let (mut arena, mut grid, mut rng, mut log, mana_formula, mut periodic, mut zones, mut attack_overrides) = ctx_harness();
        let caster = arena.insert(sample_unit(arena.next_id(), Team::Blue, HexCoord::new(0, 0), 500.0));
        let target = arena.insert(sample_unit(arena.next_id(), Team::Blue, HexCoord::new(1, 0), 500.0));
        arena.get_mut(target).unwrap().hp = 100.0;
        arena.get_mut(target).unwrap().debuffs.push(Debuff {
            kind: DebuffKind::Wound,
            remaining_ticks: 30,
            total_ticks: 30,
            payload: DebuffPayload::Wound { reduction_pct: 0.33 },
            source: None,
        });

        let mut ctx = EffectContext {
            arena: &mut arena,
            grid: &mut grid,
            rng: &mut rng,
            log: &mut log,
            tick: 0,
            mana_formula: &mana_formula,
            periodic: &mut periodic,
            zones: &mut zones,
            attack_overrides: &mut attack_overrides,
        };
        let descriptor = EffectDescriptor::simple(EffectKind::Heal, [100.0, 100.0, 100.0]);
        let result = apply_heal(&mut ctx, &descriptor, caster, Some(target), 0);
        assert_eq!(result.value_applied, 67.0);
    }

    #[test]
    fn shred_refresh_takes_max_through_effect_dispatch() {
        let (mut arena, mut grid, mut rng, mut log, mana_formula, mut periodic, mut zones, mut attack_overrides) = ctx_harness();
        let target = arena.insert(sample_unit(arena.next_id(), Team::Blue, HexCoord::new(0, 0), 500.0));
        let mut ctx = EffectContext {
            arena: &mut arena,
            grid: &mut grid,
            rng: &mut rng,
            log: &mut log,
            tick: 0,
            mana_formula: &mana_formula,
            periodic: &mut periodic,
            zones: &mut zones,
            attack_overrides: &mut attack_overrides,
        };

        apply_resist_shred(&mut ctx, Some(target), DebuffKind::ArmorShred, 0.20, 0.0, 60);
        apply_resist_shred(&mut ctx, Some(target), DebuffKind::ArmorShred, 0.15, 0.0, 90);

        let debuff = ctx.arena.get(target).unwrap().debuffs.iter().find(|d| d.kind == DebuffKind::ArmorShred).unwrap();
        assert_eq!(debuff.remaining_ticks, 90);
        match debuff.payload {
            DebuffPayload::Shred { pct, .. } => assert!((pct - 0.20).abs() < 1e-9),
            _ => panic!("expected shred payload"),
        }
    }

    #[test]
    fn stun_wraps_current_state_via_dispatch() {
        let (mut arena, mut grid, mut rng, mut log, mana_formula, mut periodic, mut zones, mut attack_overrides) = ctx_harness();
        let target = arena.insert(sample_unit(arena.next_id(), Team::Blue, HexCoord::new(0, 0), 500.0));
        arena.get_mut(target).unwrap().state = UnitState::Attacking;
        let mut ctx = EffectContext {
            arena: &mut arena,
            grid: &mut grid,
            rng: &mut rng,
            log: &mut log,
            tick: 0,
            mana_formula: &mana_formula,
            periodic: &mut periodic,
            zones: &mut zones,
            attack_overrides: &mut attack_overrides,
        };
        apply_stun(&mut ctx, Some(target), 30);
        assert!(ctx.arena.get(target).unwrap().state.is_stunned());
    }

    #[test]
    fn replace_attacks_arms_override_and_transform_swaps_ability() {
        let (mut arena, mut grid, mut rng, mut log, mana_formula, mut periodic, mut zones, mut attack_overrides) = ctx_harness();
        let caster = arena.insert(sample_unit(arena.next_id(), Team::Blue, HexCoord::new(0, 0), 500.0));
        let mut ctx = EffectContext {
            arena: &mut arena,
            grid: &mut grid,
            rng: &mut rng,
            log: &mut log,
            tick: 0,
            mana_formula: &mana_formula,
            periodic: &mut periodic,
            zones: &mut zones,
            attack_overrides: &mut attack_overrides,
        };

        let override_effects = vec![EffectDescriptor::simple(EffectKind::Heal, [10.0, 10.0, 10.0])];
        let result = apply_replace_attacks(&mut ctx, caster, 2, &override_effects);
        assert!(result.success);
        assert_eq!(ctx.attack_overrides.get(&caster).unwrap().remaining, 2);

        apply_transform(&mut ctx, caster, "evolved_form");
        assert_eq!(ctx.arena.get(caster).unwrap().ability_id.as_deref(), Some("evolved_form"));
    }

    #[test]
    fn escalating_ability_clamps_to_last_stage() {
        let (mut arena, mut grid, mut rng, mut log, mana_formula, mut periodic, mut zones, mut attack_overrides) = ctx_harness();
        let caster = arena.insert(sample_unit(arena.next_id(), Team::Blue, HexCoord::new(0, 0), 500.0));
        arena.get_mut(caster).unwrap().casts_completed = 5;
        let mut ctx = EffectContext {
            arena: &mut arena,
            grid: &mut grid,
            rng: &mut rng,
            log: &mut log,
            tick: 0,
            mana_formula: &mana_formula,
            periodic: &mut periodic,
            zones: &mut zones,
            attack_overrides: &mut attack_overrides,
        };
        let stages = vec!["stage_one".to_string(), "stage_two".to_string(), "stage_three".to_string()];
        apply_escalating_ability(&mut ctx, caster, &stages);
        assert_eq!(ctx.arena.get(caster).unwrap().ability_id.as_deref(), Some("stage_three"));
    }
}
