//! Damage-producing effects with more than one hit: splash, ricochet,
//! multi-hit, dash-through, and the two single-target variants (plain and
//! hybrid AD/AP) everything else is built from.

use hb_types::effect::EffectDescriptor;
use hb_types::enums::{Affiliation, DamageType};
use hb_types::hex::{hex_circle, hex_line};
use hb_types::ids::UnitId;
use hb_types::HexCoord;

use crate::ability::affiliation_matches;
use crate::stats;

use super::{effect_value, resolve_and_apply_damage, EffectContext};
use hb_types::effect::EffectResult;

pub(super) fn apply_single_damage(
    ctx: &mut EffectContext,
    descriptor: &EffectDescriptor,
    caster: UnitId,
    target: Option<UnitId>,
    star_index: usize,
    damage_type: DamageType,
) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    let value = effect_value(ctx, descriptor, caster, target_id, star_index);
    let dealt = resolve_and_apply_damage(ctx, caster, target_id, value, damage_type);
    EffectResult::ok(dealt)
}

/// `values` carries the AD component; `ap_ratio` is an additional AP-scaled
/// component. Combined damage is treated as `Magical` for mitigation, since
/// the descriptor carries no separate type for the blended total (see
/// DESIGN.md).
pub(super) fn apply_hybrid_damage(
    ctx: &mut EffectContext,
    descriptor: &EffectDescriptor,
    caster: UnitId,
    target: Option<UnitId>,
    star_index: usize,
    ap_ratio: f64,
) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    let ad_component = effect_value(ctx, descriptor, caster, target_id, star_index);
    let caster_ap = ctx
        .arena
        .get(caster)
        .map(|u| stats::effective_stat_block(&u.base_stats, &u.flat_mods, &u.percent_mods).ap)
        .unwrap_or(0.0);
    let total = ad_component + ap_ratio * caster_ap;
    let dealt = resolve_and_apply_damage(ctx, caster, target_id, total, DamageType::Magical);
    EffectResult::ok(dealt)
}

/// Percent of the target's effective max HP.
pub(super) fn apply_percent_hp_damage(
    ctx: &mut EffectContext,
    descriptor: &EffectDescriptor,
    caster: UnitId,
    target: Option<UnitId>,
    star_index: usize,
    damage_type: DamageType,
) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    let pct = descriptor.value_for_star(star_index);
    let Some(target_unit) = ctx.arena.get(target_id) else { return EffectResult::failed() };
    let effective_max_hp = stats::effective_stat_block(&target_unit.base_stats, &target_unit.flat_mods, &target_unit.percent_mods).max_hp;
    let amount = effective_max_hp * pct;
    let dealt = resolve_and_apply_damage(ctx, caster, target_id, amount, damage_type);
    EffectResult::ok(dealt)
}

#[allow(clippy::too_many_arguments)]
pub(super) fn apply_splash(
    ctx: &mut EffectContext,
    descriptor: &EffectDescriptor,
    caster: UnitId,
    target: Option<UnitId>,
    impact_hex: Option<HexCoord>,
    affiliation: Affiliation,
    star_index: usize,
    radius: u32,
    splash_pct: f64,
    damage_type: DamageType,
) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    let main_value = effect_value(ctx, descriptor, caster, target_id, star_index);
    let mut total = resolve_and_apply_damage(ctx, caster, target_id, main_value, damage_type);

    let Some(caster_team) = ctx.arena.get(caster).map(|u| u.team) else { return EffectResult::ok(total) };
    let anchor = impact_hex.or_else(|| ctx.arena.get(target_id).map(|u| u.pos)).unwrap_or(HexCoord::new(0, 0));
    let splash_hexes = hex_circle(anchor, radius);

    let secondary: Vec<UnitId> = ctx
        .arena
        .iter()
        .filter(|u| {
            u.id != target_id && u.is_alive() && affiliation_matches(affiliation, caster_team, u.team) && splash_hexes.contains(&u.pos)
        })
        .map(|u| u.id)
        .collect();

    let splash_value = main_value * splash_pct;
    for id in secondary {
        total += resolve_and_apply_damage(ctx, caster, id, splash_value, damage_type);
    }

    EffectResult::ok(total)
}

#[allow(clippy::too_many_arguments)]
pub(super) fn apply_ricochet(
    ctx: &mut EffectContext,
    descriptor: &EffectDescriptor,
    caster: UnitId,
    target: Option<UnitId>,
    affiliation: Affiliation,
    star_index: usize,
    chains: u32,
    search_radius: u32,
    damage_type: DamageType,
) -> EffectResult {
    let Some(first_target) = target else { return EffectResult::failed() };
    let Some(caster_team) = ctx.arena.get(caster).map(|u| u.team) else { return EffectResult::failed() };

    let mut hit = vec![first_target];
    let mut total = 0.0;
    let mut current_target = first_target;

    for _ in 0..chains.max(1) {
        let value = effect_value(ctx, descriptor, caster, current_target, star_index);
        total += resolve_and_apply_damage(ctx, caster, current_target, value, damage_type);

        let Some(current_pos) = ctx.arena.get(current_target).map(|u| u.pos) else { break };
        let next = ctx
            .arena
            .iter()
            .filter(|u| {
                u.is_alive()
                    && affiliation_matches(affiliation, caster_team, u.team)
                    && !hit.contains(&u.id)
                    && current_pos.distance(u.pos) <= search_radius
            })
            .min_by_key(|u| (current_pos.distance(u.pos), u.id))
            .map(|u| u.id);

        match next {
            Some(id) => {
                hit.push(id);
                current_target = id;
            }
            None => break,
        }
    }

    EffectResult::ok(total)
}

pub(super) fn apply_multi_hit(
    ctx: &mut EffectContext,
    descriptor: &EffectDescriptor,
    caster: UnitId,
    target: Option<UnitId>,
    star_index: usize,
    hits: u32,
    damage_type: DamageType,
) -> EffectResult {
    let Some(target_id) = target else { return EffectResult::failed() };
    let mut total = 0.0;
    for _ in 0..hits.max(1) {
        if !ctx.arena.get(target_id).map(|u| u.is_alive()).unwrap_or(false) {
            break;
        }
        let value = effect_value(ctx, descriptor, caster, target_id, star_index);
        total += resolve_and_apply_damage(ctx, caster, target_id, value, damage_type);
    }
    EffectResult::ok(total)
}

/// Damage along the hex line from the caster's position to the primary
/// target's position, hitting every matching-affiliation unit on that line
/// other than the caster.
pub(super) fn apply_dash_through(
    ctx: &mut EffectContext,
    descriptor: &EffectDescriptor,
    caster: UnitId,
    affiliation: Affiliation,
    star_index: usize,
    damage_type: DamageType,
) -> EffectResult {
    let Some(caster_unit) = ctx.arena.get(caster) else { return EffectResult::failed() };
    let caster_team = caster_unit.team;
    let origin = caster_unit.pos;
    let Some(target_id) = caster_unit.current_target else { return EffectResult::failed() };
    let Some(destination) = ctx.arena.get(target_id).map(|u| u.pos) else { return EffectResult::failed() };

    let line = hex_line(origin, destination, 1);
    let victims: Vec<UnitId> = ctx
        .arena
        .iter()
        .filter(|u| u.id != caster && u.is_alive() && affiliation_matches(affiliation, caster_team, u.team) && line.contains(&u.pos))
        .map(|u| u.id)
        .collect();

    let mut total = 0.0;
    for id in victims {
        let value = effect_value(ctx, descriptor, caster, id, star_index);
        total += resolve_and_apply_damage(ctx, caster, id, value, damage_type);
    }
    EffectResult::ok(total)
}
