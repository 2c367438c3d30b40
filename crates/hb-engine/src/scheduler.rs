//! The tick scheduler. Six phases run in strict sequence every tick, each
//! iterating units/zones/projectiles in stable insertion order so that,
//! given the same seed, every tick produces exactly the same sequence of
//! RNG draws and log events.

use hb_types::ability::TriggerPoint;
use hb_types::effect::EffectDescriptor;
use hb_types::enums::{Affiliation, CastPhase, DamageType, DebuffKind, Team};
use hb_types::event::EventKind;
use hb_types::ids::UnitId;
use hb_types::unit::{CastState, StatBlock, UnitState};
use hb_types::HexCoord;

use crate::ability;
use crate::damage::{self, DamageInput};
use crate::effects::{self, EffectContext};
use crate::mana;
use crate::pathfind;
use crate::projectile::ProjectileOutcome;
use crate::simulation::Simulation;
use crate::state_machine::{self, TransitionInputs};
use crate::stats;
use crate::targeting::{self, Candidate};

/// Outcome of advancing the simulation by one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Continue,
    Done {
        winner_team: Option<Team>,
        total_ticks: u32,
        deaths_per_team: [u32; 2],
    },
}

/// Runs the six phases once. Called by `Simulation::tick`, never directly.
pub fn run_tick(sim: &mut Simulation) -> TickOutcome {
    sim.tick += 1;

    let ids: Vec<UnitId> = sim.arena.ids().collect();

    phase1_buffs_and_regen(sim, &ids);
    refresh_active_hooks(sim);
    phase2_check_abilities(sim, &ids);
    phase3_ai_decision(sim, &ids);
    phase4_execute_actions(sim, &ids);
    phase5_projectiles(sim);
    phase6_check_end(sim)
}

// ---------------------------------------------------------------------
// Phase 1: buffs/debuffs/zones/periodic effects, passive regen.
// ---------------------------------------------------------------------

fn phase1_buffs_and_regen(sim: &mut Simulation, ids: &[UnitId]) {
    apply_burn_ticks(sim, ids);

    for &id in ids {
        let Some(unit) = sim.arena.get_mut(id) else { continue };
        if !unit.is_alive() {
            continue;
        }
        let mut expired_buffs = Vec::new();
        unit.buffs.retain_mut(|b| {
            let expired = b.tick();
            if expired {
                expired_buffs.push(b.id);
            }
            !expired
        });
        unit.debuffs.retain_mut(|d| !d.tick());
        for buff_id in expired_buffs {
            sim.event_log.push(sim.tick, EventKind::BuffExpire { unit_id: id, buff_id });
        }
    }

    for &id in ids {
        let restored = sim.arena.get(id).and_then(|u| {
            if u.state.is_stunned() {
                state_machine::tick_stun(&u.state)
            } else {
                None
            }
        });
        if let Some(state) = restored {
            if let Some(unit) = sim.arena.get_mut(id) {
                unit.state = state;
            }
        }
    }

    // Passive mana regen. No unit definition field currently supplies a
    // per-second rate (see DESIGN.md); this stays
    // wired to zero so it starts contributing the moment one does, rather
    // than being left out of the tick loop entirely.
    for &id in ids {
        let Some(unit) = sim.arena.get_mut(id) else { continue };
        if !unit.is_alive() || unit.state.is_casting() {
            continue;
        }
        let max_mana = stats::effective_stat_block(&unit.base_stats, &unit.flat_mods, &unit.percent_mods).max_mana;
        let gain = mana::passive_regen_per_tick(0.0, sim.config.tick_rate);
        unit.mana = mana::apply_gain(unit.mana, max_mana, gain);
    }

    run_periodic_effects(sim);
    run_zones(sim);
}

fn apply_burn_ticks(sim: &mut Simulation, ids: &[UnitId]) {
    let burning: Vec<(UnitId, f64)> = ids
        .iter()
        .filter_map(|&id| {
            let unit = sim.arena.get(id)?;
            if !unit.is_alive() {
                return None;
            }
            let dps = unit.debuffs.iter().find(|d| d.kind == DebuffKind::Burn)?.burn_damage().0;
            (dps > 0.0).then_some((id, dps))
        })
        .collect();

    for (id, dps) in burning {
        let Some(unit) = sim.arena.get_mut(id) else { continue };
        let shield_pool = unit.total_shield();
        let absorption = damage::absorb_with_shield(dps, shield_pool);
        let mut remaining = absorption.absorbed_by_shield;
        for shield in unit.shields.iter_mut() {
            if remaining <= 0.0 {
                break;
            }
            let take = shield.remaining.min(remaining);
            shield.remaining -= take;
            remaining -= take;
        }
        unit.shields.retain(|s| s.remaining > 0.0);
        unit.hp = (unit.hp - absorption.hp_lost).max(0.0);
        let became_dead = unit.hp <= 0.0 && unit.is_alive();
        if became_dead {
            unit.state = UnitState::Dead;
        }

        if became_dead {
            if let Some(pos) = sim.arena.get(id).map(|u| u.pos) {
                sim.grid.remove(pos);
            }
            sim.event_log.push(sim.tick, EventKind::UnitDeath { unit_id: id });
        }
        sim.event_log.push(
            sim.tick,
            EventKind::UnitDamage {
                unit_id: id,
                target_id: id,
                raw_damage: dps,
                final_damage: dps,
                damage_type: DamageType::True,
                crit: false,
                dodged: false,
            },
        );
    }
}

fn run_periodic_effects(sim: &mut Simulation) {
    let mut fired: Vec<(UnitId, UnitId, EffectDescriptor, usize)> = Vec::new();
    sim.periodic.retain_mut(|pe| {
        if pe.tick() {
            fired.push((pe.caster, pe.target, pe.inner.clone(), pe.star_index));
        }
        !pe.expired()
    });
    for (caster, target, inner, star_index) in fired {
        let mut ctx = sim.effect_context();
        effects::apply_effect(&mut ctx, &inner, caster, Some(target), None, Affiliation::All, star_index);
    }
}

fn run_zones(sim: &mut Simulation) {
    let mut fired: Vec<(UnitId, Vec<HexCoord>, EffectDescriptor, Affiliation, usize)> = Vec::new();
    sim.zones.retain_mut(|z| {
        if z.tick() {
            fired.push((z.caster, z.hexes.clone(), z.inner.clone(), z.affiliation, z.star_index));
        }
        !z.expired()
    });
    for (caster, hexes, inner, affiliation, star_index) in fired {
        let Some(caster_team) = sim.arena.get(caster).map(|u| u.team) else { continue };
        let targets: Vec<UnitId> = sim
            .arena
            .iter()
            .filter(|u| u.is_alive() && hexes.contains(&u.pos) && ability::affiliation_matches(affiliation, caster_team, u.team))
            .map(|u| u.id)
            .collect();
        for target in targets {
            let mut ctx = sim.effect_context();
            effects::apply_effect(&mut ctx, &inner, caster, Some(target), None, affiliation, star_index);
        }
    }
}

// ---------------------------------------------------------------------
// Trait/item trigger hooks.
// ---------------------------------------------------------------------

fn refresh_active_hooks(sim: &mut Simulation) {
    let mut combined = Vec::new();
    if let Some(manager) = sim.trait_manager.as_mut() {
        combined.extend(manager.active_hooks(&sim.arena, sim.tick));
    }
    if let Some(manager) = sim.item_manager.as_mut() {
        combined.extend(manager.active_hooks(&sim.arena, sim.tick));
    }
    sim.active_hooks_this_tick = combined;

    let tick = sim.tick;
    let due: Vec<(UnitId, hb_types::ability::TriggerHook)> = sim
        .hooks_by_unit
        .iter()
        .flat_map(|(id, hooks)| hooks.iter().map(move |h| (*id, h.clone())))
        .chain(sim.active_hooks_this_tick.iter().cloned())
        .filter(|(_, h)| matches!(h.point, TriggerPoint::Interval { every_ticks } if every_ticks > 0 && tick % every_ticks == 0))
        .collect();

    for (unit_id, hook) in due {
        fire_one_hook(sim, unit_id, &hook);
    }
}

fn fire_one_hook(sim: &mut Simulation, unit_id: UnitId, hook: &hb_types::ability::TriggerHook) {
    let gate_ok = hook.condition_hp_pct_at_least.map_or(true, |threshold| {
        sim.arena.get(unit_id).map_or(false, |u| {
            let max_hp = stats::effective_stat_block(&u.base_stats, &u.flat_mods, &u.percent_mods).max_hp;
            max_hp > 0.0 && u.hp / max_hp >= threshold
        })
    });
    if !gate_ok {
        return;
    }
    let mut ctx = sim.effect_context();
    effects::apply_effect(&mut ctx, &hook.effect, unit_id, Some(unit_id), None, Affiliation::All, 0);
}

fn fire_hooks(sim: &mut Simulation, unit_id: UnitId, matches_point: impl Fn(&TriggerPoint) -> bool) {
    let mut to_fire: Vec<hb_types::ability::TriggerHook> = Vec::new();
    if let Some(hooks) = sim.hooks_by_unit.get(&unit_id) {
        to_fire.extend(hooks.iter().filter(|h| matches_point(&h.point)).cloned());
    }
    to_fire.extend(
        sim.active_hooks_this_tick
            .iter()
            .filter(|(u, h)| *u == unit_id && matches_point(&h.point))
            .map(|(_, h)| h.clone()),
    );
    for hook in to_fire {
        fire_one_hook(sim, unit_id, &hook);
    }
}

// ---------------------------------------------------------------------
// Phase 2: mana_full && !silenced && !casting ⇒ enter Casting.
// ---------------------------------------------------------------------

fn phase2_check_abilities(sim: &mut Simulation, ids: &[UnitId]) {
    for &id in ids {
        let Some(unit) = sim.arena.get(id) else { continue };
        if !unit.is_alive() || unit.state.is_stunned() || unit.state.is_casting() {
            continue;
        }
        let silenced = unit.debuffs.iter().any(|d| d.kind == DebuffKind::Silence);
        let Some(ability_id) = unit.ability_id.clone() else { continue };
        let Some(ability) = hb_data::get_ability_def(&ability_id) else { continue };
        if silenced || unit.mana < ability.mana_cost {
            continue;
        }

        let prior_state = unit.state.clone();
        let mut next = state_machine::next_combat_state(
            &prior_state,
            TransitionInputs {
                has_target: false,
                in_attack_range: false,
                mana_full: true,
                silenced: false,
                mid_attack_windup: false,
                target_dead: false,
            },
        );
        if next == prior_state {
            continue;
        }

        if let Some(unit) = sim.arena.get_mut(id) {
            if let UnitState::Casting(ref mut cast) = next {
                cast.mana_spent_at_entry = unit.mana;
                unit.mana = 0.0;
            }
            let from = format!("{prior_state:?}");
            let to = format!("{next:?}");
            unit.state = next;
            unit.attack_windup = Default::default();
            sim.event_log.push(sim.tick, EventKind::StateChange { unit_id: id, from, to });
        }
    }
}

// ---------------------------------------------------------------------
// Phase 3: AI target selection for uncommitted units.
// ---------------------------------------------------------------------

fn phase3_ai_decision(sim: &mut Simulation, ids: &[UnitId]) {
    let mut decisions = Vec::new();

    for &id in ids {
        let Some(unit) = sim.arena.get(id) else { continue };
        if !unit.is_alive() || unit.state.is_stunned() || unit.state.is_casting() {
            continue;
        }

        let taunter = unit.debuffs.iter().find(|d| d.kind == DebuffKind::Taunt).and_then(|d| d.source);
        let team = unit.team;
        let origin = unit.pos;
        let current_target = unit.current_target;
        let selector = unit.default_selector;
        let target_still_alive = current_target.map_or(false, |t| sim.arena.get(t).map_or(false, |u| u.is_alive()));

        let snapshots: Vec<(UnitId, HexCoord, f64, StatBlock)> = sim
            .arena
            .iter()
            .filter(|u| u.is_alive() && u.team != team)
            .map(|u| (u.id, u.pos, u.hp, stats::effective_stat_block(&u.base_stats, &u.flat_mods, &u.percent_mods)))
            .collect();
        let candidates: Vec<Candidate> = snapshots
            .iter()
            .map(|(cid, pos, hp, stat)| Candidate { id: *cid, pos: *pos, hp: *hp, effective_stats: stat })
            .collect();
        let own_spawn_edge = ability::spawn_edge(&sim.grid, team);

        let selected = if target_still_alive {
            current_target
        } else {
            targeting::select_target(&selector, origin, own_spawn_edge, &candidates, current_target, &mut sim.rng)
        };

        let taunter_alive = taunter.filter(|&t| sim.arena.get(t).map_or(false, |u| u.is_alive()));
        let final_target = targeting::taunted_target(taunter_alive, selected);

        if final_target != current_target {
            decisions.push((id, final_target));
        }
    }

    for (id, target) in decisions {
        if let Some(unit) = sim.arena.get_mut(id) {
            unit.current_target = target;
        }
        if let Some(target_id) = target {
            sim.event_log.push(sim.tick, EventKind::TargetAcquired { unit_id: id, target_id });
        }
    }
}

// ---------------------------------------------------------------------
// Phase 4: movement, auto-attack windup/resolution, cast effect-point.
// ---------------------------------------------------------------------

fn phase4_execute_actions(sim: &mut Simulation, ids: &[UnitId]) {
    for &id in ids {
        let Some(unit) = sim.arena.get(id) else { continue };
        if !unit.is_alive() || unit.state.is_stunned() {
            continue;
        }
        match unit.state.clone() {
            UnitState::Casting(cast) => execute_cast_tick(sim, id, cast),
            _ => execute_combat_tick(sim, id),
        }
    }
}

fn execute_cast_tick(sim: &mut Simulation, id: UnitId, cast: CastState) {
    let Some(unit) = sim.arena.get(id) else { return };
    let Some(ability_id) = unit.ability_id.clone() else { return };
    let Some(ability) = hb_data::get_ability_def(&ability_id) else { return };
    let star_index = unit.star.index();
    let cast_time = ability.cast_time_for_star(star_index).max(1);
    let overflow = ability.overflow;
    let mana_at_entry = cast.mana_spent_at_entry;

    let (advanced, reached_effect_point) = state_machine::advance_cast(cast, cast_time);

    if reached_effect_point {
        let mut ctx = EffectContext {
            arena: &mut sim.arena,
            grid: &mut sim.grid,
            rng: &mut sim.rng,
            log: &mut sim.event_log.events,
            tick: sim.tick,
            mana_formula: &sim.config.mana_formula,
            periodic: &mut sim.periodic,
            zones: &mut sim.zones,
            attack_overrides: &mut sim.attack_overrides_by_unit,
        };
        let outcome = ability::resolve_cast(&mut ctx, id, ability, star_index, &mut sim.next_projectile_id);

        for projectile in &outcome.spawned_projectiles {
            sim.event_log.push(
                sim.tick,
                EventKind::ProjectileSpawn { projectile_id: projectile.id, source_id: projectile.source, target_id: projectile.target },
            );
        }
        sim.event_log.push(sim.tick, EventKind::AbilityCast { unit_id: id, ability_id: ability_id.clone() });
        if let Some(target_id) = outcome.primary_target {
            sim.event_log.push(sim.tick, EventKind::AbilityEffect { unit_id: id, target_id: Some(target_id), effect_tag: ability_id.clone() });
        }
        sim.projectiles.extend(outcome.spawned_projectiles);
        fire_hooks(sim, id, |p| matches!(p, TriggerPoint::OnCast));
    }

    if let UnitState::Casting(c) = &advanced {
        if c.phase == CastPhase::CastEnd {
            let Some(unit) = sim.arena.get(id) else { return };
            let max_mana = stats::effective_stat_block(&unit.base_stats, &unit.flat_mods, &unit.percent_mods).max_mana;
            let carryover = mana::mana_after_cast_end(mana_at_entry, max_mana, overflow);
            let prior_state = unit.state.clone();
            let target_alive = unit.current_target.map_or(false, |t| sim.arena.get(t).map_or(false, |u| u.is_alive()));

            let next_state = if target_alive { UnitState::Moving } else { UnitState::Idle };
            if let Some(unit) = sim.arena.get_mut(id) {
                unit.mana = carryover;
                unit.casts_completed += 1;
                unit.state = next_state.clone();
                unit.attack_windup = Default::default();
            }
            sim.event_log.push(
                sim.tick,
                EventKind::StateChange { unit_id: id, from: format!("{prior_state:?}"), to: format!("{next_state:?}") },
            );
            return;
        }
    }

    if let Some(unit) = sim.arena.get_mut(id) {
        unit.state = advanced;
    }
}

fn execute_combat_tick(sim: &mut Simulation, id: UnitId) {
    let Some(unit) = sim.arena.get(id) else { return };
    let team = unit.team;
    let origin = unit.pos;
    let current_target = unit.current_target;
    let prior_state = unit.state.clone();
    let effective = stats::effective_stat_block(&unit.base_stats, &unit.flat_mods, &unit.percent_mods);
    let attack_range = effective.attack_range;
    let attack_speed = effective.attack_speed;
    let windup = unit.attack_windup;
    let disarmed = unit.debuffs.iter().any(|d| d.kind == DebuffKind::Disarm);
    let _ = team;

    let Some(target_id) = current_target else {
        set_state(sim, id, &prior_state, UnitState::Idle);
        return;
    };
    let Some(target) = sim.arena.get(target_id) else {
        set_state(sim, id, &prior_state, UnitState::Idle);
        return;
    };
    let target_alive = target.is_alive();
    let target_pos = target.pos;
    let distance = origin.distance(target_pos);
    let in_range = (distance as f64) <= attack_range;
    let mid_windup = matches!(prior_state, UnitState::Attacking) && windup.ticks_elapsed > 0;

    let next = state_machine::next_combat_state(
        &prior_state,
        TransitionInputs {
            has_target: target_alive,
            in_attack_range: in_range,
            mana_full: false,
            silenced: false,
            mid_attack_windup: mid_windup,
            target_dead: !target_alive,
        },
    );

    match next {
        UnitState::Moving => {
            move_unit_one_step(sim, id, origin, target_pos);
            set_state(sim, id, &prior_state, UnitState::Moving);
        }
        UnitState::Attacking if disarmed => {
            set_state(sim, id, &prior_state, UnitState::Idle);
        }
        UnitState::Attacking => {
            let interval = attack_interval_ticks(sim.config.tick_rate, attack_speed);
            let mut elapsed = if matches!(prior_state, UnitState::Attacking) { windup.ticks_elapsed + 1 } else { 1 };
            if elapsed >= interval {
                resolve_auto_attack(sim, id, target_id);
                elapsed = 0;
            }
            if let Some(unit) = sim.arena.get_mut(id) {
                unit.attack_windup.ticks_elapsed = elapsed;
                unit.state = UnitState::Attacking;
            }
            if !matches!(prior_state, UnitState::Attacking) {
                sim.event_log.push(
                    sim.tick,
                    EventKind::StateChange { unit_id: id, from: format!("{prior_state:?}"), to: "Attacking".into() },
                );
            }
        }
        UnitState::Idle => set_state(sim, id, &prior_state, UnitState::Idle),
        _ => {}
    }
}

fn attack_interval_ticks(tick_rate: u32, attack_speed: f64) -> u32 {
    ((tick_rate as f64) / attack_speed.max(0.01)).round().max(1.0) as u32
}

fn set_state(sim: &mut Simulation, id: UnitId, prior: &UnitState, new_state: UnitState) {
    if *prior == new_state {
        return;
    }
    let from = format!("{prior:?}");
    let to = format!("{new_state:?}");
    if let Some(unit) = sim.arena.get_mut(id) {
        unit.state = new_state;
        unit.attack_windup = Default::default();
    }
    sim.event_log.push(sim.tick, EventKind::StateChange { unit_id: id, from, to });
}

fn move_unit_one_step(sim: &mut Simulation, id: UnitId, origin: HexCoord, target_pos: HexCoord) {
    let Some(goal) = pathfind::nearest_adjacent_goal(&sim.grid, origin, target_pos) else { return };
    let Some(next_hex) = pathfind::next_step(&sim.grid, origin, goal) else { return };
    if next_hex != origin && !sim.grid.is_free(next_hex) {
        return;
    }
    if next_hex == origin {
        return;
    }
    sim.grid.move_unit(origin, next_hex, id);
    if let Some(unit) = sim.arena.get_mut(id) {
        unit.pos = next_hex;
    }
    sim.event_log.push(sim.tick, EventKind::UnitMove { unit_id: id, from: origin, to: next_hex });
}

fn resolve_auto_attack(sim: &mut Simulation, caster: UnitId, target: UnitId) {
    if !sim.arena.get(target).map_or(false, |u| u.is_alive()) {
        return;
    }

    sim.event_log.push(sim.tick, EventKind::UnitAttack { unit_id: caster, target_id: target });

    if let Some(override_effects) = take_attack_override(sim, caster) {
        let mut ctx = sim.effect_context();
        for effect in &override_effects {
            effects::apply_effect(&mut ctx, effect, caster, Some(target), None, Affiliation::Enemies, 0);
        }
    } else {
        let Some(caster_unit) = sim.arena.get(caster) else { return };
        let caster_stats = stats::effective_stat_block(&caster_unit.base_stats, &caster_unit.flat_mods, &caster_unit.percent_mods);
        let Some(target_unit) = sim.arena.get(target) else { return };
        let target_stats = stats::effective_stat_block(&target_unit.base_stats, &target_unit.flat_mods, &target_unit.percent_mods);
        let armor_shred = effects::shred_totals(target_unit, DebuffKind::ArmorShred);
        let mr_shred = effects::shred_totals(target_unit, DebuffKind::MrShred);

        let input = DamageInput {
            base_damage: caster_stats.ad,
            damage_type: DamageType::Physical,
            is_auto_attack: true,
            can_crit: true,
            crit_chance: caster_stats.crit_chance,
            crit_damage: caster_stats.crit_damage,
            dodge_chance: target_stats.dodge_chance,
            target_armor: target_stats.armor,
            target_magic_resist: target_stats.magic_resist,
            target_armor_shred_pct: armor_shred.0,
            target_armor_shred_flat: armor_shred.1,
            target_mr_shred_pct: mr_shred.0,
            target_mr_shred_flat: mr_shred.1,
            amplifier_multiplier: amplifier_multiplier(sim, caster, target),
            durability_sum: 0.0,
        };

        let result = damage::resolve_damage(input, &mut sim.rng);
        let mut ctx = sim.effect_context();
        effects::apply_damage_result(&mut ctx, caster, target, result);
    }

    if let Some(unit) = sim.arena.get_mut(caster) {
        if unit.is_alive() && !unit.state.is_casting() {
            let max_mana = stats::effective_stat_block(&unit.base_stats, &unit.flat_mods, &unit.percent_mods).max_mana;
            let gain = mana::attack_mana_gain(sim.config.mana_formula.attack_mana_base, 1.0);
            unit.mana = mana::apply_gain(unit.mana, max_mana, gain);
        }
    }

    let target_died = sim.arena.get(target).map_or(false, |u| !u.is_alive());
    fire_hooks(sim, caster, |p| matches!(p, TriggerPoint::OnHit));
    if target_died {
        fire_hooks(sim, caster, |p| matches!(p, TriggerPoint::OnKill));
    }
}

/// Consumes one charge of an armed `ReplaceAttacks` override for `caster`,
/// if any, removing the entry once exhausted.
fn take_attack_override(sim: &mut Simulation, caster: UnitId) -> Option<Vec<EffectDescriptor>> {
    let override_ = sim.attack_overrides_by_unit.get_mut(&caster)?;
    let effects = override_.effects.clone();
    override_.remaining = override_.remaining.saturating_sub(1);
    if override_.remaining == 0 {
        sim.attack_overrides_by_unit.remove(&caster);
    }
    Some(effects)
}

fn amplifier_multiplier(sim: &Simulation, caster: UnitId, target: UnitId) -> f64 {
    let Some(amps) = sim.amplifiers_by_unit.get(&caster) else { return 1.0 };
    let Some(caster_unit) = sim.arena.get(caster) else { return 1.0 };
    let Some(target_unit) = sim.arena.get(target) else { return 1.0 };
    let caster_max_hp = stats::effective_stat_block(&caster_unit.base_stats, &caster_unit.flat_mods, &caster_unit.percent_mods).max_hp;
    let target_max_hp = stats::effective_stat_block(&target_unit.base_stats, &target_unit.flat_mods, &target_unit.percent_mods).max_hp;
    amps.iter()
        .filter(|a| a.condition.holds(target_unit.hp, target_max_hp, caster_unit.hp, caster_max_hp))
        .fold(1.0, |acc, a| acc * (1.0 + a.amp_pct))
}

// ---------------------------------------------------------------------
// Phase 5: projectile advancement + impact resolution.
// ---------------------------------------------------------------------

fn phase5_projectiles(sim: &mut Simulation) {
    let projectiles = std::mem::take(&mut sim.projectiles);
    let mut still_flying = Vec::with_capacity(projectiles.len());

    for mut projectile in projectiles {
        let target = sim.arena.get(projectile.target);
        let target_alive = target.map_or(false, |u| u.is_alive());
        let target_pos = target.map(|u| u.pos);

        match projectile.advance(target_pos, target_alive) {
            ProjectileOutcome::StillFlying => still_flying.push(projectile),
            ProjectileOutcome::Missed => {
                sim.event_log.push(sim.tick, EventKind::ProjectileMiss { projectile_id: projectile.id, target_id: projectile.target });
            }
            ProjectileOutcome::Arrived(impact_hex) => {
                let affiliation = sim
                    .arena
                    .get(projectile.source)
                    .and_then(|u| u.ability_id.clone())
                    .and_then(|aid| hb_data::get_ability_def(&aid))
                    .map(|ab| ab.affiliation)
                    .unwrap_or(Affiliation::Enemies);

                {
                    let mut ctx = sim.effect_context();
                    ability::resolve_projectile_impact(&mut ctx, &projectile, affiliation, impact_hex);
                }
                sim.event_log.push(sim.tick, EventKind::ProjectileHit { projectile_id: projectile.id, target_id: projectile.target });
            }
        }
    }

    sim.projectiles = still_flying;
}

// ---------------------------------------------------------------------
// Phase 6: team elimination or max_ticks.
// ---------------------------------------------------------------------

fn phase6_check_end(sim: &mut Simulation) -> TickOutcome {
    let blue_alive = sim.arena.iter().any(|u| u.team == Team::Blue && u.is_alive());
    let red_alive = sim.arena.iter().any(|u| u.team == Team::Red && u.is_alive());
    let timed_out = sim.tick >= sim.config.max_ticks;

    let winner = match (blue_alive, red_alive) {
        (true, false) => Some(Some(Team::Blue)),
        (false, true) => Some(Some(Team::Red)),
        (false, false) => Some(None),
        (true, true) if timed_out => Some(None),
        (true, true) => None,
    };

    let Some(winner_team) = winner else { return TickOutcome::Continue };

    let deaths_per_team = team_death_counts(sim);
    sim.event_log.push(sim.tick, EventKind::SimulationEnd { winner_team, total_ticks: sim.tick, deaths_per_team });
    TickOutcome::Done { winner_team, total_ticks: sim.tick, deaths_per_team }
}

fn team_death_counts(sim: &Simulation) -> [u32; 2] {
    let mut counts = [0u32; 2];
    for unit in sim.arena.iter() {
        if unit.state.is_dead() {
            counts[unit.team.index()] += 1;
        }
    }
    counts
}
