//! Ability cast resolution.
//!
//! Picks a target through the selector, then resolves delivery: instant
//! effects apply immediately, area delivery resolves the AoE footprint and
//! applies effects to every unit inside it, and projectile delivery spawns
//! one or more in-flight projectiles — including the swarm/spread fan-out
//! the effect registry (`hb_engine::effects`) defers here.

use hb_types::ability::{AbilityDef, ProjectileParams};
use hb_types::effect::{EffectDescriptor, EffectKind};
use hb_types::enums::{Affiliation, AoeShape, DeliveryKind, Team};
use hb_types::hex::{hex_circle, hex_cone, hex_line};
use hb_types::ids::{ProjectileId, UnitId};
use hb_types::unit::StatBlock;
use hb_types::HexCoord;

use crate::arena::Arena;
use crate::effects::{apply_effect, EffectContext};
use crate::grid::Grid;
use crate::projectile::Projectile;
use crate::stats;
use crate::targeting::{select_target, Candidate};

/// Resolves an ability's hex footprint from an anchor point. A ground
/// impact point has no inherent facing, so cone shapes anchor their axis
/// at the same hex — `hex_cone`'s circle-degenerate case handles that.
pub(crate) fn hexes_for_shape(anchor: HexCoord, shape: AoeShape) -> Vec<HexCoord> {
    match shape {
        AoeShape::Circle { radius } => hex_circle(anchor, radius),
        AoeShape::Cone { range, half_angle_deg } => hex_cone(anchor, anchor, range, half_angle_deg),
        AoeShape::Line { length, width } => hex_line(anchor, HexCoord::new(anchor.q + length as i32, anchor.r), width),
    }
}

pub(crate) fn affiliation_matches(affiliation: Affiliation, caster_team: Team, unit_team: Team) -> bool {
    match affiliation {
        Affiliation::Enemies => unit_team != caster_team,
        Affiliation::Allies => unit_team == caster_team,
        Affiliation::All => true,
    }
}

/// The grid column each team spawns from (units aren't otherwise tagged
/// with a side), used only to resolve `frontline`/`backline` selectors.
pub(crate) fn spawn_edge(grid: &Grid, team: Team) -> HexCoord {
    match team {
        Team::Blue => HexCoord::new(0, 0),
        Team::Red => HexCoord::new(grid.width() as i32 - 1, 0),
    }
}

type TargetSnapshot = (UnitId, HexCoord, f64, StatBlock);

fn collect_targetable(arena: &Arena, caster_team: Team, affiliation: Affiliation) -> Vec<TargetSnapshot> {
    arena
        .iter()
        .filter(|u| u.is_alive() && affiliation_matches(affiliation, caster_team, u.team))
        .map(|u| (u.id, u.pos, u.hp, stats::effective_stat_block(&u.base_stats, &u.flat_mods, &u.percent_mods)))
        .collect()
}

fn build_candidates(snapshots: &[TargetSnapshot]) -> Vec<Candidate<'_>> {
    snapshots
        .iter()
        .map(|(id, pos, hp, stats)| Candidate { id: *id, pos: *pos, hp: *hp, effective_stats: stats })
        .collect()
}

/// `count`/`spread_deg` from a `ProjectileSwarm`/`ProjectileSpread` entry in
/// the ability's effect list, if present.
fn fan_out_params(effects: &[EffectDescriptor]) -> Option<(u32, f64)> {
    effects.iter().find_map(|e| match &e.kind {
        EffectKind::ProjectileSwarm { count, spread_deg } => Some((*count, *spread_deg)),
        EffectKind::ProjectileSpread { count, spread_deg } => Some((*count, *spread_deg)),
        _ => None,
    })
}

pub struct AbilityOutcome {
    pub primary_target: Option<UnitId>,
    pub spawned_projectiles: Vec<Projectile>,
}

/// Resolves a cast at its `effect_point`. `next_projectile_id` is the
/// caller's monotonic counter, keyed by insertion order.
pub fn resolve_cast(
    ctx: &mut EffectContext,
    caster: UnitId,
    ability: &AbilityDef,
    star_index: usize,
    next_projectile_id: &mut u32,
) -> AbilityOutcome {
    let empty = AbilityOutcome { primary_target: None, spawned_projectiles: Vec::new() };
    let Some(caster_unit) = ctx.arena.get(caster) else { return empty };
    let caster_team = caster_unit.team;
    let origin = caster_unit.pos;
    let current_target = caster_unit.current_target;
    let own_spawn_edge = spawn_edge(ctx.grid, caster_team);

    let snapshots = collect_targetable(ctx.arena, caster_team, ability.affiliation);
    let candidates = build_candidates(&snapshots);
    let primary_target = select_target(&ability.selector, origin, own_spawn_edge, &candidates, current_target, ctx.rng);

    match ability.delivery {
        DeliveryKind::Instant => {
            let impact_hex = primary_target.and_then(|t| ctx.arena.get(t)).map(|u| u.pos);
            for effect in ability.effects.clone() {
                apply_effect(ctx, &effect, caster, primary_target, impact_hex, ability.affiliation, star_index);
            }
            AbilityOutcome { primary_target, spawned_projectiles: Vec::new() }
        }
        DeliveryKind::Area => {
            let anchor = primary_target.and_then(|t| ctx.arena.get(t)).map(|u| u.pos).unwrap_or(origin);
            let shape = ability.aoe_shape.unwrap_or(AoeShape::Circle { radius: 0 });
            let hexes = hexes_for_shape(anchor, shape);
            let targets: Vec<UnitId> = ctx
                .arena
                .iter()
                .filter(|u| u.is_alive() && affiliation_matches(ability.affiliation, caster_team, u.team) && hexes.contains(&u.pos))
                .map(|u| u.id)
                .collect();
            for target in &targets {
                for effect in ability.effects.clone() {
                    apply_effect(ctx, &effect, caster, Some(*target), Some(anchor), ability.affiliation, star_index);
                }
            }
            AbilityOutcome { primary_target, spawned_projectiles: Vec::new() }
        }
        DeliveryKind::Projectile => {
            let Some(target) = primary_target else { return empty };
            let params = ability.projectile.unwrap_or(ProjectileParams { speed_hexes_per_tick: 1.0, homing: true, can_miss: false });
            let launches = fan_out_params(&ability.effects).map(|(count, _)| count.max(1)).unwrap_or(1);
            let target_pos = ctx.arena.get(target).map(|u| u.pos).unwrap_or(origin);

            let mut spawned = Vec::with_capacity(launches as usize);
            for _ in 0..launches {
                let id = ProjectileId::new(*next_projectile_id);
                *next_projectile_id += 1;
                spawned.push(Projectile {
                    id,
                    source: caster,
                    target,
                    params,
                    effects: ability.effects.clone(),
                    star_index,
                    pos_q: origin.q as f64,
                    pos_r: origin.r as f64,
                    fixed_destination: target_pos,
                });
            }
            AbilityOutcome { primary_target: Some(target), spawned_projectiles: spawned }
        }
    }
}

/// Resolves a landed projectile's payload against the hex it arrived at:
/// every still-alive unit matching the ability's affiliation at that hex
/// takes the carried effects.
pub fn resolve_projectile_impact(ctx: &mut EffectContext, projectile: &Projectile, affiliation: Affiliation, impact_hex: HexCoord) {
    let Some(caster_unit) = ctx.arena.get(projectile.source) else { return };
    let caster_team = caster_unit.team;

    let direct_hit = ctx
        .arena
        .get(projectile.target)
        .filter(|u| u.is_alive() && u.pos == impact_hex)
        .map(|u| u.id);

    let targets: Vec<UnitId> = match direct_hit {
        Some(id) => vec![id],
        None => ctx
            .arena
            .iter()
            .filter(|u| u.is_alive() && u.pos == impact_hex && affiliation_matches(affiliation, caster_team, u.team))
            .map(|u| u.id)
            .collect(),
    };

    for target in targets {
        for effect in projectile.effects.clone() {
            apply_effect(ctx, &effect, projectile.source, Some(target), Some(impact_hex), affiliation, projectile.star_index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hb_types::enums::{DamageType, StarLevel};
    use hb_types::targeting::{SelectorKind, SelectorSpec};
    use hb_types::unit::{AttackWindup, Unit, UnitState};
    use hb_types::BattleRng;

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

    fn sample_ability(delivery: DeliveryKind) -> AbilityDef {
        AbilityDef {
            id: "bolt".into(),
            mana_cost: 100.0,
            cast_time_ticks: [15, 15, 15],
            delivery,
            selector: SelectorSpec::new(SelectorKind::Nearest),
            projectile: Some(ProjectileParams { speed_hexes_per_tick: 10.0, homing: false, can_miss: false }),
            aoe_shape: Some(AoeShape::Circle { radius: 1 }),
            affiliation: Affiliation::Enemies,
            effects: vec![EffectDescriptor::simple(EffectKind::Damage { damage_type: DamageType::Magical }, [100.0, 200.0, 300.0])],
            overflow: false,
        }
    }

    #[test]
    fn instant_delivery_applies_effect_to_selected_target() {
        let mut arena = Arena::new();
        let caster = arena.insert(sample_unit(arena.next_id(), Team::Blue, HexCoord::new(0, 0), 1000.0));
        let target = arena.insert(sample_unit(arena.next_id(), Team::Red, HexCoord::new(1, 0), 1000.0));
        let mut grid = Grid::new(8, 7);
        let mut rng = BattleRng::new(1);
        let mut log = Vec::new();
        let mana_formula = hb_data::config::ManaFormulaParams::default();
        let mut periodic = Vec::new();
        let mut zones = Vec::new();
        let mut attack_overrides = std::collections::HashMap::new();
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

        let ability = sample_ability(DeliveryKind::Instant);
        let mut next_id = 0;
        let outcome = resolve_cast(&mut ctx, caster, &ability, 0, &mut next_id);

        assert_eq!(outcome.primary_target, Some(target));
        assert!(ctx.arena.get(target).unwrap().hp < 1000.0);
    }

    #[test]
    fn projectile_delivery_spawns_toward_target() {
        let mut arena = Arena::new();
        let caster = arena.insert(sample_unit(arena.next_id(), Team::Blue, HexCoord::new(0, 0), 1000.0));
        let _target = arena.insert(sample_unit(arena.next_id(), Team::Red, HexCoord::new(3, 0), 1000.0));
        let mut grid = Grid::new(8, 7);
        let mut rng = BattleRng::new(1);
        let mut log = Vec::new();
        let mana_formula = hb_data::config::ManaFormulaParams::default();
        let mut periodic = Vec::new();
        let mut zones = Vec::new();
        let mut attack_overrides = std::collections::HashMap::new();
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

        let ability = sample_ability(DeliveryKind::Projectile);
        let mut next_id = 0;
        let outcome = resolve_cast(&mut ctx, caster, &ability, 0, &mut next_id);

        assert_eq!(outcome.spawned_projectiles.len(), 1);
        assert_eq!(outcome.spawned_projectiles[0].target, _target);
    }

    #[test]
    fn projectile_swarm_spawns_multiple() {
        let mut arena = Arena::new();
        let caster = arena.insert(sample_unit(arena.next_id(), Team::Blue, HexCoord::new(0, 0), 1000.0));
        let _target = arena.insert(sample_unit(arena.next_id(), Team::Red, HexCoord::new(3, 0), 1000.0));
        let mut grid = Grid::new(8, 7);
        let mut rng = BattleRng::new(1);
        let mut log = Vec::new();
        let mana_formula = hb_data::config::ManaFormulaParams::default();
        let mut periodic = Vec::new();
        let mut zones = Vec::new();
        let mut attack_overrides = std::collections::HashMap::new();
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

        let mut ability = sample_ability(DeliveryKind::Projectile);
        ability.effects.push(EffectDescriptor::simple(EffectKind::ProjectileSwarm { count: 3, spread_deg: 10.0 }, [0.0, 0.0, 0.0]));
        let mut next_id = 0;
        let outcome = resolve_cast(&mut ctx, caster, &ability, 0, &mut next_id);

        assert_eq!(outcome.spawned_projectiles.len(), 3);
    }

    #[test]
    fn area_delivery_hits_everyone_in_radius() {
        let mut arena = Arena::new();
        let caster = arena.insert(sample_unit(arena.next_id(), Team::Blue, HexCoord::new(0, 0), 1000.0));
        let t1 = arena.insert(sample_unit(arena.next_id(), Team::Red, HexCoord::new(1, 0), 1000.0));
        let t2 = arena.insert(sample_unit(arena.next_id(), Team::Red, HexCoord::new(2, -1), 1000.0));
        let mut grid = Grid::new(8, 7);
        let mut rng = BattleRng::new(1);
        let mut log = Vec::new();
        let mana_formula = hb_data::config::ManaFormulaParams::default();
        let mut periodic = Vec::new();
        let mut zones = Vec::new();
        let mut attack_overrides = std::collections::HashMap::new();
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

        let ability = sample_ability(DeliveryKind::Area);
        let mut next_id = 0;
        resolve_cast(&mut ctx, caster, &ability, 0, &mut next_id);

        assert!(ctx.arena.get(t1).unwrap().hp < 1000.0);
        assert!(ctx.arena.get(t2).unwrap().hp < 1000.0);
    }
}
