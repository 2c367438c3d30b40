//! The `Simulation` aggregate and its public API: `new_simulation`,
//! `add_unit`, `equip_item`, `attach_trait_manager`, `attach_item_manager`,
//! `run`, `tick`.

use std::collections::HashMap;

use hb_data::{ConditionalAmplifier, EngineConfig, ItemDef};
use hb_types::ability::TriggerHook;
use hb_types::enums::{StarLevel, Team};
use hb_types::error::ConfigError;
use hb_types::event::{EventKind, EventLog};
use hb_types::ids::UnitId;
use hb_types::modifier::ModifierKind;
use hb_types::unit::{AttackWindup, Unit, UnitState};
use hb_types::{BattleRng, HexCoord};

use crate::arena::Arena;
use crate::effects::EffectContext;
use crate::grid::Grid;
use crate::projectile::Projectile;
use crate::scheduler::{self, TickOutcome};
use crate::zone::{PeriodicEffect, Zone};

/// External collaborator for `attach_trait_manager` / `attach_item_manager`.
/// The manager decides which hooks are currently active —
/// counting trait tags, checking team composition thresholds, whatever its
/// own bookkeeping needs — and hands back the concrete list every tick. The
/// engine only evaluates `TriggerPoint` and `condition_hp_pct_at_least`; it
/// never counts anything itself.
pub trait HookProvider {
    fn active_hooks(&mut self, arena: &Arena, tick: u32) -> Vec<(UnitId, TriggerHook)>;
}

/// Result of a completed `run`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub winner_team: Option<Team>,
    pub total_ticks: u32,
    pub deaths_per_team: [u32; 2],
}

/// A headless combat simulation: arena, grid, RNG, and every scheduler
/// aggregate it drives each tick. Construct with `new`, populate with
/// `add_unit`/`equip_item`, then drive it with `tick` or `run`.
pub struct Simulation {
    pub(crate) arena: Arena,
    pub(crate) grid: Grid,
    pub(crate) rng: BattleRng,
    pub(crate) event_log: EventLog,
    pub(crate) projectiles: Vec<Projectile>,
    pub(crate) zones: Vec<Zone>,
    pub(crate) periodic: Vec<PeriodicEffect>,
    pub(crate) config: EngineConfig,
    pub(crate) tick: u32,
    pub(crate) next_projectile_id: u32,
    pub(crate) started: bool,
    pub(crate) seed: u64,
    pub(crate) amplifiers_by_unit: HashMap<UnitId, Vec<ConditionalAmplifier>>,
    pub(crate) hooks_by_unit: HashMap<UnitId, Vec<TriggerHook>>,
    pub(crate) attack_overrides_by_unit: HashMap<UnitId, crate::effects::AttackOverride>,
    pub(crate) trait_manager: Option<Box<dyn HookProvider>>,
    pub(crate) item_manager: Option<Box<dyn HookProvider>>,
    pub(crate) active_hooks_this_tick: Vec<(UnitId, TriggerHook)>,
}

impl Simulation {
    pub fn new(seed: u64, config: EngineConfig) -> Self {
        Self {
            arena: Arena::new(),
            grid: Grid::new(config.grid_width, config.grid_height),
            rng: BattleRng::new(seed),
            event_log: EventLog::default(),
            projectiles: Vec::new(),
            zones: Vec::new(),
            periodic: Vec::new(),
            config,
            tick: 0,
            next_projectile_id: 0,
            started: false,
            seed,
            amplifiers_by_unit: HashMap::new(),
            hooks_by_unit: HashMap::new(),
            attack_overrides_by_unit: HashMap::new(),
            trait_manager: None,
            item_manager: None,
            active_hooks_this_tick: Vec::new(),
        }
    }

    /// Spawns a unit from a registered `UnitDef`.
    /// Only callable before the first `tick`/`run` call.
    pub fn add_unit(&mut self, unit_def_id: &str, team: Team, hex: HexCoord, star: StarLevel) -> Result<UnitId, ConfigError> {
        if self.started {
            return Err(ConfigError::SimulationAlreadyRunning);
        }
        // `get_unit_def` returns `None` for unknown ids; its own doc comment
        // calls for surfacing that as `MissingAbility` here.
        let def = hb_data::unit_def::get_unit_def(unit_def_id).ok_or_else(|| ConfigError::MissingAbility(unit_def_id.to_string()))?;
        if !self.grid.in_bounds(hex) {
            return Err(ConfigError::OutOfBounds(hex, self.grid.width(), self.grid.height()));
        }

        let star_multiplier = (star.index() + 1) as f64;
        let mut base_stats = def.base_stats;
        base_stats.max_hp *= star_multiplier;
        base_stats.ad *= star_multiplier;
        base_stats.ap *= star_multiplier;

        let id = self.arena.next_id();
        let unit = Unit {
            id,
            name: def.name.clone(),
            team,
            star,
            pos: hex,
            hp: base_stats.max_hp,
            base_stats,
            flat_mods: Vec::new(),
            percent_mods: Vec::new(),
            shields: Vec::new(),
            mana: 0.0,
            debuffs: Vec::new(),
            buffs: Vec::new(),
            stack_counters: HashMap::new(),
            state: UnitState::Idle,
            ability_id: Some(def.default_ability_id.clone()),
            default_selector: def.default_selector,
            current_target: None,
            attack_windup: AttackWindup::default(),
            ability_crit: false,
            casts_completed: 0,
        };
        let id = self.arena.insert(unit);
        // Grid occupancy conflicts at spawn are a caller bug, not a
        // recoverable config error — `Grid::place` treats them the same way
        // the scheduler does mid-battle.
        self.grid.place(hex, id);
        self.event_log.push(self.tick, EventKind::UnitSpawn { unit_id: id, team, pos: hex });
        Ok(id)
    }

    /// Applies an item's stat bonuses, conditional amplifiers, and trigger
    /// hooks directly to `unit_id`. Only callable
    /// before the first `tick`/`run` call; `unit_id` must come from a prior
    /// `add_unit` call on this simulation.
    pub fn equip_item(&mut self, unit_id: UnitId, item: &ItemDef) {
        if self.started {
            return;
        }
        let Some(unit) = self.arena.get_mut(unit_id) else { return };
        for bonus in &item.stat_bonuses {
            match bonus.kind {
                ModifierKind::Flat => unit.flat_mods.push(*bonus),
                ModifierKind::Percent => unit.percent_mods.push(*bonus),
            }
        }
        if item.grants_ability_crit {
            unit.ability_crit = true;
        }
        self.amplifiers_by_unit.entry(unit_id).or_default().extend(item.conditional_effects.iter().cloned());
        self.hooks_by_unit.entry(unit_id).or_default().extend(item.triggered_effects.iter().cloned());
    }

    /// Registers the external collaborator that supplies trait-synergy
    /// trigger hooks every tick.
    pub fn attach_trait_manager(&mut self, manager: Box<dyn HookProvider>) {
        self.trait_manager = Some(manager);
    }

    /// Registers the external collaborator that supplies dynamic item
    /// trigger hooks every tick. Static
    /// per-unit item hooks from `equip_item` don't need this; it exists for
    /// item logic that depends on live team state the engine doesn't track.
    pub fn attach_item_manager(&mut self, manager: Box<dyn HookProvider>) {
        self.item_manager = Some(manager);
    }

    /// Advances the simulation by one tick.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.started {
            self.started = true;
            self.event_log.push(
                0,
                EventKind::SimulationStart {
                    seed: self.seed,
                    tick_rate: self.config.tick_rate,
                    grid_width: self.config.grid_width,
                    grid_height: self.config.grid_height,
                },
            );
        }
        scheduler::run_tick(self)
    }

    /// Runs to completion: team elimination or `max_ticks`, whichever comes
    /// first.
    pub fn run(&mut self) -> RunResult {
        loop {
            match self.tick() {
                TickOutcome::Continue => {}
                TickOutcome::Done { winner_team, total_ticks, deaths_per_team } => {
                    return RunResult { winner_team, total_ticks, deaths_per_team };
                }
            }
        }
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn current_tick(&self) -> u32 {
        self.tick
    }

    /// Builds an `EffectContext` borrowing this simulation's mutable
    /// aggregates. Only safe to call where nothing else needs a concurrent
    /// borrow of another field while the context is alive (the scheduler's
    /// cast-resolution call site needs `next_projectile_id` too and
    /// constructs its context inline instead).
    pub(crate) fn effect_context(&mut self) -> EffectContext<'_> {
        EffectContext {
            arena: &mut self.arena,
            grid: &mut self.grid,
            rng: &mut self.rng,
            log: &mut self.event_log.events,
            tick: self.tick,
            mana_formula: &self.config.mana_formula,
            periodic: &mut self.periodic,
            zones: &mut self.zones,
            attack_overrides: &mut self.attack_overrides_by_unit,
        }
    }
}
