//! The `Unit` aggregate and its embedded state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::debuff::Debuff;
use crate::enums::{CastPhase, StarLevel, StatKind, Team};
use crate::hex::HexCoord;
use crate::ids::UnitId;
use crate::modifier::{Buff, StatModifier};

/// Base stat values before any modifier is applied. Every field corresponds
/// 1:1 to a `StatKind` variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    pub max_hp: f64,
    pub ad: f64,
    pub ap: f64,
    pub armor: f64,
    pub magic_resist: f64,
    pub attack_speed: f64,
    pub crit_chance: f64,
    pub crit_damage: f64,
    pub dodge_chance: f64,
    pub lifesteal: f64,
    pub omnivamp: f64,
    pub max_mana: f64,
    pub attack_range: f64,
}

impl StatBlock {
    pub fn get(&self, stat: StatKind) -> f64 {
        match stat {
            StatKind::MaxHp => self.max_hp,
            StatKind::Ad => self.ad,
            StatKind::Ap => self.ap,
            StatKind::Armor => self.armor,
            StatKind::MagicResist => self.magic_resist,
            StatKind::AttackSpeed => self.attack_speed,
            StatKind::CritChance => self.crit_chance,
            StatKind::CritDamage => self.crit_damage,
            StatKind::DodgeChance => self.dodge_chance,
            StatKind::Lifesteal => self.lifesteal,
            StatKind::Omnivamp => self.omnivamp,
            StatKind::MaxMana => self.max_mana,
            StatKind::AttackRange => self.attack_range,
        }
    }
}

impl Default for StatBlock {
    fn default() -> Self {
        Self {
            max_hp: 1.0,
            ad: 0.0,
            ap: 0.0,
            armor: 0.0,
            magic_resist: 0.0,
            attack_speed: 1.0,
            crit_chance: 0.25,
            crit_damage: 0.5,
            dodge_chance: 0.0,
            lifesteal: 0.0,
            omnivamp: 0.0,
            max_mana: 100.0,
            attack_range: 1.0,
        }
    }
}

/// An independent shield pool with its own expiry; multiple shields coexist
/// on a unit, each expiring on its own schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shield {
    pub remaining: f64,
    pub remaining_ticks: u32,
}

/// The unit lifecycle state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UnitState {
    Idle,
    Moving,
    Attacking,
    Casting(CastState),
    Stunned { prior: Box<UnitState>, remaining_ticks: u32 },
    Dead,
}

impl UnitState {
    pub fn is_dead(&self) -> bool {
        matches!(self, UnitState::Dead)
    }

    pub fn is_stunned(&self) -> bool {
        matches!(self, UnitState::Stunned { .. })
    }

    pub fn is_casting(&self) -> bool {
        matches!(self, UnitState::Casting(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CastState {
    pub phase: CastPhase,
    pub ticks_in_phase: u32,
    pub mana_spent_at_entry: f64,
}

/// Progress toward a melee/ranged auto-attack windup, in ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackWindup {
    pub ticks_elapsed: u32,
}

/// A living (or recently-dead) combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub team: Team,
    pub star: StarLevel,
    pub pos: HexCoord,
    pub base_stats: StatBlock,
    pub flat_mods: Vec<StatModifier>,
    pub percent_mods: Vec<StatModifier>,
    pub hp: f64,
    pub shields: Vec<Shield>,
    pub mana: f64,
    pub debuffs: Vec<Debuff>,
    pub buffs: Vec<Buff>,
    pub stack_counters: HashMap<String, u32>,
    pub state: UnitState,
    pub ability_id: Option<String>,
    pub default_selector: crate::targeting::SelectorSpec,
    pub current_target: Option<UnitId>,
    pub attack_windup: AttackWindup,
    /// Set when `ability_crit` is granted by an item; ability damage can
    /// then roll crit.
    pub ability_crit: bool,
    pub casts_completed: u32,
}

impl Unit {
    pub fn is_alive(&self) -> bool {
        !self.state.is_dead()
    }

    pub fn total_shield(&self) -> f64 {
        self.shields.iter().map(|s| s.remaining).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_block_get_matches_field() {
        let mut stats = StatBlock::default();
        stats.ad = 55.0;
        assert_eq!(stats.get(StatKind::Ad), 55.0);
        assert_eq!(stats.get(StatKind::AttackSpeed), 1.0);
    }

    #[test]
    fn unit_state_predicates() {
        assert!(UnitState::Dead.is_dead());
        assert!(!UnitState::Idle.is_dead());
        assert!(UnitState::Stunned { prior: Box::new(UnitState::Idle), remaining_ticks: 5 }.is_stunned());
        assert!(UnitState::Casting(CastState {
            phase: CastPhase::CastStart,
            ticks_in_phase: 0,
            mana_spent_at_entry: 0.0,
        })
        .is_casting());
    }

    #[test]
    fn total_shield_sums_all_pools() {
        let shields = vec![
            Shield { remaining: 30.0, remaining_ticks: 60 },
            Shield { remaining: 20.0, remaining_ticks: 10 },
        ];
        let sum: f64 = shields.iter().map(|s| s.remaining).sum();
        assert_eq!(sum, 50.0);
    }
}
