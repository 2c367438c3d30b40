//! The unit arena: units and projectiles live in arenas indexed by stable
//! ids. A dead unit's id remains readable so late-resolving effects can
//! still look it up.

use hb_types::ids::UnitId;
use hb_types::unit::Unit;

/// Owns every unit that has ever been spawned, indexed by `UnitId`. Dead
/// units stay in the arena (status `Dead`) so in-flight projectiles and
/// stale target references can still resolve them.
#[derive(Debug, Clone, Default)]
pub struct Arena {
    units: Vec<Unit>,
}

impl Arena {
    pub fn new() -> Self {
        Self { units: Vec::new() }
    }

    pub fn insert(&mut self, unit: Unit) -> UnitId {
        let id = UnitId::new(self.units.len() as u32);
        debug_assert_eq!(id, unit.id, "unit must be constructed with its arena-assigned id");
        self.units.push(unit);
        id
    }

    pub fn next_id(&self) -> UnitId {
        UnitId::new(self.units.len() as u32)
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.index())
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id.index())
    }

    /// Two distinct mutable borrows at once, for effects with both a caster
    /// and a target (e.g. lifesteal crediting the caster while damaging the
    /// target).
    pub fn get_two_mut(&mut self, a: UnitId, b: UnitId) -> Option<(&mut Unit, &mut Unit)> {
        if a == b {
            return None;
        }
        let (lo, hi) = if a.index() < b.index() { (a, b) } else { (b, a) };
        let (left, right) = self.units.split_at_mut(hi.index());
        let lo_unit = &mut left[lo.index()];
        let hi_unit = &mut right[0];
        if a.index() < b.index() {
            Some((lo_unit, hi_unit))
        } else {
            Some((hi_unit, lo_unit))
        }
    }

    /// Units in stable insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        self.units.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = UnitId> + '_ {
        (0..self.units.len() as u32).map(UnitId::new)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hb_types::enums::{StarLevel, Team};
    use hb_types::targeting::{SelectorKind, SelectorSpec};
    use hb_types::unit::{AttackWindup, StatBlock, UnitState};
    use hb_types::HexCoord;

    fn sample_unit(id: UnitId) -> Unit {
        Unit {
            id,
            name: "test".into(),
            team: Team::Blue,
            star: StarLevel::One,
            pos: HexCoord::new(0, 0),
            base_stats: StatBlock::default(),
            flat_mods: vec![],
            percent_mods: vec![],
            hp: 100.0,
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

    #[test]
    fn insert_assigns_sequential_ids() {
        let mut arena = Arena::new();
        let a = arena.insert(sample_unit(arena.next_id()));
        let b = arena.insert(sample_unit(arena.next_id()));
        assert_eq!(a, UnitId::new(0));
        assert_eq!(b, UnitId::new(1));
    }

    #[test]
    fn get_two_mut_returns_in_requested_roles() {
        let mut arena = Arena::new();
        let a = arena.insert(sample_unit(arena.next_id()));
        let b = arena.insert(sample_unit(arena.next_id()));
        let (ua, ub) = arena.get_two_mut(a, b).unwrap();
        ua.hp = 1.0;
        ub.hp = 2.0;
        assert_eq!(arena.get(a).unwrap().hp, 1.0);
        assert_eq!(arena.get(b).unwrap().hp, 2.0);
    }

    #[test]
    fn get_two_mut_rejects_same_id() {
        let mut arena = Arena::new();
        let a = arena.insert(sample_unit(arena.next_id()));
        assert!(arena.get_two_mut(a, a).is_none());
    }
}
