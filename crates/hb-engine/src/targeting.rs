//! Target-selector application.
//!
//! `hb_types::targeting::SelectorSpec` is the data; this module is the pure
//! function that applies it over a live candidate pool. Ties resolve by
//! stable id (`UnitId`'s `Ord`, which is insertion order) as the spec
//! requires.

use hb_types::targeting::{SelectorKind, SelectorSpec};
use hb_types::unit::StatBlock;
use hb_types::{BattleRng, HexCoord, UnitId};

/// The minimal view of a unit the selector needs. Kept separate from
/// `Unit` so callers can pass effective (modifier-applied) stats without
/// the selector reaching back into the arena.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub id: UnitId,
    pub pos: HexCoord,
    pub hp: f64,
    pub effective_stats: &'a StatBlock,
}

impl<'a> Candidate<'a> {
    pub fn effective_max_hp(&self) -> f64 {
        self.effective_stats.max_hp
    }
}

pub fn select_target(
    spec: &SelectorSpec,
    origin: HexCoord,
    own_spawn_edge: HexCoord,
    candidates: &[Candidate<'_>],
    current_target: Option<UnitId>,
    rng: &mut BattleRng,
) -> Option<UnitId> {
    let pool: Vec<&Candidate<'_>> = candidates
        .iter()
        .filter(|c| spec.max_range.map_or(true, |r| origin.distance(c.pos) <= r))
        .collect();

    if pool.is_empty() {
        return None;
    }

    match spec.kind {
        SelectorKind::Nearest => pool
            .iter()
            .min_by_key(|c| (origin.distance(c.pos), c.id))
            .map(|c| c.id),
        SelectorKind::Farthest => pool
            .iter()
            .max_by_key(|c| (origin.distance(c.pos), std::cmp::Reverse(c.id)))
            .map(|c| c.id),
        SelectorKind::LowestHpPercent => pool
            .iter()
            .min_by(|a, b| {
                let ra = a.hp / a.effective_max_hp();
                let rb = b.hp / b.effective_max_hp();
                ra.partial_cmp(&rb).unwrap_or(std::cmp::Ordering::Equal).then(a.id.cmp(&b.id))
            })
            .map(|c| c.id),
        SelectorKind::LowestHpFlat => pool
            .iter()
            .min_by(|a, b| a.hp.partial_cmp(&b.hp).unwrap_or(std::cmp::Ordering::Equal).then(a.id.cmp(&b.id)))
            .map(|c| c.id),
        SelectorKind::HighestStat { stat } => pool
            .iter()
            .max_by(|a, b| {
                a.effective_stats
                    .get(stat)
                    .partial_cmp(&b.effective_stats.get(stat))
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(b.id.cmp(&a.id))
            })
            .map(|c| c.id),
        SelectorKind::Cluster { radius } => pool
            .iter()
            .max_by_key(|c| {
                let count = pool.iter().filter(|o| o.id != c.id && c.pos.distance(o.pos) <= radius).count();
                (count, std::cmp::Reverse(c.id))
            })
            .map(|c| c.id),
        SelectorKind::Random => rng_choice(&pool, rng).map(|c| c.id),
        SelectorKind::Frontline => pool
            .iter()
            .min_by_key(|c| (own_spawn_edge.distance(c.pos), c.id))
            .map(|c| c.id),
        SelectorKind::Backline => pool
            .iter()
            .max_by_key(|c| (own_spawn_edge.distance(c.pos), std::cmp::Reverse(c.id)))
            .map(|c| c.id),
        SelectorKind::CurrentTarget => current_target
            .filter(|&id| pool.iter().any(|c| c.id == id))
            .or_else(|| pool.iter().min_by_key(|c| (origin.distance(c.pos), c.id)).map(|c| c.id)),
    }
}

fn rng_choice<'a, 'b>(pool: &'b [&'a Candidate<'a>], rng: &mut BattleRng) -> Option<&'b &'a Candidate<'a>> {
    if pool.is_empty() {
        return None;
    }
    let idx = rng.range(0, pool.len() as i64 - 1) as usize;
    pool.get(idx)
}

/// Override for `taunt`: while active, the taunted unit's selector is
/// bypassed and it must target the taunt's source instead.
pub fn taunted_target(taunter: Option<UnitId>, fallback: Option<UnitId>) -> Option<UnitId> {
    taunter.or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hb_types::targeting::SelectorSpec;

    fn stats() -> StatBlock {
        StatBlock::default()
    }

    #[test]
    fn nearest_picks_smallest_distance() {
        let s = stats();
        let candidates = vec![
            Candidate { id: UnitId::new(1), pos: HexCoord::new(5, 0), hp: 100.0, effective_stats: &s },
            Candidate { id: UnitId::new(2), pos: HexCoord::new(1, 0), hp: 100.0, effective_stats: &s },
        ];
        let mut rng = BattleRng::new(1);
        let picked = select_target(
            &SelectorSpec::new(SelectorKind::Nearest),
            HexCoord::new(0, 0),
            HexCoord::new(0, 0),
            &candidates,
            None,
            &mut rng,
        );
        assert_eq!(picked, Some(UnitId::new(2)));
    }

    #[test]
    fn ties_broken_by_stable_id() {
        let s = stats();
        let candidates = vec![
            Candidate { id: UnitId::new(5), pos: HexCoord::new(1, 0), hp: 100.0, effective_stats: &s },
            Candidate { id: UnitId::new(2), pos: HexCoord::new(-1, 0), hp: 100.0, effective_stats: &s },
        ];
        let mut rng = BattleRng::new(1);
        let picked = select_target(
            &SelectorSpec::new(SelectorKind::Nearest),
            HexCoord::new(0, 0),
            HexCoord::new(0, 0),
            &candidates,
            None,
            &mut rng,
        );
        assert_eq!(picked, Some(UnitId::new(2)));
    }

    #[test]
    fn max_range_filters_pool() {
        let s = stats();
        let candidates = vec![Candidate { id: UnitId::new(1), pos: HexCoord::new(10, 0), hp: 100.0, effective_stats: &s }];
        let mut rng = BattleRng::new(1);
        let picked = select_target(
            &SelectorSpec::with_range(SelectorKind::Nearest, 3),
            HexCoord::new(0, 0),
            HexCoord::new(0, 0),
            &candidates,
            None,
            &mut rng,
        );
        assert_eq!(picked, None);
    }

    #[test]
    fn current_target_sticks_if_still_in_pool() {
        let s = stats();
        let candidates = vec![
            Candidate { id: UnitId::new(1), pos: HexCoord::new(1, 0), hp: 100.0, effective_stats: &s },
            Candidate { id: UnitId::new(2), pos: HexCoord::new(2, 0), hp: 100.0, effective_stats: &s },
        ];
        let mut rng = BattleRng::new(1);
        let picked = select_target(
            &SelectorSpec::new(SelectorKind::CurrentTarget),
            HexCoord::new(0, 0),
            HexCoord::new(0, 0),
            &candidates,
            Some(UnitId::new(2)),
            &mut rng,
        );
        assert_eq!(picked, Some(UnitId::new(2)));
    }

    #[test]
    fn lowest_hp_percent_prefers_lower_ratio() {
        let mut low = StatBlock::default();
        low.max_hp = 1000.0;
        let high = stats();
        let candidates = vec![
            Candidate { id: UnitId::new(1), pos: HexCoord::new(1, 0), hp: 500.0, effective_stats: &low },
            Candidate { id: UnitId::new(2), pos: HexCoord::new(1, 0), hp: 0.9, effective_stats: &high },
        ];
        let mut rng = BattleRng::new(1);
        let picked = select_target(
            &SelectorSpec::new(SelectorKind::LowestHpPercent),
            HexCoord::new(0, 0),
            HexCoord::new(0, 0),
            &candidates,
            None,
            &mut rng,
        );
        assert_eq!(picked, Some(UnitId::new(2)));
    }
}
