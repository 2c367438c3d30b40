//! A* pathfinding over the hex grid.
//!
//! Movement cost is 1 per hex; the heuristic is hex distance, which is
//! admissible since it's a lower bound on the true hex-step cost. The
//! engine calls [`next_step`] once per moving unit per tick rather than
//! planning a whole route up front, so occupancy changes are picked up
//! immediately — the `BinaryHeap`-driven search itself follows the
//! min-heap-via-`Reverse`-ordering idiom used for event queues elsewhere in
//! this codebase.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use hb_types::HexCoord;

use crate::grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frontier {
    hex: HexCoord,
    f_score: u32,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` (a max-heap) pops the smallest f_score.
        other.f_score.cmp(&self.f_score)
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Finds the full shortest path from `start` to `goal`. Occupied hexes are
/// impassable except `start` and `goal` themselves. Returns `None` if no
/// path exists.
pub fn shortest_path(grid: &Grid, start: HexCoord, goal: HexCoord) -> Option<Vec<HexCoord>> {
    if start == goal {
        return Some(vec![start]);
    }

    let passable = |hex: HexCoord| hex == start || hex == goal || grid.is_free(hex);

    let mut open = BinaryHeap::new();
    open.push(Frontier { hex: start, f_score: start.distance(goal) });

    let mut came_from: HashMap<HexCoord, HexCoord> = HashMap::new();
    let mut g_score: HashMap<HexCoord, u32> = HashMap::new();
    g_score.insert(start, 0);

    while let Some(Frontier { hex: current, .. }) = open.pop() {
        if current == goal {
            return Some(reconstruct_path(&came_from, current));
        }

        let current_g = g_score[&current];
        for neighbor in current.neighbors() {
            if !grid.in_bounds(neighbor) || !passable(neighbor) {
                continue;
            }
            let tentative_g = current_g + 1;
            if tentative_g < *g_score.get(&neighbor).unwrap_or(&u32::MAX) {
                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative_g);
                open.push(Frontier {
                    hex: neighbor,
                    f_score: tentative_g + neighbor.distance(goal),
                });
            }
        }
    }

    None
}

fn reconstruct_path(came_from: &HashMap<HexCoord, HexCoord>, mut current: HexCoord) -> Vec<HexCoord> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Returns only the next hex to step into, re-derived fresh every call. The
/// engine calls it once per moving unit per tick, allowing reactive
/// re-routing when occupancy changes.
pub fn next_step(grid: &Grid, start: HexCoord, goal: HexCoord) -> Option<HexCoord> {
    let path = shortest_path(grid, start, goal)?;
    path.get(1).copied()
}

/// Picks the nearest walkable hex adjacent to `target` — the goal hex an
/// attacker paths toward.
pub fn nearest_adjacent_goal(grid: &Grid, from: HexCoord, target: HexCoord) -> Option<HexCoord> {
    target
        .neighbors()
        .into_iter()
        .filter(|&hex| grid.in_bounds(hex) && (grid.is_free(hex) || hex == from))
        .min_by_key(|&hex| from.distance(hex))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_line_path_has_no_detour() {
        let grid = Grid::new(8, 7);
        let start = HexCoord::new(0, 0);
        let goal = HexCoord::new(3, 0);
        let path = shortest_path(&grid, start, goal).unwrap();
        assert_eq!(path.first().copied(), Some(start));
        assert_eq!(path.last().copied(), Some(goal));
        assert_eq!(path.len() as u32 - 1, start.distance(goal));
    }

    #[test]
    fn next_step_advances_toward_goal() {
        let grid = Grid::new(8, 7);
        let start = HexCoord::new(0, 0);
        let goal = HexCoord::new(2, 0);
        let step = next_step(&grid, start, goal).unwrap();
        assert!(step.distance(goal) < start.distance(goal));
    }

    #[test]
    fn occupied_hex_is_routed_around() {
        use hb_types::UnitId;

        let mut grid = Grid::new(8, 7);
        let start = HexCoord::new(0, 0);
        let goal = HexCoord::new(2, 0);
        let blocker = HexCoord::new(1, 0);
        grid.place(blocker, UnitId::new(99));

        let path = shortest_path(&grid, start, goal).unwrap();
        assert!(!path.contains(&blocker));
    }

    #[test]
    fn unreachable_goal_returns_none() {
        use hb_types::UnitId;

        let mut grid = Grid::new(3, 3);
        let start = HexCoord::new(0, 0);
        let goal = HexCoord::new(0, 1);
        for (i, neighbor) in goal.neighbors().into_iter().enumerate() {
            if neighbor != start {
                grid.place(neighbor, UnitId::new(i as u32 + 1));
            }
        }
        assert!(shortest_path(&grid, start, goal).is_none());
    }
}
