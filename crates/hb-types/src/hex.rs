//! Axial hex coordinates, distance, neighbours, and the circle/cone/line
//! hex-set generators ability AoE shapes build on.

use serde::{Deserialize, Serialize};

/// Axial hex coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Hex distance: `(|dq| + |dr| + |dq+dr|)/2`.
    pub fn distance(self, other: Self) -> u32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        ((dq.unsigned_abs() + dr.unsigned_abs() + (dq + dr).unsigned_abs()) / 2) as u32
    }

    pub fn neighbor(self, dir: HexDirection) -> Self {
        let (dq, dr) = dir.offset();
        Self::new(self.q + dq, self.r + dr)
    }

    pub fn neighbors(self) -> [Self; 6] {
        HexDirection::ALL.map(|dir| self.neighbor(dir))
    }

    /// Hex-space vector toward `other`, as a fractional (q, r) pair.
    pub fn direction_to(self, other: Self) -> (f64, f64) {
        let dq = (other.q - self.q) as f64;
        let dr = (other.r - self.r) as f64;
        let len = (dq * dq + dr * dr + (dq + dr) * (dq + dr)).sqrt().max(f64::EPSILON);
        (dq / len, dr / len)
    }

    pub fn key(self) -> (i32, i32) {
        (self.q, self.r)
    }
}

impl std::fmt::Display for HexCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.q, self.r)
    }
}

/// Hex direction (flat-top orientation, matching `HexCoord::neighbor`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HexDirection {
    NE,
    E,
    SE,
    SW,
    W,
    NW,
}

impl HexDirection {
    pub const ALL: [Self; 6] = [Self::NE, Self::E, Self::SE, Self::SW, Self::W, Self::NW];

    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::NE => (1, -1),
            Self::E => (1, 0),
            Self::SE => (0, 1),
            Self::SW => (-1, 1),
            Self::W => (-1, 0),
            Self::NW => (0, -1),
        }
    }
}

/// The fractional position of an in-flight projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractionalHex {
    pub q: f64,
    pub r: f64,
}

impl FractionalHex {
    pub fn from_hex(h: HexCoord) -> Self {
        Self { q: h.q as f64, r: h.r as f64 }
    }

    /// Round to the nearest `HexCoord`, via cube-coordinate rounding.
    pub fn round(self) -> HexCoord {
        let s = -self.q - self.r;
        let mut rq = self.q.round();
        let mut rr = self.r.round();
        let rs = s.round();

        let q_diff = (rq - self.q).abs();
        let r_diff = (rr - self.r).abs();
        let s_diff = (rs - s).abs();

        if q_diff > r_diff && q_diff > s_diff {
            rq = -rr - rs;
        } else if r_diff > s_diff {
            rr = -rq - rs;
        }
        HexCoord::new(rq as i32, rr as i32)
    }

    pub fn distance_to(self, target: FractionalHex) -> f64 {
        let dq = self.q - target.q;
        let dr = self.r - target.r;
        (dq.abs() + dr.abs() + (dq + dr).abs()) / 2.0
    }

    /// Step `amount` hexes (fractional) toward `target`.
    pub fn step_toward(self, target: FractionalHex, amount: f64) -> Self {
        let dist = self.distance_to(target);
        if dist <= amount || dist < f64::EPSILON {
            return target;
        }
        let t = amount / dist;
        Self {
            q: self.q + (target.q - self.q) * t,
            r: self.r + (target.r - self.r) * t,
        }
    }
}

/// All hexes within `radius` of `center` (distance ≤ radius), `center` included.
pub fn hex_circle(center: HexCoord, radius: u32) -> Vec<HexCoord> {
    let radius = radius as i32;
    let mut out = Vec::new();
    for dq in -radius..=radius {
        let r_lo = (-radius).max(-dq - radius);
        let r_hi = radius.min(-dq + radius);
        for dr in r_lo..=r_hi {
            out.push(HexCoord::new(center.q + dq, center.r + dr));
        }
    }
    out
}

/// Hexes within `range` of `origin` whose angle from the `origin → axis`
/// direction is within `half_angle_deg` of it.
pub fn hex_cone(origin: HexCoord, axis: HexCoord, range: u32, half_angle_deg: f64) -> Vec<HexCoord> {
    if origin == axis {
        return hex_circle(origin, range);
    }
    let (axis_dq, axis_dr) = origin.direction_to(axis);
    let axis_angle = axial_angle(axis_dq, axis_dr);
    let half_angle_rad = half_angle_deg.to_radians();

    hex_circle(origin, range)
        .into_iter()
        .filter(|&hex| {
            if hex == origin {
                return true;
            }
            let (dq, dr) = origin.direction_to(hex);
            let angle = axial_angle(dq, dr);
            angular_diff(axis_angle, angle) <= half_angle_rad
        })
        .collect()
}

/// Thick rasterised line from `origin` to `end`, `width` hexes wide.
/// Width 0/1 is a single-hex-wide line.
pub fn hex_line(origin: HexCoord, end: HexCoord, width: u32) -> Vec<HexCoord> {
    let n = origin.distance(end).max(1);
    let origin_f = FractionalHex::from_hex(origin);
    let end_f = FractionalHex::from_hex(end);

    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();

    for i in 0..=n {
        let t = i as f64 / n as f64;
        let lerp = FractionalHex {
            q: origin_f.q + (end_f.q - origin_f.q) * t,
            r: origin_f.r + (end_f.r - origin_f.r) * t,
        };
        let center = lerp.round();
        for hex in hex_circle(center, width / 2) {
            if seen.insert(hex.key()) {
                out.push(hex);
            }
        }
        if seen.insert(center.key()) {
            out.push(center);
        }
    }
    out
}

fn axial_angle(dq: f64, dr: f64) -> f64 {
    // Convert axial direction to a pointy-ish planar angle for comparison.
    let x = dq + dr * 0.5;
    let y = dr * (3.0f64).sqrt() * 0.5;
    y.atan2(x)
}

fn angular_diff(a: f64, b: f64) -> f64 {
    let two_pi = std::f64::consts::TAU;
    let mut diff = (a - b) % two_pi;
    if diff > std::f64::consts::PI {
        diff -= two_pi;
    } else if diff < -std::f64::consts::PI {
        diff += two_pi;
    }
    diff.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_distance() {
        let a = HexCoord::new(0, 0);
        let b = HexCoord::new(2, -1);
        assert_eq!(a.distance(b), 2);
    }

    #[test]
    fn hex_neighbor_offsets() {
        let origin = HexCoord::new(0, 0);
        assert_eq!(origin.neighbor(HexDirection::E), HexCoord::new(1, 0));
        assert_eq!(origin.neighbor(HexDirection::NE), HexCoord::new(1, -1));
        assert_eq!(origin.neighbor(HexDirection::SW), HexCoord::new(-1, 1));
    }

    #[test]
    fn all_neighbors_are_distance_one() {
        let origin = HexCoord::new(0, 0);
        for n in origin.neighbors() {
            assert_eq!(origin.distance(n), 1);
        }
    }

    #[test]
    fn circle_radius_zero_is_just_center() {
        let circle = hex_circle(HexCoord::new(0, 0), 0);
        assert_eq!(circle, vec![HexCoord::new(0, 0)]);
    }

    #[test]
    fn circle_radius_one_has_seven_hexes() {
        let circle = hex_circle(HexCoord::new(2, -3), 1);
        assert_eq!(circle.len(), 7);
        for hex in circle {
            assert!(HexCoord::new(2, -3).distance(hex) <= 1);
        }
    }

    #[test]
    fn circle_radius_two_has_nineteen_hexes() {
        let circle = hex_circle(HexCoord::new(0, 0), 2);
        assert_eq!(circle.len(), 19);
    }

    #[test]
    fn cone_contains_axis_direction() {
        let origin = HexCoord::new(0, 0);
        let axis = HexCoord::new(3, 0);
        let cone = hex_cone(origin, axis, 3, 45.0);
        assert!(cone.contains(&HexCoord::new(2, 0)));
    }

    #[test]
    fn cone_excludes_opposite_direction() {
        let origin = HexCoord::new(0, 0);
        let axis = HexCoord::new(3, 0);
        let cone = hex_cone(origin, axis, 3, 30.0);
        assert!(!cone.contains(&HexCoord::new(-3, 0)));
    }

    #[test]
    fn line_includes_endpoints() {
        let line = hex_line(HexCoord::new(0, 0), HexCoord::new(4, 0), 0);
        assert!(line.contains(&HexCoord::new(0, 0)));
        assert!(line.contains(&HexCoord::new(4, 0)));
    }

    #[test]
    fn fractional_hex_rounds_to_nearest() {
        let f = FractionalHex { q: 1.2, r: -0.4 };
        let rounded = f.round();
        assert_eq!(rounded, HexCoord::new(1, 0));
    }

    #[test]
    fn step_toward_stops_at_target_when_close() {
        let start = FractionalHex::from_hex(HexCoord::new(0, 0));
        let target = FractionalHex::from_hex(HexCoord::new(1, 0));
        let stepped = start.step_toward(target, 5.0);
        assert_eq!(stepped.round(), HexCoord::new(1, 0));
    }
}
