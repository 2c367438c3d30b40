//! The projectile manager.

use hb_types::ability::ProjectileParams;
use hb_types::effect::EffectDescriptor;
use hb_types::ids::{ProjectileId, UnitId};
use hb_types::HexCoord;

/// One in-flight projectile. Keyed by insertion order (`ProjectileId`) for
/// deterministic resolution when several resolve on the same tick.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: ProjectileId,
    pub source: UnitId,
    pub target: UnitId,
    pub params: ProjectileParams,
    pub effects: Vec<EffectDescriptor>,
    pub star_index: usize,
    /// Current fractional position.
    pub pos_q: f64,
    pub pos_r: f64,
    /// Fixed launch-time destination for non-homing projectiles.
    pub fixed_destination: HexCoord,
}

pub enum ProjectileOutcome {
    StillFlying,
    /// Arrived at its destination hex; carries the hex to resolve against.
    Arrived(HexCoord),
    /// Target died mid-flight and `can_miss` is set — discard with no effect.
    Missed,
}

impl Projectile {
    pub fn pos(&self) -> HexCoord {
        HexCoord::new(self.pos_q.round() as i32, self.pos_r.round() as i32)
    }

    /// Advances one tick toward its (re-)computed destination. `target_pos`
    /// is `None` once the target has died; homing
    /// projectiles then continue straight toward their last-known hex.
    pub fn advance(&mut self, target_pos: Option<HexCoord>, target_alive: bool) -> ProjectileOutcome {
        if !target_alive && self.params.can_miss {
            return ProjectileOutcome::Missed;
        }

        let destination = if self.params.homing {
            target_pos.unwrap_or(self.fixed_destination)
        } else {
            self.fixed_destination
        };

        let current = HexCoord::new(self.pos_q.round() as i32, self.pos_r.round() as i32);
        let remaining = current.distance(destination) as f64;

        if remaining < self.params.speed_hexes_per_tick || remaining == 0.0 {
            self.pos_q = destination.q as f64;
            self.pos_r = destination.r as f64;
            return ProjectileOutcome::Arrived(destination);
        }

        let (dq, dr) = current.direction_to(destination);
        self.pos_q += dq * self.params.speed_hexes_per_tick;
        self.pos_r += dr * self.params.speed_hexes_per_tick;
        ProjectileOutcome::StillFlying
    }
}
