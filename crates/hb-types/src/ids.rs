//! Arena-index id types for every entity the engine tracks.
//!
//! Units, projectiles, buffs, and abilities are never referenced by pointer —
//! only by one of these newtypes, resolved through the owning arena at use
//! time (see the engine aggregate in `hb_engine::simulation`).

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

define_id!(
    /// Stable id of a unit, assigned in insertion order at `add_unit` time.
    UnitId
);

define_id!(
    /// Id of an in-flight projectile, assigned in spawn order.
    ProjectileId
);

define_id!(
    /// Id of an active buff instance on some unit.
    BuffId
);

define_id!(
    /// Id of a persistent zone created by `create_zone`.
    ZoneId
);

/// Non-owning reference to a unit that may have died or never existed.
///
/// Used for combat targets, projectile sources/targets, and buff sources:
/// the id remains valid to look up (a dead unit keeps its arena slot), but
/// resolving it can still fail if the id was never assigned by this
/// simulation.
pub type WeakUnitRef = UnitId;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_compare_by_value() {
        assert_eq!(UnitId::new(3), UnitId::new(3));
        assert_ne!(UnitId::new(3), UnitId::new(4));
        assert!(UnitId::new(1) < UnitId::new(2));
    }

    #[test]
    fn id_index_matches_raw() {
        assert_eq!(UnitId::new(7).index(), 7usize);
    }

    #[test]
    fn display_includes_type_name() {
        assert_eq!(format!("{}", UnitId::new(5)), "UnitId#5");
    }
}
