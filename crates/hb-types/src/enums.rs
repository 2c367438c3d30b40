//! Shared small enums used across the data model and the pipeline.

use serde::{Deserialize, Serialize};

/// Which side of the board a unit fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Blue,
    Red,
}

impl Team {
    pub const fn index(self) -> usize {
        match self {
            Team::Blue => 0,
            Team::Red => 1,
        }
    }

    pub const fn opponent(self) -> Self {
        match self {
            Team::Blue => Team::Red,
            Team::Red => Team::Blue,
        }
    }
}

/// Star level — unit power tier, applies multipliers to HP/damage and
/// selects the per-star entry of effect value arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum StarLevel {
    One = 1,
    Two = 2,
    Three = 3,
}

impl StarLevel {
    pub const fn index(self) -> usize {
        self as usize - 1
    }
}

/// Damage typing for the mitigation step of the damage pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    Physical,
    Magical,
    True,
}

/// Numeric stats that carry flat/percent modifiers and clamped effective
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    MaxHp,
    Ad,
    Ap,
    Armor,
    MagicResist,
    AttackSpeed,
    CritChance,
    CritDamage,
    DodgeChance,
    Lifesteal,
    Omnivamp,
    MaxMana,
    AttackRange,
}

impl StatKind {
    /// Clamp bounds for this stat's effective value.
    pub const fn clamp_range(self) -> (f64, f64) {
        match self {
            StatKind::AttackSpeed => (0.2, 5.0),
            StatKind::CritChance | StatKind::DodgeChance => (0.0, 1.0),
            _ => (0.0, f64::MAX),
        }
    }
}

/// Scaling key for an effect's numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingKey {
    Ad,
    Ap,
    Armor,
    MagicResist,
    MaxHp,
    MissingHp,
    CasterHp,
}

/// Ability delivery mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryKind {
    Instant,
    Projectile,
    Area,
}

/// Area-of-effect shape for `DeliveryKind::Area` and AoE projectile impact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum AoeShape {
    Circle { radius: u32 },
    Cone { range: u32, half_angle_deg: f64 },
    Line { length: u32, width: u32 },
}

/// Who an ability / AoE / effect can affect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Affiliation {
    Enemies,
    Allies,
    All,
}

/// How a re-applied buff/debuff combines with an existing one of the same
/// identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackingPolicy {
    /// Reject the new application outright if one is already active.
    None,
    /// Replace duration and magnitude with the new application's values.
    Refresh,
    /// Take the max of durations and magnitudes: shred/sunder refresh on
    /// re-apply by taking the max value, never summing.
    Intensify,
    /// Keep both as independent stacks.
    MultiStack,
}

/// The phases a `Casting` unit moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastPhase {
    CastStart,
    EffectPoint,
    CastEnd,
}

/// Crowd-control and damage-over-time debuff identities tracked on a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebuffKind {
    Burn,
    Wound,
    Slow,
    Chill,
    Silence,
    Disarm,
    ArmorShred,
    MrShred,
    Stun,
    Taunt,
    ManaReave,
}

impl DebuffKind {
    /// Shred-family debuffs use "take the max, never sum" semantics;
    /// everything else just refreshes.
    pub const fn is_intensify_by_default(self) -> bool {
        matches!(self, DebuffKind::ArmorShred | DebuffKind::MrShred | DebuffKind::Burn)
    }
}
