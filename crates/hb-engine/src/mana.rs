//! Mana gain and cast-entry bookkeeping.
//!
//! Small free functions over value structs, each doing one gain source,
//! with a dedicated test per source.

use hb_data::config::ManaFormulaParams;

/// Mana gained from landing an auto-attack.
pub fn attack_mana_gain(base: f64, class_multiplier: f64) -> f64 {
    base * class_multiplier
}

/// Mana gained from taking damage, suppressed by the caller while the
/// defender is Casting (the mana lock).
pub fn damage_taken_mana_gain(params: &ManaFormulaParams, raw_damage: f64, mitigated_damage: f64) -> f64 {
    params.gain_from_damage(raw_damage, mitigated_damage)
}

/// Passive regen divided across ticks.
pub fn passive_regen_per_tick(mana_per_second: f64, tick_rate: u32) -> f64 {
    mana_per_second / tick_rate as f64
}

/// Applies a gain, clamping the result to `max_mana` unconditionally.
/// Overflow above `max_mana` is handled separately by the caller at
/// `cast_end` via `mana_after_cast_end`, which also needs to flip
/// `UnitState`.
pub fn apply_gain(current_mana: f64, max_mana: f64, gain: f64) -> f64 {
    (current_mana + gain).min(max_mana)
}

/// Mana left at a `cast_end` boundary: zero unless overflow is enabled, in
/// which case any amount above `max_mana` carries over.
pub fn mana_after_cast_end(mana_at_entry: f64, max_mana: f64, overflow: bool) -> f64 {
    if overflow {
        (mana_at_entry - max_mana).max(0.0)
    } else {
        0.0
    }
}
