//! Engine-wide tunable defaults: tick rate, grid dimensions, mana formula
//! parameters, crit damage, cast-time defaults.

use serde::{Deserialize, Serialize};

/// Mana-on-damage formula parameters.
///
/// `gain = min(cap, raw * pre_pct + mitigated * post_pct)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManaFormulaParams {
    pub pre_pct: f64,
    pub post_pct: f64,
    pub cap: f64,
    /// Flat mana gained on landing an auto-attack, before `class_multiplier`.
    pub attack_mana_base: f64,
}

impl Default for ManaFormulaParams {
    fn default() -> Self {
        Self {
            pre_pct: 0.01,
            post_pct: 0.03,
            cap: 42.5,
            attack_mana_base: 10.0,
        }
    }
}

impl ManaFormulaParams {
    pub fn gain_from_damage(&self, raw: f64, mitigated: f64) -> f64 {
        (raw * self.pre_pct + mitigated * self.post_pct).min(self.cap)
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub tick_rate: u32,
    pub grid_width: u32,
    pub grid_height: u32,
    pub mana_formula: ManaFormulaParams,
    pub default_crit_damage: f64,
    /// Cast-time default per star, used when an `AbilityDef` omits one.
    pub default_cast_time_ticks: [u32; 3],
    pub max_ticks: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_rate: 30,
            grid_width: 8,
            grid_height: 7,
            mana_formula: ManaFormulaParams::default(),
            default_crit_damage: 0.5,
            default_cast_time_ticks: [15, 15, 15],
            max_ticks: 3000,
        }
    }
}
