//! Target-selector identities. The *policies* are data; the functions that
//! apply them over a live candidate pool live in `hb_engine::targeting`.

use serde::{Deserialize, Serialize};

use crate::enums::StatKind;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum SelectorKind {
    Nearest,
    Farthest,
    LowestHpPercent,
    LowestHpFlat,
    HighestStat { stat: StatKind },
    Cluster { radius: u32 },
    Random,
    Frontline,
    Backline,
    CurrentTarget,
}

/// A selector policy plus its optional range cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectorSpec {
    pub kind: SelectorKind,
    pub max_range: Option<u32>,
}

impl SelectorSpec {
    pub const fn new(kind: SelectorKind) -> Self {
        Self { kind, max_range: None }
    }

    pub const fn with_range(kind: SelectorKind, max_range: u32) -> Self {
        Self { kind, max_range: Some(max_range) }
    }
}
