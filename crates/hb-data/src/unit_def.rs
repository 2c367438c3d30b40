//! Unit definitions: base stats, attack range, default ability id, default
//! target selector, trait tags, class tag.

use std::collections::HashMap;
use std::sync::OnceLock;

use hb_types::targeting::SelectorSpec;
use hb_types::unit::StatBlock;

/// A reference unit definition shared by every copy of that unit placed on
/// the board. `hb_engine::simulation` clones `base_stats` into a fresh
/// `Unit` at spawn time.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDef {
    pub id: String,
    pub name: String,
    pub base_stats: StatBlock,
    pub default_ability_id: String,
    pub default_selector: SelectorSpec,
    pub trait_tags: Vec<String>,
    pub class_tag: String,
}

fn registry() -> &'static HashMap<String, UnitDef> {
    static REGISTRY: OnceLock<HashMap<String, UnitDef>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        sample_units()
            .into_iter()
            .map(|def| (def.id.clone(), def))
            .collect()
    })
}

/// Look up a unit definition by id. Returns `None` for unknown ids, which
/// callers surface as `ConfigError::MissingAbility`-style errors at
/// `add_unit` time.
pub fn get_unit_def(id: &str) -> Option<&'static UnitDef> {
    registry().get(id)
}

/// A small built-in roster usable by tests, scenario fixtures, and the CLI
/// without requiring an external loader.
fn sample_units() -> Vec<UnitDef> {
    use hb_types::targeting::SelectorKind;

    vec![
        UnitDef {
            id: "brawler".into(),
            name: "Brawler".into(),
            base_stats: StatBlock {
                max_hp: 900.0,
                ad: 60.0,
                ap: 0.0,
                armor: 30.0,
                magic_resist: 30.0,
                attack_speed: 0.7,
                crit_chance: 0.25,
                crit_damage: 0.5,
                dodge_chance: 0.0,
                lifesteal: 0.0,
                omnivamp: 0.0,
                max_mana: 0.0,
                attack_range: 1.0,
            },
            default_ability_id: "none".into(),
            default_selector: SelectorSpec::new(SelectorKind::Nearest),
            trait_tags: vec!["brawler".into()],
            class_tag: "fighter".into(),
        },
        UnitDef {
            id: "marksman".into(),
            name: "Marksman".into(),
            base_stats: StatBlock {
                max_hp: 650.0,
                ad: 55.0,
                ap: 0.0,
                armor: 15.0,
                magic_resist: 20.0,
                attack_speed: 0.9,
                crit_chance: 0.25,
                crit_damage: 0.5,
                dodge_chance: 0.0,
                lifesteal: 0.0,
                omnivamp: 0.0,
                max_mana: 100.0,
                attack_range: 4.0,
            },
            default_ability_id: "piercing_bolt".into(),
            default_selector: SelectorSpec::new(SelectorKind::Farthest),
            trait_tags: vec!["marksman".into()],
            class_tag: "ranger".into(),
        },
        UnitDef {
            id: "pyromancer".into(),
            name: "Pyromancer".into(),
            base_stats: StatBlock {
                max_hp: 600.0,
                ad: 0.0,
                ap: 80.0,
                armor: 15.0,
                magic_resist: 20.0,
                attack_speed: 0.65,
                crit_chance: 0.25,
                crit_damage: 0.5,
                dodge_chance: 0.0,
                lifesteal: 0.0,
                omnivamp: 0.0,
                max_mana: 100.0,
                attack_range: 3.0,
            },
            default_ability_id: "fireball".into(),
            default_selector: SelectorSpec::new(SelectorKind::Cluster { radius: 1 }),
            trait_tags: vec!["pyromancer".into()],
            class_tag: "caster".into(),
        },
    ]
}
