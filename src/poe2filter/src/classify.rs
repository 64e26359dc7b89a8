//! Setting keys, style names and groupings
//!
//! Every parsed base is governed by one show toggle in `filtersettings.txt`.
//! The toggle name is built from the base's category, file and tier; these
//! functions are pure so the same base always maps to the same key.

use std::path::Path;

use crate::items::{Item, ItemKind};
use crate::layout::Slot;

pub const LEVELING_MARTIAL_STYLE: &str = "Leveling Martial Weapon";
pub const CASTER_WEAPON_STYLE: &str = "Caster Weapon";

/// Style of end-game show blocks
pub fn endgame_style(tier: u8) -> String {
    format!("Endgame Tier {tier}")
}

/// Upper-case the first letter of every run of letters and lower-case the rest
///
/// `"ARMOUR_EVASION"` becomes `"Armour_Evasion"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or_default()
}

/// Leveling or end-game, with the resolved tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Leveling,
    Endgame { tier: u8 },
}

// ============================================================================
// Defense
// ============================================================================

/// Settings token of a defense file: `ArmourES.txt` is `ARMOUR_ES`
///
/// Only the hybrid stems are normalised; others are kept as written.
pub fn defense_token(path: &Path) -> String {
    let stem = file_stem(path);
    match stem.to_ascii_lowercase().as_str() {
        "armoures" => "ARMOUR_ES".to_string(),
        "armourevasion" => "ARMOUR_EVASION".to_string(),
        "evasiones" => "EVASION_ES".to_string(),
        _ => stem.to_string(),
    }
}

/// Stem of the file holding the declared tiers for a defense token
pub fn tier_source_stem(token: &str) -> String {
    let stem = match token.to_ascii_uppercase().as_str() {
        "ARMOUR_EVASION" => "ArmourEvasion",
        "ARMOUR_ES" => "ArmourES",
        "EVASION_ES" => "EvasionES",
        "ARMOUR" | "ARMOUR_SHIELD" => "Armour",
        "EVASION" | "EVASION_SHIELD" => "Evasion",
        "ES" | "ES_SHIELD" => "ES",
        _ => return token.to_string(),
    };
    stem.to_string()
}

/// Human readable defense type: `Armour`, `ES`, `Armour ES`, `Armour Evasion`
pub fn defense_display_name(token: &str) -> String {
    if token.eq_ignore_ascii_case("ES") {
        return "ES".to_string();
    }
    if token.contains('_') {
        return token
            .split('_')
            .map(|part| {
                if part == "ES" {
                    part.to_string()
                } else {
                    title_case(part)
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
    }
    title_case(token)
}

fn shield_type(token: &str) -> &str {
    match token {
        "ARMOUR" | "EVASION" | "ARMOUR_EVASION" | "ARMOUR_ES" => token,
        _ => "ARMOUR",
    }
}

/// Show toggle governing a defense base
pub fn defense_setting_key(slot: Slot, token: &str, stage: Stage) -> String {
    let token = token.to_ascii_uppercase();
    match (slot, stage) {
        (Slot::Shields, Stage::Endgame { tier }) => {
            format!("SHOW_ENDGAME_T{tier}_{}_SHIELD", shield_type(&token))
        }
        (Slot::Shields, Stage::Leveling) => format!("SHOW_LEVELING_{token}_SHIELD"),
        (Slot::Foci, Stage::Endgame { tier }) => format!("SHOW_ENDGAME_T{tier}_FOCI"),
        (Slot::Foci, Stage::Leveling) => "SHOW_LEVELING_FOCI".to_string(),
        (_, Stage::Endgame { tier }) => format!("SHOW_ENDGAME_T{tier}_{token}"),
        (_, Stage::Leveling) => format!("SHOW_LEVELING_{token}"),
    }
}

/// Style of a shown defense base
pub fn defense_style(slot: Slot, token: &str, stage: Stage) -> String {
    match (slot, stage) {
        (_, Stage::Endgame { tier }) => endgame_style(tier),
        (Slot::Foci, Stage::Leveling) => CASTER_WEAPON_STYLE.to_string(),
        (_, Stage::Leveling) => format!("Leveling {}", defense_display_name(token)),
    }
}

// ============================================================================
// Martial weapons
// ============================================================================

/// Weapon type token from the file stem: `One Hand Swords.txt` is `ONE_HAND_SWORDS`
pub fn weapon_type(path: &Path) -> String {
    let stem = file_stem(path).to_uppercase().replace(' ', "_");
    if stem.contains("ONEHANDMACES") {
        "ONE_HAND_MACES".to_string()
    } else if stem.contains("TWOHANDMACES") {
        "TWO_HAND_MACES".to_string()
    } else {
        stem
    }
}

/// Bucket a martial weapon is shown in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WeaponGroup {
    Endgame { tier: u8, weapon_type: String },
    /// `max_level` is only known for `min-max` area levels
    Leveling {
        weapon_type: String,
        max_level: Option<u32>,
    },
}

impl WeaponGroup {
    /// Group of a martial weapon; end-game bases without a declared tier have none
    pub fn classify(item: &Item) -> Option<Self> {
        let stats = item.weapon_stats()?;
        let weapon_type = weapon_type(item.base.source());
        let area_level = &item.base.area_level;

        if area_level.is_open_ended() {
            Some(Self::Endgame {
                tier: stats.tier?,
                weapon_type,
            })
        } else {
            Some(Self::Leveling {
                weapon_type,
                max_level: area_level.max(),
            })
        }
    }

    pub fn weapon_type(&self) -> &str {
        match self {
            Self::Endgame { weapon_type, .. } | Self::Leveling { weapon_type, .. } => weapon_type,
        }
    }

    pub fn setting_key(&self) -> String {
        match self {
            Self::Endgame { tier, weapon_type } => format!("SHOW_ENDGAME_T{tier}_{weapon_type}"),
            Self::Leveling { weapon_type, .. } => format!("SHOW_LEVELING_{weapon_type}"),
        }
    }

    pub fn style(&self) -> String {
        match self {
            Self::Endgame { tier, .. } => endgame_style(*tier),
            Self::Leveling { .. } => LEVELING_MARTIAL_STYLE.to_string(),
        }
    }
}

// ============================================================================
// Skill weapons
// ============================================================================

const PURITY_SCEPTRE: &str = "Shrine Sceptre";
const PURITY_SKILL: &str = "Purity";

/// Skill weapon class, from the file path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkillClass {
    Wands,
    Staves,
    Sceptres,
}

impl SkillClass {
    pub fn from_path(path: &Path) -> Option<Self> {
        let path = path.to_string_lossy().to_lowercase();
        if path.contains("wands") {
            Some(Self::Wands)
        } else if path.contains("staves") {
            Some(Self::Staves)
        } else if path.contains("sceptres") {
            Some(Self::Sceptres)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Wands => "WANDS",
            Self::Staves => "STAVES",
            Self::Sceptres => "SCEPTRES",
        }
    }
}

/// Skill weapons sharing a class and granted skill
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SkillGroup {
    pub class: SkillClass,
    pub skill: String,
}

impl SkillGroup {
    /// Group of a skill weapon; files outside the known classes have none
    pub fn classify(item: &Item) -> Option<Self> {
        let ItemKind::SkillWeapon { granted_skill, .. } = &item.kind else {
            return None;
        };
        let class = SkillClass::from_path(item.base.source())?;

        // All purity sceptres share one toggle regardless of element
        if item.name() == PURITY_SCEPTRE && granted_skill.contains(PURITY_SKILL) {
            return Some(Self {
                class: SkillClass::Sceptres,
                skill: PURITY_SKILL.to_string(),
            });
        }

        Some(Self {
            class,
            skill: granted_skill.clone(),
        })
    }

    /// `SHOW_RAISE_ZOMBIE_WANDS`
    pub fn setting_key(&self) -> String {
        format!(
            "SHOW_{}_{}",
            self.skill.to_uppercase().replace(' ', "_"),
            self.class.label()
        )
    }

    /// Header shared by the show and hide blocks of the group
    pub fn header(&self) -> String {
        format!("# {} - {}", self.class.label(), self.skill)
    }
}

// ============================================================================
// Quivers
// ============================================================================

/// Implicit effect fragments and their toggles; the first match wins
const QUIVER_KEYS: &[(&[&str], &str)] = &[
    (&["Physical Damage"], "SHOW_PHYSICAL_DAMAGE_QUIVER"),
    (&["Fire damage", "Fire Damage"], "SHOW_FIRE_DAMAGE_QUIVER"),
    (&["Life"], "SHOW_LIFE_ON_HIT_QUIVER"),
    (&["Accuracy"], "SHOW_ACCURACY_QUIVER"),
    (&["Stun Threshold"], "SHOW_STUN_THRESHOLD_QUIVER"),
    (&["Poison"], "SHOW_POISON_CHANCE_QUIVER"),
    (&["Bleeding"], "SHOW_BLEED_CHANCE_QUIVER"),
    (&["Attack Speed"], "SHOW_ATTACK_SPEED_QUIVER"),
    (&["Pierce"], "SHOW_PIERCE_QUIVER"),
    (&["Arrow Speed"], "SHOW_ARROW_SPEED_QUIVER"),
    (&["Critical"], "SHOW_CRIT_CHANCE_QUIVER"),
];

/// Toggle of a quiver, decided by its implicit effect
pub fn quiver_setting_key(effect: &str) -> Option<&'static str> {
    QUIVER_KEYS
        .iter()
        .find(|(fragments, _)| fragments.iter().any(|f| effect.contains(f)))
        .map(|(_, key)| *key)
}

// ============================================================================
// Grouping
// ============================================================================

/// Values grouped by key, groups kept in first-seen order
#[derive(Debug, Clone)]
pub struct Groups<K, V> {
    entries: Vec<(K, Vec<V>)>,
}

impl<K: PartialEq, V> Groups<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, key: K, value: V) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

impl<K: PartialEq, V> Default for Groups<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
