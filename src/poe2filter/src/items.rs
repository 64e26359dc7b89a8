//! Item records built from the base reference files.
//!
//! Every base shares a [`BaseItem`] (name, area level, source file); the
//! category specific stats live in the [`ItemKind`] payload. Records are
//! validated once after parsing and are read-only afterwards.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::{Error, Result};

/// Name marker of top-tier end-game bases
pub const EXPERT_MARKER: &str = "Expert";

/// Name marker of second-tier end-game bases
pub const ADVANCED_MARKER: &str = "Advanced";

/// Area level specifier: `"10"`, `"1-4"` or `"63+"`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AreaLevel {
    raw: String,
    min: u32,
    max: Option<u32>,
    open_ended: bool,
}

impl AreaLevel {
    /// The specifier as written in the source file
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    /// Upper bound of a `min-max` range
    pub fn max(&self) -> Option<u32> {
        self.max
    }

    /// True for `min+` specifiers (end-game drops)
    pub fn is_open_ended(&self) -> bool {
        self.open_ended
    }
}

impl FromStr for AreaLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let spec = trimmed
            .strip_prefix("Area Level")
            .map(str::trim)
            .unwrap_or(trimmed);
        let invalid = || Error::InvalidAreaLevel(s.to_string());
        let number = |text: &str| text.trim().parse::<u32>().map_err(|_| invalid());

        let (min, max, open_ended) = if let Some(min) = spec.strip_suffix('+') {
            (number(min)?, None, true)
        } else if let Some((min, max)) = spec.split_once('-') {
            (number(min)?, Some(number(max)?), false)
        } else {
            (number(spec)?, None, false)
        };

        Ok(Self {
            raw: spec.to_string(),
            min,
            max,
            open_ended,
        })
    }
}

impl fmt::Display for AreaLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Fields shared by every base item
#[derive(Debug, Clone)]
pub struct BaseItem {
    pub name: String,
    pub area_level: AreaLevel,
    /// File the base was read from; its directory and stem decide the category
    pub source: PathBuf,
}

impl BaseItem {
    pub fn new(name: impl Into<String>, area_level: AreaLevel, source: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            area_level,
            source: source.into(),
        }
    }

    /// End-game bases carry the expert marker or an open-ended area level
    pub fn is_endgame(&self) -> bool {
        self.name.contains(EXPERT_MARKER) || self.area_level.is_open_ended()
    }

    pub fn is_advanced(&self) -> bool {
        self.name.contains(ADVANCED_MARKER)
    }

    pub fn min_area_level(&self) -> u32 {
        self.area_level.min()
    }

    /// Maximum drop level, never set for end-game bases
    pub fn max_area_level(&self) -> Option<u32> {
        if self.is_endgame() {
            None
        } else {
            self.area_level.max()
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Orders bases by their minimum area level
    pub fn cmp_by_area_level(&self, other: &Self) -> Ordering {
        self.min_area_level().cmp(&other.min_area_level())
    }
}

impl PartialEq for BaseItem {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.area_level.as_str() == other.area_level.as_str()
    }
}

impl Eq for BaseItem {}

impl Hash for BaseItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.area_level.as_str().hash(state);
    }
}

/// Armour, evasion and energy shield of a defense base
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefenseStats {
    pub armour: u32,
    pub evasion: u32,
    pub energy_shield: u32,
    /// Block chance in percent (shields)
    pub block_chance: Option<u32>,
}

impl DefenseStats {
    pub fn is_valid(&self) -> bool {
        self.armour > 0 || self.evasion > 0 || self.energy_shield > 0
    }
}

/// Stats of a martial weapon base
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeaponStats {
    pub physical_min: u32,
    pub physical_max: u32,
    pub crit_chance: f32,
    pub attacks_per_second: f32,
    pub weapon_range: f32,
    /// Declared `Tier n` of an end-game base
    pub tier: Option<u8>,
}

impl WeaponStats {
    pub fn is_valid(&self) -> bool {
        self.physical_max > 0 && self.crit_chance > 0.0 && self.attacks_per_second > 0.0
    }
}

/// Category specific payload of an item
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Defense(DefenseStats),
    Weapon(WeaponStats),
    Crossbow {
        weapon: WeaponStats,
        reload_time: f32,
    },
    /// Wands, staves and sceptres, identified by the skill they grant
    SkillWeapon {
        granted_skill: String,
        spirit: Option<u32>,
    },
    Quiver {
        implicit_effect: String,
    },
}

/// A parsed base item
#[derive(Debug, Clone)]
pub struct Item {
    pub base: BaseItem,
    pub kind: ItemKind,
}

impl Item {
    pub fn new(base: BaseItem, kind: ItemKind) -> Self {
        Self { base, kind }
    }

    pub fn name(&self) -> &str {
        &self.base.name
    }

    /// Check the invariants of the item's kind
    pub fn validate(&self) -> bool {
        if self.base.name.is_empty() || self.base.area_level.as_str().is_empty() {
            return false;
        }

        match &self.kind {
            ItemKind::Defense(stats) => stats.is_valid(),
            ItemKind::Weapon(weapon) => weapon.is_valid(),
            ItemKind::Crossbow {
                weapon,
                reload_time,
            } => weapon.is_valid() && *reload_time > 0.0,
            ItemKind::SkillWeapon { granted_skill, .. } => !granted_skill.is_empty(),
            ItemKind::Quiver { implicit_effect } => !implicit_effect.is_empty(),
        }
    }

    /// Weapon stats of martial weapons and crossbows
    pub fn weapon_stats(&self) -> Option<&WeaponStats> {
        match &self.kind {
            ItemKind::Weapon(weapon) | ItemKind::Crossbow { weapon, .. } => Some(weapon),
            _ => None,
        }
    }

    pub fn defense_stats(&self) -> Option<&DefenseStats> {
        match &self.kind {
            ItemKind::Defense(stats) => Some(stats),
            _ => None,
        }
    }
}
