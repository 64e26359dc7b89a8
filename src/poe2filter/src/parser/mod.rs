//! Base file parsers
//!
//! Every category of base file has its own line grammar. Each grammar is a
//! classifier turning one line into a named rule (`WeaponLine`, `SkillLine`,
//! `QuiverLine`, `DefenseLine`); the category parser then folds the
//! classified lines into validated [`Item`](crate::Item) records.
//!
//! Malformed numbers in a recognised field abort parsing with
//! [`Error::InvalidField`]; incomplete items are dropped silently.

pub mod defense;
pub mod quiver;
pub mod skill;
pub mod weapon;

use std::path::Path;
use std::str::FromStr;

use crate::items::AreaLevel;
use crate::{Error, Result};

pub use defense::{DefenseBlock, DefenseValues};

/// Field markers recognised in base files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    PhysicalDamage,
    CritChance,
    AttacksPerSecond,
    WeaponRange,
    ReloadTime,
    Armour,
    EvasionRating,
    EnergyShield,
    ChanceToBlock,
    Requires,
    Spirit,
    GrantsSkill,
}

impl Marker {
    /// Marker text including the trailing colon
    pub const fn text(self) -> &'static str {
        match self {
            Self::PhysicalDamage => "Physical Damage:",
            Self::CritChance => "Critical Hit Chance:",
            Self::AttacksPerSecond => "Attacks per Second:",
            Self::WeaponRange => "Weapon Range:",
            Self::ReloadTime => "Reload Time:",
            Self::Armour => "Armour:",
            Self::EvasionRating => "Evasion Rating:",
            Self::EnergyShield => "Energy Shield:",
            Self::ChanceToBlock => "Chance to Block:",
            Self::Requires => "Requires:",
            Self::Spirit => "Spirit:",
            Self::GrantsSkill => "Grants Skill:",
        }
    }

    /// Field name used in error messages
    pub fn field(self) -> &'static str {
        self.text().trim_end_matches(':')
    }

    /// Value after the first colon, if the line contains this marker
    pub fn value(self, line: &str) -> Option<&str> {
        if !line.contains(self.text()) {
            return None;
        }
        line.split_once(':').map(|(_, value)| value.trim())
    }
}

/// Split an item header `Name (Area Level 1-4)` into name and area level text
pub fn item_header(line: &str) -> Option<(&str, &str)> {
    let (name, rest) = line.split_once("(Area Level")?;
    let area_level = rest.split(')').next().unwrap_or_default().trim();
    Some((name.trim(), area_level))
}

/// Value of a `Tier n` line
pub fn tier_value(line: &str) -> Option<&str> {
    line.strip_prefix("Tier").map(str::trim)
}

/// Source file context for parse errors
#[derive(Debug, Clone, Copy)]
pub(crate) struct Source<'a> {
    path: &'a Path,
}

impl<'a> Source<'a> {
    pub(crate) fn new(path: &'a Path) -> Self {
        Self { path }
    }

    pub(crate) fn invalid(&self, line: usize, field: &'static str, value: &str) -> Error {
        Error::InvalidField {
            path: self.path.to_path_buf(),
            line,
            field,
            value: value.to_string(),
        }
    }

    /// Parse a numeric field value
    pub(crate) fn number<T: FromStr>(&self, line: usize, field: &'static str, value: &str) -> Result<T> {
        value
            .trim()
            .parse()
            .map_err(|_| self.invalid(line, field, value))
    }

    pub(crate) fn area_level(&self, line: usize, value: &str) -> Result<AreaLevel> {
        value
            .parse()
            .map_err(|_| self.invalid(line, "Area Level", value))
    }
}

/// Non-blank lines, trimmed, paired with their 1-based line number
pub(crate) fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}
