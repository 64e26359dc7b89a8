//! On-disk locations of generator inputs and output

use std::fmt;
use std::path::{Path, PathBuf};

pub const BASES_DIR: &str = "bases";
pub const SETTINGS_FILE: &str = "filtersettings.txt";
pub const BASE_FILTER_FILE: &str = "filterbase.filter";
pub const OUTPUT_FILE: &str = "filter.filter";

pub const MARTIAL_WEAPONS_DIR: &str = "martial weapons";
pub const SKILL_WEAPONS_DIR: &str = "skill-based weapons";
pub const QUIVERS_DIR: &str = "quivers";

/// Extension of every base file
pub const BASE_FILE_EXTENSION: &str = "txt";

/// Defense equipment slot, one directory under `bases/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    Body,
    Helmet,
    Gloves,
    Boots,
    Shields,
    Foci,
}

/// Defense slots in processing order
pub const DEFENSE_SLOTS: [Slot; 6] = [
    Slot::Body,
    Slot::Helmet,
    Slot::Gloves,
    Slot::Boots,
    Slot::Shields,
    Slot::Foci,
];

impl Slot {
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Helmet => "helmet",
            Self::Gloves => "gloves",
            Self::Boots => "boots",
            Self::Shields => "shields",
            Self::Foci => "foci",
        }
    }

    /// Upper-case name used in block headers
    pub fn label(self) -> &'static str {
        match self {
            Self::Body => "BODY",
            Self::Helmet => "HELMET",
            Self::Gloves => "GLOVES",
            Self::Boots => "BOOTS",
            Self::Shields => "SHIELDS",
            Self::Foci => "FOCI",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Paths read and written by one generator run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub bases: PathBuf,
    pub settings: PathBuf,
    pub base_filter: PathBuf,
    pub output: PathBuf,
}

impl Layout {
    /// Default layout relative to a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            bases: root.join(BASES_DIR),
            settings: root.join(SETTINGS_FILE),
            base_filter: root.join(BASE_FILTER_FILE),
            output: root.join(OUTPUT_FILE),
        }
    }

    pub fn slot_dir(&self, slot: Slot) -> PathBuf {
        self.bases.join(slot.dir_name())
    }

    pub fn martial_weapons_dir(&self) -> PathBuf {
        self.bases.join(MARTIAL_WEAPONS_DIR)
    }

    pub fn skill_weapons_dir(&self) -> PathBuf {
        self.bases.join(SKILL_WEAPONS_DIR)
    }

    pub fn quivers_dir(&self) -> PathBuf {
        self.bases.join(QUIVERS_DIR)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(".")
    }
}
