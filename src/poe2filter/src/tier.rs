//! End-game defense tier resolution
//!
//! The tier of an end-game defense base is the `Tier n` declared by the first
//! block in `bases/<slot>/<Type>.txt` listing the same defense values. Each of
//! those files is indexed once and reused for the rest of the run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::classify::tier_source_stem;
use crate::layout::{Slot, BASE_FILE_EXTENSION};
use crate::parser::{defense, DefenseValues};
use crate::Result;

/// Tier used when no declaring block is found
pub const DEFAULT_TIER: u8 = 2;

/// Declared tiers of defense files, keyed by file path
#[derive(Debug, Default)]
pub struct TierIndex {
    bases: PathBuf,
    files: HashMap<PathBuf, Vec<(DefenseValues, u8)>>,
}

impl TierIndex {
    pub fn new(bases: impl Into<PathBuf>) -> Self {
        Self {
            bases: bases.into(),
            files: HashMap::new(),
        }
    }

    /// File declaring the tiers of `token` bases in `slot`
    pub fn source_path(&self, slot: Slot, token: &str) -> PathBuf {
        self.bases
            .join(slot.dir_name())
            .join(format!("{}.{}", tier_source_stem(token), BASE_FILE_EXTENSION))
    }

    /// Resolve the tier of a base with the given defense values
    pub fn resolve(&mut self, slot: Slot, token: &str, values: &DefenseValues) -> Result<u8> {
        if values.is_empty() {
            return Ok(DEFAULT_TIER);
        }

        let path = self.source_path(slot, token);
        let tier = self
            .entries(&path)?
            .iter()
            .find(|(declared, _)| declared == values)
            .map(|&(_, tier)| tier)
            .unwrap_or(DEFAULT_TIER);
        Ok(tier)
    }

    /// Number of files indexed so far
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn entries(&mut self, path: &Path) -> Result<&[(DefenseValues, u8)]> {
        if !self.files.contains_key(path) {
            let entries: Vec<_> = if path.is_file() {
                defense::parse_file(path)?
                    .into_iter()
                    .filter_map(|block| Some((block.values, block.tier?)))
                    .collect()
            } else {
                Vec::new()
            };
            debug!("Indexed {} tiered blocks in {}", entries.len(), path.display());
            self.files.insert(path.to_path_buf(), entries);
        }

        Ok(self.files.get(path).map(Vec::as_slice).unwrap_or_default())
    }
}
