//! Defense base files (`bases/<slot>/<Type>.txt`)
//!
//! Blocks are separated by blank lines. The first line of a block names the
//! base and its area level; end-game blocks additionally declare a tier.
//!
//! ```text
//! Expert Full Plate (Area Level 65+)
//! Tier 1
//! Armour: 445
//! ```

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use super::{tier_value, Marker, Source};
use crate::fs::read_text;
use crate::items::{AreaLevel, BaseItem, DefenseStats, Item, ItemKind};
use crate::Result;

fn area_level_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"Area Level (\d+)(?:-(\d+)|\+)").expect("area level pattern is valid")
    })
}

/// Defense values present in a block
///
/// Absent and zero values are distinct: two blocks only match when they list
/// the same stats with the same values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DefenseValues {
    pub armour: Option<u32>,
    pub evasion: Option<u32>,
    pub energy_shield: Option<u32>,
}

impl DefenseValues {
    pub fn is_empty(&self) -> bool {
        self.armour.is_none() && self.evasion.is_none() && self.energy_shield.is_none()
    }

    pub fn stats(&self, block_chance: Option<u32>) -> DefenseStats {
        DefenseStats {
            armour: self.armour.unwrap_or_default(),
            evasion: self.evasion.unwrap_or_default(),
            energy_shield: self.energy_shield.unwrap_or_default(),
            block_chance,
        }
    }
}

/// One line of a defense block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefenseLine<'a> {
    Armour(&'a str),
    EvasionRating(&'a str),
    EnergyShield(&'a str),
    ChanceToBlock(&'a str),
    Tier(&'a str),
    Other,
}

pub fn classify(line: &str) -> DefenseLine<'_> {
    if let Some(v) = Marker::Armour.value(line) {
        return DefenseLine::Armour(v);
    }
    if let Some(v) = Marker::EvasionRating.value(line) {
        return DefenseLine::EvasionRating(v);
    }
    if let Some(v) = Marker::EnergyShield.value(line) {
        return DefenseLine::EnergyShield(v);
    }
    if let Some(v) = Marker::ChanceToBlock.value(line) {
        return DefenseLine::ChanceToBlock(v);
    }
    if let Some(v) = tier_value(line) {
        return DefenseLine::Tier(v);
    }
    DefenseLine::Other
}

/// Area level of a block header; only `min-max` and `min+` forms are recognised
pub fn header_area_level(line: &str) -> Option<AreaLevel> {
    let found = area_level_pattern().find(line)?;
    found.as_str().parse().ok()
}

/// Base name of a block header: everything before ` (`
pub fn header_name(line: &str) -> &str {
    line.split(" (").next().unwrap_or(line).trim()
}

/// A parsed defense block
#[derive(Debug, Clone, PartialEq)]
pub struct DefenseBlock {
    /// Line number of the block header
    pub line: usize,
    pub name: String,
    pub area_level: Option<AreaLevel>,
    pub values: DefenseValues,
    pub block_chance: Option<u32>,
    /// First `Tier n` declared in the block
    pub tier: Option<u8>,
}

impl DefenseBlock {
    /// Build the item record, if the block is a valid defense base
    pub fn to_item(&self, path: &Path) -> Option<Item> {
        let area_level = self.area_level.clone()?;
        if area_level.min() == 0 {
            return None;
        }

        let item = Item::new(
            BaseItem::new(self.name.as_str(), area_level, path),
            ItemKind::Defense(self.values.stats(self.block_chance)),
        );
        item.validate().then_some(item)
    }
}

/// Parse every block of a defense file
pub fn parse_file(path: &Path) -> Result<Vec<DefenseBlock>> {
    let text = read_text(path)?;
    parse_blocks(&text, path)
}

/// Parse defense text read from `path` into blocks
pub fn parse_blocks(text: &str, path: &Path) -> Result<Vec<DefenseBlock>> {
    let source = Source::new(path);
    let mut blocks = Vec::new();
    let mut current: Vec<(usize, &str)> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(parse_block(&current, &source)?);
                current.clear();
            }
            continue;
        }
        current.push((index + 1, line));
    }

    if !current.is_empty() {
        blocks.push(parse_block(&current, &source)?);
    }

    Ok(blocks)
}

/// Parse the valid defense items of a file
pub fn parse_items(text: &str, path: &Path) -> Result<Vec<Item>> {
    Ok(parse_blocks(text, path)?
        .iter()
        .filter_map(|block| block.to_item(path))
        .collect())
}

fn parse_block(lines: &[(usize, &str)], source: &Source<'_>) -> Result<DefenseBlock> {
    let (line, header) = lines[0];
    let mut block = DefenseBlock {
        line,
        name: header_name(header).to_string(),
        area_level: header_area_level(header),
        values: DefenseValues::default(),
        block_chance: None,
        tier: None,
    };

    for &(number, text) in lines {
        match classify(text) {
            DefenseLine::Armour(v) => {
                block.values.armour = Some(source.number(number, Marker::Armour.field(), v)?);
            }
            DefenseLine::EvasionRating(v) => {
                block.values.evasion =
                    Some(source.number(number, Marker::EvasionRating.field(), v)?);
            }
            DefenseLine::EnergyShield(v) => {
                block.values.energy_shield =
                    Some(source.number(number, Marker::EnergyShield.field(), v)?);
            }
            DefenseLine::ChanceToBlock(v) => {
                let v = v.trim_end_matches('%');
                block.block_chance = Some(source.number(number, Marker::ChanceToBlock.field(), v)?);
            }
            DefenseLine::Tier(v) if block.tier.is_none() => {
                block.tier = Some(source.number(number, "Tier", v)?);
            }
            _ => {}
        }
    }

    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const BODY_ARMOUR: &str = "\
Plate Vest (Area Level 1-4)
Armour: 12

Chain Mail (Area Level 10)
Armour: 40

Rusted Cuirass (Area Level 5-9)
Requires: Level 5

Expert Full Plate (Area Level 65+)
Tier 1
Armour: 445

Advanced Full Plate (Area Level 63+)
Tier 2
Armour: 360
";

    fn path() -> PathBuf {
        PathBuf::from("bases/body/Armour.txt")
    }

    #[test]
    fn test_header_area_level() {
        let lvl = header_area_level("Plate Vest (Area Level 1-4)").unwrap();
        assert_eq!((lvl.min(), lvl.max(), lvl.is_open_ended()), (1, Some(4), false));

        let lvl = header_area_level("Expert Full Plate (Area Level 65+)").unwrap();
        assert_eq!((lvl.min(), lvl.max(), lvl.is_open_ended()), (65, None, true));

        assert!(header_area_level("Chain Mail (Area Level 10)").is_none());
    }

    #[test]
    fn test_header_name() {
        assert_eq!(header_name("Plate Vest (Area Level 1-4)"), "Plate Vest");
        assert_eq!(header_name("Plate Vest"), "Plate Vest");
    }

    #[test]
    fn test_parse_blocks() {
        let blocks = parse_blocks(BODY_ARMOUR, &path()).unwrap();
        assert_eq!(blocks.len(), 5);

        assert_eq!(blocks[0].name, "Plate Vest");
        assert_eq!(blocks[0].values.armour, Some(12));
        assert_eq!(blocks[0].values.evasion, None);
        assert_eq!(blocks[3].tier, Some(1));
        assert_eq!(blocks[3].line, 10);
        assert_eq!(blocks[4].tier, Some(2));
    }

    #[test]
    fn test_parse_items_skips_invalid_blocks() {
        let items = parse_items(BODY_ARMOUR, &path()).unwrap();
        let names: Vec<_> = items.iter().map(|i| i.name()).collect();
        // bare area level and zero defense blocks are dropped
        assert_eq!(names, ["Plate Vest", "Expert Full Plate", "Advanced Full Plate"]);
        assert!(items.iter().all(|i| i.defense_stats().unwrap().is_valid()));
    }

    #[test]
    fn test_hybrid_and_block_chance() {
        let text = "Splintered Tower Shield (Area Level 1-4)\nChance to Block: 26%\nArmour: 14\nEvasion Rating: 10\n";
        let blocks = parse_blocks(text, &PathBuf::from("bases/shields/ArmourEvasion.txt")).unwrap();
        assert_eq!(
            blocks[0].values,
            DefenseValues {
                armour: Some(14),
                evasion: Some(10),
                energy_shield: None,
            }
        );
        assert_eq!(blocks[0].block_chance, Some(26));
    }

    #[test]
    fn test_malformed_value_aborts() {
        let text = "Plate Vest (Area Level 1-4)\nArmour: twelve\n";
        assert!(parse_blocks(text, &path()).is_err());
    }

    #[test]
    fn test_zero_min_level_skipped() {
        let text = "Odd Vest (Area Level 0-4)\nArmour: 12\n";
        assert!(parse_items(text, &path()).unwrap().is_empty());
    }
}
