//! Martial weapon base files (`bases/martial weapons/**.txt`)
//!
//! ```text
//! Expert Dualstring Bow (Area Level 65+)
//! Tier 1
//! Physical Damage: 21-39
//! Critical Hit Chance: 5.00%
//! Attacks per Second: 1.10
//! ```

use std::path::Path;

use tracing::debug;

use super::{content_lines, item_header, tier_value, Marker, Source};
use crate::fs::read_text;
use crate::items::{BaseItem, Item, ItemKind, WeaponStats};
use crate::Result;

/// One line of a martial weapon file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponLine<'a> {
    Header { name: &'a str, area_level: &'a str },
    Tier(&'a str),
    PhysicalDamage(&'a str),
    CritChance(&'a str),
    AttacksPerSecond(&'a str),
    WeaponRange(&'a str),
    ReloadTime(&'a str),
    Other,
}

pub fn classify(line: &str) -> WeaponLine<'_> {
    if let Some((name, area_level)) = item_header(line) {
        return WeaponLine::Header { name, area_level };
    }
    if let Some(v) = Marker::PhysicalDamage.value(line) {
        return WeaponLine::PhysicalDamage(v);
    }
    if let Some(v) = Marker::CritChance.value(line) {
        return WeaponLine::CritChance(v);
    }
    if let Some(v) = Marker::AttacksPerSecond.value(line) {
        return WeaponLine::AttacksPerSecond(v);
    }
    if let Some(v) = Marker::ReloadTime.value(line) {
        return WeaponLine::ReloadTime(v);
    }
    if let Some(v) = Marker::WeaponRange.value(line) {
        return WeaponLine::WeaponRange(v);
    }
    if let Some(v) = tier_value(line) {
        return WeaponLine::Tier(v);
    }
    WeaponLine::Other
}

/// Crossbow files are the only ones carrying a reload time
pub fn is_crossbow_file(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("crossbows"))
        .unwrap_or(false)
}

struct Pending {
    base: BaseItem,
    stats: WeaponStats,
    reload_time: f32,
    crossbow: bool,
}

impl Pending {
    fn finish(self, items: &mut Vec<Item>) {
        let kind = if self.crossbow {
            ItemKind::Crossbow {
                weapon: self.stats,
                reload_time: self.reload_time,
            }
        } else {
            ItemKind::Weapon(self.stats)
        };

        let item = Item::new(self.base, kind);
        if item.validate() {
            items.push(item);
        } else {
            debug!("Discarding incomplete weapon base {}", item.name());
        }
    }
}

/// Parse a martial weapon file
pub fn parse_file(path: &Path) -> Result<Vec<Item>> {
    let text = read_text(path)?;
    parse(&text, path)
}

/// Parse martial weapon text read from `path`
pub fn parse(text: &str, path: &Path) -> Result<Vec<Item>> {
    let source = Source::new(path);
    let crossbow = is_crossbow_file(path);
    let mut items = Vec::new();
    let mut current: Option<Pending> = None;

    let mut lines = content_lines(text).peekable();
    while let Some((number, line)) = lines.next() {
        match classify(line) {
            WeaponLine::Header { name, area_level } => {
                if let Some(pending) = current.take() {
                    pending.finish(&mut items);
                }

                let area_level = source.area_level(number, area_level)?;
                let mut stats = WeaponStats::default();

                if area_level.is_open_ended() {
                    if let Some(&(tier_number, next)) = lines.peek() {
                        if let WeaponLine::Tier(tier) = classify(next) {
                            stats.tier = Some(source.number(tier_number, "Tier", tier)?);
                            lines.next();
                        }
                    }
                }

                current = Some(Pending {
                    base: BaseItem::new(name, area_level, path),
                    stats,
                    reload_time: 0.0,
                    crossbow,
                });
            }
            field => {
                if let Some(pending) = current.as_mut() {
                    apply_field(pending, field, number, &source)?;
                }
            }
        }
    }

    if let Some(pending) = current.take() {
        pending.finish(&mut items);
    }

    Ok(items)
}

fn apply_field(pending: &mut Pending, line: WeaponLine<'_>, number: usize, source: &Source<'_>) -> Result<()> {
    match line {
        WeaponLine::PhysicalDamage(value) => {
            let field = Marker::PhysicalDamage.field();
            let (min, max) = value
                .split_once('-')
                .ok_or_else(|| source.invalid(number, field, value))?;
            pending.stats.physical_min = source.number(number, field, min)?;
            pending.stats.physical_max = source.number(number, field, max)?;
        }
        WeaponLine::CritChance(value) => {
            let value = value.trim_end_matches('%');
            pending.stats.crit_chance = source.number(number, Marker::CritChance.field(), value)?;
        }
        WeaponLine::AttacksPerSecond(value) => {
            pending.stats.attacks_per_second =
                source.number(number, Marker::AttacksPerSecond.field(), value)?;
        }
        WeaponLine::WeaponRange(value) => {
            let range = value.split_whitespace().next().unwrap_or_default();
            pending.stats.weapon_range = source.number(number, Marker::WeaponRange.field(), range)?;
        }
        WeaponLine::ReloadTime(value) if pending.crossbow => {
            pending.reload_time = source.number(number, Marker::ReloadTime.field(), value)?;
        }
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::path::PathBuf;

    const BOWS: &str = "\
Crude Bow (Area Level 1-4)
Physical Damage: 7-12
Critical Hit Chance: 5.00%
Attacks per Second: 1.20

Shortbow (Area Level 5-12)
Physical Damage: 9-20
Critical Hit Chance: 5.00%
Attacks per Second: 1.25
Weapon Range: 1.1

Broken Bow (Area Level 13-20)
Critical Hit Chance: 5.00%

Expert Dualstring Bow (Area Level 65+)
Tier 1
Physical Damage: 21-39
Critical Hit Chance: 5.00%
Attacks per Second: 1.10
";

    fn bows_path() -> PathBuf {
        PathBuf::from("bases/martial weapons/Bows.txt")
    }

    #[test]
    fn test_classify_rules() {
        assert_eq!(
            classify("Crude Bow (Area Level 1-4)"),
            WeaponLine::Header {
                name: "Crude Bow",
                area_level: "1-4"
            }
        );
        assert_eq!(classify("Tier 2"), WeaponLine::Tier("2"));
        assert_eq!(
            classify("Critical Hit Chance: 5.00%"),
            WeaponLine::CritChance("5.00%")
        );
        assert_eq!(classify("Reload Time: 0.80"), WeaponLine::ReloadTime("0.80"));
        assert_eq!(classify("Requires: Level 16"), WeaponLine::Other);
    }

    #[test]
    fn test_parse_bows() {
        let items = parse(BOWS, &bows_path()).unwrap();
        let names: Vec<_> = items.iter().map(|i| i.name()).collect();
        assert_eq!(names, ["Crude Bow", "Shortbow", "Expert Dualstring Bow"]);

        let crude = items[0].weapon_stats().unwrap();
        assert_eq!((crude.physical_min, crude.physical_max), (7, 12));
        assert!((crude.crit_chance - 5.0).abs() < f32::EPSILON);
        assert_eq!(crude.tier, None);

        let shortbow = items[1].weapon_stats().unwrap();
        assert!((shortbow.weapon_range - 1.1).abs() < f32::EPSILON);

        let expert = &items[2];
        assert!(expert.base.is_endgame());
        assert_eq!(expert.weapon_stats().unwrap().tier, Some(1));
    }

    #[test]
    fn test_tier_only_after_open_ended_header() {
        let text = "Crude Bow (Area Level 1-4)\nTier 1\nPhysical Damage: 7-12\nCritical Hit Chance: 5%\nAttacks per Second: 1.2\n";
        let items = parse(text, &bows_path()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].weapon_stats().unwrap().tier, None);
    }

    #[test]
    fn test_crossbow_requires_reload_time() {
        let path = PathBuf::from("bases/martial weapons/Crossbows.txt");
        let text = "\
Makeshift Crossbow (Area Level 1-4)
Physical Damage: 7-11
Critical Hit Chance: 5.00%
Attacks per Second: 1.60
Reload Time: 0.80

Tense Crossbow (Area Level 5-10)
Physical Damage: 8-13
Critical Hit Chance: 5.00%
Attacks per Second: 1.60
";
        let items = parse(text, &path).unwrap();
        assert_eq!(items.len(), 1);
        match &items[0].kind {
            ItemKind::Crossbow { reload_time, .. } => {
                assert!((reload_time - 0.8).abs() < f32::EPSILON)
            }
            other => panic!("expected crossbow, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_damage_aborts() {
        let text = "Crude Bow (Area Level 1-4)\nPhysical Damage: 7-x\n";
        let err = parse(text, &bows_path()).unwrap_err();
        match err {
            Error::InvalidField { line, field, .. } => {
                assert_eq!(line, 2);
                assert_eq!(field, "Physical Damage");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_malformed_tier_aborts() {
        let text = "Expert Bow (Area Level 65+)\nTier one\n";
        assert!(parse(text, &bows_path()).is_err());
    }

    #[test]
    fn test_is_crossbow_file() {
        assert!(is_crossbow_file(Path::new("bases/martial weapons/crossbows.txt")));
        assert!(!is_crossbow_file(Path::new("bases/martial weapons/Bows.txt")));
    }
}
