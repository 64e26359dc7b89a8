//! Skill weapon base files (`bases/skill-based weapons/*.txt`)
//!
//! Wands, staves and sceptres are listed by name followed by indented or
//! marker lines; the only field that matters for filtering is the skill the
//! base grants.
//!
//! ```text
//! Withered Wand
//! Requires: Level 1
//! Grants Skill: Chaos Bolt
//! ```

use std::path::Path;

use super::{Marker, Source};
use crate::fs::read_text;
use crate::items::{AreaLevel, BaseItem, Item, ItemKind};
use crate::Result;

/// Area level assigned to skill weapons, which list none
pub const SKILL_WEAPON_AREA_LEVEL: &str = "1";

/// One line of a skill weapon file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillLine<'a> {
    Name(&'a str),
    GrantsSkill(&'a str),
    Spirit(&'a str),
    Requires,
    Other,
}

/// Classify a raw (untrimmed) line; indented lines are never names
pub fn classify(raw: &str) -> SkillLine<'_> {
    let line = raw.trim();
    let indented = raw.starts_with(char::is_whitespace);

    if !indented
        && !line.starts_with(Marker::Requires.text())
        && !line.starts_with(Marker::Spirit.text())
        && !line.starts_with(Marker::GrantsSkill.text())
    {
        return SkillLine::Name(line);
    }

    if let Some((_, skill)) = line.split_once(Marker::GrantsSkill.text()) {
        return SkillLine::GrantsSkill(skill.trim());
    }
    if let Some(spirit) = line.strip_prefix(Marker::Spirit.text()) {
        return SkillLine::Spirit(spirit.trim());
    }
    if line.starts_with(Marker::Requires.text()) {
        return SkillLine::Requires;
    }
    SkillLine::Other
}

#[derive(Default)]
struct Pending<'a> {
    name: Option<&'a str>,
    skill: Option<&'a str>,
    spirit: Option<u32>,
}

impl Pending<'_> {
    fn finish(&self, path: &Path, area_level: &AreaLevel, items: &mut Vec<Item>) {
        let (Some(name), Some(skill)) = (self.name, self.skill) else {
            return;
        };

        let item = Item::new(
            BaseItem::new(name, area_level.clone(), path),
            ItemKind::SkillWeapon {
                granted_skill: skill.to_string(),
                spirit: self.spirit,
            },
        );
        if item.validate() {
            items.push(item);
        }
    }
}

/// Parse a skill weapon file
pub fn parse_file(path: &Path) -> Result<Vec<Item>> {
    let text = read_text(path)?;
    parse(&text, path)
}

/// Parse skill weapon text read from `path`
pub fn parse(text: &str, path: &Path) -> Result<Vec<Item>> {
    let source = Source::new(path);
    let area_level = source.area_level(0, SKILL_WEAPON_AREA_LEVEL)?;
    let mut items = Vec::new();
    let mut current = Pending::default();

    for (index, raw) in text.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }

        match classify(raw) {
            SkillLine::Name(name) => {
                current.finish(path, &area_level, &mut items);
                current = Pending {
                    name: Some(name),
                    ..Default::default()
                };
            }
            SkillLine::GrantsSkill(skill) => current.skill = Some(skill),
            SkillLine::Spirit(spirit) => {
                current.spirit = Some(source.number(index + 1, Marker::Spirit.field(), spirit)?);
            }
            SkillLine::Requires | SkillLine::Other => {}
        }
    }

    current.finish(path, &area_level, &mut items);
    Ok(items)
}
