//! Quiver base files (`bases/quivers/*.txt`)

use std::path::Path;

use super::{content_lines, Source};
use crate::fs::read_text;
use crate::items::{AreaLevel, BaseItem, Item, ItemKind};
use crate::Result;

/// Area level assigned to quivers, which list none
pub const QUIVER_AREA_LEVEL: &str = "1";

const QUIVER_SUFFIX: &str = "Quiver";

/// One line of a quiver file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuiverLine<'a> {
    Name(&'a str),
    Effect(&'a str),
}

pub fn classify(line: &str) -> QuiverLine<'_> {
    if line.ends_with(QUIVER_SUFFIX) {
        QuiverLine::Name(line)
    } else {
        QuiverLine::Effect(line)
    }
}

fn finish(
    name: Option<&str>,
    effect: Option<&str>,
    area_level: &AreaLevel,
    path: &Path,
    items: &mut Vec<Item>,
) {
    if let (Some(name), Some(effect)) = (name, effect) {
        let item = Item::new(
            BaseItem::new(name, area_level.clone(), path),
            ItemKind::Quiver {
                implicit_effect: effect.to_string(),
            },
        );
        if item.validate() {
            items.push(item);
        }
    }
}

/// Parse a quiver file
pub fn parse_file(path: &Path) -> Result<Vec<Item>> {
    let text = read_text(path)?;
    parse(&text, path)
}

/// Parse quiver text read from `path`
///
/// The last effect line before the next quiver name is kept.
pub fn parse(text: &str, path: &Path) -> Result<Vec<Item>> {
    let area_level = Source::new(path).area_level(0, QUIVER_AREA_LEVEL)?;
    let mut items = Vec::new();
    let mut name = None;
    let mut effect = None;

    for (_, line) in content_lines(text) {
        match classify(line) {
            QuiverLine::Name(next) => {
                finish(name, effect, &area_level, path, &mut items);
                name = Some(next);
                effect = None;
            }
            QuiverLine::Effect(implicit) => effect = Some(implicit),
        }
    }

    finish(name, effect, &area_level, path, &mut items);
    Ok(items)
}
