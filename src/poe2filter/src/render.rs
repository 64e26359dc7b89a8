//! Filter block rendering
//!
//! Blocks are plain text in the game's filter syntax:
//!
//! ```text
//! # LEVELING Armour BODY (Area Level 1-4)
//! Show
//! BaseType "Plate Vest"
//! AreaLevel <= 4
//! MinimapIcon 0 White Circle
//! TextColor 255 255 255
//! ```
//!
//! Defense, consolidated and skill weapon blocks end with one blank line;
//! single weapon blocks end with two.

use tracing::warn;

use crate::classify::{
    defense_display_name, title_case, weapon_type, SkillClass, SkillGroup, CASTER_WEAPON_STYLE,
};
use crate::items::{Item, ItemKind, ADVANCED_MARKER, EXPERT_MARKER};
use crate::layout::Slot;
use crate::settings::{FilterSettings, Style};

pub const MINIMAP_ICON_SIZE: &str = "MinimapIconSize";
pub const MINIMAP_ICON_COLOUR: &str = "MinimapIconColour";
pub const MINIMAP_ICON_SHAPE: &str = "MinimapIconShape";

/// Icon size used for unknown size words in most blocks
pub const ICON_SIZE_FALLBACK: &str = "1";

/// Icon size used for unknown size words in consolidated end-game defense blocks
pub const ENDGAME_DEFENSE_ICON_SIZE_FALLBACK: &str = "0";

const HIDDEN_RARITY: &str = "Rarity <= Magic";

/// Rendered block text, with the level leveling blocks are ordered by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    pub text: String,
    pub level: Option<u32>,
}

impl RenderedBlock {
    pub fn new(text: String) -> Self {
        Self { text, level: None }
    }

    pub fn with_level(text: String, level: u32) -> Self {
        Self {
            text,
            level: Some(level),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Numeric minimap icon size of a size word
pub fn icon_size<'a>(word: &str, fallback: &'a str) -> &'a str {
    match word {
        "Large" => "0",
        "Medium" => "1",
        "Small" => "2",
        _ => fallback,
    }
}

fn is_icon_property(key: &str) -> bool {
    key == MINIMAP_ICON_SIZE || key == MINIMAP_ICON_COLOUR || key == MINIMAP_ICON_SHAPE
}

/// Render a style's directives
///
/// The three minimap icon properties collapse into one leading `MinimapIcon`
/// line when all are set; they never render on their own.
pub fn style_lines(style: &Style, icon_fallback: &str) -> Vec<String> {
    let mut lines = Vec::with_capacity(style.len());

    let present = |key: &str| style.get(key).filter(|v| !v.is_empty());
    if let (Some(size), Some(colour), Some(shape)) = (
        present(MINIMAP_ICON_SIZE),
        present(MINIMAP_ICON_COLOUR),
        present(MINIMAP_ICON_SHAPE),
    ) {
        lines.push(format!(
            "MinimapIcon {} {} {}",
            icon_size(size, icon_fallback),
            colour,
            shape
        ));
    }

    lines.extend(
        style
            .iter()
            .filter(|(key, _)| !is_icon_property(key))
            .map(|(key, value)| format!("{key} {value}")),
    );
    lines
}

/// Render a named style from the settings, warning when it is not defined
pub fn named_style_lines(settings: &FilterSettings, name: &str, icon_fallback: &str) -> Vec<String> {
    match settings.style(name) {
        Some(style) => style_lines(style, icon_fallback),
        None => {
            warn!("Style '{}' not found in settings", name);
            Vec::new()
        }
    }
}

fn base_type_line<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let quoted: Vec<_> = names.into_iter().map(|n| format!("\"{n}\"")).collect();
    format!("BaseType {}", quoted.join(" "))
}

/// Join block lines and terminate with the given number of blank lines
fn finish(lines: &[String], blank_lines: usize) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text.push_str(&"\n".repeat(blank_lines));
    text
}

// ============================================================================
// Defense
// ============================================================================

/// Shown leveling defense base, ordered by its minimum area level
pub fn leveling_defense_block(
    settings: &FilterSettings,
    name: &str,
    slot: Slot,
    token: &str,
    (min_level, max_level): (u32, u32),
    style: &str,
) -> RenderedBlock {
    let mut lines = vec![
        format!(
            "# LEVELING {} {} (Area Level {min_level}-{max_level})",
            defense_display_name(token),
            slot.label()
        ),
        "Show".to_string(),
        base_type_line([name]),
        format!("AreaLevel <= {max_level}"),
    ];
    lines.extend(named_style_lines(settings, style, ICON_SIZE_FALLBACK));
    RenderedBlock::with_level(finish(&lines, 1), min_level)
}

/// Shown end-game defense bases of one slot, type and tier
pub fn endgame_defense_block(
    settings: &FilterSettings,
    names: &[String],
    slot: Slot,
    token: &str,
    tier: u8,
    style: &str,
) -> RenderedBlock {
    let mut lines = vec![
        format!(
            "# ENDGAME TIER {tier} {} {} (Area Level 63+)",
            title_case(token),
            slot.label()
        ),
        "Show".to_string(),
        base_type_line(names.iter().map(String::as_str)),
    ];
    lines.extend(named_style_lines(
        settings,
        style,
        ENDGAME_DEFENSE_ICON_SIZE_FALLBACK,
    ));
    RenderedBlock::new(finish(&lines, 1))
}

/// Hidden defense base; carries no header
pub fn defense_hide_block(name: &str) -> RenderedBlock {
    let lines = [
        "Hide".to_string(),
        base_type_line([name]),
        HIDDEN_RARITY.to_string(),
    ];
    RenderedBlock::new(finish(&lines, 1))
}

// ============================================================================
// Weapons
// ============================================================================

fn skill_class_label(item: &Item) -> &'static str {
    SkillClass::from_path(item.base.source())
        .map(SkillClass::label)
        .unwrap_or("UNKNOWN")
}

fn single_header(item: &Item) -> String {
    match &item.kind {
        ItemKind::Quiver { .. } => format!("# {}", item.name()),
        ItemKind::SkillWeapon { granted_skill, .. } => format!(
            "# {} {}",
            granted_skill.to_uppercase(),
            skill_class_label(item)
        ),
        _ => {
            let area_level = &item.base.area_level;
            let weapon_type = weapon_type(item.base.source());
            if area_level.is_open_ended() {
                let tier = item
                    .weapon_stats()
                    .and_then(|s| s.tier)
                    .map(|t| format!("T{t} "))
                    .unwrap_or_default();
                format!("# ENDGAME {tier}{weapon_type} ({area_level})")
            } else {
                format!("# LEVELING {weapon_type} ({area_level})")
            }
        }
    }
}

fn consolidated_header(item: &Item) -> String {
    let mut parts = Vec::with_capacity(4);
    if item.base.is_endgame() {
        parts.push("ENDGAME".to_string());
        if item.name().contains(EXPERT_MARKER) {
            parts.push("T1".to_string());
        } else if item.name().contains(ADVANCED_MARKER) {
            parts.push("T2".to_string());
        }
    } else {
        parts.push("LEVELING".to_string());
    }
    parts.push(weapon_type(item.base.source()));
    parts.push(format!("({})", item.base.area_level));
    format!("# {}", parts.join(" "))
}

/// Single weapon or quiver block; `style` is `None` for hidden items
pub fn weapon_block(settings: &FilterSettings, item: &Item, style: Option<&str>) -> RenderedBlock {
    let shown = style.is_some();
    let action = if shown { "Show" } else { "Hide" };
    let mut lines = vec![
        single_header(item),
        action.to_string(),
        base_type_line([item.name()]),
    ];

    let area_level = &item.base.area_level;
    if shown && !area_level.is_open_ended() {
        if let Some(max) = area_level.max() {
            lines.push(format!("AreaLevel <= {max}"));
        }
    }

    match style {
        Some(style) => lines.extend(named_style_lines(settings, style, ICON_SIZE_FALLBACK)),
        None => lines.push(HIDDEN_RARITY.to_string()),
    }

    RenderedBlock::new(finish(&lines, 2))
}

/// Shown martial weapons sharing a group; the first item provides the header
pub fn consolidated_weapon_block(
    settings: &FilterSettings,
    items: &[Item],
    style: &str,
    level: Option<u32>,
) -> Option<RenderedBlock> {
    let first = items.first()?;
    let mut lines = vec![
        consolidated_header(first),
        "Show".to_string(),
        base_type_line(items.iter().map(Item::name)),
    ];
    if let Some(max) = first.base.max_area_level() {
        lines.push(format!("AreaLevel <= {max}"));
    }
    lines.extend(named_style_lines(settings, style, ICON_SIZE_FALLBACK));

    let text = finish(&lines, 1);
    Some(match level {
        Some(level) => RenderedBlock::with_level(text, level),
        None => RenderedBlock::new(text),
    })
}

/// Shown skill weapons granting the same skill
pub fn skill_weapon_block(
    settings: &FilterSettings,
    group: &SkillGroup,
    items: &[Item],
) -> RenderedBlock {
    let mut lines = vec![
        group.header(),
        "Show".to_string(),
        base_type_line(items.iter().map(Item::name)),
    ];
    lines.extend(named_style_lines(
        settings,
        CASTER_WEAPON_STYLE,
        ICON_SIZE_FALLBACK,
    ));
    RenderedBlock::new(finish(&lines, 1))
}

/// Hidden skill weapon
pub fn skill_weapon_hide_block(group: &SkillGroup, item: &Item) -> RenderedBlock {
    let lines = [
        group.header(),
        "Hide".to_string(),
        base_type_line([item.name()]),
        HIDDEN_RARITY.to_string(),
    ];
    RenderedBlock::new(finish(&lines, 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::LEVELING_MARTIAL_STYLE;
    use crate::items::{BaseItem, WeaponStats};

    const SETTINGS: &str = r#"
"Leveling Armour": {
    "MinimapIconSize": "Large",
    "MinimapIconColour": "White",
    "MinimapIconShape": "Circle",
    "TextColor": "255 255 255"
}
"Endgame Tier 1": {
    "SetFontSize": "45",
    "MinimapIconShape": "Star",
    "MinimapIconSize": "Huge",
    "MinimapIconColour": "Red"
}
"Leveling Martial Weapon": {
    "TextColor": "200 200 200"
}
"Caster Weapon": {
    "TextColor": "100 100 255"
}
"#;

    fn settings() -> FilterSettings {
        FilterSettings::parse(SETTINGS)
    }

    fn bow(name: &str, area: &str, tier: Option<u8>) -> Item {
        Item::new(
            BaseItem::new(name, area.parse().unwrap(), "bases/martial weapons/Bows.txt"),
            ItemKind::Weapon(WeaponStats {
                physical_min: 7,
                physical_max: 12,
                crit_chance: 5.0,
                attacks_per_second: 1.2,
                weapon_range: 0.0,
                tier,
            }),
        )
    }

    fn wand(name: &str, skill: &str) -> Item {
        Item::new(
            BaseItem::new(name, "1".parse().unwrap(), "bases/skill-based weapons/Wands.txt"),
            ItemKind::SkillWeapon {
                granted_skill: skill.to_string(),
                spirit: None,
            },
        )
    }

    #[test]
    fn test_icon_size_mapping() {
        assert_eq!(icon_size("Large", ICON_SIZE_FALLBACK), "0");
        assert_eq!(icon_size("Medium", ICON_SIZE_FALLBACK), "1");
        assert_eq!(icon_size("Small", ICON_SIZE_FALLBACK), "2");
        assert_eq!(icon_size("Huge", ICON_SIZE_FALLBACK), "1");
        assert_eq!(icon_size("Huge", ENDGAME_DEFENSE_ICON_SIZE_FALLBACK), "0");
    }

    #[test]
    fn test_style_lines_icon_first() {
        let settings = settings();
        let style = settings.style("Endgame Tier 1").unwrap();
        assert_eq!(
            style_lines(style, ICON_SIZE_FALLBACK),
            ["MinimapIcon 1 Red Star", "SetFontSize 45"]
        );
    }

    #[test]
    fn test_style_lines_partial_icon_dropped() {
        let mut style = Style::new();
        style.set(MINIMAP_ICON_SIZE, "Large");
        style.set("TextColor", "1 2 3");
        assert_eq!(style_lines(&style, ICON_SIZE_FALLBACK), ["TextColor 1 2 3"]);
    }

    #[test]
    fn test_style_rendering_is_idempotent() {
        let settings = settings();
        let style = settings.style("Leveling Armour").unwrap();
        let first = style_lines(style, ICON_SIZE_FALLBACK);
        let second = style_lines(style, ICON_SIZE_FALLBACK);
        assert_eq!(first, second);
        assert_eq!(style.len(), 4);
    }

    #[test]
    fn test_missing_style_renders_nothing() {
        assert!(named_style_lines(&settings(), "Nope", ICON_SIZE_FALLBACK).is_empty());
    }

    #[test]
    fn test_leveling_defense_block() {
        let block = leveling_defense_block(
            &settings(),
            "Plate Vest",
            Slot::Body,
            "Armour",
            (1, 4),
            "Leveling Armour",
        );
        assert_eq!(
            block.text,
            "# LEVELING Armour BODY (Area Level 1-4)\n\
             Show\n\
             BaseType \"Plate Vest\"\n\
             AreaLevel <= 4\n\
             MinimapIcon 0 White Circle\n\
             TextColor 255 255 255\n\n"
        );
        assert_eq!(block.level, Some(1));
    }

    #[test]
    fn test_endgame_defense_block() {
        let names = vec!["Expert Full Plate".to_string(), "Expert Chain Mail".to_string()];
        let block = endgame_defense_block(
            &settings(),
            &names,
            Slot::Body,
            "ARMOUR_EVASION",
            1,
            "Endgame Tier 1",
        );
        assert_eq!(
            block.text,
            "# ENDGAME TIER 1 Armour_Evasion BODY (Area Level 63+)\n\
             Show\n\
             BaseType \"Expert Full Plate\" \"Expert Chain Mail\"\n\
             MinimapIcon 0 Red Star\n\
             SetFontSize 45\n\n"
        );
        assert_eq!(block.level, None);
    }

    #[test]
    fn test_defense_hide_block() {
        assert_eq!(
            defense_hide_block("Plate Vest").text,
            "Hide\nBaseType \"Plate Vest\"\nRarity <= Magic\n\n"
        );
    }

    #[test]
    fn test_weapon_block_hidden() {
        let block = weapon_block(&settings(), &bow("Crude Bow", "1-4", None), None);
        assert_eq!(
            block.text,
            "# LEVELING BOWS (1-4)\nHide\nBaseType \"Crude Bow\"\nRarity <= Magic\n\n\n"
        );

        let block = weapon_block(&settings(), &bow("Expert Bow", "65+", Some(1)), None);
        assert!(block.text.starts_with("# ENDGAME T1 BOWS (65+)\nHide\n"));
    }

    #[test]
    fn test_weapon_block_shown() {
        let block = weapon_block(
            &settings(),
            &bow("Crude Bow", "1-4", None),
            Some(LEVELING_MARTIAL_STYLE),
        );
        assert_eq!(
            block.text,
            "# LEVELING BOWS (1-4)\nShow\nBaseType \"Crude Bow\"\nAreaLevel <= 4\nTextColor 200 200 200\n\n\n"
        );
    }

    #[test]
    fn test_quiver_block() {
        let quiver = Item::new(
            BaseItem::new("Fire Quiver", "1".parse().unwrap(), "bases/quivers/Quivers.txt"),
            ItemKind::Quiver {
                implicit_effect: "Adds 3 to 5 Fire damage to Attacks".to_string(),
            },
        );
        let block = weapon_block(&settings(), &quiver, Some(LEVELING_MARTIAL_STYLE));
        assert_eq!(
            block.text,
            "# Fire Quiver\nShow\nBaseType \"Fire Quiver\"\nTextColor 200 200 200\n\n\n"
        );
    }

    #[test]
    fn test_consolidated_weapon_block() {
        let items = vec![
            bow("Expert Dualstring Bow", "65+", Some(1)),
            bow("Expert Shortbow", "65+", Some(1)),
        ];
        let block = consolidated_weapon_block(&settings(), &items, "Endgame Tier 1", None).unwrap();
        assert_eq!(
            block.text,
            "# ENDGAME T1 BOWS (65+)\n\
             Show\n\
             BaseType \"Expert Dualstring Bow\" \"Expert Shortbow\"\n\
             MinimapIcon 1 Red Star\n\
             SetFontSize 45\n\n"
        );

        let items = vec![bow("Crude Bow", "1-4", None)];
        let block =
            consolidated_weapon_block(&settings(), &items, LEVELING_MARTIAL_STYLE, Some(4)).unwrap();
        assert!(block.text.starts_with("# LEVELING BOWS (1-4)\nShow\nBaseType \"Crude Bow\"\nAreaLevel <= 4\n"));
        assert_eq!(block.level, Some(4));

        assert!(consolidated_weapon_block(&settings(), &[], LEVELING_MARTIAL_STYLE, None).is_none());
    }

    #[test]
    fn test_skill_weapon_blocks() {
        let items = vec![wand("Withered Wand", "Chaos Bolt")];
        let group = SkillGroup::classify(&items[0]).unwrap();

        assert_eq!(
            skill_weapon_block(&settings(), &group, &items).text,
            "# WANDS - Chaos Bolt\nShow\nBaseType \"Withered Wand\"\nTextColor 100 100 255\n\n"
        );
        assert_eq!(
            skill_weapon_hide_block(&group, &items[0]).text,
            "# WANDS - Chaos Bolt\nHide\nBaseType \"Withered Wand\"\nRarity <= Magic\n\n"
        );
    }

    #[test]
    fn test_skill_weapon_single_header() {
        let block = weapon_block(&settings(), &wand("Withered Wand", "Chaos Bolt"), None);
        assert!(block.text.starts_with("# CHAOS BOLT WANDS\nHide\n"));
    }
}
