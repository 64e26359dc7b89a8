//! Filter settings (`filtersettings.txt`)
//!
//! The settings file mixes two kinds of entries:
//!
//! ```text
//! SHOW_LEVELING_ARMOUR = true   # toggles
//! HIDE_UNSHOWN_ITEMS = false
//!
//! "Leveling Armour": {
//!     "MinimapIconSize": "Large",
//!     "TextColor": "255 255 255",
//! }
//! ```
//!
//! Parsing is lenient: unknown lines are ignored and unmatched braces never
//! fail.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::fs::read_text;
use crate::Result;

/// Toggle deciding whether items without a show rule get explicit hide blocks
pub const HIDE_UNSHOWN_ITEMS: &str = "HIDE_UNSHOWN_ITEMS";

/// Named visual style: properties in definition order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    properties: Vec<(String, String)>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property; re-setting an existing one keeps its position
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.properties.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.properties.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Show toggles and named styles
#[derive(Debug, Clone, Default)]
pub struct FilterSettings {
    pub show: HashMap<String, bool>,
    pub styles: HashMap<String, Style>,
}

impl FilterSettings {
    /// Load settings from a file; a missing file is an error
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_text(path)?;
        let settings = Self::parse(&text);
        debug!(
            "Loaded {} toggles and {} styles from {}",
            settings.show.len(),
            settings.styles.len(),
            path.display()
        );
        Ok(settings)
    }

    pub fn parse(text: &str) -> Self {
        let mut settings = Self::default();
        let mut current: Option<String> = None;

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.contains('=') && !line.contains(':') {
                if let Some((key, value)) = line.split_once('=') {
                    let value = value.split('#').next().unwrap_or_default().trim();
                    settings
                        .show
                        .insert(key.trim().to_string(), value.eq_ignore_ascii_case("true"));
                }
            } else if let Some(head) = line.strip_suffix('{') {
                let name = style_name(head);
                debug!("Found style section: {}", name);
                settings.styles.insert(name.clone(), Style::new());
                current = Some(name);
            } else if line.starts_with('}') {
                current = None;
            } else if let Some(name) = &current {
                if let Some((key, value)) = line.split_once(':') {
                    if let Some(style) = settings.styles.get_mut(name) {
                        style.set(property_part(key), property_part(value));
                    }
                }
            }
        }

        settings
    }

    /// Value of a toggle, if the settings define it
    pub fn toggle(&self, key: &str) -> Option<bool> {
        self.show.get(key).copied()
    }

    /// Missing toggles count as hidden
    pub fn is_shown(&self, key: &str) -> bool {
        self.toggle(key).unwrap_or(false)
    }

    pub fn style(&self, name: &str) -> Option<&Style> {
        self.styles.get(name)
    }

    /// Whether unshown items get explicit hide blocks; defaults to true
    pub fn hide_unshown_items(&self) -> bool {
        self.toggle(HIDE_UNSHOWN_ITEMS).unwrap_or(true)
    }
}

fn style_name(head: &str) -> String {
    head.trim_matches(|c: char| c == '"' || c == ':' || c.is_whitespace())
        .to_string()
}

fn property_part(part: &str) -> &str {
    part.trim_matches(|c: char| c == '"' || c == ',' || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SETTINGS: &str = r#"
# Leveling
SHOW_LEVELING_ARMOUR = true
SHOW_LEVELING_EVASION = False # not for now
SHOW_ENDGAME_T1_ARMOUR=TRUE

"Leveling Armour": {
    "MinimapIconSize": "Large",
    "MinimapIconColour": "White",
    "MinimapIconShape": "Circle",
    "TextColor": "255 255 255",
    "SetFontSize": 40,
}

"Endgame Tier 1" {
    # comment inside style
    "PlayAlertSound": "1 300"
}
"#;

    #[test]
    fn test_parse_toggles() {
        let settings = FilterSettings::parse(SETTINGS);
        assert_eq!(settings.toggle("SHOW_LEVELING_ARMOUR"), Some(true));
        assert_eq!(settings.toggle("SHOW_LEVELING_EVASION"), Some(false));
        assert_eq!(settings.toggle("SHOW_ENDGAME_T1_ARMOUR"), Some(true));
        assert!(!settings.is_shown("SHOW_LEVELING_ES"));
    }

    #[test]
    fn test_parse_styles() {
        let settings = FilterSettings::parse(SETTINGS);
        let style = settings.style("Leveling Armour").unwrap();
        let props: Vec<_> = style.iter().collect();
        assert_eq!(
            props,
            [
                ("MinimapIconSize", "Large"),
                ("MinimapIconColour", "White"),
                ("MinimapIconShape", "Circle"),
                ("TextColor", "255 255 255"),
                ("SetFontSize", "40"),
            ]
        );

        let tier1 = settings.style("Endgame Tier 1").unwrap();
        assert_eq!(tier1.len(), 1);
        assert_eq!(tier1.get("PlayAlertSound"), Some("1 300"));
    }

    #[test]
    fn test_reopened_style_is_reset() {
        let text = "\"A\": {\n\"X\": \"1\"\n}\n\"A\": {\n\"Y\": \"2\"\n}\n";
        let settings = FilterSettings::parse(text);
        let style = settings.style("A").unwrap();
        assert_eq!(style.get("X"), None);
        assert_eq!(style.get("Y"), Some("2"));
    }

    #[test]
    fn test_unmatched_braces_are_lenient() {
        let text = "}\n\"Open\": {\n\"TextColor\": \"1 2 3\"\nSHOW_X = true\n";
        let settings = FilterSettings::parse(text);
        assert_eq!(settings.style("Open").unwrap().get("TextColor"), Some("1 2 3"));
        assert!(settings.is_shown("SHOW_X"));
    }

    #[test]
    fn test_property_outside_style_ignored() {
        let settings = FilterSettings::parse("\"TextColor\": \"1 2 3\"\n");
        assert!(settings.styles.is_empty());
        assert!(settings.show.is_empty());
    }

    #[test]
    fn test_style_set_keeps_position() {
        let mut style = Style::new();
        style.set("A", "1");
        style.set("B", "2");
        style.set("A", "3");
        let props: Vec<_> = style.iter().collect();
        assert_eq!(props, [("A", "3"), ("B", "2")]);
    }

    #[test]
    fn test_hide_unshown_items_default() {
        assert!(FilterSettings::parse("").hide_unshown_items());
        assert!(!FilterSettings::parse("HIDE_UNSHOWN_ITEMS = false").hide_unshown_items());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FilterSettings::load(&dir.path().join("filtersettings.txt")).is_err());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filtersettings.txt");
        fs::write(&path, SETTINGS).unwrap();
        let settings = FilterSettings::load(&path).unwrap();
        assert_eq!(settings.styles.len(), 2);
    }
}
