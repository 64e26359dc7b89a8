//! Filter assembly
//!
//! One run loads the settings, walks every base category, classifies and
//! renders each base, and writes the sections below to the output file:
//!
//! ```text
//! ### Endgame Tier 1 Show Blocks ###
//! ### Endgame Tier 2 Show Blocks ###
//! ### Skill Weapon Show Blocks ###
//! ### Quiver Show Blocks ###
//! ### Leveling Show Blocks ###     (highest level first)
//! ### Rare Item Safeguard ###
//! <filterbase.filter>
//! ### Hide Blocks ###              (only with HIDE_UNSHOWN_ITEMS)
//! ```

use std::cmp::Reverse;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::classify::{
    defense_setting_key, defense_style, defense_token, endgame_style, quiver_setting_key, Groups,
    SkillGroup, Stage, WeaponGroup, LEVELING_MARTIAL_STYLE,
};
use crate::fs::{list_files_with_extension, read_text, walk_files_with_extension, write_atomic};
use crate::items::{Item, ItemKind};
use crate::layout::{Layout, Slot, BASE_FILE_EXTENSION, DEFENSE_SLOTS};
use crate::parser::{defense, quiver, skill, weapon, DefenseBlock};
use crate::render::{
    consolidated_weapon_block, defense_hide_block, endgame_defense_block, leveling_defense_block,
    skill_weapon_block, skill_weapon_hide_block, weapon_block, RenderedBlock,
};
use crate::settings::FilterSettings;
use crate::tier::TierIndex;
use crate::{Error, Result};

const RARE_SAFEGUARD: &str = "\n### Rare Item Safeguard ###\nShow\nRarity >= Rare\n\n";

/// Counts reported after a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub show_blocks: usize,
    pub leveling_blocks: usize,
    /// Hide blocks written; zero when unshown items are not hidden
    pub hide_blocks: usize,
    pub output: PathBuf,
}

/// Every rendered block of a run, bucketed by output section
#[derive(Debug, Clone, Default)]
pub struct FilterDocument {
    pub endgame_t1: Vec<RenderedBlock>,
    pub endgame_t2: Vec<RenderedBlock>,
    pub skill_weapons: Vec<RenderedBlock>,
    pub quivers: Vec<RenderedBlock>,
    pub leveling: Vec<RenderedBlock>,
    /// Defense, martial, skill weapon and quiver hides, in that order
    pub hidden: Vec<RenderedBlock>,
    pub base_filter: Option<String>,
    pub hide_unshown_items: bool,
}

impl FilterDocument {
    /// Parse, classify and render every base under the layout
    pub fn build(layout: &Layout, settings: &FilterSettings) -> Result<Self> {
        let mut builder = Builder {
            layout,
            settings,
            tiers: TierIndex::new(&layout.bases),
            doc: Self {
                hide_unshown_items: settings.hide_unshown_items(),
                ..Default::default()
            },
        };

        builder.defense()?;
        builder.martial_weapons()?;
        builder.skill_weapons()?;
        builder.quivers()?;

        let mut doc = builder.doc;
        if layout.base_filter.is_file() {
            doc.base_filter = Some(read_text(&layout.base_filter)?);
        }
        Ok(doc)
    }

    fn push_endgame(&mut self, tier: u8, block: RenderedBlock) {
        if tier == 1 {
            self.endgame_t1.push(block);
        } else {
            self.endgame_t2.push(block);
        }
    }

    /// Leveling blocks, highest level first; ties keep their order
    pub fn sorted_leveling(&self) -> Vec<&RenderedBlock> {
        let mut blocks: Vec<_> = self.leveling.iter().collect();
        blocks.sort_by_key(|b| Reverse(b.level));
        blocks
    }

    /// Full filter text
    pub fn render(&self) -> String {
        let mut out = String::from("### Endgame Tier 1 Show Blocks ###\n");
        push_blocks(&mut out, &self.endgame_t1);

        out.push_str("\n### Endgame Tier 2 Show Blocks ###\n");
        push_blocks(&mut out, &self.endgame_t2);

        out.push_str("\n### Skill Weapon Show Blocks ###\n");
        push_blocks(&mut out, &self.skill_weapons);

        out.push_str("\n### Quiver Show Blocks ###\n");
        push_blocks(&mut out, &self.quivers);

        out.push_str("\n### Leveling Show Blocks ###\n");
        for block in self.sorted_leveling() {
            out.push_str(block.as_str());
        }

        out.push_str(RARE_SAFEGUARD);

        if let Some(base) = &self.base_filter {
            out.push_str(base);
        }

        if self.hide_unshown_items {
            out.push_str("\n### Hide Blocks ###\n");
            push_blocks(&mut out, &self.hidden);
        }

        out
    }

    pub fn write_to(&self, out: &mut dyn Write) -> std::io::Result<()> {
        out.write_all(self.render().as_bytes())
    }

    pub fn summary(&self, output: PathBuf) -> Summary {
        Summary {
            show_blocks: self.endgame_t1.len()
                + self.endgame_t2.len()
                + self.skill_weapons.len()
                + self.quivers.len()
                + self.leveling.len(),
            leveling_blocks: self.leveling.len(),
            hide_blocks: if self.hide_unshown_items {
                self.hidden.len()
            } else {
                0
            },
            output,
        }
    }
}

fn push_blocks(out: &mut String, blocks: &[RenderedBlock]) {
    for block in blocks {
        out.push_str(block.as_str());
    }
}

/// Generate the filter described by `layout`
///
/// The output is replaced atomically; on failure the previous file is left
/// untouched and the error is logged and returned.
pub fn generate(layout: &Layout) -> Result<Summary> {
    match run(layout) {
        Ok(summary) => {
            info!(
                "Wrote {} ({} show blocks, {} hide blocks)",
                summary.output.display(),
                summary.show_blocks,
                summary.hide_blocks
            );
            Ok(summary)
        }
        Err(e) => {
            error!("Error generating filter: {}", e);
            Err(e)
        }
    }
}

fn run(layout: &Layout) -> Result<Summary> {
    let settings = FilterSettings::load(&layout.settings)?;
    let doc = FilterDocument::build(layout, &settings)?;

    write_atomic(&layout.output, |out| {
        doc.write_to(out).map_err(|source| Error::Write {
            path: layout.output.clone(),
            source,
        })
    })?;

    Ok(doc.summary(layout.output.clone()))
}

struct Builder<'a> {
    layout: &'a Layout,
    settings: &'a FilterSettings,
    tiers: TierIndex,
    doc: FilterDocument,
}

impl Builder<'_> {
    fn defense(&mut self) -> Result<()> {
        let mut endgame: Groups<(Slot, String, u8), String> = Groups::new();

        for slot in DEFENSE_SLOTS {
            let files = list_files_with_extension(&self.layout.slot_dir(slot), BASE_FILE_EXTENSION)?;
            for path in files {
                let token = defense_token(&path);
                let blocks = defense::parse_file(&path)?;
                debug!("Parsed {} blocks from {}", blocks.len(), path.display());

                for block in &blocks {
                    self.defense_block(slot, &token, block, &path, &mut endgame)?;
                }
            }
        }

        for ((slot, token, tier), names) in endgame.iter() {
            let block = endgame_defense_block(
                self.settings,
                names,
                *slot,
                token,
                *tier,
                &endgame_style(*tier),
            );
            self.doc.push_endgame(*tier, block);
        }

        Ok(())
    }

    fn defense_block(
        &mut self,
        slot: Slot,
        token: &str,
        block: &DefenseBlock,
        path: &Path,
        endgame: &mut Groups<(Slot, String, u8), String>,
    ) -> Result<()> {
        let Some(item) = block.to_item(path) else {
            debug!("Skipping block at {}:{}", path.display(), block.line);
            return Ok(());
        };
        let area_level = &item.base.area_level;

        let stage = if area_level.is_open_ended() {
            Stage::Endgame {
                tier: self.tiers.resolve(slot, token, &block.values)?,
            }
        } else {
            Stage::Leveling
        };
        let key = defense_setting_key(slot, token, stage);
        debug!("{} -> {}", item.name(), key);

        if !self.settings.is_shown(&key) {
            self.doc.hidden.push(defense_hide_block(item.name()));
            return Ok(());
        }

        match (stage, area_level.max()) {
            (Stage::Endgame { tier }, _) => {
                endgame.push((slot, token.to_string(), tier), item.base.name.clone());
            }
            (Stage::Leveling, Some(max)) => {
                let block = leveling_defense_block(
                    self.settings,
                    item.name(),
                    slot,
                    token,
                    (area_level.min(), max),
                    &defense_style(slot, token, stage),
                );
                self.doc.leveling.push(block);
            }
            (Stage::Leveling, None) => {}
        }

        Ok(())
    }

    fn martial_weapons(&mut self) -> Result<()> {
        let mut endgame: Groups<(u8, String), Item> = Groups::new();
        let mut leveling: Groups<(String, u32), Item> = Groups::new();

        for path in walk_files_with_extension(&self.layout.martial_weapons_dir(), BASE_FILE_EXTENSION) {
            let items = weapon::parse_file(&path)?;
            debug!("Parsed {} weapons from {}", items.len(), path.display());

            for item in items {
                let Some(group) = WeaponGroup::classify(&item) else {
                    debug!("{} has no declared tier", item.name());
                    continue;
                };

                let key = group.setting_key();
                debug!("{} -> {}", item.name(), key);
                if !self.settings.is_shown(&key) {
                    self.doc.hidden.push(weapon_block(self.settings, &item, None));
                    continue;
                }

                match group {
                    WeaponGroup::Endgame { tier, weapon_type } => {
                        endgame.push((tier, weapon_type), item);
                    }
                    WeaponGroup::Leveling {
                        weapon_type,
                        max_level: Some(max),
                    } => leveling.push((weapon_type, max), item),
                    WeaponGroup::Leveling { max_level: None, .. } => {
                        debug!("{} has no maximum area level", item.name());
                    }
                }
            }
        }

        for ((tier, _), items) in endgame.iter() {
            if let Some(block) =
                consolidated_weapon_block(self.settings, items, &endgame_style(*tier), None)
            {
                self.doc.push_endgame(*tier, block);
            }
        }

        for ((_, max), items) in leveling.iter() {
            if let Some(block) =
                consolidated_weapon_block(self.settings, items, LEVELING_MARTIAL_STYLE, Some(*max))
            {
                self.doc.leveling.push(block);
            }
        }

        Ok(())
    }

    fn skill_weapons(&mut self) -> Result<()> {
        let mut groups: Groups<SkillGroup, Item> = Groups::new();

        for path in list_files_with_extension(&self.layout.skill_weapons_dir(), BASE_FILE_EXTENSION)? {
            let items = skill::parse_file(&path)?;
            debug!("Parsed {} skill weapons from {}", items.len(), path.display());

            for item in items {
                match SkillGroup::classify(&item) {
                    Some(group) => groups.push(group, item),
                    None => debug!("{} is not a wand, staff or sceptre", item.name()),
                }
            }
        }

        for (group, items) in groups.iter() {
            if self.settings.is_shown(&group.setting_key()) {
                self.doc
                    .skill_weapons
                    .push(skill_weapon_block(self.settings, group, items));
            } else {
                self.doc
                    .hidden
                    .extend(items.iter().map(|item| skill_weapon_hide_block(group, item)));
            }
        }

        Ok(())
    }

    fn quivers(&mut self) -> Result<()> {
        for path in list_files_with_extension(&self.layout.quivers_dir(), BASE_FILE_EXTENSION)? {
            let items = quiver::parse_file(&path)?;
            debug!("Parsed {} quivers from {}", items.len(), path.display());

            for item in &items {
                let ItemKind::Quiver { implicit_effect } = &item.kind else {
                    continue;
                };
                let Some(key) = quiver_setting_key(implicit_effect) else {
                    debug!("{} has no quiver setting", item.name());
                    continue;
                };

                if self.settings.is_shown(key) {
                    self.doc
                        .quivers
                        .push(weapon_block(self.settings, item, Some(LEVELING_MARTIAL_STYLE)));
                } else {
                    self.doc.hidden.push(weapon_block(self.settings, item, None));
                }
            }
        }

        Ok(())
    }
}
