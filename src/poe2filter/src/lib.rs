//! # poe2filter
//!
//! Loot filter generator for Path of Exile 2.
//!
//! This library provides functionality to:
//! - Parse the plain-text item base references under `bases/`
//! - Load the user's show toggles and named styles from `filtersettings.txt`
//! - Classify every base into the setting that controls it and, for end-game
//!   defense bases, resolve its tier
//! - Render `Show`/`Hide` blocks and assemble a complete `.filter` file
//!
//! ## Example
//!
//! ```no_run
//! use poe2filter::{generate, Layout};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let layout = Layout::new(".");
//! let summary = generate(&layout)?;
//! println!("{} show blocks, {} hide blocks", summary.show_blocks, summary.hide_blocks);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

pub mod assemble;
pub mod classify;
pub mod fs;
pub mod items;
pub mod layout;
pub mod parser;
pub mod render;
pub mod settings;
pub mod tier;

#[doc(inline)]
pub use assemble::{generate, FilterDocument, Summary};
#[doc(inline)]
pub use items::{AreaLevel, BaseItem, DefenseStats, Item, ItemKind, WeaponStats};
#[doc(inline)]
pub use layout::{Layout, Slot, DEFENSE_SLOTS};
#[doc(inline)]
pub use render::RenderedBlock;
#[doc(inline)]
pub use settings::{FilterSettings, Style};

/// Errors from filter generation
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: invalid {field} value {value:?}", .path.display())]
    InvalidField {
        path: PathBuf,
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("Invalid area level: {0:?}")]
    InvalidAreaLevel(String),
}

pub type Result<T> = std::result::Result<T, Error>;
