//! CLI argument definitions for poe2filter

use clap::Parser;
use poe2filter::Layout;
use std::path::PathBuf;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "poe2filter")]
#[command(about = "Generate a Path of Exile 2 loot filter from item base files", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding bases/, filtersettings.txt and filterbase.filter
    #[arg(short, long, env = "POE2FILTER_ROOT")]
    pub root: Option<PathBuf>,

    /// Item base directory (default: <root>/bases)
    #[arg(long)]
    pub bases: Option<PathBuf>,

    /// Settings file (default: <root>/filtersettings.txt)
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Filter template appended after the generated show blocks
    /// (default: <root>/filterbase.filter)
    #[arg(long)]
    pub base_filter: Option<PathBuf>,

    /// Generated filter (default: <root>/filter.filter)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file (default: <config dir>/poe2filter/config.toml)
    #[arg(long, env = "POE2FILTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Resolve paths: command line first, then config file, then defaults under the root
    pub fn layout(&self, config: &Config) -> Layout {
        let root = self
            .root
            .clone()
            .or_else(|| config.root.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        let mut layout = Layout::new(root);

        if let Some(bases) = self.bases.clone().or_else(|| config.bases.clone()) {
            layout.bases = bases;
        }
        if let Some(settings) = self.settings.clone().or_else(|| config.settings.clone()) {
            layout.settings = settings;
        }
        if let Some(base_filter) = self.base_filter.clone().or_else(|| config.base_filter.clone()) {
            layout.base_filter = base_filter;
        }
        if let Some(output) = self.output.clone().or_else(|| config.output.clone()) {
            layout.output = output;
        }

        layout
    }

    /// Default log filter for the requested verbosity
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "poe2filter=warn",
            1 => "poe2filter=info",
            _ => "poe2filter=debug",
        }
    }
}
