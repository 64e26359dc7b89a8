mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::Cli;
use config::Config;

fn init_logging(cli: &Cli) {
    // -v overrides RUST_LOG
    let filter = if cli.verbose > 0 {
        EnvFilter::new(cli.log_filter())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = Config::load(cli.config.as_deref())?;
    let layout = cli.layout(&config);
    debug!("Resolved layout: {:?}", layout);

    let summary = poe2filter::generate(&layout)
        .with_context(|| format!("Failed to generate {}", layout.output.display()))?;

    println!(
        "Wrote {} ({} show blocks, {} leveling, {} hide blocks)",
        summary.output.display(),
        summary.show_blocks,
        summary.leveling_blocks,
        summary.hide_blocks
    );

    Ok(())
}
