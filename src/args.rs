//! Command-line interface, using `clap`'s derive API. The only required
//! input is the config file; everything else overrides a value the config
//! already supplies.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Path to the TOML config file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override `threads` from the config file.
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Override `restart` from the config file (forces a fresh crawl).
    #[arg(long, default_value_t = false)]
    pub restart: bool,

    /// Emit debug-level logs instead of info-level.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
