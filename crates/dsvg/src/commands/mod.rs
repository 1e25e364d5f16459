//! CLI command implementations.

pub(crate) mod convert;
pub(crate) mod serve;

use std::path::PathBuf;

use clap::Args;
use dsvg_config::{CliSettings, Config};

pub(crate) use convert::ConvertArgs;
pub(crate) use serve::ServeArgs;

use crate::error::CliError;

/// Options shared by every command.
#[derive(Args, Debug, Default)]
pub(crate) struct GlobalArgs {
    /// Path to configuration file (default: auto-discover dsvg.toml).
    #[arg(short, long, global = true, env = "DSVG_CONFIG")]
    pub(crate) config: Option<PathBuf>,

    /// Log stage timings and decompressed diagram XML.
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,

    /// Disable logging.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub(crate) quiet: bool,
}

impl GlobalArgs {
    /// Load configuration with these flags and command-specific overrides
    /// applied, then start logging.
    pub(crate) fn load_config(&self, overrides: CliSettings) -> Result<Config, CliError> {
        let settings = CliSettings {
            verbose: self.verbose.then_some(true).or(overrides.verbose),
            quiet: self.quiet.then_some(true).or(overrides.quiet),
            ..overrides
        };
        let config = Config::load(self.config.as_deref(), Some(&settings))?;
        crate::logging::init(&config.logging);
        Ok(config)
    }
}
