//! `dsvg serve` command implementation.

use clap::Args;
use dsvg_config::CliSettings;
use dsvg_server::{run_server, server_config_from_config};

use super::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config and `PORT`).
    #[arg(short, long)]
    port: Option<u16>,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let config = global.load_config(CliSettings {
            host: self.host,
            port: self.port,
            ..Default::default()
        })?;
        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            config = ?config.config_path,
            "Loaded server configuration"
        );

        if !config.logging.quiet {
            let output = Output::new();
            output.info(&format!(
                "Starting server on {}:{}",
                config.server.host, config.server.port
            ));
            if let Some(path) = &config.config_path {
                output.info(&format!("Config file: {}", path.display()));
            }
        }

        run_server(server_config_from_config(&config))
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
