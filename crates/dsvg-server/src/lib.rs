//! HTTP server converting draw.io diagrams to SVG.
//!
//! Every path accepts `POST` with a draw.io document as the body and answers
//! with `image/svg+xml`. Add `?minify=1` to minify the result. Other methods
//! get `405 Method Not Allowed`.
//!
//! # Quick Start
//!
//! ```ignore
//! use dsvg_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_owned(),
//!         port: 3000,
//!         ..Default::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use dsvg_core::{BasicRenderer, Converter, RenderOptions};
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Log decompressed diagram XML.
    pub verbose: bool,
    /// Renderer options.
    pub render: RenderOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 3000,
            verbose: false,
            render: RenderOptions::default(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the listener fails.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let converter = Converter::new(BasicRenderer::new())
        .with_render_options(config.render)
        .with_verbose(config.verbose);
    let state = Arc::new(AppState {
        converter: Arc::new(converter),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from dsvg config.
#[must_use]
pub fn server_config_from_config(config: &dsvg_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        verbose: config.logging.verbose,
        render: RenderOptions {
            alternate_content: config.render.alternate_content,
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_server_config_from_config() {
        let mut config = dsvg_config::Config::default();
        config.server.port = 8080;
        config.logging.verbose = true;
        config.render.alternate_content = true;

        let server = server_config_from_config(&config);
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
        assert!(server.verbose);
        assert!(server.render.alternate_content);
    }
}
