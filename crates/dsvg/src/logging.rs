//! Tracing subscriber setup.

use dsvg_config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber, writing to stderr.
///
/// Quiet mode turns logging off, verbose mode logs everything at `info`,
/// otherwise `RUST_LOG` applies.
pub(crate) fn init(logging: &LoggingConfig) {
    let filter = match directive(logging) {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Fixed filter directive for the config, if it overrides `RUST_LOG`.
fn directive(logging: &LoggingConfig) -> Option<&'static str> {
    if logging.quiet {
        Some("off")
    } else if logging.verbose {
        Some("info")
    } else {
        None
    }
}
