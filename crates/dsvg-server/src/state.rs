//! Application state.

use std::sync::Arc;

use dsvg_core::{BasicRenderer, Converter};

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Converter shared with blocking conversion tasks.
    pub(crate) converter: Arc<Converter<BasicRenderer>>,
}
