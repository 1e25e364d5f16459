//! Graph model to SVG rendering.
//!
//! The [`Renderer`] trait is the seam between decoding and minification.
//! [`BasicRenderer`] is a small implementation covering boxes, ellipses,
//! rhombi, straight edges and labels.

mod basic;
mod stylesheet;

pub use basic::BasicRenderer;
pub use stylesheet::{CellStyle, StyleMap, Stylesheet, parse_cell_style};

use crate::error::RenderError;
use crate::tree::Element;

/// Rendering strategy switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Wrap HTML labels in `<switch>` with a plain `<text>` fallback.
    pub alternate_content: bool,
}

/// Turns an `mxGraphModel` element into an `svg` element tree.
pub trait Renderer: Send + Sync {
    /// Render the graph model.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be rendered.
    fn render(
        &self,
        model: &Element,
        stylesheet: &Stylesheet,
        options: &RenderOptions,
    ) -> Result<Element, RenderError>;
}
