//! draw.io diagram to SVG conversion.
//!
//! This crate turns a draw.io document into an SVG string:
//!
//! - [`DiagramDecoder`] finds the `<diagram>` payload and recovers the
//!   `mxGraphModel`, inflating compressed payloads
//! - a [`Renderer`] draws the model as an SVG element tree
//! - [`minify`] rewrites that tree into a compact form with shared classes
//!
//! [`Converter`] wires the stages together.
//!
//! # Quick Start
//!
//! ```
//! use dsvg_core::{BasicRenderer, ConvertOptions, Converter};
//!
//! let input = br#"<mxfile><diagram><mxGraphModel><root>
//!     <mxCell id="0"/><mxCell id="1" parent="0"/>
//!     <mxCell id="2" value="Hello" vertex="1" parent="1">
//!       <mxGeometry x="0" y="0" width="80" height="30" as="geometry"/>
//!     </mxCell>
//! </root></mxGraphModel></diagram></mxfile>"#;
//!
//! let converter = Converter::new(BasicRenderer::new());
//! let svg = converter.convert(input, ConvertOptions::minified()).unwrap();
//! assert!(svg.starts_with("<svg"));
//! ```

mod class_name;
mod convert;
mod decode;
mod error;
mod minify;
mod parser;
mod render;
mod serializer;
mod style;
mod tree;

use std::time::Instant;

pub use class_name::{ClassNames, class_name};
pub use convert::{ConvertOptions, Converter};
pub use decode::{DIAGRAM_TAG, DiagramDecoder, GRAPH_MODEL_TAG, decode_payload, encode_payload};
pub use error::{ConvertError, DecodeError, ParseError, PayloadError, RenderError};
pub use minify::{ClassTable, MinifyReport, PRESENTATION_ATTRIBUTES, minify};
pub use parser::XmlParser;
pub use render::{
    BasicRenderer, CellStyle, RenderOptions, Renderer, StyleMap, Stylesheet, parse_cell_style,
};
pub use serializer::serialize;
pub use style::{StyleDeclaration, locale_cmp, parse_style};
pub use tree::{Element, Node};

/// Milliseconds elapsed since `start`.
pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
