//! Conversion entry point: decode, render, minify and serialize.

use std::time::Instant;

use crate::decode::DiagramDecoder;
use crate::elapsed_ms;
use crate::error::ConvertError;
use crate::minify::minify;
use crate::render::{RenderOptions, Renderer, Stylesheet};
use crate::serializer::serialize;

/// Per-call conversion switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Run the minifier on the rendered SVG.
    pub minify: bool,
}

impl ConvertOptions {
    /// Options with minification enabled.
    #[must_use]
    pub fn minified() -> Self {
        Self { minify: true }
    }
}

/// Converts draw.io documents to SVG text.
///
/// A converter holds no per-conversion state and can be shared between
/// threads.
#[derive(Debug, Clone)]
pub struct Converter<R> {
    renderer: R,
    stylesheet: Stylesheet,
    render_options: RenderOptions,
    decoder: DiagramDecoder,
}

impl<R: Renderer> Converter<R> {
    /// Create a converter using `renderer` and the default stylesheet.
    #[must_use]
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            stylesheet: Stylesheet::default(),
            render_options: RenderOptions::default(),
            decoder: DiagramDecoder::new(),
        }
    }

    /// Replace the default stylesheet.
    #[must_use]
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    /// Set renderer options.
    #[must_use]
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Log decompressed model XML.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.decoder = self.decoder.with_verbose(verbose);
        self
    }

    /// Convert a draw.io document to SVG text.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Decode`] if the document cannot be decoded and
    /// [`ConvertError::Render`] if the renderer fails.
    pub fn convert(&self, input: &[u8], options: ConvertOptions) -> Result<String, ConvertError> {
        let start = Instant::now();
        let model = self.decoder.decode(input)?;
        tracing::info!(decode_ms = elapsed_ms(start), "Decoded diagram");

        let start = Instant::now();
        let mut svg = self
            .renderer
            .render(&model, &self.stylesheet, &self.render_options)?;
        tracing::info!(render_ms = elapsed_ms(start), "Rendered SVG");

        if options.minify {
            let start = Instant::now();
            let report = minify(&mut svg);
            tracing::info!(
                minify_ms = elapsed_ms(start),
                classes = report.classes,
                groups_collapsed = report.groups_collapsed,
                "Minified SVG"
            );
        }

        let start = Instant::now();
        let text = serialize(&svg);
        tracing::info!(
            serialize_ms = elapsed_ms(start),
            bytes = text.len(),
            "Serialized SVG"
        );
        Ok(text)
    }
}
