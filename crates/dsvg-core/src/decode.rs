//! Recovery of the graph model from a draw.io container.
//!
//! A `<diagram>` element either nests an `<mxGraphModel>` directly, or holds
//! the model as text that was percent-encoded, raw-deflated and base64-encoded
//! (in that order).

use std::io::{Read, Write};
use std::time::Instant;

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::elapsed_ms;
use crate::error::{DecodeError, PayloadError};
use crate::parser::XmlParser;
use crate::tree::Element;

/// Tag of the payload element in a container.
pub const DIAGRAM_TAG: &str = "diagram";
/// Tag of the graph model document element.
pub const GRAPH_MODEL_TAG: &str = "mxGraphModel";

/// Base64 engine accepting payloads with or without trailing padding.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Characters escaped by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Extracts the graph model from a diagram container.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagramDecoder {
    verbose: bool,
}

impl DiagramDecoder {
    /// Create a decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log the inflated model XML at `info` level.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Decode raw container bytes into the `mxGraphModel` element.
    ///
    /// Only the first `<diagram>` in document order is used.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NotADiagram`] if there is no `<diagram>`,
    /// [`DecodeError::MissingModel`] if it is empty,
    /// [`DecodeError::CorruptPayload`] if the encoded text cannot be decoded and
    /// [`DecodeError::XmlParse`] if either XML document is malformed.
    pub fn decode(&self, input: &[u8]) -> Result<Element, DecodeError> {
        let start = Instant::now();
        let container = XmlParser::new().parse_bytes(input)?;
        tracing::info!(elapsed_ms = elapsed_ms(start), "Parsed container XML");

        let diagram = container
            .find(DIAGRAM_TAG)
            .ok_or(DecodeError::NotADiagram)?;

        if let Some(model) = diagram.find_descendant(GRAPH_MODEL_TAG) {
            tracing::info!("Diagram is uncompressed, using as is");
            return Ok(model.clone());
        }

        let payload = diagram.text_content();
        if payload.trim().is_empty() {
            return Err(DecodeError::MissingModel);
        }

        let xml = decode_payload(&payload)?;
        if self.verbose {
            tracing::info!(xml = %xml, "Decompressed diagram");
        } else {
            tracing::info!("Decompressed diagram, set DRAWIO_VERBOSE=1 to see it");
        }

        let start = Instant::now();
        let model = XmlParser::new().parse(&xml)?;
        tracing::info!(elapsed_ms = elapsed_ms(start), "Parsed graph model XML");
        Ok(model)
    }
}

/// Decode an encoded diagram payload back to graph-model XML text.
///
/// Whitespace inside the payload is ignored.
///
/// # Errors
///
/// Returns an error if base64 decoding or raw inflate fails, if the inflated
/// text holds a malformed percent escape, or if the result is not UTF-8.
pub fn decode_payload(payload: &str) -> Result<String, PayloadError> {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

    let start = Instant::now();
    let compressed = LENIENT_BASE64.decode(compact)?;
    tracing::info!(elapsed_ms = elapsed_ms(start), "Base64 decoded payload");

    let start = Instant::now();
    let mut inflated = Vec::with_capacity(compressed.len() * 4);
    DeflateDecoder::new(compressed.as_slice()).read_to_end(&mut inflated)?;
    tracing::info!(elapsed_ms = elapsed_ms(start), "Inflated payload");

    let start = Instant::now();
    let encoded = std::str::from_utf8(&inflated)?;
    check_percent_escapes(encoded)?;
    let xml = percent_decode_str(encoded).decode_utf8()?.into_owned();
    tracing::info!(elapsed_ms = elapsed_ms(start), "URI-decoded payload");

    Ok(xml)
}

/// Reject any `%` not followed by two hex digits.
fn check_percent_escapes(encoded: &str) -> Result<(), PayloadError> {
    let bytes = encoded.as_bytes();
    for (pos, _) in encoded.match_indices('%') {
        let valid = bytes
            .get(pos + 1..pos + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            return Err(PayloadError::PercentEscape(pos));
        }
    }
    Ok(())
}

/// Encode graph-model XML text the way draw.io stores compressed diagrams.
///
/// # Errors
///
/// Returns an error if the deflate stream cannot be written.
pub fn encode_payload(xml: &str) -> std::io::Result<String> {
    let encoded = utf8_percent_encode(xml, URI_COMPONENT).to_string();
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(encoded.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(STANDARD.encode(compressed))
}
