//! Error types for diagram conversion.

/// XML parsing error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Syntax error reported by the XML reader.
    #[error("XML syntax error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Text could not be decoded.
    #[error("XML encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Input is not valid UTF-8.
    #[error("input is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Input contains no element at all.
    #[error("document has no root element")]
    NoRoot,

    /// Input ended while an element was still open.
    #[error("unclosed element <{0}>")]
    Unclosed(String),

    /// Closing tag without a matching opening tag.
    #[error("unexpected closing tag </{0}>")]
    UnexpectedEnd(String),

    /// Element or text after the document element was closed.
    #[error("content after the document element")]
    TrailingContent,
}

/// Failure to recover the graph model from a diagram container.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// The document has no `diagram` element.
    #[error("input is not a draw.io diagram file: no <diagram> element found")]
    NotADiagram,

    /// The `diagram` element has neither a graph model nor encoded text.
    #[error(
        "diagram has no mxGraphModel (uncompressed) nor text content (compressed), \
         is it a draw.io file at all?"
    )]
    MissingModel,

    /// The encoded payload could not be base64-decoded or inflated.
    #[error("corrupt diagram payload: {0}")]
    CorruptPayload(#[source] PayloadError),

    /// The container or the recovered model is not well-formed XML.
    #[error("XML parse error: {0}")]
    XmlParse(#[from] ParseError),
}

/// Stage of payload decoding that failed.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PayloadError {
    /// Base64 decoding failed.
    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Raw inflate failed.
    #[error("inflate failed: {0}")]
    Inflate(#[from] std::io::Error),

    /// Inflated or percent-decoded bytes are not UTF-8.
    #[error("decoded payload is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// A `%` is not followed by two hex digits.
    #[error("malformed percent escape at byte {0}")]
    PercentEscape(usize),
}

impl From<PayloadError> for DecodeError {
    fn from(err: PayloadError) -> Self {
        Self::CorruptPayload(err)
    }
}

/// Failure inside a [`Renderer`](crate::Renderer).
#[derive(Debug, thiserror::Error)]
#[error("render error: {0}")]
pub struct RenderError(pub String);

/// Error from a full conversion.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// Diagram decoding failed.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Rendering the graph model failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}
