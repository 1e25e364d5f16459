//! XML parser producing an [`Element`] tree.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::ParseError;
use crate::tree::{Element, Node};

/// Parse XML text into an owned element tree.
///
/// Comments, processing instructions, declarations and doctypes are dropped.
/// CDATA sections become text. Whitespace-only text is dropped unless
/// [`preserve_whitespace`](Self::preserve_whitespace) is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlParser {
    preserve_whitespace: bool,
}

impl XmlParser {
    /// Create a parser that drops whitespace-only text.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep whitespace-only text nodes (needed for inline HTML).
    #[must_use]
    pub fn preserve_whitespace(mut self, preserve: bool) -> Self {
        self.preserve_whitespace = preserve;
        self
    }

    /// Parse UTF-8 bytes and return the document element.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not UTF-8 or not well-formed XML.
    pub fn parse_bytes(&self, input: &[u8]) -> Result<Element, ParseError> {
        self.parse(std::str::from_utf8(input)?)
    }

    /// Parse XML text and return the document element.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a single well-formed XML element.
    pub fn parse(&self, xml: &str) -> Result<Element, ParseError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);
        self.read_document(&mut reader)
    }

    fn read_document<R: BufRead>(&self, reader: &mut Reader<R>) -> Result<Element, ParseError> {
        let mut buf = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut pending = String::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    self.flush_text(&mut pending, &mut stack, root.is_some())?;
                    if root.is_some() {
                        return Err(ParseError::TrailingContent);
                    }
                    stack.push(decode_element(reader, &e)?);
                }
                Event::Empty(e) => {
                    self.flush_text(&mut pending, &mut stack, root.is_some())?;
                    let element = decode_element(reader, &e)?;
                    attach(element, &mut stack, &mut root)?;
                }
                Event::End(e) => {
                    self.flush_text(&mut pending, &mut stack, root.is_some())?;
                    let Some(element) = stack.pop() else {
                        let qname = e.name();
                        let name = reader.decoder().decode(qname.as_ref())?.into_owned();
                        return Err(ParseError::UnexpectedEnd(name));
                    };
                    attach(element, &mut stack, &mut root)?;
                }
                Event::Text(e) => {
                    pending.push_str(&reader.decoder().decode(&e)?);
                }
                Event::GeneralRef(e) => {
                    let entity = reader.decoder().decode(&e)?;
                    pending.push_str(&decode_entity(&entity));
                }
                Event::CData(e) => {
                    pending.push_str(&String::from_utf8_lossy(&e));
                }
                Event::Eof => {
                    self.flush_text(&mut pending, &mut stack, root.is_some())?;
                    if let Some(open) = stack.pop() {
                        return Err(ParseError::Unclosed(open.name));
                    }
                    return root.ok_or(ParseError::NoRoot);
                }
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            }
            buf.clear();
        }
    }

    /// Move accumulated text into the innermost open element.
    fn flush_text(
        &self,
        pending: &mut String,
        stack: &mut [Element],
        root_closed: bool,
    ) -> Result<(), ParseError> {
        if pending.is_empty() {
            return Ok(());
        }
        let text = std::mem::take(pending);
        let blank = text.trim().is_empty();
        match stack.last_mut() {
            Some(parent) if self.preserve_whitespace || !blank => {
                parent.children.push(Node::Text(text));
            }
            Some(_) => {}
            None if root_closed && !blank => return Err(ParseError::TrailingContent),
            None => {}
        }
        Ok(())
    }
}

/// Attach a completed element to its parent, or make it the document root.
fn attach(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> Result<(), ParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(ParseError::TrailingContent);
    }
    *root = Some(element);
    Ok(())
}

fn decode_element<R: BufRead>(
    reader: &Reader<R>,
    e: &BytesStart,
) -> Result<Element, ParseError> {
    let qname = e.name();
    let name = reader.decoder().decode(qname.as_ref())?.into_owned();
    let mut element = Element::new(name);
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = reader.decoder().decode(attr.key.as_ref())?.into_owned();
        let value = attr
            .unescape_value()
            .map_err(quick_xml::Error::from)?
            .into_owned();
        element.set_attr(key, value);
    }
    Ok(element)
}

/// Decode an entity reference to its character value.
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        "nbsp" => "\u{00a0}".to_owned(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        // Unknown entity - preserve as-is
        _ => format!("&{entity};"),
    }
}
