//! Streaming construction of the generic tree on top of quick-xml.
//!
//! Elements under construction live on an explicit stack. Closing an element
//! pops it, collapses it if it only carried text, and attaches it to the
//! element below, or to the document node once the stack is empty.

use quick_xml::Reader;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

use super::{XmlElement, XmlValue};

/// Errors produced while building the tree.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed XML at byte {position}: {source}")]
    Syntax {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },
    #[error("malformed attribute at byte {position}: {source}")]
    Attribute {
        position: usize,
        #[source]
        source: AttrError,
    },
    #[error("invalid UTF-8 in {0}")]
    Encoding(&'static str),
    #[error("character data outside the root element at byte {0}")]
    TextOutsideRoot(usize),
    #[error("document ended inside <{0}>")]
    UnexpectedEof(String),
    #[error("second root element <{0}>")]
    MultipleRoots(String),
}

/// An element whose closing tag has not been seen yet.
struct Frame {
    tag: String,
    element: XmlElement,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>, position: usize) -> Result<Self, XmlError> {
        let tag = utf8(start.name().as_ref(), "tag name")?.to_owned();
        let mut element = XmlElement::default();
        for attr in start.attributes() {
            let attr = attr.map_err(|source| XmlError::Attribute { position, source })?;
            let key = utf8(attr.key.as_ref(), "attribute name")?.to_owned();
            let value = attr
                .unescape_value()
                .map_err(|source| XmlError::Syntax { position, source })?
                .into_owned();
            element.attributes.insert(key, value);
        }
        Ok(Self {
            tag,
            element,
            text: String::new(),
        })
    }

    /// Finish the element. Text is kept only on elements without child
    /// elements, and an element holding nothing but text becomes that text.
    fn close(self) -> (String, XmlValue) {
        let Frame {
            tag,
            mut element,
            text,
        } = self;
        if element.has_children() || text.is_empty() {
            return (tag, XmlValue::Element(element));
        }
        if element.attributes.is_empty() {
            return (tag, XmlValue::Text(text));
        }
        element.text = Some(text);
        (tag, XmlValue::Element(element))
    }
}

/// Parse a complete document.
///
/// The returned element is a synthetic document node whose only child is the
/// document's root element, keyed by its tag.
pub fn parse(xml: &[u8]) -> Result<XmlElement, XmlError> {
    let mut reader = Reader::from_reader(xml);
    reader.expand_empty_elements(true);

    let mut buf = Vec::new();
    let mut document = XmlElement::default();
    let mut open: Vec<Frame> = Vec::new();

    loop {
        let position = reader.buffer_position();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(start)) => {
                let frame = Frame::open(&start, position)?;
                if open.is_empty() && document.has_children() {
                    return Err(XmlError::MultipleRoots(frame.tag));
                }
                open.push(frame);
            }
            Ok(Event::Text(text)) => {
                let text = text
                    .unescape()
                    .map_err(|source| XmlError::Syntax { position, source })?;
                match open.last_mut() {
                    Some(frame) => frame.text.push_str(&text),
                    // Only whitespace may surround the root element.
                    None if is_xml_whitespace(&text) => {}
                    None => return Err(XmlError::TextOutsideRoot(position)),
                }
            }
            Ok(Event::CData(cdata)) => {
                let bytes = cdata.into_inner();
                let text = utf8(&bytes, "CDATA section")?;
                match open.last_mut() {
                    Some(frame) => frame.text.push_str(text),
                    None => return Err(XmlError::TextOutsideRoot(position)),
                }
            }
            // The reader rejects closing tags that do not match the open one,
            // so a frame is always present here.
            Ok(Event::End(_)) => {
                if let Some(frame) = open.pop() {
                    let (tag, value) = frame.close();
                    match open.last_mut() {
                        Some(parent) => parent.element.insert_child(tag, value),
                        None => document.insert_child(tag, value),
                    }
                }
            }
            Ok(Event::Eof) => break,
            // Declarations, comments, processing instructions and doctypes
            // carry nothing for the tree.
            Ok(_) => {}
            Err(source) => {
                return Err(XmlError::Syntax {
                    position: reader.buffer_position(),
                    source,
                });
            }
        }
        buf.clear();
    }

    if let Some(frame) = open.pop() {
        return Err(XmlError::UnexpectedEof(frame.tag));
    }
    Ok(document)
}

fn is_xml_whitespace(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

fn utf8<'a>(bytes: &'a [u8], what: &'static str) -> Result<&'a str, XmlError> {
    std::str::from_utf8(bytes).map_err(|_| XmlError::Encoding(what))
}
