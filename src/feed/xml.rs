//! Thin helpers over the `quick-xml` writer shared by both renderers.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::Cursor;
use thiserror::Error;

/// Errors from rendering a feed into a string.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to write XML: {0}")]
    Xml(String),
    #[error("Rendered feed contains invalid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

pub(crate) struct XmlDoc {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlDoc {
    /// Starts a pretty-printed document with a UTF-8 declaration.
    pub(crate) fn new() -> Result<Self, RenderError> {
        let mut doc = Self {
            writer: Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2),
        };
        doc.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(doc)
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), RenderError> {
        self.writer
            .write_event(event)
            .map_err(|e| RenderError::Xml(e.to_string()))
    }

    pub(crate) fn start(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
    ) -> Result<(), RenderError> {
        self.event(Event::Start(element(name, attributes)))
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<(), RenderError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    pub(crate) fn empty(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
    ) -> Result<(), RenderError> {
        self.event(Event::Empty(element(name, attributes)))
    }

    /// `<name>text</name>` with the text escaped.
    pub(crate) fn text_element(&mut self, name: &str, text: &str) -> Result<(), RenderError> {
        self.text_element_with(name, &[], text)
    }

    /// Like [`text_element`](Self::text_element), with attributes on the start tag.
    pub(crate) fn text_element_with(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
        text: &str,
    ) -> Result<(), RenderError> {
        self.start(name, attributes)?;
        self.event(Event::Text(BytesText::new(&xml_chars(text))))?;
        self.end(name)
    }

    pub(crate) fn finish(self) -> Result<String, RenderError> {
        let mut xml = String::from_utf8(self.writer.into_inner().into_inner())?;
        xml.push('\n');
        Ok(xml)
    }
}

fn element<'a>(name: &'a str, attributes: &[(&str, &str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for &(key, value) in attributes {
        start.push_attribute((key, xml_chars(value).as_ref()));
    }
    start
}

/// Drops characters XML 1.0 cannot represent, even escaped: C0 controls other
/// than tab, LF and CR, plus U+FFFE and U+FFFF.
pub(crate) fn xml_chars(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| is_xml_char(c)).collect())
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}
