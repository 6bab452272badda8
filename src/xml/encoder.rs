//! Streaming encoder
//!
//! [`XmlEncoder`] is the write-side counterpart of the cursor: a thin wrapper
//! over a quick-xml writer producing the request-body fragment. Text content
//! is escaped on write.

use crate::error::{Error, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Streaming XML writer backed by an in-memory buffer
pub struct XmlEncoder {
    writer: Writer<Vec<u8>>,
}

impl XmlEncoder {
    /// Create an empty encoder
    pub fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
        }
    }

    /// Write `<name>content</name>`
    pub fn element(&mut self, name: &str, content: &str) -> Result<()> {
        self.start_element(name)?;
        self.writer
            .write_event(Event::Text(BytesText::new(content)))?;
        self.end_element(name)
    }

    /// Open a container element
    pub fn start_element(&mut self, name: &str) -> Result<()> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))?;
        Ok(())
    }

    /// Close a container element
    pub fn end_element(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Finish writing and return the document fragment
    pub fn into_string(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner())
            .map_err(|e| Error::xml_parse(format!("non-UTF-8 output: {e}")))
    }
}

impl Default for XmlEncoder {
    fn default() -> Self {
        Self::new()
    }
}
