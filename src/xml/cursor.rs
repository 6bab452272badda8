//! Forward-only streaming decoder
//!
//! [`XmlCursor`] walks a quick-xml event stream one element at a time. Entity
//! decoding is a single pass over [`XmlCursor::scan`]: every start element is
//! dispatched by local name to a field conversion, anything the dispatch does
//! not consume is skipped whole, and the scan terminates only on the end
//! element carrying the wrapper name. Reaching end-of-input first is a
//! truncated-stream error, never a silently partial entity.

use super::codec::{self, WireEnum};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

/// The element the cursor most recently dispatched
#[derive(Debug)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    self_closing: bool,
}

/// Forward-only cursor over one XML document fragment
pub struct XmlCursor<'a> {
    reader: Reader<&'a [u8]>,
    current: Option<Element>,
    consumed: bool,
}

impl<'a> XmlCursor<'a> {
    /// Create a cursor over an XML fragment
    pub fn new(xml: &'a str) -> Self {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            current: None,
            consumed: false,
        }
    }

    /// Advance past the prolog to the document's root element.
    ///
    /// Returns `false` for a self-closing root (nothing to scan). A root with
    /// any other name is a parse error; an empty stream is a truncation.
    pub fn expect_root(&mut self, wrapper: &str) -> Result<bool> {
        loop {
            match self.next_event()? {
                Event::Start(start) => {
                    let name = name_of(start.local_name().as_ref());
                    if name == wrapper {
                        return Ok(true);
                    }
                    return Err(Error::xml_parse(format!(
                        "unexpected root element <{name}>, expected <{wrapper}>"
                    )));
                }
                Event::Empty(start) => {
                    let name = name_of(start.local_name().as_ref());
                    if name == wrapper {
                        return Ok(false);
                    }
                    return Err(Error::xml_parse(format!(
                        "unexpected root element <{name}>, expected <{wrapper}>"
                    )));
                }
                Event::Eof => return Err(Error::truncated(wrapper)),
                _ => {}
            }
        }
    }

    /// Scan the children of the element named `wrapper`.
    ///
    /// `on_child` is called once per start element with the element's local
    /// name; it reads the content through one of the `read_*` methods, or
    /// leaves the element untouched to have it skipped. The only successful
    /// termination is the `</wrapper>` end tag. Nested structures reuse this
    /// same primitive with their own wrapper name.
    pub fn scan<F>(&mut self, wrapper: &str, mut on_child: F) -> Result<()>
    where
        F: FnMut(&mut Self, &str) -> Result<()>,
    {
        // A nested decode begins on the element the enclosing scan just
        // dispatched; enter it instead of pulling a new event.
        if let Some(current) = &self.current {
            if !self.consumed && current.name == wrapper {
                self.consumed = true;
                if current.self_closing {
                    return Ok(());
                }
            }
        }

        loop {
            match self.next_event()? {
                Event::Start(start) => {
                    let name = name_of(start.local_name().as_ref());
                    if name == wrapper {
                        // The wrapper element itself opening; descend into it.
                        continue;
                    }
                    self.set_current(&start, false)?;
                    on_child(self, &name)?;
                    if !self.consumed {
                        debug!("skipping unrecognized element <{name}>");
                        self.skip()?;
                    }
                }
                Event::Empty(start) => {
                    let name = name_of(start.local_name().as_ref());
                    self.set_current(&start, true)?;
                    on_child(self, &name)?;
                    self.consumed = true;
                }
                Event::End(end) => {
                    let name = name_of(end.local_name().as_ref());
                    if name == wrapper {
                        return Ok(());
                    }
                    return Err(Error::xml_parse(format!("unexpected closing tag </{name}>")));
                }
                Event::Eof => return Err(Error::truncated(wrapper)),
                _ => {}
            }
        }
    }

    /// Local name of the element the scan is positioned on
    pub fn current_name(&self) -> Result<String> {
        self.current
            .as_ref()
            .map(|element| element.name.clone())
            .ok_or_else(|| Error::xml_parse("no element to read"))
    }

    /// Look up an attribute on the current element
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.current
            .as_ref()?
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    /// Read the current element's text content through its end tag
    pub fn read_string(&mut self) -> Result<String> {
        let name = self.current_name()?;
        let self_closing = self.current.as_ref().is_some_and(|e| e.self_closing);
        self.consumed = true;
        if self_closing {
            return Ok(String::new());
        }

        let mut content = String::new();
        loop {
            match self.next_event()? {
                Event::Text(text) => content.push_str(&String::from_utf8_lossy(text.as_ref())),
                Event::CData(text) => content.push_str(&String::from_utf8_lossy(text.as_ref())),
                Event::GeneralRef(reference) => {
                    let raw = String::from_utf8_lossy(reference.as_ref()).to_string();
                    match resolve_entity(&raw) {
                        Some(ch) => content.push(ch),
                        None => {
                            return Err(Error::xml_parse(format!(
                                "unresolvable entity reference &{raw};"
                            )))
                        }
                    }
                }
                Event::Start(_) | Event::Empty(_) => {
                    return Err(Error::xml_parse(format!(
                        "unexpected child element inside <{name}>"
                    )));
                }
                Event::End(end) => {
                    let end_name = name_of(end.local_name().as_ref());
                    if end_name == name {
                        return Ok(content);
                    }
                    return Err(Error::xml_parse(format!(
                        "unexpected closing tag </{end_name}>"
                    )));
                }
                Event::Eof => return Err(Error::truncated(name)),
                _ => {}
            }
        }
    }

    /// Read the current element's content as an `i32`
    pub fn read_i32(&mut self) -> Result<i32> {
        let name = self.current_name()?;
        let text = self.read_string()?;
        text.trim()
            .parse()
            .map_err(|e| Error::invalid_content(&name, format!("{e}: {text:?}")))
    }

    /// Read the current element's content as an `i64`
    pub fn read_i64(&mut self) -> Result<i64> {
        let name = self.current_name()?;
        let text = self.read_string()?;
        text.trim()
            .parse()
            .map_err(|e| Error::invalid_content(&name, format!("{e}: {text:?}")))
    }

    /// Read the current element's content as a boolean
    ///
    /// Accepts the wire forms `true`, `false`, `1`, `0`.
    pub fn read_bool(&mut self) -> Result<bool> {
        let name = self.current_name()?;
        let text = self.read_string()?;
        codec::parse_bool(text.trim())
            .ok_or_else(|| Error::invalid_content(&name, format!("not a boolean: {text:?}")))
    }

    /// Read the current element's content as a timestamp
    ///
    /// Accepts ISO 8601 with any offset; the result is normalized to UTC.
    pub fn read_datetime(&mut self) -> Result<DateTime<Utc>> {
        let name = self.current_name()?;
        let text = self.read_string()?;
        codec::parse_timestamp(text.trim())
            .map_err(|e| Error::invalid_content(&name, format!("{e}: {text:?}")))
    }

    /// Read the current element's content as a transport-form enum
    pub fn read_enum<E: WireEnum>(&mut self) -> Result<E> {
        let text = self.read_string()?;
        E::from_wire(text.trim())
    }

    /// Discard the current element and its whole subtree
    pub fn skip(&mut self) -> Result<()> {
        let (name, self_closing) = match &self.current {
            Some(element) => (element.name.clone(), element.self_closing),
            None => return Ok(()),
        };
        if self.consumed {
            return Ok(());
        }
        self.consumed = true;
        if self_closing {
            return Ok(());
        }

        let mut depth = 1usize;
        loop {
            match self.next_event()? {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Event::Eof => return Err(Error::truncated(name)),
                _ => {}
            }
        }
    }

    fn set_current(&mut self, start: &BytesStart<'_>, self_closing: bool) -> Result<()> {
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute =
                attribute.map_err(|e| Error::xml_parse(format!("bad attribute: {e}")))?;
            let key = name_of(attribute.key.as_ref());
            let value = resolve_refs(&String::from_utf8_lossy(&attribute.value));
            attributes.push((key, value));
        }
        self.current = Some(Element {
            name: name_of(start.local_name().as_ref()),
            attributes,
            self_closing,
        });
        self.consumed = false;
        Ok(())
    }

    fn next_event(&mut self) -> Result<Event<'a>> {
        self.reader
            .read_event()
            .map_err(|e| Error::xml_parse(e.to_string()))
    }
}

fn name_of(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).to_string()
}

/// Resolve a predefined or numeric character reference (name without `&`/`;`)
fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = if let Some(hex) = num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                num.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}

/// Resolve character references embedded in raw attribute text
fn resolve_refs(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 1..];
        if let Some(end) = rest.find(';') {
            if let Some(ch) = resolve_entity(&rest[..end]) {
                out.push(ch);
                rest = &rest[end + 1..];
                continue;
            }
        }
        out.push('&');
    }
    out.push_str(rest);
    out
}
