//! Entity contract
//!
//! Every domain entity implements [`Entity`]: a decode that populates the
//! struct in place from a cursor, and an encode that writes the same wrapper
//! element the decode loop stops on. The wrapper name lives in one associated
//! constant so the two sides cannot drift apart.

use crate::error::Result;
use crate::xml::{XmlCursor, XmlEncoder};

/// A typed API entity with an XML wire representation
pub trait Entity {
    /// Wire name of the element bounding this entity's serialized form
    const WRAPPER: &'static str;

    /// Populate fields from the cursor, replacing existing state.
    ///
    /// Decoding twice replaces rather than merges: scalar fields are
    /// overwritten as their elements recur, collection entries key by key.
    fn read_xml(&mut self, cursor: &mut XmlCursor<'_>) -> Result<()>;

    /// Serialize under [`Self::WRAPPER`], omitting fields without a value
    fn write_xml(&self, xml: &mut XmlEncoder) -> Result<()>;

    /// Decode one entity from an XML document fragment
    fn from_xml_str(&mut self, xml: &str) -> Result<()> {
        let mut cursor = XmlCursor::new(xml);
        if cursor.expect_root(Self::WRAPPER)? {
            self.read_xml(&mut cursor)?;
        }
        Ok(())
    }

    /// Encode this entity to an XML string
    fn to_xml_string(&self) -> Result<String> {
        let mut xml = XmlEncoder::new();
        self.write_xml(&mut xml)?;
        xml.into_string()
    }
}
