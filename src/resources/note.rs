//! Account notes
//!
//! Notes are a fetch-only audit trail: the server writes them, clients read
//! them. There is no XML representation to send, so encoding a note always
//! fails with an unsupported-operation error.

use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::xml::{XmlCursor, XmlEncoder};
use chrono::{DateTime, Utc};

/// A note recorded against an account
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Note {
    /// Code of the account the note belongs to
    pub account_code: Option<String>,
    /// Note text
    pub message: String,
    /// Server-assigned creation time
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Note {
    const WRAPPER: &'static str = "note";

    fn read_xml(&mut self, cursor: &mut XmlCursor<'_>) -> Result<()> {
        cursor.scan(Self::WRAPPER, |cursor, name| {
            match name {
                "account" => {
                    // The account arrives as a relational reference; its code
                    // is the final segment of the href, URL-escaped.
                    if let Some(href) = cursor.attribute("href") {
                        let segment = href.rsplit('/').next().unwrap_or_default();
                        let code = urlencoding::decode(segment).map_err(|e| {
                            Error::invalid_content("account", format!("bad href encoding: {e}"))
                        })?;
                        self.account_code = Some(code.into_owned());
                    }
                }
                "message" => self.message = cursor.read_string()?,
                "created_at" => self.created_at = Some(cursor.read_datetime()?),
                _ => {}
            }
            Ok(())
        })
    }

    fn write_xml(&self, _xml: &mut XmlEncoder) -> Result<()> {
        Err(Error::unsupported("notes are read-only and cannot be serialized"))
    }
}
