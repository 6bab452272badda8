//! Scalar and enum codecs
//!
//! Conversions between wire strings and typed values. Enums travel in their
//! transport form: the variant's canonical name in lower snake case
//! (`PerUnit` ⇄ `per_unit`). An unrecognized wire string is an error, never a
//! silent default.

use crate::error::Result;
use chrono::{DateTime, Utc};

/// An enum that travels on the wire under its snake-cased variant name
pub trait WireEnum: Sized + Copy {
    /// The transport form of this value
    fn wire_name(self) -> &'static str;

    /// Parse a transport-form string, failing on unrecognized values
    fn from_wire(value: &str) -> Result<Self>;
}

/// The wire representation of a boolean
pub fn bool_to_wire(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Parse a boolean from its wire forms
pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Parse an ISO-8601-with-offset timestamp, normalized to UTC
pub(crate) fn parse_timestamp(text: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|dt| dt.with_timezone(&Utc))
}
