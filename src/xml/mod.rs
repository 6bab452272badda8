//! XML wire format support
//!
//! # Overview
//!
//! The Ledgera API speaks XML. This module holds the serialization
//! primitives every entity builds on: a forward-only streaming cursor for
//! decoding, a streaming encoder for request bodies, and the scalar/enum
//! codecs shared by both sides.

mod codec;
mod cursor;
mod encoder;

pub use codec::{bool_to_wire, WireEnum};
pub use cursor::XmlCursor;
pub use encoder::XmlEncoder;
