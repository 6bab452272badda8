//! # Ledgera SDK
//!
//! A typed Rust client for the Ledgera subscription billing API. Domain
//! entities serialize to and from the API's XML wire format and issue CRUD
//! calls over a narrow, injectable HTTP transport.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ledgera_sdk::{AddOn, HttpClient, Settings, Result};
//!
//! fn main() -> Result<()> {
//!     let settings = Settings::new("sk_test_...", "acme")?;
//!     let client = HttpClient::new(settings)?;
//!
//!     let mut add_on = AddOn::new("gold", "ip-addresses", "Extra IP addresses");
//!     add_on.unit_amount_in_cents.insert("USD".into(), 200);
//!     add_on.create(&client)?;
//!
//!     add_on.name = "Additional IP addresses".into();
//!     add_on.update(&client)?;
//!
//!     add_on.delete(&client)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! entities (AddOn, Note, Plan, SubscriptionAddOn)
//!     │  Entity::read_xml / write_xml
//!     ▼
//! xml (XmlCursor, XmlEncoder, codecs)      ── the serialization core
//!     │
//!     ▼
//! http (Transport trait, HttpClient)       ── injectable collaborator
//! ```
//!
//! Decoding is a forward-only scan: dispatch each child element by name,
//! skip what is unrecognized, stop on the entity's own end tag. Optional
//! fields are tri-state on the wire: an absent element decodes to `None`,
//! and `None` is omitted on encode.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the SDK
pub mod error;

/// Common types and type aliases
pub mod types;

/// API settings
pub mod config;

/// XML streaming cursor, encoder, and codecs
pub mod xml;

/// The entity serialization contract
pub mod entity;

/// Domain entities
pub mod resources;

/// HTTP transport
pub mod http;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::Settings;
pub use entity::Entity;
pub use error::{Error, Result};
pub use http::{HttpClient, Transport};
pub use resources::{AddOn, AddOnType, Note, Plan, SubscriptionAddOn, UsageType};
pub use types::Method;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
