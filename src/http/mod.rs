//! HTTP transport layer
//!
//! The [`Transport`] trait is the seam between resource operations and the
//! network; [`HttpClient`] implements it over a blocking reqwest client.

mod client;

pub use client::{HttpClient, Transport};
