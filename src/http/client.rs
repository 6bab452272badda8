//! HTTP transport
//!
//! Resource operations never talk to the network directly; they hand a
//! method, a path, and an optional request body to a [`Transport`] and get
//! the response body back. [`HttpClient`] is the production implementation.
//! Tests substitute their own recording transports through the same trait.

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::types::Method;
use base64::Engine as _;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Narrow collaborator interface between resource operations and the network.
///
/// `body` is the already-encoded request entity (`None` for bodiless calls
/// such as DELETE); the return value is the response body (`None` when the
/// server sent nothing back). The transport owns the connection, the auth
/// headers, and the response lifetime.
pub trait Transport {
    /// Perform one synchronous request
    fn perform_request(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<Option<String>>;
}

/// Blocking HTTP client for one Ledgera site
pub struct HttpClient {
    client: reqwest::blocking::Client,
    settings: Settings,
    base_url: String,
}

impl HttpClient {
    /// Create a client from validated settings
    pub fn new(settings: Settings) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(format!("ledgera-sdk/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = settings.base_url();
        Url::parse(&base_url)?;

        Ok(Self {
            client,
            settings,
            base_url,
        })
    }

    /// The settings this client was built from
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Build the full URL from a path
    pub(crate) fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Authorization header value: HTTP basic auth on the API key
    pub(crate) fn auth_header(&self) -> String {
        let credentials = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:", self.settings.api_key));
        format!("Basic {credentials}")
    }
}

impl Transport for HttpClient {
    fn perform_request(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<Option<String>> {
        let url = self.build_url(path);

        let mut request = self
            .client
            .request(method.into(), &url)
            .header(AUTHORIZATION, self.auth_header())
            .header(ACCEPT, "application/xml");

        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, XML_CONTENT_TYPE).body(body);
        }

        let response = request.send()?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!("Request failed: {} {} -> {}", method, url, status.as_u16());
            return Err(Error::http_status(status.as_u16(), body));
        }

        debug!("Request succeeded: {} {}", method, url);
        let text = response.text()?;
        Ok(if text.is_empty() { None } else { Some(text) })
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("page_size", &self.settings.page_size)
            .finish_non_exhaustive()
    }
}
