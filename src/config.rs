//! API settings
//!
//! Credentials and account parameters for one Ledgera site. A [`Settings`]
//! value is built explicitly or loaded from a YAML file, then handed to
//! [`crate::http::HttpClient::new`]. There is no global instance; callers own
//! the value and pass it where it is needed.

use crate::error::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for one Ledgera site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Private API key for the site
    pub api_key: String,

    /// Site subdomain, e.g. "acme" for acme.ledgera.com
    pub subdomain: String,

    /// Private key for signed hosted-page tokens
    #[serde(default)]
    pub private_key: Option<String>,

    /// Page size for list requests
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    200
}

impl Settings {
    /// Create settings with the default page size
    pub fn new(api_key: impl Into<String>, subdomain: impl Into<String>) -> Result<Self> {
        Self::builder()
            .api_key(api_key)
            .subdomain(subdomain)
            .build()
    }

    /// Create a settings builder
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// Load settings from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read {}", path.as_ref().display()))?;
        Self::from_yaml(&raw)
    }

    /// Load settings from a YAML string
    pub fn from_yaml(raw: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Base URL for API requests against this site
    pub fn base_url(&self) -> String {
        format!("https://{}.ledgera.com/v2", self.subdomain)
    }

    fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(Error::missing_field("api_key"));
        }
        if self.subdomain.is_empty() {
            return Err(Error::missing_field("subdomain"));
        }
        if self.page_size == 0 {
            return Err(Error::config("page_size must be greater than zero"));
        }
        Ok(())
    }
}

/// Builder for [`Settings`]
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    api_key: String,
    subdomain: String,
    private_key: Option<String>,
    page_size: Option<u32>,
}

impl SettingsBuilder {
    /// Set the API key
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the site subdomain
    pub fn subdomain(mut self, subdomain: impl Into<String>) -> Self {
        self.subdomain = subdomain.into();
        self
    }

    /// Set the private key for signed tokens
    pub fn private_key(mut self, private_key: impl Into<String>) -> Self {
        self.private_key = Some(private_key.into());
        self
    }

    /// Set the page size for list requests
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Validate and build the settings
    pub fn build(self) -> Result<Settings> {
        let settings = Settings {
            api_key: self.api_key,
            subdomain: self.subdomain,
            private_key: self.private_key,
            page_size: self.page_size.unwrap_or_else(default_page_size),
        };
        settings.validate()?;
        Ok(settings)
    }
}
