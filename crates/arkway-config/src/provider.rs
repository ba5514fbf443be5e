use std::time::Duration;

use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Default Ark endpoint serving the Responses API
pub const DEFAULT_BASE_URL: &str = "https://ark.cn-beijing.volces.com/api/v3";

/// Connection settings for the vendor endpoint
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// API key sent as a bearer token
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override; `/responses` is appended
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Request timeout (e.g. "90s", "2m")
    #[serde(default)]
    pub timeout: Option<String>,
    /// Static headers added to every request
    #[serde(default)]
    pub headers: IndexMap<String, String>,
}

impl ProviderConfig {
    /// Base URL, falling back to the public Ark endpoint
    pub fn base_url(&self) -> Url {
        self.base_url
            .clone()
            .unwrap_or_else(|| Url::parse(DEFAULT_BASE_URL).expect("valid default URL"))
    }

    /// Parsed request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the duration string cannot be parsed
    pub fn timeout(&self) -> anyhow::Result<Option<Duration>> {
        self.timeout
            .as_deref()
            .map(|raw| duration_str::parse(raw).map_err(|e| anyhow::anyhow!("invalid provider timeout '{raw}': {e}")))
            .transpose()
    }
}
