//! Programmatic configuration builder for integration tests

use arkway_config::{CachingConfig, Config, ModelConfig, ProviderConfig};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal config pointed at a mock backend
    pub fn new(base_url: &str) -> Self {
        Self {
            config: Config {
                provider: ProviderConfig {
                    api_key: Some(SecretString::from("test-key")),
                    base_url: Some(base_url.parse().expect("valid URL")),
                    ..ProviderConfig::default()
                },
                model: ModelConfig::new("openai/doubao-seed-1-6"),
            },
        }
    }

    /// Enable or disable context caching
    pub fn with_caching(mut self, enabled: bool) -> Self {
        self.config.model.caching = Some(CachingConfig { enabled });
        self
    }

    /// Set the store switch
    pub fn with_store(mut self, store: bool) -> Self {
        self.config.model.store = Some(store);
        self
    }

    /// Add a static provider header
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.config.provider.headers.insert(name.to_owned(), value.to_owned());
        self
    }

    /// Add a raw extra payload field
    pub fn with_extra(mut self, key: &str, value: toml::Value) -> Self {
        self.config.model.extra.insert(key.to_owned(), value);
        self
    }

    /// Finish building
    pub fn build(self) -> Config {
        self.config
    }
}
