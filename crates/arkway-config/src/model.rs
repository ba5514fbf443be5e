use serde::Deserialize;
use serde_json::{Map, Value, json};

/// Model selection and vendor feature switches
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Provider-prefixed model identifier (e.g. "openai/doubao-seed-1-6")
    pub name: String,
    /// Ask the vendor to persist responses so they can be continued
    #[serde(default)]
    pub store: Option<bool>,
    /// Context caching switch
    #[serde(default)]
    pub caching: Option<CachingConfig>,
    /// Deep-thinking switch
    #[serde(default)]
    pub thinking: Option<ThinkingConfig>,
    /// Arbitrary payload fields merged into every request
    #[serde(default)]
    pub extra: toml::Table,
}

/// Context caching configuration
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CachingConfig {
    /// Whether the vendor should cache the conversation prefix
    #[serde(default)]
    pub enabled: bool,
}

/// Deep-thinking configuration
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThinkingConfig {
    /// Thinking mode
    #[serde(rename = "type")]
    pub mode: ThinkingMode,
}

/// Vendor thinking modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThinkingMode {
    /// Always think before answering
    Enabled,
    /// Never think
    Disabled,
    /// Let the model decide
    Auto,
}

impl ThinkingMode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
            Self::Auto => "auto",
        }
    }
}

impl ModelConfig {
    /// Create a config with only a model name set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            store: None,
            caching: None,
            thinking: None,
            extra: toml::Table::new(),
        }
    }

    /// Render the configured options as payload fields
    ///
    /// Vendor-specific switches (caching, thinking) are placed under
    /// `extra_body`, which the transport merges into the request body.
    pub fn extra_args(&self) -> Map<String, Value> {
        let mut args = match serde_json::to_value(&self.extra) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };

        if let Some(store) = self.store {
            args.insert("store".to_owned(), Value::Bool(store));
        }

        let mut extra_body = match args.remove("extra_body") {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        if let Some(caching) = self.caching {
            let kind = if caching.enabled { "enabled" } else { "disabled" };
            extra_body.insert("caching".to_owned(), json!({ "type": kind }));
        }

        if let Some(thinking) = self.thinking {
            extra_body.insert("thinking".to_owned(), json!({ "type": thinking.mode.as_str() }));
        }

        if !extra_body.is_empty() {
            args.insert("extra_body".to_owned(), Value::Object(extra_body));
        }

        args
    }
}
