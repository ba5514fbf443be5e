#![allow(clippy::must_use_candidate)]

//! Configuration for the arkway Responses API adapter
//!
//! Loaded from TOML with `{{ env.VAR }}` expansion applied to the raw text
//! before deserialization.

mod env;
mod loader;
pub mod model;
pub mod provider;

use serde::Deserialize;

pub use model::{CachingConfig, ModelConfig, ThinkingConfig, ThinkingMode};
pub use provider::{DEFAULT_BASE_URL, ProviderConfig};

/// Top-level adapter configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Vendor endpoint and credentials
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Model and feature switches
    pub model: ModelConfig,
}
