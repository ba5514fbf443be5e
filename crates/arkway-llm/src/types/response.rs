use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::content::Part;

/// Reason the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    /// Natural end of generation
    Stop,
    /// Hit the output token limit
    MaxTokens,
    /// Blocked by the vendor's content filter
    Safety,
    /// Anything the lookup table does not map
    Other,
}

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetadata {
    /// Tokens consumed by the prompt
    pub prompt_token_count: u32,
    /// Tokens generated in the response
    pub candidates_token_count: u32,
    /// Total tokens
    pub total_token_count: u32,
    /// Prompt tokens served from the vendor cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_content_token_count: Option<u32>,
}

/// Canonical response, either an incremental fragment or the full reply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Content parts in output order
    pub parts: Vec<Part>,
    /// Incremental fragment of an in-progress reply
    pub partial: bool,
    /// Why generation stopped (terminal responses only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    /// Token usage (terminal responses only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageMetadata>,
    /// Continuation handle for the next turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
    /// Model that produced the response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

impl LlmResponse {
    /// Incremental fragment carrying the given parts
    pub fn partial(parts: Vec<Part>, model_version: Option<String>) -> Self {
        Self {
            parts,
            partial: true,
            model_version,
            ..Self::default()
        }
    }

    /// Concatenated answer text, excluding reasoning
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter(|p| !p.is_thought())
            .filter_map(Part::as_text)
            .collect()
    }

    /// Concatenated reasoning text
    pub fn thought_text(&self) -> String {
        self.parts
            .iter()
            .filter(|p| p.is_thought())
            .filter_map(Part::as_text)
            .collect()
    }

    /// Function calls as `(id, name, args)`
    pub fn function_calls(&self) -> impl Iterator<Item = (&str, &str, &Value)> {
        self.parts.iter().filter_map(|p| match p {
            Part::FunctionCall { id, name, args } => Some((id.as_str(), name.as_str(), args)),
            _ => None,
        })
    }
}
