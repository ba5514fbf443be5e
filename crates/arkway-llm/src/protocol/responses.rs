//! Responses API wire format types

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Outbound request body keyed by vendor field names
///
/// Kept as a JSON object so the policy rules can inspect, filter and rewrite
/// fields regardless of where they came from.
pub type Payload = Map<String, Value>;

// -- Request types --

/// Typed view of the fields the assembler produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsesRequest {
    /// Model identifier (still provider-prefixed before reorganization)
    pub model: String,
    /// System prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Conversation input items
    pub input: Vec<InputItem>,
    /// Function tools
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<FunctionTool>>,
    /// Structured-output configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextConfig>,
    /// Continuation handle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_response_id: Option<String>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// Item in the `input` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputItem {
    /// Role-tagged message with content parts
    Message {
        /// "user", "assistant" or "system"
        role: String,
        /// Content parts
        content: Vec<InputContent>,
    },
    /// Function call previously made by the model
    FunctionCall {
        /// Call identifier
        call_id: String,
        /// Function name
        name: String,
        /// JSON-encoded arguments
        arguments: String,
    },
    /// Result of a function call
    FunctionCallOutput {
        /// Identifier of the call this answers
        call_id: String,
        /// JSON-encoded result
        output: String,
    },
}

/// Content part within an input message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputContent {
    /// Text content
    InputText {
        /// The text string
        text: String,
    },
    /// Image by URL, data URI or vendor file id
    InputImage {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file_id: Option<String>,
        /// Detail level hint
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    /// Video by URL, data URI or vendor file id
    InputVideo {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        video_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file_id: Option<String>,
        /// Frame sampling rate
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fps: Option<f64>,
    },
    /// Generic file by URL, inline data URI or vendor file id
    InputFile {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file_data: Option<String>,
    },
}

/// Function tool definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionTool {
    /// Always "function"
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function name
    pub name: String,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the arguments
    pub parameters: Value,
}

/// `text` request field carrying the output format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextConfig {
    /// Format object, e.g. `{"type": "json_schema", ...}`
    pub format: Value,
}

// -- Response types --

/// Lifecycle status of a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Completed,
    Incomplete,
    Failed,
    InProgress,
    Queued,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// Full response object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseObject {
    /// Response identifier, usable as `previous_response_id`
    pub id: String,
    /// Model that produced the response
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    /// Lifecycle status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ResponseStatus>,
    /// Why the response is incomplete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incomplete_details: Option<IncompleteDetails>,
    /// Output items in generation order; malformed items are skipped
    #[serde(default, deserialize_with = "lenient_list")]
    pub output: Vec<OutputItem>,
    /// Token usage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<ResponseUsage>,
}

/// Incomplete-response detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncompleteDetails {
    /// e.g. "length" or "content_filter"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Item in the response `output` array
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    /// Reasoning summary produced before the answer
    Reasoning {
        #[serde(default)]
        summary: Vec<ReasoningSummary>,
    },
    /// Assistant message
    Message {
        #[serde(default, deserialize_with = "lenient_list")]
        content: Vec<OutputContent>,
    },
    /// Function call request
    FunctionCall {
        call_id: String,
        name: String,
        /// JSON-encoded arguments
        #[serde(default)]
        arguments: String,
    },
    /// Item type this adapter does not understand
    #[serde(other)]
    Unknown,
}

/// Reasoning summary segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningSummary {
    #[serde(default)]
    pub text: String,
}

/// Content segment of an output message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputContent {
    /// Answer text
    OutputText { text: String },
    /// Refusals, annotations and other segment types
    #[serde(other)]
    Unknown,
}

/// Token usage in a response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_tokens_details: Option<InputTokensDetails>,
}

/// Breakdown of prompt tokens
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputTokensDetails {
    #[serde(default)]
    pub cached_tokens: u32,
}

// -- Streaming types --

/// Server-sent event, discriminated by its `type` field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResponseStreamEvent {
    /// Incremental reasoning summary text
    #[serde(rename = "response.reasoning_summary_text.delta")]
    ReasoningSummaryTextDelta { delta: String },
    /// Incremental answer text
    #[serde(rename = "response.output_text.delta")]
    OutputTextDelta { delta: String },
    /// Terminal event carrying the full response
    #[serde(rename = "response.completed")]
    Completed { response: ResponseObject },
    /// Terminal event for a response cut short, e.g. by `max_output_tokens`
    #[serde(rename = "response.incomplete")]
    Incomplete { response: ResponseObject },
    /// Terminal event for a response the vendor gave up on
    #[serde(rename = "response.failed")]
    Failed { response: ResponseObject },
    /// Lifecycle and bookkeeping events
    #[serde(other)]
    Other,
}

impl ResponseStreamEvent {
    /// Whether this event carries the final response
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed { .. } | Self::Incomplete { .. } | Self::Failed { .. }
        )
    }
}

// -- Error response --

/// Error body returned with non-success statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode a list entry by entry, skipping entries that do not decode
///
/// Anything other than a list decodes as empty.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(entries)) => entries,
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(other) => {
            tracing::warn!(value = %other, "expected a list, skipping");
            return Ok(Vec::new());
        }
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed entry");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn malformed_output_entries_are_skipped() {
        let resp: ResponseObject = serde_json::from_value(json!({
            "id": "r1",
            "model": null,
            "status": "completed",
            "output": [
                {"type": "message", "content": "plain string content"},
                {"type": "function_call", "call_id": 7},
                {"type": "message", "content": [{"type": "output_text"}, {"type": "output_text", "text": "ok"}]},
                {"type": "function_call", "call_id": "c1", "name": "lookup", "arguments": "{}"},
            ],
        }))
        .unwrap();

        assert!(resp.model.is_empty());
        assert_eq!(resp.output.len(), 3);
        assert!(matches!(&resp.output[0], OutputItem::Message { content } if content.is_empty()));
        assert!(matches!(&resp.output[1], OutputItem::Message { content } if content.len() == 1));
        assert!(matches!(&resp.output[2], OutputItem::FunctionCall { call_id, .. } if call_id == "c1"));
    }

    #[test]
    fn terminal_events() {
        let response = json!({"id": "r1", "status": "incomplete", "incomplete_details": {"reason": "length"}});
        for kind in ["response.completed", "response.incomplete", "response.failed"] {
            let event: ResponseStreamEvent = serde_json::from_value(json!({"type": kind, "response": response})).unwrap();
            assert!(event.is_terminal(), "{kind} not terminal");
        }

        let created: ResponseStreamEvent =
            serde_json::from_value(json!({"type": "response.created", "response": response})).unwrap();
        assert!(!created.is_terminal());
    }
}
