//! Conversion of full response objects into canonical responses

use super::content::output_item_to_part;
use crate::protocol::responses::{ResponseObject, ResponseStatus, ResponseUsage};
use crate::types::{FinishReason, LlmResponse, UsageMetadata};

impl From<ResponseUsage> for UsageMetadata {
    fn from(usage: ResponseUsage) -> Self {
        Self {
            prompt_token_count: usage.input_tokens,
            candidates_token_count: usage.output_tokens,
            total_token_count: usage.total_tokens,
            cached_content_token_count: usage.input_tokens_details.map(|d| d.cached_tokens),
        }
    }
}

impl From<ResponseObject> for LlmResponse {
    fn from(resp: ResponseObject) -> Self {
        decode_response(resp)
    }
}

/// Decode a complete response object into a terminal canonical response
pub fn decode_response(resp: ResponseObject) -> LlmResponse {
    if resp.output.is_empty() {
        tracing::warn!(response_id = %resp.id, "response contains no output items");
    }

    let parts = resp.output.iter().filter_map(output_item_to_part).collect();
    let reason = resp.incomplete_details.and_then(|d| d.reason);

    LlmResponse {
        parts,
        partial: false,
        finish_reason: Some(finish_reason(resp.status, reason.as_deref())),
        usage: resp.usage.map(UsageMetadata::from),
        response_id: Some(resp.id),
        model_version: (!resp.model.is_empty()).then_some(resp.model),
    }
}

/// Map status and incomplete reason to a finish reason
fn finish_reason(status: Option<ResponseStatus>, reason: Option<&str>) -> FinishReason {
    match (status, reason.unwrap_or("other")) {
        (Some(ResponseStatus::Incomplete), "length") => FinishReason::MaxTokens,
        (Some(ResponseStatus::Incomplete), "content_filter") => FinishReason::Safety,
        (Some(ResponseStatus::Completed), "other") => FinishReason::Stop,
        _ => FinishReason::Other,
    }
}
