//! Assembly of the outbound payload from a canonical request

use serde_json::Value;

use crate::convert::{declarations_to_tools, schema_to_text_config, turn_to_input_items};
use crate::error::LlmError;
use crate::protocol::responses::{Payload, ResponsesRequest};
use crate::types::{GenerationParams, LlmRequest, Role, Turn};

/// Sent when the conversation has no turns yet
pub const START_PROMPT: &str = "Handle the requests as specified in the System Instruction.";

/// Sent when the conversation does not end with a user turn
pub const CONTINUE_PROMPT: &str =
    "Continue processing previous requests as instructed. Exit or provide a summary if no more outputs are needed.";

/// Conversation with a trailing user turn guaranteed
fn padded_contents(contents: &[Turn]) -> Vec<Turn> {
    let mut contents = contents.to_vec();

    match contents.last() {
        None => contents.push(Turn::user_text(START_PROMPT)),
        Some(last) if last.role != Role::User => contents.push(Turn::user_text(CONTINUE_PROMPT)),
        Some(_) => {}
    }

    contents
}

/// Build the typed request body
///
/// `model` is used unless the request names its own.
pub fn build_request(request: &LlmRequest, model: &str) -> ResponsesRequest {
    let input = padded_contents(&request.contents)
        .iter()
        .flat_map(turn_to_input_items)
        .collect();

    ResponsesRequest {
        model: request.model.clone().unwrap_or_else(|| model.to_owned()),
        instructions: request.system_instruction.clone(),
        input,
        tools: declarations_to_tools(&request.tools),
        text: request.response_schema.as_ref().and_then(schema_to_text_config),
        previous_response_id: request.previous_response_id.clone(),
        temperature: request.params.temperature,
        top_p: request.params.top_p,
        max_output_tokens: request.params.max_output_tokens,
    }
}

/// Build the raw outbound payload
///
/// Precedence, lowest first: the assembled request, the model's extra
/// arguments, the request's generation parameters.
pub fn build_payload(request: &LlmRequest, model: &str, extra_args: &Payload) -> Result<Payload, LlmError> {
    let Value::Object(mut payload) = serde_json::to_value(build_request(request, model))
        .map_err(|e| LlmError::Configuration(format!("failed to serialize request: {e}")))?
    else {
        return Err(LlmError::Configuration("request did not serialize to an object".to_owned()));
    };

    payload.extend(extra_args.iter().map(|(k, v)| (k.clone(), v.clone())));
    apply_generation_params(&mut payload, &request.params);

    Ok(payload)
}

fn apply_generation_params(payload: &mut Payload, params: &GenerationParams) {
    if let Some(temperature) = params.temperature {
        payload.insert("temperature".to_owned(), temperature.into());
    }
    if let Some(top_p) = params.top_p {
        payload.insert("top_p".to_owned(), top_p.into());
    }
    if let Some(max_output_tokens) = params.max_output_tokens {
        payload.insert("max_output_tokens".to_owned(), max_output_tokens.into());
    }
}
