//! Vendor constraint rules applied to an assembled payload
//!
//! The rules run in a fixed order and later rules may undo earlier ones:
//!
//! 1. strip the provider prefix from the model id
//! 2. trim history to the trailing user turns and tool outputs
//! 3. drop fields the vendor does not accept
//! 4. inject the cache expiry timestamp
//! 5. disable caching when structured output is requested
//! 6. drop tools when continuing a conversation
//! 7. force `store` when caching is enabled
//! 8. move instructions into a leading system message
//!
//! Only the first rule can fail; the others tolerate malformed payloads.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{Map, Value, json};

use crate::error::LlmError;
use crate::protocol::responses::Payload;

/// Top-level fields accepted by the vendor
pub const SUPPORTED_FIELDS: &[&str] = &[
    "input",
    "model",
    "stream",
    "background",
    "include",
    "instructions",
    "max_output_tokens",
    "parallel_tool_calls",
    "previous_response_id",
    "thinking",
    "store",
    "caching",
    "temperature",
    "text",
    "tool_choice",
    "tools",
    "top_p",
    "max_tool_calls",
    "expire_at",
    "extra_headers",
    "extra_query",
    "extra_body",
    "timeout",
    "reasoning",
];

/// Lifetime of cached context, in seconds (3 days)
pub const CACHE_TTL_SECS: u64 = 259_200;

/// Provider prefixes accepted in front of the model name
pub const RECOGNIZED_PREFIXES: &[&str] = &["openai", "ark"];

/// Apply every rule using the current wall-clock time
pub fn reorganize(payload: Payload) -> Result<Payload, LlmError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());

    reorganize_at(payload, now)
}

/// Apply every rule with `now` as the current Unix time in seconds
pub fn reorganize_at(mut payload: Payload, now: u64) -> Result<Payload, LlmError> {
    strip_provider_prefix(&mut payload)?;
    trim_history(&mut payload);
    retain_supported_fields(&mut payload);
    inject_cache_expiry(&mut payload, now);
    resolve_caching_conflict(&mut payload);
    drop_tools_on_continuation(&mut payload);
    force_store_for_caching(&mut payload);
    place_instructions(&mut payload);

    Ok(payload)
}

/// `"openai/gpt-4o"` becomes `"gpt-4o"`
pub fn strip_provider_prefix(payload: &mut Payload) -> Result<(), LlmError> {
    let Some(Value::String(model)) = payload.get("model") else {
        return Err(LlmError::Configuration(
            "model must be a string of the form 'openai/<model>'".to_owned(),
        ));
    };

    let Some((provider, name)) = model.split_once('/') else {
        return Err(LlmError::Configuration(format!(
            "model '{model}' has no provider prefix, use 'openai/<model>'"
        )));
    };

    if !RECOGNIZED_PREFIXES.contains(&provider) {
        return Err(LlmError::Configuration(format!(
            "unsupported model prefix '{provider}', use 'openai/<model>'"
        )));
    }

    let name = name.to_owned();
    payload.insert("model".to_owned(), Value::String(name));
    Ok(())
}

/// Keep only the trailing run of user messages and function outputs
///
/// Earlier turns are already held by the vendor once a conversation is
/// stored, so they are never resent.
pub fn trim_history(payload: &mut Payload) {
    let Some(Value::Array(input)) = payload.get_mut("input") else {
        return;
    };

    let keep = input.iter().rev().take_while(|item| is_trailing_item(item)).count();
    let start = input.len() - keep;
    input.drain(..start);
}

fn is_trailing_item(item: &Value) -> bool {
    item.get("type").and_then(Value::as_str) == Some("function_call_output")
        || item.get("role").and_then(Value::as_str) == Some("user")
}

/// Drop keys the vendor does not accept
pub fn retain_supported_fields(payload: &mut Payload) {
    payload.retain(|key, _| {
        let supported = SUPPORTED_FIELDS.contains(&key.as_str());
        if !supported {
            tracing::debug!(field = %key, "dropping unsupported request field");
        }
        supported
    });
}

/// Set `extra_body.expire_at` to `now` plus the cache lifetime
pub fn inject_cache_expiry(payload: &mut Payload, now: u64) {
    let extra_body = payload
        .entry("extra_body")
        .or_insert_with(|| Value::Object(Map::new()));

    if !extra_body.is_object() {
        *extra_body = Value::Object(Map::new());
    }

    if let Value::Object(extra_body) = extra_body {
        extra_body.insert("expire_at".to_owned(), json!(now + CACHE_TTL_SECS));
    }
}

/// Structured output wins over caching
pub fn resolve_caching_conflict(payload: &mut Payload) {
    if !caching_enabled(payload) || payload.get("text").is_none_or(Value::is_null) {
        return;
    }

    tracing::warn!("caching cannot be combined with structured output, caching disabled");

    if let Some(Value::Object(extra_body)) = payload.get_mut("extra_body") {
        extra_body.remove("caching");
    }
    payload.remove("caching");
}

/// Tools may only be registered on the first turn of a conversation
pub fn drop_tools_on_continuation(payload: &mut Payload) {
    let continuing = payload.get("previous_response_id").is_some_and(|id| !id.is_null());
    if continuing && payload.remove("tools").is_some() {
        tracing::debug!("continuing a stored conversation, tools dropped");
    }
}

/// Cached context must be stored
///
/// An `extra_body.store` would override the top-level flag on the wire, so it
/// is forced as well.
pub fn force_store_for_caching(payload: &mut Payload) {
    if !caching_enabled(payload) {
        return;
    }

    payload.insert("store".to_owned(), Value::Bool(true));
    if let Some(Value::Object(extra_body)) = payload.get_mut("extra_body")
        && let Some(store) = extra_body.get_mut("store")
    {
        *store = Value::Bool(true);
    }
}

/// Move instructions into a leading system message
///
/// A standalone instructions field is not covered by the context cache. On a
/// continued conversation the vendor already has them and they are dropped.
pub fn place_instructions(payload: &mut Payload) {
    let instructions = payload.remove("instructions");
    let Some(Value::String(text)) = instructions else {
        return;
    };

    if text.is_empty() || has_continuation(payload) {
        return;
    }

    let message = json!({
        "type": "message",
        "role": "system",
        "content": [{"type": "input_text", "text": text}],
    });

    match payload.get_mut("input") {
        Some(Value::Array(input)) => input.insert(0, message),
        _ => {
            payload.insert("input".to_owned(), Value::Array(vec![message]));
        }
    }
}

/// Whether caching is requested in `extra_body` or at the top level
pub fn caching_enabled(payload: &Payload) -> bool {
    let enabled = |caching: Option<&Value>| {
        caching
            .and_then(|c| c.get("type"))
            .and_then(Value::as_str)
            == Some("enabled")
    };

    enabled(payload.get("extra_body").and_then(|body| body.get("caching"))) || enabled(payload.get("caching"))
}

/// Non-empty continuation handle
fn has_continuation(payload: &Payload) -> bool {
    payload
        .get("previous_response_id")
        .is_some_and(|id| !id.is_null() && id.as_str() != Some(""))
}
