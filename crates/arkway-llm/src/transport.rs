//! HTTP transport for the Responses API

use std::pin::Pin;
use std::time::Duration;

use arkway_config::ProviderConfig;
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures_util::{Stream, StreamExt, future};
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use crate::error::LlmError;
use crate::protocol::responses::{ErrorResponse, Payload, ResponseObject, ResponseStreamEvent};

/// Stream of decoded server-sent events
pub type EventStream = Pin<Box<dyn Stream<Item = Result<ResponseStreamEvent, LlmError>> + Send>>;

/// Connection to a Responses API endpoint
///
/// Implementations own the HTTP client; the adapter holds one behind an
/// `Arc` and never retries.
#[async_trait]
pub trait ResponsesTransport: Send + Sync {
    /// Send a request and wait for the full response object
    async fn create(&self, payload: Payload) -> Result<ResponseObject, LlmError>;

    /// Send a streaming request and return its events in arrival order
    async fn create_stream(&self, payload: Payload) -> Result<EventStream, LlmError>;
}

/// Payload with client-side options separated from the JSON body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutboundRequest {
    /// JSON body with `extra_body` merged in
    pub body: Payload,
    /// Headers from `extra_headers`
    pub headers: Vec<(String, String)>,
    /// Query parameters from `extra_query`
    pub query: Vec<(String, String)>,
    /// Per-request timeout from `timeout` (seconds)
    pub timeout: Option<Duration>,
}

/// Separate `extra_body`, `extra_headers`, `extra_query` and `timeout` from
/// the fields sent as the JSON body
///
/// `extra_body` entries are merged into the top level of the body, replacing
/// fields of the same name.
pub fn split_payload(mut payload: Payload) -> OutboundRequest {
    let extra_body = payload.remove("extra_body");
    let headers = payload.remove("extra_headers").map(string_pairs).unwrap_or_default();
    let query = payload.remove("extra_query").map(string_pairs).unwrap_or_default();
    let timeout = payload
        .remove("timeout")
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|secs| *secs > 0.0)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok());

    match extra_body {
        Some(Value::Object(extra)) => payload.extend(extra),
        Some(Value::Null) | None => {}
        Some(other) => tracing::debug!(extra_body = %other, "ignoring non-object extra_body"),
    }

    OutboundRequest {
        body: payload,
        headers,
        query,
        timeout,
    }
}

/// Flatten a JSON object into string pairs, skipping nulls
fn string_pairs(value: Value) -> Vec<(String, String)> {
    let Value::Object(map) = value else {
        return Vec::new();
    };

    map.into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect()
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
    headers: HeaderMap,
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// Transport for the given base URL, e.g. `https://host/api/v3`
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key: None,
            headers: HeaderMap::new(),
            timeout: None,
        }
    }

    /// Build from provider configuration
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Configuration` if a header or the timeout is invalid.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, LlmError> {
        let mut headers = HeaderMap::with_capacity(config.headers.len());
        for (name, value) in &config.headers {
            let name = HeaderName::try_from(name.as_str())
                .map_err(|e| LlmError::Configuration(format!("invalid header name '{name}': {e}")))?;
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|e| LlmError::Configuration(format!("invalid value for header '{name}': {e}")))?;
            headers.insert(name, value);
        }

        let timeout = config
            .timeout()
            .map_err(|e| LlmError::Configuration(e.to_string()))?;

        Ok(Self {
            client: Client::new(),
            base_url: config.base_url(),
            api_key: config.api_key.clone(),
            headers,
            timeout,
        })
    }

    /// Use a bearer API key
    #[must_use]
    pub fn with_api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Use a preconfigured client
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Default timeout for requests that do not set their own
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the responses endpoint URL
    fn responses_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/responses")
    }

    /// Send the payload and return the successful HTTP response
    async fn send(&self, payload: Payload, streaming: bool) -> Result<reqwest::Response, LlmError> {
        let outbound = split_payload(payload);

        let mut builder = self
            .client
            .post(self.responses_url())
            .headers(self.headers.clone())
            .json(&outbound.body);

        for (name, value) in &outbound.headers {
            match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
                (Ok(name), Ok(value)) => builder = builder.header(name, value),
                _ => tracing::warn!(header = %name, "skipping invalid extra header"),
            }
        }

        if !outbound.query.is_empty() {
            builder = builder.query(&outbound.query);
        }

        if let Some(timeout) = outbound.timeout.or(self.timeout) {
            builder = builder.timeout(timeout);
        }

        if streaming {
            builder = builder.header(ACCEPT, "text/event-stream");
        }

        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(url = %self.base_url, error = %e, "upstream request failed");
            LlmError::Transport(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<ErrorResponse>(&body).map_or(body, |err| err.error.message);
        tracing::warn!(status = %status, error = %body, "upstream returned error");

        Err(LlmError::Upstream {
            status: status.as_u16(),
            body,
        })
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ResponsesTransport for HttpTransport {
    async fn create(&self, mut payload: Payload) -> Result<ResponseObject, LlmError> {
        payload.remove("stream");
        let response = self.send(payload, false).await?;
        let bytes = response.bytes().await?;

        serde_json::from_slice(&bytes).map_err(|e| LlmError::Decode(format!("failed to parse response: {e}")))
    }

    async fn create_stream(&self, mut payload: Payload) -> Result<EventStream, LlmError> {
        payload.insert("stream".to_owned(), Value::Bool(true));
        let response = self.send(payload, true).await?;

        let events = response
            .bytes_stream()
            .eventsource()
            .filter_map(|result| future::ready(parse_event(result)));

        Ok(Box::pin(events))
    }
}

/// Decode one SSE frame, skipping keep-alives, `[DONE]` and unknown payloads
fn parse_event<E: std::fmt::Display>(
    result: Result<eventsource_stream::Event, E>,
) -> Option<Result<ResponseStreamEvent, LlmError>> {
    let event = match result {
        Ok(event) => event,
        Err(e) => return Some(Err(LlmError::Streaming(e.to_string()))),
    };

    let data = event.data.trim();
    if data.is_empty() || data == "[DONE]" {
        return None;
    }

    match serde_json::from_str(data) {
        Ok(event) => Some(Ok(event)),
        Err(e) => {
            tracing::debug!(error = %e, data = %data, "skipping unparseable SSE event");
            None
        }
    }
}
