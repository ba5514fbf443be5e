//! Entry point executing canonical requests against the Responses API

use std::pin::Pin;
use std::sync::Arc;

use arkway_config::Config;
use futures_util::stream::once;
use futures_util::{Stream, TryStreamExt};

use crate::assemble::build_payload;
use crate::convert::{decode_response, decode_stream};
use crate::error::LlmError;
use crate::policy::reorganize;
use crate::protocol::responses::Payload;
use crate::transport::{HttpTransport, ResponsesTransport};
use crate::types::{LlmRequest, LlmResponse};

/// Stream of canonical responses: partials, then one terminal response
pub type ResponseStream = Pin<Box<dyn Stream<Item = Result<LlmResponse, LlmError>> + Send>>;

/// Model bound to a transport and a set of default payload options
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct ResponsesModel {
    model: String,
    transport: Arc<dyn ResponsesTransport>,
    extra_args: Payload,
}

impl ResponsesModel {
    /// Model `model` (provider-prefixed, e.g. `openai/doubao-seed-1-6`) over a transport
    pub fn new(model: impl Into<String>, transport: Arc<dyn ResponsesTransport>) -> Self {
        Self {
            model: model.into(),
            transport,
            extra_args: Payload::new(),
        }
    }

    /// Build the model and its HTTP transport from configuration
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let transport = HttpTransport::from_config(&config.provider)?;

        Ok(Self::new(config.model.name.clone(), Arc::new(transport)).with_extra_args(config.model.extra_args()))
    }

    /// Payload fields merged into every request
    #[must_use]
    pub fn with_extra_args(mut self, extra_args: Payload) -> Self {
        self.extra_args = extra_args;
        self
    }

    /// Configured model identifier
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Assemble and reorganize the payload for a request without sending it
    pub fn prepare(&self, request: &LlmRequest) -> Result<Payload, LlmError> {
        reorganize(build_payload(request, &self.model, &self.extra_args)?)
    }

    /// Send a request and decode the full response
    pub async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let payload = self.prepare(request)?;
        tracing::debug!(model = %self.model, items = input_len(&payload), "sending responses request");

        let response = self.transport.create(payload).await?;
        Ok(decode_response(response))
    }

    /// Send a streaming request
    ///
    /// Fails before any event is read if the request cannot be assembled or
    /// the vendor rejects it.
    pub async fn generate_stream(&self, request: &LlmRequest) -> Result<ResponseStream, LlmError> {
        let payload = self.prepare(request)?;
        let model_version = payload
            .get("model")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned);
        tracing::debug!(model = %self.model, items = input_len(&payload), "sending streaming responses request");

        let events = self.transport.create_stream(payload).await?;
        Ok(Box::pin(decode_stream(events, model_version)))
    }

    /// Run a request in either mode
    ///
    /// Without streaming the result is a single terminal response. Errors,
    /// including assembly errors, are yielded as the last stream item.
    pub fn generate_content(&self, request: &LlmRequest, stream: bool) -> ResponseStream {
        let model = self.clone();
        let request = request.clone();

        if stream {
            Box::pin(once(async move { model.generate_stream(&request).await }).try_flatten())
        } else {
            Box::pin(once(async move { model.generate(&request).await }))
        }
    }
}

fn input_len(payload: &Payload) -> usize {
    payload
        .get("input")
        .and_then(serde_json::Value::as_array)
        .map_or(0, Vec::len)
}

impl std::fmt::Debug for ResponsesModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponsesModel")
            .field("model", &self.model)
            .field("extra_args", &self.extra_args.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
