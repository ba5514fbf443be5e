//! Mock Ark backend for integration tests
//!
//! Serves `POST /api/v3/responses` with canned JSON or SSE bodies and records
//! every request it receives.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// How the mock answers
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    /// Answer normally
    Normal,
    /// Answer every request with the given status and an error body
    Fail(u16),
    /// Stream deltas but close the connection before `response.completed`
    Truncated,
}

/// Request as seen by the mock
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub body: Value,
    pub headers: HeaderMap,
    pub query: Option<String>,
}

/// Mock Responses API server
pub struct MockArk {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockArkState>,
}

struct MockArkState {
    behavior: Behavior,
    requests: Mutex<Vec<CapturedRequest>>,
}

impl MockArk {
    /// Start a well-behaved mock server
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(Behavior::Normal).await
    }

    /// Start a mock server with the given behavior
    pub async fn start_with(behavior: Behavior) -> anyhow::Result<Self> {
        let state = Arc::new(MockArkState {
            behavior,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api/v3/responses", routing::post(handle_responses))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as the provider
    ///
    /// Includes `/api/v3` since the transport appends `/responses`
    pub fn base_url(&self) -> String {
        format!("http://{}/api/v3", self.addr)
    }

    /// Number of requests received
    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    /// Most recent request
    pub fn last_request(&self) -> CapturedRequest {
        self.state
            .requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("mock received no requests")
    }
}

impl Drop for MockArk {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// -- Canned bodies --

fn response_object(model: &str, with_tools: bool) -> Value {
    let output = if with_tools {
        json!([{
            "type": "function_call",
            "id": "fc_1",
            "call_id": "call_test_123",
            "name": "get_weather",
            "arguments": r#"{"location":"Hangzhou"}"#,
            "status": "completed",
        }])
    } else {
        json!([
            {
                "type": "reasoning",
                "id": "rs_1",
                "summary": [{"type": "summary_text", "text": "The user greets me."}],
            },
            {
                "type": "message",
                "id": "msg_1",
                "role": "assistant",
                "status": "completed",
                "content": [{"type": "output_text", "text": "Hello", "annotations": []}],
            },
        ])
    };

    json!({
        "id": "resp_mock_1",
        "object": "response",
        "created_at": 1_700_000_000,
        "model": model,
        "status": "completed",
        "output": output,
        "usage": {
            "input_tokens": 12,
            "output_tokens": 4,
            "total_tokens": 16,
            "input_tokens_details": {"cached_tokens": 8},
            "output_tokens_details": {"reasoning_tokens": 2},
        },
    })
}

fn sse_frame(body: &mut String, event: &Value) {
    let name = event["type"].as_str().unwrap_or("message");
    body.push_str(&format!("event: {name}\ndata: {event}\n\n"));
}

fn streaming_body(model: &str, truncated: bool) -> String {
    let mut body = String::new();

    sse_frame(
        &mut body,
        &json!({"type": "response.created", "response": {"id": "resp_mock_1", "status": "in_progress"}}),
    );
    sse_frame(
        &mut body,
        &json!({"type": "response.reasoning_summary_text.delta", "item_id": "rs_1", "delta": "The user greets me."}),
    );
    for delta in ["Hel", "lo"] {
        sse_frame(
            &mut body,
            &json!({"type": "response.output_text.delta", "item_id": "msg_1", "delta": delta}),
        );
    }

    if truncated {
        return body;
    }

    sse_frame(
        &mut body,
        &json!({"type": "response.output_text.done", "item_id": "msg_1", "text": "Hello"}),
    );
    sse_frame(
        &mut body,
        &json!({"type": "response.completed", "response": response_object(model, false)}),
    );
    body.push_str("data: [DONE]\n\n");

    body
}

// -- Handler --

async fn handle_responses(
    State(state): State<Arc<MockArkState>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    Json(body): Json<Value>,
) -> Response {
    state.requests.lock().unwrap().push(CapturedRequest {
        body: body.clone(),
        headers,
        query,
    });

    let model = body["model"].as_str().unwrap_or_default().to_owned();
    let streaming = body["stream"].as_bool().unwrap_or(false);

    match state.behavior {
        Behavior::Fail(status) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(json!({
                "error": {
                    "message": "mock server intentional failure",
                    "type": "server_error",
                    "code": "InternalServiceError",
                },
            })),
        )
            .into_response(),
        Behavior::Truncated if streaming => event_stream(streaming_body(&model, true)),
        _ if streaming => event_stream(streaming_body(&model, false)),
        _ => Json(response_object(&model, body.get("tools").is_some())).into_response(),
    }
}

fn event_stream(body: String) -> Response {
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/event-stream")],
        body,
    )
        .into_response()
}
