mod harness;

use arkway_llm::{FinishReason, LlmError, LlmRequest, LlmResponse, ResponsesModel, Turn};
use futures_util::StreamExt;
use harness::config::ConfigBuilder;
use harness::mock_ark::{Behavior, MockArk};

fn request() -> LlmRequest {
    LlmRequest::new(vec![Turn::user_text("Say hello")])
}

#[tokio::test]
async fn streaming_yields_partials_then_terminal() {
    harness::init_tracing();
    let mock = MockArk::start().await.unwrap();
    let model = ResponsesModel::from_config(&ConfigBuilder::new(&mock.base_url()).build()).unwrap();

    let responses: Vec<LlmResponse> = model
        .generate_content(&request(), true)
        .map(Result::unwrap)
        .collect()
        .await;

    assert_eq!(responses.len(), 4);

    assert!(responses[0].partial);
    assert_eq!(responses[0].thought_text(), "The user greets me.");
    assert!(responses[1].partial);
    assert_eq!(responses[1].text(), "Hel");
    assert!(responses[2].partial);
    assert_eq!(responses[2].text(), "lo");

    let terminal = &responses[3];
    assert!(!terminal.partial);
    assert_eq!(terminal.text(), "Hello");
    assert_eq!(terminal.finish_reason, Some(FinishReason::Stop));
    assert_eq!(terminal.response_id.as_deref(), Some("resp_mock_1"));
    assert!(terminal.usage.is_some());

    assert!(responses.iter().filter(|r| !r.partial).count() == 1);
}

#[tokio::test]
async fn streaming_request_sets_stream_flag() {
    let mock = MockArk::start().await.unwrap();
    let model = ResponsesModel::from_config(&ConfigBuilder::new(&mock.base_url()).build()).unwrap();

    let stream = model.generate_stream(&request()).await.unwrap();
    let _: Vec<_> = stream.collect().await;

    let captured = mock.last_request();
    assert_eq!(captured.body["stream"], true);
    assert_eq!(captured.headers["accept"], "text/event-stream");
}

#[tokio::test]
async fn truncated_stream_ends_with_error() {
    let mock = MockArk::start_with(Behavior::Truncated).await.unwrap();
    let model = ResponsesModel::from_config(&ConfigBuilder::new(&mock.base_url()).build()).unwrap();

    let responses: Vec<_> = model.generate_content(&request(), true).collect().await;

    let (last, partials) = responses.split_last().unwrap();
    assert_eq!(partials.len(), 3);
    assert!(partials.iter().all(|r| r.as_ref().unwrap().partial));

    let err = last.as_ref().unwrap_err();
    assert!(matches!(err, LlmError::Streaming(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn non_streaming_switch_yields_single_terminal() {
    let mock = MockArk::start().await.unwrap();
    let model = ResponsesModel::from_config(&ConfigBuilder::new(&mock.base_url()).build()).unwrap();

    let responses: Vec<_> = model.generate_content(&request(), false).collect().await;

    assert_eq!(responses.len(), 1);
    let response = responses[0].as_ref().unwrap();
    assert!(!response.partial);
    assert_eq!(response.text(), "Hello");
    assert!(mock.last_request().body.get("stream").is_none());
}
