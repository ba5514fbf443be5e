//! Conversion of server-sent events into canonical responses

use futures_util::{Stream, StreamExt, stream};

use super::response::decode_response;
use crate::error::LlmError;
use crate::protocol::responses::ResponseStreamEvent;
use crate::types::{LlmResponse, Part};

/// Decode one stream event
///
/// Text deltas become partial responses. The completed, incomplete and failed
/// events become the terminal response. Lifecycle events are swallowed.
pub fn decode_event(event: ResponseStreamEvent, model_version: Option<&str>) -> Option<LlmResponse> {
    let partial = |part| Some(LlmResponse::partial(vec![part], model_version.map(str::to_owned)));

    match event {
        ResponseStreamEvent::ReasoningSummaryTextDelta { delta } => partial(Part::thought(delta)),
        ResponseStreamEvent::OutputTextDelta { delta } => partial(Part::text(delta)),
        ResponseStreamEvent::Completed { response }
        | ResponseStreamEvent::Incomplete { response }
        | ResponseStreamEvent::Failed { response } => Some(decode_response(response)),
        ResponseStreamEvent::Other => {
            tracing::debug!("ignoring stream lifecycle event");
            None
        }
    }
}

/// Decode an event stream into partial responses followed by one terminal response
///
/// The stream ends right after the terminal response or the first error.
/// Running out of events before a terminal event is reported as
/// [`LlmError::Streaming`].
pub fn decode_stream<S>(events: S, model_version: Option<String>) -> impl Stream<Item = Result<LlmResponse, LlmError>> + Send
where
    S: Stream<Item = Result<ResponseStreamEvent, LlmError>> + Send + Unpin,
{
    stream::unfold(Some((events, model_version)), |state| async move {
        let (mut events, model_version) = state?;

        while let Some(item) = events.next().await {
            match item {
                Ok(event) if event.is_terminal() => {
                    return decode_event(event, None).map(|resp| (Ok(resp), None));
                }
                Ok(event) => {
                    if let Some(resp) = decode_event(event, model_version.as_deref()) {
                        return Some((Ok(resp), Some((events, model_version))));
                    }
                }
                Err(e) => return Some((Err(e), None)),
            }
        }

        tracing::warn!("event stream ended without a completed response");
        Some((
            Err(LlmError::Streaming("stream ended without a completed response".to_owned())),
            None,
        ))
    })
}
