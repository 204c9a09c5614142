//! Stream factory
//!
//! Drives a [`StreamAggregator`] from an SSE byte stream. The returned stream
//! is lazy: bytes are only pulled when the consumer polls for the next chunk.

use eventsource_stream::{EventStreamError, Eventsource};
use futures_util::{Stream, StreamExt};

use crate::error::{LlmError, Result};
use crate::standards::openai::streaming::StreamAggregator;
use crate::streaming::{ChunkStreamHandle, StreamConfig};
use crate::types::{ChatResponse, StreamChunk};
use crate::utils::cancel::CancelHandle;

/// Aggregate an SSE byte stream into normalized chunks.
///
/// - The done marker and a clean end of the byte stream both produce the final
///   `Finish` chunk.
/// - A transport error is yielded as one `Error` chunk carrying the error
///   unchanged; the stream then ends without a `Finish`.
/// - After [`CancelHandle::cancel`], open tool calls are dropped and nothing
///   more is yielded.
pub fn aggregate_sse_stream<S, B>(byte_stream: S, config: StreamConfig) -> ChunkStreamHandle
where
    S: Stream<Item = std::result::Result<B, LlmError>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let cancel = CancelHandle::new();
    let token = cancel.token();

    let stream = async_stream::stream! {
        let mut events = Box::pin(byte_stream.eventsource());
        let mut aggregator = StreamAggregator::new();

        loop {
            let item = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    aggregator.cancel();
                    return;
                }
                item = events.next() => item,
            };

            let chunks = match item {
                None => aggregator.finish(),
                Some(Ok(event)) => {
                    let data = event.data.trim();
                    if data.is_empty() {
                        continue;
                    }
                    if config.is_done_marker(data) {
                        aggregator.finish()
                    } else {
                        aggregator.process_data(data)
                    }
                }
                Some(Err(EventStreamError::Transport(e))) => {
                    tracing::warn!(label = %config.label, error = %e, "stream transport failed");
                    aggregator.cancel();
                    yield StreamChunk::Error(e);
                    return;
                }
                Some(Err(e)) => {
                    tracing::warn!(label = %config.label, error = %e, "SSE framing failed");
                    aggregator.cancel();
                    yield StreamChunk::Error(LlmError::StreamError(format!(
                        "SSE stream error ({}): {e}",
                        config.label
                    )));
                    return;
                }
            };

            for chunk in chunks {
                if token.is_cancelled() {
                    aggregator.cancel();
                    return;
                }
                yield chunk;
            }

            if aggregator.is_closed() {
                break;
            }
        }
    };

    ChunkStreamHandle {
        stream: Box::pin(stream),
        cancel,
    }
}

/// Aggregate a streamed HTTP response.
///
/// A non-success status is returned as [`LlmError::HttpError`] before any
/// streaming starts.
pub async fn aggregate_response(
    response: reqwest::Response,
    config: StreamConfig,
) -> Result<ChunkStreamHandle> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(LlmError::HttpError(format!("HTTP {status}: {body}")));
    }

    let byte_stream = response
        .bytes_stream()
        .map(|chunk| chunk.map_err(|e| LlmError::HttpError(format!("Stream error: {e}"))));

    Ok(aggregate_sse_stream(byte_stream, config))
}

/// Drain a chunk stream into a [`ChatResponse`].
///
/// Text chunks are concatenated and tool calls kept in emission order.
/// Undecodable events are skipped; a transport error is returned as-is. A
/// stream that ends without `Finish` is [`LlmError::Cancelled`] when its handle
/// was cancelled.
pub async fn collect_response(handle: ChunkStreamHandle) -> Result<ChatResponse> {
    let (mut stream, cancel) = handle.into_parts();
    let mut text = String::new();
    let mut tool_calls = Vec::new();

    while let Some(chunk) = stream.next().await {
        match chunk {
            StreamChunk::Text(delta) => text.push_str(&delta),
            StreamChunk::ToolCall(call) => tool_calls.push(call),
            StreamChunk::Finish { reason, usage } => {
                return Ok(ChatResponse {
                    text,
                    tool_calls,
                    finish_reason: reason,
                    usage,
                });
            }
            StreamChunk::Error(e) if e.is_transport() => return Err(e),
            StreamChunk::Error(e) => {
                tracing::debug!(error = %e, "skipping undecodable event");
            }
        }
    }

    if cancel.is_cancelled() {
        return Err(LlmError::Cancelled);
    }
    Err(LlmError::StreamError(
        "stream ended before the response finished".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FinishReason;
    use futures::channel::mpsc;

    type Bytes = std::result::Result<&'static [u8], LlmError>;

    async fn collect(data: Vec<Bytes>) -> Vec<StreamChunk> {
        let handle = aggregate_sse_stream(futures::stream::iter(data), StreamConfig::new("test"));
        handle.stream.collect().await
    }

    #[tokio::test]
    async fn frames_split_across_byte_chunks() {
        let chunks = collect(vec![
            Ok(b"data: {\"choices\":[{\"delta\":{\"content\":\"He".as_slice()),
            Ok(b"llo\"}}]}\n\ndata: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,".as_slice()),
            Ok(b"\"id\":\"call_1\",\"function\":{\"name\":\"f\",\"arguments\":\"{\\\"a\\\":\"}}]}}]}\n\n".as_slice()),
            Ok(b"data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"function\":{\"arguments\":\"2}\"}}]}}]}\n\n".as_slice()),
            Ok(b": keep-alive\n\n".as_slice()),
            Ok(b"data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"tool_calls\"}]}\n\n".as_slice()),
            Ok(b"data: [DONE]\n\n".as_slice()),
        ])
        .await;

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].as_text(), Some("Hello"));
        let call = chunks[1].as_tool_call().unwrap();
        assert_eq!(call.id, "call_1");
        assert_eq!(call.arguments().unwrap()["a"], 2);
        assert!(matches!(
            chunks[2],
            StreamChunk::Finish {
                reason: FinishReason::ToolCalls,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn nothing_after_done_marker() {
        let chunks = collect(vec![
            Ok(b"data: {\"choices\":[{\"delta\":{\"content\":\"a\"},\"finish_reason\":\"stop\"}]}\n\n".as_slice()),
            Ok(b"data: [DONE]\n\n".as_slice()),
            Ok(b"data: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}\n\n".as_slice()),
        ])
        .await;

        assert_eq!(chunks.len(), 2);
        assert!(chunks[1].is_finish());
    }

    #[tokio::test]
    async fn end_of_bytes_without_marker_still_finishes() {
        let chunks = collect(vec![Ok(
            b"data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\n".as_slice(),
        )])
        .await;

        assert_eq!(chunks.len(), 2);
        assert!(matches!(
            chunks[1],
            StreamChunk::Finish {
                reason: FinishReason::Other,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn transport_error_ends_without_finish() {
        let chunks = collect(vec![
            Ok(b"data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\n".as_slice()),
            Err(LlmError::HttpError("connection reset".into())),
            Ok(b"data: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}\n\n".as_slice()),
        ])
        .await;

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].as_text(), Some("a"));
        assert_eq!(
            chunks[1],
            StreamChunk::Error(LlmError::HttpError("connection reset".into()))
        );
    }

    #[tokio::test]
    async fn bad_event_is_reported_in_band() {
        let chunks = collect(vec![
            Ok(b"data: {oops}\n\n".as_slice()),
            Ok(b"data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\n".as_slice()),
            Ok(b"data: [DONE]\n\n".as_slice()),
        ])
        .await;

        assert_eq!(chunks.len(), 3);
        assert!(matches!(chunks[0], StreamChunk::Error(LlmError::ParseError(_))));
        assert_eq!(chunks[1].as_text(), Some("a"));
        assert!(chunks[2].is_finish());
    }

    #[tokio::test]
    async fn cancel_stops_the_stream() {
        let (tx, rx) = mpsc::unbounded::<Bytes>();
        let ChunkStreamHandle { mut stream, cancel } =
            aggregate_sse_stream(rx, StreamConfig::new("test"));

        tx.unbounded_send(Ok(
            b"data: {\"choices\":[{\"delta\":{\"content\":\"a\",\"tool_calls\":[{\"index\":0,\"id\":\"c\",\"function\":{\"name\":\"f\",\"arguments\":\"{\"}}]}}]}\n\n"
                .as_slice(),
        ))
        .unwrap();
        assert_eq!(stream.next().await.unwrap().as_text(), Some("a"));

        cancel.cancel();
        tx.unbounded_send(Ok(
            b"data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n".as_slice(),
        ))
        .unwrap();

        assert!(stream.next().await.is_none());
        assert!(cancel.is_cancelled());
    }

    #[tokio::test]
    async fn cancel_before_first_poll_yields_nothing() {
        let handle = aggregate_sse_stream(
            futures::stream::iter(vec![Ok::<_, LlmError>(b"data: [DONE]\n\n".as_slice())]),
            StreamConfig::new("test"),
        );
        handle.cancel.cancel();
        let chunks: Vec<_> = handle.stream.collect().await;
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn collect_folds_chunks_into_a_response() {
        let handle = aggregate_sse_stream(
            futures::stream::iter(vec![
                Ok::<_, LlmError>(b"data: {oops}\n\n".as_slice()),
                Ok(b"data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n".as_slice()),
                Ok(b"data: {\"choices\":[{\"delta\":{\"content\":\"lo\"},\"finish_reason\":\"length\"}]}\n\n".as_slice()),
                Ok(b"data: [DONE]\n\n".as_slice()),
            ]),
            StreamConfig::new("test"),
        );

        let resp = collect_response(handle).await.unwrap();
        assert_eq!(resp.text, "Hello");
        assert_eq!(resp.finish_reason, FinishReason::Length);
        assert!(!resp.has_tool_calls());
    }

    #[tokio::test]
    async fn collect_after_cancel_is_cancelled() {
        let handle = aggregate_sse_stream(
            futures::stream::iter(vec![Ok::<_, LlmError>(b"data: [DONE]\n\n".as_slice())]),
            StreamConfig::new("test"),
        );
        handle.cancel.cancel();
        assert_eq!(collect_response(handle).await, Err(LlmError::Cancelled));
    }

    #[tokio::test]
    async fn collect_returns_transport_errors() {
        let handle = aggregate_sse_stream(
            futures::stream::iter(vec![Err::<&[u8], _>(LlmError::HttpError("reset".into()))]),
            StreamConfig::new("test"),
        );
        assert_eq!(
            collect_response(handle).await,
            Err(LlmError::HttpError("reset".into()))
        );
    }
}
