//! Non-streaming response mapping.
//!
//! The one-shot counterpart of [`super::streaming::StreamAggregator`]: a
//! complete chat completion is mapped to a [`ChatResponse`] in a single pass.
//! Tool-call arguments and finish tokens go through the same helpers as the
//! streaming path, so both agree on every mapping.
#![deny(unsafe_code)]

use crate::error::{LlmError, Result};
use crate::standards::openai::types::{OpenAiChatResponse, OpenAiToolCall};
use crate::standards::openai::utils::parse_finish_reason;
use crate::streaming::parse_tool_arguments;
use crate::types::{ChatResponse, FinishReason, ToolCall};

/// Map a decoded response payload.
///
/// Only choice 0 (or a choice without an index) is read. A missing choice or
/// finish token maps to [`FinishReason::Other`].
pub fn map_response(response: &OpenAiChatResponse) -> ChatResponse {
    let choice = response.primary_choice();
    let message = choice.and_then(|c| c.message.as_ref());

    let text = message
        .and_then(|m| m.content.clone())
        .unwrap_or_default();

    let tool_calls: Vec<ToolCall> = message
        .and_then(|m| m.tool_calls.as_ref())
        .map(|calls| {
            calls
                .iter()
                .enumerate()
                .map(|(position, call)| map_tool_call(position, call))
                .collect()
        })
        .unwrap_or_default();

    let finish_reason = parse_finish_reason(choice.and_then(|c| c.finish_reason.as_deref()))
        .unwrap_or(FinishReason::Other);

    tracing::debug!(
        id = response.id.as_deref().unwrap_or_default(),
        reason = %finish_reason,
        tool_calls = tool_calls.len(),
        "mapped response"
    );

    ChatResponse {
        text,
        tool_calls,
        finish_reason,
        usage: response.usage.as_ref().map(|u| u.to_usage()),
    }
}

/// Map a response payload given as a JSON value.
pub fn map_response_json(value: serde_json::Value) -> Result<ChatResponse> {
    let response: OpenAiChatResponse = serde_json::from_value(value)
        .map_err(|e| LlmError::ParseError(format!("Invalid OpenAI-compatible response: {e}")))?;
    Ok(map_response(&response))
}

/// Map a response body.
pub fn map_response_body(body: &str) -> Result<ChatResponse> {
    let response: OpenAiChatResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::ParseError(format!("Invalid OpenAI-compatible response: {e}")))?;
    Ok(map_response(&response))
}

/// Read and map a complete HTTP response.
///
/// A non-success status is an [`LlmError::HttpError`] carrying the status and
/// body text.
pub async fn read_response(response: reqwest::Response) -> Result<ChatResponse> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(LlmError::HttpError(format!("HTTP {status}: {body}")));
    }

    map_response_body(&body)
}

fn map_tool_call(position: usize, call: &OpenAiToolCall) -> ToolCall {
    let id = match &call.id {
        Some(id) => id.clone(),
        None => {
            tracing::warn!(position, "tool call without an id; synthesizing one");
            format!("call_{position}")
        }
    };

    let function = call.function.as_ref();
    if function.is_none() {
        tracing::warn!(tool_call_id = %id, "tool call without a function payload");
    }
    let name = match function.and_then(|f| f.name.clone()) {
        Some(name) => name,
        None => {
            if function.is_some() {
                tracing::warn!(tool_call_id = %id, "tool call without a name");
            }
            String::new()
        }
    };
    let raw = function
        .and_then(|f| f.arguments.as_deref())
        .unwrap_or_default();

    let arguments = parse_tool_arguments(raw);
    if let Err(e) = &arguments {
        tracing::warn!(tool_call_id = %id, tool = %name, error = %e.message, "malformed tool call arguments");
    }

    ToolCall {
        id,
        name,
        arguments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standards::openai::streaming::StreamAggregator;
    use crate::types::StreamChunk;
    use serde_json::json;

    #[test]
    fn maps_text_tool_calls_and_usage() {
        let body = json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "Looking it up",
                    "tool_calls": [
                        {"id": "call_1", "type": "function",
                         "function": {"name": "search", "arguments": "{\"q\":\"rust\"}"}},
                        {"id": "call_2", "type": "function",
                         "function": {"name": "noop", "arguments": ""}}
                    ]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19,
                      "completion_tokens_details": {"reasoning_tokens": 3}}
        });

        let resp = map_response_json(body).unwrap();
        assert_eq!(resp.text, "Looking it up");
        assert_eq!(resp.finish_reason, FinishReason::ToolCalls);
        assert!(resp.has_tool_calls());
        assert_eq!(resp.tool_calls[0].name, "search");
        assert_eq!(resp.tool_calls[0].arguments().unwrap()["q"], "rust");
        assert!(resp.tool_calls[1].arguments().unwrap().is_empty());

        let usage = resp.usage.unwrap();
        assert_eq!(usage.total_tokens, 19);
        assert_eq!(usage.reasoning_tokens, Some(3));
        assert_eq!(usage.cached_tokens, None);
    }

    #[test]
    fn malformed_arguments_stay_on_the_call() {
        let body = r#"{"choices":[{"message":{"content":null,"tool_calls":[
            {"id":"call_1","type":"function","function":{"name":"a","arguments":"{\"x\":"}},
            {"id":"call_2","type":"function","function":{"name":"b","arguments":"{\"y\":2}"}}
        ]},"finish_reason":"tool_calls"}]}"#;

        let resp = map_response_body(body).unwrap();
        assert_eq!(resp.text, "");
        assert!(resp.tool_calls[0].is_malformed());
        assert_eq!(resp.tool_calls[0].arguments.as_ref().unwrap_err().raw, "{\"x\":");
        assert_eq!(resp.tool_calls[1].arguments().unwrap()["y"], 2);
    }

    #[test]
    fn incomplete_tool_call_does_not_fail_the_response() {
        let body = r#"{"choices":[{"message":{"content":"ok","tool_calls":[
            {"type":"function","function":{"name":"a","arguments":null}},
            {"id":"call_2","type":"function","function":{"name":null,"arguments":"{}"}},
            {"id":"call_3","type":"function","function":{"name":"c","arguments":"{\"z\":1}"}}
        ]},"finish_reason":"tool_calls"}]}"#;

        let resp = map_response_body(body).unwrap();
        assert_eq!(resp.text, "ok");
        assert_eq!(resp.tool_calls.len(), 3);

        assert_eq!(resp.tool_calls[0].id, "call_0");
        assert_eq!(resp.tool_calls[0].name, "a");
        assert!(resp.tool_calls[0].arguments().unwrap().is_empty());

        assert_eq!(resp.tool_calls[1].id, "call_2");
        assert_eq!(resp.tool_calls[1].name, "");

        assert_eq!(resp.tool_calls[2].arguments().unwrap()["z"], 1);
    }

    #[test]
    fn only_choice_zero_is_mapped() {
        let resp = map_response_json(json!({"choices": [
            {"index": 1, "message": {"content": "second"}, "finish_reason": "length"},
            {"index": 0, "message": {"content": "first"}, "finish_reason": "stop"}
        ]}))
        .unwrap();
        assert_eq!(resp.text, "first");
        assert_eq!(resp.finish_reason, FinishReason::Stop);
    }

    #[test]
    fn missing_choices_map_to_other() {
        let resp = map_response_json(json!({"id": "x"})).unwrap();
        assert_eq!(resp.text, "");
        assert!(resp.tool_calls.is_empty());
        assert_eq!(resp.finish_reason, FinishReason::Other);
        assert!(resp.usage.is_none());
    }

    #[test]
    fn invalid_body_is_a_parse_error() {
        let err = map_response_body("{\"choices\": 5}").unwrap_err();
        assert!(matches!(err, LlmError::ParseError(_)));
    }

    fn streamed_reason(token: &str) -> Option<FinishReason> {
        let mut agg = StreamAggregator::new();
        agg.process_json(json!({"choices": [{"delta": {}, "finish_reason": token}]}));
        agg.finish().into_iter().find_map(|c| match c {
            StreamChunk::Finish { reason, .. } => Some(reason),
            _ => None,
        })
    }

    fn mapped_reason(token: &str) -> FinishReason {
        map_response_json(json!({"choices": [{"message": {"content": ""}, "finish_reason": token}]}))
            .unwrap()
            .finish_reason
    }

    #[test]
    fn streaming_and_complete_paths_agree_on_finish_reasons() {
        let cases = [
            ("stop", FinishReason::Stop),
            ("length", FinishReason::Length),
            ("tool_calls", FinishReason::ToolCalls),
            ("content_filter", FinishReason::ContentFilter),
            ("function_call", FinishReason::ToolCalls),
            ("brand_new_reason", FinishReason::Other),
        ];

        for (token, expected) in cases {
            assert_eq!(mapped_reason(token), expected, "complete path: {token}");
            assert_eq!(streamed_reason(token), Some(expected), "streaming path: {token}");
        }
    }

    proptest::proptest! {
        #[test]
        fn paths_agree_for_arbitrary_tokens(token in "[a-z_]{1,16}") {
            proptest::prop_assert_eq!(streamed_reason(&token), Some(mapped_reason(&token)));
        }
    }
}
