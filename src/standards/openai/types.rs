//! OpenAI(-compatible) wire format types.
//!
//! The subset of the Chat Completions schema the normalization layer reads:
//! streamed chunks and complete responses. Every field that a provider may omit
//! (or send as `null`) is an `Option`.
#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::types::Usage;

/// One `data:` payload of a streamed response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiStreamEvent {
    pub id: Option<String>,
    pub object: Option<String>,
    pub created: Option<u64>,
    pub model: Option<String>,
    pub choices: Option<Vec<StreamChoice>>,
    pub usage: Option<OpenAiUsage>,
}

impl OpenAiStreamEvent {
    /// The choice this layer tracks: `index` 0, or a choice without an index.
    ///
    /// Deltas for other choices (`n > 1`) are ignored.
    pub fn primary_choice(&self) -> Option<&StreamChoice> {
        self.choices
            .as_ref()
            .and_then(|c| c.iter().find(|choice| matches!(choice.index, None | Some(0))))
    }
}

/// Stream choice structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamChoice {
    pub index: Option<u32>,
    pub delta: Option<StreamDelta>,
    pub finish_reason: Option<String>,
}

/// Stream delta structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamDelta {
    pub role: Option<String>,
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ToolCallFragment>>,
}

/// A partial tool call carried by one stream event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCallFragment {
    /// Position of the call in the response; stable across fragments
    pub index: Option<u32>,
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub function: Option<FunctionFragment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionFragment {
    pub name: Option<String>,
    pub arguments: Option<String>,
}

/// A complete (non-streaming) chat completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiChatResponse {
    pub id: Option<String>,
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ResponseChoice>,
    pub usage: Option<OpenAiUsage>,
}

impl OpenAiChatResponse {
    /// Choice 0, or a choice without an index.
    pub fn primary_choice(&self) -> Option<&ResponseChoice> {
        self.choices
            .iter()
            .find(|choice| matches!(choice.index, None | Some(0)))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseChoice {
    pub index: Option<u32>,
    pub message: Option<ResponseMessage>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub role: Option<String>,
    pub content: Option<String>,
    pub tool_calls: Option<Vec<OpenAiToolCall>>,
}

/// OpenAI tool call.
///
/// Every field is optional so that one incomplete call cannot fail the
/// decoding of the whole response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiToolCall {
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub function: Option<OpenAiFunction>,
}

/// OpenAI function call payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiFunction {
    pub name: Option<String>,
    pub arguments: Option<String>,
}

/// Usage block shared by streamed and complete responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiUsage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
    pub prompt_tokens_details: Option<PromptTokensDetails>,
    pub completion_tokens_details: Option<CompletionTokensDetails>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptTokensDetails {
    pub cached_tokens: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionTokensDetails {
    pub reasoning_tokens: Option<u32>,
}

impl OpenAiUsage {
    pub fn to_usage(&self) -> Usage {
        let mut builder = Usage::builder()
            .prompt_tokens(self.prompt_tokens.unwrap_or(0))
            .completion_tokens(self.completion_tokens.unwrap_or(0));

        if let Some(total) = self.total_tokens {
            builder = builder.total_tokens(total);
        }

        if let Some(cached) = self
            .prompt_tokens_details
            .as_ref()
            .and_then(|details| details.cached_tokens)
        {
            builder = builder.with_cached_tokens(cached);
        }

        if let Some(reasoning) = self
            .completion_tokens_details
            .as_ref()
            .and_then(|details| details.reasoning_tokens)
        {
            builder = builder.with_reasoning_tokens(reasoning);
        }

        builder.build()
    }
}
