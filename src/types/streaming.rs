//! Normalized streaming output.

use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::types::{FinishReason, Usage};

/// Parsed tool-call input.
pub type ToolArguments = serde_json::Map<String, serde_json::Value>;

/// One discrete, semantically complete piece of a response.
///
/// A well-formed sequence is zero or more `Text`/`ToolCall` chunks in arrival
/// order followed by exactly one `Finish`. `Error` only appears for problems
/// outside a single tool call (undecodable events, transport failures).
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    /// Incremental text, emitted as soon as it arrives
    Text(String),
    /// A completed tool call
    ToolCall(ToolCall),
    /// Terminal chunk
    Finish {
        reason: FinishReason,
        usage: Option<Usage>,
    },
    /// Failure that is not scoped to one tool call
    Error(LlmError),
}

impl StreamChunk {
    pub fn is_finish(&self) -> bool {
        matches!(self, Self::Finish { .. })
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_tool_call(&self) -> Option<&ToolCall> {
        match self {
            Self::ToolCall(call) => Some(call),
            _ => None,
        }
    }
}

/// A tool invocation requested by the model.
///
/// `arguments` is an `Err` when the provider's argument text was not a JSON
/// object; the rest of the response is unaffected.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Result<ToolArguments, MalformedToolArguments>,
}

impl ToolCall {
    pub fn is_malformed(&self) -> bool {
        self.arguments.is_err()
    }

    /// Parsed arguments, if well-formed.
    pub fn arguments(&self) -> Option<&ToolArguments> {
        self.arguments.as_ref().ok()
    }
}

/// Argument text that could not be parsed as a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("malformed tool call arguments: {message}")]
pub struct MalformedToolArguments {
    /// The argument text exactly as received
    pub raw: String,
    /// Parser diagnostic
    pub message: String,
}
