//! Non-streaming result.

use crate::types::{FinishReason, ToolCall, Usage};

/// A complete response mapped from a single (non-streaming) payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    /// Assistant text; empty when the model only called tools
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: FinishReason,
    pub usage: Option<Usage>,
}

impl ChatResponse {
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}
