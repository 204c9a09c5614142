//! Common types shared by the streaming and non-streaming paths.

use serde::{Deserialize, Serialize};

/// Why the model stopped generating.
///
/// This is a closed vocabulary: provider tokens that are not recognized map to
/// [`FinishReason::Other`] instead of failing. The OpenAI token spelling lives in
/// [`crate::standards::openai::utils::parse_finish_reason`].
///
/// # Example
/// ```rust
/// use lmwire::types::FinishReason;
///
/// let reason = FinishReason::ToolCalls;
/// assert_eq!(reason.as_str(), "tool-calls");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum FinishReason {
    /// Model completed naturally or hit a stop sequence.
    ///
    /// OpenAI: `stop`
    Stop,

    /// Model reached the token limit.
    ///
    /// OpenAI: `length`
    Length,

    /// Model wants one or more tools to be called.
    ///
    /// OpenAI: `tool_calls` (and the legacy `function_call`)
    ToolCalls,

    /// Output was withheld by the provider's safety filter.
    ///
    /// OpenAI: `content_filter`
    ContentFilter,

    /// Any other, missing, or unrecognized reason.
    Other,
}

impl FinishReason {
    /// Stable provider-neutral spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Length => "length",
            Self::ToolCalls => "tool-calls",
            Self::ContentFilter => "content-filter",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for FinishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token usage reported by the provider.
///
/// Carried through verbatim; no accounting is derived from it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,
    /// Tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens as reported
    pub total_tokens: u32,
    /// Prompt tokens served from the provider's prompt cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_tokens: Option<u32>,
    /// Completion tokens spent on hidden reasoning
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_tokens: Option<u32>,
}

impl Usage {
    /// Start building a usage record.
    pub fn builder() -> UsageBuilder {
        UsageBuilder::default()
    }
}

/// Builder for constructing Usage with detailed token information
#[derive(Debug, Default)]
pub struct UsageBuilder {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: Option<u32>,
    cached_tokens: Option<u32>,
    reasoning_tokens: Option<u32>,
}

impl UsageBuilder {
    /// Set prompt tokens
    pub fn prompt_tokens(mut self, tokens: u32) -> Self {
        self.prompt_tokens = tokens;
        self
    }

    /// Set completion tokens
    pub fn completion_tokens(mut self, tokens: u32) -> Self {
        self.completion_tokens = tokens;
        self
    }

    /// Set total tokens (if not set, will be calculated as prompt + completion)
    pub fn total_tokens(mut self, tokens: u32) -> Self {
        self.total_tokens = Some(tokens);
        self
    }

    /// Add cached prompt tokens
    pub fn with_cached_tokens(mut self, cached: u32) -> Self {
        self.cached_tokens = Some(cached);
        self
    }

    /// Add reasoning tokens
    pub fn with_reasoning_tokens(mut self, reasoning: u32) -> Self {
        self.reasoning_tokens = Some(reasoning);
        self
    }

    pub fn build(self) -> Usage {
        Usage {
            prompt_tokens: self.prompt_tokens,
            completion_tokens: self.completion_tokens,
            total_tokens: self
                .total_tokens
                .unwrap_or_else(|| self.prompt_tokens.saturating_add(self.completion_tokens)),
            cached_tokens: self.cached_tokens,
            reasoning_tokens: self.reasoning_tokens,
        }
    }
}
