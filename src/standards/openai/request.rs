//! Outbound request fields owned by the normalization layer.
//!
//! The caller builds the rest of the request body (model, messages, ...) and
//! hands it to [`apply_request_options`], which merges in the compiled tool
//! list and the related out-of-band fields.
#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{LlmError, Result};
use crate::hosted_tools::openai::{APPLY_PATCH_ID, LOCAL_SHELL_ID, SHELL_ID};
use crate::standards::openai::tools::{WireToolDefinition, compile_tools};
use crate::types::ToolDescriptor;

/// How the model may pick tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ToolChoice {
    Auto,
    None,
    Required,
    /// Force one tool, named by its descriptor identity (or custom tool name)
    Tool { name: String },
}

impl ToolChoice {
    pub fn tool(name: impl Into<String>) -> Self {
        Self::Tool { name: name.into() }
    }

    fn to_wire(&self, tools: &[WireToolDefinition]) -> Value {
        match self {
            Self::Auto => json!("auto"),
            Self::None => json!("none"),
            Self::Required => json!("required"),
            Self::Tool { name } => match name.as_str() {
                LOCAL_SHELL_ID => json!({"type": "local_shell"}),
                SHELL_ID => json!({"type": "shell"}),
                APPLY_PATCH_ID => json!({"type": "apply_patch"}),
                _ if tools.iter().any(|t| {
                    matches!(t, WireToolDefinition::Custom(custom) if custom.name == *name)
                }) =>
                {
                    json!({"type": "custom", "name": name})
                }
                _ => json!({"type": "function", "name": name}),
            },
        }
    }
}

/// Tool-related request options.
#[derive(Debug, Clone, Default)]
pub struct OpenAiRequestOptions {
    pub tools: Option<Vec<ToolDescriptor>>,
    pub tool_choice: Option<ToolChoice>,
    /// Passed through verbatim when set
    pub prompt_cache_key: Option<String>,
    /// Passed through verbatim when set (e.g. `"24h"`)
    pub prompt_cache_retention: Option<String>,
    /// Request a streamed response with a trailing usage event
    pub stream: bool,
}

impl OpenAiRequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tools(mut self, tools: Vec<ToolDescriptor>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = Some(choice);
        self
    }

    pub fn with_prompt_cache_key(mut self, key: impl Into<String>) -> Self {
        self.prompt_cache_key = Some(key.into());
        self
    }

    pub fn with_prompt_cache_retention(mut self, retention: impl Into<String>) -> Self {
        self.prompt_cache_retention = Some(retention.into());
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}

/// Merge the options into a JSON request body.
///
/// `tools` is only written when at least one tool compiles; `tool_choice` is
/// only written alongside tools. Unset cache fields are left out entirely.
pub fn apply_request_options(body: &mut Value, options: &OpenAiRequestOptions) -> Result<()> {
    let Some(obj) = body.as_object_mut() else {
        return Err(LlmError::InvalidParameter(
            "request body must be a JSON object".to_string(),
        ));
    };

    if let Some(tools) = compile_tools(options.tools.as_deref()) {
        if let Some(choice) = &options.tool_choice {
            obj.insert("tool_choice".to_string(), choice.to_wire(&tools));
        }
        obj.insert("tools".to_string(), serde_json::to_value(&tools)?);
    } else if options.tool_choice.is_some() {
        tracing::debug!("tool_choice set without tools; omitting");
    }

    if let Some(key) = &options.prompt_cache_key {
        obj.insert("prompt_cache_key".to_string(), json!(key));
    }
    if let Some(retention) = &options.prompt_cache_retention {
        obj.insert("prompt_cache_retention".to_string(), json!(retention));
    }

    if options.stream {
        obj.insert("stream".to_string(), json!(true));
        obj.insert("stream_options".to_string(), json!({"include_usage": true}));
    }

    Ok(())
}
