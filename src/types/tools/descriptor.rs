//! Tool descriptor and provider option container.

use serde::{Deserialize, Serialize};

use super::{CustomToolOptions, ShellToolOptions};

/// Caller-facing tool definition.
///
/// `name` is the tool's identity. For user-defined functions it is the function
/// name the model sees; for provider tools it is a reserved id such as
/// `openai.shell` (see [`crate::hosted_tools::openai`]).
///
/// # Examples
///
/// ```rust
/// use lmwire::types::ToolDescriptor;
///
/// let tool = ToolDescriptor::function(
///     "get_weather",
///     "Get weather information",
///     serde_json::json!({
///         "type": "object",
///         "properties": { "location": { "type": "string" } }
///     }),
/// )
/// .with_strict(true);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Tool identity
    pub name: String,
    /// Human readable description
    #[serde(default)]
    pub description: String,
    /// JSON schema for the tool input
    #[serde(default = "empty_object_schema")]
    pub parameters: serde_json::Value,
    /// Ask the provider to enforce the schema exactly
    #[serde(default)]
    pub strict: bool,
    /// The provider runs this tool itself (hosted tools)
    #[serde(default)]
    pub provider_executed: bool,
    /// Branch-specific configuration
    #[serde(default, skip_serializing_if = "ToolProviderOptions::is_none")]
    pub provider_options: ToolProviderOptions,
}

fn empty_object_schema() -> serde_json::Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

impl ToolDescriptor {
    /// Create a user-defined function tool.
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            strict: false,
            provider_executed: false,
            provider_options: ToolProviderOptions::None,
        }
    }

    /// Create a provider-executed tool identified by a reserved id.
    pub fn provider_defined(id: impl Into<String>) -> Self {
        Self {
            name: id.into(),
            description: String::new(),
            parameters: empty_object_schema(),
            strict: false,
            provider_executed: true,
            provider_options: ToolProviderOptions::None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_provider_options(mut self, options: impl Into<ToolProviderOptions>) -> Self {
        self.provider_options = options.into();
        self
    }
}

/// Branch-specific tool configuration.
///
/// The typed variants are what the hosted-tool builders produce. `Json` holds an
/// undecoded payload (e.g. from a config file); the compiler decodes it against
/// the branch its identity selects and degrades when the shape does not fit.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ToolProviderOptions {
    #[default]
    None,
    Custom(CustomToolOptions),
    Shell(ShellToolOptions),
    Json(serde_json::Value),
}

impl ToolProviderOptions {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Custom(_) => "custom",
            Self::Shell(_) => "shell",
            Self::Json(_) => "json",
        }
    }
}

impl From<CustomToolOptions> for ToolProviderOptions {
    fn from(options: CustomToolOptions) -> Self {
        Self::Custom(options)
    }
}

impl From<ShellToolOptions> for ToolProviderOptions {
    fn from(options: ShellToolOptions) -> Self {
        Self::Shell(options)
    }
}

impl From<serde_json::Value> for ToolProviderOptions {
    fn from(value: serde_json::Value) -> Self {
        if value.is_null() {
            Self::None
        } else {
            Self::Json(value)
        }
    }
}

impl Serialize for ToolProviderOptions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::None => serializer.serialize_none(),
            Self::Custom(options) => options.serialize(serializer),
            Self::Shell(options) => options.serialize(serializer),
            Self::Json(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ToolProviderOptions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // The payload's branch is only known once the descriptor's identity is,
        // so keep it undecoded here.
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from(value))
    }
}
