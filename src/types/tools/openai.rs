//! Typed options for the OpenAI tool branches that take configuration.
//!
//! Field names follow the camelCase convention used for provider options;
//! the snake_case wire shapes live in `standards::openai::tools`.

use serde::{Deserialize, Serialize};

/// Options for a grammar- or text-constrained custom tool (`openai.custom`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomToolOptions {
    /// Tool name the model sees
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<CustomToolFormat>,
}

impl CustomToolOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            format: None,
        }
    }
}

/// Input format of a custom tool.
///
/// `syntax` and `definition` only mean something for grammar formats; they are
/// dropped when compiling a text format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomToolFormat {
    #[serde(rename = "type")]
    pub kind: CustomFormatKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax: Option<GrammarSyntax>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

impl CustomToolFormat {
    /// Free-form text input.
    pub fn text() -> Self {
        Self {
            kind: CustomFormatKind::Text,
            syntax: None,
            definition: None,
        }
    }

    /// Input constrained by a grammar.
    pub fn grammar(syntax: GrammarSyntax, definition: impl Into<String>) -> Self {
        Self {
            kind: CustomFormatKind::Grammar,
            syntax: Some(syntax),
            definition: Some(definition.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomFormatKind {
    Grammar,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrammarSyntax {
    Lark,
    Regex,
}

/// Options for the sandboxed shell tool (`openai.shell`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellToolOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<ShellEnvironment>,
}

/// Where shell commands run.
///
/// Each variant only carries the fields that are meaningful for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShellEnvironment {
    /// A container provisioned on demand by the provider.
    #[serde(rename_all = "camelCase")]
    ContainerAuto {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file_ids: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        memory_limit: Option<MemoryLimit>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        network_policy: Option<NetworkPolicy>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        skills: Option<Vec<ContainerSkill>>,
    },
    /// An existing container.
    #[serde(rename_all = "camelCase")]
    ContainerReference { container_id: String },
    /// The caller's own machine.
    Local {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        skills: Option<Vec<LocalSkill>>,
    },
}

impl ShellEnvironment {
    /// An auto container with nothing configured.
    pub fn container_auto() -> Self {
        Self::ContainerAuto {
            file_ids: None,
            memory_limit: None,
            network_policy: None,
            skills: None,
        }
    }

    pub fn container_reference(container_id: impl Into<String>) -> Self {
        Self::ContainerReference {
            container_id: container_id.into(),
        }
    }

    pub fn local() -> Self {
        Self::Local { skills: None }
    }
}

/// Memory ceiling for an auto container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryLimit {
    #[serde(rename = "1g")]
    Gb1,
    #[serde(rename = "4g")]
    Gb4,
    #[serde(rename = "16g")]
    Gb16,
    #[serde(rename = "64g")]
    Gb64,
}

impl MemoryLimit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gb1 => "1g",
            Self::Gb4 => "4g",
            Self::Gb16 => "16g",
            Self::Gb64 => "64g",
        }
    }
}

/// Outbound network access for an auto container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NetworkPolicy {
    Disabled,
    #[serde(rename_all = "camelCase")]
    Allowlist {
        allowed_domains: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        domain_secrets: Option<Vec<DomainSecret>>,
    },
}

/// A secret injected for requests to one allowlisted domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSecret {
    pub domain: String,
    pub name: String,
    pub value: String,
}

/// A skill mounted into a container environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContainerSkill {
    #[serde(rename_all = "camelCase")]
    SkillReference {
        skill_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version: Option<String>,
    },
    Inline {
        name: String,
        description: String,
        source: InlineSkillSource,
    },
}

/// Zipped skill bundle, base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineSkillSource {
    #[serde(default = "default_skill_media_type")]
    pub media_type: String,
    pub data: String,
}

fn default_skill_media_type() -> String {
    "application/zip".to_string()
}

/// A skill available on the caller's machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSkill {
    pub name: String,
    pub description: String,
    pub path: String,
}
