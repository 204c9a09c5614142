//! Tool definition compiler.
//!
//! Maps provider-neutral [`ToolDescriptor`]s to the discriminated tool shapes the
//! OpenAI API accepts. Compilation is total: the descriptor's identity picks the
//! branch, and options that do not fit the branch degrade to the branch's
//! identity-only form instead of failing.

use serde::{Deserialize, Serialize};

use crate::hosted_tools::openai::{APPLY_PATCH_ID, CUSTOM_ID, LOCAL_SHELL_ID, SHELL_ID};
use crate::types::{
    ContainerSkill, CustomFormatKind, CustomToolOptions, DomainSecret, GrammarSyntax,
    LocalSkill, MemoryLimit, NetworkPolicy, ShellEnvironment, ShellToolOptions, ToolDescriptor,
    ToolProviderOptions,
};

/// One entry of the outbound `tools` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireToolDefinition {
    Function(WireFunctionTool),
    Custom(WireCustomTool),
    LocalShell,
    Shell(WireShellTool),
    ApplyPatch,
}

impl WireToolDefinition {
    /// The `type` discriminator as sent on the wire.
    pub fn wire_type(&self) -> &'static str {
        match self {
            Self::Function(_) => "function",
            Self::Custom(_) => "custom",
            Self::LocalShell => "local_shell",
            Self::Shell(_) => "shell",
            Self::ApplyPatch => "apply_patch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireFunctionTool {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
    /// Only ever `Some(true)`; non-strict tools omit the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireCustomTool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<WireCustomFormat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireCustomFormat {
    Grammar {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        syntax: Option<GrammarSyntax>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        definition: Option<String>,
    },
    Text,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireShellTool {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<WireShellEnvironment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireShellEnvironment {
    ContainerAuto {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file_ids: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        memory_limit: Option<MemoryLimit>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        network_policy: Option<WireNetworkPolicy>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        skills: Option<Vec<WireContainerSkill>>,
    },
    ContainerReference {
        container_id: String,
    },
    Local {
        /// Local skills carry no `type` field.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        skills: Option<Vec<LocalSkill>>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireNetworkPolicy {
    Disabled,
    Allowlist {
        allowed_domains: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        domain_secrets: Option<Vec<DomainSecret>>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireContainerSkill {
    SkillReference {
        skill_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version: Option<String>,
    },
    Inline {
        name: String,
        description: String,
        source: WireSkillSource,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireSkillSource {
    Base64 { media_type: String, data: String },
}

/// Compile a list of descriptors for the outbound request.
///
/// Returns `None` for an absent or empty list so that no `tools` field is sent.
pub fn compile_tools(tools: Option<&[ToolDescriptor]>) -> Option<Vec<WireToolDefinition>> {
    let tools = tools.filter(|t| !t.is_empty())?;
    Some(tools.iter().map(compile_tool).collect())
}

/// Compile one descriptor. Never fails.
pub fn compile_tool(tool: &ToolDescriptor) -> WireToolDefinition {
    match tool.name.as_str() {
        LOCAL_SHELL_ID => WireToolDefinition::LocalShell,
        APPLY_PATCH_ID => WireToolDefinition::ApplyPatch,
        SHELL_ID => WireToolDefinition::Shell(compile_shell(tool)),
        CUSTOM_ID => WireToolDefinition::Custom(compile_custom(tool)),
        name => {
            if name.starts_with("openai.") {
                tracing::debug!(tool = name, "unrecognized provider tool id; compiling as a function");
            }
            WireToolDefinition::Function(WireFunctionTool {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameters.clone(),
                strict: tool.strict.then_some(true),
            })
        }
    }
}

fn compile_shell(tool: &ToolDescriptor) -> WireShellTool {
    let options = match &tool.provider_options {
        ToolProviderOptions::Shell(options) => Some(options.clone()),
        ToolProviderOptions::Json(value) => {
            decode_options::<ShellToolOptions>(&tool.name, value)
        }
        ToolProviderOptions::None => None,
        other => {
            degraded(&tool.name, other.kind());
            None
        }
    };

    WireShellTool {
        environment: options
            .and_then(|o| o.environment)
            .map(compile_environment),
    }
}

fn compile_environment(environment: ShellEnvironment) -> WireShellEnvironment {
    match environment {
        ShellEnvironment::ContainerAuto {
            file_ids,
            memory_limit,
            network_policy,
            skills,
        } => WireShellEnvironment::ContainerAuto {
            file_ids,
            memory_limit,
            network_policy: network_policy.map(compile_network_policy),
            skills: skills.map(|s| s.into_iter().map(compile_container_skill).collect()),
        },
        ShellEnvironment::ContainerReference { container_id } => {
            WireShellEnvironment::ContainerReference { container_id }
        }
        ShellEnvironment::Local { skills } => WireShellEnvironment::Local { skills },
    }
}

fn compile_network_policy(policy: NetworkPolicy) -> WireNetworkPolicy {
    match policy {
        NetworkPolicy::Disabled => WireNetworkPolicy::Disabled,
        NetworkPolicy::Allowlist {
            allowed_domains,
            domain_secrets,
        } => WireNetworkPolicy::Allowlist {
            allowed_domains,
            domain_secrets,
        },
    }
}

fn compile_container_skill(skill: ContainerSkill) -> WireContainerSkill {
    match skill {
        ContainerSkill::SkillReference { skill_id, version } => {
            WireContainerSkill::SkillReference { skill_id, version }
        }
        ContainerSkill::Inline {
            name,
            description,
            source,
        } => WireContainerSkill::Inline {
            name,
            description,
            source: WireSkillSource::Base64 {
                media_type: source.media_type,
                data: source.data,
            },
        },
    }
}

fn compile_custom(tool: &ToolDescriptor) -> WireCustomTool {
    let options = match &tool.provider_options {
        ToolProviderOptions::Custom(options) => Some(options.clone()),
        ToolProviderOptions::Json(value) => {
            decode_options::<CustomToolOptions>(&tool.name, value)
        }
        ToolProviderOptions::None => None,
        other => {
            degraded(&tool.name, other.kind());
            None
        }
    };

    let Some(options) = options else {
        // Identity-only form.
        return WireCustomTool {
            name: wire_safe_name(&tool.name),
            description: (!tool.description.is_empty()).then(|| tool.description.clone()),
            format: None,
        };
    };

    WireCustomTool {
        name: options.name,
        description: options.description,
        format: options.format.map(|format| match format.kind {
            CustomFormatKind::Grammar => WireCustomFormat::Grammar {
                syntax: format.syntax,
                definition: format.definition,
            },
            CustomFormatKind::Text => WireCustomFormat::Text,
        }),
    }
}

/// Tool names on the wire must match `^[a-zA-Z0-9_-]+$`.
fn wire_safe_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn decode_options<T>(identity: &str, value: &serde_json::Value) -> Option<T>
where
    T: serde::de::DeserializeOwned,
{
    match serde_json::from_value::<T>(value.clone()) {
        Ok(options) => Some(options),
        Err(e) => {
            tracing::debug!(tool = identity, error = %e, "tool options do not fit; compiling identity-only definition");
            None
        }
    }
}

fn degraded(identity: &str, kind: &str) {
    tracing::debug!(
        tool = identity,
        options = kind,
        "tool options belong to another branch; compiling identity-only definition"
    );
}
