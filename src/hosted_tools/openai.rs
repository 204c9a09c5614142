//! OpenAI Provider-Defined Tools
//!
//! Factory functions for the OpenAI tool branches that are not plain functions:
//! local shell, sandboxed shell, apply patch, and grammar/text custom tools.
//!
//! # Examples
//!
//! ```rust
//! use lmwire::hosted_tools::openai;
//! use lmwire::types::MemoryLimit;
//!
//! let local = openai::local_shell();
//!
//! let sandboxed = openai::shell()
//!     .with_container_auto(
//!         openai::ContainerAutoConfig::new()
//!             .with_file_ids(vec!["file_123".to_string()])
//!             .with_memory_limit(MemoryLimit::Gb4),
//!     )
//!     .build();
//!
//! let sql = openai::custom("run_sql")
//!     .with_description("Run a read-only query")
//!     .with_grammar(lmwire::types::GrammarSyntax::Lark, "start: \"SELECT\" ...")
//!     .build();
//! ```

use crate::types::{
    ContainerSkill, CustomToolFormat, CustomToolOptions, GrammarSyntax, LocalSkill, MemoryLimit,
    NetworkPolicy, ShellEnvironment, ShellToolOptions, ToolDescriptor,
};

pub const LOCAL_SHELL_ID: &str = "openai.local_shell";
pub const SHELL_ID: &str = "openai.shell";
pub const APPLY_PATCH_ID: &str = "openai.apply_patch";
pub const CUSTOM_ID: &str = "openai.custom";

/// Identities that compile to something other than a function tool.
pub const RESERVED_IDS: &[&str] = &[LOCAL_SHELL_ID, SHELL_ID, APPLY_PATCH_ID, CUSTOM_ID];

/// Whether `name` is one of the reserved tool identities.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_IDS.contains(&name)
}

/// Create a local shell tool. It has no configuration.
pub fn local_shell() -> ToolDescriptor {
    ToolDescriptor::provider_defined(LOCAL_SHELL_ID)
}

/// Create an apply patch tool. It has no configuration.
pub fn apply_patch() -> ToolDescriptor {
    ToolDescriptor::provider_defined(APPLY_PATCH_ID)
}

/// Create a sandboxed shell tool configuration.
pub fn shell() -> ShellConfig {
    ShellConfig::new()
}

/// Create a custom tool configuration.
pub fn custom(name: impl Into<String>) -> CustomToolConfig {
    CustomToolConfig::new(name)
}

/// Shell tool configuration builder
#[derive(Debug, Clone, Default)]
pub struct ShellConfig {
    environment: Option<ShellEnvironment>,
}

impl ShellConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run in a container the provider provisions on demand.
    pub fn with_container_auto(mut self, config: ContainerAutoConfig) -> Self {
        self.environment = Some(config.into_environment());
        self
    }

    /// Run in an existing container.
    pub fn with_container_reference(mut self, container_id: impl Into<String>) -> Self {
        self.environment = Some(ShellEnvironment::container_reference(container_id));
        self
    }

    /// Run on the caller's machine, optionally exposing local skills.
    pub fn with_local_environment(mut self, skills: Option<Vec<LocalSkill>>) -> Self {
        self.environment = Some(ShellEnvironment::Local { skills });
        self
    }

    /// Set the environment directly.
    pub fn with_environment(mut self, environment: ShellEnvironment) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn build(self) -> ToolDescriptor {
        let descriptor = ToolDescriptor::provider_defined(SHELL_ID);
        match self.environment {
            Some(environment) => descriptor.with_provider_options(ShellToolOptions {
                environment: Some(environment),
            }),
            None => descriptor,
        }
    }
}

/// Auto container configuration. Unset fields stay absent on the wire.
#[derive(Debug, Clone, Default)]
pub struct ContainerAutoConfig {
    file_ids: Option<Vec<String>>,
    memory_limit: Option<MemoryLimit>,
    network_policy: Option<NetworkPolicy>,
    skills: Option<Vec<ContainerSkill>>,
}

impl ContainerAutoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file_ids(mut self, file_ids: Vec<String>) -> Self {
        self.file_ids = Some(file_ids);
        self
    }

    pub fn with_memory_limit(mut self, limit: MemoryLimit) -> Self {
        self.memory_limit = Some(limit);
        self
    }

    pub fn with_network_policy(mut self, policy: NetworkPolicy) -> Self {
        self.network_policy = Some(policy);
        self
    }

    /// Set the skills list. An empty list is sent as an empty list.
    pub fn with_skills(mut self, skills: Vec<ContainerSkill>) -> Self {
        self.skills = Some(skills);
        self
    }

    fn into_environment(self) -> ShellEnvironment {
        ShellEnvironment::ContainerAuto {
            file_ids: self.file_ids,
            memory_limit: self.memory_limit,
            network_policy: self.network_policy,
            skills: self.skills,
        }
    }
}

/// Custom tool configuration builder
#[derive(Debug, Clone)]
pub struct CustomToolConfig {
    name: String,
    description: Option<String>,
    format: Option<CustomToolFormat>,
}

impl CustomToolConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            format: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Constrain input with a grammar definition.
    pub fn with_grammar(mut self, syntax: GrammarSyntax, definition: impl Into<String>) -> Self {
        self.format = Some(CustomToolFormat::grammar(syntax, definition));
        self
    }

    /// Accept unconstrained text input.
    pub fn with_text_format(mut self) -> Self {
        self.format = Some(CustomToolFormat::text());
        self
    }

    pub fn build(self) -> ToolDescriptor {
        let description = self.description.clone().unwrap_or_default();
        ToolDescriptor::provider_defined(CUSTOM_ID)
            .with_description(description)
            .with_provider_options(CustomToolOptions {
                name: self.name,
                description: self.description,
                format: self.format,
            })
    }
}
