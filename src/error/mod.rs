//! Error Handling Module
//!
//! Core error type for the normalization layer plus conversions from the
//! serialization and HTTP crates it sits on top of.
//!
//! Malformed tool-call arguments are deliberately *not* an `LlmError`: they are
//! scoped to a single tool call and travel on [`crate::types::ToolCall`].

mod conversions;
pub mod types;

pub use types::*;
