//! Provider-defined (hosted) tool factories.
//!
//! These build [`crate::types::ToolDescriptor`]s with the reserved identities the
//! tool compiler recognizes, plus typed options for the branches that take them.

pub mod openai;
