//! Core Data Type Definitions
//!
//! The provider-neutral vocabulary of the crate, organized by functionality:
//!
//! - **`common`** - Finish reasons and token usage
//! - **`tools`** - Tool descriptors and their typed provider options
//! - **`streaming`** - Normalized stream chunks and tool-call records
//! - **`response`** - The one-shot (non-streaming) result
//!
//! Everything is re-exported here:
//!
//! ```rust
//! use lmwire::types::{ChatResponse, FinishReason, StreamChunk, ToolDescriptor};
//! ```

pub mod common;
pub mod response;
pub mod streaming;
pub mod tools;

pub use common::*;
pub use response::*;
pub use streaming::*;
pub use tools::*;
