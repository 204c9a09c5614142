//! lmwire
//!
//! Provider response normalization for OpenAI-style LLM APIs.
//!
//! - [`standards::openai::tools`] compiles provider-neutral tool descriptors
//!   into the wire-format `tools` array.
//! - [`standards::openai::streaming`] reduces streamed deltas into ordered
//!   [`types::StreamChunk`]s, reassembling fragmented tool-call arguments.
//! - [`standards::openai::json_response`] maps a complete response.
//! - [`streaming`] drives the aggregator from an SSE byte stream with
//!   cancellation.
//!
//! Transport is the caller's concern: this crate only consumes the bytes or
//! payload a request produced.
#![deny(unsafe_code)]

pub mod error;
pub mod hosted_tools;
pub mod standards;
pub mod streaming;
pub mod types;
pub mod utils;

pub use error::LlmError;
