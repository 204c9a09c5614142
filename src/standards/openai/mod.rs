//! OpenAI(-compatible) protocol helpers.
//!
//! Wire types plus the three normalization entry points:
//! - [`tools::compile_tools`] renders tool descriptors for the outbound request
//! - [`streaming::StreamAggregator`] reduces stream events into chunks
//! - [`json_response::map_response`] maps a complete response payload
#![deny(unsafe_code)]

pub mod json_response;
pub mod request;
pub mod streaming;
pub mod tools;
pub mod types;
pub mod utils;
