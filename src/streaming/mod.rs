//! Streaming
//!
//! Turns an SSE byte stream into normalized [`StreamChunk`](crate::types::StreamChunk)s
//! by driving a [`StreamAggregator`](crate::standards::openai::streaming::StreamAggregator).

mod factory;
mod json;
mod sse_json;
mod types;

pub use factory::{aggregate_response, aggregate_sse_stream, collect_response};
pub use json::{parse_json_with_repair, parse_tool_arguments};
pub use sse_json::StreamConfig;
pub use types::{ChunkStream, ChunkStreamHandle};
