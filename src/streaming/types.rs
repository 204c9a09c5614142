//! Stream types

use std::pin::Pin;

use futures::Stream;

use crate::types::StreamChunk;
use crate::utils::cancel::CancelHandle;

/// Normalized chunk stream.
///
/// Failures are in-band ([`StreamChunk::Error`]) so that chunks produced
/// before a transport failure are still observed in order.
pub type ChunkStream = Pin<Box<dyn Stream<Item = StreamChunk> + Send>>;

/// Chunk stream with first-class cancellation handle
///
/// # Example
///
/// ```rust,ignore
/// let handle = aggregate_response(response, StreamConfig::new("openai")).await?;
/// let cancel = handle.cancel.clone();
/// tokio::spawn(async move {
///     tokio::time::sleep(Duration::from_secs(5)).await;
///     cancel.cancel();
/// });
/// ```
pub struct ChunkStreamHandle {
    /// The underlying chunk stream
    pub stream: ChunkStream,
    /// Handle to cancel the stream
    pub cancel: CancelHandle,
}

impl ChunkStreamHandle {
    pub fn into_parts(self) -> (ChunkStream, CancelHandle) {
        (self.stream, self.cancel)
    }
}

impl std::fmt::Debug for ChunkStreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkStreamHandle")
            .field("cancel", &self.cancel)
            .finish_non_exhaustive()
    }
}
