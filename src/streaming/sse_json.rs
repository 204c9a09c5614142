//! SSE stream configuration

/// How the SSE layer frames one response.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Label used in error messages and logs (e.g. "openai" / "groq").
    pub label: String,
    /// SSE `data` payloads that mark the end of the stream.
    pub done_markers: Vec<String>,
}

impl StreamConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            done_markers: vec!["[DONE]".to_string()],
        }
    }

    pub fn with_done_markers(mut self, markers: Vec<String>) -> Self {
        self.done_markers = markers;
        self
    }

    pub(crate) fn is_done_marker(&self, data: &str) -> bool {
        self.done_markers.iter().any(|m| m == data)
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::new("openai")
    }
}
