//! OpenAI-compatible streaming aggregation (protocol layer)
//!
//! [`StreamAggregator`] is a synchronous reducer: it is fed one decoded stream
//! event at a time and returns the normalized chunks that event completes.
//! Text is passed through immediately; tool-call fragments are buffered per
//! call index until the response finishes, then parsed once.
//!
//! Driving the reducer from an SSE byte stream (and cancelling it) is the job
//! of [`crate::streaming`].

use std::collections::BTreeMap;

use crate::error::LlmError;
use crate::standards::openai::types::{OpenAiStreamEvent, ToolCallFragment};
use crate::standards::openai::utils::parse_finish_reason;
use crate::streaming::parse_tool_arguments;
use crate::types::{FinishReason, StreamChunk, ToolCall, Usage};

/// Lifecycle of one streamed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorState {
    /// Consuming events.
    Active,
    /// A finish reason was seen; the Finish chunk is pending.
    Finishing,
    /// Terminal. Nothing more is emitted.
    Closed,
}

/// Buffered state for one tool call, keyed by its stream index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallAccumulator {
    index: u32,
    id: Option<String>,
    name: Option<String>,
    kind: Option<String>,
    arguments: String,
    fragments: usize,
}

impl ToolCallAccumulator {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            id: None,
            name: None,
            kind: None,
            arguments: String::new(),
            fragments: 0,
        }
    }

    /// Fold one fragment into the accumulator.
    ///
    /// `id`, `name` and `type` are write-once: the first non-empty value seen
    /// for this index sticks. Argument text is always appended, in call order.
    pub fn apply(&mut self, fragment: &ToolCallFragment) {
        set_once(&mut self.id, fragment.id.as_deref());
        set_once(&mut self.kind, fragment.kind.as_deref());

        if let Some(function) = &fragment.function {
            set_once(&mut self.name, function.name.as_deref());
            if let Some(arguments) = &function.arguments {
                self.arguments.push_str(arguments);
            }
        }
        self.fragments += 1;
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Argument text received so far.
    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    /// Number of fragments folded in.
    pub fn fragments(&self) -> usize {
        self.fragments
    }

    /// Close the accumulator and parse its arguments.
    pub fn finish(self) -> ToolCall {
        if let Some(kind) = self.kind.as_deref()
            && kind != "function"
        {
            tracing::debug!(index = self.index, kind, "non-function tool call type");
        }

        let id = self.id.unwrap_or_else(|| {
            tracing::warn!(index = self.index, "tool call finished without an id");
            format!("call_{}", self.index)
        });
        let name = self.name.unwrap_or_else(|| {
            tracing::warn!(index = self.index, "tool call finished without a name");
            String::new()
        });

        let arguments = parse_tool_arguments(&self.arguments);
        if let Err(e) = &arguments {
            tracing::warn!(tool_call_id = %id, tool = %name, error = %e.message, "malformed tool call arguments");
        }

        ToolCall {
            id,
            name,
            arguments,
        }
    }
}

fn set_once(slot: &mut Option<String>, value: Option<&str>) {
    if slot.is_none()
        && let Some(v) = value
        && !v.is_empty()
    {
        *slot = Some(v.to_string());
    }
}

/// Reduces the events of one streamed response into [`StreamChunk`]s.
///
/// Each response gets its own aggregator; it owns its accumulator table
/// exclusively and is not shared across requests.
///
/// Emission order: `Text`/`ToolCall` chunks in arrival order, then exactly one
/// `Finish`, then nothing. Tool calls are emitted (ascending by index) when the
/// finish reason arrives; the `Finish` itself is emitted by [`Self::finish`]
/// on the end-of-stream sentinel or transport closure, so a trailing usage
/// event can still be attached.
#[derive(Debug)]
pub struct StreamAggregator {
    state: AggregatorState,
    accumulators: BTreeMap<u32, ToolCallAccumulator>,
    finish_reason: Option<FinishReason>,
    usage: Option<Usage>,
}

impl Default for StreamAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamAggregator {
    pub fn new() -> Self {
        Self {
            state: AggregatorState::Active,
            accumulators: BTreeMap::new(),
            finish_reason: None,
            usage: None,
        }
    }

    pub fn state(&self) -> AggregatorState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == AggregatorState::Closed
    }

    /// Number of tool calls still being accumulated.
    pub fn open_tool_calls(&self) -> usize {
        self.accumulators.len()
    }

    /// Decode one SSE `data:` payload and process it.
    ///
    /// A payload that is not a valid event yields a single `Error` chunk; the
    /// aggregator stays usable.
    pub fn process_data(&mut self, data: &str) -> Vec<StreamChunk> {
        let decoded = serde_json::from_str::<OpenAiStreamEvent>(data);
        self.process_decoded(decoded)
    }

    /// Process an already-decoded JSON payload.
    pub fn process_json(&mut self, value: serde_json::Value) -> Vec<StreamChunk> {
        let decoded = serde_json::from_value::<OpenAiStreamEvent>(value);
        self.process_decoded(decoded)
    }

    fn process_decoded(
        &mut self,
        decoded: Result<OpenAiStreamEvent, serde_json::Error>,
    ) -> Vec<StreamChunk> {
        match decoded {
            Ok(event) => self.process_event(event),
            Err(_) if self.is_closed() => Vec::new(),
            Err(e) => {
                tracing::debug!(error = %e, "undecodable stream event");
                vec![StreamChunk::Error(LlmError::ParseError(format!(
                    "Failed to parse OpenAI-compatible event: {e}"
                )))]
            }
        }
    }

    /// Process one stream event.
    pub fn process_event(&mut self, event: OpenAiStreamEvent) -> Vec<StreamChunk> {
        if self.is_closed() {
            tracing::warn!("stream event received after the response closed; ignoring");
            return Vec::new();
        }

        let mut out = Vec::new();

        if let Some(usage) = &event.usage {
            self.usage = Some(usage.to_usage());
        }

        let Some(choice) = event.primary_choice() else {
            return out;
        };

        if let Some(delta) = &choice.delta {
            if let Some(text) = &delta.content
                && !text.is_empty()
            {
                out.push(StreamChunk::Text(text.clone()));
            }

            if let Some(fragments) = &delta.tool_calls {
                self.accumulate(fragments);
            }
        }

        if let Some(token) = choice.finish_reason.as_deref() {
            out.extend(self.begin_finish(token));
        }

        out
    }

    /// Handle the end-of-stream sentinel or transport closure.
    ///
    /// Flushes any tool call still open (when no finish reason arrived), emits
    /// the single `Finish` chunk, and closes the aggregator. Calling it again
    /// returns nothing.
    pub fn finish(&mut self) -> Vec<StreamChunk> {
        if self.is_closed() {
            return Vec::new();
        }

        let mut out = self.flush_tool_calls();
        let reason = self.finish_reason.unwrap_or(FinishReason::Other);
        tracing::debug!(
            reason = %reason,
            saw_finish_reason = self.finish_reason.is_some(),
            "stream finished"
        );
        out.push(StreamChunk::Finish {
            reason,
            usage: self.usage.take(),
        });
        self.state = AggregatorState::Closed;
        out
    }

    /// Abandon the response: drop all buffered tool calls and close without
    /// emitting anything further.
    pub fn cancel(&mut self) {
        if self.is_closed() {
            return;
        }
        tracing::debug!(
            open_tool_calls = self.accumulators.len(),
            "stream aggregation cancelled"
        );
        self.accumulators.clear();
        self.usage = None;
        self.state = AggregatorState::Closed;
    }

    fn accumulate(&mut self, fragments: &[ToolCallFragment]) {
        if self.state == AggregatorState::Finishing {
            tracing::warn!(
                fragments = fragments.len(),
                "tool call fragments after finish reason; ignoring"
            );
            return;
        }

        for (position, fragment) in fragments.iter().enumerate() {
            let index = fragment.index.unwrap_or(position as u32);
            tracing::trace!(
                index,
                bytes = fragment
                    .function
                    .as_ref()
                    .and_then(|f| f.arguments.as_ref())
                    .map_or(0, |a| a.len()),
                "tool call fragment"
            );
            self.accumulators
                .entry(index)
                .or_insert_with(|| ToolCallAccumulator::new(index))
                .apply(fragment);
        }
    }

    fn begin_finish(&mut self, token: &str) -> Vec<StreamChunk> {
        if self.finish_reason.is_some() {
            tracing::debug!(token, "duplicate finish reason; keeping the first");
            return Vec::new();
        }

        self.finish_reason = parse_finish_reason(Some(token));
        let out = self.flush_tool_calls();
        tracing::debug!(token, tool_calls = out.len(), "finish reason received");
        self.state = AggregatorState::Finishing;
        out
    }

    fn flush_tool_calls(&mut self) -> Vec<StreamChunk> {
        // BTreeMap iteration is ascending by index.
        std::mem::take(&mut self.accumulators)
            .into_values()
            .map(|acc| StreamChunk::ToolCall(acc.finish()))
            .collect()
    }
}
