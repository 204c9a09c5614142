//! OpenAI(-compatible) protocol utilities.
#![deny(unsafe_code)]

use crate::types::FinishReason;

/// Map an OpenAI `finish_reason` token onto [`FinishReason`].
///
/// Both the streaming and non-streaming paths go through here. `None` means the
/// payload carried no token at all; unrecognized tokens are `Some(Other)`.
pub fn parse_finish_reason(reason: Option<&str>) -> Option<FinishReason> {
    match reason {
        Some("stop") => Some(FinishReason::Stop),
        Some("length") => Some(FinishReason::Length),
        Some("tool_calls") => Some(FinishReason::ToolCalls),
        Some("content_filter") => Some(FinishReason::ContentFilter),
        Some("function_call") => Some(FinishReason::ToolCalls),
        Some(_) => Some(FinishReason::Other),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_tokens() {
        assert_eq!(parse_finish_reason(Some("stop")), Some(FinishReason::Stop));
        assert_eq!(parse_finish_reason(Some("length")), Some(FinishReason::Length));
        assert_eq!(
            parse_finish_reason(Some("tool_calls")),
            Some(FinishReason::ToolCalls)
        );
        assert_eq!(
            parse_finish_reason(Some("content_filter")),
            Some(FinishReason::ContentFilter)
        );
    }

    #[test]
    fn legacy_function_call_is_tool_calls() {
        assert_eq!(
            parse_finish_reason(Some("function_call")),
            Some(FinishReason::ToolCalls)
        );
    }

    #[test]
    fn unknown_token_is_other_and_missing_is_none() {
        assert_eq!(parse_finish_reason(Some("eos")), Some(FinishReason::Other));
        assert_eq!(parse_finish_reason(Some("")), Some(FinishReason::Other));
        assert_eq!(parse_finish_reason(None), None);
    }
}
