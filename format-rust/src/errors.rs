use thiserror::Error;

/// Why a completion was not accepted as a tool call request. The response
/// builder never surfaces these; it renders the completion as prose instead.
#[derive(Error, Debug)]
pub enum ToolCallParseError {
    /// No tools were declared, so detection was skipped.
    #[error("No tools declared")]
    NoDeclaredTools,
    /// No JSON object with a `tool_calls` key was found in the text.
    #[error("No tool_calls object found")]
    NoToolCalls,
    /// A `{"tool_calls"` span was found but it is not valid JSON.
    #[error("Invalid tool_calls JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// The `tool_calls` value is not an array or holds no usable entry.
    #[error("Empty tool_calls array")]
    EmptyToolCalls,
    /// Every entry named a tool the caller did not declare.
    #[error("Undeclared tools: {}", .0.join(", "))]
    UndeclaredTools(Vec<String>),
    /// The JSON span is only a fragment of a longer prose answer.
    #[error("tool_calls JSON covers {coverage:.2} of the text (minimum {minimum:.2})")]
    EmbeddedInProse { coverage: f64, minimum: f64 },
}

pub type ToolCallParseResult<T> = Result<T, ToolCallParseError>;
