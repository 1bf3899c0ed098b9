use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The object type of every rendered response.
pub const RESPONSE_OBJECT_TYPE: &str = "response";

/// A response rendered from a single model completion, shaped after the
/// `OpenAI` Responses API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ResponseObject {
    /// Unique identifier for this response, supplied by the caller.
    pub id: String,
    /// The object type of this resource - always set to `response`.
    pub object: String,
    /// Unix timestamp (in seconds) of when this response was created.
    pub created_at: i64,
    /// Model ID echoed back to the client.
    pub model: String,
    pub status: ResponseStatus,
    /// Either a single `message` item or a single `tool_calls` item.
    pub output: Vec<OutputItem>,
    /// The aggregated answer text. Empty when the output holds tool calls.
    pub output_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<ResponseUsage>,
}

/// The status of a response or of one of its output items.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Completed,
}

/// An item in the `output` array of a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    Message(OutputMessage),
    ToolCalls(ToolCallsItem),
}

/// An assistant message carrying the conversational answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct OutputMessage {
    /// The unique ID of the output message.
    pub id: String,
    /// The role of the output message. Always `assistant`.
    pub role: String,
    pub status: ResponseStatus,
    pub content: Vec<MessageContent>,
}

/// A part of an output message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Reasoning(ReasoningContent),
    OutputText(OutputTextContent),
}

/// The reasoning the model produced before answering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ReasoningContent {
    pub text: String,
}

/// A text output from the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct OutputTextContent {
    pub text: String,
    /// Always empty; kept for client compatibility.
    pub annotations: Vec<serde_json::Value>,
}

/// A wrapper holding every tool call detected in the completion, in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ToolCallsItem {
    pub tool_calls: Vec<ToolCall>,
}

/// A call to a declared tool, in the chat completions shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ToolCall {
    /// The ID of the tool call, used to match the tool result with the tool
    /// call.
    pub id: String,
    /// The type of the tool. Always `function`.
    #[serde(rename = "type")]
    pub call_type: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct FunctionCall {
    /// The name of the function to call.
    pub name: String,
    /// A JSON string of the arguments to pass to the function.
    pub arguments: String,
}

/// Represents the estimated token usage of the response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ResponseUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
    pub output_tokens_details: OutputTokensDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct OutputTokensDetails {
    /// The number of reasoning tokens.
    pub reasoning_tokens: u32,
}

/// The tool names the caller made available to the model. A tool call found
/// in a completion is only honored when its name is declared here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct DeclaredTools(pub(crate) BTreeSet<String>);

/// A tool call as written by the model, before ids are assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedToolCall {
    /// The name of the tool to call.
    pub name: String,
    /// The arguments to pass to the tool. Always a JSON object.
    pub input: serde_json::Value,
}
