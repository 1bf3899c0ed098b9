use crate::{
    DeclaredTools, FunctionCall, MessageContent, OutputItem, OutputMessage, OutputTextContent,
    ParsedToolCall, ReasoningContent, ResponseObject, ResponseStatus, ToolCall, ToolCallsItem,
};
use std::collections::BTreeSet;

impl DeclaredTools {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tool(mut self, name: impl Into<String>) -> Self {
        self.0.insert(name.into());
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for DeclaredTools {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect::<BTreeSet<_>>())
    }
}

impl From<&[&str]> for DeclaredTools {
    fn from(value: &[&str]) -> Self {
        value.iter().copied().collect()
    }
}

impl From<Vec<String>> for DeclaredTools {
    fn from(value: Vec<String>) -> Self {
        value.into_iter().collect()
    }
}

impl ReasoningContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl OutputTextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            annotations: vec![],
        }
    }
}

impl MessageContent {
    pub fn output_text(text: impl Into<String>) -> Self {
        Self::OutputText(OutputTextContent::new(text))
    }

    pub fn reasoning(text: impl Into<String>) -> Self {
        Self::Reasoning(ReasoningContent::new(text))
    }
}

impl OutputMessage {
    /// Create a completed assistant message with the given content parts.
    pub fn assistant(id: impl Into<String>, content: Vec<MessageContent>) -> Self {
        Self {
            id: id.into(),
            role: "assistant".to_string(),
            status: ResponseStatus::Completed,
            content,
        }
    }

    /// The concatenated `output_text` parts of the message.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|content| match content {
                MessageContent::OutputText(part) => Some(part.text.as_str()),
                MessageContent::Reasoning(_) => None,
            })
            .collect()
    }

    pub fn reasoning(&self) -> Option<&str> {
        self.content.iter().find_map(|content| match content {
            MessageContent::Reasoning(part) => Some(part.text.as_str()),
            MessageContent::OutputText(_) => None,
        })
    }
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Decode the JSON string arguments.
    pub fn parsed_arguments(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.arguments)
    }
}

impl ToolCall {
    pub fn function(id: impl Into<String>, function: FunctionCall) -> Self {
        Self {
            id: id.into(),
            call_type: "function".to_string(),
            function,
        }
    }
}

impl ParsedToolCall {
    pub fn new(name: impl Into<String>, input: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            input,
        }
    }

    /// The input serialized as a compact JSON string.
    pub fn arguments(&self) -> String {
        // Serializing a `Value` cannot fail.
        serde_json::to_string(&self.input).unwrap_or_else(|_| "{}".to_string())
    }
}

impl OutputItem {
    pub fn as_message(&self) -> Option<&OutputMessage> {
        match self {
            Self::Message(message) => Some(message),
            Self::ToolCalls(_) => None,
        }
    }

    pub fn as_tool_calls(&self) -> Option<&[ToolCall]> {
        match self {
            Self::ToolCalls(ToolCallsItem { tool_calls }) => Some(tool_calls.as_slice()),
            Self::Message(_) => None,
        }
    }
}

impl ResponseObject {
    /// All tool calls across the output items, in order.
    pub fn tool_calls(&self) -> Vec<&ToolCall> {
        self.output
            .iter()
            .filter_map(OutputItem::as_tool_calls)
            .flatten()
            .collect()
    }

    pub fn has_tool_calls(&self) -> bool {
        self.output
            .iter()
            .any(|item| matches!(item, OutputItem::ToolCalls(_)))
    }
}
