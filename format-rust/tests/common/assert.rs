use llm_format::{OutputItem, ResponseObject};
use regex::Regex;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct MessageAssertion {
    /// Pattern the message text must match.
    pub text: Option<Regex>,
    /// Exact `output_text` expected on the response.
    pub output_text: Option<String>,
}

impl MessageAssertion {
    pub fn assert(&self, response: &ResponseObject) -> Result<(), String> {
        let [OutputItem::Message(message)] = response.output.as_slice() else {
            return Err(format!(
                "Expected a single message item\nReceived:\n{}",
                serde_json::to_string_pretty(&response.output).unwrap()
            ));
        };

        if response.output_text.is_empty() {
            return Err("Expected output_text to be preserved for a message".to_string());
        }
        if message.text() != response.output_text {
            return Err(format!(
                "Expected message text to equal output_text\nMessage: {}\noutput_text: {}",
                message.text(),
                response.output_text
            ));
        }

        if let Some(pattern) = &self.text {
            if !pattern.is_match(&response.output_text) {
                return Err(format!(
                    "Expected output_text matching: {pattern}\nReceived: {}",
                    response.output_text
                ));
            }
        }

        if let Some(expected) = &self.output_text {
            if expected != &response.output_text {
                return Err(format!(
                    "Expected output_text: {expected}\nReceived: {}",
                    response.output_text
                ));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ToolCallAssertion {
    pub tool_name: String,
    /// The decoded arguments must equal this value exactly.
    pub args: Value,
}

#[derive(Debug, Clone)]
pub struct ToolCallsAssertion {
    pub tool_calls: Vec<ToolCallAssertion>,
}

impl ToolCallsAssertion {
    pub fn assert(&self, response: &ResponseObject) -> Result<(), String> {
        let [OutputItem::ToolCalls(item)] = response.output.as_slice() else {
            return Err(format!(
                "Expected a single tool_calls item\nReceived:\n{}",
                serde_json::to_string_pretty(&response.output).unwrap()
            ));
        };

        if !response.output_text.is_empty() {
            return Err(format!(
                "Expected output_text to be hidden for tool calls, got {:?}",
                response.output_text
            ));
        }

        if item.tool_calls.len() != self.tool_calls.len() {
            return Err(format!(
                "Expected {} tool calls\nReceived:\n{}",
                self.tool_calls.len(),
                serde_json::to_string_pretty(&item.tool_calls).unwrap()
            ));
        }

        for (expected, actual) in self.tool_calls.iter().zip(&item.tool_calls) {
            if actual.call_type != "function" || !actual.id.starts_with("call_") {
                return Err(format!("Unexpected tool call shape: {actual:?}"));
            }
            if actual.function.name != expected.tool_name {
                return Err(format!(
                    "Expected tool {}, got {}",
                    expected.tool_name, actual.function.name
                ));
            }
            let args = actual.function.parsed_arguments().map_err(|err| {
                format!(
                    "Arguments should be a valid JSON string, got={:?} err={err}",
                    actual.function.arguments
                )
            })?;
            if args != expected.args {
                return Err(format!(
                    "Expected arguments {}\nReceived: {args}",
                    expected.args
                ));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum OutputAssertion {
    Message(MessageAssertion),
    ToolCalls(ToolCallsAssertion),
}

impl OutputAssertion {
    pub fn assert(&self, response: &ResponseObject) -> Result<(), String> {
        match self {
            Self::Message(assertion) => assertion.assert(response),
            Self::ToolCalls(assertion) => assertion.assert(response),
        }
    }
}
