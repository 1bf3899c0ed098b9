use crate::{
    id_utils::generate_id, parse_standalone_tool_calls, usage_utils, DeclaredTools, FunctionCall,
    MessageContent, OutputItem, OutputMessage, ParsedToolCall, ResponseObject, ResponseStatus,
    ToolCall, ToolCallDetectionOptions, ToolCallsItem, RESPONSE_OBJECT_TYPE,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResponseBuilderOptions {
    /// How tool call requests are told apart from prose.
    pub tool_calls: ToolCallDetectionOptions,
    /// Whether the prior (reasoning) text is emitted as a `reasoning` part of
    /// the message.
    pub include_reasoning: bool,
}

impl Default for ResponseBuilderOptions {
    fn default() -> Self {
        Self {
            tool_calls: ToolCallDetectionOptions::default(),
            include_reasoning: true,
        }
    }
}

/// Renders raw model completions as Responses API objects.
///
/// A completion is rendered as a `tool_calls` item only when it is a
/// standalone `{"tool_calls": [...]}` object naming at least one declared
/// tool. Anything else, including a tool call JSON quoted inside a longer
/// answer, is rendered as an assistant `message`.
#[derive(Debug, Clone, Default)]
pub struct ResponseBuilder {
    options: ResponseBuilderOptions,
}

impl ResponseBuilder {
    pub fn new(options: ResponseBuilderOptions) -> Self {
        Self { options }
    }

    /// Values outside `0.0..=1.0` are clamped; a non-finite value restores
    /// the default.
    #[must_use]
    pub fn with_min_tool_call_coverage(mut self, min_coverage: f64) -> Self {
        self.options.tool_calls = ToolCallDetectionOptions::new(min_coverage);
        self
    }

    #[must_use]
    pub fn with_reasoning(mut self, include_reasoning: bool) -> Self {
        self.options.include_reasoning = include_reasoning;
        self
    }

    pub fn options(&self) -> &ResponseBuilderOptions {
        &self.options
    }

    /// Build the response for one completion.
    ///
    /// `prompt` is only used to estimate input usage. `prior_text` is the
    /// reasoning the model produced before `completion`, if any.
    pub fn build(
        &self,
        id: &str,
        model: &str,
        prompt: &str,
        prior_text: Option<&str>,
        completion: &str,
        declared_tools: &DeclaredTools,
    ) -> ResponseObject {
        let span = debug_span!("llm_format.build_response", response_id = id, model = model);
        let _enter = span.enter();

        let reasoning = prior_text.map(str::trim).filter(|text| !text.is_empty());
        let usage = usage_utils::estimate_usage(prompt, reasoning.unwrap_or_default(), completion);

        let (output, output_text) =
            match parse_standalone_tool_calls(completion, declared_tools, &self.options.tool_calls)
            {
                Ok(calls) => {
                    debug!(tool_calls = calls.len(), "rendering completion as tool calls");
                    (vec![tool_calls_item(&calls)], String::new())
                }
                Err(reason) => {
                    debug!(%reason, "rendering completion as message");
                    let text = completion.trim();
                    (vec![self.message_item(text, reasoning)], text.to_string())
                }
            };

        ResponseObject {
            id: id.to_string(),
            object: RESPONSE_OBJECT_TYPE.to_string(),
            created_at: chrono::Utc::now().timestamp(),
            model: model.to_string(),
            status: ResponseStatus::Completed,
            output,
            output_text,
            usage: Some(usage),
        }
    }

    fn message_item(&self, text: &str, reasoning: Option<&str>) -> OutputItem {
        let mut content = Vec::with_capacity(2);
        if self.options.include_reasoning {
            if let Some(reasoning) = reasoning {
                content.push(MessageContent::reasoning(reasoning));
            }
        }
        content.push(MessageContent::output_text(text));

        OutputItem::Message(OutputMessage::assistant(generate_id("msg"), content))
    }
}

fn tool_calls_item(calls: &[ParsedToolCall]) -> OutputItem {
    let tool_calls = calls
        .iter()
        .map(|call| {
            ToolCall::function(
                generate_id("call"),
                FunctionCall::new(call.name.clone(), call.arguments()),
            )
        })
        .collect();

    OutputItem::ToolCalls(ToolCallsItem { tool_calls })
}

/// Build a response with the default options.
pub fn build_response_object(
    id: &str,
    model: &str,
    prompt: &str,
    prior_text: Option<&str>,
    completion: &str,
    declared_tools: &DeclaredTools,
) -> ResponseObject {
    ResponseBuilder::default().build(id, model, prompt, prior_text, completion, declared_tools)
}
