use crate::{DeclaredTools, ParsedToolCall, ToolCallParseError, ToolCallParseResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{collections::HashMap, ops::Range};
use tracing::trace;

/// The minimum share of the meaningful completion text the `tool_calls`
/// JSON must cover to be treated as a tool call request rather than an
/// example quoted inside prose.
pub const DEFAULT_MIN_TOOL_CALL_COVERAGE: f64 = 0.95;

const TOOL_CALLS_KEY: &str = "tool_calls";
const TOOL_CALLS_NEEDLE: &str = "\"tool_calls\"";
const ARGUMENT_KEYS: [&str; 3] = ["input", "arguments", "parameters"];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToolCallDetectionOptions {
    /// Ratio in `0.0..=1.0` of JSON characters to meaningful characters (the
    /// trimmed completion without code fence markers) required for the
    /// completion to count as a standalone tool call.
    pub min_coverage: f64,
}

impl Default for ToolCallDetectionOptions {
    fn default() -> Self {
        Self {
            min_coverage: DEFAULT_MIN_TOOL_CALL_COVERAGE,
        }
    }
}

impl ToolCallDetectionOptions {
    #[must_use]
    pub fn new(min_coverage: f64) -> Self {
        Self {
            min_coverage: sanitize_min_coverage(min_coverage),
        }
    }

    /// The threshold detection applies: `min_coverage` clamped to
    /// `0.0..=1.0`, or the default when it is not finite.
    #[must_use]
    pub fn effective_min_coverage(&self) -> f64 {
        sanitize_min_coverage(self.min_coverage)
    }
}

fn sanitize_min_coverage(min_coverage: f64) -> f64 {
    if min_coverage.is_finite() {
        min_coverage.clamp(0.0, 1.0)
    } else {
        DEFAULT_MIN_TOOL_CALL_COVERAGE
    }
}

/// Parse a completion that consists of a single `{"tool_calls": [...]}`
/// object, optionally wrapped in a Markdown code fence or accompanied by a
/// negligible amount of text.
///
/// Entries naming tools outside `declared` are dropped. An error describes
/// why the completion should be rendered as prose instead.
pub fn parse_standalone_tool_calls(
    text: &str,
    declared: &DeclaredTools,
    options: &ToolCallDetectionOptions,
) -> ToolCallParseResult<Vec<ParsedToolCall>> {
    if declared.is_empty() {
        return Err(ToolCallParseError::NoDeclaredTools);
    }

    let (span, object) = find_tool_calls_object(text)?;
    let calls = parse_tool_call_entries(&object)?;

    let (honored, undeclared): (Vec<_>, Vec<_>) = calls
        .into_iter()
        .partition(|call| declared.contains(&call.name));
    if honored.is_empty() {
        return Err(ToolCallParseError::UndeclaredTools(
            undeclared.into_iter().map(|call| call.name).collect(),
        ));
    }
    if !undeclared.is_empty() {
        trace!(
            dropped = undeclared.len(),
            "dropping tool calls for undeclared tools"
        );
    }

    let coverage = span_coverage(text, &span);
    let minimum = options.effective_min_coverage();
    if coverage < minimum {
        return Err(ToolCallParseError::EmbeddedInProse { coverage, minimum });
    }

    Ok(honored)
}

/// Find the first balanced JSON object in `text` whose top level carries a
/// `tool_calls` key. Returns its byte range and the parsed object.
fn find_tool_calls_object(text: &str) -> ToolCallParseResult<(Range<usize>, Map<String, Value>)> {
    let needles: Vec<usize> = text
        .match_indices(TOOL_CALLS_NEEDLE)
        .map(|(index, _)| index)
        .collect();
    let Some(&last_needle) = needles.last() else {
        return Err(ToolCallParseError::NoToolCalls);
    };

    let mut spans = ObjectSpans::new(text);
    let mut first_error: Option<serde_json::Error> = None;

    for (start, _) in text.match_indices('{') {
        // No later object can hold the key.
        if start > last_needle {
            break;
        }

        let Some(end) = spans.end_of(start) else {
            // Unterminated object: keep the parser's error for reporting.
            if first_error.is_none() && contains_needle(&needles, start..text.len()) {
                if let Err(err) = serde_json::from_str::<Value>(&text[start..]) {
                    first_error = Some(err);
                }
            }
            continue;
        };

        if !contains_needle(&needles, start..end) {
            continue;
        }

        match serde_json::from_str::<Value>(&text[start..end]) {
            Ok(Value::Object(object)) if object.contains_key(TOOL_CALLS_KEY) => {
                trace!(start, end, "found tool_calls object");
                return Ok((start..end, object));
            }
            // The key belongs to a nested object; a later `{` will reach it.
            Ok(_) => {}
            Err(err) => {
                first_error.get_or_insert(err);
            }
        }
    }

    Err(first_error.map_or(ToolCallParseError::NoToolCalls, ToolCallParseError::InvalidJson))
}

/// Whether a `"tool_calls"` occurrence lies entirely inside `span`. `needles`
/// holds the sorted start offsets of every occurrence.
fn contains_needle(needles: &[usize], span: Range<usize>) -> bool {
    let index = needles.partition_point(|&needle| needle < span.start);
    needles
        .get(index)
        .is_some_and(|&needle| needle + TOOL_CALLS_NEEDLE.len() <= span.end)
}

/// Matching `}` for the `{` offsets of a text, filled lazily. A scan from one
/// `{` records the end of every object it opens outside a string literal, so
/// nested and unterminated objects are resolved without rescanning.
struct ObjectSpans<'a> {
    text: &'a str,
    ends: HashMap<usize, Option<usize>>,
}

impl<'a> ObjectSpans<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            ends: HashMap::new(),
        }
    }

    /// Byte index one past the `}` closing the object opened at `start`, or
    /// `None` when the object is never closed.
    fn end_of(&mut self, start: usize) -> Option<usize> {
        if !self.ends.contains_key(&start) {
            self.scan_from(start);
        }
        self.ends.get(&start).copied().flatten()
    }

    fn scan_from(&mut self, start: usize) {
        let mut open: Vec<usize> = Vec::new();
        let mut in_string = false;
        let mut escape_next = false;

        for (i, &byte) in self.text.as_bytes().iter().enumerate().skip(start) {
            if escape_next {
                escape_next = false;
                continue;
            }

            match byte {
                b'\\' if in_string => escape_next = true,
                b'"' => in_string = !in_string,
                b'{' if !in_string => open.push(i),
                b'}' if !in_string => {
                    if let Some(opened) = open.pop() {
                        self.ends.entry(opened).or_insert(Some(i + 1));
                    }
                    if open.is_empty() {
                        return;
                    }
                }
                _ => {}
            }
        }

        for opened in open {
            self.ends.entry(opened).or_insert(None);
        }
    }
}

fn parse_tool_call_entries(object: &Map<String, Value>) -> ToolCallParseResult<Vec<ParsedToolCall>> {
    let Some(Value::Array(entries)) = object.get(TOOL_CALLS_KEY) else {
        return Err(ToolCallParseError::EmptyToolCalls);
    };

    let calls: Vec<ParsedToolCall> = entries.iter().filter_map(parse_tool_call_entry).collect();
    if calls.is_empty() {
        return Err(ToolCallParseError::EmptyToolCalls);
    }

    Ok(calls)
}

/// Accepts `{"name": .., "input": {..}}` as well as the chat completions
/// style `{"function": {"name": .., "arguments": ".."}}`.
fn parse_tool_call_entry(entry: &Value) -> Option<ParsedToolCall> {
    let entry = entry.as_object()?;
    let entry = match entry.get("function") {
        Some(Value::Object(function)) if !entry.contains_key("name") => function,
        _ => entry,
    };

    let name = entry.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }

    let input = match ARGUMENT_KEYS.iter().find_map(|key| entry.get(*key)) {
        None => Value::Object(Map::new()),
        Some(value) => normalize_input(value)?,
    };

    Some(ParsedToolCall::new(name, input))
}

fn normalize_input(value: &Value) -> Option<Value> {
    match value {
        Value::Null => Some(Value::Object(Map::new())),
        Value::Object(_) => Some(value.clone()),
        Value::String(raw) if raw.trim().is_empty() => Some(Value::Object(Map::new())),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(decoded @ Value::Object(_)) => Some(decoded),
            _ => None,
        },
        _ => None,
    }
}

/// Share of the meaningful characters of `text` taken by `span`. Whitespace
/// at either end and code fence markers around the span do not count.
#[allow(clippy::cast_precision_loss)]
fn span_coverage(text: &str, span: &Range<usize>) -> f64 {
    let before = text[..span.start].trim();
    let before = before
        .strip_suffix("```json")
        .or_else(|| before.strip_suffix("```"))
        .unwrap_or(before)
        .trim();

    let after = text[span.end..].trim();
    let after = after.strip_prefix("```").unwrap_or(after).trim();

    let json_chars = text[span.clone()].chars().count();
    let total_chars = json_chars + before.chars().count() + after.chars().count();

    json_chars as f64 / total_chars as f64
}
