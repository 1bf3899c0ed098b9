mod errors;
mod id_utils;
pub mod openai;
mod tool_calls;
mod types;
mod types_ext;
mod usage_utils;

pub use errors::*;
pub use tool_calls::{
    parse_standalone_tool_calls, ToolCallDetectionOptions, DEFAULT_MIN_TOOL_CALL_COVERAGE,
};
pub use types::*;
pub use usage_utils::{estimate_tokens, estimate_usage};
