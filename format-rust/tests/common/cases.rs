use crate::common::assert::{
    MessageAssertion, OutputAssertion, ToolCallAssertion, ToolCallsAssertion,
};
use llm_format::{openai::build_response_object, DeclaredTools};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::{collections::HashMap, error::Error, fs, path::PathBuf, sync::LazyLock};

#[derive(Debug, Clone)]
pub struct TestCase {
    pub completion: String,
    pub declared_tools: DeclaredTools,
    pub output: OutputAssertion,
}

#[derive(Debug, Deserialize)]
struct TestDataJSON {
    test_cases: Vec<TestCaseJSON>,
}

#[derive(Debug, Deserialize)]
struct TestCaseJSON {
    name: String,
    completion: String,
    #[serde(default)]
    declared_tools: Vec<String>,
    output: Value,
}

static TEST_DATA: LazyLock<TestDataJSON> = LazyLock::new(|| {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("../format-tests/tests.json");

    let data = fs::read_to_string(path).expect("Failed to read test data");
    serde_json::from_str(&data).expect("Failed to parse test data")
});

static TEST_CASES: LazyLock<HashMap<String, TestCase>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for tc in &TEST_DATA.test_cases {
        map.insert(tc.name.clone(), convert_json_to_test_case(tc));
    }
    map
});

fn convert_json_to_test_case(tc: &TestCaseJSON) -> TestCase {
    let output_type = tc.output.get("type").and_then(Value::as_str).unwrap_or("");

    let output = match output_type {
        "tool_calls" => {
            let tool_calls = tc
                .output
                .get("tool_calls")
                .and_then(Value::as_array)
                .map(|calls| {
                    calls
                        .iter()
                        .map(|call| ToolCallAssertion {
                            tool_name: call
                                .get("name")
                                .and_then(Value::as_str)
                                .unwrap_or("")
                                .to_string(),
                            args: call.get("args").cloned().unwrap_or(Value::Null),
                        })
                        .collect()
                })
                .unwrap_or_default();
            OutputAssertion::ToolCalls(ToolCallsAssertion { tool_calls })
        }
        "message" => OutputAssertion::Message(MessageAssertion {
            // Always treat as regex
            text: tc
                .output
                .get("text")
                .and_then(Value::as_str)
                .map(|text| Regex::new(text).unwrap()),
            output_text: tc
                .output
                .get("output_text")
                .and_then(Value::as_str)
                .map(ToString::to_string),
        }),
        other => panic!("Unknown output type '{other}' in test case '{}'", tc.name),
    };

    TestCase {
        completion: tc.completion.clone(),
        declared_tools: tc.declared_tools.clone().into(),
        output,
    }
}

pub fn run_test_case(test_case_name: &str) -> Result<(), Box<dyn Error>> {
    super::init_tracing();

    let test_case = TEST_CASES
        .get(test_case_name)
        .ok_or_else(|| format!("Test case '{test_case_name}' not found"))?;

    let response = build_response_object(
        "resp_test",
        "deepseek-chat",
        "prompt",
        None,
        &test_case.completion,
        &test_case.declared_tools,
    );

    test_case.output.assert(&response)?;
    Ok(())
}

