use serde_json::{Map, Value};

/// Whatever the agent pipeline hands back, resolved into one variant per shape.
#[derive(Debug, Clone, PartialEq)]
pub enum RawAgentOutput {
    List(Vec<Value>),
    Object(Map<String, Value>),
    Text(String),
    Other(Value),
}

impl From<Value> for RawAgentOutput {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => RawAgentOutput::List(items),
            Value::Object(map) => RawAgentOutput::Object(map),
            Value::String(text) => RawAgentOutput::Text(text),
            other => RawAgentOutput::Other(other),
        }
    }
}

impl From<String> for RawAgentOutput {
    fn from(text: String) -> Self {
        RawAgentOutput::Text(text)
    }
}

impl From<&str> for RawAgentOutput {
    fn from(text: &str) -> Self {
        RawAgentOutput::Text(text.to_string())
    }
}
