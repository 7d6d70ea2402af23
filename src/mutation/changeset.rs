use crate::core::{Result, TagError};
use serde_json::{Map, Value};

/// Answers whether the caller's raw input explicitly contained a field.
///
/// Once decoded into typed input, an omitted field and a field sent as `null`
/// both become `None`. The translator keeps the raw key set so the two can be
/// told apart: an included-but-empty field means "clear", an omitted one means
/// "leave alone".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangesetTranslator {
    input_map: Map<String, Value>,
}

impl ChangesetTranslator {
    pub fn new(input_map: Map<String, Value>) -> Self {
        Self { input_map }
    }

    /// Build from a raw JSON object. Anything else is invalid input.
    pub fn from_value(raw: &Value) -> Result<Self> {
        match raw {
            Value::Object(map) => Ok(Self::new(map.clone())),
            other => Err(TagError::InvalidInput(format!(
                "mutation input must be an object, got {}",
                json_kind(other)
            ))),
        }
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.input_map.contains_key(name)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
