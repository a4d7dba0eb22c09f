use crate::result::CommonResult;
use serde_json::{Map, Value};
use std::path::Path;

/// Read a file that must contain a single JSON object
pub fn read_json_object(path: &Path) -> CommonResult<Map<String, Value>> {
    let content = std::fs::read_to_string(path)?;
    match serde_json::from_str(&content)? {
        Value::Object(map) => Ok(map),
        other => Err(format!(
            "{} must contain a JSON object, found {}",
            path.display(),
            kind_of(&other)
        )
        .into()),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
