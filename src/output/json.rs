use serde_json::{json, Value};

use crate::error::TodoError;
use crate::models::Task;

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &TodoError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

/// Same shape as the persisted record.
pub fn task_json(t: &Task) -> Value {
    serde_json::to_value(t.to_record()).unwrap_or(Value::Null)
}

pub fn task_list_json(tasks: &[&Task]) -> Value {
    Value::Array(tasks.iter().map(|t| task_json(t)).collect())
}

pub fn print(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Error: {e}"),
    }
}
