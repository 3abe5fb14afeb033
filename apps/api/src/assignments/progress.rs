use serde_json::{json, Value};

/// Canonical empty progress object stored on new candidate assignments.
/// Key casing matches the JSON the front end has always consumed.
pub fn empty_todo() -> Value {
    json!({
        "mainTask": "",
        "subtasks": [],
        "completedCount": 0
    })
}

/// Shape check for the `todo` column: an object carrying `mainTask`
/// (string), `subtasks` (array) and `completedCount` (non-negative
/// integer). A historical bug initialized the column as a bare empty
/// array; `reconcile todo-shape` repairs such rows with `empty_todo`.
pub fn is_valid_todo(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    obj.get("mainTask").is_some_and(Value::is_string)
        && obj.get("subtasks").is_some_and(Value::is_array)
        && obj.get("completedCount").is_some_and(Value::is_u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_todo_is_valid() {
        assert!(is_valid_todo(&empty_todo()));
    }

    #[test]
    fn test_populated_todo_is_valid() {
        let todo = json!({
            "mainTask": "Implement the rate limiter",
            "subtasks": [
                {"title": "Token bucket", "done": true},
                {"title": "Integration tests", "done": false}
            ],
            "completedCount": 1
        });
        assert!(is_valid_todo(&todo));
    }

    #[test]
    fn test_bare_array_is_invalid() {
        // The historical bug shape.
        assert!(!is_valid_todo(&json!([])));
    }

    #[test]
    fn test_null_is_invalid() {
        assert!(!is_valid_todo(&Value::Null));
    }

    #[test]
    fn test_missing_key_is_invalid() {
        assert!(!is_valid_todo(&json!({
            "mainTask": "x",
            "subtasks": []
        })));
    }

    #[test]
    fn test_mistyped_main_task_is_invalid() {
        assert!(!is_valid_todo(&json!({
            "mainTask": 7,
            "subtasks": [],
            "completedCount": 0
        })));
    }

    #[test]
    fn test_mistyped_subtasks_is_invalid() {
        assert!(!is_valid_todo(&json!({
            "mainTask": "x",
            "subtasks": {},
            "completedCount": 0
        })));
    }

    #[test]
    fn test_negative_completed_count_is_invalid() {
        assert!(!is_valid_todo(&json!({
            "mainTask": "x",
            "subtasks": [],
            "completedCount": -1
        })));
    }

    #[test]
    fn test_extra_keys_are_tolerated() {
        let todo = json!({
            "mainTask": "x",
            "subtasks": [],
            "completedCount": 0,
            "notes": "legacy field"
        });
        assert!(is_valid_todo(&todo));
    }
}
