use std::collections::HashMap;

use serde_json::Value;

use crate::errors::AppError;

/// Parses a JSONB technology -> number mapping into a typed vector,
/// rejecting malformed shapes before any write reaches the match table.
/// The scorer itself never validates; this is the repository boundary.
pub fn parse_stack_vector(label: &str, raw: &Value) -> Result<HashMap<String, f64>, AppError> {
    let obj = raw.as_object().ok_or_else(|| {
        AppError::Validation(format!(
            "{label} must be a JSON object mapping technology to a number"
        ))
    })?;

    let mut vector = HashMap::with_capacity(obj.len());
    for (tech, value) in obj {
        let weight = value.as_f64().ok_or_else(|| {
            AppError::Validation(format!("{label} entry '{tech}' is not a number"))
        })?;
        if !weight.is_finite() {
            return Err(AppError::Validation(format!(
                "{label} entry '{tech}' is not a finite number"
            )));
        }
        if weight < 0.0 {
            return Err(AppError::Validation(format!(
                "{label} entry '{tech}' has a negative weight"
            )));
        }
        vector.insert(tech.clone(), weight);
    }
    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_valid_vector() {
        let v = parse_stack_vector("required_stacks", &json!({"Go": 0.6, "SQL": 0.4})).unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(v["Go"], 0.6);
        assert_eq!(v["SQL"], 0.4);
    }

    #[test]
    fn test_empty_object_is_valid() {
        let v = parse_stack_vector("skills", &json!({})).unwrap();
        assert!(v.is_empty());
    }

    #[test]
    fn test_integer_weights_are_accepted() {
        let v = parse_stack_vector("required_stacks", &json!({"Go": 1})).unwrap();
        assert_eq!(v["Go"], 1.0);
    }

    #[test]
    fn test_rejects_negative_weight() {
        let err = parse_stack_vector("required_stacks", &json!({"Go": -0.1})).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_rejects_non_numeric_entry() {
        let err = parse_stack_vector("skills", &json!({"Go": "strong"})).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_rejects_null_entry() {
        let err = parse_stack_vector("skills", &json!({"Go": null})).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_rejects_bare_array() {
        let err = parse_stack_vector("skills", &json!(["Go", "SQL"])).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_rejects_null_value() {
        let err = parse_stack_vector("required_stacks", &Value::Null).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_error_message_names_the_offending_entry() {
        let err = parse_stack_vector("skills", &json!({"Kafka": "yes"})).unwrap_err();
        assert!(err.to_string().contains("Kafka"));
    }
}
