//! A hand-rolled validator for a permissive JSON Schema subset: object/array/
//! primitive types, `properties`, `required`, `enum`, `default`, and
//! `additionalProperties`. Deliberately not built on a general schema crate —
//! this project treats schema validation the way it treats config validation
//! elsewhere: a direct, readable walk over the document, not a dependency.

use serde_json::Value;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("instance is null")]
    NullInstance,
    #[error("schema is null")]
    NullSchema,
    #[error("{path}: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
    },
    #[error("{path}: required property '{field}' is missing")]
    MissingRequired { path: String, field: String },
    #[error("{path}: value is not one of the allowed enum values")]
    EnumMismatch { path: String },
    #[error("{path}: additional property '{field}' is not allowed")]
    AdditionalProperty { path: String, field: String },
}

/// Validate `instance` against `schema`. Rejects a null instance or schema
/// explicitly, per §4.7.
pub fn validate(instance: &Value, schema: &Value) -> Result<(), ValidationError> {
    if instance.is_null() {
        return Err(ValidationError::NullInstance);
    }
    if schema.is_null() {
        return Err(ValidationError::NullSchema);
    }
    validate_at("$", instance, schema)
}

/// Coerce string-typed primitives to their schema-declared type, validate,
/// then apply schema defaults for missing properties. Returns
/// `(ok, error, normalized_instance)`.
pub fn validate_and_normalize(instance: &Value, schema: &Value) -> (bool, Option<String>, Value) {
    if instance.is_null() {
        return (false, Some(ValidationError::NullInstance.to_string()), instance.clone());
    }
    if schema.is_null() {
        return (false, Some(ValidationError::NullSchema.to_string()), instance.clone());
    }

    let mut normalized = instance.clone();
    coerce_types(&mut normalized, schema);

    match validate_at("$", &normalized, schema) {
        Ok(()) => {
            apply_defaults(&mut normalized, schema);
            (true, None, normalized)
        }
        Err(e) => (false, Some(e.to_string()), normalized),
    }
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn matches_type(v: &Value, expected: &str) -> bool {
    match expected {
        "integer" => matches!(v, Value::Number(n) if n.is_i64() || n.is_u64()),
        "number" => v.is_number(),
        "string" => v.is_string(),
        "boolean" => v.is_boolean(),
        "array" => v.is_array(),
        "object" => v.is_object(),
        "null" => v.is_null(),
        _ => true,
    }
}

fn validate_at(path: &str, instance: &Value, schema: &Value) -> Result<(), ValidationError> {
    let Some(schema_obj) = schema.as_object() else {
        return Ok(());
    };

    if let Some(expected) = schema_obj.get("type").and_then(Value::as_str) {
        if !matches_type(instance, expected) {
            return Err(ValidationError::TypeMismatch {
                path: path.to_string(),
                expected: expected.to_string(),
                actual: json_type_name(instance).to_string(),
            });
        }
    }

    if let Some(allowed) = schema_obj.get("enum").and_then(Value::as_array) {
        if !allowed.contains(instance) {
            return Err(ValidationError::EnumMismatch {
                path: path.to_string(),
            });
        }
    }

    if let Some(obj) = instance.as_object() {
        if let Some(required) = schema_obj.get("required").and_then(Value::as_array) {
            for field in required {
                if let Some(field) = field.as_str() {
                    if !obj.contains_key(field) {
                        return Err(ValidationError::MissingRequired {
                            path: path.to_string(),
                            field: field.to_string(),
                        });
                    }
                }
            }
        }

        let properties = schema_obj.get("properties").and_then(Value::as_object);

        if schema_obj.get("additionalProperties") == Some(&Value::Bool(false)) {
            if let Some(properties) = properties {
                for key in obj.keys() {
                    if !properties.contains_key(key) {
                        return Err(ValidationError::AdditionalProperty {
                            path: path.to_string(),
                            field: key.clone(),
                        });
                    }
                }
            }
        }

        if let Some(properties) = properties {
            for (key, prop_schema) in properties {
                if let Some(value) = obj.get(key) {
                    validate_at(&format!("{path}.{key}"), value, prop_schema)?;
                }
            }
        }
    }

    if let Some(items_schema) = schema_obj.get("items") {
        if let Some(arr) = instance.as_array() {
            for (i, item) in arr.iter().enumerate() {
                validate_at(&format!("{path}[{i}]"), item, items_schema)?;
            }
        }
    }

    Ok(())
}

fn coerce_types(instance: &mut Value, schema: &Value) {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return;
    };
    let Some(obj) = instance.as_object_mut() else {
        return;
    };

    for (key, prop_schema) in properties {
        let Some(expected) = prop_schema.get("type").and_then(Value::as_str) else {
            continue;
        };
        if let Some(Value::String(s)) = obj.get(key) {
            let coerced = match expected {
                "integer" => s.parse::<i64>().ok().map(Value::from),
                "number" => s.parse::<f64>().ok().map(Value::from),
                "boolean" => s.parse::<bool>().ok().map(Value::from),
                _ => None,
            };
            if let Some(coerced) = coerced {
                obj.insert(key.clone(), coerced);
            }
        }
    }
}

fn apply_defaults(instance: &mut Value, schema: &Value) {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return;
    };
    let Some(obj) = instance.as_object_mut() else {
        return;
    };

    for (key, prop_schema) in properties {
        if !obj.contains_key(key) {
            if let Some(default) = prop_schema.get("default") {
                obj.insert(key.clone(), default.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_instance_rejected() {
        let err = validate(&Value::Null, &json!({"type": "object"})).unwrap_err();
        assert_eq!(err, ValidationError::NullInstance);
    }

    #[test]
    fn null_schema_rejected() {
        let err = validate(&json!({}), &Value::Null).unwrap_err();
        assert_eq!(err, ValidationError::NullSchema);
    }

    #[test]
    fn missing_required_field() {
        let schema = json!({"type": "object", "required": ["query"]});
        let err = validate(&json!({}), &schema).unwrap_err();
        assert!(matches!(err, ValidationError::MissingRequired { .. }));
    }

    #[test]
    fn type_mismatch_on_property() {
        let schema = json!({
            "type": "object",
            "properties": { "count": { "type": "integer" } }
        });
        let err = validate(&json!({"count": "five"}), &schema).unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { .. }));
    }

    #[test]
    fn enum_mismatch() {
        let schema = json!({"type": "string", "enum": ["a", "b"]});
        assert!(validate(&json!("c"), &schema).is_err());
        assert!(validate(&json!("a"), &schema).is_ok());
    }

    #[test]
    fn additional_property_rejected_when_declared_closed() {
        let schema = json!({
            "type": "object",
            "properties": { "a": { "type": "string" } },
            "additionalProperties": false
        });
        let err = validate(&json!({"a": "x", "b": "y"}), &schema).unwrap_err();
        assert!(matches!(err, ValidationError::AdditionalProperty { .. }));
    }

    #[test]
    fn coerces_string_to_integer_before_validating() {
        let schema = json!({
            "type": "object",
            "properties": { "count": { "type": "integer" } }
        });
        let (ok, err, normalized) = validate_and_normalize(&json!({"count": "5"}), &schema);
        assert!(ok, "{err:?}");
        assert_eq!(normalized["count"], json!(5));
    }

    #[test]
    fn coerces_string_to_boolean() {
        let schema = json!({
            "type": "object",
            "properties": { "enabled": { "type": "boolean" } }
        });
        let (ok, _, normalized) = validate_and_normalize(&json!({"enabled": "true"}), &schema);
        assert!(ok);
        assert_eq!(normalized["enabled"], json!(true));
    }

    #[test]
    fn applies_defaults_for_missing_properties() {
        let schema = json!({
            "type": "object",
            "properties": { "limit": { "type": "integer", "default": 10 } }
        });
        let (ok, _, normalized) = validate_and_normalize(&json!({}), &schema);
        assert!(ok);
        assert_eq!(normalized["limit"], json!(10));
    }

    #[test]
    fn validate_and_normalize_then_validate_is_idempotently_ok() {
        let schema = json!({
            "type": "object",
            "required": ["query"],
            "properties": {
                "query": { "type": "string" },
                "limit": { "type": "integer", "default": 5 }
            }
        });
        let (ok, _, normalized) = validate_and_normalize(&json!({"query": "x"}), &schema);
        assert!(ok);
        assert!(validate(&normalized, &schema).is_ok());
    }

    #[test]
    fn coercion_failure_surfaces_as_type_mismatch() {
        let schema = json!({
            "type": "object",
            "properties": { "count": { "type": "integer" } }
        });
        let (ok, err, _) = validate_and_normalize(&json!({"count": "not-a-number"}), &schema);
        assert!(!ok);
        assert!(err.unwrap().contains("count"));
    }
}
