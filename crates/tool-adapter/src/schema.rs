use ao_domain::collaborators::ToolRegistration;
use serde_json::{json, Value};

/// Map a declared parameter type keyword to its JSON Schema type, per §4.2.
fn json_type_for(keyword: &str) -> &'static str {
    match keyword.to_ascii_lowercase().as_str() {
        "boolean" => "boolean",
        "integer" | "int" | "long" => "integer",
        "number" | "float" | "double" | "decimal" => "number",
        "array" | "list" => "array",
        "object" => "object",
        _ => "string",
    }
}

/// Synthesize a `ToolSpec`'s input schema from registry metadata when no
/// explicit schema is supplied, per §4.2 and §6.
pub fn synthesize_input_schema(registration: &ToolRegistration) -> Value {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();

    for param in &registration.parameters {
        let mut prop = serde_json::Map::new();
        prop.insert("type".to_string(), json!(json_type_for(&param.type_keyword)));
        prop.insert("description".to_string(), json!(param.description));
        if !param.allowed_values.is_empty() {
            prop.insert("enum".to_string(), json!(param.allowed_values));
        }
        if let Some(default) = &param.default {
            prop.insert("default".to_string(), default.clone());
        }
        properties.insert(param.name.clone(), Value::Object(prop));

        if param.required {
            required.push(json!(param.name));
        }
    }

    json!({
        "type": "object",
        "properties": Value::Object(properties),
        "required": required,
    })
}
