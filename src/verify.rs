//! Checks that generated documents are usable JSON Schemas.
//!
//! This validates the *schemas*, not data: each document must compile under
//! the 2020-12 meta-schema and must be fully inlined.

use serde::Serialize;
use serde_json::Value;

use crate::builder::generate_schema;
use crate::descriptor::DescriptorPool;
use crate::error::VerifyError;

/// Verify one generated schema.
///
/// # Errors
///
/// Returns `VerifyError` if the schema contains a `$ref` or does not compile
/// as a JSON Schema.
pub fn verify_schema(message: &str, schema: &Value) -> Result<(), VerifyError> {
    if contains_ref(schema) {
        return Err(VerifyError {
            message: message.to_string(),
            reason: "contains $ref".into(),
        });
    }

    jsonschema::validator_for(schema)
        .map(|_| ())
        .map_err(|e| VerifyError {
            message: message.to_string(),
            reason: e.to_string(),
        })
}

/// Returns true if `$ref` appears as a key anywhere in `value`.
pub fn contains_ref(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.contains_key("$ref") || map.values().any(contains_ref),
        Value::Array(arr) => arr.iter().any(contains_ref),
        _ => false,
    }
}

/// Outcome for one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Error,
}

/// Result of generating and verifying one message schema.
#[derive(Debug, Clone, Serialize)]
pub struct MessageCheck {
    pub message: String,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of checking every message in a pool.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub results: Vec<MessageCheck>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.failed == 0
    }
}

/// Generate and verify the schema of every message in `pool`.
pub fn check_pool(pool: &DescriptorPool) -> CheckReport {
    let results: Vec<MessageCheck> = pool
        .messages()
        .map(|message| {
            let name = message.full_name();
            let outcome = generate_schema(message)
                .map_err(|e| e.to_string())
                .and_then(|schema| verify_schema(name, &schema).map_err(|e| e.to_string()));

            match outcome {
                Ok(()) => MessageCheck {
                    message: name.to_string(),
                    status: CheckStatus::Ok,
                    error: None,
                },
                Err(error) => MessageCheck {
                    message: name.to_string(),
                    status: CheckStatus::Error,
                    error: Some(error),
                },
            }
        })
        .collect();

    let passed = results
        .iter()
        .filter(|r| r.status == CheckStatus::Ok)
        .count();

    CheckReport {
        checked: results.len(),
        passed,
        failed: results.len() - passed,
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DescriptorSet, FieldDescriptor, FieldKind, MessageType};
    use serde_json::json;

    #[test]
    fn generated_schema_compiles() {
        let pool = DescriptorPool::new(
            DescriptorSet::new().message(
                MessageType::new("a.M")
                    .field(FieldDescriptor::new("id", FieldKind::Int64))
                    .field(FieldDescriptor::new("ratio", FieldKind::Double).optional())
                    .field(FieldDescriptor::message("at", "google.protobuf.Timestamp")),
            ),
        )
        .unwrap();
        let schema = pool.generate_schema("a.M").unwrap();
        assert!(verify_schema("a.M", &schema).is_ok());
    }

    #[test]
    fn ref_is_rejected() {
        let schema = json!({
            "type": "object",
            "properties": { "child": { "$ref": "#" } }
        });
        let err = verify_schema("a.M", &schema).unwrap_err();
        assert_eq!(err.reason, "contains $ref");
    }

    #[test]
    fn invalid_schema_is_rejected() {
        let schema = json!({ "type": 12 });
        assert!(verify_schema("a.M", &schema).is_err());
    }

    #[test]
    fn contains_ref_searches_arrays() {
        assert!(contains_ref(&json!({ "oneOf": [{ "type": "null" }, { "$ref": "#/x" }] })));
        assert!(!contains_ref(&json!({ "properties": { "ref": { "type": "string" } } })));
    }

    #[test]
    fn check_pool_reports_each_message() {
        let pool = DescriptorPool::new(
            DescriptorSet::new()
                .message(
                    MessageType::new("a.Good").field(FieldDescriptor::new("n", FieldKind::Bool)),
                )
                .message(
                    MessageType::new("a.Bad").field(FieldDescriptor::new("g", FieldKind::Group)),
                ),
        )
        .unwrap();

        let report = check_pool(&pool);
        assert_eq!(report.checked, 2);
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 1);
        assert!(!report.is_ok());
        assert_eq!(report.results[1].status, CheckStatus::Error);
        assert!(report.results[1]
            .error
            .as_deref()
            .unwrap()
            .contains("unsupported field kind: group"));
    }
}
