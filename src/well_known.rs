//! Well-known protobuf types with fixed JSON representations.
//!
//! These types have a canonical JSON mapping that differs from their
//! message structure (a `Timestamp` is an RFC 3339 string, not an object
//! with `seconds` and `nanos`), so they are never expanded field by field.

use serde_json::{json, Value};

use crate::kind::{FLOAT_SENTINELS, INT64_PATTERN};

pub const STRING_VALUE: &str = "google.protobuf.StringValue";
pub const BOOL_VALUE: &str = "google.protobuf.BoolValue";
pub const INT32_VALUE: &str = "google.protobuf.Int32Value";
pub const UINT32_VALUE: &str = "google.protobuf.UInt32Value";
pub const INT64_VALUE: &str = "google.protobuf.Int64Value";
pub const UINT64_VALUE: &str = "google.protobuf.UInt64Value";
pub const FLOAT_VALUE: &str = "google.protobuf.FloatValue";
pub const DOUBLE_VALUE: &str = "google.protobuf.DoubleValue";
pub const BYTES_VALUE: &str = "google.protobuf.BytesValue";

pub const TIMESTAMP: &str = "google.protobuf.Timestamp";
pub const DURATION: &str = "google.protobuf.Duration";
pub const EMPTY: &str = "google.protobuf.Empty";
pub const FIELD_MASK: &str = "google.protobuf.FieldMask";
pub const STRUCT: &str = "google.protobuf.Struct";
pub const VALUE: &str = "google.protobuf.Value";
pub const LIST_VALUE: &str = "google.protobuf.ListValue";
pub const ANY: &str = "google.protobuf.Any";

/// Every recognized well-known type name.
pub const WELL_KNOWN_TYPES: &[&str] = &[
    STRING_VALUE,
    BOOL_VALUE,
    INT32_VALUE,
    UINT32_VALUE,
    INT64_VALUE,
    UINT64_VALUE,
    FLOAT_VALUE,
    DOUBLE_VALUE,
    BYTES_VALUE,
    TIMESTAMP,
    DURATION,
    EMPTY,
    FIELD_MASK,
    STRUCT,
    VALUE,
    LIST_VALUE,
    ANY,
];

/// Returns true if `full_name` is a recognized well-known type.
pub fn is_well_known(full_name: &str) -> bool {
    well_known_schema(full_name).is_some()
}

/// Fixed schema fragment for a well-known type, or `None` for any other
/// message type. A leading `.` on the name is ignored.
pub fn well_known_schema(full_name: &str) -> Option<Value> {
    let full_name = full_name.strip_prefix('.').unwrap_or(full_name);

    let schema = match full_name {
        STRING_VALUE => json!({ "type": ["string", "null"] }),
        BOOL_VALUE => json!({ "type": ["boolean", "null"] }),
        INT32_VALUE | UINT32_VALUE => json!({ "type": ["integer", "null"] }),
        INT64_VALUE | UINT64_VALUE => json!({
            "type": ["string", "null"],
            "pattern": INT64_PATTERN
        }),
        FLOAT_VALUE | DOUBLE_VALUE => json!({
            "oneOf": [
                { "type": "number" },
                { "type": "string", "enum": FLOAT_SENTINELS },
                { "type": "null" }
            ]
        }),
        BYTES_VALUE => json!({
            "type": ["string", "null"],
            "contentEncoding": "base64"
        }),
        TIMESTAMP => json!({ "type": "string", "format": "date-time" }),
        DURATION => json!({
            "type": "string",
            "pattern": "^-?[0-9]+(\\.[0-9]+)?s$"
        }),
        EMPTY => json!({ "type": "object", "additionalProperties": false }),
        FIELD_MASK => json!({
            "type": "string",
            "pattern": "^([a-zA-Z0-9_.]+)(,[a-zA-Z0-9_.]+)*$"
        }),
        STRUCT => json!({ "type": "object" }),
        VALUE => any_json_value(),
        LIST_VALUE => json!({ "type": "array", "items": any_json_value() }),
        ANY => json!({
            "type": "object",
            "properties": {
                "@type": { "type": "string" }
            }
        }),
        _ => return None,
    };

    Some(schema)
}

fn any_json_value() -> Value {
    json!({ "type": ["object", "array", "string", "number", "boolean", "null"] })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_type_resolves() {
        for name in WELL_KNOWN_TYPES {
            assert!(well_known_schema(name).is_some(), "{name} should resolve");
        }
    }

    #[test]
    fn unknown_types_fall_through() {
        assert!(well_known_schema("bookstore.v1.Book").is_none());
        assert!(well_known_schema("google.protobuf.Timestamps").is_none());
        assert!(!is_well_known("google.type.Date"));
    }

    #[test]
    fn leading_dot_is_ignored() {
        assert_eq!(
            well_known_schema(".google.protobuf.Timestamp"),
            Some(json!({ "type": "string", "format": "date-time" }))
        );
    }

    #[test]
    fn wrappers_are_nullable() {
        let schema = well_known_schema(INT64_VALUE).unwrap();
        assert_eq!(schema["type"], json!(["string", "null"]));
        assert_eq!(schema["pattern"], "^-?[0-9]+$");

        let schema = well_known_schema(DOUBLE_VALUE).unwrap();
        let branches = schema["oneOf"].as_array().unwrap();
        assert!(branches.contains(&json!({ "type": "null" })));
    }

    #[test]
    fn wrappers_share_scalar_fragments() {
        use crate::descriptor::FieldKind;
        use crate::kind::schema_for_kind;

        let int64 = schema_for_kind(FieldKind::Int64, None).unwrap();
        assert_eq!(well_known_schema(UINT64_VALUE).unwrap()["pattern"], int64["pattern"]);

        let float = schema_for_kind(FieldKind::Float, None).unwrap();
        let wrapper = well_known_schema(FLOAT_VALUE).unwrap();
        assert_eq!(wrapper["oneOf"][0], float["oneOf"][0]);
        assert_eq!(wrapper["oneOf"][1], float["oneOf"][1]);
    }

    #[test]
    fn list_value_items_accept_any_json() {
        let schema = well_known_schema(LIST_VALUE).unwrap();
        assert_eq!(schema["type"], "array");
        assert_eq!(schema["items"], well_known_schema(VALUE).unwrap());
    }

    #[test]
    fn duration_pattern_text() {
        let schema = well_known_schema(DURATION).unwrap();
        assert_eq!(schema["pattern"], r"^-?[0-9]+(\.[0-9]+)?s$");
    }
}
