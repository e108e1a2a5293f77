//! Base schema fragments for scalar and enum field kinds.

use serde_json::{json, Value};

use crate::descriptor::{EnumType, FieldKind};
use crate::error::SchemaError;

/// Pattern for 64-bit integers, which the canonical JSON mapping writes as
/// decimal strings.
pub const INT64_PATTERN: &str = "^-?[0-9]+$";

/// String sentinels accepted for non-finite floats.
pub const FLOAT_SENTINELS: [&str; 3] = ["NaN", "Infinity", "-Infinity"];

/// Map a scalar kind to its base schema fragment.
///
/// `enum_type` supplies the value names for enum kinds; an enum field whose
/// type is unknown maps to a plain string. Message kinds are resolved by the
/// builder and are rejected here along with groups.
///
/// # Errors
///
/// Returns `SchemaError::UnsupportedKind` for message and group kinds.
pub fn schema_for_kind(
    kind: FieldKind,
    enum_type: Option<&EnumType>,
) -> Result<Value, SchemaError> {
    let schema = match kind {
        FieldKind::Bool => json!({ "type": "boolean" }),
        FieldKind::String => json!({ "type": "string" }),
        FieldKind::Bytes => json!({ "type": "string", "contentEncoding": "base64" }),

        FieldKind::Int32
        | FieldKind::Sint32
        | FieldKind::Sfixed32
        | FieldKind::Uint32
        | FieldKind::Fixed32 => json!({ "type": "integer" }),

        FieldKind::Int64
        | FieldKind::Sint64
        | FieldKind::Sfixed64
        | FieldKind::Uint64
        | FieldKind::Fixed64 => json!({ "type": "string", "pattern": INT64_PATTERN }),

        FieldKind::Float | FieldKind::Double => json!({
            "type": "number",
            "oneOf": [
                { "type": "number" },
                { "type": "string", "enum": FLOAT_SENTINELS }
            ]
        }),

        FieldKind::Enum => schema_for_enum(enum_type),

        FieldKind::Message | FieldKind::Group => {
            return Err(SchemaError::UnsupportedKind { kind });
        }
    };

    Ok(schema)
}

fn schema_for_enum(enum_type: Option<&EnumType>) -> Value {
    let mut schema = json!({ "type": "string" });

    let names: Vec<&str> = enum_type
        .map(|e| e.values.iter().map(|v| v.name.as_str()).collect())
        .unwrap_or_default();

    if !names.is_empty() {
        schema["enum"] = json!(names);
    }

    schema
}
