//! Schema generation for messages and fields.
//!
//! Every message schema is fully inlined: nested messages are expanded in
//! place and no `$ref` is ever emitted. A per-call visited set breaks cycles
//! in self-referential type graphs by emitting a bare `{"type": "object"}`
//! where a message would recurse into itself.

use std::collections::HashSet;

use serde_json::{json, Map, Value};
use tracing::{debug, trace};

use crate::constraints::{apply_constraints, apply_map_constraints, apply_repeated_constraints};
use crate::descriptor::{Cardinality, DescriptorPool, FieldKind, FieldRef, MessageDescriptor};
use crate::error::SchemaError;
use crate::kind::schema_for_kind;
use crate::well_known::well_known_schema;

/// JSON Schema dialect of every generated document.
pub const SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Message full names currently being expanded.
type Visited<'a> = HashSet<&'a str>;

/// Generate a JSON Schema (draft 2020-12) for a message type.
///
/// # Errors
///
/// Returns `SchemaError` if any field, at any depth, has a kind with no JSON
/// mapping or references a type missing from the pool. No partial schema is
/// returned.
pub fn generate_schema(message: MessageDescriptor<'_>) -> Result<Value, SchemaError> {
    let mut visited = Visited::new();
    schema_for_message(message, &mut visited)
}

impl DescriptorPool {
    /// Generate the schema for the message named `full_name`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::MessageNotFound` if the pool has no such message,
    /// otherwise any error from [`generate_schema`].
    pub fn generate_schema(&self, full_name: &str) -> Result<Value, SchemaError> {
        let message = self
            .get_message(full_name)
            .ok_or_else(|| SchemaError::MessageNotFound {
                name: full_name.to_string(),
            })?;
        generate_schema(message)
    }
}

fn schema_for_message<'a>(
    message: MessageDescriptor<'a>,
    visited: &mut Visited<'a>,
) -> Result<Value, SchemaError> {
    let full_name = message.full_name();
    if !visited.insert(full_name) {
        debug!(message = full_name, "recursive message, emitting bare object");
        return Ok(json!({ "type": "object" }));
    }

    let result = build_message(message, visited);
    // Siblings may expand the same type again.
    visited.remove(full_name);
    result
}

fn build_message<'a>(
    message: MessageDescriptor<'a>,
    visited: &mut Visited<'a>,
) -> Result<Value, SchemaError> {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in message.fields() {
        trace!(
            message = message.full_name(),
            field = field.name(),
            kind = %field.kind(),
            "building field schema"
        );

        let schema = schema_for_field(field, visited)
            .map_err(|e| e.in_field(message.full_name(), field.name()))?;

        let json_name = field.json_name();
        if is_field_required(field) {
            required.push(Value::String(json_name.clone()));
        }
        properties.insert(json_name, schema);
    }

    let mut schema = Map::new();
    schema.insert("$schema".into(), SCHEMA_DIALECT.into());
    schema.insert("title".into(), message.name().into());
    schema.insert("type".into(), "object".into());
    schema.insert("properties".into(), Value::Object(properties));
    schema.insert("additionalProperties".into(), Value::Bool(false));
    if !required.is_empty() {
        schema.insert("required".into(), Value::Array(required));
    }

    Ok(Value::Object(schema))
}

fn schema_for_field<'a>(
    field: FieldRef<'a>,
    visited: &mut Visited<'a>,
) -> Result<Value, SchemaError> {
    if field.is_list() {
        return schema_for_repeated(field, visited);
    }
    if field.is_map() {
        return schema_for_map(field, visited);
    }
    // Well-known fragments are complete; no annotations or nullability.
    if let Some(schema) = well_known_for(field) {
        return Ok(schema);
    }

    let mut schema = schema_for_value(field, visited)?;

    apply_description(field, &mut schema);
    if let Some(rules) = field.rules() {
        apply_constraints(field.kind(), rules, field.enum_type(), &mut schema);
    }
    apply_nullability(field, &mut schema);

    Ok(schema)
}

/// Schema for one value of the field's kind, ignoring cardinality.
fn schema_for_value<'a>(
    field: FieldRef<'a>,
    visited: &mut Visited<'a>,
) -> Result<Value, SchemaError> {
    match field.kind() {
        FieldKind::Message => {
            let nested = field.message().ok_or_else(|| SchemaError::UnresolvedType {
                type_name: field.type_name().unwrap_or_default().to_string(),
            })?;
            schema_for_message(nested, visited)
        }
        kind => schema_for_kind(kind, field.enum_type()),
    }
}

fn schema_for_repeated<'a>(
    field: FieldRef<'a>,
    visited: &mut Visited<'a>,
) -> Result<Value, SchemaError> {
    let repeated_rules = field.rules().and_then(|r| r.repeated.as_ref());

    let items = match well_known_for(field) {
        Some(schema) => schema,
        None => {
            let mut items = schema_for_value(field, visited)?;
            if let Some(item_rules) = repeated_rules.and_then(|r| r.items.as_deref()) {
                apply_constraints(field.kind(), item_rules, field.enum_type(), &mut items);
            }
            items
        }
    };

    // An absent list may be written as null as well as [].
    let mut schema = json!({
        "type": ["array", "null"],
        "items": items
    });
    apply_description(field, &mut schema);
    apply_repeated_constraints(repeated_rules, &mut schema);

    Ok(schema)
}

fn schema_for_map<'a>(
    field: FieldRef<'a>,
    visited: &mut Visited<'a>,
) -> Result<Value, SchemaError> {
    let value = field.map_value().ok_or_else(|| SchemaError::MissingMapValue {
        field: field.name().to_string(),
    })?;
    let map_rules = field.rules().and_then(|r| r.map.as_ref());

    let mut value_schema = schema_for_field(value, visited)?;
    if let Some(value_rules) = map_rules.and_then(|r| r.values.as_deref()) {
        if well_known_for(value).is_none() {
            apply_constraints(value.kind(), value_rules, value.enum_type(), &mut value_schema);
        }
    }

    let mut schema = json!({
        "type": "object",
        "additionalProperties": value_schema
    });
    apply_description(field, &mut schema);
    apply_map_constraints(map_rules, &mut schema);

    Ok(schema)
}

fn well_known_for(field: FieldRef<'_>) -> Option<Value> {
    if field.kind() != FieldKind::Message {
        return None;
    }
    field.type_name().and_then(well_known_schema)
}

fn apply_description(field: FieldRef<'_>, schema: &mut Value) {
    let Some(description) = field.description().filter(|d| !d.is_empty()) else {
        return;
    };
    if let Some(schema) = schema.as_object_mut() {
        schema.insert("description".into(), description.into());
    }
}

/// Allow `null` for fields with explicit presence.
fn apply_nullability(field: FieldRef<'_>, schema: &mut Value) {
    if field.cardinality() == Cardinality::Required || !field.has_presence() {
        return;
    }
    let Some(schema) = schema.as_object_mut() else {
        return;
    };

    if let Some(ty) = schema.get_mut("type") {
        match ty {
            Value::String(single) => {
                let single = std::mem::take(single);
                *ty = json!([single, "null"]);
            }
            Value::Array(types) => {
                if !types.iter().any(|t| t == "null") {
                    types.push("null".into());
                }
            }
            _ => {}
        }
    }

    if let Some(Value::Array(branches)) = schema.get_mut("oneOf") {
        let has_null = branches
            .iter()
            .any(|b| b.get("type").is_some_and(|t| t == "null"));
        if !has_null {
            branches.push(json!({ "type": "null" }));
        }
    }
}

/// A field is required when declared proto2 `required`, marked required by
/// its rules, or a string with a minimum length of at least one. Minimums on
/// other kinds do not count.
fn is_field_required(field: FieldRef<'_>) -> bool {
    if field.cardinality() == Cardinality::Required {
        return true;
    }
    let Some(rules) = field.rules() else {
        return false;
    };
    rules.required
        || (field.kind() == FieldKind::String && rules.string_min_len().is_some_and(|n| n >= 1))
}
