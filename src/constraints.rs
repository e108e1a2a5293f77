//! Validation rules to JSON Schema keywords.
//!
//! Each rule set only touches the keywords meaningful for its kind. Rules
//! without a JSON Schema counterpart (`contains`, `not_in`, bytes `pattern`)
//! are skipped. Whether a field is required is decided by the message
//! builder, not here.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Value};

use crate::descriptor::{EnumType, FieldKind};
use crate::rules::{
    BoolRules, BytesRules, EnumRules, FieldRules, MapRules, NumericRules, RepeatedRules,
    StringRules,
};

/// Apply the rules for a scalar or enum kind to `schema`.
pub fn apply_constraints(
    kind: FieldKind,
    rules: &FieldRules,
    enum_type: Option<&EnumType>,
    schema: &mut Value,
) {
    let Some(schema) = schema.as_object_mut() else {
        return;
    };

    match kind {
        FieldKind::String => apply_string(rules.string.as_ref(), schema),
        FieldKind::Bytes => apply_bytes(rules.bytes.as_ref(), schema),
        FieldKind::Bool => apply_bool(rules.bool.as_ref(), schema),
        FieldKind::Enum => apply_enum(rules.enum_rules.as_ref(), enum_type, schema),
        FieldKind::Int32 => apply_numeric(rules.int32.as_ref(), schema),
        FieldKind::Sint32 => apply_numeric(rules.sint32.as_ref(), schema),
        FieldKind::Sfixed32 => apply_numeric(rules.sfixed32.as_ref(), schema),
        FieldKind::Int64 => apply_numeric(rules.int64.as_ref(), schema),
        FieldKind::Sint64 => apply_numeric(rules.sint64.as_ref(), schema),
        FieldKind::Sfixed64 => apply_numeric(rules.sfixed64.as_ref(), schema),
        FieldKind::Uint32 => apply_numeric(rules.uint32.as_ref(), schema),
        FieldKind::Fixed32 => apply_numeric(rules.fixed32.as_ref(), schema),
        FieldKind::Uint64 => apply_numeric(rules.uint64.as_ref(), schema),
        FieldKind::Fixed64 => apply_numeric(rules.fixed64.as_ref(), schema),
        FieldKind::Float => apply_numeric(rules.float.as_ref(), schema),
        FieldKind::Double => apply_numeric(rules.double.as_ref(), schema),
        FieldKind::Message | FieldKind::Group => {}
    }
}

/// Apply item-count rules to an array schema.
pub fn apply_repeated_constraints(rules: Option<&RepeatedRules>, schema: &mut Value) {
    let (Some(rules), Some(schema)) = (rules, schema.as_object_mut()) else {
        return;
    };

    if let Some(min) = rules.min_items {
        schema.insert("minItems".into(), min.into());
    }
    if let Some(max) = rules.max_items {
        schema.insert("maxItems".into(), max.into());
    }
    if rules.unique {
        schema.insert("uniqueItems".into(), Value::Bool(true));
    }
}

/// Apply pair-count rules to a map schema.
pub fn apply_map_constraints(rules: Option<&MapRules>, schema: &mut Value) {
    let (Some(rules), Some(schema)) = (rules, schema.as_object_mut()) else {
        return;
    };

    if let Some(min) = rules.min_pairs {
        schema.insert("minProperties".into(), min.into());
    }
    if let Some(max) = rules.max_pairs {
        schema.insert("maxProperties".into(), max.into());
    }
}

fn apply_string(rules: Option<&StringRules>, schema: &mut Map<String, Value>) {
    let Some(rules) = rules else {
        return;
    };

    if let Some(min) = rules.min_len {
        schema.insert("minLength".into(), min.into());
    }
    if let Some(max) = rules.max_len {
        schema.insert("maxLength".into(), max.into());
    }
    if let Some(pattern) = &rules.pattern {
        schema.insert("pattern".into(), pattern.as_str().into());
    }

    // Later flags win when several are set.
    if rules.email {
        schema.insert("format".into(), "email".into());
    }
    if rules.hostname {
        schema.insert("format".into(), "hostname".into());
    }
    if rules.uri {
        schema.insert("format".into(), "uri".into());
    }

    if let Some(value) = &rules.const_value {
        schema.insert("const".into(), value.as_str().into());
    }
    if !rules.in_list.is_empty() {
        schema.insert("enum".into(), rules.in_list.clone().into());
    }

    // prefix and suffix share `pattern`; suffix overwrites prefix.
    if let Some(prefix) = &rules.prefix {
        schema.insert("pattern".into(), format!("^{}.*", regex::escape(prefix)).into());
    }
    if let Some(suffix) = &rules.suffix {
        schema.insert("pattern".into(), format!(".*{}$", regex::escape(suffix)).into());
    }
}

fn apply_bytes(rules: Option<&BytesRules>, schema: &mut Map<String, Value>) {
    let Some(rules) = rules else {
        return;
    };

    if let Some(value) = &rules.const_value {
        schema.insert("const".into(), STANDARD.encode(value).into());
    }
    // Non-standard keywords: JSON Schema has no byte-length assertion.
    if let Some(min) = rules.min_len {
        schema.insert("minByteLength".into(), min.into());
    }
    if let Some(max) = rules.max_len {
        schema.insert("maxByteLength".into(), max.into());
    }
}

fn apply_bool(rules: Option<&BoolRules>, schema: &mut Map<String, Value>) {
    if let Some(value) = rules.and_then(|r| r.const_value) {
        schema.insert("const".into(), Value::Bool(value));
    }
}

fn apply_enum(
    rules: Option<&EnumRules>,
    enum_type: Option<&EnumType>,
    schema: &mut Map<String, Value>,
) {
    let (Some(rules), Some(enum_type)) = (rules, enum_type) else {
        return;
    };

    // Enum fields are written by name, so rule numbers are translated.
    if let Some(name) = rules.const_value.and_then(|n| enum_type.name_of(n)) {
        schema.insert("const".into(), name.into());
    }

    let names: Vec<Value> = rules
        .in_list
        .iter()
        .filter_map(|&n| enum_type.name_of(n))
        .map(Value::from)
        .collect();
    if !names.is_empty() {
        schema.insert("enum".into(), Value::Array(names));
    }
}

/// A numeric rule value as a JSON number.
trait RuleNumber: Copy + Default + PartialEq {
    fn to_json(self) -> Value;
}

macro_rules! rule_number {
    ($($t:ty),*) => {
        $(impl RuleNumber for $t {
            fn to_json(self) -> Value {
                Value::from(self)
            }
        })*
    };
}

rule_number!(i32, i64, u32, u64, f64);

impl RuleNumber for f32 {
    /// Widens through the shortest decimal form, so `0.1f32` stays `0.1`.
    fn to_json(self) -> Value {
        self.to_string()
            .parse::<f64>()
            .map_or_else(|_| Value::from(self), Value::from)
    }
}

fn apply_numeric<T: RuleNumber>(
    rules: Option<&NumericRules<T>>,
    schema: &mut Map<String, Value>,
) {
    let Some(rules) = rules else {
        return;
    };

    if let Some(value) = rules.const_value {
        schema.insert("const".into(), value.to_json());
    }
    if let Some(gte) = nonzero(rules.gte) {
        schema.insert("minimum".into(), gte.to_json());
    }
    if let Some(lte) = nonzero(rules.lte) {
        schema.insert("maximum".into(), lte.to_json());
    }
    if let Some(gt) = nonzero(rules.gt) {
        schema.insert("exclusiveMinimum".into(), gt.to_json());
    }
    if let Some(lt) = nonzero(rules.lt) {
        schema.insert("exclusiveMaximum".into(), lt.to_json());
    }
    if !rules.in_list.is_empty() {
        let values = rules.in_list.iter().map(|&v| v.to_json()).collect();
        schema.insert("enum".into(), Value::Array(values));
    }
}

/// A zero bound reads the same as an unset one and is dropped.
fn nonzero<T: Default + PartialEq>(value: Option<T>) -> Option<T> {
    value.filter(|v| *v != T::default())
}
