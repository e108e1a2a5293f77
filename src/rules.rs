//! Field validation rules.
//!
//! A typed mirror of the protovalidate field constraint bundle. Only the
//! subset that has a JSON Schema counterpart is read by the constraint
//! applier; the rest is carried so descriptor sets round-trip.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Validation-constraint bundle attached to one field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldRules {
    /// Field must be set.
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub string: Option<StringRules>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<BytesRules>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bool: Option<BoolRules>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_rules: Option<EnumRules>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub int32: Option<NumericRules<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sint32: Option<NumericRules<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sfixed32: Option<NumericRules<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub int64: Option<NumericRules<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sint64: Option<NumericRules<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sfixed64: Option<NumericRules<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uint32: Option<NumericRules<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed32: Option<NumericRules<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uint64: Option<NumericRules<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed64: Option<NumericRules<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub float: Option<NumericRules<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub double: Option<NumericRules<f64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeated: Option<RepeatedRules>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<MapRules>,
}

impl FieldRules {
    /// Rules that only mark the field as required.
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    /// Declared string `min_len`, if any.
    pub fn string_min_len(&self) -> Option<u64> {
        self.string.as_ref().and_then(|s| s.min_len)
    }
}

/// Rules for `string` fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringRules {
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub const_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_len: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_len: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    #[serde(rename = "in", skip_serializing_if = "Vec::is_empty")]
    pub in_list: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub not_in: Vec<String>,
    pub email: bool,
    pub hostname: bool,
    pub uri: bool,
}

/// Rules for `bytes` fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BytesRules {
    /// Exact value; base64 encoded in the JSON form.
    #[serde(
        rename = "const",
        with = "base64_bytes",
        skip_serializing_if = "Option::is_none"
    )]
    pub const_value: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_len: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_len: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Rules for `bool` fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoolRules {
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub const_value: Option<bool>,
}

/// Rules for enum fields. Values are enum numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumRules {
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub const_value: Option<i32>,
    pub defined_only: bool,
    #[serde(rename = "in", skip_serializing_if = "Vec::is_empty")]
    pub in_list: Vec<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub not_in: Vec<i32>,
}

/// Range and membership rules shared by every integer and float kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericRules<T> {
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub const_value: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<T>,
    #[serde(rename = "in", skip_serializing_if = "Vec::is_empty")]
    pub in_list: Vec<T>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub not_in: Vec<T>,
}

impl<T> Default for NumericRules<T> {
    fn default() -> Self {
        Self {
            const_value: None,
            gt: None,
            gte: None,
            lt: None,
            lte: None,
            in_list: Vec::new(),
            not_in: Vec::new(),
        }
    }
}

/// Rules for repeated fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepeatedRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    pub unique: bool,
    /// Rules applied to every element.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<FieldRules>>,
}

/// Rules for map fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_pairs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pairs: Option<u64>,
    /// Rules applied to every map value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Box<FieldRules>>,
}

mod base64_bytes {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    pub fn serialize<S: Serializer>(
        value: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        encoded
            .map(|s| STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom))
            .transpose()
    }
}
