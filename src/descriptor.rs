//! Message descriptor model.
//!
//! A [`DescriptorSet`] is the serializable form of a set of message and enum
//! types. [`DescriptorPool`] indexes and validates a set; schema generation
//! walks the pool through the borrowed [`MessageDescriptor`] and [`FieldRef`]
//! handles, so message-typed fields resolve by name and self-referential
//! type graphs need no shared ownership.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DescriptorError;
use crate::rules::FieldRules;
use crate::well_known;

/// Scalar or structural kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Bool,
    String,
    Bytes,
    Int32,
    Sint32,
    Sfixed32,
    Uint32,
    Fixed32,
    Int64,
    Sint64,
    Sfixed64,
    Uint64,
    Fixed64,
    Float,
    Double,
    Enum,
    Message,
    /// Proto2 group. Present in descriptors but has no JSON mapping.
    Group,
}

impl FieldKind {
    /// Returns the protobuf name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::String => "string",
            FieldKind::Bytes => "bytes",
            FieldKind::Int32 => "int32",
            FieldKind::Sint32 => "sint32",
            FieldKind::Sfixed32 => "sfixed32",
            FieldKind::Uint32 => "uint32",
            FieldKind::Fixed32 => "fixed32",
            FieldKind::Int64 => "int64",
            FieldKind::Sint64 => "sint64",
            FieldKind::Sfixed64 => "sfixed64",
            FieldKind::Uint64 => "uint64",
            FieldKind::Fixed64 => "fixed64",
            FieldKind::Float => "float",
            FieldKind::Double => "double",
            FieldKind::Enum => "enum",
            FieldKind::Message => "message",
            FieldKind::Group => "group",
        }
    }

    /// Whether fields of this kind reference a named type.
    pub fn is_named(&self) -> bool {
        matches!(self, FieldKind::Enum | FieldKind::Message)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared cardinality of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    #[default]
    Singular,
    Repeated,
    Map,
    /// Proto2 `required`.
    Required,
}

/// Custom field annotation carrying a human-readable description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One field of a message type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    /// Explicit JSON name; derived from `name` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_name: Option<String>,
    pub kind: FieldKind,
    #[serde(default)]
    pub cardinality: Cardinality,
    /// Explicit presence tracking (proto3 `optional`, proto2 optional).
    #[serde(default)]
    pub presence: bool,
    /// Fully-qualified message or enum name for named kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Value field of a map entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_value: Option<Box<FieldDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<FieldOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<FieldRules>,
}

impl FieldDescriptor {
    /// Create a singular field of the given kind.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            json_name: None,
            kind,
            cardinality: Cardinality::Singular,
            presence: false,
            type_name: None,
            map_value: None,
            options: None,
            rules: None,
        }
    }

    /// Create a singular message-typed field.
    pub fn message(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Message).type_name(type_name)
    }

    /// Create a singular enum-typed field.
    pub fn enumeration(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Enum).type_name(type_name)
    }

    /// Create a map field whose values are described by `value`.
    pub fn map(name: impl Into<String>, value: FieldDescriptor) -> Self {
        let mut field = Self::new(name, value.kind);
        field.cardinality = Cardinality::Map;
        field.map_value = Some(Box::new(value));
        field
    }

    /// Set the referenced type name.
    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Mark the field repeated.
    pub fn repeated(mut self) -> Self {
        self.cardinality = Cardinality::Repeated;
        self
    }

    /// Mark the field proto2 `required`.
    pub fn required(mut self) -> Self {
        self.cardinality = Cardinality::Required;
        self
    }

    /// Enable explicit presence tracking.
    pub fn optional(mut self) -> Self {
        self.presence = true;
        self
    }

    /// Attach a description annotation.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.options = Some(FieldOptions {
            description: Some(description.into()),
        });
        self
    }

    /// Attach validation rules.
    pub fn rules(mut self, rules: FieldRules) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Override the JSON name.
    pub fn json_name(mut self, json_name: impl Into<String>) -> Self {
        self.json_name = Some(json_name.into());
        self
    }
}

/// A message type and its fields in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageType {
    pub full_name: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl MessageType {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }
}

/// A declared enum value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
}

/// An enum type and its values in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    pub full_name: String,
    #[serde(default)]
    pub values: Vec<EnumValue>,
}

impl EnumType {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            values: Vec::new(),
        }
    }

    /// Append a value.
    pub fn value(mut self, name: impl Into<String>, number: i32) -> Self {
        self.values.push(EnumValue {
            name: name.into(),
            number,
        });
        self
    }

    /// Name of the first value declared with `number`.
    pub fn name_of(&self, number: i32) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.number == number)
            .map(|v| v.name.as_str())
    }
}

/// Serializable collection of message and enum types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptorSet {
    #[serde(default)]
    pub messages: Vec<MessageType>,
    #[serde(default)]
    pub enums: Vec<EnumType>,
}

impl DescriptorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(mut self, message: MessageType) -> Self {
        self.messages.push(message);
        self
    }

    pub fn enumeration(mut self, enum_type: EnumType) -> Self {
        self.enums.push(enum_type);
        self
    }
}

/// Indexed, validated descriptor set.
#[derive(Debug, Clone)]
pub struct DescriptorPool {
    messages: Vec<MessageType>,
    enums: Vec<EnumType>,
    message_index: HashMap<String, usize>,
    enum_index: HashMap<String, usize>,
}

impl DescriptorPool {
    /// Index a descriptor set.
    ///
    /// # Errors
    ///
    /// Returns `DescriptorError` on duplicate type names, fields with empty
    /// names, map fields without a value descriptor, or named fields whose
    /// type cannot be resolved. Well-known message types resolve without
    /// being declared.
    pub fn new(set: DescriptorSet) -> Result<Self, DescriptorError> {
        let mut message_index = HashMap::new();
        let mut enum_index = HashMap::new();

        for (i, message) in set.messages.iter().enumerate() {
            let name = normalize_type_name(&message.full_name).to_string();
            if message_index.insert(name.clone(), i).is_some() {
                return Err(DescriptorError::DuplicateType { name });
            }
        }
        for (i, enum_type) in set.enums.iter().enumerate() {
            let name = normalize_type_name(&enum_type.full_name).to_string();
            if message_index.contains_key(&name) || enum_index.insert(name.clone(), i).is_some() {
                return Err(DescriptorError::DuplicateType { name });
            }
        }

        let pool = Self {
            messages: set.messages,
            enums: set.enums,
            message_index,
            enum_index,
        };

        for message in &pool.messages {
            for field in &message.fields {
                pool.check_field(&message.full_name, field)?;
            }
        }

        Ok(pool)
    }

    fn check_field(&self, message: &str, field: &FieldDescriptor) -> Result<(), DescriptorError> {
        if field.name.is_empty() {
            return Err(DescriptorError::EmptyFieldName {
                message: message.to_string(),
            });
        }

        if field.cardinality == Cardinality::Map {
            let Some(value) = &field.map_value else {
                return Err(DescriptorError::MissingMapValue {
                    message: message.to_string(),
                    field: field.name.clone(),
                });
            };
            return self.check_field(message, value);
        }

        if !field.kind.is_named() {
            return Ok(());
        }

        let Some(type_name) = field.type_name.as_deref() else {
            return Err(DescriptorError::MissingTypeName {
                message: message.to_string(),
                field: field.name.clone(),
                kind: field.kind,
            });
        };

        let resolved = match field.kind {
            FieldKind::Message => {
                well_known::is_well_known(type_name) || self.message_by_name(type_name).is_some()
            }
            _ => self.enum_by_name(type_name).is_some(),
        };

        if resolved {
            Ok(())
        } else {
            Err(DescriptorError::UnresolvedType {
                message: message.to_string(),
                field: field.name.clone(),
                type_name: type_name.to_string(),
            })
        }
    }

    /// Look up a message type by fully-qualified name.
    pub fn get_message(&self, full_name: &str) -> Option<MessageDescriptor<'_>> {
        self.message_by_name(full_name)
    }

    /// Look up an enum type by fully-qualified name.
    pub fn get_enum(&self, full_name: &str) -> Option<&EnumType> {
        self.enum_by_name(full_name)
    }

    /// All message types in declaration order.
    pub fn messages(&self) -> impl Iterator<Item = MessageDescriptor<'_>> {
        (0..self.messages.len()).map(move |index| MessageDescriptor { pool: self, index })
    }

    /// Number of message types.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    fn message_by_name(&self, name: &str) -> Option<MessageDescriptor<'_>> {
        self.message_index
            .get(normalize_type_name(name))
            .map(|&index| MessageDescriptor { pool: self, index })
    }

    fn enum_by_name(&self, name: &str) -> Option<&EnumType> {
        self.enum_index
            .get(normalize_type_name(name))
            .map(|&i| &self.enums[i])
    }
}

/// Handle to a message type inside a [`DescriptorPool`].
#[derive(Clone, Copy)]
pub struct MessageDescriptor<'a> {
    pool: &'a DescriptorPool,
    index: usize,
}

impl<'a> MessageDescriptor<'a> {
    fn message_type(&self) -> &'a MessageType {
        &self.pool.messages[self.index]
    }

    /// Fully-qualified name without a leading dot.
    pub fn full_name(&self) -> &'a str {
        normalize_type_name(&self.message_type().full_name)
    }

    /// Short name (last segment of the full name).
    pub fn name(&self) -> &'a str {
        let full = self.full_name();
        full.rsplit('.').next().unwrap_or(full)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = FieldRef<'a>> + 'a {
        let pool = self.pool;
        self.message_type()
            .fields
            .iter()
            .map(move |field| FieldRef { pool, field })
    }
}

impl fmt::Debug for MessageDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MessageDescriptor")
            .field(&self.full_name())
            .finish()
    }
}

/// Handle to a field, able to resolve its referenced types.
#[derive(Clone, Copy)]
pub struct FieldRef<'a> {
    pool: &'a DescriptorPool,
    field: &'a FieldDescriptor,
}

impl<'a> FieldRef<'a> {
    pub fn name(&self) -> &'a str {
        &self.field.name
    }

    /// Property name in JSON output.
    pub fn json_name(&self) -> String {
        match &self.field.json_name {
            Some(name) => name.clone(),
            None => to_json_name(&self.field.name),
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.field.kind
    }

    pub fn cardinality(&self) -> Cardinality {
        self.field.cardinality
    }

    pub fn is_list(&self) -> bool {
        self.field.cardinality == Cardinality::Repeated
    }

    pub fn is_map(&self) -> bool {
        self.field.cardinality == Cardinality::Map
    }

    pub fn has_presence(&self) -> bool {
        self.field.presence
    }

    /// Referenced type name without a leading dot.
    pub fn type_name(&self) -> Option<&'a str> {
        self.field.type_name.as_deref().map(normalize_type_name)
    }

    /// Referenced message type, if declared in the pool.
    pub fn message(&self) -> Option<MessageDescriptor<'a>> {
        self.type_name().and_then(|name| self.pool.message_by_name(name))
    }

    /// Referenced enum type, if declared in the pool.
    pub fn enum_type(&self) -> Option<&'a EnumType> {
        self.type_name().and_then(|name| self.pool.enum_by_name(name))
    }

    /// Value field of a map entry.
    pub fn map_value(&self) -> Option<FieldRef<'a>> {
        self.field.map_value.as_deref().map(|field| FieldRef {
            pool: self.pool,
            field,
        })
    }

    pub fn description(&self) -> Option<&'a str> {
        self.field
            .options
            .as_ref()
            .and_then(|o| o.description.as_deref())
    }

    pub fn rules(&self) -> Option<&'a FieldRules> {
        self.field.rules.as_ref()
    }
}

impl fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.field, f)
    }
}

fn normalize_type_name(name: &str) -> &str {
    name.strip_prefix('.').unwrap_or(name)
}

/// Derive a JSON name the way protoc does: drop underscores and uppercase
/// the letter that follows each one.
pub fn to_json_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
