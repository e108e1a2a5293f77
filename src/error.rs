//! Error types for descriptor loading and schema generation.

use std::path::PathBuf;
use thiserror::Error;

use crate::descriptor::FieldKind;

/// Errors during schema generation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("message descriptor not found: {name}")]
    MessageNotFound { name: String },

    #[error("unsupported field kind: {kind}")]
    UnsupportedKind { kind: FieldKind },

    #[error("unresolved type reference '{type_name}'")]
    UnresolvedType { type_name: String },

    #[error("map field {field} has no value descriptor")]
    MissingMapValue { field: String },

    #[error("error processing field {field} of {message}: {source}")]
    Field {
        message: String,
        field: String,
        #[source]
        source: Box<SchemaError>,
    },
}

impl SchemaError {
    /// Wrap an error with the message and field it occurred in.
    pub(crate) fn in_field(self, message: &str, field: &str) -> Self {
        SchemaError::Field {
            message: message.to_string(),
            field: field.to_string(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping field context.
    pub fn root_cause(&self) -> &SchemaError {
        match self {
            SchemaError::Field { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Dotted path of field names from the outermost message to the failure.
    pub fn field_path(&self) -> String {
        let mut parts = Vec::new();
        let mut current = self;
        while let SchemaError::Field { field, source, .. } = current {
            parts.push(field.as_str());
            current = source;
        }
        parts.join(".")
    }

    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Structural problems found while indexing a descriptor set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("duplicate type name '{name}'")]
    DuplicateType { name: String },

    #[error("field {message}.{field} references unknown type '{type_name}'")]
    UnresolvedType {
        message: String,
        field: String,
        type_name: String,
    },

    #[error("field {message}.{field} has kind {kind} but no type_name")]
    MissingTypeName {
        message: String,
        field: String,
        kind: FieldKind,
    },

    #[error("map field {message}.{field} has no map_value")]
    MissingMapValue { message: String, field: String },

    #[error("message '{message}' has a field with an empty name")]
    EmptyFieldName { message: String },
}

/// Errors while loading a descriptor set.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid descriptor JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid descriptor set: {0}")]
    Descriptor(#[from] DescriptorError),
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}

/// A generated document that does not compile as a JSON Schema.
#[derive(Debug, Clone, Error)]
#[error("schema for {message} is not valid JSON Schema: {reason}")]
pub struct VerifyError {
    pub message: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("set.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = LoadError::Descriptor(DescriptorError::DuplicateType {
            name: "a.B".into(),
        });
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn field_error_chain_display() {
        let err = SchemaError::UnsupportedKind {
            kind: FieldKind::Group,
        }
        .in_field("Inner", "legacy")
        .in_field("Outer", "inner");

        assert_eq!(
            err.to_string(),
            "error processing field inner of Outer: \
             error processing field legacy of Inner: unsupported field kind: group"
        );
        assert_eq!(err.field_path(), "inner.legacy");
        assert_eq!(
            err.root_cause(),
            &SchemaError::UnsupportedKind {
                kind: FieldKind::Group
            }
        );
    }

    #[test]
    fn unresolved_descriptor_display() {
        let err = DescriptorError::UnresolvedType {
            message: "shop.v1.Order".into(),
            field: "item".into(),
            type_name: "shop.v1.Item".into(),
        };
        assert_eq!(
            err.to_string(),
            "field shop.v1.Order.item references unknown type 'shop.v1.Item'"
        );
    }
}
