//! Protobuf to JSON Schema
//!
//! Generates JSON Schema (draft 2020-12) documents from protobuf message
//! descriptors, carrying over field validation rules as schema keywords.
//!
//! Schemas are fully inlined (no `$ref`) and follow the canonical protobuf
//! JSON mapping: 64-bit integers are decimal strings, floats also accept
//! `"NaN"`, `"Infinity"` and `"-Infinity"`, bytes are base64 strings, and
//! well-known types such as `google.protobuf.Timestamp` use their special
//! representations.
//!
//! # Example
//!
//! ```
//! use proto_jsonschema::{
//!     generate_schema, DescriptorPool, DescriptorSet, FieldDescriptor, FieldKind, FieldRules,
//!     MessageType, StringRules,
//! };
//! use serde_json::json;
//!
//! let name_rules = FieldRules {
//!     string: Some(StringRules {
//!         min_len: Some(1),
//!         max_len: Some(50),
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! };
//!
//! let set = DescriptorSet::new().message(
//!     MessageType::new("bookstore.v1.Genre")
//!         .field(FieldDescriptor::new("name", FieldKind::String).rules(name_rules)),
//! );
//! let pool = DescriptorPool::new(set).unwrap();
//!
//! let genre = pool.get_message("bookstore.v1.Genre").unwrap();
//! let schema = generate_schema(genre).unwrap();
//!
//! assert_eq!(schema["title"], "Genre");
//! assert_eq!(
//!     schema["properties"]["name"],
//!     json!({ "type": "string", "minLength": 1, "maxLength": 50 })
//! );
//! // A minimum length of one makes the field required
//! assert_eq!(schema["required"], json!(["name"]));
//! ```
//!
//! # Field Mapping
//!
//! | Field | Schema |
//! |-------|--------|
//! | `repeated T` | `{"type": ["array", "null"], "items": T}` |
//! | `map<K, V>` | `{"type": "object", "additionalProperties": V}` |
//! | message | nested object schema, or `{"type": "object"}` on recursion |
//! | presence-tracking | `null` added to `type` (and to `oneOf`) |
//!
//! Nullability only widens `type` and `oneOf`. An enum field with presence
//! becomes `{"type": ["string", "null"], "enum": [...]}`, and since `null` is
//! not among the `enum` names such a field still rejects a JSON `null`.
//!
//! # Required Fields
//!
//! A field is listed in `required` when it is proto2 `required`, when its
//! rules set `required: true`, or when it is a string with `min_len >= 1`.

mod builder;
mod cache;
mod constraints;
mod descriptor;
mod error;
mod kind;
mod loader;
mod rules;
mod verify;
pub mod well_known;

pub use builder::{generate_schema, SCHEMA_DIALECT};
pub use cache::{cached_schema, global_cache, SchemaCache};
pub use constraints::{apply_constraints, apply_map_constraints, apply_repeated_constraints};
pub use descriptor::{
    to_json_name, Cardinality, DescriptorPool, DescriptorSet, EnumType, EnumValue,
    FieldDescriptor, FieldKind, FieldOptions, FieldRef, MessageDescriptor, MessageType,
};
pub use error::{DescriptorError, LoadError, SchemaError, VerifyError};
pub use kind::{schema_for_kind, FLOAT_SENTINELS, INT64_PATTERN};
pub use loader::{is_url, load_descriptors, load_descriptors_auto, load_descriptors_str};
pub use rules::{
    BoolRules, BytesRules, EnumRules, FieldRules, MapRules, NumericRules, RepeatedRules,
    StringRules,
};
pub use verify::{check_pool, contains_ref, verify_schema, CheckReport, CheckStatus, MessageCheck};
pub use well_known::well_known_schema;

#[cfg(feature = "remote")]
pub use loader::load_descriptors_url;
