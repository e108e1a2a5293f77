//! Memoized schema generation.
//!
//! Schemas are keyed by message full name and shared as `Arc<Value>` so a
//! cached document can never be mutated by a caller. Concurrent misses for
//! the same message may both build; generation is pure, so whichever store
//! lands last holds an identical value. Failed builds are not stored.

use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use crate::builder::generate_schema;
use crate::descriptor::MessageDescriptor;
use crate::error::SchemaError;

static GLOBAL_CACHE: LazyLock<SchemaCache> = LazyLock::new(SchemaCache::new);

/// Concurrent map from message full name to generated schema.
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: DashMap<String, Arc<Value>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached schema for `message`, generating it on a miss.
    ///
    /// # Errors
    ///
    /// Returns any error from [`generate_schema`]; nothing is cached then.
    pub fn get_or_build(
        &self,
        message: MessageDescriptor<'_>,
    ) -> Result<Arc<Value>, SchemaError> {
        let key = message.full_name();
        if let Some(hit) = self.get(key) {
            debug!(message = key, "schema cache hit");
            return Ok(hit);
        }

        debug!(message = key, "schema cache miss");
        let schema = Arc::new(generate_schema(message)?);
        self.entries.insert(key.to_string(), Arc::clone(&schema));
        Ok(schema)
    }

    /// Cached schema for `full_name`, without building.
    pub fn get(&self, full_name: &str) -> Option<Arc<Value>> {
        self.entries.get(full_name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, full_name: &str) -> bool {
        self.entries.contains_key(full_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Process-wide cache used by [`cached_schema`].
pub fn global_cache() -> &'static SchemaCache {
    &GLOBAL_CACHE
}

/// Generate a schema through the process-wide cache.
///
/// The global cache is keyed by full name alone, so it assumes one set of
/// message definitions per process. Use a dedicated [`SchemaCache`] when
/// several descriptor pools may define the same name differently.
///
/// # Errors
///
/// Returns any error from [`generate_schema`].
pub fn cached_schema(message: MessageDescriptor<'_>) -> Result<Arc<Value>, SchemaError> {
    GLOBAL_CACHE.get_or_build(message)
}
