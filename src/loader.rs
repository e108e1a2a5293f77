//! Descriptor set loading from various sources.
//!
//! Handles loading descriptor sets from files, strings, and HTTP URLs.
//! Every loader returns an indexed [`DescriptorPool`], so a successful load
//! means all type references resolve.

use std::path::Path;

use tracing::debug;

use crate::descriptor::{DescriptorPool, DescriptorSet};
use crate::error::LoadError;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a descriptor set from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// `LoadError::InvalidJson` if it isn't a descriptor set, or
/// `LoadError::Descriptor` if its types don't resolve.
pub fn load_descriptors(path: &Path) -> Result<DescriptorPool, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), "loaded descriptor file");
    load_descriptors_str(&content)
}

/// Load a descriptor set from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't a descriptor set,
/// or `LoadError::Descriptor` if its types don't resolve.
pub fn load_descriptors_str(content: &str) -> Result<DescriptorPool, LoadError> {
    let set: DescriptorSet =
        serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })?;
    index(set)
}

/// Load a descriptor set from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails or the body
/// isn't a descriptor set, or `LoadError::Descriptor` if its types don't
/// resolve.
#[cfg(feature = "remote")]
pub fn load_descriptors_url(url: &str) -> Result<DescriptorPool, LoadError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|source| LoadError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    let response = client
        .get(url)
        .send()
        .map_err(|source| LoadError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    // Check for HTTP errors before parsing
    let response = response
        .error_for_status()
        .map_err(|source| LoadError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    let set: DescriptorSet = response.json().map_err(|source| LoadError::NetworkError {
        url: url.to_string(),
        source,
    })?;

    debug!(url, "fetched descriptor set");
    index(set)
}

/// Load from a URL or a file path, depending on what `source` looks like.
///
/// # Errors
///
/// Returns the error of the underlying loader. Without the `remote`
/// feature, URLs are treated as file paths.
pub fn load_descriptors_auto(source: &str) -> Result<DescriptorPool, LoadError> {
    #[cfg(feature = "remote")]
    if is_url(source) {
        return load_descriptors_url(source);
    }

    load_descriptors(Path::new(source))
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

fn index(set: DescriptorSet) -> Result<DescriptorPool, LoadError> {
    let pool = DescriptorPool::new(set)?;
    debug!(messages = pool.message_count(), "indexed descriptor set");
    Ok(pool)
}
