//! Key-space layout shared by the registry and the scan engine.
//!
//! One engine instance holds two disjoint namespaces:
//!
//! - `__collection:<name>` - collection existence markers
//! - `<name>:<id>` - documents, prefix-scoped per collection
//!
//! Collection names may not contain `:` and may not start with `__`, so a
//! collection's document range can never overlap another collection's keys or
//! the metadata namespace.

use crate::engine::KeyRange;
use crate::error::{DocBaseError, DocBaseResult};

/// Prefix of every collection existence marker.
pub const COLLECTION_META_PREFIX: &str = "__collection:";

/// Sentinel value stored under a collection's existence marker.
pub(crate) const COLLECTION_SENTINEL: &[u8] = b"exists";

/// Returns the metadata key recording the existence of `name`.
pub fn collection_meta_key(name: &str) -> Vec<u8> {
    format!("{COLLECTION_META_PREFIX}{name}").into_bytes()
}

/// Returns the storage key for document `id` in `collection`.
pub fn document_key(collection: &str, id: &str) -> Vec<u8> {
    format!("{collection}:{id}").into_bytes()
}

/// Returns the half-open range covering every document key of `collection`:
/// `[<collection>:, <collection>:\xFF)`.
///
/// Document ids are ASCII, so every document key sorts strictly below the
/// `0xFF` sentinel byte.
pub fn document_range(collection: &str) -> KeyRange {
    let start = format!("{collection}:").into_bytes();
    let mut end = start.clone();
    end.push(0xFF);
    KeyRange::new(start, end)
}

/// Returns the half-open range covering every collection existence marker:
/// `[__collection:, __collection;)`.
///
/// `;` is the byte after `:`, so the range spans exactly the keys carrying
/// the metadata prefix.
pub fn collection_meta_range() -> KeyRange {
    KeyRange::new(b"__collection:".to_vec(), b"__collection;".to_vec())
}

/// Extracts the collection name from a metadata key, taking the suffix after
/// the first `:`. Returns `None` for keys outside the metadata namespace.
pub fn collection_name_from_meta_key(key: &[u8]) -> Option<String> {
    let key = std::str::from_utf8(key).ok()?;
    key.strip_prefix(COLLECTION_META_PREFIX)
        .map(str::to_string)
}

/// Validates a collection name against the key-space invariants.
///
/// Names must be non-empty, must not contain the `:` key separator, and must
/// not start with the reserved `__` prefix.
pub fn validate_collection_name(name: &str) -> DocBaseResult<()> {
    if name.trim().is_empty() {
        return Err(DocBaseError::Validation(
            "Collection name must be a non-empty string.".to_string(),
        ));
    }
    if name.contains(':') {
        return Err(DocBaseError::Validation(format!(
            "Collection name \"{name}\" must not contain ':'."
        )));
    }
    if name.starts_with("__") {
        return Err(DocBaseError::Validation(format!(
            "Collection name \"{name}\" must not start with the reserved \"__\" prefix."
        )));
    }
    Ok(())
}
