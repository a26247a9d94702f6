//! Document validation, identity, and byte encoding.
//!
//! Documents are schemaless JSON objects. On creation the store injects three
//! generated fields: `id` (a fresh UUID v4), `createdAt` and `updatedAt`
//! (ISO-8601 UTC timestamps with millisecond precision). A document is never
//! persisted without these fields; `id` is immutable and `createdAt` never
//! changes after creation.

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{DocBaseError, DocBaseResult};

/// A document: an ordered mapping of field names to JSON values.
pub type Document = Map<String, Value>;

/// Name of the generated identity field.
pub const ID_FIELD: &str = "id";
/// Name of the generated creation timestamp field.
pub const CREATED_AT_FIELD: &str = "createdAt";
/// Name of the generated update timestamp field.
pub const UPDATED_AT_FIELD: &str = "updatedAt";

fn is_generated_field(name: &str) -> bool {
    name == ID_FIELD || name == CREATED_AT_FIELD || name == UPDATED_AT_FIELD
}

/// Returns the current instant as an ISO-8601 UTC string with millisecond
/// precision, e.g. `2026-08-29T12:00:00.000Z`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Validates `input` and returns a new document carrying the caller's fields
/// plus the generated `id`, `createdAt`, and `updatedAt`.
///
/// The input is not mutated. Generated field names supplied by the caller are
/// ignored; the store always assigns its own identity and timestamps. The
/// stored field order is `id` first, then the caller's fields, then the two
/// timestamps.
///
/// # Errors
///
/// Returns [`DocBaseError::InvalidDocument`] if `input` is not a non-null,
/// non-array object, or is empty.
pub fn prepare(input: &Value) -> DocBaseResult<Document> {
    let fields = input.as_object().ok_or_else(|| {
        DocBaseError::InvalidDocument("Document must be a valid non-null object.".to_string())
    })?;
    if fields.is_empty() {
        return Err(DocBaseError::InvalidDocument(
            "Document cannot be empty.".to_string(),
        ));
    }

    let timestamp = now_timestamp();
    let mut prepared = Document::new();
    prepared.insert(
        ID_FIELD.to_string(),
        Value::String(Uuid::new_v4().to_string()),
    );
    for (name, value) in fields {
        if !is_generated_field(name) {
            prepared.insert(name.clone(), value.clone());
        }
    }
    prepared.insert(CREATED_AT_FIELD.to_string(), Value::String(timestamp.clone()));
    prepared.insert(UPDATED_AT_FIELD.to_string(), Value::String(timestamp));
    Ok(prepared)
}

/// Returns the document's id.
///
/// # Errors
///
/// Returns [`DocBaseError::CorruptDocument`] if the `id` field is missing or
/// not a string; stored documents always carry one.
pub fn document_id(document: &Document) -> DocBaseResult<&str> {
    document
        .get(ID_FIELD)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            DocBaseError::CorruptDocument("document is missing its id field".to_string())
        })
}

/// Serializes a document to its stored byte form (canonical JSON).
pub fn encode(document: &Document) -> DocBaseResult<Vec<u8>> {
    Ok(serde_json::to_vec(document)?)
}

/// Deserializes a stored byte value back into a document.
///
/// # Errors
///
/// Returns [`DocBaseError::CorruptDocument`] if the bytes are not valid JSON
/// or do not hold an object.
pub fn decode(bytes: &[u8]) -> DocBaseResult<Document> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| DocBaseError::CorruptDocument(err.to_string()))?;
    match value {
        Value::Object(document) => Ok(document),
        other => Err(DocBaseError::CorruptDocument(format!(
            "expected a JSON object, found {other}"
        ))),
    }
}

/// Applies a field projection: with a non-empty `return_fields` list only the
/// named fields are returned (for fields present in the document, in list
/// order); with an empty list the complete document is returned.
pub fn project(document: &Document, return_fields: &[String]) -> Document {
    if return_fields.is_empty() {
        return document.clone();
    }
    let mut projected = Document::new();
    for field in return_fields {
        if let Some(value) = document.get(field) {
            projected.insert(field.clone(), value.clone());
        }
    }
    projected
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prepare_injects_identity_and_timestamps() {
        let input = json!({ "name": "Ann", "age": 5 });
        let prepared = prepare(&input).unwrap();

        assert!(prepared.get(ID_FIELD).and_then(Value::as_str).is_some());
        assert_eq!(prepared.get("name"), Some(&json!("Ann")));
        assert_eq!(prepared.get("age"), Some(&json!(5)));
        assert_eq!(
            prepared.get(CREATED_AT_FIELD),
            prepared.get(UPDATED_AT_FIELD)
        );
        // Input left untouched.
        assert_eq!(input.as_object().unwrap().len(), 2);
    }

    #[test]
    fn prepare_orders_generated_fields_around_the_payload() {
        let prepared = prepare(&json!({ "name": "Ann" })).unwrap();
        let order: Vec<&str> = prepared.keys().map(String::as_str).collect();
        assert_eq!(order, vec![ID_FIELD, "name", CREATED_AT_FIELD, UPDATED_AT_FIELD]);
    }

    #[test]
    fn prepare_overrides_caller_supplied_generated_fields() {
        let prepared = prepare(&json!({ "id": "mine", "name": "Ann" })).unwrap();
        assert_ne!(prepared.get(ID_FIELD), Some(&json!("mine")));
    }

    #[test]
    fn prepare_rejects_non_objects_and_empty_objects() {
        assert!(matches!(
            prepare(&json!(null)),
            Err(DocBaseError::InvalidDocument(_))
        ));
        assert!(matches!(
            prepare(&json!([1, 2])),
            Err(DocBaseError::InvalidDocument(_))
        ));
        assert!(matches!(
            prepare(&json!("doc")),
            Err(DocBaseError::InvalidDocument(_))
        ));
        assert!(matches!(
            prepare(&json!({})),
            Err(DocBaseError::InvalidDocument(_))
        ));
    }

    #[test]
    fn encode_decode_round_trips() {
        let prepared = prepare(&json!({
            "name": "Ann",
            "tags": ["a", "b"],
            "profile": { "active": true, "score": 1.5 },
            "note": null
        }))
        .unwrap();
        let decoded = decode(&encode(&prepared).unwrap()).unwrap();
        assert_eq!(decoded, prepared);
    }

    #[test]
    fn decode_rejects_foreign_bytes() {
        assert!(matches!(
            decode(b"not json"),
            Err(DocBaseError::CorruptDocument(_))
        ));
        assert!(matches!(
            decode(b"[1,2,3]"),
            Err(DocBaseError::CorruptDocument(_))
        ));
    }

    #[test]
    fn projection_keeps_named_fields_only() {
        let prepared = prepare(&json!({ "name": "Ann", "age": 5 })).unwrap();
        let projected = project(&prepared, &["name".to_string(), "missing".to_string()]);
        assert_eq!(projected.len(), 1);
        assert_eq!(projected.get("name"), Some(&json!("Ann")));

        let full = project(&prepared, &[]);
        assert_eq!(full, prepared);
    }
}
