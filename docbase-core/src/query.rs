//! Query model: per-field predicates, projection lists, and pagination options.
//!
//! A query is a mapping of field name to predicate. Every field is an exact
//! equality match, except the two generated temporal fields `createdAt` and
//! `updatedAt`, which additionally accept a range object with optional
//! inclusive `gte`/`lte` bounds compared as timestamps. A query with zero
//! fields matches every document.

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::document::{CREATED_AT_FIELD, Document, UPDATED_AT_FIELD};
use crate::error::{DocBaseError, DocBaseResult};

/// A single per-field predicate.
#[derive(Debug, Clone, PartialEq)]
enum Condition {
    /// Exact value equality against the document field.
    Equals(Value),
    /// Inclusive timestamp range on `createdAt`/`updatedAt`; each bound is
    /// independently optional.
    TimestampRange {
        gte: Option<DateTime<FixedOffset>>,
        lte: Option<DateTime<FixedOffset>>,
    },
}

/// A parsed query: field names mapped to predicates.
#[derive(Debug, Clone, Default)]
pub struct Query {
    conditions: Vec<(String, Condition)>,
}

fn is_temporal_field(field: &str) -> bool {
    field == CREATED_AT_FIELD || field == UPDATED_AT_FIELD
}

fn parse_bound(range: &Value, bound: &str) -> DocBaseResult<Option<DateTime<FixedOffset>>> {
    match range.get(bound) {
        None => Ok(None),
        Some(value) => {
            let text = value.as_str().ok_or_else(|| {
                DocBaseError::Validation(format!("Range bound \"{bound}\" must be a timestamp string."))
            })?;
            let parsed = DateTime::parse_from_rfc3339(text).map_err(|err| {
                DocBaseError::Validation(format!("Range bound \"{bound}\" is not a valid timestamp: {err}"))
            })?;
            Ok(Some(parsed))
        }
    }
}

impl Query {
    /// Builds a query from a JSON value, which must be a non-null, non-array
    /// object. Range objects are only honored on `createdAt`/`updatedAt`; on
    /// any other field an object literal is an equality predicate.
    ///
    /// # Errors
    ///
    /// Returns [`DocBaseError::Validation`] if `value` is not an object or a
    /// temporal range bound is not a parsable timestamp string.
    pub fn from_value(value: &Value) -> DocBaseResult<Self> {
        let fields = value.as_object().ok_or_else(|| {
            DocBaseError::Validation("Query must be a valid non-null object.".to_string())
        })?;

        let mut conditions = Vec::with_capacity(fields.len());
        for (field, predicate) in fields {
            let condition = if is_temporal_field(field) && predicate.is_object() {
                Condition::TimestampRange {
                    gte: parse_bound(predicate, "gte")?,
                    lte: parse_bound(predicate, "lte")?,
                }
            } else {
                Condition::Equals(predicate.clone())
            };
            conditions.push((field.clone(), condition));
        }
        Ok(Self { conditions })
    }

    /// Returns true when the query has no conditions and so matches every
    /// document.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluates the query against a document. Every condition must hold;
    /// fields named in the query but absent from the document never match,
    /// and a temporal range over an absent or unparsable timestamp fails.
    pub fn matches(&self, document: &Document) -> bool {
        self.conditions.iter().all(|(field, condition)| {
            match condition {
                Condition::Equals(expected) => document.get(field) == Some(expected),
                Condition::TimestampRange { gte, lte } => {
                    let Some(actual) = document
                        .get(field)
                        .and_then(Value::as_str)
                        .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
                    else {
                        return false;
                    };
                    if let Some(lower) = gte
                        && actual < *lower
                    {
                        return false;
                    }
                    if let Some(upper) = lte
                        && actual > *upper
                    {
                        return false;
                    }
                    true
                }
            }
        })
    }
}

/// Result shaping options for `find`: projection and pagination.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// Fields to return; empty means the complete document.
    pub return_fields: Vec<String>,
    /// Maximum number of matches to collect. Unset opts out of pagination and
    /// is subject to the unranged-scan guardrail.
    pub limit: Option<usize>,
    /// Offset into the collected match list, applied last.
    pub offset: Option<usize>,
}

impl FindOptions {
    /// Parses the command-language `options` object:
    /// `{ returnFields?: [string], limit?: number, offset?: number }`.
    ///
    /// # Errors
    ///
    /// Returns [`DocBaseError::Validation`] for a non-object value, a
    /// non-string-array `returnFields`, a non-positive `limit`, or a negative
    /// `offset`.
    pub fn from_value(value: Option<&Value>) -> DocBaseResult<Self> {
        let Some(value) = value else {
            return Ok(Self::default());
        };
        let options = value.as_object().ok_or_else(|| {
            DocBaseError::Validation("Options must be a valid non-null object.".to_string())
        })?;

        let mut parsed = Self::default();
        if let Some(fields) = options.get("returnFields") {
            let entries = fields.as_array().ok_or_else(|| {
                DocBaseError::Validation("Return fields must be an array of strings.".to_string())
            })?;
            for entry in entries {
                let name = entry.as_str().ok_or_else(|| {
                    DocBaseError::Validation("Return fields must be an array of strings.".to_string())
                })?;
                parsed.return_fields.push(name.to_string());
            }
        }
        if let Some(limit) = options.get("limit") {
            let limit = limit
                .as_u64()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    DocBaseError::Validation("Limit must be a positive number.".to_string())
                })?;
            parsed.limit = Some(limit as usize);
        }
        if let Some(offset) = options.get("offset") {
            let offset = offset.as_u64().ok_or_else(|| {
                DocBaseError::Validation("Offset must be a non-negative number.".to_string())
            })?;
            parsed.offset = Some(offset as usize);
        }
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::prepare;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        prepare(&value).unwrap()
    }

    #[test]
    fn empty_query_matches_everything() {
        let query = Query::from_value(&json!({})).unwrap();
        assert!(query.is_empty());
        assert!(query.matches(&doc(json!({ "name": "Ann" }))));
    }

    #[test]
    fn equality_requires_exact_values() {
        let query = Query::from_value(&json!({ "name": "Ann", "age": 5 })).unwrap();
        assert!(query.matches(&doc(json!({ "name": "Ann", "age": 5 }))));
        assert!(!query.matches(&doc(json!({ "name": "Ann", "age": 6 }))));
        assert!(!query.matches(&doc(json!({ "name": "Ann" }))));
    }

    #[test]
    fn absent_fields_never_match() {
        let query = Query::from_value(&json!({ "missing": null })).unwrap();
        assert!(!query.matches(&doc(json!({ "name": "Ann" }))));
    }

    #[test]
    fn timestamp_range_bounds_are_inclusive_and_independent() {
        let mut document = doc(json!({ "name": "Ann" }));
        document.insert(
            "createdAt".to_string(),
            json!("2026-01-01T01:00:00.000Z"),
        );

        let inside = Query::from_value(&json!({
            "createdAt": { "gte": "2026-01-01T00:30:00.000Z" }
        }))
        .unwrap();
        assert!(inside.matches(&document));

        let exact = Query::from_value(&json!({
            "createdAt": { "gte": "2026-01-01T01:00:00.000Z", "lte": "2026-01-01T01:00:00.000Z" }
        }))
        .unwrap();
        assert!(exact.matches(&document));

        let above = Query::from_value(&json!({
            "createdAt": { "lte": "2026-01-01T00:59:59.999Z" }
        }))
        .unwrap();
        assert!(!above.matches(&document));
    }

    #[test]
    fn unparsable_document_timestamp_fails_the_match() {
        let mut document = doc(json!({ "name": "Ann" }));
        document.insert("createdAt".to_string(), json!("yesterday"));
        let query = Query::from_value(&json!({
            "createdAt": { "gte": "2026-01-01T00:00:00.000Z" }
        }))
        .unwrap();
        assert!(!query.matches(&document));
    }

    #[test]
    fn malformed_range_bound_is_rejected_up_front() {
        assert!(matches!(
            Query::from_value(&json!({ "createdAt": { "gte": "whenever" } })),
            Err(DocBaseError::Validation(_))
        ));
        assert!(matches!(
            Query::from_value(&json!({ "createdAt": { "gte": 5 } })),
            Err(DocBaseError::Validation(_))
        ));
    }

    #[test]
    fn range_object_on_plain_field_is_an_equality_predicate() {
        let query = Query::from_value(&json!({ "meta": { "gte": "x" } })).unwrap();
        assert!(query.matches(&doc(json!({ "meta": { "gte": "x" } }))));
        assert!(!query.matches(&doc(json!({ "meta": "x" }))));
    }

    #[test]
    fn find_options_parse_and_validate() {
        let options = FindOptions::from_value(Some(&json!({
            "returnFields": ["name"],
            "limit": 10,
            "offset": 2
        })))
        .unwrap();
        assert_eq!(options.return_fields, vec!["name".to_string()]);
        assert_eq!(options.limit, Some(10));
        assert_eq!(options.offset, Some(2));

        assert!(FindOptions::from_value(Some(&json!({ "limit": 0 }))).is_err());
        assert!(FindOptions::from_value(Some(&json!({ "limit": -3 }))).is_err());
        assert!(FindOptions::from_value(Some(&json!({ "offset": -1 }))).is_err());
        assert!(FindOptions::from_value(Some(&json!({ "returnFields": "name" }))).is_err());
        assert!(FindOptions::from_value(Some(&json!([]))).is_err());
        assert!(FindOptions::from_value(None).unwrap().limit.is_none());
    }
}
