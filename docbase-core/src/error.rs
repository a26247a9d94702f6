//! Error types and result types for document store operations.
//!
//! This module provides the error taxonomy shared by every layer of the crate.
//! Use [`DocBaseResult<T>`] as the return type for fallible operations.

use thiserror::Error;

/// Represents all possible errors that can occur when interacting with the document store.
///
/// This enum covers input validation, collection and document lifecycle, scan
/// guardrails, the command-language front end, and failures of the underlying
/// key-value engine.
#[derive(Error, Debug)]
pub enum DocBaseError {
    /// Malformed name, query, options, or arguments. Reported immediately, never retried.
    #[error("Validation error: {0}")]
    Validation(String),
    /// A document rejected before storage: not a non-null object, or empty.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// The targeted collection or document is absent. Reported to the caller, not fatal.
    #[error("Not found: {0}")]
    NotFound(String),
    /// Attempt to create a collection whose name is already registered.
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    /// An unranged `find` over a collection holding more documents than the scan guardrail.
    /// Callers must opt into large scans by passing an explicit limit.
    #[error("More than {0} documents found. Please specify a limit.")]
    LimitRequired(usize),
    /// A command line that does not match the `collection.method(args)` grammar.
    #[error("Parse error: {0}")]
    Parse(String),
    /// A well-formed command naming a (collection, method) pair with no dispatch entry.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    /// A failure of the underlying key-value engine other than not-found.
    /// Propagated as-is, never silently swallowed.
    #[error("Storage error: {0}")]
    Storage(String),
    /// A stored value that does not decode back into a document.
    #[error("Corrupt document: {0}")]
    CorruptDocument(String),
}

/// A specialized `Result` type for document store operations.
pub type DocBaseResult<T> = Result<T, DocBaseError>;

impl From<serde_json::Error> for DocBaseError {
    fn from(err: serde_json::Error) -> Self {
        DocBaseError::Storage(format!("serialization: {err}"))
    }
}
