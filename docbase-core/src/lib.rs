//! A minimal document database layered on an ordered key-value engine.
//!
//! This crate is the core of the docbase project and provides:
//!
//! - **Engine contract** ([`engine`]) - Traits abstracting the ordered key-value store underneath
//! - **Error handling** ([`error`]) - Error taxonomy and result type
//! - **Key-space layout** ([`keys`]) - Collection metadata and document key derivation
//! - **Document codec** ([`document`]) - Document validation, identity, and byte encoding
//! - **Query model** ([`query`]) - Equality and date-range predicates, projection, pagination
//! - **Collection scans** ([`scan`]) - Lazy, resource-scoped iteration over a collection's key range
//! - **Collection registry** ([`catalog`]) - Creation, existence, deletion, and listing of collections
//! - **Document store** ([`store`]) - The facade composing the above into the public operation set
//! - **Command language** ([`command`]) - The `collection.method(args)` line grammar and dispatcher
//!
//! # Example
//!
//! ```ignore
//! use docbase_core::store::DocumentStore;
//! use docbase_memory::MemoryEngine;
//! use serde_json::json;
//!
//! let store = DocumentStore::new(MemoryEngine::new());
//! store.create_collection("users").await?;
//! let stored = store.create_one("users", &json!({ "name": "Ann" })).await?;
//! # Ok::<(), docbase_core::error::DocBaseError>(())
//! ```

#[allow(unused_extern_crates)]
extern crate self as docbase_core;

pub mod catalog;
pub mod command;
pub mod document;
pub mod engine;
pub mod error;
pub mod keys;
pub mod query;
pub mod scan;
pub mod store;
