//! Main docbase crate providing a unified interface to the document database.
//!
//! This crate is the primary entry point for users of docbase. It re-exports
//! the document layer from `docbase-core` and provides convenient access to
//! the bundled storage engines.
//!
//! # Features
//!
//! - **Schemaless JSON documents** - Collections hold arbitrary JSON objects
//!   with generated `id`, `createdAt`, and `updatedAt` fields
//! - **Pluggable storage** - Anything implementing the ordered `KvEngine`
//!   trait can sit underneath the store
//! - **Linear-scan queries** - Field equality and timestamp-range filtering
//!   with projection and pagination
//! - **Command language** - A one-line `collection.method({...})` grammar for
//!   shells and scripts
//!
//! # Quick Start
//!
//! ```ignore
//! use docbase::prelude::*;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStore::new(MemoryEngine::new());
//!
//!     store.create_collection("users").await?;
//!     let ann = store
//!         .create_one("users", &json!({ "name": "Ann", "age": 5 }))
//!         .await?;
//!
//!     // Every stored document carries generated id and timestamps.
//!     let found = store
//!         .find_one("users", &json!({ "id": ann["id"] }), &[])
//!         .await?;
//!     assert_eq!(found.as_ref(), Some(&ann));
//!
//!     // The same operations are reachable through the command language.
//!     let listed = command::execute(&store, "collection.listCollection()").await?;
//!     assert_eq!(listed, json!(["users"]));
//!
//!     store.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Engines
//!
//! - [`memory`] - Fast in-memory engine for development and testing

pub mod prelude;

pub use docbase_core::{catalog, command, document, engine, error, keys, query, scan, store};

/// In-memory storage engine implementations.
pub mod memory {
    pub use docbase_memory::{MemoryEngine, MemoryEngineBuilder};
}
