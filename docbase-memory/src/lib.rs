//! In-memory key-value engine for docbase.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! `KvEngine` trait over an ordered map. It uses an async-aware read-write
//! lock for concurrent access and is ideal for development, testing, and
//! small-scale deployments.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Ordered keyspace** - Keys iterate in ascending byte order, as the
//!   document layer requires
//! - **Snapshot cursors** - Each cursor iterates the keyspace as it was at
//!   creation time, unaffected by later writes
//!
//! # Quick Start
//!
//! ```ignore
//! use docbase_core::store::DocumentStore;
//! use docbase_memory::MemoryEngine;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStore::new(MemoryEngine::new());
//!     store.create_collection("users").await?;
//!     store.create_one("users", &json!({ "name": "Ann" })).await?;
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docbase_memory;

pub mod engine;

pub use engine::{MemoryEngine, MemoryEngineBuilder};
