//! Ordered key-value engine contract consumed by the document layer.
//!
//! The document store does not implement storage itself; it requires an ordered
//! byte-string key-value store exposing point reads and writes, an atomic
//! multi-operation batch, and forward iteration over a key range. Anything
//! satisfying [`KvEngine`] can sit underneath the store: an in-memory map, an
//! LSM engine, a remote store.
//!
//! # Traits
//!
//! - [`KvEngine`]: the engine contract
//! - [`KvCursor`]: a forward cursor handed out by [`KvEngine::iterate`]
//! - [`KvEngineBuilder`]: factory trait for constructing engine instances
//!
//! # Example
//!
//! ```ignore
//! use docbase_core::engine::{KvEngine, KeyRange};
//!
//! let engine = MyEngine::open(path)?;
//! engine.put(b"users:1", b"{}").await?;
//! let mut cursor = engine.iterate(KeyRange::new(b"users:".to_vec(), b"users;".to_vec())).await?;
//! while let Some((key, value)) = cursor.next().await? {
//!     // entries arrive in ascending key order
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::DocBaseResult;

/// A single operation inside an atomic batch write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    /// Write `value` under `key`, replacing any existing value.
    Put { key: Vec<u8>, value: Vec<u8> },
    /// Remove `key`. Removing an absent key is not an error.
    Delete { key: Vec<u8> },
}

/// A half-open key range `[start, end)` over the engine's byte-string key space.
///
/// Ranges are always iterated forward, in ascending byte order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRange {
    /// Inclusive lower bound.
    pub start: Vec<u8>,
    /// Exclusive upper bound.
    pub end: Vec<u8>,
}

impl KeyRange {
    /// Creates a new half-open range `[start, end)`.
    pub fn new(start: Vec<u8>, end: Vec<u8>) -> Self {
        Self { start, end }
    }
}

/// A forward cursor over an engine key range.
///
/// Cursors are per-call scoped resources: the underlying engine resource is
/// released when the cursor is dropped, whether it was exhausted, errored, or
/// abandoned early. Implementations must hand out entries in ascending key
/// order and must not observe writes made after cursor creation any more
/// strongly than the engine's own snapshot semantics allow.
#[async_trait]
pub trait KvCursor: Send {
    /// Advances the cursor and returns the next `(key, value)` entry, or
    /// `None` once the range is exhausted.
    async fn next(&mut self) -> DocBaseResult<Option<(Vec<u8>, Vec<u8>)>>;
}

/// Abstract interface over an ordered byte-string key-value store.
///
/// Implementations must be thread-safe and support concurrent access from
/// multiple async tasks; the exact concurrency model is implementation
/// specific. All methods are async and suspend at the engine's I/O points.
///
/// # Error Handling
///
/// "Key absent" is not an error: [`KvEngine::get`] returns `Ok(None)`. Every
/// other failure surfaces as [`DocBaseError::Storage`](crate::error::DocBaseError::Storage).
#[async_trait]
pub trait KvEngine: Send + Sync + Debug {
    /// Returns the value stored under `key`, or `None` if the key is absent.
    async fn get(&self, key: &[u8]) -> DocBaseResult<Option<Vec<u8>>>;

    /// Writes `value` under `key`, replacing any existing value.
    async fn put(&self, key: &[u8], value: &[u8]) -> DocBaseResult<()>;

    /// Removes `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &[u8]) -> DocBaseResult<()>;

    /// Applies every operation in `ops` atomically: after a crash either all
    /// of the batch is visible or none of it is.
    async fn write_batch(&self, ops: Vec<BatchOp>) -> DocBaseResult<()>;

    /// Opens a forward cursor over `range`, in ascending key order.
    async fn iterate(&self, range: KeyRange) -> DocBaseResult<Box<dyn KvCursor>>;

    /// Cleanly shuts down the engine, releasing its resources.
    ///
    /// The default implementation is a no-op; persistent engines should
    /// override it to flush and close.
    async fn shutdown(self) -> DocBaseResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<E> KvEngine for &E
where
    E: KvEngine,
{
    async fn get(&self, key: &[u8]) -> DocBaseResult<Option<Vec<u8>>> {
        (*self).get(key).await
    }

    async fn put(&self, key: &[u8], value: &[u8]) -> DocBaseResult<()> {
        (*self).put(key, value).await
    }

    async fn delete(&self, key: &[u8]) -> DocBaseResult<()> {
        (*self).delete(key).await
    }

    async fn write_batch(&self, ops: Vec<BatchOp>) -> DocBaseResult<()> {
        (*self).write_batch(ops).await
    }

    async fn iterate(&self, range: KeyRange) -> DocBaseResult<Box<dyn KvCursor>> {
        (*self).iterate(range).await
    }
}

/// Factory trait for creating engine instances.
#[async_trait]
pub trait KvEngineBuilder {
    type Engine: KvEngine;

    async fn build(self) -> DocBaseResult<Self::Engine>;
}
