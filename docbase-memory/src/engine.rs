//! Ordered in-memory engine implementation.
//!
//! This module provides a simple but complete engine backed by a `BTreeMap`
//! of byte-string keys behind an async-safe read-write lock.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use mea::rwlock::RwLock;

use docbase_core::engine::{BatchOp, KeyRange, KvCursor, KvEngine, KvEngineBuilder};
use docbase_core::error::DocBaseResult;

type Keyspace = BTreeMap<Vec<u8>, Vec<u8>>;

/// Thread-safe in-memory key-value engine.
///
/// Implements the [`KvEngine`] trait over an ordered map, so document keys
/// iterate in ascending byte order exactly as a persistent ordered engine
/// would hand them out.
///
/// # Thread Safety
///
/// `MemoryEngine` is cloneable and wraps its keyspace in an `Arc`, so clones
/// share the same underlying data and the engine can be handed to multiple
/// async tasks. Batches apply under a single write guard, which makes them
/// atomic with respect to every other operation on the engine.
///
/// # Cursors
///
/// [`KvEngine::iterate`] snapshots the requested range at call time. A cursor
/// never observes writes made after its creation, and dropping it releases
/// the snapshot.
///
/// # Example
///
/// ```ignore
/// use docbase_memory::MemoryEngine;
/// use docbase_core::engine::KvEngine;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let engine = MemoryEngine::new();
///     engine.put(b"users:1", b"{}").await?;
///     assert!(engine.get(b"users:1").await?.is_some());
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct MemoryEngine {
    keyspace: Arc<RwLock<Keyspace>>,
}

impl MemoryEngine {
    /// Creates a new empty in-memory engine.
    pub fn new() -> Self {
        Self {
            keyspace: Arc::new(RwLock::new(Keyspace::new())),
        }
    }

    /// Creates a builder for constructing a `MemoryEngine`.
    ///
    /// Currently the builder takes no options, but it keeps construction
    /// uniform with engines that need configuration.
    pub fn builder() -> MemoryEngineBuilder {
        MemoryEngineBuilder::default()
    }
}

#[async_trait]
impl KvEngine for MemoryEngine {
    async fn get(&self, key: &[u8]) -> DocBaseResult<Option<Vec<u8>>> {
        Ok(self.keyspace.read().await.get(key).cloned())
    }

    async fn put(&self, key: &[u8], value: &[u8]) -> DocBaseResult<()> {
        self.keyspace
            .write()
            .await
            .insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &[u8]) -> DocBaseResult<()> {
        self.keyspace.write().await.remove(key);
        Ok(())
    }

    async fn write_batch(&self, ops: Vec<BatchOp>) -> DocBaseResult<()> {
        let mut keyspace = self.keyspace.write().await;
        for op in ops {
            match op {
                BatchOp::Put { key, value } => {
                    keyspace.insert(key, value);
                }
                BatchOp::Delete { key } => {
                    keyspace.remove(&key);
                }
            }
        }
        Ok(())
    }

    async fn iterate(&self, range: KeyRange) -> DocBaseResult<Box<dyn KvCursor>> {
        // BTreeMap::range panics on an inverted range; an empty or inverted
        // range yields an empty cursor instead.
        if range.start >= range.end {
            return Ok(Box::new(MemoryCursor {
                entries: Vec::new().into_iter(),
            }));
        }
        let entries: Vec<(Vec<u8>, Vec<u8>)> = self
            .keyspace
            .read()
            .await
            .range(range.start..range.end)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Ok(Box::new(MemoryCursor {
            entries: entries.into_iter(),
        }))
    }
}

/// Cursor over a snapshot of one key range.
struct MemoryCursor {
    entries: std::vec::IntoIter<(Vec<u8>, Vec<u8>)>,
}

#[async_trait]
impl KvCursor for MemoryCursor {
    async fn next(&mut self) -> DocBaseResult<Option<(Vec<u8>, Vec<u8>)>> {
        Ok(self.entries.next())
    }
}

/// Builder for constructing [`MemoryEngine`] instances.
#[derive(Default)]
pub struct MemoryEngineBuilder;

#[async_trait]
impl KvEngineBuilder for MemoryEngineBuilder {
    type Engine = MemoryEngine;

    /// Builds and returns a new [`MemoryEngine`]. Always succeeds.
    async fn build(self) -> DocBaseResult<Self::Engine> {
        Ok(MemoryEngine::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_put_delete_round_trip() {
        let engine = MemoryEngine::new();
        assert!(engine.get(b"a").await.unwrap().is_none());

        engine.put(b"a", b"1").await.unwrap();
        assert_eq!(engine.get(b"a").await.unwrap(), Some(b"1".to_vec()));

        engine.put(b"a", b"2").await.unwrap();
        assert_eq!(engine.get(b"a").await.unwrap(), Some(b"2".to_vec()));

        engine.delete(b"a").await.unwrap();
        assert!(engine.get(b"a").await.unwrap().is_none());

        // Deleting an absent key succeeds.
        engine.delete(b"a").await.unwrap();
    }

    #[tokio::test]
    async fn iteration_is_ordered_and_range_bounded() {
        let engine = MemoryEngine::new();
        engine.put(b"users:b", b"2").await.unwrap();
        engine.put(b"users:a", b"1").await.unwrap();
        engine.put(b"orders:z", b"9").await.unwrap();
        engine.put(b"users;", b"out").await.unwrap();

        let mut cursor = engine
            .iterate(KeyRange::new(b"users:".to_vec(), b"users;".to_vec()))
            .await
            .unwrap();
        let mut keys = Vec::new();
        while let Some((key, _)) = cursor.next().await.unwrap() {
            keys.push(key);
        }
        assert_eq!(keys, vec![b"users:a".to_vec(), b"users:b".to_vec()]);
    }

    #[tokio::test]
    async fn inverted_range_yields_nothing() {
        let engine = MemoryEngine::new();
        engine.put(b"a", b"1").await.unwrap();
        let mut cursor = engine
            .iterate(KeyRange::new(b"z".to_vec(), b"a".to_vec()))
            .await
            .unwrap();
        assert!(cursor.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cursors_snapshot_at_creation() {
        let engine = MemoryEngine::new();
        engine.put(b"k:a", b"1").await.unwrap();

        let mut cursor = engine
            .iterate(KeyRange::new(b"k:".to_vec(), b"k;".to_vec()))
            .await
            .unwrap();
        engine.put(b"k:b", b"2").await.unwrap();

        assert!(cursor.next().await.unwrap().is_some());
        assert!(cursor.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn batches_apply_all_operations() {
        let engine = MemoryEngine::new();
        engine.put(b"old", b"x").await.unwrap();

        engine
            .write_batch(vec![
                BatchOp::Put {
                    key: b"a".to_vec(),
                    value: b"1".to_vec(),
                },
                BatchOp::Put {
                    key: b"b".to_vec(),
                    value: b"2".to_vec(),
                },
                BatchOp::Delete {
                    key: b"old".to_vec(),
                },
            ])
            .await
            .unwrap();

        assert_eq!(engine.get(b"a").await.unwrap(), Some(b"1".to_vec()));
        assert_eq!(engine.get(b"b").await.unwrap(), Some(b"2".to_vec()));
        assert!(engine.get(b"old").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clones_share_the_keyspace() {
        let engine = MemoryEngine::new();
        let clone = engine.clone();
        engine.put(b"shared", b"1").await.unwrap();
        assert_eq!(clone.get(b"shared").await.unwrap(), Some(b"1".to_vec()));
    }

    #[tokio::test]
    async fn builder_produces_a_working_engine() {
        let engine = MemoryEngine::builder().build().await.unwrap();
        engine.put(b"a", b"1").await.unwrap();
        assert_eq!(engine.get(b"a").await.unwrap(), Some(b"1".to_vec()));
    }
}
