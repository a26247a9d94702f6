//! Collection registry: existence markers in the reserved metadata key space.
//!
//! A collection exists iff the key `__collection:<name>` is present. The
//! registry manages those markers; document keys live under the collection's
//! own `<name>:` prefix and are purged together with the marker when the
//! collection is deleted.

use log::debug;

use crate::engine::{BatchOp, KvEngine};
use crate::error::{DocBaseError, DocBaseResult};
use crate::keys;

/// Registry handle borrowing the shared engine.
#[derive(Debug)]
pub struct CollectionCatalog<'a, E: KvEngine> {
    engine: &'a E,
}

impl<'a, E: KvEngine> CollectionCatalog<'a, E> {
    /// Creates a registry view over `engine`.
    pub fn new(engine: &'a E) -> Self {
        Self { engine }
    }

    /// Registers a new collection.
    ///
    /// # Errors
    ///
    /// [`DocBaseError::Validation`] for an invalid name,
    /// [`DocBaseError::AlreadyExists`] if the marker is already present.
    pub async fn create(&self, name: &str) -> DocBaseResult<()> {
        keys::validate_collection_name(name)?;
        let meta_key = keys::collection_meta_key(name);
        if self.engine.get(&meta_key).await?.is_some() {
            return Err(DocBaseError::AlreadyExists(format!(
                "Collection \"{name}\" already exists."
            )));
        }
        self.engine
            .put(&meta_key, keys::COLLECTION_SENTINEL)
            .await?;
        debug!("created collection {name}");
        Ok(())
    }

    /// Returns true iff the collection's existence marker is present. Engine
    /// failures other than not-found propagate.
    pub async fn exists(&self, name: &str) -> DocBaseResult<bool> {
        let meta_key = keys::collection_meta_key(name);
        Ok(self.engine.get(&meta_key).await?.is_some())
    }

    /// Removes a collection: its existence marker and every document key
    /// under its prefix go in one atomic batch, so a crash mid-deletion
    /// cannot leave orphaned documents behind a missing marker.
    ///
    /// # Errors
    ///
    /// [`DocBaseError::NotFound`] if the collection is absent.
    pub async fn delete(&self, name: &str) -> DocBaseResult<()> {
        let meta_key = keys::collection_meta_key(name);
        if self.engine.get(&meta_key).await?.is_none() {
            return Err(DocBaseError::NotFound(format!(
                "Collection \"{name}\" does not exist."
            )));
        }

        let mut ops = vec![BatchOp::Delete { key: meta_key }];
        for key in self.document_keys(name).await? {
            ops.push(BatchOp::Delete { key });
        }
        let purged = ops.len() - 1;
        self.engine.write_batch(ops).await?;
        debug!("deleted collection {name} ({purged} documents purged)");
        Ok(())
    }

    /// Lists all registered collection names, in the lexicographic key order
    /// of the underlying engine.
    pub async fn list(&self) -> DocBaseResult<Vec<String>> {
        let mut cursor = self
            .engine
            .iterate(keys::collection_meta_range())
            .await?;
        let mut names = Vec::new();
        while let Some((key, _)) = cursor.next().await? {
            if let Some(name) = keys::collection_name_from_meta_key(&key) {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Collects every document key under the collection's prefix. Used to
    /// assemble the purge batches for delete and truncate.
    pub(crate) async fn document_keys(&self, name: &str) -> DocBaseResult<Vec<Vec<u8>>> {
        let mut cursor = self
            .engine
            .iterate(keys::document_range(name))
            .await?;
        let mut collected = Vec::new();
        while let Some((key, _)) = cursor.next().await? {
            collected.push(key);
        }
        Ok(collected)
    }
}
