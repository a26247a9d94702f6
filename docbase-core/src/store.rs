//! The document-store facade: the full operation set over one engine handle.
//!
//! [`DocumentStore`] composes the registry, codec, and scan engine into the
//! operations any transport (HTTP handler, RPC service, line shell) consumes:
//! collection management plus per-document create/find/update/delete and the
//! linear-scan `find`. The store owns the single shared engine handle; it is
//! intended to be opened once per process and shared by reference.
//!
//! No locking is layered on top of the engine: concurrent updates matching
//! the same document race with last-writer-wins, and scans observe whatever
//! snapshot the engine's cursor provides.

use log::debug;
use serde_json::Value;

use crate::catalog::CollectionCatalog;
use crate::document::{self, Document, UPDATED_AT_FIELD};
use crate::engine::{BatchOp, KvEngine};
use crate::error::{DocBaseError, DocBaseResult};
use crate::keys;
use crate::query::{FindOptions, Query};
use crate::scan::DocumentScan;

/// Unranged `find` calls refuse to scan collections holding more documents
/// than this; callers opt into large scans with an explicit limit.
pub const UNRANGED_SCAN_LIMIT: usize = 200;

/// A document store bound to a specific engine implementation.
#[derive(Debug)]
pub struct DocumentStore<E: KvEngine> {
    engine: E,
}

impl<E: KvEngine> DocumentStore<E> {
    /// Creates a store over an already-opened engine handle.
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    fn catalog(&self) -> CollectionCatalog<'_, E> {
        CollectionCatalog::new(&self.engine)
    }

    async fn require_collection(&self, collection: &str) -> DocBaseResult<()> {
        keys::validate_collection_name(collection)?;
        if !self.catalog().exists(collection).await? {
            return Err(DocBaseError::NotFound(format!(
                "Collection \"{collection}\" does not exist."
            )));
        }
        Ok(())
    }

    /// Registers a new collection.
    ///
    /// # Errors
    ///
    /// [`DocBaseError::AlreadyExists`] on a duplicate name.
    pub async fn create_collection(&self, name: &str) -> DocBaseResult<()> {
        self.catalog().create(name).await
    }

    /// Returns whether a collection with this name exists.
    pub async fn find_collection(&self, name: &str) -> DocBaseResult<bool> {
        self.catalog().exists(name).await
    }

    /// Removes a collection and all of its documents in one atomic batch.
    ///
    /// # Errors
    ///
    /// [`DocBaseError::NotFound`] if the collection is absent.
    pub async fn delete_collection(&self, name: &str) -> DocBaseResult<()> {
        self.catalog().delete(name).await
    }

    /// Lists all collection names in engine key order.
    pub async fn list_collections(&self) -> DocBaseResult<Vec<String>> {
        self.catalog().list().await
    }

    /// Deletes every document in the collection in one atomic batch while
    /// keeping the collection itself registered.
    pub async fn truncate_collection(&self, name: &str) -> DocBaseResult<()> {
        self.require_collection(name).await?;
        let ops: Vec<BatchOp> = self
            .catalog()
            .document_keys(name)
            .await?
            .into_iter()
            .map(|key| BatchOp::Delete { key })
            .collect();
        if ops.is_empty() {
            return Ok(());
        }
        let purged = ops.len();
        self.engine.write_batch(ops).await?;
        debug!("truncated collection {name} ({purged} documents)");
        Ok(())
    }

    /// Validates and stores one document, returning it as persisted with the
    /// generated `id`, `createdAt`, and `updatedAt` fields.
    ///
    /// # Errors
    ///
    /// [`DocBaseError::NotFound`] for a missing collection,
    /// [`DocBaseError::InvalidDocument`] for a non-object or empty payload.
    pub async fn create_one(&self, collection: &str, input: &Value) -> DocBaseResult<Document> {
        self.require_collection(collection).await?;
        let prepared = document::prepare(input)?;
        let id = document::document_id(&prepared)?.to_string();
        let key = keys::document_key(collection, &id);
        self.engine
            .put(&key, &document::encode(&prepared)?)
            .await?;
        debug!("created document {id} in {collection}");
        Ok(prepared)
    }

    /// Returns the first document matching `query` in scan order, projected
    /// through `return_fields`, or `None` when nothing matches. "First" means
    /// first under the engine's iteration order at scan time; concurrent
    /// writers can change which document that is.
    pub async fn find_one(
        &self,
        collection: &str,
        query: &Value,
        return_fields: &[String],
    ) -> DocBaseResult<Option<Document>> {
        self.require_collection(collection).await?;
        let query = Query::from_value(query)?;

        let mut scan = DocumentScan::open(&self.engine, collection).await?;
        while let Some((_, candidate)) = scan.next().await? {
            if query.matches(&candidate) {
                scan.close();
                return Ok(Some(document::project(&candidate, return_fields)));
            }
        }
        Ok(None)
    }

    /// Collects documents matching `query` in scan order, applying
    /// projection, `limit`, and `offset` per `options`.
    ///
    /// Without a limit, the collection's total document count is checked
    /// first and [`DocBaseError::LimitRequired`] is returned beyond
    /// [`UNRANGED_SCAN_LIMIT`] documents. With a limit, scanning stops once
    /// `limit` matches are collected; `offset` then slices the already
    /// collected page, so it only skips within those matches.
    pub async fn find(
        &self,
        collection: &str,
        query: &Value,
        options: &FindOptions,
    ) -> DocBaseResult<Vec<Document>> {
        self.require_collection(collection).await?;
        let query = Query::from_value(query)?;

        if options.limit.is_none() {
            let total = self.count_documents(collection).await?;
            if total > UNRANGED_SCAN_LIMIT {
                return Err(DocBaseError::LimitRequired(UNRANGED_SCAN_LIMIT));
            }
        }

        let mut matches = Vec::new();
        let mut scan = DocumentScan::open(&self.engine, collection).await?;
        while let Some((_, candidate)) = scan.next().await? {
            if !query.matches(&candidate) {
                continue;
            }
            matches.push(document::project(&candidate, &options.return_fields));
            if let Some(limit) = options.limit
                && matches.len() >= limit
            {
                scan.close();
                break;
            }
        }

        Ok(matches
            .into_iter()
            .skip(options.offset.unwrap_or(0))
            .take(options.limit.unwrap_or(usize::MAX))
            .collect())
    }

    /// Merges `patch` over the first document matching `query`, forces a new
    /// `updatedAt`, and writes the result back under the same key. The
    /// generated `id` and `createdAt` fields cannot be overwritten by a
    /// patch. Returns whether any document was updated.
    ///
    /// # Errors
    ///
    /// [`DocBaseError::Validation`] for a non-object patch.
    pub async fn update_one(
        &self,
        collection: &str,
        query: &Value,
        patch: &Value,
    ) -> DocBaseResult<bool> {
        self.require_collection(collection).await?;
        let query = Query::from_value(query)?;
        let patch = patch.as_object().ok_or_else(|| {
            DocBaseError::Validation("Update data must be a valid non-null object.".to_string())
        })?;

        let mut scan = DocumentScan::open(&self.engine, collection).await?;
        while let Some((key, mut existing)) = scan.next().await? {
            if !query.matches(&existing) {
                continue;
            }
            scan.close();
            for (field, value) in patch {
                if field == document::ID_FIELD || field == document::CREATED_AT_FIELD {
                    continue;
                }
                existing.insert(field.clone(), value.clone());
            }
            existing.insert(
                UPDATED_AT_FIELD.to_string(),
                Value::String(document::now_timestamp()),
            );
            self.engine
                .put(&key, &document::encode(&existing)?)
                .await?;
            debug!("updated one document in {collection}");
            return Ok(true);
        }
        Ok(false)
    }

    /// Deletes the first document matching `query` in scan order. Matching is
    /// by field equality, consistent with [`DocumentStore::find_one`].
    /// Returns whether a document was deleted.
    pub async fn delete_one(&self, collection: &str, query: &Value) -> DocBaseResult<bool> {
        self.require_collection(collection).await?;
        let query = Query::from_value(query)?;

        let mut scan = DocumentScan::open(&self.engine, collection).await?;
        while let Some((key, candidate)) = scan.next().await? {
            if query.matches(&candidate) {
                scan.close();
                self.engine.delete(&key).await?;
                debug!("deleted one document from {collection}");
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Shuts down the store, releasing the engine handle.
    pub async fn shutdown(self) -> DocBaseResult<()> {
        self.engine.shutdown().await
    }

    async fn count_documents(&self, collection: &str) -> DocBaseResult<usize> {
        Ok(self.catalog().document_keys(collection).await?.len())
    }
}
