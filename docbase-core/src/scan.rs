//! Lazy, resource-scoped scans over a collection's document key range.
//!
//! A [`DocumentScan`] is a pull-based sequence of `(key, document)` pairs
//! obtained by iterating the engine over the collection's prefix range in key
//! order. It is finite and non-restartable, and moves through three states:
//! opened (cursor acquired), yielding (entries being pulled), and closed. The
//! underlying cursor is released on every exit path: normal exhaustion, a
//! decode or engine error, an explicit [`DocumentScan::close`], or dropping
//! the scan early.

use crate::document::{self, Document};
use crate::engine::{KvCursor, KvEngine};
use crate::error::DocBaseResult;
use crate::keys;

/// An in-progress scan over one collection. Closed once the cursor is gone.
pub struct DocumentScan {
    cursor: Option<Box<dyn KvCursor>>,
}

impl DocumentScan {
    /// Opens a scan over every document key of `collection`.
    pub async fn open<E: KvEngine>(engine: &E, collection: &str) -> DocBaseResult<Self> {
        let cursor = engine
            .iterate(keys::document_range(collection))
            .await?;
        Ok(Self {
            cursor: Some(cursor),
        })
    }

    /// Pulls the next `(key, document)` pair in key order, or `None` once the
    /// range is exhausted. Exhaustion and errors both close the scan, so a
    /// failed or finished scan keeps returning `None` rather than touching a
    /// released cursor.
    pub async fn next(&mut self) -> DocBaseResult<Option<(Vec<u8>, Document)>> {
        let Some(cursor) = self.cursor.as_mut() else {
            return Ok(None);
        };
        match cursor.next().await {
            Ok(Some((key, value))) => match document::decode(&value) {
                Ok(decoded) => Ok(Some((key, decoded))),
                Err(err) => {
                    self.close();
                    Err(err)
                }
            },
            Ok(None) => {
                self.close();
                Ok(None)
            }
            Err(err) => {
                self.close();
                Err(err)
            }
        }
    }

    /// Releases the underlying cursor. Safe to call more than once; also
    /// implied by dropping the scan.
    pub fn close(&mut self) {
        self.cursor = None;
    }

    /// Returns true once the cursor has been released.
    pub fn is_closed(&self) -> bool {
        self.cursor.is_none()
    }
}
