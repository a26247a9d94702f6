//! Convenient re-exports of commonly used types from docbase.
//!
//! Import this prelude module to quickly access the most frequently used
//! types and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use docbase::prelude::*;
//! ```

pub use docbase_core::{
    command::{self, Command},
    document::Document,
    engine::{BatchOp, KeyRange, KvCursor, KvEngine, KvEngineBuilder},
    error::{DocBaseError, DocBaseResult},
    query::{FindOptions, Query},
    scan::DocumentScan,
    store::{DocumentStore, UNRANGED_SCAN_LIMIT},
};
pub use docbase_memory::{MemoryEngine, MemoryEngineBuilder};
