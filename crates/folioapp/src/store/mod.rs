//! # Storage Layer
//!
//! This module defines the storage abstraction for folio. The [`BlobStore`]
//! trait is the local blob store: a persistent table of file records keyed by
//! an auto-incrementing id, with a non-unique secondary index on `section`.
//!
//! ## Contract
//!
//! - `open`: idempotent. Creates the table and index only if absent.
//! - `add`: assigns the next id, persists payload then row, returns the id.
//! - `remove`: deletes exactly one row and its payload.
//! - `list_all`: every record with its payload, in insertion order.
//!
//! The section index is maintained on every write and served by
//! `list_section`. The loader itself always does a full scan and partitions
//! in memory, which is fine at portfolio scale.
//!
//! ## Schema Versioning
//!
//! The manifest carries a schema version. Opening compares it with
//! [`schema::SCHEMA_VERSION`]:
//! - **Absent store** (version 0) or **older**: run [`schema::upgrade`], save.
//! - **Current**: nothing to do.
//! - **Newer**: the store is unavailable to this build.
//!
//! ## Failure Modes
//!
//! No retries anywhere:
//! - Open failure → [`FolioError::StoreUnavailable`](crate::error::FolioError::StoreUnavailable)
//! - Write failure → `WriteFailure` naming the file
//! - Delete failure → `DeleteFailure`; the row stays in place
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production implementation on a data directory.
//! - [`memory::InMemoryStore`]: For testing logic without filesystem I/O.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//! ├── folio.json          # Manifest: schema version, rows, section index
//! ├── folio.toml          # Configuration (optional)
//! └── blobs/
//!     └── file-{id}.bin   # Record payloads
//! ```

use crate::error::Result;
use crate::model::{FileRecord, NewRecord, RecordId, RecordMeta, SectionKey};

pub mod backend;
pub mod fs;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;
pub mod record_store;
pub mod schema;

/// Abstract interface for record storage.
pub trait BlobStore {
    /// Open (and if needed create or upgrade) the store.
    fn open(&self) -> Result<()>;

    /// Persist a new record and return its id.
    fn add(&mut self, record: NewRecord) -> Result<RecordId>;

    /// Delete a record permanently.
    fn remove(&mut self, id: RecordId) -> Result<()>;

    /// All records, payload included, in insertion order.
    fn list_all(&self) -> Result<Vec<FileRecord>>;

    /// Rows of one section, via the section index.
    fn list_section(&self, section: SectionKey) -> Result<Vec<RecordMeta>>;

    /// A single record by id.
    fn get(&self, id: RecordId) -> Result<FileRecord>;

    /// A single row by id, without reading its payload.
    fn meta(&self, id: RecordId) -> Result<RecordMeta>;

    /// Where the data lives (path or virtual location).
    fn location(&self) -> String;
}
