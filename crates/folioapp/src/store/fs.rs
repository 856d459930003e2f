use super::fs_backend::FsBackend;
use super::record_store::RecordStore;
use std::path::PathBuf;

/// Production store: a data directory holding the manifest and payloads.
pub type FileStore = RecordStore<FsBackend>;

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        RecordStore::with_backend(FsBackend::new(root))
    }
}
