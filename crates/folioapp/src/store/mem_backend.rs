use super::backend::StorageBackend;
use super::schema::Manifest;
use crate::error::{FolioError, Result};
use crate::model::RecordId;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since folio is single-threaded.
/// This avoids the overhead of `RwLock` while still allowing the
/// `StorageBackend` trait to use `&self` for all methods.
#[derive(Default)]
pub struct MemBackend {
    manifest: RefCell<Option<Manifest>>,
    blobs: RefCell<HashMap<RecordId, Vec<u8>>>,
    simulate_write_error: Cell<bool>,
    simulate_unavailable: Cell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Make the backend report itself as unusable, like a blocked database.
    pub fn set_simulate_unavailable(&self, simulate: bool) {
        self.simulate_unavailable.set(simulate);
    }

    /// Number of payloads currently held.
    pub fn blob_count(&self) -> usize {
        self.blobs.borrow().len()
    }

    /// Test helper to seed a manifest directly (e.g. an older schema).
    pub fn put_manifest(&self, manifest: Manifest) {
        *self.manifest.borrow_mut() = Some(manifest);
    }

    fn check_write(&self) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(FolioError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn load_manifest(&self) -> Result<Option<Manifest>> {
        Ok(self.manifest.borrow().clone())
    }

    fn save_manifest(&self, manifest: &Manifest) -> Result<()> {
        self.check_write()?;
        *self.manifest.borrow_mut() = Some(manifest.clone());
        Ok(())
    }

    fn read_blob(&self, id: RecordId) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.borrow().get(&id).cloned())
    }

    fn write_blob(&self, id: RecordId, bytes: &[u8]) -> Result<()> {
        self.check_write()?;
        self.blobs.borrow_mut().insert(id, bytes.to_vec());
        Ok(())
    }

    fn delete_blob(&self, id: RecordId) -> Result<()> {
        self.blobs.borrow_mut().remove(&id);
        Ok(())
    }

    fn is_available(&self) -> bool {
        !self.simulate_unavailable.get()
    }

    fn location(&self) -> String {
        "memory://folio".to_string()
    }
}
