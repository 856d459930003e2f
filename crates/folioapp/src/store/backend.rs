use super::schema::Manifest;
use crate::error::Result;
use crate::model::RecordId;

/// Abstract interface for raw storage I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while RecordStore handles the "what" (ids, schema, index upkeep).
pub trait StorageBackend {
    // --- Manifest ---

    /// Load the manifest. Returns Ok(None) when the store was never created.
    fn load_manifest(&self) -> Result<Option<Manifest>>;

    /// Save the manifest.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save_manifest(&self, manifest: &Manifest) -> Result<()>;

    // --- Payloads ---

    /// Read a record's payload. Returns Ok(None) if it does not exist.
    fn read_blob(&self, id: RecordId) -> Result<Option<Vec<u8>>>;

    /// Write a record's payload. Same atomicity rule as the manifest.
    fn write_blob(&self, id: RecordId, bytes: &[u8]) -> Result<()>;

    fn delete_blob(&self, id: RecordId) -> Result<()>;

    // --- Capabilities ---

    /// Whether the store location can be used at all.
    fn is_available(&self) -> bool;

    /// Human readable location, for logs and the CLI.
    fn location(&self) -> String;
}
