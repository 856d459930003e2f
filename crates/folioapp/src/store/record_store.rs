use super::backend::StorageBackend;
use super::schema::{self, FileTable, Manifest, SCHEMA_VERSION};
use super::BlobStore;
use crate::error::{FolioError, Result};
use crate::model::{FileRecord, NewRecord, RecordId, RecordMeta, SectionKey};
use std::cell::Cell;
use tracing::{debug, info, warn};

pub struct RecordStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    opened: Cell<bool>,
}

impl<B: StorageBackend> RecordStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            opened: Cell::new(false),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn ensure_open(&self) -> Result<()> {
        if self.opened.get() {
            return Ok(());
        }
        self.open()
    }

    /// Load the manifest of an opened store. The table always exists after open.
    fn load_table(&self) -> Result<(Manifest, FileTable)> {
        self.ensure_open()?;
        let mut manifest = self
            .backend
            .load_manifest()?
            .ok_or_else(|| FolioError::StoreUnavailable("manifest disappeared".to_string()))?;
        let table = manifest
            .files
            .take()
            .ok_or_else(|| FolioError::StoreUnavailable("file table is missing".to_string()))?;
        Ok((manifest, table))
    }

    fn save_table(&self, mut manifest: Manifest, table: FileTable) -> Result<()> {
        manifest.files = Some(table);
        self.backend.save_manifest(&manifest)
    }
}

impl<B: StorageBackend> BlobStore for RecordStore<B> {
    fn open(&self) -> Result<()> {
        let location = self.backend.location();
        if !self.backend.is_available() {
            return Err(FolioError::StoreUnavailable(format!(
                "{} cannot be used as a store",
                location
            )));
        }

        let manifest = self
            .backend
            .load_manifest()
            .map_err(|e| FolioError::StoreUnavailable(e.to_string()))?;
        let stored_version = manifest.as_ref().map_or(0, |m| m.schema_version);

        if stored_version > SCHEMA_VERSION {
            return Err(FolioError::StoreUnavailable(format!(
                "schema version {} is newer than supported version {}",
                stored_version, SCHEMA_VERSION
            )));
        }

        if stored_version < SCHEMA_VERSION {
            let mut manifest = manifest.unwrap_or_default();
            schema::upgrade(&mut manifest, stored_version);
            self.backend
                .save_manifest(&manifest)
                .map_err(|e| FolioError::StoreUnavailable(e.to_string()))?;
            info!(
                %location,
                from = stored_version,
                to = SCHEMA_VERSION,
                "store schema upgraded"
            );
        }

        self.opened.set(true);
        debug!(%location, "store opened");
        Ok(())
    }

    fn add(&mut self, record: NewRecord) -> Result<RecordId> {
        let write_failure = |reason: String| FolioError::WriteFailure {
            name: record.name.clone(),
            reason,
        };

        let (manifest, mut table) = self.load_table().map_err(|e| write_failure(e.to_string()))?;
        let id = RecordId(table.next_id);

        self.backend
            .write_blob(id, &record.blob)
            .map_err(|e| write_failure(e.to_string()))?;

        table.next_id += 1;
        table.rows.push(RecordMeta {
            id,
            section: record.section,
            kind: record.kind,
            name: record.name.clone(),
            media_type: record.media_type.clone(),
            size: record.blob.len() as u64,
            created_at: record.created_at,
        });
        table.index_insert(record.section, id);

        if let Err(e) = self.save_table(manifest, table) {
            // The row never landed; drop the payload so nothing is orphaned.
            let _ = self.backend.delete_blob(id);
            return Err(write_failure(e.to_string()));
        }

        info!(%id, section = %record.section, kind = %record.kind, name = %record.name, "record added");
        Ok(id)
    }

    fn remove(&mut self, id: RecordId) -> Result<()> {
        let delete_failure = |reason: String| FolioError::DeleteFailure { id, reason };

        let (manifest, mut table) = self.load_table().map_err(|e| delete_failure(e.to_string()))?;
        let pos = table.position(id).ok_or(FolioError::NotFound(id))?;
        let row = table.rows.remove(pos);
        table.index_remove(row.section, id);

        self.save_table(manifest, table)
            .map_err(|e| delete_failure(e.to_string()))?;

        if let Err(e) = self.backend.delete_blob(id) {
            warn!(%id, error = %e, "row removed but payload could not be deleted");
        }

        info!(%id, section = %row.section, name = %row.name, "record removed");
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<FileRecord>> {
        let (_, table) = self.load_table()?;
        let mut records = Vec::with_capacity(table.rows.len());

        for meta in table.rows {
            match self.backend.read_blob(meta.id) {
                Ok(Some(blob)) => records.push(FileRecord::from_parts(meta, blob)),
                Ok(None) => warn!(id = %meta.id, name = %meta.name, "payload missing, skipping row"),
                Err(e) => {
                    warn!(id = %meta.id, name = %meta.name, error = %e, "payload unreadable, skipping row")
                }
            }
        }

        debug!(count = records.len(), "records listed");
        Ok(records)
    }

    fn list_section(&self, section: SectionKey) -> Result<Vec<RecordMeta>> {
        let (_, table) = self.load_table()?;
        let ids = table
            .section_index
            .as_ref()
            .and_then(|index| index.get(&section))
            .cloned()
            .unwrap_or_default();

        Ok(ids
            .into_iter()
            .filter_map(|id| table.position(id).map(|pos| table.rows[pos].clone()))
            .collect())
    }

    fn get(&self, id: RecordId) -> Result<FileRecord> {
        let (_, table) = self.load_table()?;
        let pos = table.position(id).ok_or(FolioError::NotFound(id))?;
        let meta = table.rows[pos].clone();
        let blob = self
            .backend
            .read_blob(id)?
            .ok_or(FolioError::NotFound(id))?;
        Ok(FileRecord::from_parts(meta, blob))
    }

    fn meta(&self, id: RecordId) -> Result<RecordMeta> {
        let (_, table) = self.load_table()?;
        let pos = table.position(id).ok_or(FolioError::NotFound(id))?;
        Ok(table.rows[pos].clone())
    }

    fn location(&self) -> String {
        self.backend.location()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MediaKind;
    use crate::store::memory::InMemoryStore;

    fn section(key: &str) -> SectionKey {
        key.parse().unwrap()
    }

    fn pdf(key: &str, name: &str) -> NewRecord {
        NewRecord::new(
            section(key),
            MediaKind::Pdf,
            name,
            "application/pdf",
            b"%PDF-1.4".to_vec(),
        )
    }

    fn image(key: &str, name: &str) -> NewRecord {
        NewRecord::new(section(key), MediaKind::Image, name, "image/png", vec![1, 2, 3])
    }

    #[test]
    fn open_is_idempotent() {
        let store = InMemoryStore::new();
        store.open().unwrap();
        store.open().unwrap();

        let manifest = store.backend.load_manifest().unwrap().unwrap();
        assert_eq!(manifest.schema_version, SCHEMA_VERSION);
        assert!(manifest.files.unwrap().section_index.is_some());
    }

    #[test]
    fn open_does_not_touch_existing_rows() {
        let mut store = InMemoryStore::new();
        store.add(pdf("1-1", "a.pdf")).unwrap();

        let reopened = InMemoryStore::with_backend(store.backend);
        reopened.open().unwrap();
        assert_eq!(reopened.list_all().unwrap().len(), 1);
    }

    #[test]
    fn open_rejects_newer_schema() {
        let store = InMemoryStore::new();
        store.backend.put_manifest(Manifest {
            schema_version: SCHEMA_VERSION + 1,
            files: None,
        });

        let err = store.open().unwrap_err();
        assert!(matches!(err, FolioError::StoreUnavailable(_)));
    }

    #[test]
    fn open_fails_when_backend_unavailable() {
        let store = InMemoryStore::new();
        store.backend.set_simulate_unavailable(true);
        assert!(matches!(
            store.open().unwrap_err(),
            FolioError::StoreUnavailable(_)
        ));
    }

    #[test]
    fn ids_are_sequential_and_never_reused() {
        let mut store = InMemoryStore::new();
        let a = store.add(pdf("1-1", "a.pdf")).unwrap();
        let b = store.add(pdf("1-1", "b.pdf")).unwrap();
        assert_eq!(a, RecordId(1));
        assert_eq!(b, RecordId(2));

        store.remove(b).unwrap();
        let c = store.add(pdf("1-1", "c.pdf")).unwrap();
        assert_eq!(c, RecordId(3));
    }

    #[test]
    fn list_all_preserves_insertion_order_and_payload() {
        let mut store = InMemoryStore::new();
        store.add(image("2-1", "first.png")).unwrap();
        store.add(pdf("1-1", "second.pdf")).unwrap();
        store.add(image("2-1", "third.png")).unwrap();

        let records = store.list_all().unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first.png", "second.pdf", "third.png"]);
        assert_eq!(records[1].blob, b"%PDF-1.4".to_vec());
        assert_eq!(records[1].kind, MediaKind::Pdf);
    }

    #[test]
    fn remove_deletes_exactly_one_record() {
        let mut store = InMemoryStore::new();
        let keep = store.add(pdf("1-1", "keep.pdf")).unwrap();
        let gone = store.add(pdf("1-1", "gone.pdf")).unwrap();
        store.add(image("3-1", "other.png")).unwrap();

        store.remove(gone).unwrap();

        let records = store.list_all().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().any(|r| r.id == keep));
        assert!(records.iter().all(|r| r.id != gone));
        assert_eq!(store.backend.blob_count(), 2);
    }

    #[test]
    fn remove_unknown_id_is_not_found() {
        let mut store = InMemoryStore::new();
        store.add(pdf("1-1", "a.pdf")).unwrap();

        let err = store.remove(RecordId(99)).unwrap_err();
        assert!(matches!(err, FolioError::NotFound(RecordId(99))));
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn write_failure_names_the_file() {
        let mut store = InMemoryStore::new();
        store.open().unwrap();
        store.backend.set_simulate_write_error(true);

        let err = store.add(pdf("1-1", "resume.pdf")).unwrap_err();
        match err {
            FolioError::WriteFailure { name, .. } => assert_eq!(name, "resume.pdf"),
            other => panic!("expected WriteFailure, got {:?}", other),
        }

        store.backend.set_simulate_write_error(false);
        assert!(store.list_all().unwrap().is_empty());
        assert_eq!(store.backend.blob_count(), 0);
    }

    #[test]
    fn delete_failure_leaves_state_unchanged() {
        let mut store = InMemoryStore::new();
        let id = store.add(pdf("1-2", "a.pdf")).unwrap();
        store.backend.set_simulate_write_error(true);

        let err = store.remove(id).unwrap_err();
        assert!(matches!(err, FolioError::DeleteFailure { id: failed, .. } if failed == id));

        store.backend.set_simulate_write_error(false);
        assert_eq!(store.list_all().unwrap().len(), 1);
        assert_eq!(store.backend.blob_count(), 1);
    }

    #[test]
    fn section_index_tracks_adds_and_removes() {
        let mut store = InMemoryStore::new();
        let a = store.add(pdf("1-1", "a.pdf")).unwrap();
        store.add(image("2-2", "b.png")).unwrap();
        let c = store.add(image("1-1", "c.png")).unwrap();

        let rows = store.list_section(section("1-1")).unwrap();
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![a, c]);

        store.remove(a).unwrap();
        let rows = store.list_section(section("1-1")).unwrap();
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![c]);
        assert!(store.list_section(section("3-2")).unwrap().is_empty());
    }

    #[test]
    fn row_without_payload_can_still_be_removed() {
        let mut store = InMemoryStore::new();
        let orphan = store.add(pdf("1-1", "orphan.pdf")).unwrap();
        store.add(pdf("1-1", "whole.pdf")).unwrap();
        store.backend.delete_blob(orphan).unwrap();

        assert_eq!(store.list_all().unwrap().len(), 1);
        assert_eq!(store.meta(orphan).unwrap().name, "orphan.pdf");
        assert!(store.get(orphan).is_err());

        store.remove(orphan).unwrap();
        let rows = store.list_section(section("1-1")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "whole.pdf");
    }

    #[test]
    fn get_returns_payload() {
        let mut store = InMemoryStore::new();
        let id = store.add(image("2-1", "pic.png")).unwrap();
        let record = store.get(id).unwrap();
        assert_eq!(record.name, "pic.png");
        assert_eq!(record.blob, vec![1, 2, 3]);
        assert!(matches!(
            store.get(RecordId(42)).unwrap_err(),
            FolioError::NotFound(_)
        ));
    }
}
