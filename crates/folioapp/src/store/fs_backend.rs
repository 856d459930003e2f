use super::backend::StorageBackend;
use super::schema::Manifest;
use crate::error::{FolioError, Result};
use crate::model::RecordId;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

const MANIFEST_FILE: &str = "folio.json";
const BLOB_DIR: &str = "blobs";

pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    pub fn blob_path(&self, id: RecordId) -> PathBuf {
        self.root.join(BLOB_DIR).join(format!("file-{}.bin", id))
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(FolioError::Io)?;
        }
        Ok(())
    }

    /// Write via a uniquely named tmp file in the same directory, then rename.
    fn write_atomic(&self, dir: &Path, target: &Path, bytes: &[u8]) -> Result<()> {
        self.ensure_dir(dir)?;
        let tmp_path = dir.join(format!(".folio-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_path, bytes).map_err(FolioError::Io)?;
        if let Err(e) = fs::rename(&tmp_path, target) {
            let _ = fs::remove_file(&tmp_path);
            return Err(FolioError::Io(e));
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn load_manifest(&self) -> Result<Option<Manifest>> {
        let path = self.manifest_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(FolioError::Io)?;
        let manifest: Manifest =
            serde_json::from_str(&content).map_err(FolioError::Serialization)?;
        Ok(Some(manifest))
    }

    fn save_manifest(&self, manifest: &Manifest) -> Result<()> {
        let content =
            serde_json::to_string_pretty(manifest).map_err(FolioError::Serialization)?;
        self.write_atomic(&self.root, &self.manifest_path(), content.as_bytes())?;
        debug!(path = %self.manifest_path().display(), "manifest saved");
        Ok(())
    }

    fn read_blob(&self, id: RecordId) -> Result<Option<Vec<u8>>> {
        let path = self.blob_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path).map_err(FolioError::Io)?;
        Ok(Some(bytes))
    }

    fn write_blob(&self, id: RecordId, bytes: &[u8]) -> Result<()> {
        let dir = self.root.join(BLOB_DIR);
        self.write_atomic(&dir, &self.blob_path(id), bytes)?;
        debug!(%id, size = bytes.len(), "blob written");
        Ok(())
    }

    fn delete_blob(&self, id: RecordId) -> Result<()> {
        let path = self.blob_path(id);
        if path.exists() {
            fs::remove_file(path).map_err(FolioError::Io)?;
        }
        Ok(())
    }

    fn is_available(&self) -> bool {
        !self.root.exists() || self.root.is_dir()
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}
