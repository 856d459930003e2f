//! Persisted schema and its upgrade routine.
//!
//! The manifest is the whole "database": one table of rows keyed by an
//! auto-incrementing id, plus a non-unique secondary index on `section`.
//! Payloads are not part of the manifest.

use crate::model::{RecordId, RecordMeta, SectionKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCHEMA_VERSION: u32 = 1;

/// First id handed out by a fresh table.
const FIRST_ID: u64 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub schema_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<FileTable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTable {
    pub next_id: u64,
    /// Rows in insertion order.
    pub rows: Vec<RecordMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_index: Option<BTreeMap<SectionKey, Vec<RecordId>>>,
}

impl Default for FileTable {
    fn default() -> Self {
        Self {
            next_id: FIRST_ID,
            rows: Vec::new(),
            section_index: None,
        }
    }
}

impl FileTable {
    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    pub fn index_insert(&mut self, section: SectionKey, id: RecordId) {
        self.section_index
            .get_or_insert_with(BTreeMap::new)
            .entry(section)
            .or_default()
            .push(id);
    }

    pub fn index_remove(&mut self, section: SectionKey, id: RecordId) {
        if let Some(index) = self.section_index.as_mut() {
            if let Some(ids) = index.get_mut(&section) {
                ids.retain(|existing| *existing != id);
                if ids.is_empty() {
                    index.remove(&section);
                }
            }
        }
    }

    fn build_section_index(&self) -> BTreeMap<SectionKey, Vec<RecordId>> {
        let mut index: BTreeMap<SectionKey, Vec<RecordId>> = BTreeMap::new();
        for row in &self.rows {
            index.entry(row.section).or_default().push(row.id);
        }
        index
    }
}

/// Brings `manifest` from `from_version` up to [`SCHEMA_VERSION`].
///
/// Creation steps only run for what is absent, so running the routine on an
/// already-populated manifest leaves its rows untouched.
pub fn upgrade(manifest: &mut Manifest, from_version: u32) {
    if from_version < 1 {
        let table = manifest.files.get_or_insert_with(FileTable::default);
        if table.section_index.is_none() {
            table.section_index = Some(table.build_section_index());
        }
    }
    manifest.schema_version = SCHEMA_VERSION;
}
