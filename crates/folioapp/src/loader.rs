//! # Data Loader and Renderer
//!
//! Folio uses a full-refresh model. After any mutation the whole view state
//! is rebuilt from the store and every section is re-rendered; nothing is
//! patched in place. Record counts are portfolio-sized, so simplicity wins.
//!
//! ## Load Cycle
//!
//! 1. Open the store and fetch every record. On failure nothing below runs:
//!    the previous state and everything already rendered stay as they were.
//! 2. Build a fresh [`SectionState`]: an empty collection per section key as
//!    baseline, then records partitioned by type, each with a fresh display
//!    handle.
//! 3. Render the new state.
//! 4. Swap it in. Dropping the old state releases the handles of the previous
//!    load, after the render above stopped referencing them.
//!
//! ## Rendering
//!
//! Per section and collection: skip silently when the container is absent,
//! otherwise replace its dynamic items. Every item gets an activation
//! control and, when the entry has an id, a delete control. Image sections
//! reveal their view-all control when they have anything to show.

use crate::error::Result;
use crate::events::UiAction;
use crate::handles::{DisplayHandle, HandleTable};
use crate::model::{FileRecord, MediaKind, RecordId, SectionKey};
use crate::store::BlobStore;
use crate::surface::{ContainerId, RenderedItem, Surface};
use std::collections::BTreeMap;
use tracing::{debug, error, info};

/// Where an entry's url comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplaySource {
    Handle(DisplayHandle),
    Static(String),
}

impl DisplaySource {
    pub fn url(&self) -> &str {
        match self {
            DisplaySource::Handle(handle) => handle.url(),
            DisplaySource::Static(src) => src,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayEntry {
    /// None for static entries, which are not deletable.
    pub id: Option<RecordId>,
    pub name: String,
    pub source: DisplaySource,
    pub is_default: bool,
}

impl DisplayEntry {
    pub fn from_record(record: FileRecord, handles: &HandleTable) -> Self {
        let handle = handles.issue(record.blob, &record.media_type);
        Self {
            id: Some(record.id),
            name: record.name,
            source: DisplaySource::Handle(handle),
            is_default: false,
        }
    }

    pub fn from_static(src: impl Into<String>) -> Self {
        let src = src.into();
        let name = src.rsplit('/').next().unwrap_or_default().to_string();
        Self {
            id: None,
            name,
            source: DisplaySource::Static(src),
            is_default: true,
        }
    }

    pub fn url(&self) -> &str {
        self.source.url()
    }
}

/// Documents and images of every section, rebuilt wholesale on each load.
#[derive(Debug, Clone)]
pub struct SectionState {
    documents: BTreeMap<SectionKey, Vec<DisplayEntry>>,
    images: BTreeMap<SectionKey, Vec<DisplayEntry>>,
}

impl Default for SectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionState {
    /// Empty collections for every section key.
    pub fn new() -> Self {
        Self {
            documents: SectionKey::all().map(|k| (k, Vec::new())).collect(),
            images: SectionKey::all().map(|k| (k, Vec::new())).collect(),
        }
    }

    /// Partition records by type, issuing one handle per record.
    pub fn from_records(records: Vec<FileRecord>, handles: &HandleTable) -> Self {
        let mut state = Self::new();
        for record in records {
            let section = record.section;
            let kind = record.kind;
            let entry = DisplayEntry::from_record(record, handles);
            state.collection_mut(kind).entry(section).or_default().push(entry);
        }
        state
    }

    fn collection_mut(&mut self, kind: MediaKind) -> &mut BTreeMap<SectionKey, Vec<DisplayEntry>> {
        match kind {
            MediaKind::Pdf => &mut self.documents,
            MediaKind::Image => &mut self.images,
        }
    }

    pub fn entries(&self, section: SectionKey, kind: MediaKind) -> &[DisplayEntry] {
        let collection = match kind {
            MediaKind::Pdf => &self.documents,
            MediaKind::Image => &self.images,
        };
        collection.get(&section).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn documents(&self, section: SectionKey) -> &[DisplayEntry] {
        self.entries(section, MediaKind::Pdf)
    }

    pub fn images(&self, section: SectionKey) -> &[DisplayEntry] {
        self.entries(section, MediaKind::Image)
    }

    pub fn count(&self, kind: MediaKind) -> usize {
        SectionKey::all().map(|k| self.entries(k, kind).len()).sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub documents: usize,
    pub images: usize,
    pub handles_live: usize,
}

/// Run one load cycle. `state` is only replaced when the fetch succeeded.
pub fn load_data<S: BlobStore, U: Surface>(
    store: &S,
    handles: &HandleTable,
    state: &mut SectionState,
    surface: &mut U,
) -> Result<LoadReport> {
    let records = store.open().and_then(|_| store.list_all()).map_err(|e| {
        error!(location = %store.location(), error = %e, "failed to load data from store");
        e
    })?;

    let fresh = SectionState::from_records(records, handles);
    render_all(&fresh, surface);

    let previous = std::mem::replace(state, fresh);
    drop(previous);

    let report = LoadReport {
        documents: state.count(MediaKind::Pdf),
        images: state.count(MediaKind::Image),
        handles_live: handles.live_count(),
    };
    info!(
        documents = report.documents,
        images = report.images,
        handles = report.handles_live,
        "data loaded"
    );
    Ok(report)
}

pub fn render_all<U: Surface>(state: &SectionState, surface: &mut U) {
    for section in SectionKey::all() {
        render_documents(state, section, surface);
        render_images(state, section, surface);
    }
}

pub fn render_documents<U: Surface>(state: &SectionState, section: SectionKey, surface: &mut U) {
    let container = ContainerId::Documents(section);
    if !surface.has_container(container) {
        return;
    }

    let items = state
        .documents(section)
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            render_item(
                entry,
                UiAction::OpenDocument { section, index },
                section,
                MediaKind::Pdf,
            )
        })
        .collect();
    surface.replace_items(container, items);
}

pub fn render_images<U: Surface>(state: &SectionState, section: SectionKey, surface: &mut U) {
    let container = ContainerId::Images(section);
    if !surface.has_container(container) {
        return;
    }

    let images = state.images(section);
    if !images.is_empty() || !surface.static_image_sources(section).is_empty() {
        surface.reveal_view_all(section);
    }

    let items: Vec<RenderedItem> = images
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            render_item(
                entry,
                UiAction::OpenCarousel { section, index },
                section,
                MediaKind::Image,
            )
        })
        .collect();
    debug!(%container, count = items.len(), "images rendered");
    surface.replace_items(container, items);
}

fn render_item(
    entry: &DisplayEntry,
    activate: UiAction,
    section: SectionKey,
    kind: MediaKind,
) -> RenderedItem {
    RenderedItem {
        label: entry.name.clone(),
        url: entry.url().to_string(),
        activate: activate.to_attrs(),
        delete: entry
            .id
            .map(|id| UiAction::Delete { section, kind, id }.to_attrs()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewRecord;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::surface::HeadlessPage;

    fn key(s: &str) -> SectionKey {
        s.parse().unwrap()
    }

    #[test]
    fn every_section_has_empty_baseline() {
        let state = SectionState::new();
        for section in SectionKey::all() {
            assert!(state.documents(section).is_empty());
            assert!(state.images(section).is_empty());
        }
    }

    #[test]
    fn records_are_partitioned_by_type_in_store_order() {
        let fixture = StoreFixture::new()
            .with_documents("1-1", 2)
            .with_images("1-1", 1)
            .with_images("2-2", 2);
        let handles = HandleTable::new();
        let mut state = SectionState::new();
        let mut page = HeadlessPage::with_all_sections();

        let report = load_data(&fixture.store, &handles, &mut state, &mut page).unwrap();

        assert_eq!(report.documents, 2);
        assert_eq!(report.images, 3);
        let names: Vec<&str> = state
            .documents(key("1-1"))
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["doc-1-1-1.pdf", "doc-1-1-2.pdf"]);
        assert_eq!(state.images(key("2-2")).len(), 2);
    }

    #[test]
    fn render_produces_one_item_per_entry_with_delete_control() {
        let fixture = StoreFixture::new().with_documents("1-2", 2);
        let handles = HandleTable::new();
        let mut state = SectionState::new();
        let mut page = HeadlessPage::with_all_sections();

        load_data(&fixture.store, &handles, &mut state, &mut page).unwrap();
        load_data(&fixture.store, &handles, &mut state, &mut page).unwrap();

        let items = page.items(ContainerId::Documents(key("1-2")));
        assert_eq!(items.len(), 2);
        let delete = items[0].delete.as_ref().unwrap();
        assert_eq!(delete.get("action"), Some("delete"));
        assert_eq!(delete.get("id"), Some("1"));
        assert_eq!(items[1].activate.get("index"), Some("1"));
    }

    #[test]
    fn static_entries_have_no_delete_control() {
        let mut state = SectionState::new();
        state
            .images
            .get_mut(&key("3-1"))
            .unwrap()
            .push(DisplayEntry::from_static("img/static/cover.jpg"));
        let mut page = HeadlessPage::with_all_sections();

        render_all(&state, &mut page);

        let items = page.items(ContainerId::Images(key("3-1")));
        assert_eq!(items.len(), 1);
        assert!(items[0].delete.is_none());
        assert_eq!(items[0].label, "cover.jpg");
    }

    #[test]
    fn missing_containers_are_skipped() {
        let fixture = StoreFixture::new().with_documents("1-1", 1).with_images("2-1", 1);
        let handles = HandleTable::new();
        let mut state = SectionState::new();
        let mut page = HeadlessPage::empty().with_container(ContainerId::Images(key("2-1")));

        load_data(&fixture.store, &handles, &mut state, &mut page).unwrap();

        assert_eq!(page.items(ContainerId::Images(key("2-1"))).len(), 1);
        assert!(!page.has_container(ContainerId::Documents(key("1-1"))));
        assert_eq!(state.documents(key("1-1")).len(), 1);
    }

    #[test]
    fn view_all_revealed_only_for_sections_with_images() {
        let fixture = StoreFixture::new().with_images("2-1", 1);
        let handles = HandleTable::new();
        let mut state = SectionState::new();
        let mut page = HeadlessPage::with_all_sections()
            .with_static_images(key("3-2"), ["static/a.jpg"]);

        load_data(&fixture.store, &handles, &mut state, &mut page).unwrap();

        assert!(page.view_all_visible.contains(&key("2-1")));
        assert!(page.view_all_visible.contains(&key("3-2")));
        assert!(!page.view_all_visible.contains(&key("1-1")));
    }

    #[test]
    fn handles_do_not_accumulate_across_reloads() {
        let fixture = StoreFixture::new().with_documents("1-1", 2).with_images("2-1", 3);
        let handles = HandleTable::new();
        let mut state = SectionState::new();
        let mut page = HeadlessPage::with_all_sections();

        for _ in 0..5 {
            let report = load_data(&fixture.store, &handles, &mut state, &mut page).unwrap();
            assert_eq!(report.handles_live, 5);
        }
        assert_eq!(handles.issued_total(), 25);
        assert_eq!(handles.released_total(), 20);
    }

    #[test]
    fn failed_load_keeps_previous_state_and_rendering() {
        let mut fixture = StoreFixture::new().with_documents("1-1", 1);
        let handles = HandleTable::new();
        let mut state = SectionState::new();
        let mut page = HeadlessPage::with_all_sections();
        load_data(&fixture.store, &handles, &mut state, &mut page).unwrap();

        fixture
            .store
            .add(NewRecord::new(
                key("1-1"),
                MediaKind::Pdf,
                "late.pdf",
                "application/pdf",
                vec![],
            ))
            .unwrap();
        fixture.store.backend().set_simulate_unavailable(true);

        assert!(load_data(&fixture.store, &handles, &mut state, &mut page).is_err());
        assert_eq!(state.documents(key("1-1")).len(), 1);
        assert_eq!(page.items(ContainerId::Documents(key("1-1"))).len(), 1);
        assert_eq!(handles.live_count(), 1);
    }
}
