//! # Surface: the page the core renders into
//!
//! Everything visual is an external collaborator. The core only needs the
//! narrow interface in [`Surface`]: optional containers addressed by a naming
//! convention, the two modal shells, a scrolling lock, and the alert/confirm
//! pair for user-facing messages.
//!
//! ## Naming Convention
//!
//! For a section key `K`:
//! - documents list: `pdfList-K`
//! - images grid: `imgList-K`
//! - view-all control: `viewBtn-K`
//!
//! Every one of them is optional. Pages that leave a section out simply do
//! not expose its containers and rendering skips it.
//!
//! ## Static Content
//!
//! A grid may already hold hard-coded images that never went through the
//! upload pipeline. Rendering replaces only the dynamic items it produced
//! itself; static items stay, and their sources are what the carousel falls
//! back to when a section has no stored images.
//!
//! [`HeadlessPage`] is a complete in-memory implementation, used by the CLI
//! and by tests.

use crate::events::ControlAttrs;
use crate::model::SectionKey;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContainerId {
    Documents(SectionKey),
    Images(SectionKey),
}

impl ContainerId {
    pub fn section(&self) -> SectionKey {
        match self {
            ContainerId::Documents(key) | ContainerId::Images(key) => *key,
        }
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerId::Documents(key) => write!(f, "pdfList-{}", key),
            ContainerId::Images(key) => write!(f, "imgList-{}", key),
        }
    }
}

pub fn view_all_id(section: SectionKey) -> String {
    format!("viewBtn-{}", section)
}

/// One list item or grid cell produced by rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem {
    pub label: String,
    pub url: String,
    pub activate: ControlAttrs,
    /// Absent for static entries, which cannot be deleted.
    pub delete: Option<ControlAttrs>,
}

/// One positioned item of the carousel ring.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselItemView {
    pub index: usize,
    pub url: String,
    pub transform: String,
}

pub trait Surface {
    fn has_container(&self, id: ContainerId) -> bool;

    /// Replace the dynamic items of a container. Static items are kept.
    fn replace_items(&mut self, id: ContainerId, items: Vec<RenderedItem>);

    /// Sources of the static images already present in a section's grid.
    fn static_image_sources(&self, section: SectionKey) -> Vec<String>;

    fn reveal_view_all(&mut self, section: SectionKey);

    fn show_document(&mut self, frame_src: &str, download_href: &str);

    /// Hide the document modal and clear its frame source.
    fn hide_document(&mut self);

    fn show_carousel(&mut self, items: Vec<CarouselItemView>);

    fn hide_carousel(&mut self);

    fn set_ring_transform(&mut self, transform: &str);

    fn set_scroll_locked(&mut self, locked: bool);

    fn alert(&mut self, message: &str);

    fn confirm(&mut self, message: &str) -> bool;
}

#[derive(Debug, Clone, Default)]
pub struct ContainerState {
    pub static_sources: Vec<String>,
    pub items: Vec<RenderedItem>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentModal {
    pub visible: bool,
    pub frame_src: String,
    pub download_href: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarouselModal {
    pub visible: bool,
    pub items: Vec<CarouselItemView>,
    pub ring_transform: String,
}

/// In-memory page model.
#[derive(Debug, Clone)]
pub struct HeadlessPage {
    pub containers: BTreeMap<ContainerId, ContainerState>,
    pub view_all_controls: BTreeSet<SectionKey>,
    pub view_all_visible: BTreeSet<SectionKey>,
    pub document: DocumentModal,
    pub carousel: CarouselModal,
    pub scroll_locked: bool,
    pub alerts: Vec<String>,
    pub confirmations: Vec<String>,
    pub confirm_answer: bool,
}

impl Default for HeadlessPage {
    fn default() -> Self {
        Self {
            containers: BTreeMap::new(),
            view_all_controls: BTreeSet::new(),
            view_all_visible: BTreeSet::new(),
            document: DocumentModal::default(),
            carousel: CarouselModal::default(),
            scroll_locked: false,
            alerts: Vec::new(),
            confirmations: Vec::new(),
            confirm_answer: true,
        }
    }
}

impl HeadlessPage {
    /// A page without any section containers.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A page exposing every container and view-all control of every section.
    pub fn with_all_sections() -> Self {
        let mut page = Self::default();
        for key in SectionKey::all() {
            page = page.with_section(key);
        }
        page
    }

    pub fn with_section(mut self, section: SectionKey) -> Self {
        self.containers
            .entry(ContainerId::Documents(section))
            .or_default();
        self.containers.entry(ContainerId::Images(section)).or_default();
        self.view_all_controls.insert(section);
        self
    }

    pub fn with_container(mut self, id: ContainerId) -> Self {
        self.containers.entry(id).or_default();
        self
    }

    /// Seed hard-coded images into a section's grid, creating it if needed.
    pub fn with_static_images<I, S>(mut self, section: SectionKey, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let grid = self.containers.entry(ContainerId::Images(section)).or_default();
        grid.static_sources.extend(sources.into_iter().map(Into::into));
        self
    }

    pub fn with_confirm_answer(mut self, answer: bool) -> Self {
        self.confirm_answer = answer;
        self
    }

    pub fn items(&self, id: ContainerId) -> &[RenderedItem] {
        self.containers
            .get(&id)
            .map(|c| c.items.as_slice())
            .unwrap_or(&[])
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }
}

impl Surface for HeadlessPage {
    fn has_container(&self, id: ContainerId) -> bool {
        self.containers.contains_key(&id)
    }

    fn replace_items(&mut self, id: ContainerId, items: Vec<RenderedItem>) {
        if let Some(container) = self.containers.get_mut(&id) {
            container.items = items;
        }
    }

    fn static_image_sources(&self, section: SectionKey) -> Vec<String> {
        self.containers
            .get(&ContainerId::Images(section))
            .map(|c| c.static_sources.clone())
            .unwrap_or_default()
    }

    fn reveal_view_all(&mut self, section: SectionKey) {
        if self.view_all_controls.contains(&section) {
            self.view_all_visible.insert(section);
        }
    }

    fn show_document(&mut self, frame_src: &str, download_href: &str) {
        self.document = DocumentModal {
            visible: true,
            frame_src: frame_src.to_string(),
            download_href: download_href.to_string(),
        };
    }

    fn hide_document(&mut self) {
        self.document.visible = false;
        self.document.frame_src.clear();
    }

    fn show_carousel(&mut self, items: Vec<CarouselItemView>) {
        self.carousel.visible = true;
        self.carousel.items = items;
    }

    fn hide_carousel(&mut self) {
        self.carousel.visible = false;
    }

    fn set_ring_transform(&mut self, transform: &str) {
        self.carousel.ring_transform = transform.to_string();
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.confirmations.push(message.to_string());
        self.confirm_answer
    }
}
