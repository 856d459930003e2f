//! # API Facade
//!
//! [`Portfolio`] is the single entry point of folio. It owns everything a
//! running page holds: the store, the display handle table, the current
//! [`SectionState`], the document viewer, the carousel with its frame queue,
//! and the [`Surface`] it renders into.
//!
//! ## Role and Responsibilities
//!
//! - **Dispatches** user actions ([`UiAction`], keys, file inputs) to the
//!   viewer, the carousel or the command layer
//! - **Reloads** after every mutation: one full [`load_data`](Portfolio::load_data)
//!   per upload batch or successful delete
//! - **Alerts**: warning and error messages of commands are forwarded to
//!   [`Surface::alert`]; the result is still returned for callers that print
//!
//! Store logic lives in `commands/*.rs`, rendering in `loader.rs`. The
//! facade only sequences them.
//!
//! ## Reloads
//!
//! Every method that reloads takes `&mut self`, so two loads can never
//! interleave: a reload triggered while another is in flight cannot exist.
//!
//! ## Generic Over Store and Surface
//!
//! - Production: `Portfolio<FileStore, HeadlessPage>`
//! - Testing: `Portfolio<InMemoryStore, HeadlessPage>`

use crate::carousel::{Carousel, CarouselSettings, FrameQueue};
use crate::commands::{self, upload::IncomingFile, CmdResult};
use crate::error::{FolioError, Result};
use crate::events::{upload_target, ControlAttrs, InputChange, Key, Modal, UiAction};
use crate::handles::{HandleTable, ResolvedHandle};
use crate::loader::{self, DisplaySource, LoadReport, SectionState};
use crate::model::{MediaKind, RecordId, RecordMeta, SectionKey};
use crate::store::BlobStore;
use crate::surface::Surface;
use crate::viewer::DocumentViewer;
use tracing::{debug, warn};

pub struct Portfolio<S: BlobStore, U: Surface> {
    store: S,
    surface: U,
    handles: HandleTable,
    state: SectionState,
    viewer: DocumentViewer,
    carousel: Carousel,
    frames: FrameQueue,
}

impl<S: BlobStore, U: Surface> Portfolio<S, U> {
    pub fn new(store: S, surface: U, settings: CarouselSettings) -> Self {
        Self {
            store,
            surface,
            handles: HandleTable::new(),
            state: SectionState::new(),
            viewer: DocumentViewer::new(),
            carousel: Carousel::new(settings),
            frames: FrameQueue::new(),
        }
    }

    pub fn load_data(&mut self) -> Result<LoadReport> {
        loader::load_data(&self.store, &self.handles, &mut self.state, &mut self.surface)
    }

    fn reload(&mut self) {
        // load_data logs its own failure; the rendered state stays as it was.
        if self.load_data().is_err() {
            warn!("reload after mutation failed");
        }
    }

    fn forward_alerts(&mut self, result: &CmdResult) {
        for message in result.alerts() {
            self.surface.alert(&message.content);
        }
    }

    pub fn upload(
        &mut self,
        section: SectionKey,
        kind: MediaKind,
        files: Vec<IncomingFile>,
    ) -> Result<CmdResult> {
        let result = commands::upload::run(&mut self.store, section, kind, files)?;
        self.forward_alerts(&result);
        self.reload();
        Ok(result)
    }

    pub fn handle_input_change(&mut self, change: InputChange) -> Result<CmdResult> {
        let (section, kind) = upload_target(&change.attrs)?;
        self.upload(section, kind, change.files)
    }

    /// Ask for confirmation, then delete and reload. Returns `Ok(None)` when
    /// the user declined. On failure the user gets a generic alert, nothing
    /// is reloaded, and the error is returned.
    pub fn delete(&mut self, kind: MediaKind, id: RecordId) -> Result<Option<CmdResult>> {
        let (question, failure) = match kind {
            MediaKind::Pdf => (
                "Are you sure you want to delete this file?",
                "Failed to delete file.",
            ),
            MediaKind::Image => (
                "Are you sure you want to delete this image?",
                "Failed to delete image.",
            ),
        };

        if !self.surface.confirm(question) {
            debug!(%id, "delete declined");
            return Ok(None);
        }

        match commands::delete::run(&mut self.store, id) {
            Ok(result) => {
                self.reload();
                Ok(Some(result))
            }
            Err(e) => {
                warn!(%id, error = %e, "delete failed");
                self.surface.alert(failure);
                Err(e)
            }
        }
    }

    pub fn list(&self, section: Option<SectionKey>) -> Result<CmdResult> {
        commands::list::run(&self.store, section)
    }

    /// The stored row of a record, payload not read.
    pub fn record(&self, id: RecordId) -> Result<RecordMeta> {
        self.store.meta(id)
    }

    pub fn open_document(&mut self, section: SectionKey, index: usize) -> Result<()> {
        let source = self
            .state
            .documents(section)
            .get(index)
            .map(|entry| entry.source.clone())
            .ok_or_else(|| {
                FolioError::Action(format!("no document {} in section {}", index, section))
            })?;
        self.viewer.open(source, &mut self.surface);
        Ok(())
    }

    pub fn close_document(&mut self) {
        self.viewer.close(&mut self.surface);
    }

    /// Open the carousel on a section's images, falling back to the static
    /// images of its grid. Returns false when there is nothing to show.
    pub fn open_carousel(&mut self, section: SectionKey, index: usize) -> bool {
        let mut images: Vec<DisplaySource> = self
            .state
            .images(section)
            .iter()
            .map(|entry| entry.source.clone())
            .collect();
        if images.is_empty() {
            images = self
                .surface
                .static_image_sources(section)
                .into_iter()
                .map(DisplaySource::Static)
                .collect();
        }
        self.carousel
            .open(images, index, &mut self.surface, &mut self.frames)
    }

    pub fn view_all(&mut self, section: SectionKey) -> bool {
        self.open_carousel(section, 0)
    }

    pub fn close_carousel(&mut self) {
        self.carousel.close(&mut self.surface);
    }

    pub fn carousel_next(&mut self) {
        self.carousel.next(&mut self.surface);
    }

    pub fn carousel_prev(&mut self) {
        self.carousel.prev(&mut self.surface);
    }

    pub fn set_hover(&mut self, hovering: bool) {
        self.carousel.set_hovering(hovering);
    }

    /// Run one animation frame. Returns how many frame callbacks ran.
    pub fn tick(&mut self) -> usize {
        let pending = self.frames.take_pending();
        let count = pending.len();
        for token in pending {
            self.carousel
                .on_frame(token, &mut self.surface, &mut self.frames);
        }
        count
    }

    pub fn dispatch(&mut self, action: UiAction) -> Result<()> {
        debug!(?action, "dispatch");
        match action {
            UiAction::OpenDocument { section, index } => self.open_document(section, index)?,
            UiAction::OpenCarousel { section, index } => {
                self.open_carousel(section, index);
            }
            UiAction::ViewAll { section } => {
                self.view_all(section);
            }
            UiAction::Delete { kind, id, .. } => {
                self.delete(kind, id)?;
            }
            UiAction::CloseDocument | UiAction::Backdrop(Modal::Document) => {
                self.close_document()
            }
            UiAction::CloseCarousel | UiAction::Backdrop(Modal::Carousel) => {
                self.close_carousel()
            }
            UiAction::CarouselNext => self.carousel_next(),
            UiAction::CarouselPrev => self.carousel_prev(),
        }
        Ok(())
    }

    /// Delegated activation of a rendered control.
    pub fn handle_control(&mut self, attrs: &ControlAttrs) -> Result<()> {
        let action = UiAction::from_attrs(attrs)?;
        self.dispatch(action)
    }

    pub fn handle_key(&mut self, key: Key) {
        match key {
            Key::Escape => {
                if self.viewer.is_open() {
                    self.close_document();
                }
                if self.carousel.is_open() {
                    self.close_carousel();
                }
            }
            Key::ArrowRight if self.carousel.is_open() => self.carousel_next(),
            Key::ArrowLeft if self.carousel.is_open() => self.carousel_prev(),
            _ => {}
        }
    }

    pub fn resolve(&self, url: &str) -> Option<ResolvedHandle> {
        self.handles.resolve(url)
    }

    pub fn state(&self) -> &SectionState {
        &self.state
    }

    pub fn handles(&self) -> &HandleTable {
        &self.handles
    }

    pub fn viewer(&self) -> &DocumentViewer {
        &self.viewer
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn surface(&self) -> &U {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut U {
        &mut self.surface
    }
}
