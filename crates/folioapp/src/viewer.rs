//! Document viewer modal: Closed or Open on one source.
//!
//! While open the viewer holds a clone of the entry's source, so the display
//! handle it shows stays alive across reloads until the viewer closes.

use crate::loader::DisplaySource;
use crate::surface::Surface;
use tracing::debug;

#[derive(Debug, Default)]
pub enum ViewerState {
    #[default]
    Closed,
    Open(DisplaySource),
}

#[derive(Debug, Default)]
pub struct DocumentViewer {
    state: ViewerState,
}

impl DocumentViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ViewerState::Open(_))
    }

    /// Url bound to the frame, if open.
    pub fn current_url(&self) -> Option<&str> {
        match &self.state {
            ViewerState::Open(source) => Some(source.url()),
            ViewerState::Closed => None,
        }
    }

    pub fn open<U: Surface>(&mut self, source: DisplaySource, surface: &mut U) {
        let url = source.url().to_string();
        surface.show_document(&url, &url);
        surface.set_scroll_locked(true);
        self.state = ViewerState::Open(source);
        debug!(%url, "document viewer opened");
    }

    pub fn close<U: Surface>(&mut self, surface: &mut U) {
        surface.hide_document();
        surface.set_scroll_locked(false);
        if let ViewerState::Open(source) = std::mem::take(&mut self.state) {
            debug!(url = %source.url(), "document viewer closed");
        }
    }
}
