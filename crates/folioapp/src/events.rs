//! # Event Delegation
//!
//! Rendered controls carry their intent as data attributes instead of bound
//! callbacks. A container-level listener hands the attributes of whatever
//! was activated to [`UiAction::from_attrs`], and the facade dispatches the
//! typed action. Nothing is registered globally; a control is fully
//! described by its attributes.
//!
//! ## Attribute Vocabulary
//!
//! | `data-action`    | other attributes                          |
//! |------------------|-------------------------------------------|
//! | `open-document`  | `data-section`, `data-index`              |
//! | `open-carousel`  | `data-section`, `data-index`              |
//! | `view-all`       | `data-section`                            |
//! | `delete`         | `data-section`, `data-type`, `data-id`    |
//! | `close-document` |                                           |
//! | `close-carousel` |                                           |
//! | `carousel-next`  |                                           |
//! | `carousel-prev`  |                                           |
//! | `backdrop`       | `data-modal` (`document` or `carousel`)   |
//!
//! File inputs use `data-section` and, for the image channel,
//! `data-type="image"`; see [`upload_target`].

use crate::commands::upload::IncomingFile;
use crate::error::{FolioError, Result};
use crate::model::{MediaKind, RecordId, SectionKey};
use std::collections::BTreeMap;

pub const ATTR_ACTION: &str = "action";
pub const ATTR_SECTION: &str = "section";
pub const ATTR_INDEX: &str = "index";
pub const ATTR_ID: &str = "id";
pub const ATTR_TYPE: &str = "type";
pub const ATTR_MODAL: &str = "modal";

/// The `data-*` attributes of a control, keyed without the `data-` prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlAttrs(BTreeMap<String, String>);

impl ControlAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| FolioError::Action(format!("missing data-{}", key)))
    }

    fn section(&self) -> Result<SectionKey> {
        self.require(ATTR_SECTION)?.parse()
    }

    fn index(&self) -> Result<usize> {
        let raw = self.require(ATTR_INDEX)?;
        raw.parse()
            .map_err(|_| FolioError::Action(format!("bad data-index '{}'", raw)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Document,
    Carousel,
}

impl Modal {
    fn as_str(&self) -> &'static str {
        match self {
            Modal::Document => "document",
            Modal::Carousel => "carousel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    OpenDocument { section: SectionKey, index: usize },
    OpenCarousel { section: SectionKey, index: usize },
    ViewAll { section: SectionKey },
    Delete {
        section: SectionKey,
        kind: MediaKind,
        id: RecordId,
    },
    CloseDocument,
    CloseCarousel,
    CarouselNext,
    CarouselPrev,
    Backdrop(Modal),
}

impl UiAction {
    pub fn from_attrs(attrs: &ControlAttrs) -> Result<Self> {
        let action = attrs.require(ATTR_ACTION)?;
        let parsed = match action {
            "open-document" => UiAction::OpenDocument {
                section: attrs.section()?,
                index: attrs.index()?,
            },
            "open-carousel" => UiAction::OpenCarousel {
                section: attrs.section()?,
                index: attrs.index()?,
            },
            "view-all" => UiAction::ViewAll {
                section: attrs.section()?,
            },
            "delete" => UiAction::Delete {
                section: attrs.section()?,
                kind: attrs.require(ATTR_TYPE)?.parse()?,
                id: attrs.require(ATTR_ID)?.parse()?,
            },
            "close-document" => UiAction::CloseDocument,
            "close-carousel" => UiAction::CloseCarousel,
            "carousel-next" => UiAction::CarouselNext,
            "carousel-prev" => UiAction::CarouselPrev,
            "backdrop" => match attrs.require(ATTR_MODAL)? {
                "document" => UiAction::Backdrop(Modal::Document),
                "carousel" => UiAction::Backdrop(Modal::Carousel),
                other => return Err(FolioError::Action(format!("unknown modal '{}'", other))),
            },
            other => return Err(FolioError::Action(format!("unknown action '{}'", other))),
        };
        Ok(parsed)
    }

    pub fn to_attrs(&self) -> ControlAttrs {
        let attrs = ControlAttrs::new();
        match self {
            UiAction::OpenDocument { section, index } => attrs
                .with(ATTR_ACTION, "open-document")
                .with(ATTR_SECTION, section)
                .with(ATTR_INDEX, index),
            UiAction::OpenCarousel { section, index } => attrs
                .with(ATTR_ACTION, "open-carousel")
                .with(ATTR_SECTION, section)
                .with(ATTR_INDEX, index),
            UiAction::ViewAll { section } => {
                attrs.with(ATTR_ACTION, "view-all").with(ATTR_SECTION, section)
            }
            UiAction::Delete { section, kind, id } => attrs
                .with(ATTR_ACTION, "delete")
                .with(ATTR_SECTION, section)
                .with(ATTR_TYPE, kind)
                .with(ATTR_ID, id),
            UiAction::CloseDocument => attrs.with(ATTR_ACTION, "close-document"),
            UiAction::CloseCarousel => attrs.with(ATTR_ACTION, "close-carousel"),
            UiAction::CarouselNext => attrs.with(ATTR_ACTION, "carousel-next"),
            UiAction::CarouselPrev => attrs.with(ATTR_ACTION, "carousel-prev"),
            UiAction::Backdrop(modal) => attrs
                .with(ATTR_ACTION, "backdrop")
                .with(ATTR_MODAL, modal.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Map a DOM-style key name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            _ => Key::Other,
        }
    }
}

/// A file input changed: its attributes and the files it now holds.
#[derive(Debug, Clone, Default)]
pub struct InputChange {
    pub attrs: ControlAttrs,
    pub files: Vec<IncomingFile>,
}

/// Section and channel declared by a file input.
pub fn upload_target(attrs: &ControlAttrs) -> Result<(SectionKey, MediaKind)> {
    let section = attrs.section()?;
    let kind = match attrs.get(ATTR_TYPE) {
        Some("image") => MediaKind::Image,
        _ => MediaKind::Pdf,
    };
    Ok((section, kind))
}
