//! # Domain Model: Sections, Records and Media Kinds
//!
//! A portfolio is split into a fixed set of sections. Every section owns two
//! independent ordered collections: documents (PDFs) and images.
//!
//! ## Section Keys
//!
//! Keys are a closed set: `1-1 1-2 1-3 1-4 1-5 2-1 2-2 3-1 3-2`. A
//! [`SectionKey`] can only be obtained from that set, so a persisted record can
//! never point at a section the page does not know about. Parsing any other
//! string fails with [`FolioError::UnknownSection`].
//!
//! ## Records
//!
//! - [`NewRecord`]: what an upload hands to the store (no id yet).
//! - [`RecordMeta`]: the persisted row, without the payload.
//! - [`FileRecord`]: row plus payload, as returned by a full scan.
//!
//! Ids are assigned by the store, strictly increasing and never reused.
//! There is no update-in-place: a change is always delete + re-upload.

use crate::error::{FolioError, Result};
use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub static SECTION_KEYS: [&str; 9] = ["1-1", "1-2", "1-3", "1-4", "1-5", "2-1", "2-2", "3-1", "3-2"];

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
pub const IMAGE_MEDIA_PREFIX: &str = "image/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub struct SectionKey(&'static str);

impl SectionKey {
    /// All section keys, in page order.
    pub fn all() -> impl Iterator<Item = SectionKey> {
        SECTION_KEYS.iter().map(|key| SectionKey(*key))
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl FromStr for SectionKey {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        SECTION_KEYS
            .iter()
            .find(|key| **key == s.trim())
            .map(|key| SectionKey(*key))
            .ok_or_else(|| FolioError::UnknownSection(s.to_string()))
    }
}

// Keys live in the static table; the input is only read, never borrowed.
impl<'de> Deserialize<'de> for SectionKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

impl From<SectionKey> for String {
    fn from(key: SectionKey) -> Self {
        key.0.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u64>()
            .map(RecordId)
            .map_err(|_| FolioError::Action(format!("'{}' is not a record id", s)))
    }
}

/// The two collections of a section. Also names the upload channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Pdf,
    Image,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Pdf => "pdf",
            MediaKind::Image => "image",
        }
    }

    /// Whether a declared media type is acceptable for this channel.
    pub fn accepts(&self, media_type: &str) -> bool {
        match self {
            MediaKind::Pdf => media_type == PDF_MEDIA_TYPE,
            MediaKind::Image => media_type.starts_with(IMAGE_MEDIA_PREFIX),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pdf" => Ok(MediaKind::Pdf),
            "image" => Ok(MediaKind::Image),
            other => Err(FolioError::Action(format!("unknown media kind '{}'", other))),
        }
    }
}

/// A record as handed to the store by an upload.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub section: SectionKey,
    pub kind: MediaKind,
    pub name: String,
    pub media_type: String,
    pub blob: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

impl NewRecord {
    pub fn new(
        section: SectionKey,
        kind: MediaKind,
        name: impl Into<String>,
        media_type: impl Into<String>,
        blob: Vec<u8>,
    ) -> Self {
        Self {
            section,
            kind,
            name: name.into(),
            media_type: media_type.into(),
            blob,
            created_at: Utc::now(),
        }
    }
}

/// The persisted row. The payload lives next to it, keyed by the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    pub id: RecordId,
    pub section: SectionKey,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub name: String,
    pub media_type: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct FileRecord {
    pub id: RecordId,
    pub section: SectionKey,
    pub kind: MediaKind,
    pub name: String,
    pub media_type: String,
    pub blob: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

impl FileRecord {
    pub fn from_parts(meta: RecordMeta, blob: Vec<u8>) -> Self {
        Self {
            id: meta.id,
            section: meta.section,
            kind: meta.kind,
            name: meta.name,
            media_type: meta.media_type,
            blob,
            created_at: meta.created_at,
        }
    }
}
