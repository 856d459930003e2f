//! Upload a batch of files into one section channel.
//!
//! Files are handled one at a time, in order. A file whose declared media
//! type does not fit the channel is skipped: the document channel says so,
//! the image channel stays silent. A failed write is reported by name and
//! the batch moves on. Reloading afterwards is the caller's job.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{FolioError, Result};
use crate::model::{MediaKind, NewRecord, RecordMeta, SectionKey};
use crate::store::BlobStore;
use tracing::{debug, info, warn};

/// A file as delivered by a file input: name, declared type and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl IncomingFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }
}

/// Whether a file's declared media type fits the channel.
pub fn check_channel(kind: MediaKind, file: &IncomingFile) -> Result<()> {
    if kind.accepts(&file.media_type) {
        return Ok(());
    }
    let reason = match kind {
        MediaKind::Pdf => format!("File {} is not a PDF. Skipping.", file.name),
        MediaKind::Image => format!("File {} is not an image. Skipping.", file.name),
    };
    Err(FolioError::Validation(reason))
}

pub fn run<S: BlobStore>(
    store: &mut S,
    section: SectionKey,
    kind: MediaKind,
    files: Vec<IncomingFile>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    for file in files {
        if let Err(rejection) = check_channel(kind, &file) {
            match kind {
                MediaKind::Pdf => {
                    warn!(name = %file.name, media_type = %file.media_type, "rejected non-pdf upload");
                    result.add_message(CmdMessage::warning(rejection.to_string()));
                }
                MediaKind::Image => {
                    debug!(name = %file.name, media_type = %file.media_type, "skipped non-image upload");
                }
            }
            continue;
        }

        let size = file.bytes.len() as u64;
        let record = NewRecord::new(section, kind, file.name, file.media_type, file.bytes);
        let (name, media_type, created_at) = (
            record.name.clone(),
            record.media_type.clone(),
            record.created_at,
        );

        match store.add(record) {
            Ok(id) => {
                info!(%id, %section, %kind, name = %name, "file uploaded");
                result.add_message(CmdMessage::success(format!("Uploaded {} ({})", name, id)));
                result.affected.push(RecordMeta {
                    id,
                    section,
                    kind,
                    name,
                    media_type,
                    size,
                    created_at,
                });
            }
            Err(err) => {
                let message = match err {
                    FolioError::WriteFailure { .. } => err.to_string(),
                    other => format!("Failed to save {}: {}", name, other),
                };
                warn!(%section, %kind, "{}", message);
                result.add_message(CmdMessage::error(message));
            }
        }
    }

    Ok(result)
}
