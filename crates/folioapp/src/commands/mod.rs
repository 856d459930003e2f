//! # Command Layer
//!
//! Store-facing operations of folio. Each command lives in its own submodule
//! and is a plain function over a [`BlobStore`](crate::store::BlobStore).
//!
//! Commands do no rendering and never talk to the user directly. They return
//! a [`CmdResult`] carrying the affected or listed rows plus leveled
//! messages; the facade decides which messages become alerts and when to
//! reload, and the CLI decides how to print them.
//!
//! - [`upload`]: validate and persist a batch of incoming files
//! - [`delete`]: remove one record by id
//! - [`list`]: list record rows, per section or for all sections

use crate::model::RecordMeta;
use serde::Serialize;

pub mod delete;
pub mod list;
pub mod upload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }

    /// Messages the user must see even in a silent UI.
    pub fn is_alert(&self) -> bool {
        matches!(self.level, MessageLevel::Warning | MessageLevel::Error)
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected: Vec<RecordMeta>,
    pub listed: Vec<RecordMeta>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed(mut self, rows: Vec<RecordMeta>) -> Self {
        self.listed = rows;
        self
    }

    pub fn alerts(&self) -> impl Iterator<Item = &CmdMessage> {
        self.messages.iter().filter(|m| m.is_alert())
    }
}
