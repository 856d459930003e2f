//! # Context Initialization
//!
//! Resolves where folio keeps its data, loads the configuration found there
//! and wires a [`Portfolio`] over a [`FileStore`] and a [`HeadlessPage`].
//!
//! ## Data Directory
//!
//! Resolved in priority order:
//! 1. An explicit override (the CLI's `--data-dir`).
//! 2. The `FOLIO_DATA` environment variable. Tests use it to isolate state.
//! 3. The OS data directory for folio (via the `directories` crate).
//!
//! The directory is created lazily by the first write; a fresh directory is
//! an empty portfolio.

use crate::api::Portfolio;
use crate::config::FolioConfig;
use crate::error::{FolioError, Result};
use crate::store::fs::FileStore;
use crate::surface::HeadlessPage;
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

pub const DATA_ENV_VAR: &str = "FOLIO_DATA";

pub struct FolioContext {
    pub portfolio: Portfolio<FileStore, HeadlessPage>,
    pub config: FolioConfig,
    pub data_dir: PathBuf,
}

pub fn resolve_data_dir(data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(DATA_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }
    ProjectDirs::from("com", "folio", "folio")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| FolioError::Config("could not determine a data directory".to_string()))
}

/// A page exposing every section, with configured static images seeded.
pub fn build_page(config: &FolioConfig) -> Result<HeadlessPage> {
    let mut page = HeadlessPage::with_all_sections();
    for (section, sources) in config.static_images()? {
        page = page.with_static_images(section, sources);
    }
    Ok(page)
}

pub fn initialize(data_override: Option<PathBuf>) -> Result<FolioContext> {
    let data_dir = resolve_data_dir(data_override)?;
    let config = FolioConfig::load(&data_dir)?;
    let page = build_page(&config)?;
    let store = FileStore::new(data_dir.clone());
    debug!(data_dir = %data_dir.display(), "context initialized");

    Ok(FolioContext {
        portfolio: Portfolio::new(store, page, config.carousel_settings()),
        config,
        data_dir,
    })
}
