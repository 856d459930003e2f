//! # Configuration
//!
//! Folio configuration is loaded with [`confique`] from, in priority order:
//! 1. **Environment variables**: `FOLIO_ITEM_WIDTH`, `FOLIO_GAP`, ...
//! 2. **Config file**: `<data_dir>/folio.toml`, optional.
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `carousel.item_width` | `600` | Base width of a ring item, px |
//! | `carousel.gap` | `30` | Gap between ring items, px |
//! | `carousel.min_radius` | `250` | Smallest ring radius, px |
//! | `carousel.rotation_step` | `0.2` | Degrees turned per frame |
//! | `static_images` | none | Section key → image sources already on the page |
//!
//! ```toml
//! [carousel]
//! rotation_step = 0.5
//!
//! [static_images]
//! "2-1" = ["img/house-front.jpg", "img/house-back.jpg"]
//! ```

use crate::carousel::CarouselSettings;
use crate::error::{FolioError, Result};
use crate::model::SectionKey;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "folio.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CarouselConfig {
    #[config(default = 600.0, env = "FOLIO_ITEM_WIDTH")]
    pub item_width: f64,

    #[config(default = 30.0, env = "FOLIO_GAP")]
    pub gap: f64,

    #[config(default = 250.0, env = "FOLIO_MIN_RADIUS")]
    pub min_radius: f64,

    #[config(default = 0.2, env = "FOLIO_ROTATION_STEP")]
    pub rotation_step: f64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        let settings = CarouselSettings::default();
        Self {
            item_width: settings.item_width,
            gap: settings.gap,
            min_radius: settings.min_radius,
            rotation_step: settings.rotation_step,
        }
    }
}

/// Configuration for folio, stored in `folio.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct FolioConfig {
    #[config(nested)]
    pub carousel: CarouselConfig,

    /// Images hard-coded into a section's grid. They are shown and used as
    /// the carousel fallback, but never stored and never deletable.
    pub static_images: Option<BTreeMap<String, Vec<String>>>,
}

impl FolioConfig {
    /// Load from `<data_dir>/folio.toml` (if present) and the environment.
    pub fn load(data_dir: &Path) -> Result<Self> {
        FolioConfig::builder()
            .env()
            .file(data_dir.join(CONFIG_FILE_NAME))
            .load()
            .map_err(|e| FolioError::Config(e.to_string()))
    }

    pub fn carousel_settings(&self) -> CarouselSettings {
        CarouselSettings {
            item_width: self.carousel.item_width,
            gap: self.carousel.gap,
            min_radius: self.carousel.min_radius,
            rotation_step: self.carousel.rotation_step,
        }
    }

    /// Static image sources keyed by validated section.
    pub fn static_images(&self) -> Result<Vec<(SectionKey, Vec<String>)>> {
        let Some(map) = &self.static_images else {
            return Ok(Vec::new());
        };
        map.iter()
            .map(|(key, sources)| Ok((key.parse::<SectionKey>()?, sources.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_ring_constants() {
        let config = FolioConfig::default();
        assert_eq!(config.carousel_settings(), CarouselSettings::default());
        assert!(config.static_images().unwrap().is_empty());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let config = FolioConfig::load(dir.path()).unwrap();
        assert_eq!(config.carousel.item_width, 600.0);
        assert_eq!(config.carousel.gap, 30.0);
        assert_eq!(config.carousel.min_radius, 250.0);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"
[carousel]
min_radius = 400.0

[static_images]
"2-1" = ["img/a.jpg", "img/b.jpg"]
"#,
        )
        .unwrap();

        let config = FolioConfig::load(dir.path()).unwrap();
        assert_eq!(config.carousel.min_radius, 400.0);
        assert_eq!(config.carousel.item_width, 600.0);

        let statics = config.static_images().unwrap();
        assert_eq!(statics.len(), 1);
        assert_eq!(statics[0].0.as_str(), "2-1");
        assert_eq!(statics[0].1, vec!["img/a.jpg", "img/b.jpg"]);
    }

    #[test]
    fn unknown_static_section_is_rejected() {
        let config = FolioConfig {
            static_images: Some(BTreeMap::from([("9-9".to_string(), vec!["x.jpg".into()])])),
            ..Default::default()
        };
        assert!(matches!(
            config.static_images().unwrap_err(),
            FolioError::UnknownSection(_)
        ));
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[carousel\n").unwrap();
        assert!(matches!(
            FolioConfig::load(dir.path()).unwrap_err(),
            FolioError::Config(_)
        ));
    }
}
