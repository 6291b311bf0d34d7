use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;

const DEFAULT_CONFIG_FILE: &str = "review_scraper.toml";
const ENV_PREFIX: &str = "REVIEWS";

/// CSS selectors used to locate one review and its parts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorSettings {
    pub review: String,
    pub title: String,
    pub hours: String,
    pub date: String,
    pub content: String,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        SelectorSettings {
            review: "div.apphub_UserReviewCardContent".into(),
            title: "div.title".into(),
            hours: "div.hours".into(),
            date: "div.date_posted".into(),
            content: "div.apphub_CardTextContent".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub selectors: SelectorSettings,
    /// Records normalized per rayon batch.
    pub chunk_size: usize,
    /// Dashes in the separator line written after each block.
    pub separator_width: usize,
    /// Prefix the delimited file with a UTF-8 BOM so spreadsheet apps pick the encoding.
    pub csv_bom: bool,
    pub copies_per_review: f64,
    pub store_share: f64,
    pub refund_keep_rate: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            selectors: SelectorSettings::default(),
            chunk_size: 500,
            separator_width: 80,
            csv_bom: true,
            copies_per_review: 30.0,
            store_share: 0.7,
            refund_keep_rate: 0.9,
        }
    }
}

impl Settings {
    /// Defaults, then the TOML file (explicit path, or `review_scraper.toml`
    /// if present), then `REVIEWS_*` environment variables.
    pub fn load(file: Option<&Path>) -> Result<Settings> {
        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file_source)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        debug!(?settings, "settings loaded");
        Ok(settings.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.chunk_size = self.chunk_size.max(1);
        self.separator_width = self.separator_width.max(3);
        self
    }

    pub fn separator_line(&self) -> String {
        "-".repeat(self.separator_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_storefront_markup() {
        let s = Settings::default();
        assert_eq!(s.selectors.review, "div.apphub_UserReviewCardContent");
        assert_eq!(s.separator_line().len(), 80);
        assert_eq!(s.chunk_size, 500);
    }

    #[test]
    fn file_overrides_only_given_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "chunk_size = 0\ncsv_bom = false\n[selectors]\ntitle = \"h3.label\"\n")
            .unwrap();

        let s = Settings::load(Some(&path)).unwrap();
        assert_eq!(s.chunk_size, 1);
        assert!(!s.csv_bom);
        assert_eq!(s.selectors.title, "h3.label");
        assert_eq!(s.selectors.hours, "div.hours");
        assert_eq!(s.separator_width, 80);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
