//! Harvest configuration.
//!
//! A run is configured either programmatically via [`Config::builder`] or by
//! loading a self-describing JSON document (`name`, `url`, `headless`,
//! `viewport`, `keep_browser_open`, `actions`).

pub mod actions;
pub mod builder;
pub mod types;

pub use actions::{
    Action, CheckElementFields, Condition, ConditionalWaitFields, LoginFields, LogMessageFields,
    SkipIfFields, StartGenerationDownloadsFields,
};
pub use builder::{ConfigBuilder, Unset, WithUrl};
pub use types::{Config, DuplicateMode, Viewport};

use std::path::Path;

use serde::Deserialize;

use crate::errors::{HarvestError, HarvestResult};

/// On-disk shape of the JSON configuration document. Kept distinct from
/// [`Config`] so the builder remains the single place that applies defaults
/// and validates cross-field invariants.
#[derive(Debug, Deserialize)]
struct ConfigDocument {
    name: String,
    url: String,
    #[serde(default = "default_true")]
    headless: bool,
    #[serde(default)]
    viewport: Option<ViewportDocument>,
    #[serde(default)]
    keep_browser_open: bool,
    #[serde(default)]
    downloads_folder: Option<String>,
    #[serde(default)]
    logs_folder: Option<String>,
    #[serde(default)]
    max_downloads: Option<u64>,
    #[serde(default)]
    duplicate_mode: Option<DuplicateMode>,
    #[serde(default)]
    consecutive_duplicate_threshold: Option<u32>,
    #[serde(default)]
    start_from: Option<String>,
    #[serde(default)]
    actions: Vec<Action>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct ViewportDocument {
    width: u32,
    height: u32,
}

/// Parse a JSON configuration document and apply it on top of builder
/// defaults, returning [`HarvestError::Config`] on a malformed document or a
/// rejected field.
pub fn from_json(raw: &str) -> HarvestResult<Config> {
    let doc: ConfigDocument =
        serde_json::from_str(raw).map_err(|e| HarvestError::Config(format!("parsing config json: {e}")))?;

    let mut b = Config::builder().gallery_url(doc.url).name(doc.name).headless(doc.headless).keep_browser_open(doc.keep_browser_open);

    if let Some(v) = doc.viewport {
        b = b.viewport(v.width, v.height);
    }
    if let Some(folder) = doc.downloads_folder {
        b = b.downloads_folder(folder);
    }
    if let Some(folder) = doc.logs_folder {
        b = b.logs_folder(folder);
    }
    if let Some(max) = doc.max_downloads {
        b = b.max_downloads(max);
    }
    if let Some(mode) = doc.duplicate_mode {
        b = b.duplicate_mode(mode);
    }
    if let Some(n) = doc.consecutive_duplicate_threshold {
        b = b.consecutive_duplicate_threshold(n);
    }
    if let Some(start_from) = doc.start_from {
        b = b.start_from(start_from);
    }
    b = b.action_script(doc.actions);

    b.build().map_err(|e| HarvestError::Config(e.to_string()))
}

/// Load and parse a configuration document from disk.
pub async fn load_from_file(path: &Path) -> HarvestResult<Config> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| HarvestError::Config(format!("reading config file {}: {e}", path.display())))?;
    from_json(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_document() {
        let raw = r#"{
            "name": "demo-gallery",
            "url": "https://gallery.example/feed"
        }"#;
        let cfg = from_json(raw).unwrap();
        assert_eq!(cfg.name, "demo-gallery");
        assert_eq!(cfg.gallery_url, "https://gallery.example/feed");
        assert!(cfg.headless);
        assert_eq!(cfg.viewport.width, 1920);
    }

    #[test]
    fn parses_full_document_with_actions() {
        let raw = r#"{
            "name": "demo-gallery",
            "url": "https://gallery.example/feed",
            "headless": false,
            "viewport": {"width": 1280, "height": 800},
            "keep_browser_open": true,
            "actions": [
                {"type": "wait", "value": {"milliseconds": 500}},
                {"type": "click_button", "value": {"selector": "#go"}}
            ]
        }"#;
        let cfg = from_json(raw).unwrap();
        assert!(!cfg.headless);
        assert_eq!(cfg.viewport.width, 1280);
        assert!(cfg.keep_browser_open);
        assert_eq!(cfg.action_script.len(), 2);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = from_json("{ not json").unwrap_err();
        assert!(matches!(err, HarvestError::Config(_)));
    }

    #[test]
    fn rejects_missing_required_fields() {
        let err = from_json(r#"{"headless": true}"#).unwrap_err();
        assert!(matches!(err, HarvestError::Config(_)));
    }
}
