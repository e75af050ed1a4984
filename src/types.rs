//! Common types and data structures

use std::collections::HashMap;
use thiserror::Error;

/// Individual asset entry in a category manifest
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct AssetEntry {
    #[serde(default)]
    pub id: i64,
    pub filename: String,
    pub path: String,
    #[serde(default)]
    pub format: Option<String>,
    /// Demo assets carry an inline base64 data URI in `path` instead of
    /// a server-hosted file.
    #[serde(default, rename = "isDemo")]
    pub is_demo: bool,
}

/// Manifest structure from remote JSON: optional metadata fields plus
/// one array of entries per category key.
#[derive(Debug, serde::Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(flatten)]
    pub categories: HashMap<String, Vec<AssetEntry>>,
}

impl Manifest {
    /// Entries for one category, in manifest order. A manifest without
    /// the key is an empty category, not an error.
    pub fn take_category(&mut self, name: &str) -> Vec<AssetEntry> {
        self.categories.remove(name).unwrap_or_default()
    }
}

/// Parsed result of one manifest fetch, scoped to a single category.
#[derive(Debug, Clone)]
pub struct ManifestSnapshot {
    pub assets: Vec<AssetEntry>,
    pub version: Option<String>,
    pub last_updated: Option<String>,
}

/// Why a manifest load failed. Every variant is reported in place of
/// the gallery; nothing propagates past the load boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("manifest not found (HTTP {0})")]
    Status(u16),
    #[error("malformed manifest: {0}")]
    Malformed(String),
}

/// Phase of the most recent manifest request.
#[derive(Debug, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Pending,
    Ready(ManifestSnapshot),
    Failed(LoadError),
}

/// Loader state shared with the fetch task. `generation` identifies
/// the newest request; a task holding an older generation discards its
/// result instead of publishing it.
#[derive(Default)]
pub struct LoadState {
    pub generation: u64,
    pub phase: LoadPhase,
}

/// What the central gallery area is currently showing.
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryStatus {
    Loading,
    Ready,
    Empty,
    Failed(String),
}

/// Why saving an asset to disk failed.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("download failed: {0}")]
    Request(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("invalid demo payload: {0}")]
    Payload(String),
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Status of the single in-flight asset save, shared with the save task.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving {
        filename: String,
        downloaded: u64,
        total: u64,
    },
    Done {
        filename: String,
    },
    Failed {
        filename: String,
        error: String,
    },
}

#[derive(Default)]
pub struct SaveState {
    pub status: SaveStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST_JSON: &str = r#"{
        "version": "1.0",
        "last_updated": "2024-03-01T12:34:56.789012",
        "crosshairs": [
            { "id": 1, "filename": "crosshair1.png", "path": "./crosshairs/crosshair1.png", "format": "png" },
            { "id": 2, "filename": "crosshair2.webp", "path": "./crosshairs/crosshair2.webp", "format": "webp" },
            { "filename": "demo.svg", "path": "data:image/svg+xml;base64,PHN2Zy8+", "isDemo": true }
        ]
    }"#;

    #[test]
    fn parses_manifest_and_extracts_category_in_order() {
        let mut manifest: Manifest = serde_json::from_str(MANIFEST_JSON).unwrap();
        assert_eq!(manifest.version.as_deref(), Some("1.0"));
        assert!(manifest.last_updated.is_some());

        let assets = manifest.take_category("crosshairs");
        assert_eq!(assets.len(), 3);
        assert_eq!(assets[0].filename, "crosshair1.png");
        assert_eq!(assets[1].filename, "crosshair2.webp");
        assert_eq!(assets[2].filename, "demo.svg");
    }

    #[test]
    fn is_demo_defaults_to_false_and_honors_camel_case_key() {
        let mut manifest: Manifest = serde_json::from_str(MANIFEST_JSON).unwrap();
        let assets = manifest.take_category("crosshairs");
        assert!(!assets[0].is_demo);
        assert!(assets[2].is_demo);
    }

    #[test]
    fn missing_category_key_is_an_empty_sequence() {
        let mut manifest: Manifest = serde_json::from_str(MANIFEST_JSON).unwrap();
        assert!(manifest.take_category("scopes").is_empty());
    }

    #[test]
    fn metadata_fields_are_optional() {
        let mut manifest: Manifest =
            serde_json::from_str(r#"{"scopes": [{"filename": "s.png", "path": "./scopes/s.png"}]}"#)
                .unwrap();
        assert_eq!(manifest.version, None);
        assert_eq!(manifest.last_updated, None);
        assert_eq!(manifest.take_category("scopes").len(), 1);
    }

    #[test]
    fn null_last_updated_is_accepted() {
        let manifest: Manifest =
            serde_json::from_str(r#"{"version": "1.0", "last_updated": null, "crosshairs": []}"#)
                .unwrap();
        assert_eq!(manifest.last_updated, None);
    }

    #[test]
    fn non_array_category_value_is_rejected() {
        let result: Result<Manifest, _> =
            serde_json::from_str(r#"{"crosshairs": "not-an-array"}"#);
        assert!(result.is_err());
    }
}
