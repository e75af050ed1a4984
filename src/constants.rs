//! Application constants and configuration

/// Root of the published charm pack repository. Category manifests and
/// the image files they reference live under this URL.
pub const ASSETS_BASE_URL: &str =
    "https://raw.githubusercontent.com/crosshair-gallery/charm-packs/main";

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// One gallery category: a tab, the manifest file behind it, and how
/// assets saved out of it are named.
pub struct CategorySpec {
    /// Key under which the manifest lists this category's assets.
    pub name: &'static str,
    /// Tab label.
    pub label: &'static str,
    /// Manifest file name, resolved against [`ASSETS_BASE_URL`].
    pub manifest_file: &'static str,
    /// When set, downloads are saved as `<prefix>.<ext>` instead of the
    /// asset's own filename.
    pub download_prefix: Option<&'static str>,
}

/// Known categories, in tab order. The first entry is active on launch.
/// A single-entry table disables the tab bar entirely.
pub const CATEGORIES: &[CategorySpec] = &[
    CategorySpec {
        name: "crosshairs",
        label: "Crosshairs",
        manifest_file: "crosshairs_manifest.json",
        download_prefix: Some("Crosshair-charm"),
    },
    CategorySpec {
        name: "scopes",
        label: "Scopes",
        manifest_file: "scopes_manifest.json",
        download_prefix: Some("Scope-charm"),
    },
];
