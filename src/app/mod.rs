//! App module - contains the main application state and logic

mod downloads;
mod manifest;
mod preview;
mod thumbnails;

use crate::constants::{ASSETS_BASE_URL, CATEGORIES};
use crate::settings::Settings;
use crate::theme;
use crate::types::{AssetEntry, GalleryStatus, LoadState, SaveState};
use crate::utils::get_cache_dir;
use eframe::egui;
use preview::PreviewModal;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    // Asset registry - rebuilt in full on every load/tab switch
    pub(crate) assets: Vec<AssetEntry>,
    pub(crate) active_category: usize,
    pub(crate) gallery_status: GalleryStatus,
    pub(crate) manifest_version: Option<String>,
    pub(crate) manifest_updated: Option<String>,
    // Manifest loader
    pub(crate) load_state: Arc<Mutex<LoadState>>,
    pub(crate) load_generation: u64,
    pub(crate) load_cancel: Option<CancellationToken>,
    pub(crate) initial_load_started: bool,
    // Preview overlay
    pub(crate) preview: PreviewModal,
    // Saving
    pub(crate) save_state: Arc<Mutex<SaveState>>,
    pub(crate) download_path: PathBuf,
    pub(crate) download_path_str: String,
    // Thumbnail cache
    pub(crate) texture_cache: HashMap<String, Option<egui::TextureHandle>>,
    pub(crate) cache_dir: PathBuf,
    // Chrome
    pub(crate) logo_texture: Option<egui::TextureHandle>,
    pub(crate) show_settings: bool,
    pub(crate) large_thumbnails: bool,
    pub(crate) toast_message: Option<String>,
    pub(crate) toast_start: Option<std::time::Instant>,
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub needs_center: bool,
    pub(crate) data_dir: PathBuf,
    pub(crate) runtime: tokio::runtime::Runtime,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, data_dir: PathBuf) -> Self {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        // Apply theme from theme.rs
        theme::apply_visuals(&cc.egui_ctx);

        let download_path = settings.download_path_or_default();

        let cache_dir = get_cache_dir();
        std::fs::create_dir_all(&cache_dir).ok();

        Self {
            assets: Vec::new(),
            active_category: 0,
            gallery_status: GalleryStatus::Loading,
            manifest_version: None,
            manifest_updated: None,
            load_state: Arc::new(Mutex::new(LoadState::default())),
            load_generation: 0,
            load_cancel: None,
            initial_load_started: false,
            preview: PreviewModal::default(),
            save_state: Arc::new(Mutex::new(SaveState::default())),
            download_path: download_path.clone(),
            download_path_str: download_path.to_string_lossy().to_string(),
            texture_cache: HashMap::new(),
            cache_dir,
            logo_texture: None,
            show_settings: false,
            large_thumbnails: settings.large_thumbnails,
            toast_message: None,
            toast_start: None,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
            runtime: tokio::runtime::Runtime::new().unwrap(),
        }
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            large_thumbnails: self.large_thumbnails,
            download_path: Some(self.download_path_str.clone()),
        };
        settings.save(&self.data_dir);
    }

    /// Switch the active tab and rebuild the registry from that
    /// category's manifest. Re-clicking the active tab reloads it.
    pub fn switch_category(&mut self, index: usize, ctx: &egui::Context) {
        if index >= CATEGORIES.len() {
            return;
        }
        self.active_category = index;
        self.start_manifest_load(ctx);
    }

    /// Resolve a manifest path to a fetchable URL. Data URIs have no
    /// URL; relative paths resolve against the pack base.
    pub fn asset_url(path: &str) -> Option<String> {
        if path.starts_with("data:") {
            None
        } else if path.starts_with("http://") || path.starts_with("https://") {
            Some(path.to_string())
        } else {
            Some(format!("{}/{}", ASSETS_BASE_URL, path.trim_start_matches("./")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_resolve_against_the_pack_base() {
        assert_eq!(
            App::asset_url("./crosshairs/crosshair1.png").unwrap(),
            format!("{}/crosshairs/crosshair1.png", ASSETS_BASE_URL)
        );
        assert_eq!(
            App::asset_url("scopes/scope1.png").unwrap(),
            format!("{}/scopes/scope1.png", ASSETS_BASE_URL)
        );
    }

    #[test]
    fn absolute_urls_pass_through_unchanged() {
        let url = "https://example.com/img/a.png";
        assert_eq!(App::asset_url(url).as_deref(), Some(url));
    }

    #[test]
    fn data_uris_have_no_fetchable_url() {
        assert_eq!(App::asset_url("data:image/svg+xml;base64,PHN2Zy8+"), None);
    }
}
