//! Thumbnail texture loading
//!
//! Remote assets are prefetched into the disk cache and decoded into
//! textures on demand; demo assets decode straight from their inline
//! data URI. Textures are keyed by the asset path, which stays valid
//! across tab switches.

use super::App;
use crate::types::AssetEntry;
use crate::utils;
use eframe::egui;
use tracing::{debug, warn};

impl App {
    /// Texture for one asset, if it can be produced this frame. Remote
    /// assets whose cache file has not arrived yet return `None`; the
    /// prefetch task repaints when they land.
    pub fn ensure_texture(
        &mut self,
        ctx: &egui::Context,
        asset: &AssetEntry,
    ) -> Option<egui::TextureHandle> {
        if let Some(cached) = self.texture_cache.get(&asset.path) {
            return cached.clone();
        }

        if asset.path.starts_with("data:") {
            let texture = self.decode_inline(ctx, asset);
            self.texture_cache.insert(asset.path.clone(), texture.clone());
            return texture;
        }

        let file = self
            .cache_dir
            .join("thumbnails")
            .join(utils::cache_file_name(&asset.path));
        if file.exists() {
            let texture = image::open(&file).ok().map(|img| {
                let rgba = img.to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                let pixels = rgba.into_raw();
                ctx.load_texture(
                    &asset.filename,
                    egui::ColorImage::from_rgba_unmultiplied(size, &pixels),
                    egui::TextureOptions::LINEAR,
                )
            });
            if texture.is_none() {
                warn!(file = %file.display(), "Failed to decode cached thumbnail");
            }
            self.texture_cache.insert(asset.path.clone(), texture.clone());
            return texture;
        }

        None
    }

    /// Decode an inline data-URI asset. SVG payloads rasterize; anything
    /// else goes through the image decoder.
    fn decode_inline(&self, ctx: &egui::Context, asset: &AssetEntry) -> Option<egui::TextureHandle> {
        let decoded = match utils::decode_data_uri(&asset.path) {
            Ok(d) => d,
            Err(e) => {
                warn!(asset = %asset.filename, error = %e, "Failed to decode inline asset");
                return None;
            }
        };

        let (pixels, w, h) = if decoded.mime.contains("svg") {
            utils::rasterize_svg(&decoded.bytes, 512)?
        } else {
            let img = image::load_from_memory(&decoded.bytes).ok()?.to_rgba8();
            let (w, h) = (img.width(), img.height());
            (img.into_raw(), w, h)
        };

        Some(ctx.load_texture(
            &asset.filename,
            egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &pixels),
            egui::TextureOptions::LINEAR,
        ))
    }

    /// Fetch missing remote thumbnails into the disk cache, a few at a
    /// time. Repaints as each file lands so cards fill in while the rest
    /// are still in flight.
    pub fn start_thumbnail_prefetch(&mut self, ctx: &egui::Context) {
        let thumb_dir = self.cache_dir.join("thumbnails");
        std::fs::create_dir_all(&thumb_dir).ok();

        let pending: Vec<(String, String)> = self
            .assets
            .iter()
            .filter_map(|asset| {
                let url = Self::asset_url(&asset.path)?;
                let file = thumb_dir.join(utils::cache_file_name(&asset.path));
                if file.exists() {
                    None
                } else {
                    Some((url, file.to_string_lossy().into_owned()))
                }
            })
            .collect();

        if pending.is_empty() {
            return;
        }
        debug!(count = pending.len(), "Starting thumbnail prefetch");

        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let client = reqwest::Client::new();
            let semaphore = std::sync::Arc::new(tokio::sync::Semaphore::new(8));
            let mut handles = vec![];

            for (url, file) in pending {
                let sem = semaphore.clone();
                let client = client.clone();
                let ctx = ctx.clone();

                handles.push(tokio::spawn(async move {
                    let _permit = sem.acquire().await.ok();
                    match client.get(&url).send().await {
                        Ok(response) if response.status().is_success() => {
                            if let Ok(bytes) = response.bytes().await {
                                std::fs::write(&file, &bytes).ok();
                                ctx.request_repaint();
                            }
                        }
                        Ok(response) => {
                            warn!(url = %url, status = %response.status(), "Thumbnail fetch failed");
                        }
                        Err(e) => {
                            warn!(url = %url, error = %e, "Thumbnail fetch failed");
                        }
                    }
                }));
            }

            for handle in handles {
                handle.await.ok();
            }
        });
    }

    /// Drop cached thumbnail files and textures, then refetch.
    pub fn clear_thumbnail_cache(&mut self, ctx: &egui::Context) {
        let _ = std::fs::remove_dir_all(self.cache_dir.join("thumbnails"));
        self.texture_cache.clear();
        self.start_thumbnail_prefetch(ctx);
    }
}
