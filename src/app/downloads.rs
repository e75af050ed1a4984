//! Download logic
//!
//! Saves the asset currently shown in the preview to the download
//! directory. Ordinary assets stream from the pack repository; demo
//! assets decode from their inline data URI without touching the
//! network.

use super::App;
use crate::constants::{CategorySpec, CATEGORIES};
use crate::types::{AssetEntry, SaveError, SaveState, SaveStatus};
use crate::utils;
use eframe::egui;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Destination filename for an asset saved out of the given category:
/// the category's charm prefix plus the asset's extension when a prefix
/// is configured, the asset's own filename otherwise.
pub fn download_file_name(asset: &AssetEntry, category: &CategorySpec) -> String {
    match category.download_prefix {
        Some(prefix) => match asset.filename.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => format!("{}.{}", prefix, ext),
            _ => prefix.to_string(),
        },
        None => asset.filename.clone(),
    }
}

/// Decode a demo asset's inline payload into writable bytes.
fn demo_payload(path: &str) -> Result<Vec<u8>, SaveError> {
    let decoded =
        utils::decode_data_uri(path).map_err(|e| SaveError::Payload(e.to_string()))?;
    Ok(decoded.bytes)
}

fn write_payload(dest: &Path, bytes: &[u8]) -> Result<(), SaveError> {
    std::fs::write(dest, bytes)?;
    Ok(())
}

fn set_status(state: &Arc<Mutex<SaveState>>, status: SaveStatus) {
    state.lock().unwrap().status = status;
}

/// Stream one remote asset to disk, reporting progress into the state.
async fn fetch_to_file(
    url: &str,
    dest: &Path,
    filename: &str,
    state: &Arc<Mutex<SaveState>>,
    ctx: &egui::Context,
) -> Result<(), SaveError> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| SaveError::Request(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(SaveError::Status(status.as_u16()));
    }

    let total = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;
    let mut bytes_vec = Vec::with_capacity(total as usize);
    let mut stream = response.bytes_stream();
    let mut last_repaint = std::time::Instant::now();

    while let Some(chunk) = stream.next().await {
        let data = chunk.map_err(|e| SaveError::Request(e.to_string()))?;
        downloaded += data.len() as u64;
        bytes_vec.extend_from_slice(&data);
        set_status(
            state,
            SaveStatus::Saving {
                filename: filename.to_string(),
                downloaded,
                total,
            },
        );
        if last_repaint.elapsed() >= std::time::Duration::from_millis(100) {
            ctx.request_repaint();
            last_repaint = std::time::Instant::now();
        }
    }

    write_payload(dest, &bytes_vec)
}

async fn download_asset(
    url: String,
    dest: PathBuf,
    filename: String,
    state: Arc<Mutex<SaveState>>,
    ctx: egui::Context,
) {
    match fetch_to_file(&url, &dest, &filename, &state, &ctx).await {
        Ok(()) => {
            info!(file = %dest.display(), "Asset saved");
            set_status(&state, SaveStatus::Done { filename });
        }
        Err(e) => {
            warn!(url = %url, error = %e, "Asset save failed");
            set_status(
                &state,
                SaveStatus::Failed {
                    filename,
                    error: e.to_string(),
                },
            );
        }
    }
    ctx.request_repaint();
}

impl App {
    /// Save the asset currently shown in the preview. Does nothing when
    /// the preview is closed.
    pub fn save_current(&mut self, ctx: &egui::Context) {
        let Some(asset) = self.preview.current().cloned() else {
            return;
        };
        let category = &CATEGORIES[self.active_category];
        let filename = download_file_name(&asset, category);
        std::fs::create_dir_all(&self.download_path).ok();
        let dest = self.download_path.join(&filename);

        if asset.is_demo || asset.path.starts_with("data:") {
            info!(file = %dest.display(), "Saving demo asset");
            let status = match demo_payload(&asset.path)
                .and_then(|bytes| write_payload(&dest, &bytes))
            {
                Ok(()) => SaveStatus::Done { filename },
                Err(e) => {
                    warn!(asset = %asset.filename, error = %e, "Demo asset save failed");
                    SaveStatus::Failed {
                        filename,
                        error: e.to_string(),
                    }
                }
            };
            set_status(&self.save_state, status);
            ctx.request_repaint();
            return;
        }

        let Some(url) = Self::asset_url(&asset.path) else {
            set_status(
                &self.save_state,
                SaveStatus::Failed {
                    filename,
                    error: "unsupported asset path".into(),
                },
            );
            return;
        };

        info!(url = %url, file = %dest.display(), "Saving asset");
        set_status(
            &self.save_state,
            SaveStatus::Saving {
                filename: filename.clone(),
                downloaded: 0,
                total: 0,
            },
        );
        let state = self.save_state.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            download_asset(url, dest, filename, state, ctx).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    fn asset(filename: &str, path: &str, is_demo: bool) -> AssetEntry {
        AssetEntry {
            id: 0,
            filename: filename.into(),
            path: path.into(),
            format: None,
            is_demo,
        }
    }

    fn category(prefix: Option<&'static str>) -> CategorySpec {
        CategorySpec {
            name: "crosshairs",
            label: "Crosshairs",
            manifest_file: "crosshairs_manifest.json",
            download_prefix: prefix,
        }
    }

    #[test]
    fn prefixed_category_synthesizes_charm_name_with_original_extension() {
        let asset = asset("crosshair7.webp", "./crosshairs/crosshair7.webp", false);
        assert_eq!(
            download_file_name(&asset, &category(Some("Crosshair-charm"))),
            "Crosshair-charm.webp"
        );
    }

    #[test]
    fn unprefixed_category_keeps_the_asset_filename() {
        let asset = asset("crosshair7.webp", "./crosshairs/crosshair7.webp", false);
        assert_eq!(download_file_name(&asset, &category(None)), "crosshair7.webp");
    }

    #[test]
    fn extensionless_filename_falls_back_to_the_bare_prefix() {
        let asset = asset("crosshair", "./crosshairs/crosshair", false);
        assert_eq!(
            download_file_name(&asset, &category(Some("Scope-charm"))),
            "Scope-charm"
        );
    }

    #[test]
    fn demo_payload_decodes_the_svg_bytes() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><circle r="4"/></svg>"#;
        let encoded = base64::engine::general_purpose::STANDARD.encode(svg);
        let uri = format!("data:image/svg+xml;base64,{}", encoded);

        assert_eq!(demo_payload(&uri).unwrap(), svg.as_bytes());
    }

    #[test]
    fn malformed_demo_payload_is_a_payload_error() {
        let result = demo_payload("data:image/svg+xml;base64,@@@@");
        assert!(matches!(result, Err(SaveError::Payload(_))));
    }

    #[test]
    fn write_payload_creates_the_destination_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("Crosshair-charm.svg");
        write_payload(&dest, b"<svg/>").unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"<svg/>");
    }
}
