//! Manifest loading
//!
//! One fetch task per load request. Each request carries a generation;
//! a response from a superseded request is discarded instead of
//! clobbering a newer category's gallery.

use super::App;
use crate::constants::{ASSETS_BASE_URL, CATEGORIES};
use crate::types::{
    GalleryStatus, LoadError, LoadPhase, LoadState, Manifest, ManifestSnapshot,
};
use eframe::egui;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Fetch and parse one category manifest.
async fn fetch_manifest(url: &str, category: &str) -> Result<ManifestSnapshot, LoadError> {
    debug!(url, "Fetching manifest");
    let response = reqwest::get(url)
        .await
        .map_err(|e| LoadError::Request(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status(status.as_u16()));
    }
    let mut manifest: Manifest = response
        .json()
        .await
        .map_err(|e| LoadError::Malformed(e.to_string()))?;
    let version = manifest.version.clone();
    let last_updated = manifest.last_updated.clone();
    let assets = manifest.take_category(category);
    Ok(ManifestSnapshot {
        assets,
        version,
        last_updated,
    })
}

/// Publish a finished fetch into the shared state. Results tagged with
/// an older generation are dropped.
fn publish(
    state: &Arc<Mutex<LoadState>>,
    generation: u64,
    result: Result<ManifestSnapshot, LoadError>,
) {
    let mut s = state.lock().unwrap();
    if s.generation != generation {
        debug!(generation, current = s.generation, "Discarding stale manifest response");
        return;
    }
    s.phase = match result {
        Ok(snapshot) => LoadPhase::Ready(snapshot),
        Err(e) => LoadPhase::Failed(e),
    };
}

impl App {
    /// Kick off a manifest load for the active category. Any prior
    /// in-flight load is cancelled and its late result discarded.
    pub fn start_manifest_load(&mut self, ctx: &egui::Context) {
        let category = &CATEGORIES[self.active_category];
        self.load_generation += 1;
        let generation = self.load_generation;

        if let Some(token) = self.load_cancel.take() {
            token.cancel();
        }
        let token = CancellationToken::new();
        self.load_cancel = Some(token.clone());

        {
            let mut s = self.load_state.lock().unwrap();
            s.generation = generation;
            s.phase = LoadPhase::Pending;
        }
        self.gallery_status = GalleryStatus::Loading;

        info!(category = category.name, generation, "Loading manifest");
        let url = format!("{}/{}", ASSETS_BASE_URL, category.manifest_file);
        let name = category.name;
        let state = self.load_state.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                result = fetch_manifest(&url, name) => {
                    if let Err(e) = &result {
                        error!(category = name, error = %e, "Manifest load failed");
                    }
                    publish(&state, generation, result);
                    ctx.request_repaint();
                }
            }
        });
    }

    /// Drain the loader state into the registry. Called once per frame.
    pub fn poll_manifest_load(&mut self, ctx: &egui::Context) {
        let taken = {
            let mut s = self.load_state.lock().unwrap();
            if s.generation != self.load_generation {
                None
            } else if matches!(s.phase, LoadPhase::Ready(_) | LoadPhase::Failed(_)) {
                Some(std::mem::take(&mut s.phase))
            } else {
                None
            }
        };
        let Some(phase) = taken else { return };

        let category = &CATEGORIES[self.active_category];
        self.load_cancel = None;
        match phase {
            LoadPhase::Ready(snapshot) => {
                info!(
                    category = category.name,
                    count = snapshot.assets.len(),
                    "Manifest loaded"
                );
                self.manifest_version = snapshot.version;
                self.manifest_updated = snapshot.last_updated;
                self.assets = snapshot.assets;
                if self.assets.is_empty() {
                    self.gallery_status = GalleryStatus::Empty;
                } else {
                    self.gallery_status = GalleryStatus::Ready;
                    self.start_thumbnail_prefetch(ctx);
                }
            }
            LoadPhase::Failed(_) => {
                self.assets.clear();
                self.gallery_status = GalleryStatus::Failed(format!(
                    "Failed to load {}. Make sure the pack manifest exists.",
                    category.name
                ));
            }
            LoadPhase::Idle | LoadPhase::Pending => unreachable!(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AssetEntry;

    fn snapshot(filenames: &[&str]) -> ManifestSnapshot {
        ManifestSnapshot {
            assets: filenames
                .iter()
                .map(|f| AssetEntry {
                    id: 0,
                    filename: (*f).into(),
                    path: format!("./crosshairs/{}", f),
                    format: None,
                    is_demo: false,
                })
                .collect(),
            version: Some("1.0".into()),
            last_updated: None,
        }
    }

    #[test]
    fn publish_applies_result_for_the_current_generation() {
        let state = Arc::new(Mutex::new(LoadState {
            generation: 3,
            phase: LoadPhase::Pending,
        }));
        publish(&state, 3, Ok(snapshot(&["a.png"])));

        let s = state.lock().unwrap();
        match &s.phase {
            LoadPhase::Ready(snap) => assert_eq!(snap.assets[0].filename, "a.png"),
            other => panic!("expected Ready, got {:?}", other),
        }
    }

    #[test]
    fn publish_discards_stale_generations() {
        let state = Arc::new(Mutex::new(LoadState {
            generation: 4,
            phase: LoadPhase::Pending,
        }));
        // A slow response from the previous request must not win.
        publish(&state, 3, Ok(snapshot(&["old.png"])));

        let s = state.lock().unwrap();
        assert!(matches!(s.phase, LoadPhase::Pending));
    }

    #[test]
    fn publish_records_failures_for_the_current_generation() {
        let state = Arc::new(Mutex::new(LoadState {
            generation: 1,
            phase: LoadPhase::Pending,
        }));
        publish(&state, 1, Err(LoadError::Status(404)));

        let s = state.lock().unwrap();
        assert!(matches!(s.phase, LoadPhase::Failed(LoadError::Status(404))));
    }
}
