//! Preview overlay state
//!
//! Owns the single "currently previewed" asset. Rendering lives in
//! main.rs next to the other overlays.

use crate::types::AssetEntry;

/// Tracks which asset the preview overlay is showing. At most one asset
/// is current; opening over an open preview replaces it, closing clears
/// it. The download trigger reads (and only reads) `current`.
#[derive(Default)]
pub struct PreviewModal {
    current: Option<AssetEntry>,
}

impl PreviewModal {
    pub fn open(&mut self, asset: AssetEntry) {
        self.current = Some(asset);
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&AssetEntry> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(filename: &str) -> AssetEntry {
        AssetEntry {
            id: 0,
            filename: filename.into(),
            path: format!("./crosshairs/{}", filename),
            format: None,
            is_demo: false,
        }
    }

    #[test]
    fn starts_closed() {
        let modal = PreviewModal::default();
        assert!(!modal.is_open());
        assert!(modal.current().is_none());
    }

    #[test]
    fn open_tracks_the_clicked_asset() {
        let mut modal = PreviewModal::default();
        modal.open(asset("crosshair1.png"));
        assert!(modal.is_open());
        assert_eq!(modal.current().unwrap().filename, "crosshair1.png");
    }

    #[test]
    fn opening_while_open_replaces_without_stacking() {
        let mut modal = PreviewModal::default();
        modal.open(asset("crosshair1.png"));
        modal.open(asset("crosshair2.png"));
        assert_eq!(modal.current().unwrap().filename, "crosshair2.png");
    }

    #[test]
    fn close_clears_the_tracked_asset() {
        let mut modal = PreviewModal::default();
        modal.open(asset("crosshair1.png"));
        modal.close();
        assert!(!modal.is_open());
        assert!(modal.current().is_none());
    }
}
