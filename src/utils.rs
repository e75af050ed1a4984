//! Utility functions

use base64::Engine;
use std::path::PathBuf;
use thiserror::Error;

/// Crosshair mark used for the window icon and the header logo.
pub const LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64"><g fill="none" stroke="#2dd4bf" stroke-width="4" stroke-linecap="round"><circle cx="32" cy="32" r="18"/><path d="M32 4v12M32 48v12M4 32h12M48 32h12"/></g><circle cx="32" cy="32" r="3" fill="#2dd4bf"/></svg>"##;

/// A decoded `data:` URI payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAsset {
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataUriError {
    #[error("not a data URI")]
    NotDataUri,
    #[error("invalid base64: {0}")]
    Base64(String),
}

/// Split a data URI into its header and the payload after the first
/// comma.
pub fn split_data_uri(uri: &str) -> Option<(&str, &str)> {
    if !uri.starts_with("data:") {
        return None;
    }
    uri.split_once(',')
}

/// MIME type named in a data URI header, e.g. `image/svg+xml`.
pub fn data_uri_mime(header: &str) -> &str {
    let rest = header.trim_start_matches("data:");
    rest.split(';').next().unwrap_or("")
}

/// Decode the base64 payload of a data URI.
pub fn decode_data_uri(uri: &str) -> Result<DecodedAsset, DataUriError> {
    let (header, payload) = split_data_uri(uri).ok_or(DataUriError::NotDataUri)?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| DataUriError::Base64(e.to_string()))?;
    Ok(DecodedAsset {
        mime: data_uri_mime(header).to_string(),
        bytes,
    })
}

/// Disk cache file name for a remote asset path. Flattens separators so
/// assets from different categories cannot collide.
pub fn cache_file_name(path: &str) -> String {
    path.trim_start_matches("./")
        .replace(['/', '\\', ':', '?', '&', '='], "_")
}

/// Rasterize SVG bytes at the given width, preserving aspect ratio.
/// Returns straight-alpha RGBA pixels. `None` on malformed SVG.
pub fn rasterize_svg(data: &[u8], width: u32) -> Option<(Vec<u8>, u32, u32)> {
    let tree = resvg::usvg::Tree::from_data(data, &resvg::usvg::Options::default()).ok()?;
    let svg_size = tree.size();
    if svg_size.width() <= 0.0 {
        return None;
    }
    let scale = width as f32 / svg_size.width();
    let height = (svg_size.height() * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height.max(1))?;
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Some((premul_to_straight(&pixmap), width, height.max(1)))
}

/// Rasterize the logo SVG to a square image (for window/taskbar icons).
pub fn rasterize_logo_square(size: u32) -> Option<(Vec<u8>, u32, u32)> {
    let tree = resvg::usvg::Tree::from_str(LOGO_SVG, &resvg::usvg::Options::default()).ok()?;
    let scale = size as f32 / tree.size().width();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size)?;
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Some((premul_to_straight(&pixmap), size, size))
}

fn premul_to_straight(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let a = p.alpha();
            if a == 0 {
                [0, 0, 0, 0]
            } else {
                let r = (p.red() as u16 * 255 / a as u16) as u8;
                let g = (p.green() as u16 * 255 / a as u16) as u8;
                let b = (p.blue() as u16 * 255 / a as u16) as u8;
                [r, g, b, a]
            }
        })
        .collect()
}

/// Get the cache directory path
pub fn get_cache_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Crosshair Gallery")
        .join("cache")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_svg_data_uri_payload_after_first_comma() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#;
        let encoded = base64::engine::general_purpose::STANDARD.encode(svg);
        let uri = format!("data:image/svg+xml;base64,{}", encoded);

        let decoded = decode_data_uri(&uri).unwrap();
        assert_eq!(decoded.mime, "image/svg+xml");
        assert_eq!(decoded.bytes, svg.as_bytes());
    }

    #[test]
    fn rejects_non_data_uri() {
        assert_eq!(
            decode_data_uri("./crosshairs/crosshair1.png"),
            Err(DataUriError::NotDataUri)
        );
        assert_eq!(decode_data_uri("data:image/png;base64"), Err(DataUriError::NotDataUri));
    }

    #[test]
    fn rejects_malformed_base64() {
        let result = decode_data_uri("data:image/svg+xml;base64,!!!not-base64!!!");
        assert!(matches!(result, Err(DataUriError::Base64(_))));
    }

    #[test]
    fn mime_parses_with_and_without_parameters() {
        assert_eq!(data_uri_mime("data:image/svg+xml;base64"), "image/svg+xml");
        assert_eq!(data_uri_mime("data:image/png"), "image/png");
    }

    #[test]
    fn cache_file_names_keep_category_distinct() {
        let a = cache_file_name("./crosshairs/crosshair1.png");
        let b = cache_file_name("./scopes/crosshair1.png");
        assert_ne!(a, b);
        assert_eq!(a, "crosshairs_crosshair1.png");
    }

    #[test]
    fn rasterizes_inline_logo() {
        let (pixels, w, h) = rasterize_logo_square(32).unwrap();
        assert_eq!((w, h), (32, 32));
        assert_eq!(pixels.len(), 32 * 32 * 4);
    }
}
