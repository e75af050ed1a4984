//! Reusable UI components
//!
//! Standalone helpers shared by the gallery cards and the footer.

use crate::types::AssetEntry;

/// Uppercased format badge for a gallery card, e.g. "PNG".
pub fn format_badge(asset: &AssetEntry) -> Option<String> {
    asset
        .format
        .as_ref()
        .filter(|f| !f.is_empty())
        .map(|f| f.to_uppercase())
}

/// Human-readable date from a manifest `last_updated` stamp. The
/// generator writes naive ISO timestamps; RFC 3339 is accepted too.
pub fn format_updated(ts: &str) -> Option<String> {
    chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(ts)
                .ok()
                .map(|t| t.naive_utc())
        })
        .map(|t| t.format("%b %e, %Y").to_string())
}

/// Shorten a filename for the card caption.
pub fn truncate_name(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        name.to_string()
    } else {
        let head: String = name.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AssetEntry;

    fn asset(format: Option<&str>) -> AssetEntry {
        AssetEntry {
            id: 0,
            filename: "crosshair1.png".into(),
            path: "./crosshairs/crosshair1.png".into(),
            format: format.map(String::from),
            is_demo: false,
        }
    }

    #[test]
    fn format_badge_uppercases_and_skips_empty() {
        assert_eq!(format_badge(&asset(Some("png"))).as_deref(), Some("PNG"));
        assert_eq!(format_badge(&asset(Some(""))), None);
        assert_eq!(format_badge(&asset(None)), None);
    }

    #[test]
    fn format_updated_accepts_generator_and_rfc3339_stamps() {
        assert_eq!(
            format_updated("2024-03-01T12:34:56.789012").as_deref(),
            Some("Mar  1, 2024")
        );
        assert!(format_updated("2024-03-01T12:34:56+00:00").is_some());
        assert_eq!(format_updated("yesterday"), None);
    }

    #[test]
    fn truncate_name_keeps_short_names_intact() {
        assert_eq!(truncate_name("a.png", 20), "a.png");
        let long = "very-long-crosshair-filename.png";
        let out = truncate_name(long, 12);
        assert!(out.chars().count() <= 12);
        assert!(out.ends_with('…'));
    }
}
