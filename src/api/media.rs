use crate::api::Endpoints;

pub const HLS_MIME: &str = "application/x-mpegURL";
pub const MP4_MIME: &str = "video/mp4";

/// Turns a server-relative media path into a fetchable URL.
///
/// `None`/empty stays `None`; absolute `http(s)` URLs are returned unchanged.
pub fn media_url(endpoints: &Endpoints, path: Option<&str>) -> Option<String> {
    let path = path?.trim();
    if path.is_empty() {
        return None;
    }
    if path.starts_with("http://") || path.starts_with("https://") {
        return Some(path.to_string());
    }
    let path = path.strip_prefix('/').unwrap_or(path);
    Some(format!("{}{}", endpoints.media_origin(), path))
}

/// A playable source handed to the playback engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    pub url: String,
    pub mime: &'static str,
}

impl MediaSource {
    /// Builds a source from a server path; the MIME type follows the raw
    /// path (HLS playlists end in `.m3u8`).
    pub fn from_path(endpoints: &Endpoints, path: &str) -> Option<Self> {
        let url = media_url(endpoints, Some(path))?;
        let mime = if path.trim().ends_with(".m3u8") {
            HLS_MIME
        } else {
            MP4_MIME
        };
        Some(Self { url, mime })
    }
}
