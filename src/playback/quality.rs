use tracing::debug;

use crate::api::{Resolution, VideoDetail};

/// Visible area of the view in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Tier used when the preferred one has no source.
pub const SECONDARY_TIER: Resolution = Resolution::P720;

/// Picks the delivery tier for a viewport. First match wins:
///
/// | viewport            | tier  |
/// |---------------------|-------|
/// | >= 2560x1440        | 1080p |
/// | >= 1920x1080        | 1080p |
/// | >= 1280x720         | 720p  |
/// | min(w, h) >= 360    | 360p  |
/// | otherwise           | 120p  |
pub fn select_quality(viewport: Viewport) -> Resolution {
    let Viewport { width, height } = viewport;
    let tier = if width >= 2560 && height >= 1440 {
        Resolution::P1080
    } else if width >= 1920 && height >= 1080 {
        Resolution::P1080
    } else if width >= 1280 && height >= 720 {
        Resolution::P720
    } else if width.min(height) >= 360 {
        Resolution::P360
    } else {
        Resolution::P120
    };
    debug!("Viewport {}x{} -> {}", width, height, tier);
    tier
}

/// Source for `preferred`, falling back to the secondary tier and then to the
/// unprocessed original. Returns the tier actually used.
pub fn resolve_with_fallback(
    detail: &VideoDetail,
    preferred: Resolution,
) -> Option<(Resolution, &str)> {
    [preferred, SECONDARY_TIER, Resolution::Original]
        .into_iter()
        .find_map(|tier| detail.url_for(tier).map(|url| (tier, url)))
}

/// Source for exactly `quality`.
pub fn resolve_exact(detail: &VideoDetail, quality: Resolution) -> Option<&str> {
    detail.url_for(quality)
}

fn label_rank(label: &str) -> u8 {
    match label {
        "1080p" => 4,
        "720p" => 3,
        "360p" => 2,
        "120p" => 1,
        _ => 0,
    }
}

/// Quality labels offered to the user, best first. The original upload is
/// never listed.
pub fn available_qualities(detail: &VideoDetail) -> Vec<String> {
    let mut labels: Vec<String> = detail
        .video_urls
        .keys()
        .filter(|label| label.as_str() != Resolution::Original.label())
        .cloned()
        .collect();
    labels.sort_by(|a, b| label_rank(b).cmp(&label_rank(a)).then_with(|| a.cmp(b)));
    labels
}
