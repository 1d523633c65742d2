use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::common::VideoId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
    pub slug: String,
}

/// Delivery resolutions produced by the transcoding pipeline, lowest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Resolution {
    #[serde(rename = "120p")]
    P120,
    #[serde(rename = "360p")]
    P360,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
    /// The unprocessed upload.
    #[serde(rename = "original")]
    Original,
}

impl Resolution {
    /// Transcoded tiers, highest first.
    pub const TIERS: [Resolution; 4] = [Self::P1080, Self::P720, Self::P360, Self::P120];

    pub fn label(self) -> &'static str {
        match self {
            Self::P120 => "120p",
            Self::P360 => "360p",
            Self::P720 => "720p",
            Self::P1080 => "1080p",
            Self::Original => "original",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "120p" => Some(Self::P120),
            "360p" => Some(Self::P360),
            "720p" => Some(Self::P720),
            "1080p" => Some(Self::P1080),
            "original" => Some(Self::Original),
            _ => None,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoFile {
    pub id: u64,
    pub resolution: Resolution,
    pub file: String,
    pub file_size: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bitrate: Option<u64>,
    pub is_processed: bool,
}

/// Catalog entry as listed by the backend. Never mutated locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub genre: Genre,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub preview_image: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub available_resolutions: Vec<String>,
    pub created_at: String,
}

impl Video {
    pub fn created_at(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::parse(&self.created_at, &Rfc3339).ok()
    }

    /// Poster shown before playback: preview image, else thumbnail.
    pub fn poster_path(&self) -> Option<&str> {
        self.preview_image
            .as_deref()
            .or(self.thumbnail.as_deref())
            .filter(|p| !p.is_empty())
    }
}

/// A video with its playable sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDetail {
    #[serde(flatten)]
    pub video: Video,
    /// Resolution label (`"720p"`, `"original"`, ...) to source path.
    #[serde(default)]
    pub video_urls: HashMap<String, String>,
    #[serde(default)]
    pub video_files: Vec<VideoFile>,
    pub updated_at: String,
}

impl VideoDetail {
    pub fn url_for(&self, resolution: Resolution) -> Option<&str> {
        self.video_urls
            .get(resolution.label())
            .map(String::as_str)
            .filter(|u| !u.is_empty())
    }
}

impl std::ops::Deref for VideoDetail {
    type Target = Video;
    fn deref(&self) -> &Self::Target {
        &self.video
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreGroup {
    pub genre_id: u64,
    pub genre_slug: String,
    #[serde(default)]
    pub videos: Vec<Video>,
}

/// Genre display name to its videos.
pub type VideosByGenre = BTreeMap<String, GenreGroup>;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub access: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn video(id: u64, genre: &str, created_at: &str) -> Video {
        Video {
            id: VideoId(id),
            title: format!("Video {}", id),
            description: String::new(),
            genre: Genre {
                id: 1,
                name: genre.to_string(),
                slug: genre.to_lowercase(),
            },
            duration: Some(120.0),
            release_year: Some(2024),
            thumbnail: Some(format!("/media/thumbnails/{}.jpg", id)),
            preview_image: None,
            is_featured: false,
            available_resolutions: vec![],
            created_at: created_at.to_string(),
        }
    }

    pub fn detail(id: u64, urls: &[(&str, &str)]) -> VideoDetail {
        VideoDetail {
            video: video(id, "Drama", "2025-01-01T10:00:00Z"),
            video_urls: urls
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            video_files: vec![],
            updated_at: "2025-01-02T10:00:00Z".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_JSON: &str = r#"{
        "id": 3,
        "title": "Ocean Deep",
        "description": "Documentary",
        "genre": {"id": 2, "name": "Documentary", "slug": "documentary"},
        "duration": 95.5,
        "release_year": 2023,
        "thumbnail": "/media/thumbnails/3.jpg",
        "preview_image": null,
        "is_featured": true,
        "available_resolutions": ["1080p", "720p"],
        "created_at": "2025-03-01T12:00:00.123456Z",
        "video_urls": {
            "1080p": "/media/hls/3/1080p/index.m3u8",
            "720p": "/media/hls/3/720p/index.m3u8",
            "original": "/media/videos/3.mp4"
        },
        "video_files": [{
            "id": 10,
            "resolution": "720p",
            "file": "/media/hls/3/720p/index.m3u8",
            "file_size": null,
            "width": 1280,
            "height": 720,
            "bitrate": 2500000,
            "is_processed": true
        }],
        "updated_at": "2025-03-02T12:00:00Z"
    }"#;

    #[test]
    fn test_decode_video_detail() {
        let detail: VideoDetail = serde_json::from_str(DETAIL_JSON).expect("detail should decode");
        assert_eq!(detail.id, VideoId(3));
        assert_eq!(detail.genre.slug, "documentary");
        assert!(detail.is_featured);
        assert_eq!(detail.video_files[0].resolution, Resolution::P720);
        assert_eq!(detail.video_files[0].file_size, None);
        assert_eq!(
            detail.url_for(Resolution::Original),
            Some("/media/videos/3.mp4")
        );
        assert_eq!(detail.url_for(Resolution::P360), None);
        assert_eq!(detail.poster_path(), Some("/media/thumbnails/3.jpg"));
        assert!(detail.created_at().is_some());
    }

    #[test]
    fn test_decode_videos_by_genre() {
        let json = r#"{
            "Drama": {"genre_id": 1, "genre_slug": "drama", "videos": []},
            "Action": {"genre_id": 4, "genre_slug": "action", "videos": []}
        }"#;
        let by_genre: VideosByGenre = serde_json::from_str(json).unwrap();
        assert_eq!(by_genre["Action"].genre_id, 4);
        assert_eq!(by_genre.len(), 2);
    }

    #[test]
    fn test_resolution_labels() {
        for tier in Resolution::TIERS {
            assert_eq!(Resolution::from_label(tier.label()), Some(tier));
        }
        assert_eq!(Resolution::from_label("4k"), None);
        assert!(Resolution::P1080 > Resolution::P720);
    }
}
