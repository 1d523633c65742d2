use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::{ApiClient, ApiRequest, Genre, Video, VideoDetail, VideosByGenre};
use crate::catalog::sections::{Section, sections};
use crate::common::{ApiError, VideoId};

/// Catalog endpoints plus the last-fetched state as watchable cells.
///
/// A failed fetch leaves the corresponding cell untouched.
pub struct CatalogService {
    api: Arc<ApiClient>,
    videos: watch::Sender<Vec<Video>>,
    videos_by_genre: watch::Sender<VideosByGenre>,
    featured: watch::Sender<Option<VideoDetail>>,
    genres: watch::Sender<Vec<Genre>>,
    loading: watch::Sender<bool>,
    in_flight: AtomicUsize,
}

/// Keeps `loading` raised while at least one fetch is running.
struct LoadingGuard<'a> {
    service: &'a CatalogService,
}

impl<'a> LoadingGuard<'a> {
    fn new(service: &'a CatalogService) -> Self {
        if service.in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            service.loading.send_replace(true);
        }
        Self { service }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.service.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.service.loading.send_replace(false);
        }
    }
}

impl CatalogService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            videos: watch::Sender::new(Vec::new()),
            videos_by_genre: watch::Sender::new(VideosByGenre::new()),
            featured: watch::Sender::new(None),
            genres: watch::Sender::new(Vec::new()),
            loading: watch::Sender::new(false),
            in_flight: AtomicUsize::new(0),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let _loading = LoadingGuard::new(self);
        let url = self.api.url(path);
        let result = match self.api.send(ApiRequest::get(url)).await {
            Ok(response) => response.decode(),
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            warn!("GET {} failed: {}", path, e);
        }
        result
    }

    pub async fn list_videos(&self) -> Result<Vec<Video>, ApiError> {
        let videos: Vec<Video> = self.get("videos/").await?;
        debug!("Loaded {} videos", videos.len());
        self.videos.send_replace(videos.clone());
        Ok(videos)
    }

    /// One video with its sources. Does not touch any cell.
    pub async fn video(&self, id: VideoId) -> Result<VideoDetail, ApiError> {
        self.get(&format!("videos/{}/", id)).await
    }

    pub async fn videos_by_genre(&self) -> Result<VideosByGenre, ApiError> {
        let by_genre: VideosByGenre = self.get("videos/by_genre/").await?;
        self.videos_by_genre.send_replace(by_genre.clone());
        Ok(by_genre)
    }

    pub async fn featured_video(&self) -> Result<VideoDetail, ApiError> {
        let detail: VideoDetail = self.get("videos/featured/").await?;
        self.featured.send_replace(Some(detail.clone()));
        Ok(detail)
    }

    pub async fn genres(&self) -> Result<Vec<Genre>, ApiError> {
        let genres: Vec<Genre> = self.get("genres/").await?;
        self.genres.send_replace(genres.clone());
        Ok(genres)
    }

    /// Free-text search. Results are returned, not stored.
    pub async fn search(&self, query: &str) -> Result<Vec<Video>, ApiError> {
        self.get(&format!("videos/?search={}", urlencoding::encode(query)))
            .await
    }

    pub fn set_featured(&self, detail: VideoDetail) {
        self.featured.send_replace(Some(detail));
    }

    /// Loads `id` and makes it the featured video.
    pub async fn feature(&self, id: VideoId) -> Result<VideoDetail, ApiError> {
        let detail = self.video(id).await?;
        self.set_featured(detail.clone());
        Ok(detail)
    }

    /// Fetches the featured video and the genre rows concurrently. Each half
    /// fails on its own; the first error, if any, is returned.
    pub async fn load_home(&self) -> Result<(), ApiError> {
        let (featured, by_genre) =
            futures::future::join(self.featured_video(), self.videos_by_genre()).await;
        featured.and(by_genre).map(|_| ())
    }

    pub fn sections(&self) -> Vec<Section> {
        sections(&self.videos_by_genre.borrow())
    }

    pub fn featured(&self) -> Option<VideoDetail> {
        self.featured.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn watch_videos(&self) -> watch::Receiver<Vec<Video>> {
        self.videos.subscribe()
    }

    pub fn watch_videos_by_genre(&self) -> watch::Receiver<VideosByGenre> {
        self.videos_by_genre.subscribe()
    }

    pub fn watch_featured(&self) -> watch::Receiver<Option<VideoDetail>> {
        self.featured.subscribe()
    }

    pub fn watch_genres(&self) -> watch::Receiver<Vec<Genre>> {
        self.genres.subscribe()
    }

    pub fn watch_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }
}
