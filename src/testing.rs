//! Scripted collaborators shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::api::{ApiRequest, ApiResponse, Endpoints, HttpTransport, MediaSource, Method};
use crate::common::ApiError;
use crate::playback::{EngineError, EngineFactory, EngineOptions, MountPoint, PlaybackEngine};
use crate::routes::{Navigator, Route};

/// Transport answering from per-URL queues. Unscripted URLs get a 404; the
/// last scripted response of a queue is not repeated.
#[derive(Default)]
pub struct MockTransport {
    endpoints: Endpoints,
    scripts: Mutex<HashMap<(Option<Method>, String), VecDeque<Result<ApiResponse, ApiError>>>>,
    sent: Mutex<Vec<ApiRequest>>,
    latency: Mutex<Option<Duration>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues responses for an API path relative to the default base.
    pub fn respond(&self, method: Method, path: &str, responses: Vec<ApiResponse>) {
        let url = self.endpoints.api_url(path);
        self.scripts
            .lock()
            .entry((Some(method), url))
            .or_default()
            .extend(responses.into_iter().map(Ok));
    }

    /// Queues responses for an absolute URL and any method.
    pub fn respond_url(&self, url: &str, responses: Vec<ApiResponse>) {
        self.scripts
            .lock()
            .entry((None, url.to_string()))
            .or_default()
            .extend(responses.into_iter().map(Ok));
    }

    /// Queues a network failure for an API path.
    pub fn fail(&self, method: Method, path: &str) {
        let url = self.endpoints.api_url(path);
        self.scripts
            .lock()
            .entry((Some(method), url))
            .or_default()
            .push_back(Err(ApiError::Network("connection refused".into())));
    }

    /// Delays every response, keeping requests in flight across awaits.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = Some(latency);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.sent.lock().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        let url = self.endpoints.api_url(path);
        self.sent
            .lock()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.sent.lock().push(request.clone());
        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        let mut scripts = self.scripts.lock();
        let keyed = (Some(request.method), request.url.clone());
        let any = (None, request.url.clone());
        let queue = if scripts.contains_key(&keyed) {
            scripts.get_mut(&keyed)
        } else {
            scripts.get_mut(&any)
        };
        queue
            .and_then(|q| q.pop_front())
            .unwrap_or_else(|| Ok(ApiResponse::new(404, "")))
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().push(route);
    }
}

/// Everything a [`MockEngine`] was asked to do.
#[derive(Debug, Default, Clone)]
pub struct EngineLog {
    pub created: usize,
    pub options: Vec<EngineOptions>,
    pub sources: Vec<MediaSource>,
    pub posters: Vec<String>,
    pub seeks: Vec<f64>,
    pub plays: usize,
    pub pauses: usize,
    pub loads: usize,
    pub disposals: usize,
}

pub struct MockEngine {
    log: Arc<Mutex<EngineLog>>,
    position: f64,
    paused: bool,
    disposed: bool,
    fail_play: bool,
    killed: Arc<AtomicBool>,
}

impl PlaybackEngine for MockEngine {
    fn load(&mut self) {
        self.log.lock().loads += 1;
    }

    fn play(&mut self) -> Result<(), EngineError> {
        if self.fail_play {
            return Err(EngineError::PlaybackRejected("autoplay blocked".into()));
        }
        self.paused = false;
        self.log.lock().plays += 1;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
        self.log.lock().pauses += 1;
    }

    fn seek(&mut self, position: f64) {
        self.position = position;
        self.log.lock().seeks.push(position);
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_source(&mut self, source: &MediaSource) {
        self.log.lock().sources.push(source.clone());
    }

    fn set_poster(&mut self, url: &str) {
        self.log.lock().posters.push(url.to_string());
    }

    fn is_disposed(&self) -> bool {
        self.disposed || self.killed.load(Ordering::SeqCst)
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.log.lock().disposals += 1;
    }
}

/// Factory producing [`MockEngine`]s that share one log.
#[derive(Default)]
pub struct MockEngineFactory {
    pub log: Arc<Mutex<EngineLog>>,
    /// Position and paused state of the next engine.
    pub initial: Mutex<(f64, bool)>,
    pub fail_play: Mutex<bool>,
    killed: Arc<AtomicBool>,
}

impl MockEngineFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn log(&self) -> EngineLog {
        self.log.lock().clone()
    }

    /// Tears down every live engine behind the controller's back, as a host
    /// page navigation would.
    pub fn kill_engines(&self) {
        self.killed.store(true, Ordering::SeqCst);
    }
}

impl EngineFactory for MockEngineFactory {
    fn create(
        &self,
        _mount: &MountPoint,
        source: &MediaSource,
        options: &EngineOptions,
    ) -> Result<Box<dyn PlaybackEngine>, EngineError> {
        let mut log = self.log.lock();
        log.created += 1;
        log.options.push(options.clone());
        log.sources.push(source.clone());
        let (position, paused) = *self.initial.lock();
        self.killed.store(false, Ordering::SeqCst);
        Ok(Box::new(MockEngine {
            log: self.log.clone(),
            position,
            paused,
            disposed: false,
            fail_play: *self.fail_play.lock(),
            killed: self.killed.clone(),
        }))
    }
}
