use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::{Endpoints, MediaSource, Resolution, VideoDetail, media_url};
use crate::common::VideoId;
use crate::configs::PlayerConfig;
use crate::playback::engine::{EngineError, EngineFactory, MountPoint, PlaybackEngine, PlayerMode};
use crate::playback::quality::{
    Viewport, available_qualities, resolve_exact, resolve_with_fallback, select_quality,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Unmounted,
    Initializing,
    Ready,
    SourceSwitching,
    Disposed,
}

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("no view mounted")]
    NotMounted,
    #[error("video {0} has no playable source")]
    NoSource(VideoId),
    #[error("controller disposed")]
    Disposed,
    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The live engine now plays this tier.
    Switched(Resolution),
    /// No live engine; a fresh one is being created.
    Reinitializing,
    /// Requested source does not exist; nothing changed.
    Unavailable,
    /// Already playing the requested tier.
    Unchanged,
    Disposed,
}

struct Inner {
    state: PlaybackState,
    mount: Option<MountPoint>,
    detail: Option<VideoDetail>,
    viewport: Viewport,
    engine: Option<Box<dyn PlaybackEngine>>,
    quality: Option<Resolution>,
    /// Bumped per scheduled init; only the latest one may run.
    init_generation: u64,
    /// Bumped per started playback; stale auto-pause timers compare against it.
    pause_generation: u64,
}

struct Shared {
    mode: PlayerMode,
    factory: Arc<dyn EngineFactory>,
    endpoints: Endpoints,
    config: PlayerConfig,
    cancel: CancellationToken,
    inner: Mutex<Inner>,
}

/// Owns one media engine bound to one view.
///
/// Timers (delayed init, preview auto-pause, re-init) run on the ambient tokio
/// runtime and are cancelled on [`dispose`](Self::dispose). Dropping the
/// controller disposes it.
pub struct PlaybackController {
    shared: Arc<Shared>,
}

impl PlaybackController {
    pub fn new(
        mode: PlayerMode,
        factory: Arc<dyn EngineFactory>,
        endpoints: Endpoints,
        config: PlayerConfig,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                mode,
                factory,
                endpoints,
                config,
                cancel: CancellationToken::new(),
                inner: Mutex::new(Inner {
                    state: PlaybackState::Unmounted,
                    mount: None,
                    detail: None,
                    viewport: Viewport::default(),
                    engine: None,
                    quality: None,
                    init_generation: 0,
                    pause_generation: 0,
                }),
            }),
        }
    }

    pub fn mode(&self) -> PlayerMode {
        self.shared.mode
    }

    pub fn state(&self) -> PlaybackState {
        self.shared.inner.lock().state
    }

    pub fn current_quality(&self) -> Option<Resolution> {
        self.shared.inner.lock().quality
    }

    /// Quality labels the current video offers, best first.
    pub fn available_qualities(&self) -> Vec<String> {
        self.shared
            .inner
            .lock()
            .detail
            .as_ref()
            .map(available_qualities)
            .unwrap_or_default()
    }

    /// Binds the view and schedules engine creation after the mode's
    /// initialization delay.
    pub fn mount(&self, mount: MountPoint, detail: VideoDetail, viewport: Viewport) {
        let shared = &self.shared;
        let mut inner = shared.inner.lock();
        if inner.state == PlaybackState::Disposed {
            return;
        }
        inner.mount = Some(mount);
        inner.detail = Some(detail);
        inner.viewport = viewport;
        inner.state = PlaybackState::Initializing;

        let delay = match shared.mode {
            PlayerMode::Preview => shared.config.preview_init_delay_ms,
            PlayerMode::Full => shared.config.init_delay_ms,
        };
        shared.schedule_init(&mut inner, Duration::from_millis(delay), None);
    }

    /// Creates the engine now instead of waiting for the scheduled start.
    pub fn initialize(&self) -> Result<Resolution, PlaybackError> {
        self.shared.initialize(None)
    }

    /// Viewport used by the next quality decision.
    pub fn set_viewport(&self, viewport: Viewport) {
        self.shared.inner.lock().viewport = viewport;
    }

    /// Switches to another video on the same engine.
    pub fn swap_video(&self, detail: VideoDetail) -> SwapOutcome {
        let shared = &self.shared;
        let mut guard = shared.inner.lock();
        let inner = &mut *guard;
        if inner.state == PlaybackState::Disposed {
            return SwapOutcome::Disposed;
        }

        let preferred = select_quality(inner.viewport);
        let Some((tier, source)) = resolve_with_fallback(&detail, preferred)
            .and_then(|(tier, path)| Some((tier, MediaSource::from_path(&shared.endpoints, path)?)))
        else {
            warn!("Video {} has no playable source, keeping current one", detail.id);
            return SwapOutcome::Unavailable;
        };

        let poster = media_url(&shared.endpoints, detail.poster_path());
        inner.detail = Some(detail);
        shared.swap_source(inner, tier, source, poster)
    }

    /// Switches to exactly `quality`; there is no fallback for a user choice.
    pub fn change_quality(&self, quality: Resolution) -> SwapOutcome {
        let shared = &self.shared;
        let mut guard = shared.inner.lock();
        let inner = &mut *guard;
        if inner.state == PlaybackState::Disposed {
            return SwapOutcome::Disposed;
        }

        let engine_live = inner.engine.as_ref().is_some_and(|e| !e.is_disposed());
        if engine_live && inner.quality == Some(quality) {
            return SwapOutcome::Unchanged;
        }

        let Some(source) = inner
            .detail
            .as_ref()
            .and_then(|detail| resolve_exact(detail, quality))
            .and_then(|path| MediaSource::from_path(&shared.endpoints, path))
        else {
            warn!("Quality {} is not available", quality);
            return SwapOutcome::Unavailable;
        };

        shared.swap_source(inner, quality, source, None)
    }

    /// Releases the engine and cancels pending timers. Safe to call repeatedly.
    pub fn dispose(&self) {
        self.shared.dispose();
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.shared.dispose();
    }
}

impl Shared {
    fn initialize(self: &Arc<Self>, forced: Option<Resolution>) -> Result<Resolution, PlaybackError> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        if inner.state == PlaybackState::Disposed {
            return Err(PlaybackError::Disposed);
        }
        let (Some(mount), Some(detail)) = (inner.mount.clone(), inner.detail.as_ref()) else {
            inner.state = PlaybackState::Unmounted;
            return Err(PlaybackError::NotMounted);
        };

        let resolved = match forced {
            Some(quality) => resolve_exact(detail, quality).map(|path| (quality, path)),
            None => resolve_with_fallback(detail, select_quality(inner.viewport)),
        };
        let Some((tier, source)) = resolved
            .and_then(|(tier, path)| Some((tier, MediaSource::from_path(&self.endpoints, path)?)))
        else {
            inner.state = PlaybackState::Unmounted;
            return Err(PlaybackError::NoSource(detail.id));
        };
        let options = self
            .mode
            .engine_options(media_url(&self.endpoints, detail.poster_path()));

        if let Some(mut old) = inner.engine.take() {
            if !old.is_disposed() {
                old.dispose();
            }
        }

        inner.state = PlaybackState::Initializing;
        let mut engine = match self.factory.create(&mount, &source, &options) {
            Ok(engine) => engine,
            Err(e) => {
                inner.state = PlaybackState::Unmounted;
                return Err(e.into());
            }
        };

        let started = self.mode == PlayerMode::Preview && start(&mut *engine);
        debug!("Engine ready on {:?} at {}", mount, tier);
        inner.engine = Some(engine);
        inner.quality = Some(tier);
        inner.state = PlaybackState::Ready;
        if started {
            self.schedule_auto_pause(inner);
        }
        Ok(tier)
    }

    /// Replaces the source of the live engine, keeping position and paused
    /// state. Without a live engine a re-init is scheduled instead.
    fn swap_source(
        self: &Arc<Self>,
        inner: &mut Inner,
        tier: Resolution,
        source: MediaSource,
        poster: Option<String>,
    ) -> SwapOutcome {
        let Some(engine) = inner.engine.as_mut().filter(|e| !e.is_disposed()) else {
            debug!("No live engine, re-initializing at {}", tier);
            inner.engine = None;
            inner.state = PlaybackState::Initializing;
            let delay = Duration::from_millis(self.config.reinit_delay_ms);
            self.schedule_init(inner, delay, Some(tier));
            return SwapOutcome::Reinitializing;
        };

        let position = engine.position();
        let was_paused = engine.is_paused();
        inner.state = PlaybackState::SourceSwitching;

        engine.set_source(&source);
        if let Some(poster) = poster.as_deref() {
            engine.set_poster(poster);
        }
        engine.load();
        engine.seek(position);
        let resumed = !was_paused && start(&mut **engine);

        debug!("Switched to {} at {:.1}s (paused={})", tier, position, was_paused);
        inner.state = PlaybackState::Ready;
        inner.quality = Some(tier);
        if resumed && self.mode == PlayerMode::Preview {
            self.schedule_auto_pause(inner);
        }
        SwapOutcome::Switched(tier)
    }

    fn schedule_init(
        self: &Arc<Self>,
        inner: &mut Inner,
        delay: Duration,
        forced: Option<Resolution>,
    ) {
        inner.init_generation += 1;
        let generation = inner.init_generation;
        self.after(delay, move |shared| {
            {
                let inner = shared.inner.lock();
                if inner.init_generation != generation
                    || inner.state != PlaybackState::Initializing
                {
                    return;
                }
            }
            if let Err(e) = shared.initialize(forced) {
                warn!("Player initialization failed: {}", e);
            }
        });
    }

    fn schedule_auto_pause(self: &Arc<Self>, inner: &mut Inner) {
        inner.pause_generation += 1;
        let generation = inner.pause_generation;
        let delay = Duration::from_millis(self.config.auto_pause_ms);
        self.after(delay, move |shared| {
            let mut inner = shared.inner.lock();
            if inner.pause_generation != generation {
                return;
            }
            if let Some(engine) = inner.engine.as_mut().filter(|e| !e.is_disposed()) {
                debug!("Preview auto-pause");
                engine.pause();
            }
        });
    }

    /// Runs `task` after `delay` unless the controller is disposed first.
    fn after<F>(self: &Arc<Self>, delay: Duration, task: F)
    where
        F: FnOnce(&Arc<Shared>) + Send + 'static,
    {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime, dropping player timer");
            return;
        };
        let weak: Weak<Shared> = Arc::downgrade(self);
        let cancel = self.cancel.clone();
        handle.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if let Some(shared) = weak.upgrade() {
                        task(&shared);
                    }
                }
            }
        });
    }

    fn dispose(&self) {
        self.cancel.cancel();
        let mut inner = self.inner.lock();
        if inner.state == PlaybackState::Disposed {
            return;
        }
        if let Some(mut engine) = inner.engine.take() {
            if !engine.is_disposed() {
                engine.dispose();
            }
        }
        inner.state = PlaybackState::Disposed;
        debug!("Player disposed");
    }
}

fn start(engine: &mut dyn PlaybackEngine) -> bool {
    match engine.play() {
        Ok(()) => true,
        Err(e) => {
            warn!("Playback did not start: {}", e);
            false
        }
    }
}
