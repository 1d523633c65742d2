use crate::api::MediaSource;

/// Playback speeds offered by the full player.
pub const PLAYBACK_RATES: [f32; 4] = [0.5, 1.0, 1.5, 2.0];

#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("engine could not be created: {0}")]
    Create(String),
    /// The platform refused to start playback (autoplay policy and similar).
    #[error("playback rejected: {0}")]
    PlaybackRejected(String),
}

/// Identifies the view element an engine renders into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint(pub String);

impl From<&str> for MountPoint {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Which surface the controller is driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerMode {
    /// Muted hero teaser on the catalog page, no controls, pauses itself.
    Preview,
    /// The full video page.
    Full,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    pub controls: bool,
    pub autoplay: bool,
    pub muted: bool,
    pub fluid: bool,
    pub poster: Option<String>,
    pub playback_rates: Vec<f32>,
}

impl PlayerMode {
    pub fn engine_options(self, poster: Option<String>) -> EngineOptions {
        match self {
            Self::Preview => EngineOptions {
                controls: false,
                autoplay: true,
                muted: true,
                fluid: true,
                poster,
                playback_rates: Vec::new(),
            },
            Self::Full => EngineOptions {
                controls: true,
                autoplay: true,
                muted: false,
                fluid: true,
                poster,
                playback_rates: PLAYBACK_RATES.to_vec(),
            },
        }
    }
}

/// Capabilities the controller needs from a media engine. Implemented by the
/// host platform's player.
pub trait PlaybackEngine: Send {
    fn load(&mut self);
    fn play(&mut self) -> Result<(), EngineError>;
    fn pause(&mut self);
    fn seek(&mut self, position: f64);
    /// Current position in seconds.
    fn position(&self) -> f64;
    fn is_paused(&self) -> bool;
    fn set_source(&mut self, source: &MediaSource);
    fn set_poster(&mut self, url: &str);
    /// True once the engine is torn down, by us or by the host.
    fn is_disposed(&self) -> bool;
    fn dispose(&mut self);
}

pub trait EngineFactory: Send + Sync {
    fn create(
        &self,
        mount: &MountPoint,
        source: &MediaSource,
        options: &EngineOptions,
    ) -> Result<Box<dyn PlaybackEngine>, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_options() {
        let preview = PlayerMode::Preview.engine_options(None);
        assert!(preview.muted && preview.autoplay && !preview.controls);
        assert!(preview.playback_rates.is_empty());

        let full = PlayerMode::Full.engine_options(Some("http://x/p.jpg".into()));
        assert!(full.controls && !full.muted);
        assert_eq!(full.playback_rates, vec![0.5, 1.0, 1.5, 2.0]);
        assert_eq!(full.poster.as_deref(), Some("http://x/p.jpg"));
    }
}
