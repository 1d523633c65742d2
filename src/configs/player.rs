use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PlayerConfig {
    /// Delay between mounting the full player view and binding the engine.
    #[serde(default = "default_init_delay_ms")]
    pub init_delay_ms: u64,
    /// Same, for the preview (hero) player.
    #[serde(default = "default_preview_init_delay_ms")]
    pub preview_init_delay_ms: u64,
    /// Preview playback stops after this long.
    #[serde(default = "default_auto_pause_ms")]
    pub auto_pause_ms: u64,
    #[serde(default = "default_reinit_delay_ms")]
    pub reinit_delay_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            init_delay_ms: default_init_delay_ms(),
            preview_init_delay_ms: default_preview_init_delay_ms(),
            auto_pause_ms: default_auto_pause_ms(),
            reinit_delay_ms: default_reinit_delay_ms(),
        }
    }
}

fn default_init_delay_ms() -> u64 {
    100
}

fn default_preview_init_delay_ms() -> u64 {
    500
}

fn default_auto_pause_ms() -> u64 {
    5000
}

fn default_reinit_delay_ms() -> u64 {
    100
}
