use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FlowsConfig {
    /// Delay before redirecting to the login page after registration,
    /// activation or password reset.
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,
}

impl Default for FlowsConfig {
    fn default() -> Self {
        Self {
            redirect_delay_ms: default_redirect_delay_ms(),
        }
    }
}

fn default_redirect_delay_ms() -> u64 {
    3000
}
