use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub mod formatter;

pub use formatter::*;

use crate::configs::Config;

/// Builds the filter directive from the `[logging]` section.
pub fn filter_directive(config: &Config) -> String {
    let log_level = config
        .logging
        .as_ref()
        .and_then(|l| l.level.as_deref())
        .unwrap_or("info");

    let filters = config
        .logging
        .as_ref()
        .and_then(|l| l.filters.as_deref())
        .unwrap_or("");

    if filters.is_empty() {
        format!("{},hyper=warn,reqwest=warn", log_level)
    } else {
        format!("{},hyper=warn,reqwest=warn,{}", log_level, filters)
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over the config file.
pub fn init(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

    let use_ansi = std::io::stdout().is_terminal();
    let stdout_layer = fmt::layer()
        .event_format(CustomFormatter::new(use_ansi))
        .with_ansi(use_ansi);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .try_init();
}
