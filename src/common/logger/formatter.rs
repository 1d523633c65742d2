use core::fmt as core_fmt;

use tracing::{Event, Subscriber};
use tracing_subscriber::{
    fmt::{
        self, FmtContext,
        format::{FormatEvent, FormatFields},
    },
    registry::LookupSpan,
};

const CRATE_PREFIX: &str = concat!(env!("CARGO_CRATE_NAME"), "::");

/// One line per event: `[time] LEVEL module: line > fields`.
pub struct CustomFormatter {
    use_ansi: bool,
}

impl CustomFormatter {
    pub fn new(use_ansi: bool) -> Self {
        Self { use_ansi }
    }
}

/// Drops the crate name from our own targets; `videoflix::auth::session`
/// prints as `auth::session`.
pub fn short_target(target: &str) -> &str {
    target.strip_prefix(CRATE_PREFIX).unwrap_or(target)
}

fn level_color(level: &tracing::Level) -> &'static str {
    match *level {
        tracing::Level::ERROR => "\x1b[31m",
        tracing::Level::WARN => "\x1b[33m",
        tracing::Level::INFO => "\x1b[32m",
        tracing::Level::DEBUG => "\x1b[34m",
        tracing::Level::TRACE => "\x1b[35m",
    }
}

impl<S, N> FormatEvent<S, N> for CustomFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: fmt::format::Writer<'_>,
        event: &Event<'_>,
    ) -> core_fmt::Result {
        let reset = if self.use_ansi { "\x1b[0m" } else { "" };
        let bold = if self.use_ansi { "\x1b[1m" } else { "" };
        let dim = if self.use_ansi { "\x1b[2m" } else { "" };

        let format = time::macros::format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
        );
        let now =
            time::OffsetDateTime::now_local().unwrap_or_else(|_| time::OffsetDateTime::now_utc());
        let timestamp = now
            .format(&format)
            .unwrap_or_else(|_| "Unknown Time".to_string());
        write!(writer, "{}[{}]{} ", dim, timestamp, reset)?;

        let metadata = event.metadata();
        let level = metadata.level();
        let level_str = format!("{: <5}", level.to_string());
        if self.use_ansi {
            write!(writer, "{}{}{}{} ", level_color(level), bold, level_str, reset)?;
        } else {
            write!(writer, "{} ", level_str)?;
        }

        let line = metadata
            .line()
            .map(|l| l.to_string())
            .unwrap_or_else(|| "??".to_string());
        write!(
            writer,
            "{}{}: {}{} > ",
            dim,
            short_target(metadata.target()),
            line,
            reset
        )?;

        ctx.format_fields(writer.by_ref(), event)?;

        write!(writer, "{}", reset)?;
        writeln!(writer)
    }
}
