//! Stderr logger for the converter binary.
//!
//! Info records from this workspace are user-facing progress ("loaded ...",
//! "wrote ...") and print as the bare message. Every other record gets an
//! `[elapsed LEVEL target]` prefix. Records from other crates are shown only
//! at warn and above, whatever level was requested.

use std::io::Write;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

// Matches both `luma_convert` and `luma_convert_core`.
const OWN_TARGET: &str = "luma_convert";

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

impl StderrLogger {
    fn new(level: LevelFilter) -> Self {
        Self {
            level,
            started: Instant::now(),
        }
    }

    fn limit_for(&self, target: &str) -> LevelFilter {
        if target.starts_with(OWN_TARGET) {
            self.level
        } else {
            self.level.min(LevelFilter::Warn)
        }
    }

    fn line(&self, record: &Record) -> Option<String> {
        if !self.enabled(record.metadata()) {
            return None;
        }
        if record.level() == Level::Info && record.target().starts_with(OWN_TARGET) {
            return Some(record.args().to_string());
        }
        Some(format!(
            "[{:7.3}s {:>5} {}] {}",
            self.started.elapsed().as_secs_f64(),
            record.level(),
            record.target(),
            record.args()
        ))
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.limit_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if let Some(line) = self.line(record) {
            let _ = writeln!(std::io::stderr(), "{line}");
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Parse a level name such as `"debug"` or `"off"`, case-insensitively.
pub fn level_from_name(name: &str) -> Option<LevelFilter> {
    LevelFilter::from_str(name).ok()
}

/// Install the stderr logger with the provided level filter.
///
/// Calling this more than once is a no-op after the first successful
/// initialization.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| StderrLogger::new(level));
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Install a `tracing` subscriber filtered by `RUST_LOG` (default `info`).
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .flatten_event(true)
            .finish()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(logger: &StderrLogger, level: Level, target: &str, msg: &str) -> Option<String> {
        logger.line(
            &Record::builder()
                .args(format_args!("{msg}"))
                .level(level)
                .target(target)
                .build(),
        )
    }

    #[test]
    fn own_info_lines_are_bare_messages() {
        let logger = StderrLogger::new(LevelFilter::Info);
        assert_eq!(
            render(&logger, Level::Info, "luma_convert::convert", "wrote out.png").as_deref(),
            Some("wrote out.png")
        );
        assert_eq!(
            render(&logger, Level::Debug, "luma_convert_core::reduce", "x"),
            None
        );
    }

    #[test]
    fn warnings_carry_level_and_target() {
        let logger = StderrLogger::new(LevelFilter::Info);
        let line = render(&logger, Level::Warn, "luma_convert", "careful").unwrap();
        assert!(line.contains(" WARN luma_convert] careful"), "{line}");
    }

    #[test]
    fn foreign_targets_are_capped_at_warn() {
        let logger = StderrLogger::new(LevelFilter::Trace);
        assert_eq!(render(&logger, Level::Info, "png::decoder", "chunk"), None);
        assert!(render(&logger, Level::Error, "png::decoder", "bad crc").is_some());
        assert!(render(&logger, Level::Trace, "luma_convert_core::expand", "t").is_some());
    }

    #[test]
    fn level_names_parse() {
        assert_eq!(level_from_name("DEBUG"), Some(LevelFilter::Debug));
        assert_eq!(level_from_name("off"), Some(LevelFilter::Off));
        assert_eq!(level_from_name("loud"), None);
    }
}
