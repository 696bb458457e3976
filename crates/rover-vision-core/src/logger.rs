//! Stderr logger for the perception crates.
//!
//! Lines look like `[  1.204s DEBUG pipeline] message`: seconds since the
//! logger was installed, the level, and the last path segment of the module
//! that emitted the record. The level comes from the caller or, through
//! [`init_from_env`], from the `ROVER_VISION_LOG` variable.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable read by [`init_from_env`].
pub const LOG_ENV: &str = "ROVER_VISION_LOG";

#[cfg(feature = "tracing")]
const DEFAULT_TRACE_FILTER: &str = "warn,rover_vision=info,rover_vision_core=info";

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

/// `rover_vision::pipeline` -> `pipeline`.
fn module_name(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

/// Level named by `raw`, or `default` when it is missing or unrecognised.
fn parse_level(raw: Option<&str>, default: LevelFilter) -> LevelFilter {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let secs = self.started.elapsed().as_secs_f64();
        let module = module_name(record.target());
        let _ = writeln!(
            std::io::stderr().lock(),
            "[{secs:7.3}s {:>5} {module}] {}",
            record.level(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger at `level`.
///
/// The first call wins; later calls keep the installed level and return
/// `Ok(())`.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    let mut fresh = false;
    let logger = LOGGER.get_or_init(|| {
        fresh = true;
        StderrLogger {
            level,
            started: Instant::now(),
        }
    });
    if fresh {
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Install the stderr logger at the level named by `ROVER_VISION_LOG`
/// (`error` .. `trace`, or `off`), falling back to `default`.
pub fn init_from_env(default: LevelFilter) -> Result<(), log::SetLoggerError> {
    let raw = std::env::var(LOG_ENV).ok();
    init_with_level(parse_level(raw.as_deref(), default))
}

/// Install a `tracing` subscriber. `RUST_LOG` overrides the default filter,
/// which shows `info` from the perception crates and `warn` from the rest.
///
/// Span close events are emitted so each `perceive` span reports its
/// duration. `json` selects flattened JSON lines over the human format.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TRACE_FILTER));
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE);
    let _ = if json {
        subscriber.json().flatten_event(true).finish().try_init()
    } else {
        subscriber
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_name_keeps_last_segment() {
        assert_eq!(module_name("rover_vision::pipeline"), "pipeline");
        assert_eq!(module_name("rover_vision_core::logger"), "logger");
        assert_eq!(module_name("perceive_frame"), "perceive_frame");
    }

    #[test]
    fn level_falls_back_on_missing_or_bad_values() {
        assert_eq!(parse_level(Some("debug"), LevelFilter::Info), LevelFilter::Debug);
        assert_eq!(parse_level(Some(" TRACE "), LevelFilter::Info), LevelFilter::Trace);
        assert_eq!(parse_level(Some("off"), LevelFilter::Info), LevelFilter::Off);
        assert_eq!(parse_level(Some("loud"), LevelFilter::Warn), LevelFilter::Warn);
        assert_eq!(parse_level(None, LevelFilter::Error), LevelFilter::Error);
    }

    #[test]
    fn repeated_init_is_a_no_op() {
        init_with_level(LevelFilter::Warn).expect("first install");
        init_with_level(LevelFilter::Trace).expect("second call");
        init_from_env(LevelFilter::Trace).expect("third call");
        assert_eq!(LOGGER.get().map(|l| l.level), Some(LevelFilter::Warn));
    }
}
