//! Log output for the CLI.
//!
//! `minic_core` logs through the `log` facade; the subscriber installed here
//! picks those records up through tracing-subscriber's `log` bridge and
//! prints them to stderr.

use std::str::FromStr;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable consulted when `-v` is not given.
pub const LOG_ENV: &str = "MINIC_LOG";

/// Map a `-v` count onto a level filter.
pub fn level_from_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Resolve the effective level: `-v` beats `MINIC_LOG`, `--trace` forces
/// trace so per-step VM records are visible.
pub fn resolve_level(verbosity: u8, env_value: Option<&str>, trace: bool) -> LevelFilter {
    if trace {
        return LevelFilter::TRACE;
    }
    if verbosity > 0 {
        return level_from_verbosity(verbosity);
    }
    env_value
        .and_then(|value| LevelFilter::from_str(value.trim()).ok())
        .unwrap_or(LevelFilter::WARN)
}

/// Install the stderr subscriber. A second call leaves the first in place.
pub fn init(level: LevelFilter) {
    let layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(true)
        .with_level(true)
        .with_ansi(console::colors_enabled_stderr())
        .with_writer(std::io::stderr)
        .compact()
        .with_filter(level);

    if Registry::default().with(layer).try_init().is_err() {
        log::debug!("logger already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_environment() {
        assert_eq!(resolve_level(0, None, false), LevelFilter::WARN);
        assert_eq!(resolve_level(0, Some("debug"), false), LevelFilter::DEBUG);
        assert_eq!(resolve_level(1, Some("trace"), false), LevelFilter::INFO);
        assert_eq!(resolve_level(0, Some("nonsense"), false), LevelFilter::WARN);
        assert_eq!(resolve_level(0, Some("off"), false), LevelFilter::OFF);
        assert_eq!(resolve_level(3, None, false), LevelFilter::TRACE);
        assert_eq!(resolve_level(0, None, true), LevelFilter::TRACE);
    }
}
