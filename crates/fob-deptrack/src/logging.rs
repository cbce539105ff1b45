//! Subscriber setup for binaries embedding the tracker.
//!
//! Only available with the `logging` feature. The library itself emits
//! `tracing` events and never installs a subscriber on its own.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Verbosity applied to each configured target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Silent,
    Error,
    /// Isolated failures show up at this level.
    #[default]
    Warn,
    Info,
    /// Pass summaries and persistence.
    Debug,
    /// Every record and ignore check.
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Silent => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How [`init_logging`] builds the global subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LogLevel,
    /// Crate targets the level applies to; everything else stays off.
    pub targets: Vec<String>,
    /// Emit ANSI colors.
    pub ansi: bool,
    /// Let a valid `RUST_LOG` replace the level-derived directives.
    pub use_env: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            targets: vec!["fob_deptrack".to_string()],
            ansi: true,
            use_env: true,
        }
    }
}

impl LogConfig {
    /// `target=level` directives joined with commas.
    pub fn directives(&self) -> String {
        self.targets
            .iter()
            .map(|target| format!("{}={}", target, self.level))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn env_filter(&self) -> EnvFilter {
        if self.use_env {
            if let Ok(filter) = EnvFilter::try_from_default_env() {
                return filter;
            }
        }
        EnvFilter::new(self.directives())
    }
}

/// Install a compact stderr subscriber for `config`.
///
/// Returns `false` when a global subscriber was already set; the existing one
/// stays in place.
///
/// ```rust,no_run
/// use fob_deptrack::logging::{LogConfig, LogLevel, init_logging};
///
/// init_logging(&LogConfig {
///     level: LogLevel::Debug,
///     ..LogConfig::default()
/// });
/// ```
pub fn init_logging(config: &LogConfig) -> bool {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(config.ansi)
        .compact();

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_cover_every_target() {
        let config = LogConfig {
            level: LogLevel::Debug,
            targets: vec!["fob_deptrack".into(), "fob_deptrack_cli".into()],
            ansi: false,
            use_env: false,
        };
        assert_eq!(
            config.directives(),
            "fob_deptrack=debug,fob_deptrack_cli=debug"
        );
        assert!(config.env_filter().to_string().contains("fob_deptrack_cli=debug"));
    }

    #[test]
    fn silent_turns_targets_off() {
        let config = LogConfig {
            level: LogLevel::Silent,
            use_env: false,
            ..LogConfig::default()
        };
        assert_eq!(config.directives(), "fob_deptrack=off");
    }

    #[test]
    fn second_install_is_refused() {
        let config = LogConfig {
            ansi: false,
            use_env: false,
            ..LogConfig::default()
        };
        init_logging(&config);
        assert!(!init_logging(&config));
    }
}
