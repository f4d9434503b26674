//! Logging setup for the opskit binary.
//!
//! Invariants:
//! - Logs go to stderr so command output on stdout stays machine-readable.
//! - `RUST_LOG`, when set, overrides `--log-level`.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::args::LogLevel;

impl LogLevel {
    /// Maps the CLI level names onto tracing levels.
    ///
    /// `critical` has no tracing equivalent and maps to `error`; `default` is `info`.
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info | LogLevel::Default => LevelFilter::INFO,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Error | LogLevel::Critical => LevelFilter::ERROR,
        }
    }
}

pub fn init(level: LogLevel) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.as_filter().into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
