//! Log output for the API server.
//!
//! `RUST_LOG` wins when set. Otherwise the Blogify crates log at debug and
//! everything else at info. `LOG_FORMAT` picks `pretty`, `compact` or `json`.

use std::str::FromStr;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DIRECTIVES: &str =
    "info,api_server=debug,blogify_core=debug,blogify_infra=debug,sqlx=warn";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    /// One object per line, with the enclosing request span (and its request id) attached.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    pub format: LogFormat,
    /// A `LOG_FORMAT` value that did not parse, reported once logging is up.
    rejected_format: Option<String>,
}

impl TelemetryConfig {
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT") {
            Ok(raw) => Self::from_raw(&raw),
            Err(_) => Self::default(),
        }
    }

    fn from_raw(raw: &str) -> Self {
        match raw.parse() {
            Ok(format) => Self {
                format,
                rejected_format: None,
            },
            Err(_) => Self {
                format: LogFormat::default(),
                rejected_format: Some(raw.to_string()),
            },
        }
    }
}

/// Install the global subscriber. Call before anything logs.
pub fn init_telemetry(config: &TelemetryConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .init(),
    }

    if let Some(raw) = &config.rejected_format {
        tracing::warn!(log_format = %raw, "Unknown LOG_FORMAT, using pretty output");
    }
    tracing::debug!(format = ?config.format, "Logging initialised");
}
