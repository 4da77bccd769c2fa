//! Structured logging setup
//!
//! Every decision the router makes is emitted as a `tracing` event with
//! structured fields. This module wires those events to stdout:
//! - JSON for production, pretty-print for development
//! - `RUST_LOG` wins over the configured level when set
//! - Optional async buffered output through `tracing_appender`

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Write through a background thread instead of blocking the caller
    pub async_logging: bool,
    /// Extra filter directives (comma-separated, `EnvFilter` syntax)
    pub target_filter: Option<String>,
    /// Include file:line location (dev only)
    pub include_location: bool,
}

impl LogConfig {
    /// Parse configuration from `TREEROUTE_LOG_*` environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("TREEROUTE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: LogFormat::parse(
                &env::var("TREEROUTE_LOG_FORMAT").unwrap_or_else(|_| "json".to_string()),
            ),
            async_logging: env::var("TREEROUTE_LOG_ASYNC")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
            target_filter: env::var("TREEROUTE_LOG_TARGET_FILTER").ok(),
            include_location: env::var("TREEROUTE_LOG_INCLUDE_LOCATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        }
    }

    /// Verbose, synchronous, human-readable output
    #[must_use]
    pub fn default_dev() -> Self {
        Self {
            log_level: "debug".to_string(),
            format: LogFormat::Pretty,
            async_logging: false,
            target_filter: None,
            include_location: true,
        }
    }

    #[must_use]
    pub fn default_prod() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Json,
            async_logging: true,
            target_filter: None,
            include_location: false,
        }
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// Build the `EnvFilter` for `config`.
///
/// `RUST_LOG` replaces the configured level when present. `may_minihttp`
/// connection noise is held at `warn`.
///
/// # Errors
///
/// Returns an error if a built-in directive fails to parse.
pub fn build_env_filter(config: &LogConfig) -> Result<EnvFilter> {
    let mut env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level().as_str()));

    env_filter = env_filter.add_directive(
        "may_minihttp=warn"
            .parse()
            .context("Invalid built-in log directive")?,
    );

    if let Some(target_filter) = &config.target_filter {
        for filter in target_filter.split(',').map(str::trim) {
            if filter.is_empty() {
                continue;
            }
            match filter.parse() {
                Ok(directive) => env_filter = env_filter.add_directive(directive),
                Err(_) => eprintln!("Warning: Invalid log filter directive: {filter}"),
            }
        }
    }
    Ok(env_filter)
}

fn fmt_layer<S, W>(config: &LogConfig, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_span_list(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
    }
}

/// Install the global subscriber described by `config`
///
/// ```no_run
/// use treeroute::logging::{init_logging_with_config, LogConfig};
///
/// init_logging_with_config(&LogConfig::from_env()).expect("logging");
/// ```
///
/// # Errors
///
/// Returns an error when a global subscriber is already installed.
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(build_env_filter(config)?);

    if config.async_logging {
        let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());
        registry
            .with(fmt_layer(config, non_blocking))
            .try_init()
            .context("Failed to initialize async logging")?;
        // Flushing stops when the guard drops; keep it for the process lifetime
        std::mem::forget(guard);
    } else {
        registry
            .with(fmt_layer(config, std::io::stdout))
            .try_init()
            .context("Failed to initialize sync logging")?;
    }
    Ok(())
}

/// Install a subscriber configured from the environment
///
/// # Errors
///
/// See [`init_logging_with_config`].
pub fn init_logging() -> Result<()> {
    init_logging_with_config(&LogConfig::from_env())
}
