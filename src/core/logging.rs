//! Tracing subscriber setup
//!
//! One fmt layer, JSON or plain text, writing through a non-blocking
//! appender to stdout or to a daily rotated file. `RUST_LOG` wins over the
//! configured level when it is set.

use crate::core::config::LoggingConfig;
use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Owns the appender guard; pending lines are flushed when it drops
pub struct Logger {
    _guard: WorkerGuard,
}

impl Logger {
    /// Install the global subscriber described by `config`
    pub fn init(config: &LoggingConfig) -> Result<Self> {
        let level = parse_log_level(&config.level)?;
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.as_str()));

        let (writer, guard) = open_writer(config)?;
        let layer = format_layer(&config.format, writer)?
            .with_filter(filter)
            .boxed();

        tracing_subscriber::registry()
            .with(layer)
            .try_init()
            .context("A global tracing subscriber is already installed")?;

        tracing::info!(
            level = %config.level,
            format = %config.format,
            output = %config.output,
            "Logging ready"
        );

        Ok(Logger { _guard: guard })
    }
}

fn parse_log_level(level: &str) -> Result<Level> {
    Ok(match level.to_ascii_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => bail!("Unknown log level '{}'", other),
    })
}

fn open_writer(config: &LoggingConfig) -> Result<(NonBlocking, WorkerGuard)> {
    match config.output.as_str() {
        "stdout" => Ok(tracing_appender::non_blocking(std::io::stdout())),
        "file" => {
            let path = config
                .log_file
                .as_deref()
                .context("output = \"file\" needs a log_file")?;
            let (directory, filename) = split_log_path(path)?;
            std::fs::create_dir_all(directory)
                .with_context(|| format!("Cannot create log directory {}", directory.display()))?;

            let appender = tracing_appender::rolling::daily(directory, filename);
            Ok(tracing_appender::non_blocking(appender))
        }
        other => bail!("Unknown log output '{}'", other),
    }
}

fn format_layer(format: &str, writer: NonBlocking) -> Result<BoxedLayer> {
    let layer: BoxedLayer = match format {
        "json" => fmt::layer()
            .json()
            .with_writer(writer)
            .with_current_span(true)
            .with_span_list(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        "text" => fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
        other => bail!("Unknown log format '{}'", other),
    };
    Ok(layer)
}

/// Directory and file name of the log path; a bare name lives in `.`
fn split_log_path(path: &Path) -> Result<(&Path, &str)> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .context("Log file needs a UTF-8 file name")?;

    Ok((directory, filename))
}
