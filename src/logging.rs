//! Logging setup for Bandstand.
//!
//! Wires `log::` macros (emitted by sqlx and friends) into the tracing
//! pipeline and installs a global subscriber. The development profile logs to
//! stderr only; every other profile also appends INFO-and-above entries to
//! the configured log file.

use std::any::type_name_of_val;
use std::fs::OpenOptions;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::LevelFilter;
use thiserror::Error;
use tracing::Subscriber;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Registry, fmt,
    layer::{Layer, SubscriberExt},
    util::{SubscriberInitExt, TryInitError},
};

use crate::config::AppConfig;

/// Errors that can occur while initializing global logging.
#[derive(Debug, Error)]
pub enum LoggingInitError {
    #[error("failed to install log tracer bridge: {0}")]
    LogTracer(#[from] log::SetLoggerError),
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] TryInitError),
    #[error("failed to open log file: {0}")]
    LogFile(#[from] std::io::Error),
}

static LOGGING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Builds the subscriber stack for the given configuration without
/// installing it, so tests can scope it with
/// `tracing::subscriber::with_default`.
pub fn build_subscriber(
    config: &AppConfig,
) -> Result<Box<dyn Subscriber + Send + Sync>, LoggingInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let stderr_layer = if config.log_format == "json" {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };

    let file_layer = if config.is_development() {
        None
    } else {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)?;
        Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .with_filter(tracing_subscriber::filter::LevelFilter::INFO)
                .boxed(),
        )
    };

    Ok(Box::new(
        Registry::default()
            .with(filter)
            .with(stderr_layer)
            .with(file_layer),
    ))
}

/// Initialize global tracing/logging exactly once.
pub fn init_tracing(config: &AppConfig) -> Result<(), LoggingInitError> {
    if LOGGING_INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Ok(());
    }

    // Install the log bridge first so legacy `log::` macros route through
    // tracing.
    if let Err(err) = LogTracer::builder()
        .with_max_level(LevelFilter::Trace)
        .init()
    {
        // A LogTracer registered elsewhere (e.g. by tests) is fine; any other
        // logger means `log::` output would be lost.
        let logger_type = type_name_of_val(log::logger());
        if !logger_type.contains("LogTracer") {
            return Err(err.into());
        }
    }

    build_subscriber(config)?.try_init()?;
    Ok(())
}
