//! Logger module
//!
//! Provides logging utilities for the translation service including:
//! - Subscriber setup from the `[logging]` section
//! - Server lifecycle logging
//! - Request and error logging

use std::fs::{File, OpenOptions};
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{AppState, LoggingConfig};

/// Initialize the global subscriber
///
/// Should be called once at application startup. `RUST_LOG` takes
/// precedence over `logging.level`.
pub fn init(config: &LoggingConfig) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    let installed = match config.log_file.as_deref() {
        Some(path) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(open_log_file(path)?))
            .try_init(),
        None => builder.with_writer(io::stderr).try_init(),
    };

    installed.map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e.to_string()))
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

pub fn log_server_start(addr: &SocketAddr, state: &AppState, base_url: &str) {
    let config = &state.config;
    info!("======================================");
    info!("Frontend translations service started");
    info!("Listening on: http://{addr}");
    info!("Translation base URL: {base_url}");
    info!("Fetch timeout: {:?}", state.fetcher.timeout());
    info!("Log level: {}", config.logging.level);
    if let Some(workers) = config.server.workers {
        info!("Worker threads: {workers}");
    }
    if state.store.is_enabled() {
        info!("Metadata storage: {}", state.store.path().display());
    } else {
        info!("Metadata storage: disabled (memory only)");
    }
    if let Some(ref path) = config.logging.log_file {
        info!("Log file: {path}");
    }
    info!("======================================");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    error!("Failed to serve connection: {err:?}");
}

pub fn log_info(message: &str) {
    info!("{message}");
}

pub fn log_debug(message: &str) {
    debug!("{message}");
}

pub fn log_error(message: &str) {
    error!("{message}");
}

pub fn log_warning(message: &str) {
    warn!("{message}");
}

pub fn log_api_request(method: &str, path: &str, status: u16) {
    info!("[API] {method} {path} - {status}");
}

pub fn log_command(id: u64, command_type: &str, success: bool) {
    info!(id, success, "[Command] {command_type}");
}

pub fn log_shutdown() {
    info!("Shutdown signal received, no longer accepting connections");
}
