//! Logger module
//!
//! Server lifecycle, request and access logging on top of a global
//! [`writer::LogWriter`]. Before `init()` runs, lines go straight to
//! stdout/stderr.

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::Level;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        Level::parse(&config.logging.level),
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn write(level: Level, message: &str) {
    match writer::get() {
        Some(w) => w.write(level, message),
        None if level >= Level::Warn => eprintln!("{message}"),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write(Level::Info, "======================================");
    write(Level::Info, "Wiki server started successfully");
    write(Level::Info, &format!("Listening on: http://{addr}"));
    write(Level::Info, &format!("Log level: {}", config.logging.level));
    write(
        Level::Info,
        &format!(
            "Storage: {:?} ({})",
            config.storage.backend, config.storage.data_dir
        ),
    );
    write(
        Level::Info,
        &format!("Front page: /view/{}", config.wiki.front_page),
    );
    if let Some(workers) = config.server.workers {
        write(Level::Info, &format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write(Level::Info, &format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write(Level::Info, &format!("Error log: {path}"));
    }
    write(Level::Info, "======================================\n");
}

pub fn log_config(message: &str) {
    write(Level::Info, &format!("[CONFIG] {message}"));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write(
        Level::Debug,
        &format!("[Connection] Accepted from: {peer_addr}"),
    );
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write(
        Level::Error,
        &format!("[ERROR] Failed to serve connection: {err:?}"),
    );
}

/// One line per handled wiki action
pub fn log_page_request(action: &str, title: &str) {
    write(
        Level::Info,
        &format!("[Wiki] Request received to {action} title - {title}"),
    );
}

pub fn log_invalid_path(path: &str) {
    write(
        Level::Warn,
        &format!("[WARN] Request received for an invalid path - {path}"),
    );
}

pub fn log_error(message: &str) {
    write(Level::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write(Level::Warn, &format!("[WARN] {message}"));
}

pub fn log_shutdown(message: &str) {
    write(Level::Info, &format!("[SHUTDOWN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}
