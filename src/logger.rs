//! Channel-backed `log` backend.
//!
//! The crate itself only uses the `log` macros. Hosts that want the records
//! delivered to their UI (a console pane, a status bar) install this backend
//! with [`init_logger`] and drain the receiver on their own schedule.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::mpsc::Sender;
use std::time::{SystemTime, UNIX_EPOCH};

// Bitflags for log levels
pub const LOG_LEVEL_ERROR: u8 = 1;
pub const LOG_LEVEL_WARN: u8 = 2;
pub const LOG_LEVEL_INFO: u8 = 4;
pub const LOG_LEVEL_TRACE: u8 = 8;

pub const LOG_LEVEL_NONE: u8 = 0;
pub const LOG_LEVEL_ALL: u8 = LOG_LEVEL_ERROR | LOG_LEVEL_WARN | LOG_LEVEL_INFO | LOG_LEVEL_TRACE;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error = 1,
    Warning = 2,
    Info = 4,
    Trace = 8,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Trace => "TRACE",
        }
    }

    /// Debug and trace records share the trace bit.
    fn from_log(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warning,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug | log::Level::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: u64,
    pub level: LogLevel,
    pub target: String,
    pub message: String,
}

// Global state
pub static GLOBAL_LOG_LEVEL: AtomicU8 = AtomicU8::new(LOG_LEVEL_ERROR | LOG_LEVEL_WARN | LOG_LEVEL_INFO);
static GLOBAL_LOG_SENDER: OnceLock<Sender<LogEntry>> = OnceLock::new();

struct ChannelLogger;

static LOGGER: ChannelLogger = ChannelLogger;

impl log::Log for ChannelLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        let level = LogLevel::from_log(metadata.level());
        GLOBAL_LOG_LEVEL.load(Ordering::Relaxed) & (level as u8) != 0
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let entry = LogEntry {
            timestamp,
            level: LogLevel::from_log(record.level()),
            target: record.target().to_string(),
            message: record.args().to_string(),
        };

        if let Some(tx) = GLOBAL_LOG_SENDER.get() {
            let _ = tx.send(entry);
        }
    }

    fn flush(&self) {}
}

/// Install the channel logger as the global `log` backend.
///
/// Fails if another logger was installed first.
pub fn init_logger(tx: Sender<LogEntry>) -> Result<(), log::SetLoggerError> {
    let _ = GLOBAL_LOG_SENDER.set(tx);
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set the global log level mask
pub fn set_log_level(mask: u8) {
    GLOBAL_LOG_LEVEL.store(mask, Ordering::Relaxed);
}
