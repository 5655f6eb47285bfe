#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Structured JSON-lines logging for the appraisal crates.
//!
//! Records carry a module tag, a level and a free-form JSON metadata map.
//! Sinks decide where records go; [`JsonLogger`] appends them to a file and
//! [`MemoryLogger`] keeps them around for assertions.

use std::{
    fmt,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Log severity level, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Debug information.
    Debug,
    /// Informational events.
    #[default]
    Info,
    /// Warning indicator.
    Warn,
    /// Error indicator.
    Error,
}

impl LogLevel {
    /// Lowercase label used in configuration files.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => bail!("unknown log level `{other}`"),
        }
    }
}

/// Structured log record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// Timestamp in ISO8601.
    pub timestamp: DateTime<Utc>,
    /// Module emitting the log.
    pub module: String,
    /// Severity.
    pub level: LogLevel,
    /// Event name or human-readable message.
    pub message: String,
    /// Arbitrary JSON fields attached to the event.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl LogRecord {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(module: impl Into<String>, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            module: module.into(),
            level,
            message: message.into(),
            metadata: Map::new(),
        }
    }

    /// Attaches a single metadata field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Merges the fields of a JSON object into the metadata.
    ///
    /// Non-object payloads are stored under a `data` key.
    #[must_use]
    pub fn with_metadata(mut self, payload: Value) -> Self {
        match payload {
            Value::Object(map) => self.metadata.extend(map),
            Value::Null => {}
            other => {
                self.metadata.insert("data".into(), other);
            }
        }
        self
    }
}

/// Destination for structured log records.
pub trait LogSink: Send + Sync {
    /// Persists a record.
    fn write(&self, record: &LogRecord) -> Result<()>;
}

/// Append-only JSON-lines file logger.
#[derive(Debug)]
pub struct JsonLogger {
    path: PathBuf,
    writer: Mutex<File>,
}

impl JsonLogger {
    /// Creates or opens a logger at the desired path, creating parent directories.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        Ok(Self {
            path,
            writer: Mutex::new(file),
        })
    }

    /// Writes a log record as one JSON line.
    pub fn log(&self, record: &LogRecord) -> Result<()> {
        let mut writer = self.writer.lock();
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Returns the underlying file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for JsonLogger {
    fn write(&self, record: &LogRecord) -> Result<()> {
        self.log(record)
    }
}

/// In-memory sink retaining every record it receives.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogger {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemoryLogger {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out the records written so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }
}

impl LogSink for MemoryLogger {
    fn write(&self, record: &LogRecord) -> Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}

/// Wraps a sink and drops records below a minimum level.
pub struct LevelFilter {
    min_level: LogLevel,
    inner: Arc<dyn LogSink>,
}

impl LevelFilter {
    /// Creates a filter in front of `inner`.
    #[must_use]
    pub fn new(min_level: LogLevel, inner: Arc<dyn LogSink>) -> Self {
        Self { min_level, inner }
    }
}

impl fmt::Debug for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelFilter")
            .field("min_level", &self.min_level)
            .finish_non_exhaustive()
    }
}

impl LogSink for LevelFilter {
    fn write(&self, record: &LogRecord) -> Result<()> {
        if record.level < self.min_level {
            return Ok(());
        }
        self.inner.write(record)
    }
}
