use std::{fmt, path::PathBuf, sync::Arc};

use anyhow::Result;
use serde_json::Value;
use shared_logging::{JsonLogger, LevelFilter, LogLevel, LogRecord, LogSink};
use uuid::Uuid;

use crate::config::TelemetrySettings;

/// Builder for appraisal telemetry sinks.
pub struct AppraisalTelemetryBuilder {
    module: String,
    log_path: Option<PathBuf>,
    min_level: LogLevel,
    sinks: Vec<Arc<dyn LogSink>>,
}

impl AppraisalTelemetryBuilder {
    /// Creates the builder.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            log_path: None,
            min_level: LogLevel::default(),
            sinks: Vec::new(),
        }
    }

    /// Sets the JSON-lines log path.
    #[must_use]
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Sets the minimum level written.
    #[must_use]
    pub const fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Adds an extra sink, e.g. an in-memory one for tests.
    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Applies file settings from configuration.
    #[must_use]
    pub fn settings(mut self, settings: &TelemetrySettings) -> Self {
        if let Some(path) = &settings.log_path {
            self.log_path = Some(path.clone());
        }
        self.min_level = settings.min_level;
        self
    }

    /// Builds the telemetry handle.
    pub fn build(self) -> Result<AppraisalTelemetry> {
        let mut sinks = self.sinks;
        if let Some(path) = self.log_path {
            sinks.push(Arc::new(JsonLogger::new(path)?));
        }
        let sinks = sinks
            .into_iter()
            .map(|inner| Arc::new(LevelFilter::new(self.min_level, inner)) as Arc<dyn LogSink>)
            .collect();
        Ok(AppraisalTelemetry {
            inner: Arc::new(TelemetryInner {
                module: self.module,
                run_id: Uuid::new_v4(),
                sinks,
            }),
        })
    }
}

/// Telemetry handle shared across appraisal components.
#[derive(Clone)]
pub struct AppraisalTelemetry {
    inner: Arc<TelemetryInner>,
}

impl fmt::Debug for AppraisalTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppraisalTelemetry")
            .field("module", &self.inner.module)
            .field("run_id", &self.inner.run_id)
            .field("sinks", &self.inner.sinks.len())
            .finish()
    }
}

struct TelemetryInner {
    module: String,
    run_id: Uuid,
    sinks: Vec<Arc<dyn LogSink>>,
}

impl AppraisalTelemetry {
    /// Returns a builder.
    #[must_use]
    pub fn builder(module: impl Into<String>) -> AppraisalTelemetryBuilder {
        AppraisalTelemetryBuilder::new(module)
    }

    /// Identifier stamped on every record from this handle.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.inner.run_id
    }

    /// Logs an event with structured metadata to every sink.
    ///
    /// Every sink is attempted; the first failure is returned.
    pub fn log(&self, level: LogLevel, message: &str, metadata: Value) -> Result<()> {
        let record = LogRecord::new(&self.inner.module, level, message)
            .with_field("run_id", self.inner.run_id.to_string())
            .with_metadata(metadata);
        let mut first_error = None;
        for sink in &self.inner.sinks {
            if let Err(err) = sink.write(&record) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
