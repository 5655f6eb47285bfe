use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use shared_logging::LogLevel;

use crate::source::SourceConfidenceScorer;

/// Runtime configuration loaded from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppraisalConfig {
    /// Scoring settings.
    pub scoring: ScoringSettings,
    /// Telemetry settings.
    pub telemetry: TelemetrySettings,
}

impl AppraisalConfig {
    /// Loads configuration from a TOML file.
    ///
    /// A relative `telemetry.log_path` is resolved against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading appraisal config {}", path.display()))?;
        let mut config: Self = raw
            .parse()
            .with_context(|| format!("parsing {}", path.display()))?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        if let Some(log_path) = config.telemetry.log_path.as_mut() {
            if log_path.is_relative() {
                *log_path = base_dir.join(&*log_path);
            }
        }
        Ok(config)
    }

    /// Scorer measuring age against the configured or current year.
    #[must_use]
    pub fn scorer(&self) -> SourceConfidenceScorer {
        SourceConfidenceScorer::new(self.scoring.reference_year())
    }
}

impl std::str::FromStr for AppraisalConfig {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let document: AppraisalConfigSerde = toml::from_str(raw)?;
        let min_level = match document.telemetry.min_level.as_deref() {
            Some(label) => label.parse()?,
            None => LogLevel::default(),
        };
        if let Some(year) = document.scoring.reference_year {
            if year <= 0 {
                bail!("invalid reference_year {year}: must be positive");
            }
        }
        Ok(Self {
            scoring: document.scoring,
            telemetry: TelemetrySettings {
                log_path: document.telemetry.log_path,
                min_level,
            },
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AppraisalConfigSerde {
    #[serde(default)]
    scoring: ScoringSettings,
    #[serde(default)]
    telemetry: TelemetrySettingsSerde,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TelemetrySettingsSerde {
    #[serde(default)]
    log_path: Option<PathBuf>,
    #[serde(default)]
    min_level: Option<String>,
}

/// Settings for the source confidence scorer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringSettings {
    /// Year sources are aged against; the current UTC year when unset.
    #[serde(default)]
    pub reference_year: Option<i32>,
}

impl ScoringSettings {
    /// Effective reference year.
    #[must_use]
    pub fn reference_year(&self) -> i32 {
        self.reference_year.unwrap_or_else(|| Utc::now().year())
    }
}

/// Where structured logs go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetrySettings {
    /// JSON-lines log file; no file logging when unset.
    pub log_path: Option<PathBuf>,
    /// Records below this level are dropped.
    pub min_level: LogLevel,
}
