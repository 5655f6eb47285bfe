use std::path::PathBuf;

use thiserror::Error;

/// Failures while obtaining the input record.
///
/// The `Display` text is the short message reported in place of every
/// component's result when the shared load fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The resource does not exist.
    #[error("File not found")]
    NotFound {
        /// Path that was requested.
        path: PathBuf,
    },
    /// The resource is not a JSON object.
    #[error("Invalid JSON format")]
    Malformed {
        /// Parser diagnostic.
        reason: String,
    },
    /// The resource exists but could not be read.
    #[error("Unable to read input")]
    Unreadable {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O diagnostic.
        reason: String,
    },
}

impl RecordError {
    /// Underlying diagnostic, when one exists.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::NotFound { .. } => None,
            Self::Malformed { reason } | Self::Unreadable { reason, .. } => Some(reason.as_str()),
        }
    }
}

/// Reasons a component could not produce its typed result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppraisalError {
    /// The shared record could not be loaded.
    #[error(transparent)]
    Record(#[from] RecordError),
    /// `confidence_score.source` is absent or empty.
    #[error("No source data provided")]
    NoSourceData,
    /// `decision_rule.query` is absent or empty.
    #[error("No query data provided")]
    NoQueryData,
    /// `consensus_eval.claim` or `consensus_eval.sources` is absent or empty.
    #[error("No claim or sources provided")]
    NoClaimOrSources,
    /// `hybrid_reasoning.problem` is absent or empty.
    #[error("No problem provided")]
    NoProblem,
    /// The section exists but its fields have the wrong shape.
    #[error("Invalid {section} section: {reason}")]
    InvalidSection {
        /// Top-level section key.
        section: &'static str,
        /// Deserializer diagnostic.
        reason: String,
    },
}

impl AppraisalError {
    /// Builds an [`AppraisalError::InvalidSection`] from a deserializer error.
    pub(crate) fn invalid(section: &'static str, err: &serde_json::Error) -> Self {
        Self::InvalidSection {
            section,
            reason: err.to_string(),
        }
    }

    /// Stable identifier used in telemetry payloads.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Record(RecordError::NotFound { .. }) => "record.not_found",
            Self::Record(RecordError::Malformed { .. }) => "record.malformed",
            Self::Record(RecordError::Unreadable { .. }) => "record.unreadable",
            Self::NoSourceData => "section.no_source",
            Self::NoQueryData => "section.no_query",
            Self::NoClaimOrSources => "section.no_claim_or_sources",
            Self::NoProblem => "section.no_problem",
            Self::InvalidSection { .. } => "section.invalid",
        }
    }
}
