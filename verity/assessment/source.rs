use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppraisalError;

const TYPE_WEIGHT: f64 = 0.4;
const RECENCY_WEIGHT: f64 = 0.3;
const AUTHORITY_WEIGHT: f64 = 0.3;
/// Age in years at which the recency sub-score reaches zero.
const RECENCY_HORIZON_YEARS: f64 = 5.0;

/// Kind of evidence a source provides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// First-hand evidence.
    Primary,
    /// Reporting on primary evidence.
    Secondary,
    /// Commentary. Also used for unrecognized labels.
    #[default]
    Opinion,
}

impl SourceKind {
    /// Resolves a label, falling back to [`SourceKind::Opinion`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "primary" => Self::Primary,
            "secondary" => Self::Secondary,
            _ => Self::Opinion,
        }
    }

    /// Normalized sub-score.
    #[must_use]
    pub const fn score(self) -> f64 {
        match self {
            Self::Primary => 0.9,
            Self::Secondary => 0.6,
            Self::Opinion => 0.3,
        }
    }
}

impl From<String> for SourceKind {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

/// Publisher credibility class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Authority {
    /// Peer-reviewed or institutional research.
    Academic,
    /// Official government body.
    Government,
    /// News outlet.
    News,
    /// Personal publication. Also used for unrecognized labels.
    #[default]
    Blog,
}

impl Authority {
    /// Resolves a label, falling back to [`Authority::Blog`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "academic" => Self::Academic,
            "government" => Self::Government,
            "news" => Self::News,
            _ => Self::Blog,
        }
    }

    /// Normalized sub-score.
    #[must_use]
    pub const fn score(self) -> f64 {
        match self {
            Self::Academic => 0.9,
            Self::Government => 0.8,
            Self::News => 0.5,
            Self::Blog => 0.2,
        }
    }
}

impl From<String> for Authority {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

/// Description of a cited source. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Evidence kind (`type` on the wire).
    #[serde(
        rename = "type",
        default,
        deserialize_with = "optional_label",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<SourceKind>,
    /// Publication year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Publisher credibility.
    #[serde(
        default,
        deserialize_with = "optional_label",
        skip_serializing_if = "Option::is_none"
    )]
    pub authority: Option<Authority>,
    /// Free text used for claim matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl SourceDescriptor {
    /// Creates a descriptor with kind, year and authority set.
    #[must_use]
    pub const fn new(kind: SourceKind, year: i32, authority: Authority) -> Self {
        Self {
            kind: Some(kind),
            year: Some(year),
            authority: Some(authority),
            content: None,
        }
    }

    /// Sets the content text.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// True when no field was supplied at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.year.is_none()
            && self.authority.is_none()
            && self.content.is_none()
    }

    /// Content text, empty when absent.
    #[must_use]
    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

fn optional_label<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: From<String>,
{
    // Present-but-null behaves like an absent field.
    let label: Option<String> = Option::deserialize(deserializer)?;
    Ok(label.map(T::from))
}

/// Weighted components of a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceBreakdown {
    /// Weighted evidence-kind contribution.
    pub kind: f64,
    /// Weighted recency contribution. May exceed its weight for future-dated sources.
    pub recency: f64,
    /// Weighted authority contribution.
    pub authority: f64,
}

impl ConfidenceBreakdown {
    /// Sum of the components clamped to `[0, 1]`.
    #[must_use]
    pub fn total(&self) -> f64 {
        (self.kind + self.recency + self.authority).clamp(0.0, 1.0)
    }
}

/// Scores source reliability against a reference year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceConfidenceScorer {
    reference_year: i32,
}

impl SourceConfidenceScorer {
    /// Creates a scorer that measures age relative to `reference_year`.
    #[must_use]
    pub const fn new(reference_year: i32) -> Self {
        Self { reference_year }
    }

    /// Year used to measure source age.
    #[must_use]
    pub const fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Confidence in `[0, 1]`, or [`AppraisalError::NoSourceData`] for an empty descriptor.
    pub fn score(&self, source: &SourceDescriptor) -> Result<f64, AppraisalError> {
        self.breakdown(source).map(|breakdown| breakdown.total())
    }

    /// Weighted sub-scores behind [`Self::score`].
    pub fn breakdown(&self, source: &SourceDescriptor) -> Result<ConfidenceBreakdown, AppraisalError> {
        if source.is_empty() {
            return Err(AppraisalError::NoSourceData);
        }
        let kind = source.kind.unwrap_or_default();
        let authority = source.authority.unwrap_or_default();
        Ok(ConfidenceBreakdown {
            kind: TYPE_WEIGHT * kind.score(),
            recency: RECENCY_WEIGHT * self.recency(source.year),
            authority: AUTHORITY_WEIGHT * authority.score(),
        })
    }

    /// Linear decay to zero at five years; undated sources count as current.
    fn recency(&self, year: Option<i32>) -> f64 {
        let published = year.unwrap_or(self.reference_year);
        let years_old = f64::from(self.reference_year) - f64::from(published);
        (1.0 - years_old / RECENCY_HORIZON_YEARS).max(0.0)
    }
}

impl Default for SourceConfidenceScorer {
    fn default() -> Self {
        Self::new(Utc::now().year())
    }
}
