use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::AppraisalError,
    source::{SourceConfidenceScorer, SourceDescriptor},
};

/// Minimum confidence for a source to count toward consensus.
pub const HIGH_CONFIDENCE: f64 = 0.7;
/// Support ratio at or above which a claim is supported.
pub const SUPPORT_RATIO: f64 = 0.8;
/// Support ratio at or below which a claim is disputed.
pub const DISPUTE_RATIO: f64 = 0.2;

/// Claim plus the sources cited for and against it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusQuery {
    /// Claim text.
    #[serde(default)]
    pub claim: String,
    /// Cited sources.
    #[serde(default)]
    pub sources: Vec<SourceDescriptor>,
}

impl ConsensusQuery {
    /// Creates a query.
    #[must_use]
    pub fn new(claim: impl Into<String>, sources: Vec<SourceDescriptor>) -> Self {
        Self {
            claim: claim.into(),
            sources,
        }
    }
}

/// Outcome of a consensus evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusVerdict {
    /// High-confidence sources overwhelmingly agree.
    Supported,
    /// High-confidence sources overwhelmingly disagree.
    Disputed,
    /// Too little evidence or a split.
    NoConsensus,
}

impl ConsensusVerdict {
    /// Wire label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Supported => "supported",
            Self::Disputed => "disputed",
            Self::NoConsensus => "no_consensus",
        }
    }
}

impl fmt::Display for ConsensusVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Intermediate counts behind a verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConsensusTally {
    /// Sources cited.
    pub considered: usize,
    /// Sources that passed the confidence gate.
    pub high_confidence: usize,
    /// High-confidence sources containing the claim.
    pub support: usize,
    /// High-confidence sources containing the negated claim.
    pub oppose: usize,
}

impl ConsensusTally {
    /// `support / (support + oppose)`, or `None` when nothing was tallied.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn support_ratio(&self) -> Option<f64> {
        let total = self.support + self.oppose;
        (total > 0).then(|| self.support as f64 / total as f64)
    }

    /// Classifies the tally.
    #[must_use]
    pub fn verdict(&self) -> ConsensusVerdict {
        match self.support_ratio() {
            Some(ratio) if ratio >= SUPPORT_RATIO => ConsensusVerdict::Supported,
            Some(ratio) if ratio <= DISPUTE_RATIO => ConsensusVerdict::Disputed,
            _ => ConsensusVerdict::NoConsensus,
        }
    }
}

/// Decides whether high-confidence sources agree with a claim.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsensusEvaluator {
    scorer: SourceConfidenceScorer,
}

impl ConsensusEvaluator {
    /// Creates an evaluator that gates sources with `scorer`.
    #[must_use]
    pub const fn new(scorer: SourceConfidenceScorer) -> Self {
        Self { scorer }
    }

    /// Evaluates the claim.
    pub fn evaluate(&self, query: &ConsensusQuery) -> Result<ConsensusVerdict, AppraisalError> {
        self.tally(query).map(|tally| tally.verdict())
    }

    /// Scores, gates and tallies the sources without mutating them.
    pub fn tally(&self, query: &ConsensusQuery) -> Result<ConsensusTally, AppraisalError> {
        if query.claim.is_empty() || query.sources.is_empty() {
            return Err(AppraisalError::NoClaimOrSources);
        }
        let claim = query.claim.to_lowercase();
        let negated = format!("not {claim}");
        let mut tally = ConsensusTally {
            considered: query.sources.len(),
            ..ConsensusTally::default()
        };
        for source in query.sources.iter().filter(|source| self.is_high_confidence(source)) {
            tally.high_confidence += 1;
            let content = source.content().to_lowercase();
            if content.contains(&claim) {
                tally.support += 1;
            } else if content.contains(&negated) {
                tally.oppose += 1;
            }
        }
        Ok(tally)
    }

    fn is_high_confidence(&self, source: &SourceDescriptor) -> bool {
        self.scorer
            .score(source)
            .is_ok_and(|score| score.is_finite() && score >= HIGH_CONFIDENCE)
    }
}
