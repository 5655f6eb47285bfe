use serde::{Deserialize, Serialize};

/// Domain tags and first principles.
pub mod deductive;
/// Trend detection over observations.
pub mod inductive;

use crate::{error::AppraisalError, record::label_or_default};
pub use deductive::{Principle, ReasoningDomain};
pub use inductive::Trend;

/// Keyword that makes a problem eligible for a trend-aware conclusion.
const PRICE_MARKER: &str = "price";

/// One domain-tagged observation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Domain the observation belongs to.
    #[serde(default, deserialize_with = "label_or_default")]
    pub domain: ReasoningDomain,
    /// Observation text.
    #[serde(default)]
    pub observation: String,
}

impl DataPoint {
    /// Creates a data point.
    #[must_use]
    pub fn new(domain: ReasoningDomain, observation: impl Into<String>) -> Self {
        Self {
            domain,
            observation: observation.into(),
        }
    }
}

/// Problem statement plus supporting observations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningQuery {
    /// Question being reasoned about.
    #[serde(default)]
    pub problem: String,
    /// Observations, in order. Only the first one's domain selects the principle.
    #[serde(default)]
    pub data: Vec<DataPoint>,
}

impl ReasoningQuery {
    /// Creates a query.
    #[must_use]
    pub fn new(problem: impl Into<String>, data: Vec<DataPoint>) -> Self {
        Self {
            problem: problem.into(),
            data,
        }
    }

    fn leading_domain(&self) -> ReasoningDomain {
        self.data.first().map(|point| point.domain).unwrap_or_default()
    }
}

/// Full result of a reasoning pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasoningOutcome {
    /// Principle selected by the deductive step.
    pub principle: Principle,
    /// Trend from the inductive step; `None` without observations.
    pub trend: Option<Trend>,
    /// Whether the trend made it into the conclusion.
    pub trend_applied: bool,
    /// Final conclusion text.
    pub conclusion: String,
}

/// Blends a fixed principle with a trend detected in observations.
#[derive(Debug, Clone, Copy, Default)]
pub struct HybridReasoningEngine;

impl HybridReasoningEngine {
    /// Conclusion text for the query.
    pub fn conclude(&self, query: &ReasoningQuery) -> Result<String, AppraisalError> {
        self.reason(query).map(|outcome| outcome.conclusion)
    }

    /// Runs the deductive and inductive steps.
    pub fn reason(&self, query: &ReasoningQuery) -> Result<ReasoningOutcome, AppraisalError> {
        if query.problem.is_empty() {
            return Err(AppraisalError::NoProblem);
        }
        let domain = query.leading_domain();
        let principle = Principle::for_domain(domain);
        let statement = principle.statement();

        let observations = query.data.iter().map(|point| point.observation.as_str());
        let Some(trend) = Trend::detect(observations) else {
            return Ok(ReasoningOutcome {
                principle,
                trend: None,
                trend_applied: false,
                conclusion: format!("Based on {statement}, insufficient data to conclude."),
            });
        };

        // Trends only carry meaning for price questions in economics.
        let trend_applied = domain == ReasoningDomain::Economics
            && query.problem.to_lowercase().contains(PRICE_MARKER);
        let conclusion = if trend_applied {
            format!(
                "{statement} Data suggests {} {trend}.",
                query.problem.to_lowercase()
            )
        } else {
            format!("{statement} Data analysis inconclusive for {}.", query.problem)
        };
        Ok(ReasoningOutcome {
            principle,
            trend: Some(trend),
            trend_applied,
            conclusion,
        })
    }
}
