#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rust_2018_idioms,
    missing_docs
)]

//! Heuristic appraisal runtime: source confidence, query depth, claim
//! consensus and hybrid deductive/inductive conclusions.

/// Error taxonomy shared by every component.
#[path = "../error.rs"]
pub mod error;

/// Input record loading and section extraction.
#[path = "../record.rs"]
pub mod record;

/// TOML configuration.
#[path = "../config.rs"]
pub mod config;

/// Source confidence scoring.
#[path = "../source.rs"]
pub mod source;

/// Query complexity classification.
#[path = "../decision.rs"]
pub mod decision;

/// Claim consensus evaluation.
#[path = "../consensus.rs"]
pub mod consensus;

/// Hybrid deductive/inductive reasoning.
#[path = "../hybrid/main.rs"]
pub mod hybrid;

/// Telemetry builder/hook for appraisal components.
#[path = "../telemetry.rs"]
pub mod telemetry;

/// Appraisal runtime entry point.
#[path = "../main.rs"]
pub mod runtime;

pub use config::{AppraisalConfig, ScoringSettings, TelemetrySettings};
pub use consensus::{ConsensusEvaluator, ConsensusQuery, ConsensusTally, ConsensusVerdict};
pub use decision::{AnalysisMode, QueryComplexityClassifier, QueryDomain, QueryFeatures, Urgency};
pub use error::{AppraisalError, RecordError};
pub use hybrid::{
    DataPoint, HybridReasoningEngine, Principle, ReasoningDomain, ReasoningOutcome, ReasoningQuery,
    Trend,
};
pub use record::InputRecord;
pub use runtime::{AppraisalReport, AppraisalRuntime, Outcome};
pub use source::{
    Authority, ConfidenceBreakdown, SourceConfidenceScorer, SourceDescriptor, SourceKind,
};
pub use telemetry::{AppraisalTelemetry, AppraisalTelemetryBuilder};
