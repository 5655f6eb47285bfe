use std::{fmt, path::Path};

use indexmap::IndexMap;
use serde_json::{json, Value};
use shared_logging::LogLevel;

use crate::{
    config::AppraisalConfig,
    consensus::{ConsensusEvaluator, ConsensusVerdict},
    decision::{AnalysisMode, QueryComplexityClassifier},
    error::{AppraisalError, RecordError},
    hybrid::HybridReasoningEngine,
    record::InputRecord,
    source::SourceConfidenceScorer,
    telemetry::AppraisalTelemetry,
};

/// Result of one component: a typed value or the reason it is missing.
pub type Outcome<T> = Result<T, AppraisalError>;

/// The four component outcomes for one record, in reporting order.
#[derive(Debug, Clone, PartialEq)]
pub struct AppraisalReport {
    /// Source confidence in `[0, 1]`.
    pub confidence_score: Outcome<f64>,
    /// Analysis depth for the query.
    pub analysis_mode: Outcome<AnalysisMode>,
    /// Consensus on the claim.
    pub consensus_status: Outcome<ConsensusVerdict>,
    /// Hybrid reasoning conclusion.
    pub conclusion: Outcome<String>,
}

impl AppraisalReport {
    /// Report where every component carries the same load failure.
    #[must_use]
    pub fn unavailable(err: &RecordError) -> Self {
        let err = AppraisalError::from(err.clone());
        Self {
            confidence_score: Err(err.clone()),
            analysis_mode: Err(err.clone()),
            consensus_status: Err(err.clone()),
            conclusion: Err(err),
        }
    }

    /// JSON rendering with sections in reporting order.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        let mut sections: IndexMap<&str, Value> = IndexMap::new();
        sections.insert("confidence_score", outcome_json(&self.confidence_score));
        sections.insert("analysis_mode", outcome_json(&self.analysis_mode));
        sections.insert("consensus_status", outcome_json(&self.consensus_status));
        sections.insert("conclusion", outcome_json(&self.conclusion));
        serde_json::to_string_pretty(&sections)
    }
}

impl fmt::Display for AppraisalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Confidence Score: {}", Rendered(&self.confidence_score))?;
        writeln!(f, "Analysis Mode: {}", Rendered(&self.analysis_mode))?;
        writeln!(f, "Consensus Status: {}", Rendered(&self.consensus_status))?;
        writeln!(f, "Conclusion: {}", Rendered(&self.conclusion))
    }
}

struct Rendered<'a, T>(&'a Outcome<T>);

impl<T: fmt::Display> fmt::Display for Rendered<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Ok(value) => fmt::Display::fmt(value, f),
            Err(err) => fmt::Display::fmt(err, f),
        }
    }
}

fn outcome_json<T: serde::Serialize>(outcome: &Outcome<T>) -> Value {
    match outcome {
        Ok(value) => json!({ "ok": value }),
        Err(err) => json!({ "error": err.to_string() }),
    }
}

/// Runs the four appraisal components over input records.
#[derive(Debug, Clone, Default)]
pub struct AppraisalRuntime {
    scorer: SourceConfidenceScorer,
    classifier: QueryComplexityClassifier,
    consensus: ConsensusEvaluator,
    reasoning: HybridReasoningEngine,
    telemetry: Option<AppraisalTelemetry>,
}

impl AppraisalRuntime {
    /// Creates a runtime from configuration.
    #[must_use]
    pub fn new(config: &AppraisalConfig, telemetry: Option<AppraisalTelemetry>) -> Self {
        let scorer = config.scorer();
        Self {
            scorer,
            classifier: QueryComplexityClassifier,
            consensus: ConsensusEvaluator::new(scorer),
            reasoning: HybridReasoningEngine,
            telemetry,
        }
    }

    /// Runtime that ages sources against a fixed year.
    #[must_use]
    pub fn with_reference_year(reference_year: i32) -> Self {
        let scorer = SourceConfidenceScorer::new(reference_year);
        Self {
            scorer,
            consensus: ConsensusEvaluator::new(scorer),
            ..Self::default()
        }
    }

    /// Attaches telemetry.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: AppraisalTelemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Loads the record at `path` and appraises it.
    pub fn appraise_path(&self, path: impl AsRef<Path>) -> Result<AppraisalReport, RecordError> {
        let path = path.as_ref();
        match InputRecord::load(path) {
            Ok(record) => {
                self.log(
                    LogLevel::Info,
                    "appraisal.record.loaded",
                    json!({ "path": record.origin().map(|origin| origin.display().to_string()) }),
                );
                Ok(self.appraise(&record))
            }
            Err(err) => {
                self.log(
                    LogLevel::Error,
                    "appraisal.record.unavailable",
                    json!({
                        "path": path.display().to_string(),
                        "error": err.to_string(),
                        "detail": err.detail(),
                    }),
                );
                Err(err)
            }
        }
    }

    /// Runs all four components in reporting order.
    pub fn appraise(&self, record: &InputRecord) -> AppraisalReport {
        AppraisalReport {
            confidence_score: self.confidence_score(record),
            analysis_mode: self.analysis_mode(record),
            consensus_status: self.consensus_status(record),
            conclusion: self.conclusion(record),
        }
    }

    /// Source confidence for `confidence_score.source`.
    pub fn confidence_score(&self, record: &InputRecord) -> Outcome<f64> {
        let outcome = record
            .source()
            .and_then(|source| self.scorer.breakdown(&source));
        match outcome {
            Ok(breakdown) => {
                let score = breakdown.total();
                self.log(
                    LogLevel::Info,
                    "appraisal.confidence.scored",
                    json!({ "score": score, "breakdown": breakdown }),
                );
                Ok(score)
            }
            Err(err) => Err(self.reject("appraisal.confidence.skipped", err)),
        }
    }

    /// Analysis depth for `decision_rule.query`.
    pub fn analysis_mode(&self, record: &InputRecord) -> Outcome<AnalysisMode> {
        match record.query() {
            Ok(features) => {
                let score = self.classifier.score(&features);
                let mode = AnalysisMode::from_score(score);
                self.log(
                    LogLevel::Info,
                    "appraisal.decision.classified",
                    json!({ "complexity": score, "mode": mode, "domain": features.domain }),
                );
                Ok(mode)
            }
            Err(err) => Err(self.reject("appraisal.decision.skipped", err)),
        }
    }

    /// Consensus verdict for `consensus_eval`.
    pub fn consensus_status(&self, record: &InputRecord) -> Outcome<ConsensusVerdict> {
        let outcome = record
            .consensus()
            .and_then(|query| self.consensus.tally(&query));
        match outcome {
            Ok(tally) => {
                let verdict = tally.verdict();
                self.log(
                    LogLevel::Info,
                    "appraisal.consensus.evaluated",
                    json!({
                        "verdict": verdict,
                        "tally": tally,
                        "support_ratio": tally.support_ratio(),
                    }),
                );
                Ok(verdict)
            }
            Err(err) => Err(self.reject("appraisal.consensus.skipped", err)),
        }
    }

    /// Conclusion for `hybrid_reasoning`.
    pub fn conclusion(&self, record: &InputRecord) -> Outcome<String> {
        let outcome = record
            .reasoning()
            .and_then(|query| self.reasoning.reason(&query));
        match outcome {
            Ok(outcome) => {
                self.log(
                    LogLevel::Info,
                    "appraisal.reasoning.concluded",
                    json!({
                        "principle": outcome.principle,
                        "trend": outcome.trend,
                        "trend_applied": outcome.trend_applied,
                    }),
                );
                Ok(outcome.conclusion)
            }
            Err(err) => Err(self.reject("appraisal.reasoning.skipped", err)),
        }
    }

    fn reject(&self, message: &str, err: AppraisalError) -> AppraisalError {
        self.log(
            LogLevel::Warn,
            message,
            json!({ "kind": err.kind(), "reason": err.to_string() }),
        );
        err
    }

    fn log(&self, level: LogLevel, message: &str, metadata: Value) {
        if let Some(tel) = &self.telemetry {
            // Logging failures never change component output.
            let _ = tel.log(level, message, metadata);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, sync::Arc};

    use super::*;
    use serde_json::json;
    use shared_logging::MemoryLogger;
    use tempfile::tempdir;

    fn full_record() -> InputRecord {
        InputRecord::from_value(json!({
            "confidence_score": {
                "source": { "type": "primary", "year": 2025, "authority": "academic" }
            },
            "decision_rule": {
                "query": { "keywords": ["algorithm"], "domain": "science", "urgency": "high" }
            },
            "consensus_eval": {
                "claim": "prices rise",
                "sources": [
                    { "type": "primary", "year": 2025, "authority": "academic",
                      "content": "New data shows prices rise sharply." },
                    { "type": "opinion", "year": 2010, "authority": "blog",
                      "content": "not prices rise" }
                ]
            },
            "hybrid_reasoning": {
                "problem": "Will oil prices rise?",
                "data": [
                    { "domain": "economics", "observation": "Demand increased" },
                    { "domain": "economics", "observation": "Production increase stalled" },
                    { "domain": "economics", "observation": "Stocks flat" }
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn full_record_produces_all_four_outcomes() {
        let runtime = AppraisalRuntime::with_reference_year(2025);
        let report = runtime.appraise(&full_record());
        assert!((report.confidence_score.clone().unwrap() - 0.93).abs() < 1e-9);
        assert_eq!(report.analysis_mode, Ok(AnalysisMode::Moderate));
        assert_eq!(report.consensus_status, Ok(ConsensusVerdict::Supported));
        assert_eq!(
            report.conclusion.as_deref().unwrap(),
            "Supply and demand govern prices. Data suggests will oil prices rise? likely increases."
        );
    }

    #[test]
    fn report_renders_four_labelled_lines() {
        let runtime = AppraisalRuntime::with_reference_year(2025);
        let text = runtime
            .appraise(&InputRecord::from_value(json!({})).unwrap())
            .to_string();
        assert_eq!(
            text,
            "Confidence Score: No source data provided\n\
             Analysis Mode: No query data provided\n\
             Consensus Status: No claim or sources provided\n\
             Conclusion: No problem provided\n"
        );
    }

    #[test]
    fn load_failure_is_shared_by_every_component() {
        let dir = tempdir().unwrap();
        let runtime = AppraisalRuntime::with_reference_year(2025);
        let err = runtime
            .appraise_path(dir.path().join("missing.json"))
            .unwrap_err();
        let report = AppraisalReport::unavailable(&err);
        assert_eq!(
            report.to_string(),
            "Confidence Score: File not found\n\
             Analysis Mode: File not found\n\
             Consensus Status: File not found\n\
             Conclusion: File not found\n"
        );
    }

    #[test]
    fn appraisal_is_byte_identical_across_calls() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.json");
        fs::write(&path, full_record_text()).unwrap();
        let runtime = AppraisalRuntime::with_reference_year(2025);
        let first = runtime.appraise_path(&path).unwrap().to_string();
        let second = runtime.appraise_path(&path).unwrap().to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn json_report_keeps_section_order() {
        let runtime = AppraisalRuntime::with_reference_year(2025);
        let rendered = runtime.appraise(&full_record()).to_json_pretty().unwrap();
        let positions: Vec<usize> = [
            "confidence_score",
            "analysis_mode",
            "consensus_status",
            "conclusion",
        ]
        .iter()
        .map(|key| rendered.find(key).unwrap())
        .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(rendered.contains("\"ok\": \"supported\""));
    }

    #[test]
    fn telemetry_records_each_component() {
        let memory = MemoryLogger::new();
        let telemetry = AppraisalTelemetry::builder("appraisal")
            .min_level(LogLevel::Debug)
            .sink(Arc::new(memory.clone()))
            .build()
            .unwrap();
        let runtime = AppraisalRuntime::with_reference_year(2025).with_telemetry(telemetry);
        let record = InputRecord::from_value(json!({
            "confidence_score": { "source": { "type": "primary" } }
        }))
        .unwrap();
        runtime.appraise(&record);
        let messages: Vec<String> = memory.snapshot().into_iter().map(|r| r.message).collect();
        assert_eq!(
            messages,
            [
                "appraisal.confidence.scored",
                "appraisal.decision.skipped",
                "appraisal.consensus.skipped",
                "appraisal.reasoning.skipped",
            ]
        );
    }

    #[test]
    fn loaded_records_log_their_origin() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.json");
        fs::write(&path, full_record_text()).unwrap();
        let memory = MemoryLogger::new();
        let telemetry = AppraisalTelemetry::builder("appraisal")
            .sink(Arc::new(memory.clone()))
            .build()
            .unwrap();
        let runtime = AppraisalRuntime::with_reference_year(2025).with_telemetry(telemetry);
        runtime.appraise_path(&path).unwrap();
        let records = memory.snapshot();
        assert_eq!(records[0].message, "appraisal.record.loaded");
        assert_eq!(
            records[0].metadata.get("path"),
            Some(&json!(path.display().to_string()))
        );
    }

    fn full_record_text() -> String {
        r#"{
            "confidence_score": { "source": { "type": "secondary", "year": 2023, "authority": "news" } },
            "decision_rule": { "query": { "keywords": [], "domain": "general", "urgency": "low" } }
        }"#
        .to_string()
    }
}
