use std::{
    fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::{
    consensus::ConsensusQuery,
    decision::QueryFeatures,
    error::{AppraisalError, RecordError},
    hybrid::ReasoningQuery,
    source::SourceDescriptor,
};

/// Section consumed by the source confidence scorer.
pub const CONFIDENCE_SECTION: &str = "confidence_score";
/// Section consumed by the query complexity classifier.
pub const DECISION_SECTION: &str = "decision_rule";
/// Section consumed by the consensus evaluator.
pub const CONSENSUS_SECTION: &str = "consensus_eval";
/// Section consumed by the hybrid reasoning engine.
pub const REASONING_SECTION: &str = "hybrid_reasoning";

/// Parsed input document.
///
/// A single record may carry all four sections; each accessor reads only
/// its own and never fails because a sibling section is broken.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRecord {
    document: Map<String, Value>,
    origin: Option<PathBuf>,
}

impl InputRecord {
    /// Reads and parses a record from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => RecordError::NotFound {
                path: path.to_path_buf(),
            },
            io::ErrorKind::InvalidData => RecordError::Malformed {
                reason: err.to_string(),
            },
            _ => RecordError::Unreadable {
                path: path.to_path_buf(),
                reason: err.to_string(),
            },
        })?;
        let mut record = raw.parse::<Self>()?;
        record.origin = Some(path.to_path_buf());
        Ok(record)
    }

    /// Wraps an already-parsed document. The top level must be an object.
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(document) => Ok(Self {
                document,
                origin: None,
            }),
            other => Err(RecordError::Malformed {
                reason: format!("expected a JSON object at the top level, found {}", kind_of(&other)),
            }),
        }
    }

    /// Path the record was loaded from, if any.
    #[must_use]
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// Raw top-level section.
    #[must_use]
    pub fn section(&self, key: &str) -> Option<&Value> {
        self.document.get(key).filter(|value| !value.is_null())
    }

    /// `confidence_score.source`.
    pub fn source(&self) -> Result<SourceDescriptor, AppraisalError> {
        let value = self
            .field(CONFIDENCE_SECTION, "source")?
            .filter(|value| !is_empty_object(value))
            .ok_or(AppraisalError::NoSourceData)?;
        SourceDescriptor::deserialize(value)
            .map_err(|err| AppraisalError::invalid(CONFIDENCE_SECTION, &err))
    }

    /// `decision_rule.query`.
    pub fn query(&self) -> Result<QueryFeatures, AppraisalError> {
        let value = self
            .field(DECISION_SECTION, "query")?
            .filter(|value| !is_empty_object(value))
            .ok_or(AppraisalError::NoQueryData)?;
        QueryFeatures::deserialize(value)
            .map_err(|err| AppraisalError::invalid(DECISION_SECTION, &err))
    }

    /// `consensus_eval`. Emptiness of claim or sources is judged by the evaluator.
    pub fn consensus(&self) -> Result<ConsensusQuery, AppraisalError> {
        match self.object_section(CONSENSUS_SECTION)? {
            Some(section) => ConsensusQuery::deserialize(section)
                .map_err(|err| AppraisalError::invalid(CONSENSUS_SECTION, &err)),
            None => Ok(ConsensusQuery::default()),
        }
    }

    /// `hybrid_reasoning`. Emptiness of the problem is judged by the engine.
    pub fn reasoning(&self) -> Result<ReasoningQuery, AppraisalError> {
        match self.object_section(REASONING_SECTION)? {
            Some(section) => ReasoningQuery::deserialize(section)
                .map_err(|err| AppraisalError::invalid(REASONING_SECTION, &err)),
            None => Ok(ReasoningQuery::default()),
        }
    }

    fn object_section(&self, section: &'static str) -> Result<Option<&Value>, AppraisalError> {
        match self.section(section) {
            None => Ok(None),
            Some(value) if value.is_object() => Ok(Some(value)),
            Some(other) => Err(AppraisalError::InvalidSection {
                section,
                reason: format!("expected an object, found {}", kind_of(other)),
            }),
        }
    }

    fn field(&self, section: &'static str, key: &str) -> Result<Option<&Value>, AppraisalError> {
        Ok(self
            .object_section(section)?
            .and_then(|value| value.get(key))
            .filter(|value| !value.is_null()))
    }
}

impl FromStr for InputRecord {
    type Err = RecordError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value: Value = serde_json::from_str(raw).map_err(|err| RecordError::Malformed {
            reason: err.to_string(),
        })?;
        Self::from_value(value)
    }
}

/// Deserializes an optional label into an enum whose unknown and missing
/// values resolve to its default.
pub(crate) fn label_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<String> + Default,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .map(T::from)
        .unwrap_or_default())
}

fn is_empty_object(value: &Value) -> bool {
    value.as_object().is_some_and(Map::is_empty)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let dir = tempdir().unwrap();
        let err = InputRecord::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, RecordError::NotFound { .. }));
        assert_eq!(err.to_string(), "File not found");
    }

    #[test]
    fn syntax_errors_and_non_objects_are_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ \"confidence_score\": ").unwrap();
        assert_eq!(
            InputRecord::load(&path).unwrap_err().to_string(),
            "Invalid JSON format"
        );
        assert!(matches!(
            "[1, 2, 3]".parse::<InputRecord>(),
            Err(RecordError::Malformed { .. })
        ));
    }

    #[test]
    fn load_remembers_origin() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.json");
        fs::write(&path, "{}").unwrap();
        let record = InputRecord::load(&path).unwrap();
        assert_eq!(record.origin(), Some(path.as_path()));
    }

    #[test]
    fn empty_or_absent_sections_map_to_section_conditions() {
        let record = InputRecord::from_value(json!({
            "confidence_score": { "source": {} },
            "decision_rule": {},
        }))
        .unwrap();
        assert_eq!(record.source().unwrap_err(), AppraisalError::NoSourceData);
        assert_eq!(record.query().unwrap_err(), AppraisalError::NoQueryData);
        assert_eq!(record.consensus().unwrap(), ConsensusQuery::default());
        assert_eq!(record.reasoning().unwrap(), ReasoningQuery::default());
    }

    #[test]
    fn a_broken_section_does_not_affect_its_siblings() {
        let record = InputRecord::from_value(json!({
            "confidence_score": { "source": { "year": "last spring" } },
            "decision_rule": "science",
            "hybrid_reasoning": { "problem": "Will oil prices rise?" },
        }))
        .unwrap();
        assert!(matches!(
            record.source(),
            Err(AppraisalError::InvalidSection { section: "confidence_score", .. })
        ));
        assert!(matches!(
            record.query(),
            Err(AppraisalError::InvalidSection { section: "decision_rule", .. })
        ));
        assert_eq!(record.reasoning().unwrap().problem, "Will oil prices rise?");
    }
}
