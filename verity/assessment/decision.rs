use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::label_or_default;

/// Keywords that add one point of complexity each.
const TECHNICAL_TERMS: [&str; 4] = ["quantum", "tariff", "algorithm", "philosophy"];

/// Subject area of a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryDomain {
    /// Natural sciences.
    Science,
    /// Economics and trade.
    Economics,
    /// History.
    History,
    /// Anything else.
    #[default]
    General,
}

impl QueryDomain {
    /// Resolves a label, falling back to [`QueryDomain::General`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "science" => Self::Science,
            "economics" => Self::Economics,
            "history" => Self::History,
            _ => Self::General,
        }
    }

    const fn weight(self) -> i32 {
        match self {
            Self::Science | Self::Economics => 2,
            Self::History => 1,
            Self::General => 0,
        }
    }
}

impl From<String> for QueryDomain {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

/// How quickly an answer is needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// Answer needed now; favours shallower analysis.
    High,
    /// No particular pressure.
    #[default]
    Normal,
    /// Time is available; favours deeper analysis.
    Low,
}

impl Urgency {
    /// Resolves a label, falling back to [`Urgency::Normal`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Normal,
        }
    }

    const fn modifier(self) -> i32 {
        match self {
            Self::High => -1,
            Self::Normal => 0,
            Self::Low => 1,
        }
    }
}

impl From<String> for Urgency {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

/// Features describing an incoming query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFeatures {
    /// Query keywords in the order given.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Subject area.
    #[serde(default, deserialize_with = "label_or_default")]
    pub domain: QueryDomain,
    /// Answer urgency.
    #[serde(default, deserialize_with = "label_or_default")]
    pub urgency: Urgency,
}

impl QueryFeatures {
    /// Creates a feature set.
    #[must_use]
    pub fn new<I, S>(keywords: I, domain: QueryDomain, urgency: Urgency) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            domain,
            urgency,
        }
    }
}

/// Depth of analysis warranted by a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Quick answer.
    Light,
    /// Some investigation.
    Moderate,
    /// Full investigation.
    Deep,
}

impl AnalysisMode {
    /// Maps a complexity score onto a mode. Total over all integers.
    #[must_use]
    pub const fn from_score(score: i32) -> Self {
        match score {
            i32::MIN..=1 => Self::Light,
            2..=3 => Self::Moderate,
            _ => Self::Deep,
        }
    }

    /// Wire label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Deep => "deep",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rule table deciding how deep an analysis should go.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryComplexityClassifier;

impl QueryComplexityClassifier {
    /// Integer complexity: technical keywords + domain weight + urgency modifier.
    #[must_use]
    pub fn score(&self, features: &QueryFeatures) -> i32 {
        let technical = features
            .keywords
            .iter()
            .filter(|keyword| {
                let keyword = keyword.to_lowercase();
                TECHNICAL_TERMS.contains(&keyword.as_str())
            })
            .count();
        let technical = i32::try_from(technical).unwrap_or(i32::MAX);
        technical
            .saturating_add(features.domain.weight())
            .saturating_add(features.urgency.modifier())
    }

    /// Classifies the query.
    #[must_use]
    pub fn classify(&self, features: &QueryFeatures) -> AnalysisMode {
        AnalysisMode::from_score(self.score(features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn technical_keyword_in_urgent_science_query_is_moderate() {
        let features = QueryFeatures::new(["algorithm"], QueryDomain::Science, Urgency::High);
        let classifier = QueryComplexityClassifier;
        assert_eq!(classifier.score(&features), 2);
        assert_eq!(classifier.classify(&features), AnalysisMode::Moderate);
    }

    #[test]
    fn relaxed_general_query_without_keywords_is_light() {
        let features = QueryFeatures::new(Vec::<String>::new(), QueryDomain::General, Urgency::Low);
        assert_eq!(QueryComplexityClassifier.score(&features), 1);
        assert_eq!(
            QueryComplexityClassifier.classify(&features),
            AnalysisMode::Light
        );
    }

    #[test]
    fn negative_scores_are_light() {
        let features = QueryFeatures::new(["weather"], QueryDomain::General, Urgency::High);
        assert_eq!(QueryComplexityClassifier.score(&features), -1);
        assert_eq!(
            QueryComplexityClassifier.classify(&features),
            AnalysisMode::Light
        );
    }

    #[test]
    fn keywords_match_case_insensitively_and_exactly() {
        let features = QueryFeatures::new(
            ["Quantum", "TARIFF", "philosophy", "algorithms"],
            QueryDomain::Economics,
            Urgency::Normal,
        );
        assert_eq!(QueryComplexityClassifier.score(&features), 5);
        assert_eq!(
            QueryComplexityClassifier.classify(&features),
            AnalysisMode::Deep
        );
    }

    #[test]
    fn unknown_labels_fall_back_to_defaults() {
        let features: QueryFeatures = serde_json::from_value(json!({
            "keywords": ["history"],
            "domain": "astrology",
            "urgency": "whenever",
        }))
        .unwrap();
        assert_eq!(features.domain, QueryDomain::General);
        assert_eq!(features.urgency, Urgency::Normal);
        let missing: QueryFeatures = serde_json::from_value(json!({ "domain": null })).unwrap();
        assert_eq!(missing, QueryFeatures::default());
    }

    #[test]
    fn thresholds_cover_every_score() {
        assert_eq!(AnalysisMode::from_score(i32::MIN), AnalysisMode::Light);
        assert_eq!(AnalysisMode::from_score(1), AnalysisMode::Light);
        assert_eq!(AnalysisMode::from_score(2), AnalysisMode::Moderate);
        assert_eq!(AnalysisMode::from_score(3), AnalysisMode::Moderate);
        assert_eq!(AnalysisMode::from_score(4), AnalysisMode::Deep);
        assert!(AnalysisMode::Light < AnalysisMode::Deep);
    }
}
