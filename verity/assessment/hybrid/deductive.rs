use serde::Serialize;

/// Domain tag attached to an observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningDomain {
    /// Markets and prices.
    Economics,
    /// Physical systems.
    Physics,
    /// Anything else.
    #[default]
    General,
}

impl ReasoningDomain {
    /// Resolves a label, falling back to [`ReasoningDomain::General`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "economics" => Self::Economics,
            "physics" => Self::Physics,
            _ => Self::General,
        }
    }
}

impl From<String> for ReasoningDomain {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

/// First principle a conclusion starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Principle {
    /// Market pricing.
    SupplyAndDemand,
    /// Conservation of energy.
    EnergyConservation,
    /// No domain-specific principle.
    GeneralReasoning,
}

impl Principle {
    /// Principle governing `domain`.
    #[must_use]
    pub const fn for_domain(domain: ReasoningDomain) -> Self {
        match domain {
            ReasoningDomain::Economics => Self::SupplyAndDemand,
            ReasoningDomain::Physics => Self::EnergyConservation,
            ReasoningDomain::General => Self::GeneralReasoning,
        }
    }

    /// Sentence stating the principle.
    #[must_use]
    pub const fn statement(self) -> &'static str {
        match self {
            Self::SupplyAndDemand => "Supply and demand govern prices.",
            Self::EnergyConservation => "Energy is conserved.",
            Self::GeneralReasoning => "General reasoning applies.",
        }
    }
}
