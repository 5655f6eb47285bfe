use std::fmt;

use serde::Serialize;

/// Marker searched for in observations.
const INCREASE_MARKER: &str = "increase";
/// Share of observations that must mention an increase, exclusive.
const MAJORITY: f64 = 0.5;

/// Direction generalized from observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Most observations mention an increase.
    LikelyIncreases,
    /// Half or fewer do.
    MayNotIncrease,
}

impl Trend {
    /// Generalizes from observation texts; `None` when there are none.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn detect<'a, I>(observations: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let (total, increasing) = observations
            .into_iter()
            .fold((0_usize, 0_usize), |(total, increasing), text| {
                let hit = text.to_lowercase().contains(INCREASE_MARKER);
                (total + 1, increasing + usize::from(hit))
            });
        if total == 0 {
            return None;
        }
        let share = increasing as f64 / total as f64;
        Some(if share > MAJORITY {
            Self::LikelyIncreases
        } else {
            Self::MayNotIncrease
        })
    }

    /// Phrase embedded in conclusions.
    #[must_use]
    pub const fn phrase(self) -> &'static str {
        match self {
            Self::LikelyIncreases => "likely increases",
            Self::MayNotIncrease => "may not increase",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phrase())
    }
}
