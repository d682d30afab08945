//! Calculation method selector

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::survey_engine::SurveyError;

/// Survey calculation method.
///
/// All methods share the same contract: given the previous station's derived
/// geometry and the current raw readings, produce the current station's
/// derived tuple. Tangential is the default and matches legacy field
/// software; the other two are more accurate drop-in substitutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    /// Straight line at the current station's angles across the interval
    #[default]
    Tangential,
    /// Averages the start and end direction vectors of the interval
    BalancedTangential,
    /// Circular-arc fit via dogleg angle and ratio factor
    MinimumCurvature,
}

impl CalculationMethod {
    /// Stable wire name used in config files and CLI flags.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tangential => "tangential",
            Self::BalancedTangential => "balanced_tangential",
            Self::MinimumCurvature => "minimum_curvature",
        }
    }
}

impl std::fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CalculationMethod {
    type Err = SurveyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tangential" => Ok(Self::Tangential),
            "balanced_tangential" => Ok(Self::BalancedTangential),
            "minimum_curvature" => Ok(Self::MinimumCurvature),
            other => Err(SurveyError::UnknownMethod(other.to_string())),
        }
    }
}
