//! Wellbore document - the ordered station sequence plus identification

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CalculationMethod, SurveyStation};

/// A single wellbore's ordered survey sequence.
///
/// This is the boundary document exchanged with persistence and rendering
/// collaborators. Stations are ordered by ascending measured depth; the
/// first station is the tie-in and defines the origin of the derived
/// coordinate system. Sequence invariants are enforced by the engine, not
/// by this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wellbore {
    /// Well / wellbore identifier
    #[serde(default)]
    pub name: String,

    /// Calculation method the derived geometry was produced with
    #[serde(default)]
    pub method: CalculationMethod,

    /// When the survey run was recorded, if known
    #[serde(default)]
    pub surveyed_at: Option<DateTime<Utc>>,

    /// Ordered station sequence, tie-in first
    pub stations: Vec<SurveyStation>,
}

impl Wellbore {
    /// Create a wellbore holding only its tie-in station.
    #[must_use]
    pub fn new(name: impl Into<String>, tie_in: SurveyStation) -> Self {
        Self {
            name: name.into(),
            method: CalculationMethod::default(),
            surveyed_at: None,
            stations: vec![tie_in],
        }
    }

    /// The tie-in (first) station, if the sequence is non-empty.
    #[must_use]
    pub fn tie_in(&self) -> Option<&SurveyStation> {
        self.stations.first()
    }

    /// Measured depth of the deepest station, or 0 for an empty sequence.
    #[must_use]
    pub fn total_depth(&self) -> f64 {
        self.stations.last().map_or(0.0, |s| s.measured_depth)
    }

    /// Number of stations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// True when no stations are present (only possible before the engine
    /// takes ownership — the engine maintains a minimum length of 1).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
