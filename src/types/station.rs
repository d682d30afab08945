//! Survey station types

use serde::{Deserialize, Serialize};

/// Normalize an azimuth into `[0, 360)` degrees.
///
/// Azimuth is circular, so out-of-range readings wrap rather than fail:
/// 370 → 10, -10 → 350. Non-finite input propagates unchanged and is
/// caught by validation.
#[must_use]
pub fn normalize_azimuth(azimuth: f64) -> f64 {
    azimuth.rem_euclid(360.0)
}

/// Hole-section shape tag assigned by the directional driller.
///
/// Informational only — geometry derivation never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SectionLabel {
    #[default]
    Vertical,
    Build,
    Hold,
    #[serde(rename = "Drop-off")]
    DropOff,
}

impl std::fmt::Display for SectionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Vertical => "Vertical",
            Self::Build => "Build",
            Self::Hold => "Hold",
            Self::DropOff => "Drop-off",
        };
        write!(f, "{s}")
    }
}

/// One survey station: raw sensor readings plus engine-derived geometry.
///
/// Raw fields come from the caller; derived fields are written only by the
/// engine. The first station of a sequence (tie-in) always carries the fixed
/// boundary geometry `(0, 0, 0, 0)` — its own angles describe the direction
/// *leaving* that point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyStation {
    /// Measured depth along the wellbore path (ft), strictly increasing
    /// along the sequence
    pub measured_depth: f64,
    /// Inclination from vertical (degrees, 0-180)
    pub inclination: f64,
    /// Azimuth clockwise from north (degrees, 0-360)
    pub azimuth: f64,
    /// Hole-section tag
    #[serde(default)]
    pub section_label: SectionLabel,

    // === Derived geometry (engine-owned) ===
    /// True vertical depth below the tie-in reference (ft)
    #[serde(default)]
    pub true_vertical_depth: f64,
    /// North(+)/south(-) displacement from the tie-in (ft)
    #[serde(default)]
    pub north_south_offset: f64,
    /// East(+)/west(-) displacement from the tie-in (ft)
    #[serde(default)]
    pub east_west_offset: f64,
    /// Dogleg severity (degrees per DLS interval, conventionally deg/100 ft)
    #[serde(default)]
    pub dogleg_severity: f64,
}

impl SurveyStation {
    /// Create a station from raw readings with zeroed derived geometry.
    #[must_use]
    pub fn new(measured_depth: f64, inclination: f64, azimuth: f64) -> Self {
        Self::with_label(measured_depth, inclination, azimuth, SectionLabel::default())
    }

    /// Create a station with an explicit section label.
    #[must_use]
    pub fn with_label(
        measured_depth: f64,
        inclination: f64,
        azimuth: f64,
        section_label: SectionLabel,
    ) -> Self {
        Self {
            measured_depth,
            inclination,
            azimuth,
            section_label,
            true_vertical_depth: 0.0,
            north_south_offset: 0.0,
            east_west_offset: 0.0,
            dogleg_severity: 0.0,
        }
    }

    /// The derived tuple as a value.
    #[must_use]
    pub fn derived(&self) -> DerivedGeometry {
        DerivedGeometry {
            true_vertical_depth: self.true_vertical_depth,
            north_south_offset: self.north_south_offset,
            east_west_offset: self.east_west_offset,
            dogleg_severity: self.dogleg_severity,
        }
    }

    /// Overwrite the derived fields from a computed tuple.
    pub fn apply_derived(&mut self, geometry: DerivedGeometry) {
        self.true_vertical_depth = geometry.true_vertical_depth;
        self.north_south_offset = geometry.north_south_offset;
        self.east_west_offset = geometry.east_west_offset;
        self.dogleg_severity = geometry.dogleg_severity;
    }

    /// Copy with derived values rounded to `precision` decimal places.
    ///
    /// Presentation-boundary only; the engine never stores rounded values,
    /// so rounding error cannot compound across a long cascade.
    #[must_use]
    pub fn rounded(&self, precision: u32) -> Self {
        let mut out = self.clone();
        out.true_vertical_depth = round_to(self.true_vertical_depth, precision);
        out.north_south_offset = round_to(self.north_south_offset, precision);
        out.east_west_offset = round_to(self.east_west_offset, precision);
        out.dogleg_severity = round_to(self.dogleg_severity, precision);
        out
    }
}

/// Derived geometry tuple for one station.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedGeometry {
    pub true_vertical_depth: f64,
    pub north_south_offset: f64,
    pub east_west_offset: f64,
    pub dogleg_severity: f64,
}

impl DerivedGeometry {
    /// Fixed boundary geometry for the tie-in station.
    pub const TIE_IN: Self = Self {
        true_vertical_depth: 0.0,
        north_south_offset: 0.0,
        east_west_offset: 0.0,
        dogleg_severity: 0.0,
    };
}

fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision.min(12) as i32);
    (value * factor).round() / factor
}
