//! Survey engine - validation and cascade recomputation of well-path geometry
//!
//! Derived geometry at a station is a pure function of the full upstream
//! raw-input history. Any edit, insertion, or deletion therefore invalidates
//! every station at or after the mutation point, and the engine re-derives
//! the whole trailing segment from the already-recomputed previous station.
//!
//! Recomputes are fail-fast and atomic: geometry is computed into a fresh
//! sequence and swapped in only on full success, so a rejected edit leaves
//! the prior valid sequence untouched. Partial geometry is never returned —
//! a half-computed well path renders as a discontinuous, misleading curve.

mod methods;

use thiserror::Error;
use tracing::debug;

use crate::types::{
    normalize_azimuth, CalculationMethod, DerivedGeometry, SurveyStation, Wellbore,
};

/// Survey validation and edit errors.
///
/// All variants are local, recoverable validation failures: the caller
/// rejects the edit, keeps the prior sequence, and can highlight the
/// offending station row by index.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurveyError {
    #[error("station {index}: measured depth {measured_depth} is not strictly greater than previous station's {previous_depth}")]
    InvalidStationOrder {
        index: usize,
        measured_depth: f64,
        previous_depth: f64,
    },

    #[error("station {index}: inclination {inclination} outside [0, 180] degrees")]
    InvalidAngle { index: usize, inclination: f64 },

    #[error("station {index}: non-finite {field}")]
    InvalidMeasurement { index: usize, field: &'static str },

    #[error("tie-in station cannot be removed or displaced")]
    TieInStationProtected,

    #[error("unknown calculation method '{0}' (expected tangential, balanced_tangential, or minimum_curvature)")]
    UnknownMethod(String),

    #[error("station index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Validate one station's raw readings against its predecessor.
///
/// Pure check, no side effects. Azimuth is only checked for finiteness —
/// out-of-range azimuth wraps modulo 360 during recompute instead of
/// failing (azimuth is circular; inclination is not).
pub fn validate(
    index: usize,
    station: &SurveyStation,
    previous: Option<&SurveyStation>,
) -> Result<(), SurveyError> {
    for (field, value) in [
        ("measured depth", station.measured_depth),
        ("inclination", station.inclination),
        ("azimuth", station.azimuth),
    ] {
        if !value.is_finite() {
            return Err(SurveyError::InvalidMeasurement { index, field });
        }
    }

    if !(0.0..=180.0).contains(&station.inclination) {
        return Err(SurveyError::InvalidAngle {
            index,
            inclination: station.inclination,
        });
    }

    if let Some(prev) = previous {
        if station.measured_depth <= prev.measured_depth {
            return Err(SurveyError::InvalidStationOrder {
                index,
                measured_depth: station.measured_depth,
                previous_depth: prev.measured_depth,
            });
        }
    }

    Ok(())
}

/// Re-derive geometry for an entire station sequence.
///
/// Walks the sequence in ascending measured-depth order: index 0 receives
/// the fixed tie-in boundary `(0, 0, 0, 0)` regardless of its own angles;
/// every subsequent station is validated and then derived from the
/// already-recomputed previous station. Azimuth is normalized into
/// `[0, 360)` in the returned sequence.
///
/// Deterministic and re-entrant: identical input yields bit-identical
/// output. Aborts on the first invalid station rather than skipping it.
pub fn recompute(
    stations: &[SurveyStation],
    method: CalculationMethod,
) -> Result<Vec<SurveyStation>, SurveyError> {
    let mut out: Vec<SurveyStation> = Vec::with_capacity(stations.len());

    for (index, station) in stations.iter().enumerate() {
        let mut station = station.clone();
        validate(index, &station, out.last())?;
        station.azimuth = normalize_azimuth(station.azimuth);

        if index == 0 {
            station.apply_derived(DerivedGeometry::TIE_IN);
        } else {
            let derived = method.derive(&out[index - 1], &station);
            station.apply_derived(derived);
        }
        out.push(station);
    }

    Ok(out)
}

/// Owns one wellbore's station sequence and keeps its derived geometry
/// self-consistent across edits.
///
/// Every mutation is atomic: the candidate sequence is recomputed in full
/// and swapped in only on success, so the engine never holds partially
/// derived geometry.
#[derive(Debug, Clone)]
pub struct SurveyEngine {
    wellbore: Wellbore,
}

impl SurveyEngine {
    /// Create an engine from a tie-in station.
    pub fn new(
        name: impl Into<String>,
        tie_in: SurveyStation,
        method: CalculationMethod,
    ) -> Result<Self, SurveyError> {
        let mut wellbore = Wellbore::new(name, tie_in);
        wellbore.method = method;
        Self::from_wellbore(wellbore)
    }

    /// Take ownership of an existing wellbore document, re-deriving all
    /// geometry so stale or caller-supplied derived values never survive.
    pub fn from_wellbore(mut wellbore: Wellbore) -> Result<Self, SurveyError> {
        if wellbore.is_empty() {
            // A wellbore always has at least its tie-in point.
            return Err(SurveyError::TieInStationProtected);
        }
        wellbore.stations = recompute(&wellbore.stations, wellbore.method)?;
        debug!(
            well = %wellbore.name,
            stations = wellbore.len(),
            method = %wellbore.method,
            "survey engine initialized"
        );
        Ok(Self { wellbore })
    }

    /// The owned wellbore with fully consistent geometry.
    #[must_use]
    pub fn wellbore(&self) -> &Wellbore {
        &self.wellbore
    }

    /// The ordered station sequence with fully consistent geometry.
    #[must_use]
    pub fn stations(&self) -> &[SurveyStation] {
        &self.wellbore.stations
    }

    /// Active calculation method.
    #[must_use]
    pub fn method(&self) -> CalculationMethod {
        self.wellbore.method
    }

    /// Switch calculation method, re-deriving the whole sequence.
    pub fn set_method(&mut self, method: CalculationMethod) -> Result<(), SurveyError> {
        let stations = recompute(&self.wellbore.stations, method)?;
        self.wellbore.method = method;
        self.wellbore.stations = stations;
        Ok(())
    }

    /// Append a default next station: previous station's angles and section
    /// label, measured depth advanced by the configured increment.
    pub fn append_next(&mut self) -> Result<&SurveyStation, SurveyError> {
        let increment = crate::config::get().station.md_increment;
        let last_index = self.wellbore.len() - 1;
        let last = &self.wellbore.stations[last_index];
        let station = SurveyStation::with_label(
            last.measured_depth + increment,
            last.inclination,
            last.azimuth,
            last.section_label,
        );
        let index = self.insert(station)?;
        Ok(&self.wellbore.stations[index])
    }

    /// Insert a station at its measured-depth position and re-derive the
    /// cascade. Returns the index it landed at.
    ///
    /// Inserting ahead of the tie-in would displace the coordinate origin
    /// and is rejected; a duplicate measured depth fails the strict
    /// ordering check.
    pub fn insert(&mut self, station: SurveyStation) -> Result<usize, SurveyError> {
        // Ties sort after the existing station, so a duplicate measured
        // depth lands next to its twin and fails the ordering check instead
        // of reading as a tie-in displacement.
        let position = self
            .wellbore
            .stations
            .partition_point(|s| s.measured_depth <= station.measured_depth);
        // NaN compares false against every station and would park at
        // position 0 — classify the readings before the tie-in gate.
        validate(position, &station, None)?;
        if position == 0 {
            return Err(SurveyError::TieInStationProtected);
        }

        let mut candidate = self.wellbore.stations.clone();
        candidate.insert(position, station);
        let stations = recompute(&candidate, self.wellbore.method)?;

        debug!(
            well = %self.wellbore.name,
            index = position,
            stations = stations.len(),
            "station inserted"
        );
        self.wellbore.stations = stations;
        Ok(position)
    }

    /// Replace the raw fields of the station at `index` and re-derive the
    /// cascade. Derived fields on `raw` are ignored.
    ///
    /// An update that would break ascending measured-depth order is
    /// rejected before any mutation is visible.
    pub fn update(&mut self, index: usize, raw: SurveyStation) -> Result<(), SurveyError> {
        let len = self.wellbore.len();
        if index >= len {
            return Err(SurveyError::IndexOutOfRange { index, len });
        }

        let mut candidate = self.wellbore.stations.clone();
        candidate[index] = SurveyStation::with_label(
            raw.measured_depth,
            raw.inclination,
            raw.azimuth,
            raw.section_label,
        );
        let stations = recompute(&candidate, self.wellbore.method)?;

        debug!(well = %self.wellbore.name, index, "station updated");
        self.wellbore.stations = stations;
        Ok(())
    }

    /// Remove the station at `index` and re-derive the cascade, returning
    /// the removed station. The tie-in cannot be removed.
    pub fn remove(&mut self, index: usize) -> Result<SurveyStation, SurveyError> {
        let len = self.wellbore.len();
        if index == 0 {
            return Err(SurveyError::TieInStationProtected);
        }
        if index >= len {
            return Err(SurveyError::IndexOutOfRange { index, len });
        }

        let mut candidate = self.wellbore.stations.clone();
        let removed = candidate.remove(index);
        let stations = recompute(&candidate, self.wellbore.method)?;

        debug!(
            well = %self.wellbore.name,
            index,
            stations = stations.len(),
            "station removed"
        );
        self.wellbore.stations = stations;
        Ok(removed)
    }

    /// Stations with derived values rounded per the display config.
    ///
    /// This is the presentation boundary — the engine's own sequence stays
    /// unrounded.
    #[must_use]
    pub fn display_stations(&self) -> Vec<SurveyStation> {
        let precision = crate::config::get().display.precision;
        self.wellbore
            .stations
            .iter()
            .map(|s| s.rounded(precision))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SectionLabel;

    fn ensure_config() {
        if !crate::config::is_initialized() {
            crate::config::init(crate::config::SurveyConfig::default());
        }
    }

    fn tie_in() -> SurveyStation {
        SurveyStation::new(0.0, 0.0, 0.0)
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let station = SurveyStation::new(f64::NAN, 0.0, 0.0);
        assert_eq!(
            validate(3, &station, None),
            Err(SurveyError::InvalidMeasurement {
                index: 3,
                field: "measured depth"
            })
        );

        let station = SurveyStation::new(100.0, f64::INFINITY, 0.0);
        assert_eq!(
            validate(1, &station, None),
            Err(SurveyError::InvalidMeasurement {
                index: 1,
                field: "inclination"
            })
        );
    }

    #[test]
    fn test_validate_rejects_out_of_range_inclination() {
        let station = SurveyStation::new(100.0, 190.0, 0.0);
        assert_eq!(
            validate(2, &station, None),
            Err(SurveyError::InvalidAngle {
                index: 2,
                inclination: 190.0
            })
        );
        // Endpoints are legal: 0 = vertical, 180 = inverted vertical
        assert!(validate(2, &SurveyStation::new(100.0, 0.0, 0.0), None).is_ok());
        assert!(validate(2, &SurveyStation::new(100.0, 180.0, 0.0), None).is_ok());
    }

    #[test]
    fn test_validate_requires_strictly_increasing_md() {
        let prev = SurveyStation::new(100.0, 0.0, 0.0);
        let equal = SurveyStation::new(100.0, 0.0, 0.0);
        assert_eq!(
            validate(1, &equal, Some(&prev)),
            Err(SurveyError::InvalidStationOrder {
                index: 1,
                measured_depth: 100.0,
                previous_depth: 100.0
            })
        );
    }

    #[test]
    fn test_validate_accepts_out_of_range_azimuth() {
        // Azimuth wraps instead of failing
        let prev = SurveyStation::new(0.0, 0.0, 0.0);
        let station = SurveyStation::new(100.0, 10.0, 370.0);
        assert!(validate(1, &station, Some(&prev)).is_ok());
    }

    #[test]
    fn test_recompute_tie_in_boundary_ignores_angles() {
        ensure_config();
        // Tie-in angles describe the direction leaving the point; its own
        // geometry is always the fixed boundary.
        let stations = vec![SurveyStation::new(0.0, 45.0, 270.0)];
        let out = recompute(&stations, CalculationMethod::Tangential).expect("recompute");
        assert_eq!(out[0].derived(), DerivedGeometry::TIE_IN);
    }

    #[test]
    fn test_recompute_reports_offending_index() {
        ensure_config();
        let stations = vec![
            SurveyStation::new(0.0, 0.0, 0.0),
            SurveyStation::new(100.0, 0.0, 0.0),
            SurveyStation::new(90.0, 0.0, 0.0),
        ];
        let err = recompute(&stations, CalculationMethod::Tangential);
        assert_eq!(
            err,
            Err(SurveyError::InvalidStationOrder {
                index: 2,
                measured_depth: 90.0,
                previous_depth: 100.0
            })
        );
    }

    #[test]
    fn test_recompute_normalizes_azimuth() {
        ensure_config();
        let stations = vec![tie_in(), SurveyStation::new(100.0, 10.0, 370.0)];
        let out = recompute(&stations, CalculationMethod::Tangential).expect("recompute");
        assert!((out[1].azimuth - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_recompute_known_tangential_example() {
        ensure_config();
        let stations = vec![tie_in(), SurveyStation::new(500.0, 30.0, 45.0)];
        let out = recompute(&stations, CalculationMethod::Tangential).expect("recompute");

        let station = &out[1];
        assert!((station.true_vertical_depth - 433.012_701_892_219_3).abs() < 1e-9);
        assert!((station.north_south_offset - 176.776_695_296_636_88).abs() < 1e-9);
        assert!((station.east_west_offset - 176.776_695_296_636_88).abs() < 1e-9);
        assert!((station.dogleg_severity - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_engine_rejects_tie_in_removal() {
        ensure_config();
        let mut engine =
            SurveyEngine::new("W-1", tie_in(), CalculationMethod::Tangential).expect("engine");
        assert_eq!(engine.remove(0), Err(SurveyError::TieInStationProtected));
        assert_eq!(engine.stations().len(), 1);
    }

    #[test]
    fn test_engine_rejects_insert_ahead_of_tie_in() {
        ensure_config();
        let tie = SurveyStation::new(1000.0, 0.0, 0.0);
        let mut engine =
            SurveyEngine::new("W-1", tie, CalculationMethod::Tangential).expect("engine");
        let err = engine.insert(SurveyStation::new(500.0, 0.0, 0.0));
        assert_eq!(err, Err(SurveyError::TieInStationProtected));
    }

    #[test]
    fn test_engine_insert_non_finite_md_is_invalid_measurement() {
        ensure_config();
        let mut engine =
            SurveyEngine::new("W-1", tie_in(), CalculationMethod::Tangential).expect("engine");

        // NaN must report as a bad reading, not as a tie-in displacement.
        let err = engine.insert(SurveyStation::new(f64::NAN, 10.0, 0.0));
        assert_eq!(
            err,
            Err(SurveyError::InvalidMeasurement {
                index: 0,
                field: "measured depth"
            })
        );
        assert_eq!(engine.stations().len(), 1);
    }

    #[test]
    fn test_engine_insert_at_tie_in_depth_is_an_ordering_error() {
        ensure_config();
        let mut engine =
            SurveyEngine::new("W-1", tie_in(), CalculationMethod::Tangential).expect("engine");

        // Duplicating the tie-in's MD is a monotonicity violation, not a
        // tie-in displacement.
        let err = engine.insert(SurveyStation::new(0.0, 10.0, 0.0));
        assert_eq!(
            err,
            Err(SurveyError::InvalidStationOrder {
                index: 1,
                measured_depth: 0.0,
                previous_depth: 0.0
            })
        );
        assert_eq!(engine.stations().len(), 1);
    }

    #[test]
    fn test_engine_rejected_edit_is_atomic() {
        ensure_config();
        let mut engine =
            SurveyEngine::new("W-1", tie_in(), CalculationMethod::Tangential).expect("engine");
        engine
            .insert(SurveyStation::new(500.0, 30.0, 45.0))
            .expect("insert");
        let before = engine.stations().to_vec();

        // Inclination 190 is invalid — the sequence must be untouched.
        let err = engine.update(1, SurveyStation::new(500.0, 190.0, 45.0));
        assert_eq!(
            err,
            Err(SurveyError::InvalidAngle {
                index: 1,
                inclination: 190.0
            })
        );
        assert_eq!(engine.stations(), before.as_slice());

        // So must an MD edit that breaks ordering.
        let err = engine.update(1, SurveyStation::new(-10.0, 30.0, 45.0));
        assert!(matches!(err, Err(SurveyError::InvalidStationOrder { .. })));
        assert_eq!(engine.stations(), before.as_slice());
    }

    #[test]
    fn test_engine_update_ignores_caller_supplied_derived_values() {
        ensure_config();
        let mut engine =
            SurveyEngine::new("W-1", tie_in(), CalculationMethod::Tangential).expect("engine");
        engine
            .insert(SurveyStation::new(500.0, 30.0, 45.0))
            .expect("insert");

        let mut raw = SurveyStation::new(500.0, 30.0, 45.0);
        raw.true_vertical_depth = 9999.0;
        engine.update(1, raw).expect("update");
        assert!((engine.stations()[1].true_vertical_depth - 433.012_701_892_219_3).abs() < 1e-9);
    }

    #[test]
    fn test_engine_append_next_copies_previous_angles() {
        ensure_config();
        let mut engine =
            SurveyEngine::new("W-1", tie_in(), CalculationMethod::Tangential).expect("engine");
        engine
            .insert(SurveyStation::with_label(
                500.0,
                30.0,
                45.0,
                SectionLabel::Build,
            ))
            .expect("insert");

        let appended = engine.append_next().expect("append");
        assert!((appended.measured_depth - 600.0).abs() < 1e-12);
        assert!((appended.inclination - 30.0).abs() < 1e-12);
        assert!((appended.azimuth - 45.0).abs() < 1e-12);
        assert_eq!(appended.section_label, SectionLabel::Build);
        // Same angles as the previous station → zero dogleg
        assert!(engine.stations()[2].dogleg_severity.abs() < 1e-12);
    }

    #[test]
    fn test_engine_remove_recomputes_across_gap() {
        ensure_config();
        let mut engine =
            SurveyEngine::new("W-1", tie_in(), CalculationMethod::Tangential).expect("engine");
        engine
            .insert(SurveyStation::new(100.0, 10.0, 0.0))
            .expect("insert");
        engine
            .insert(SurveyStation::new(200.0, 20.0, 0.0))
            .expect("insert");

        let removed = engine.remove(1).expect("remove");
        assert!((removed.measured_depth - 100.0).abs() < 1e-12);

        // The surviving station now spans the full 200 ft interval from the
        // tie-in: delta_inc 20 over 200 ft → DLS 10.
        let station = &engine.stations()[1];
        assert!((station.dogleg_severity - 10.0).abs() < 1e-12);
        assert!((station.true_vertical_depth - 200.0 * 20f64.to_radians().cos()).abs() < 1e-9);
    }

    #[test]
    fn test_engine_index_out_of_range() {
        ensure_config();
        let mut engine =
            SurveyEngine::new("W-1", tie_in(), CalculationMethod::Tangential).expect("engine");
        assert_eq!(
            engine.remove(5),
            Err(SurveyError::IndexOutOfRange { index: 5, len: 1 })
        );
        assert_eq!(
            engine.update(5, SurveyStation::new(100.0, 0.0, 0.0)),
            Err(SurveyError::IndexOutOfRange { index: 5, len: 1 })
        );
    }

    #[test]
    fn test_engine_set_method_rederives_everything() {
        ensure_config();
        let mut engine =
            SurveyEngine::new("W-1", tie_in(), CalculationMethod::Tangential).expect("engine");
        engine
            .insert(SurveyStation::new(500.0, 30.0, 45.0))
            .expect("insert");
        let tangential_tvd = engine.stations()[1].true_vertical_depth;

        engine
            .set_method(CalculationMethod::MinimumCurvature)
            .expect("set_method");
        assert_eq!(engine.method(), CalculationMethod::MinimumCurvature);
        let mincurve_tvd = engine.stations()[1].true_vertical_depth;

        // Minimum curvature averages the vertical tie-in direction into the
        // interval, so TVD lands above the tangential figure.
        assert!(mincurve_tvd > tangential_tvd);
    }

    #[test]
    fn test_from_wellbore_discards_stale_geometry() {
        ensure_config();
        let mut wellbore = Wellbore::new("W-1", tie_in());
        let mut station = SurveyStation::new(500.0, 30.0, 45.0);
        station.true_vertical_depth = 1.0; // stale caller-supplied value
        wellbore.stations.push(station);

        let engine = SurveyEngine::from_wellbore(wellbore).expect("engine");
        assert!((engine.stations()[1].true_vertical_depth - 433.012_701_892_219_3).abs() < 1e-9);
    }

    #[test]
    fn test_display_stations_round_at_boundary_only() {
        ensure_config();
        let mut engine =
            SurveyEngine::new("W-1", tie_in(), CalculationMethod::Tangential).expect("engine");
        engine
            .insert(SurveyStation::new(500.0, 30.0, 45.0))
            .expect("insert");

        let display = engine.display_stations();
        assert!((display[1].true_vertical_depth - 433.01).abs() < 1e-12);
        assert!((display[1].north_south_offset - 176.78).abs() < 1e-12);
        // Engine-held values stay unrounded
        assert!((engine.stations()[1].true_vertical_depth - 433.012_701_892_219_3).abs() < 1e-9);
    }
}
