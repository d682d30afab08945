//! Survey calculation methods
//!
//! Interval geometry derivation between two adjacent stations. All methods
//! share one contract: given the previous station with its geometry already
//! derived and the current station's raw readings (azimuth pre-normalized,
//! ordering pre-validated), produce the current station's derived tuple.
//!
//! Angles convert degrees→radians internally. No rounding happens here —
//! only the presentation boundary rounds, so error cannot compound across
//! a long cascade.

use crate::types::{CalculationMethod, DerivedGeometry, SurveyStation};

/// Dogleg angles below this (radians) are treated as a straight interval
/// when computing the minimum-curvature ratio factor.
const STRAIGHT_HOLE_EPSILON: f64 = 1e-9;

impl CalculationMethod {
    /// Derive the current station's geometry from the previous station.
    ///
    /// `previous` must already carry consistent derived values; `current`
    /// must satisfy `validate` with `current.measured_depth` strictly
    /// greater than `previous.measured_depth`.
    #[must_use]
    pub fn derive(self, previous: &SurveyStation, current: &SurveyStation) -> DerivedGeometry {
        match self {
            Self::Tangential => tangential(previous, current),
            Self::BalancedTangential => balanced_tangential(previous, current),
            Self::MinimumCurvature => minimum_curvature(previous, current),
        }
    }
}

/// Tangential method: the entire interval is a straight line at the
/// *current* station's angles.
///
/// DLS here is the inclination-only approximation `|Δinc| / (Δmd / interval)`.
/// Azimuth change is deliberately excluded, which understates severity for
/// wells turning in azimuth at constant inclination — kept for parity with
/// the legacy field calculation, not silently corrected. The other methods
/// use the full 3D dogleg angle.
fn tangential(previous: &SurveyStation, current: &SurveyStation) -> DerivedGeometry {
    let delta_md = current.measured_depth - previous.measured_depth;
    let inc = current.inclination.to_radians();
    let azi = current.azimuth.to_radians();

    let dls_interval = crate::config::get().calculation.dls_interval;
    let dogleg_severity = (current.inclination - previous.inclination).abs()
        / (delta_md / dls_interval);

    DerivedGeometry {
        true_vertical_depth: previous.true_vertical_depth + delta_md * inc.cos(),
        north_south_offset: previous.north_south_offset + delta_md * inc.sin() * azi.cos(),
        east_west_offset: previous.east_west_offset + delta_md * inc.sin() * azi.sin(),
        dogleg_severity,
    }
}

/// Balanced tangential method: the interval is split into two straight
/// halves, one at each station's angles. Equivalent to minimum curvature
/// with a ratio factor of 1.
fn balanced_tangential(previous: &SurveyStation, current: &SurveyStation) -> DerivedGeometry {
    arc_method(previous, current, false)
}

/// Minimum curvature method: fits a circular arc through both stations'
/// direction vectors, scaling the balanced-tangential chord by the dogleg
/// ratio factor `RF = (2 / β) · tan(β / 2)`.
fn minimum_curvature(previous: &SurveyStation, current: &SurveyStation) -> DerivedGeometry {
    arc_method(previous, current, true)
}

fn arc_method(
    previous: &SurveyStation,
    current: &SurveyStation,
    with_ratio_factor: bool,
) -> DerivedGeometry {
    let delta_md = current.measured_depth - previous.measured_depth;
    let inc1 = previous.inclination.to_radians();
    let inc2 = current.inclination.to_radians();
    let azi1 = previous.azimuth.to_radians();
    let azi2 = current.azimuth.to_radians();

    let dogleg = dogleg_angle(inc1, azi1, inc2, azi2);
    let ratio_factor = if with_ratio_factor && dogleg > STRAIGHT_HOLE_EPSILON {
        (2.0 / dogleg) * (dogleg / 2.0).tan()
    } else {
        1.0
    };

    let half = delta_md / 2.0;
    let dls_interval = crate::config::get().calculation.dls_interval;

    DerivedGeometry {
        true_vertical_depth: previous.true_vertical_depth
            + half * (inc1.cos() + inc2.cos()) * ratio_factor,
        north_south_offset: previous.north_south_offset
            + half * (inc1.sin() * azi1.cos() + inc2.sin() * azi2.cos()) * ratio_factor,
        east_west_offset: previous.east_west_offset
            + half * (inc1.sin() * azi1.sin() + inc2.sin() * azi2.sin()) * ratio_factor,
        dogleg_severity: dogleg.to_degrees() / (delta_md / dls_interval),
    }
}

/// Angle between the two stations' direction vectors (radians).
///
/// `cos β = cos i₁ cos i₂ + sin i₁ sin i₂ cos(a₂ − a₁)`, clamped against
/// floating-point drift before the acos.
fn dogleg_angle(inc1: f64, azi1: f64, inc2: f64, azi2: f64) -> f64 {
    let cos_dogleg =
        inc1.cos() * inc2.cos() + inc1.sin() * inc2.sin() * (azi2 - azi1).cos();
    cos_dogleg.clamp(-1.0, 1.0).acos()
}
