//! Shared data structures for directional survey calculation
//!
//! This module defines the core types of the trajectory pipeline:
//! - `SurveyStation`: one MD/inclination/azimuth reading plus derived geometry
//! - `CalculationMethod`: method selector for interval geometry derivation
//! - `Wellbore`: the ordered station sequence with identification metadata

mod method;
mod station;
mod wellbore;

pub use method::*;
pub use station::*;
pub use wellbore::*;
