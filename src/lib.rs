//! Wellpath: Directional Survey Engine
//!
//! Converts an ordered sequence of measured-depth/inclination/azimuth survey
//! stations into 3D well-path geometry: true vertical depth, north/south and
//! east/west displacement, and dogleg severity.
//!
//! ## Architecture
//!
//! - **Survey Engine**: station validation, edit operations, cascade recompute
//! - **Calculation Methods**: tangential, balanced tangential, minimum curvature
//! - **Config**: operator-tunable survey constants loaded from TOML
//!
//! Call `config::init()` once at startup before using the engine; see the
//! `config` module for the loading order.

pub mod config;
pub mod survey_engine;
pub mod types;

// Re-export survey configuration
pub use config::SurveyConfig;

// Re-export commonly used types
pub use types::{
    normalize_azimuth, CalculationMethod, DerivedGeometry, SectionLabel, SurveyStation, Wellbore,
};

// Re-export the engine
pub use survey_engine::{recompute, validate, SurveyEngine, SurveyError};
