//! Survey Configuration Module
//!
//! Operator-tunable survey constants (station defaults, DLS interval,
//! display precision) loaded from TOML and held in a process-wide global so
//! the engine and CLI read one consistent set of values.
//!
//! ## Loading Order
//!
//! 1. `WELLPATH_CONFIG` environment variable (path to TOML file)
//! 2. `survey_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! Initialize once at startup, read anywhere after that:
//!
//! ```ignore
//! // In main():
//! config::init(SurveyConfig::load());
//!
//! // Anywhere in the codebase:
//! let increment = config::get().station.md_increment;
//! ```

mod survey_config;

pub use survey_config::*;

use std::sync::OnceLock;

/// Process-wide survey configuration, set once at startup.
static SURVEY_CONFIG: OnceLock<SurveyConfig> = OnceLock::new();

/// Install the global survey configuration.
///
/// Expected exactly once at startup; a second call keeps the first value
/// and logs a warning so concurrent test setup stays harmless.
pub fn init(config: SurveyConfig) {
    if SURVEY_CONFIG.set(config).is_err() {
        tracing::warn!("survey config already initialized — keeping the first value");
    }
}

/// Read the global survey configuration.
///
/// Panics when `init()` was never called: running the engine without any
/// config is a startup bug, not a condition worth threading `Result`
/// through every calculation.
pub fn get() -> &'static SurveyConfig {
    SURVEY_CONFIG
        .get()
        .expect("survey config read before config::init() — initialize it at startup")
}

/// Whether `init()` has run. Lets tests and optional config paths avoid
/// the panic in `get()`.
pub fn is_initialized() -> bool {
    SURVEY_CONFIG.get().is_some()
}
