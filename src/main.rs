//! wellpath - directional survey calculator
//!
//! Loads a survey from a wellbore JSON document or a station CSV, re-derives
//! the well-path geometry with the selected calculation method, and writes
//! the augmented station table as CSV or JSON.
//!
//! # Usage
//!
//! ```bash
//! # Compute a CSV station list with the default (tangential) method
//! wellpath surveys/f9a.csv
//!
//! # Minimum curvature, JSON output to a file
//! wellpath surveys/f9a.json --method minimum_curvature --format json -o out.json
//! ```
//!
//! # Environment Variables
//!
//! - `WELLPATH_CONFIG`: Path to a survey_config.toml
//! - `RUST_LOG`: Logging level (default: info)

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use wellpath::config::{self, SurveyConfig};
use wellpath::{CalculationMethod, SectionLabel, SurveyEngine, SurveyStation, Wellbore};

#[derive(Parser, Debug)]
#[command(name = "wellpath")]
#[command(about = "Directional survey calculator - MD/inclination/azimuth to well-path geometry")]
#[command(version)]
struct CliArgs {
    /// Input survey: a wellbore .json document or a station .csv
    /// (header: measured_depth,inclination,azimuth[,section_label])
    input: PathBuf,

    /// Calculation method: tangential, balanced_tangential, minimum_curvature.
    /// Defaults to the wellbore document's method, else the configured default.
    #[arg(long)]
    method: Option<String>,

    /// Output format: csv or json
    #[arg(long, default_value = "csv")]
    format: String,

    /// Output path. Defaults to stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Path to a survey_config.toml (overrides the standard search order)
    #[arg(long, env = "WELLPATH_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let survey_config = match &args.config {
        Some(path) => SurveyConfig::load_from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SurveyConfig::load(),
    };
    config::init(survey_config);

    let mut wellbore = load_wellbore(&args.input)
        .with_context(|| format!("loading survey from {}", args.input.display()))?;

    if let Some(name) = &args.method {
        wellbore.method = name.parse::<CalculationMethod>()?;
    }

    let engine = SurveyEngine::from_wellbore(wellbore).context("survey rejected")?;
    info!(
        well = %engine.wellbore().name,
        stations = engine.stations().len(),
        method = %engine.method(),
        total_depth = engine.wellbore().total_depth(),
        "survey computed"
    );

    let rendered = match args.format.as_str() {
        "csv" => render_csv(&engine),
        "json" => render_json(&engine)?,
        other => bail!("unknown output format '{other}' (expected csv or json)"),
    };

    match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("creating output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            writer.write_all(rendered.as_bytes())?;
            writer.flush()?;
            info!(path = %path.display(), "output written");
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

/// Load a wellbore from JSON (full document) or CSV (bare station list).
fn load_wellbore(path: &Path) -> Result<Wellbore> {
    let contents = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match extension.as_str() {
        "json" => serde_json::from_str(&contents).context("parsing wellbore JSON"),
        "csv" => {
            let stations = parse_station_csv(&contents)?;
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unnamed")
                .to_string();
            let wellbore = Wellbore {
                name,
                method: config::get().calculation.default_method,
                surveyed_at: None,
                stations,
            };
            if wellbore.is_empty() {
                bail!("CSV contains no station rows");
            }
            Ok(wellbore)
        }
        other => bail!("unsupported input extension '.{other}' (expected .json or .csv)"),
    }
}

/// Parse a station CSV with header `measured_depth,inclination,azimuth[,section_label]`.
fn parse_station_csv(contents: &str) -> Result<Vec<SurveyStation>> {
    let mut lines = contents.lines().enumerate();

    let (_, header) = lines.next().context("CSV is empty")?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    if columns.len() < 3
        || columns[0] != "measured_depth"
        || columns[1] != "inclination"
        || columns[2] != "azimuth"
    {
        bail!("CSV header must start with measured_depth,inclination,azimuth — got '{header}'");
    }

    let mut stations = Vec::new();
    for (line_no, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 3 {
            bail!("line {}: expected at least 3 fields, got {}", line_no + 1, fields.len());
        }

        let parse = |value: &str, column: &str| -> Result<f64> {
            value
                .parse::<f64>()
                .with_context(|| format!("line {}: invalid {column} '{value}'", line_no + 1))
        };

        let section_label = match fields.get(3) {
            Some(&"") | None => SectionLabel::default(),
            Some(&label) => parse_section_label(label)
                .with_context(|| format!("line {}: unknown section label '{label}'", line_no + 1))?,
        };

        stations.push(SurveyStation::with_label(
            parse(fields[0], "measured_depth")?,
            parse(fields[1], "inclination")?,
            parse(fields[2], "azimuth")?,
            section_label,
        ));
    }

    Ok(stations)
}

fn parse_section_label(label: &str) -> Result<SectionLabel> {
    match label {
        "Vertical" => Ok(SectionLabel::Vertical),
        "Build" => Ok(SectionLabel::Build),
        "Hold" => Ok(SectionLabel::Hold),
        "Drop-off" => Ok(SectionLabel::DropOff),
        other => bail!("unknown section label '{other}'"),
    }
}

/// Render the computed stations as CSV with display rounding.
fn render_csv(engine: &SurveyEngine) -> String {
    let precision = config::get().display.precision as usize;
    let mut out = String::from(
        "measured_depth,inclination,azimuth,section_label,true_vertical_depth,north_south_offset,east_west_offset,dogleg_severity\n",
    );
    for station in engine.display_stations() {
        out.push_str(&format!(
            "{},{},{},{},{:.p$},{:.p$},{:.p$},{:.p$}\n",
            station.measured_depth,
            station.inclination,
            station.azimuth,
            station.section_label,
            station.true_vertical_depth,
            station.north_south_offset,
            station.east_west_offset,
            station.dogleg_severity,
            p = precision,
        ));
    }
    out
}

/// Render the full wellbore document as JSON with display rounding.
fn render_json(engine: &SurveyEngine) -> Result<String> {
    let mut wellbore = engine.wellbore().clone();
    wellbore.stations = engine.display_stations();
    let mut json = serde_json::to_string_pretty(&wellbore).context("serializing wellbore")?;
    json.push('\n');
    Ok(json)
}
