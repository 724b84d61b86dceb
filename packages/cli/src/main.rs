#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the access calculator.
//!
//! Loads a data bundle (a TOML manifest on disk, or the embedded Seattle
//! sample), then computes coverage and desert polygons for one control
//! state (`compute`), every snapshot year (`sweep`), or interactively
//! (`interactive`).
//!
//! Uses `indicatif-log-bridge` (via [`seattle_access_cli_utils::init_logger`])
//! so log lines and the sweep progress bar never fight for the terminal.

mod commands;
mod config;
mod interactive;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use seattle_access::AccessController;
use seattle_access_models::{ControlState, DataBundle, PoiCategory, YearKey};

use crate::config::AccessConfig;

#[derive(Parser)]
#[command(name = "seattle_access", about = "Access coverage and desert calculator")]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data manifest (default: the embedded Seattle sample)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute one control state and write `GeoJSON` outputs
    Compute {
        #[command(flatten)]
        control: ControlArgs,

        /// Output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compute every snapshot year
    Sweep {
        #[command(flatten)]
        control: ControlArgs,
    },
    /// Adjust the controls interactively
    Interactive {
        #[command(flatten)]
        control: ControlArgs,

        /// Output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

/// Overrides for the configured control state.
#[derive(Args)]
struct ControlArgs {
    /// Snapshot year (2015, 2020, 2025)
    #[arg(long, value_parser = parse_year)]
    year: Option<YearKey>,

    /// Buffer radius in meters, snapped to 50 m and clamped to 200-2000
    #[arg(long)]
    radius: Option<f64>,

    /// Count farmers markets towards access
    #[arg(long)]
    include_markets: bool,

    /// Hide a category (grocery, pharmacy, market); repeatable
    #[arg(long = "hide", value_name = "CATEGORY", value_parser = parse_category)]
    hidden: Vec<PoiCategory>,
}

impl ControlArgs {
    fn apply(&self, base: ControlState) -> ControlState {
        let mut control = base;
        if let Some(year) = self.year {
            control.year = year;
        }
        if let Some(radius) = self.radius {
            control.set_radius(radius);
        }
        if self.include_markets {
            control.include_markets = true;
        }
        for &category in &self.hidden {
            control.enabled.set_shown(category, false);
        }
        control
    }
}

fn parse_year(value: &str) -> Result<YearKey, String> {
    let year: u16 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a year"))?;
    YearKey::from_value(year).map_err(|e| e.to_string())
}

fn parse_category(value: &str) -> Result<PoiCategory, String> {
    value
        .parse()
        .map_err(|_| format!("unknown category '{value}' (expected grocery, pharmacy, market)"))
}

fn load_data(manifest: Option<&Path>) -> Result<DataBundle, seattle_access_data::DataError> {
    match manifest {
        Some(path) => {
            log::info!("Loading data from {}", path.display());
            seattle_access_data::manifest::load_from_path(path)
        }
        None => {
            log::info!("Loading embedded Seattle sample");
            seattle_access_data::sample::seattle_sample()
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = seattle_access_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AccessConfig::load(path)?,
        None => AccessConfig::default(),
    };
    let data = Arc::new(load_data(cli.data.as_deref().or(config.data.as_deref()))?);
    let mut controller = AccessController::new(config.buffer_params());

    match cli.command {
        Commands::Compute {
            control,
            output_dir,
            json,
        } => commands::compute(
            &mut controller,
            &data,
            &control.apply(config.defaults),
            output_dir.as_deref().unwrap_or(config.output_dir.as_path()),
            json,
        )?,
        Commands::Sweep { control } => commands::sweep(
            &multi,
            &mut controller,
            &data,
            &control.apply(config.defaults),
        ),
        Commands::Interactive {
            control,
            output_dir,
        } => interactive::run(
            &mut controller,
            &data,
            control.apply(config.defaults),
            output_dir.as_deref().unwrap_or(config.output_dir.as_path()),
        )?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_args_override_defaults() {
        let cli = Cli::parse_from([
            "seattle_access",
            "compute",
            "--year",
            "2015",
            "--radius",
            "1234",
            "--include-markets",
            "--hide",
            "pharmacy",
        ]);
        let Commands::Compute { control, .. } = cli.command else {
            panic!("expected compute");
        };

        let state = control.apply(ControlState::default());
        assert_eq!(state.year, YearKey::Y2015);
        assert!((state.radius_meters - 1250.0).abs() < f64::EPSILON);
        assert!(state.include_markets);
        assert!(!state.enabled.pharmacies);
        assert!(state.enabled.groceries);
    }

    #[test]
    fn bad_year_and_category_are_rejected() {
        assert!(Cli::try_parse_from(["seattle_access", "sweep", "--year", "2019"]).is_err());
        assert!(Cli::try_parse_from(["seattle_access", "sweep", "--hide", "bakery"]).is_err());
    }

    #[test]
    fn embedded_sample_loads() {
        let data = load_data(None).unwrap();
        assert!(!data.groceries.is_empty());
    }
}
