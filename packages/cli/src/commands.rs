//! The `compute` and `sweep` subcommands and the outputs they share with
//! the interactive loop.

use std::path::Path;
use std::sync::Arc;

use seattle_access::{AccessController, AccessResult, DesertStatus, output};
use seattle_access_cli_utils::{IndicatifProgress, MultiProgress};
use seattle_access_models::{ControlState, CoordinateSpace, DataBundle, YearKey};
use seattle_access_render::adapter::{LayerEvents, MapSession};
use seattle_access_render::document::GeoJsonDocument;
use seattle_access_render::layers::{self, LayerKind, ProjectionOptions};
use serde::Serialize;

/// Machine-readable summary of one result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryReport {
    year: u16,
    radius_meters: f64,
    include_markets: bool,
    skipped_buffers: usize,
    desert_fell_back: bool,
    #[serde(flatten)]
    summary: seattle_access::summary::AccessSummary,
}

impl SummaryReport {
    fn new(result: &AccessResult, control: &ControlState) -> Self {
        Self {
            year: result.year.value(),
            radius_meters: result.radius_meters,
            include_markets: control.include_markets,
            skipped_buffers: result.skipped.len(),
            desert_fell_back: result.desert_status == DesertStatus::FellBack,
            summary: result.summary,
        }
    }
}

/// Logs layers as the session draws them.
struct LogEvents;

impl LayerEvents for LogEvents {
    fn layer_added(&mut self, kind: LayerKind, feature_count: usize) {
        log::debug!("Layer {kind}: {feature_count} features");
    }
}

/// Runs one control state, writes its outputs, and prints the summary.
///
/// # Errors
///
/// Returns an error if the outputs cannot be written.
pub fn compute(
    controller: &mut AccessController,
    data: &Arc<DataBundle>,
    control: &ControlState,
    output_dir: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = controller.update(data, control);
    write_outputs(data, control, &result, output_dir)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&SummaryReport::new(&result, control))?
        );
    } else {
        print_summary(data.space, &result, false);
    }
    Ok(())
}

/// Computes every snapshot year from `control` and prints one line each.
pub fn sweep(
    multi: &MultiProgress,
    controller: &mut AccessController,
    data: &Arc<DataBundle>,
    control: &ControlState,
) {
    let progress =
        IndicatifProgress::steps_bar(multi, "Sweeping years", YearKey::all().len() as u64);
    let results = controller.sweep_years(data, control, progress.as_ref());

    for result in &results {
        print_summary(data.space, result, false);
    }

    let Some(last_year) = results.last().map(|result| result.year) else {
        return;
    };
    let before = controller.recomputations();
    controller.update(data, &ControlState {
        year: last_year,
        ..*control
    });
    log::info!(
        "{} recomputations for {} years (revisiting {last_year} was {})",
        controller.recomputations(),
        results.len(),
        if controller.recomputations() == before {
            "cached"
        } else {
            "recomputed"
        }
    );
}

/// Writes `coverage.geojson`, `desert.geojson`, and the styled
/// `map.geojson` into `output_dir`.
///
/// # Errors
///
/// Returns an error if the directory or a file cannot be written.
pub fn write_outputs(
    data: &DataBundle,
    control: &ControlState,
    result: &AccessResult,
    output_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(output_dir)?;

    let coverage_path = output_dir.join("coverage.geojson");
    std::fs::write(&coverage_path, output::to_geojson_string(result.coverage.as_ref()))?;

    let desert_path = output_dir.join("desert.geojson");
    std::fs::write(&desert_path, output::to_geojson_string(Some(&result.desert)))?;

    let mut document = GeoJsonDocument::new();
    {
        let mut events = LogEvents;
        let mut session = MapSession::open(&mut document, &mut events)?;
        session.show(layers::project(
            data,
            control,
            result,
            ProjectionOptions::default(),
        ))?;
    }
    let map_path = output_dir.join("map.geojson");
    std::fs::write(&map_path, document.to_string_pretty()?)?;

    log::info!(
        "Wrote {}, {}, {} ({} map features)",
        coverage_path.display(),
        desert_path.display(),
        map_path.display(),
        document.feature_count()
    );
    Ok(())
}

/// Prints a one-line summary of `result`.
pub fn print_summary(space: CoordinateSpace, result: &AccessResult, cached: bool) {
    let radius = ControlState {
        radius_meters: result.radius_meters,
        ..ControlState::default()
    };
    let (desert_area, unit) = match space {
        CoordinateSpace::Geographic => (result.summary.desert_area / 1_000_000.0, "km²"),
        CoordinateSpace::Planar => (result.summary.desert_area, "units²"),
    };

    println!(
        "{} @ {:.0} m ({:.2} mi): {:.1}% covered, {:.2} {unit} desert{}{}",
        result.year,
        result.radius_meters,
        radius.radius_miles(),
        result.summary.covered_fraction * 100.0,
        desert_area,
        if result.skipped.is_empty() {
            String::new()
        } else {
            format!(", {} buffers skipped", result.skipped.len())
        },
        if cached { " (cached)" } else { "" },
    );
}
