//! Interactive control loop.
//!
//! Each prompt edits the [`ControlState`]; the controller then recomputes
//! or returns its cached result, and the summary line says which.

use std::path::Path;
use std::sync::Arc;

use dialoguer::{Confirm, Input, MultiSelect, Select};
use seattle_access::AccessController;
use seattle_access_models::{ControlState, DataBundle, PoiCategory, YearKey};

use crate::commands;

/// Menu entries.
enum Action {
    Year,
    Radius,
    Layers,
    Markets,
    Write,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Year,
        Self::Radius,
        Self::Layers,
        Self::Markets,
        Self::Write,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Year => "Change year",
            Self::Radius => "Change buffer radius",
            Self::Layers => "Show or hide categories",
            Self::Markets => "Count farmers markets towards access",
            Self::Write => "Write GeoJSON outputs",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the loop until the user quits.
///
/// # Errors
///
/// Returns an error if a prompt fails or outputs cannot be written.
pub fn run(
    controller: &mut AccessController,
    data: &Arc<DataBundle>,
    initial: ControlState,
    output_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Seattle Access Calculator");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
    let mut control = initial;

    loop {
        let before = controller.recomputations();
        let result = controller.update(data, &control);
        commands::print_summary(data.space, &result, controller.recomputations() == before);

        let idx = Select::new()
            .with_prompt("What would you like to change?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::Year => control.year = prompt_year(control.year)?,
            Action::Radius => {
                let meters: f64 = Input::new()
                    .with_prompt(format!(
                        "Radius in meters ({:.0}-{:.0}, step {:.0})",
                        ControlState::RADIUS_MIN,
                        ControlState::RADIUS_MAX,
                        ControlState::RADIUS_STEP
                    ))
                    .default(control.radius_meters)
                    .interact_text()?;
                control.set_radius(meters);
            }
            Action::Layers => prompt_layers(&mut control)?,
            Action::Markets => {
                control.include_markets = Confirm::new()
                    .with_prompt("Count farmers markets (limited hours) towards access?")
                    .default(control.include_markets)
                    .interact()?;
            }
            Action::Write => commands::write_outputs(data, &control, &result, output_dir)?,
            Action::Quit => break,
        }
    }

    Ok(())
}

fn prompt_year(current: YearKey) -> Result<YearKey, dialoguer::Error> {
    let years = YearKey::all();
    let labels: Vec<String> = years.iter().map(ToString::to_string).collect();
    let default = years.iter().position(|&y| y == current).unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Year")
        .items(&labels)
        .default(default)
        .interact()?;
    Ok(years[idx])
}

fn prompt_layers(control: &mut ControlState) -> Result<(), dialoguer::Error> {
    let categories = PoiCategory::all();
    let labels: Vec<&str> = categories.iter().map(|c| c.label()).collect();
    let defaults: Vec<bool> = categories
        .iter()
        .map(|&c| control.enabled.is_shown(c))
        .collect();

    let selected = MultiSelect::new()
        .with_prompt("Shown categories (space=toggle, enter=confirm)")
        .items(&labels)
        .defaults(&defaults)
        .interact()?;

    for (i, &category) in categories.iter().enumerate() {
        control.enabled.set_shown(category, selected.contains(&i));
    }
    Ok(())
}
