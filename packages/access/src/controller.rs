//! Reactive recomputation with single-entry memoization.
//!
//! [`AccessController::update`] is called whenever the control state or
//! the data bundle may have changed. Identical inputs (same year, radius,
//! flags, and the same bundle allocation) return the cached result;
//! anything else runs the full pipeline and replaces the cached
//! [`AccessResult`] in one assignment, so readers see either the old pair
//! or the new pair, never a mix.

use std::collections::BTreeMap;
use std::sync::Arc;

use seattle_access_models::{
    ControlState, DataBundle, LayerVisibility, PoiCategory, PolygonFeature, YearKey,
};

use crate::buffer::BufferParams;
use crate::coverage::{CoverageBuilder, SkippedBuffer};
use crate::desert::{DesertDeriver, DesertStatus};
use crate::input;
use crate::progress::ProgressCallback;
use crate::summary::AccessSummary;

/// One published coverage/desert pair and what went into it.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessResult {
    /// Year the result was computed for.
    pub year: YearKey,
    /// Radius used for every buffer.
    pub radius_meters: f64,
    /// Union of all enabled buffers, or `None` when nothing contributed.
    pub coverage: Option<PolygonFeature>,
    /// Coverage per contributing category.
    pub by_category: BTreeMap<PoiCategory, PolygonFeature>,
    /// Boundary minus coverage.
    pub desert: PolygonFeature,
    /// How the desert was derived.
    pub desert_status: DesertStatus,
    /// Buffers left out of the union.
    pub skipped: Vec<SkippedBuffer>,
    /// Area statistics.
    pub summary: AccessSummary,
}

/// Runs the full pipeline for one control state.
#[must_use]
pub fn compute_access(
    data: &DataBundle,
    control: &ControlState,
    params: BufferParams,
) -> AccessResult {
    let inputs = input::select(data, control.year);
    let categories = inputs.categories(control);

    let report =
        CoverageBuilder::new(data.space, params).build(&categories, control.radius_meters);
    let desert = DesertDeriver.derive(inputs.boundary, report.combined.as_ref());
    let summary = AccessSummary::measure(data.space, inputs.boundary, &desert.desert);

    AccessResult {
        year: control.year,
        radius_meters: control.radius_meters,
        coverage: report.combined,
        by_category: report.by_category,
        desert: desert.desert,
        desert_status: desert.status,
        skipped: report.skipped,
        summary,
    }
}

/// Controller lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Holding the last result (or nothing yet).
    Idle,
    /// Running the pipeline. Set only for the duration of an update.
    Recomputing,
}

/// Everything a cached result depends on.
#[derive(Debug, Clone)]
struct MemoKey {
    year: YearKey,
    radius_bits: u64,
    enabled: LayerVisibility,
    include_markets: bool,
    data: Arc<DataBundle>,
}

impl MemoKey {
    fn new(data: &Arc<DataBundle>, control: &ControlState) -> Self {
        Self {
            year: control.year,
            radius_bits: control.radius_meters.to_bits(),
            enabled: control.enabled,
            include_markets: control.include_markets,
            data: Arc::clone(data),
        }
    }

    fn matches(&self, data: &Arc<DataBundle>, control: &ControlState) -> bool {
        self.year == control.year
            && self.radius_bits == control.radius_meters.to_bits()
            && self.enabled == control.enabled
            && self.include_markets == control.include_markets
            && Arc::ptr_eq(&self.data, data)
    }
}

/// Recomputes coverage and desert when inputs change.
#[derive(Debug)]
pub struct AccessController {
    params: BufferParams,
    state: ControllerState,
    cached: Option<(MemoKey, Arc<AccessResult>)>,
    recomputations: u64,
}

impl AccessController {
    /// Creates an idle controller with no cached result.
    #[must_use]
    pub const fn new(params: BufferParams) -> Self {
        Self {
            params,
            state: ControllerState::Idle,
            cached: None,
            recomputations: 0,
        }
    }

    /// Returns the result for `control` over `data`, recomputing only when
    /// the inputs differ from the cached ones.
    ///
    /// Data identity is the `Arc` allocation: replacing the bundle with a
    /// new `Arc` always recomputes, even if its contents are equal.
    pub fn update(&mut self, data: &Arc<DataBundle>, control: &ControlState) -> Arc<AccessResult> {
        if let Some((key, result)) = &self.cached
            && key.matches(data, control)
        {
            log::debug!(
                "Access result cached for {} at {} m",
                control.year,
                control.radius_meters
            );
            return Arc::clone(result);
        }

        self.state = ControllerState::Recomputing;
        let result = Arc::new(compute_access(data, control, self.params));
        self.cached = Some((MemoKey::new(data, control), Arc::clone(&result)));
        self.recomputations += 1;
        self.state = ControllerState::Idle;

        log::info!(
            "Recomputed access for {} at {} m: {:.1}% covered, {} skipped",
            control.year,
            control.radius_meters,
            result.summary.covered_fraction * 100.0,
            result.skipped.len()
        );

        result
    }

    /// Computes every year in turn, starting from `base` and reporting one
    /// unit of progress per year.
    pub fn sweep_years(
        &mut self,
        data: &Arc<DataBundle>,
        base: &ControlState,
        progress: &dyn ProgressCallback,
    ) -> Vec<Arc<AccessResult>> {
        let years = YearKey::all();
        progress.set_total(years.len() as u64);

        let results = years
            .iter()
            .map(|&year| {
                progress.set_message(format!("Computing {year}"));
                let control = ControlState { year, ..*base };
                let result = self.update(data, &control);
                progress.inc(1);
                result
            })
            .collect();

        progress.finish(format!("Computed {} years", years.len()));
        results
    }

    /// The most recently published result.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<AccessResult>> {
        self.cached.as_ref().map(|(_, result)| Arc::clone(result))
    }

    /// Current lifecycle state.
    ///
    /// [`update`](Self::update) runs synchronously and returns to
    /// [`ControllerState::Idle`] before it returns, so callers holding
    /// `&self` always observe `Idle`.
    #[must_use]
    pub const fn state(&self) -> ControllerState {
        self.state
    }

    /// Number of times the pipeline has actually run.
    #[must_use]
    pub const fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Drops the cached result so the next update recomputes.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

impl Default for AccessController {
    fn default() -> Self {
        Self::new(BufferParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::fixtures::square;
    use crate::progress::NullProgress;
    use geo::Area;
    use seattle_access_models::{CoordinateSpace, PointFeature, YearMap};

    /// Unit-square city in planar meters with one grocery at the center
    /// in 2025 and one pharmacy in a corner in 2015.
    fn bundle() -> Arc<DataBundle> {
        Arc::new(DataBundle {
            space: CoordinateSpace::Planar,
            city_boundary: PolygonFeature::new(square(0.0, 0.0, 1.0)),
            groceries: YearMap::from_iter([(
                YearKey::Y2025,
                vec![PointFeature::new("center", PoiCategory::Grocery, 0.5, 0.5)],
            )]),
            pharmacies: YearMap::from_iter([(
                YearKey::Y2015,
                vec![PointFeature::new("corner", PoiCategory::Pharmacy, 0.0, 0.0)],
            )]),
            ..DataBundle::default()
        })
    }

    fn control(year: YearKey, radius: f64) -> ControlState {
        ControlState {
            year,
            radius_meters: radius,
            ..ControlState::default()
        }
    }

    #[test]
    fn large_radius_covers_whole_square() {
        let result = compute_access(
            &bundle(),
            &control(YearKey::Y2025, 2.0),
            BufferParams::default(),
        );

        let coverage = result.coverage.unwrap();
        assert!(coverage.geometry.unsigned_area() > 1.0);
        assert!(result.desert.geometry.unsigned_area() < 1e-9);
        assert!((result.summary.covered_fraction - 1.0).abs() < 1e-9);
        assert_eq!(result.desert_status, DesertStatus::Subtracted);
    }

    #[test]
    fn year_without_points_is_full_desert() {
        let data = bundle();
        let result = compute_access(&data, &control(YearKey::Y2020, 0.3), BufferParams::default());

        assert!(result.coverage.is_none());
        assert_eq!(result.desert, data.city_boundary);
        assert_eq!(result.desert_status, DesertStatus::FullBoundary);
        assert!(result.summary.covered_fraction.abs() < f64::EPSILON);
    }

    #[test]
    fn corner_buffer_covers_a_quarter_circle() {
        let result = compute_access(
            &bundle(),
            &control(YearKey::Y2015, 0.5),
            BufferParams { segments: 256 },
        );

        let expected_desert = 1.0 - std::f64::consts::PI * 0.25 / 4.0;
        let desert_area = result.desert.geometry.unsigned_area();
        assert!(
            (desert_area - expected_desert).abs() < 1e-3,
            "expected ~{expected_desert}, got {desert_area}"
        );
    }

    #[test]
    fn identical_inputs_are_memoized() {
        let data = bundle();
        let mut controller = AccessController::default();
        let state = control(YearKey::Y2025, 0.2);

        let first = controller.update(&data, &state);
        let second = controller.update(&data, &state);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(controller.recomputations(), 1);
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[test]
    fn any_input_change_recomputes() {
        let data = bundle();
        let mut controller = AccessController::default();
        let mut state = control(YearKey::Y2025, 0.2);
        controller.update(&data, &state);

        state.radius_meters = 0.3;
        controller.update(&data, &state);
        state.enabled.groceries = false;
        controller.update(&data, &state);
        state.include_markets = true;
        controller.update(&data, &state);
        state.year = YearKey::Y2015;
        controller.update(&data, &state);
        assert_eq!(controller.recomputations(), 5);

        let equal_copy = Arc::new((*data).clone());
        controller.update(&equal_copy, &state);
        assert_eq!(controller.recomputations(), 6, "new allocation recomputes");
    }

    #[test]
    fn latest_holds_the_last_pair() {
        let data = bundle();
        let mut controller = AccessController::default();
        assert!(controller.latest().is_none());

        let a = controller.update(&data, &control(YearKey::Y2025, 0.2));
        let b = controller.update(&data, &control(YearKey::Y2025, 0.4));
        let latest = controller.latest().unwrap();
        assert!(Arc::ptr_eq(&latest, &b));
        assert!(!Arc::ptr_eq(&latest, &a));
        assert!((latest.radius_meters - 0.4).abs() < f64::EPSILON);

        controller.invalidate();
        assert!(controller.latest().is_none());
    }

    #[test]
    fn sweep_covers_every_year() {
        let data = bundle();
        let mut controller = AccessController::default();
        let results = controller.sweep_years(&data, &control(YearKey::Y2025, 0.2), &NullProgress);

        let years: Vec<_> = results.iter().map(|r| r.year).collect();
        assert_eq!(years, YearKey::all());
        assert!(results[1].coverage.is_none(), "2020 has no data");
    }
}
