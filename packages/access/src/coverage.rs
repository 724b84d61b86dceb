//! Coverage construction: buffer every enabled point and union the buffers.
//!
//! Fold order is deterministic. Buffers fold left-to-right within a
//! category in input order, giving that category's coverage; the category
//! coverages then fold in [`PoiCategory`] order. A buffer that cannot be
//! built, or whose union step yields an invalid polygon, is skipped and
//! recorded in [`CoverageReport::skipped`]; the accumulator is kept.

use std::collections::BTreeMap;

use geo::{BooleanOps, MultiPolygon};
use seattle_access_models::{CoordinateSpace, PoiCategory, PolygonFeature};
use serde::Serialize;
use thiserror::Error;

use crate::buffer::{self, BufferParams};
use crate::input::CategoryInput;
use crate::measure;

/// Why a buffer was left out of the coverage union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The point had a missing or NaN coordinate.
    #[error("non-finite coordinate")]
    NonFiniteCoordinate,
    /// The radius was zero, negative, or not a number.
    #[error("non-positive radius")]
    NonPositiveRadius,
    /// The buffer polygon was zero-area or invalid.
    #[error("degenerate buffer polygon")]
    DegenerateBuffer,
    /// Unioning the buffer into the accumulator produced an invalid polygon.
    #[error("union produced an invalid polygon")]
    InvalidUnion,
}

/// A buffer (or whole category coverage) that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedBuffer {
    /// Category the skipped geometry belongs to.
    pub category: PoiCategory,
    /// Feature name, or `None` when a whole category coverage was skipped.
    pub name: Option<String>,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Everything produced by one coverage build.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoverageReport {
    /// Union of every enabled category's coverage, or `None` when nothing
    /// contributed.
    pub combined: Option<PolygonFeature>,
    /// Coverage per contributing category.
    pub by_category: BTreeMap<PoiCategory, PolygonFeature>,
    /// Geometry left out of the union.
    pub skipped: Vec<SkippedBuffer>,
}

/// Buffers and unions point features in one coordinate space.
#[derive(Debug, Clone, Copy)]
pub struct CoverageBuilder {
    space: CoordinateSpace,
    params: BufferParams,
}

impl CoverageBuilder {
    /// Creates a builder for `space`.
    #[must_use]
    pub const fn new(space: CoordinateSpace, params: BufferParams) -> Self {
        Self { space, params }
    }

    /// Builds coverage for the enabled entries of `categories`.
    ///
    /// A non-positive or non-finite radius yields an empty report.
    #[must_use]
    pub fn build(&self, categories: &[CategoryInput<'_>], radius_meters: f64) -> CoverageReport {
        let mut report = CoverageReport::default();

        if !(radius_meters.is_finite() && radius_meters > 0.0) {
            log::warn!("Rejecting buffer radius {radius_meters}; no coverage computed");
            return report;
        }

        let mut per_category: BTreeMap<PoiCategory, Option<MultiPolygon<f64>>> = BTreeMap::new();

        for input in categories.iter().filter(|input| input.enabled) {
            let acc = per_category.entry(input.category).or_default();

            for point in input.points {
                let buffer = match buffer::buffer_point(self.space, point, radius_meters, self.params)
                {
                    Ok(polygon) => MultiPolygon::new(vec![polygon]),
                    Err(reason) => {
                        log::warn!(
                            "Skipping {} buffer for '{}': {reason}",
                            point.category,
                            point.display_name()
                        );
                        report.skipped.push(SkippedBuffer {
                            category: input.category,
                            name: Some(point.name.clone()),
                            reason,
                        });
                        continue;
                    }
                };

                if !union_into(acc, &buffer) {
                    log::warn!(
                        "Skipping {} buffer for '{}': union produced an invalid polygon",
                        point.category,
                        point.display_name()
                    );
                    report.skipped.push(SkippedBuffer {
                        category: input.category,
                        name: Some(point.name.clone()),
                        reason: SkipReason::InvalidUnion,
                    });
                }
            }
        }

        let mut combined: Option<MultiPolygon<f64>> = None;

        for (category, coverage) in per_category {
            let Some(coverage) = coverage.filter(|mp| !mp.0.is_empty()) else {
                continue;
            };

            if !union_into(&mut combined, &coverage) {
                log::warn!("Leaving {category} coverage out of the combined union");
                report.skipped.push(SkippedBuffer {
                    category,
                    name: None,
                    reason: SkipReason::InvalidUnion,
                });
            }
            report
                .by_category
                .insert(category, PolygonFeature::new(coverage));
        }

        report.combined = combined
            .filter(|mp| !mp.0.is_empty())
            .map(PolygonFeature::new);

        log::debug!(
            "Built coverage from {} categories ({} skipped)",
            report.by_category.len(),
            report.skipped.len()
        );

        report
    }
}

/// Unions `next` into `acc`. Leaves `acc` untouched and returns `false`
/// when the result is not a usable polygon.
fn union_into(acc: &mut Option<MultiPolygon<f64>>, next: &MultiPolygon<f64>) -> bool {
    let merged = match acc.as_ref() {
        None => next.clone(),
        Some(current) => current.union(next),
    };

    if !measure::is_usable(&merged) {
        return false;
    }

    *acc = Some(merged);
    true
}

/// Buffers every point of every enabled category by `radius_meters` and
/// returns the union, or `None` if no enabled category has a usable point.
#[must_use]
pub fn build_coverage(
    space: CoordinateSpace,
    categories: &[CategoryInput<'_>],
    radius_meters: f64,
) -> Option<PolygonFeature> {
    CoverageBuilder::new(space, BufferParams::default())
        .build(categories, radius_meters)
        .combined
}
