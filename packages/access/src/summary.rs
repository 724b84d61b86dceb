//! Area statistics derived from a coverage/desert pair.

use seattle_access_models::{CoordinateSpace, PolygonFeature};
use serde::Serialize;

use crate::measure;

/// Covered and uncovered share of the boundary.
///
/// Areas are in square meters for geographic data and square coordinate
/// units for planar data.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessSummary {
    /// Area of the city boundary.
    pub boundary_area: f64,
    /// Area of the desert polygon.
    pub desert_area: f64,
    /// `boundary_area - desert_area`, never negative.
    pub covered_area: f64,
    /// `covered_area / boundary_area`, or 0 for an empty boundary.
    pub covered_fraction: f64,
}

impl AccessSummary {
    /// Measures `desert` against `boundary`.
    #[must_use]
    pub fn measure(
        space: CoordinateSpace,
        boundary: &PolygonFeature,
        desert: &PolygonFeature,
    ) -> Self {
        let boundary_area = measure::area(space, &boundary.geometry);
        let desert_area = measure::area(space, &desert.geometry).min(boundary_area);
        let covered_area = (boundary_area - desert_area).max(0.0);
        let covered_fraction = if boundary_area > 0.0 {
            covered_area / boundary_area
        } else {
            0.0
        };

        Self {
            boundary_area,
            desert_area,
            covered_area,
            covered_fraction,
        }
    }
}
