//! Desert derivation: the part of the boundary outside all coverage.

use geo::BooleanOps;
use seattle_access_models::PolygonFeature;

use crate::measure;

/// How a desert polygon was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesertStatus {
    /// There was no coverage; the desert is the whole boundary.
    FullBoundary,
    /// The coverage was subtracted from the boundary.
    Subtracted,
    /// The difference failed; the whole boundary is used instead.
    FellBack,
}

/// Result of [`DesertDeriver::derive`].
#[derive(Debug, Clone, PartialEq)]
pub struct DesertOutcome {
    /// The uncovered region. Carries the boundary's properties.
    pub desert: PolygonFeature,
    /// How it was obtained.
    pub status: DesertStatus,
}

/// Subtracts coverage from a boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesertDeriver;

impl DesertDeriver {
    /// Computes `boundary - coverage`.
    ///
    /// Falls back to the unchanged boundary (with a warning) when either
    /// input or the difference is not a usable polygon.
    #[must_use]
    pub fn derive(
        &self,
        boundary: &PolygonFeature,
        coverage: Option<&PolygonFeature>,
    ) -> DesertOutcome {
        let Some(coverage) = coverage else {
            return DesertOutcome {
                desert: boundary.clone(),
                status: DesertStatus::FullBoundary,
            };
        };

        if !measure::is_usable(&boundary.geometry) || !measure::is_usable(&coverage.geometry) {
            log::warn!("Boundary or coverage is invalid; showing the full boundary as desert");
            return fallback(boundary);
        }

        let remainder = boundary.geometry.difference(&coverage.geometry);
        if !measure::is_usable(&remainder) {
            log::warn!("Boundary difference produced an invalid polygon; showing the full boundary as desert");
            return fallback(boundary);
        }

        DesertOutcome {
            desert: PolygonFeature {
                geometry: remainder,
                properties: boundary.properties.clone(),
            },
            status: DesertStatus::Subtracted,
        }
    }
}

fn fallback(boundary: &PolygonFeature) -> DesertOutcome {
    DesertOutcome {
        desert: boundary.clone(),
        status: DesertStatus::FellBack,
    }
}

/// Returns `boundary - coverage`, or `boundary` unchanged when `coverage`
/// is `None` or the difference fails.
#[must_use]
pub fn derive_desert(
    boundary: &PolygonFeature,
    coverage: Option<&PolygonFeature>,
) -> PolygonFeature {
    DesertDeriver.derive(boundary, coverage).desert
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::fixtures::{bow_tie, square};
    use crate::buffer::{self, BufferParams};
    use geo::{Area, Contains, MultiPolygon, Point};
    use seattle_access_models::{CoordinateSpace, PoiCategory, PointFeature};

    fn boundary() -> PolygonFeature {
        PolygonFeature::new(square(0.0, 0.0, 10.0)).with_property("name", "city")
    }

    #[test]
    fn no_coverage_returns_boundary_exactly() {
        let b = boundary();
        let outcome = DesertDeriver.derive(&b, None);
        assert_eq!(outcome.desert, b);
        assert_eq!(outcome.status, DesertStatus::FullBoundary);
        assert_eq!(derive_desert(&b, None), b);
    }

    #[test]
    fn desert_is_subset_of_boundary() {
        let b = boundary();
        let coverage = PolygonFeature::new(square(5.0, 5.0, 10.0));
        let outcome = DesertDeriver.derive(&b, Some(&coverage));

        assert_eq!(outcome.status, DesertStatus::Subtracted);
        let desert_area = outcome.desert.geometry.unsigned_area();
        assert!((desert_area - 75.0).abs() < 1e-9, "got {desert_area}");
        assert!(desert_area <= b.geometry.unsigned_area());
        assert!(outcome.desert.geometry.contains(&Point::new(2.0, 2.0)));
        assert!(!outcome.desert.geometry.contains(&Point::new(7.0, 7.0)));
        assert_eq!(outcome.desert.properties, b.properties);
    }

    #[test]
    fn full_coverage_leaves_empty_desert() {
        let b = boundary();
        let coverage = PolygonFeature::new(square(-1.0, -1.0, 12.0));
        let desert = derive_desert(&b, Some(&coverage));
        assert!(desert.geometry.unsigned_area() < 1e-9);
    }

    #[test]
    fn invalid_coverage_falls_back_to_boundary() {
        let b = boundary();
        let coverage = PolygonFeature::new(bow_tie());
        let outcome = DesertDeriver.derive(&b, Some(&coverage));
        assert_eq!(outcome.status, DesertStatus::FellBack);
        assert_eq!(outcome.desert, b);
    }

    #[test]
    fn invalid_boundary_is_returned_unchanged() {
        let b = PolygonFeature::new(bow_tie());
        let coverage = PolygonFeature::new(square(0.0, 0.0, 0.5));
        let outcome = DesertDeriver.derive(&b, Some(&coverage));
        assert_eq!(outcome.status, DesertStatus::FellBack);
        assert_eq!(outcome.desert, b);
    }

    #[test]
    fn geographic_buffer_inside_boundary_shrinks_desert() {
        let b = PolygonFeature::new(square(-122.40, 47.55, 0.1));
        let store = PointFeature::new("store", PoiCategory::Grocery, -122.35, 47.60);
        let circle = buffer::buffer_point(
            CoordinateSpace::Geographic,
            &store,
            800.0,
            BufferParams::default(),
        )
        .unwrap();
        let coverage = PolygonFeature::new(MultiPolygon::new(vec![circle]));

        let outcome = DesertDeriver.derive(&b, Some(&coverage));
        assert_eq!(outcome.status, DesertStatus::Subtracted);
        assert!(!outcome.desert.geometry.0[0].interiors().is_empty());

        let boundary_area = measure::area(CoordinateSpace::Geographic, &b.geometry);
        let coverage_area = measure::area(CoordinateSpace::Geographic, &coverage.geometry);
        let desert_area = measure::area(CoordinateSpace::Geographic, &outcome.desert.geometry);

        assert!(desert_area < boundary_area, "{desert_area} >= {boundary_area}");
        let removed = boundary_area - desert_area;
        assert!(
            (removed - coverage_area).abs() / coverage_area < 1e-4,
            "removed {removed}, buffer {coverage_area}"
        );
    }
}
