//! Classifies population polygons by which services reach them.

use std::collections::BTreeMap;

use geo::{Centroid, Contains};
use seattle_access_models::{PoiCategory, PolygonFeature, ServiceLevel};

/// A population polygon with its service classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedArea<'a> {
    /// The classified polygon.
    pub area: &'a PolygonFeature,
    /// Which services reach its centroid.
    pub level: ServiceLevel,
}

/// Classifies each area by whether its centroid lies inside the grocery
/// and pharmacy coverage in `by_category`. Areas without a centroid
/// (empty geometry) are [`ServiceLevel::Neither`].
#[must_use]
pub fn classify_areas<'a>(
    areas: &'a [PolygonFeature],
    by_category: &BTreeMap<PoiCategory, PolygonFeature>,
) -> Vec<ClassifiedArea<'a>> {
    areas
        .iter()
        .map(|area| {
            let centroid = area.geometry.centroid();
            let reaches = |category: PoiCategory| {
                match (centroid, by_category.get(&category)) {
                    (Some(point), Some(coverage)) => coverage.geometry.contains(&point),
                    _ => false,
                }
            };
            ClassifiedArea {
                area,
                level: ServiceLevel::from_flags(
                    reaches(PoiCategory::Grocery),
                    reaches(PoiCategory::Pharmacy),
                ),
            }
        })
        .collect()
}
