//! Area measurement and validity checks shared by every pipeline stage.

use geo::{Area, ChamberlainDuquetteArea, CoordsIter, LineString, MultiPolygon, Polygon, Validation};
use seattle_access_models::CoordinateSpace;

/// Unsigned area of `geometry`.
///
/// Square coordinate units in [`CoordinateSpace::Planar`], square meters
/// on the sphere in [`CoordinateSpace::Geographic`].
#[must_use]
pub fn area(space: CoordinateSpace, geometry: &MultiPolygon<f64>) -> f64 {
    match space {
        CoordinateSpace::Planar => geometry.unsigned_area(),
        CoordinateSpace::Geographic => geometry.0.iter().map(spherical_area).sum(),
    }
}

/// Exterior minus holes, each ring measured unsigned so hole winding
/// never adds to the total.
fn spherical_area(polygon: &Polygon<f64>) -> f64 {
    let holes: f64 = polygon.interiors().iter().map(ring_area).sum();
    (ring_area(polygon.exterior()) - holes).max(0.0)
}

fn ring_area(ring: &LineString<f64>) -> f64 {
    Polygon::new(ring.clone(), vec![]).chamberlain_duquette_unsigned_area()
}

/// Returns `true` if every coordinate is finite and the geometry passes
/// OGC validity (closed, non-self-intersecting rings).
///
/// An empty multipolygon is usable: it is the result of subtracting a
/// coverage that spans the whole boundary.
#[must_use]
pub fn is_usable(geometry: &MultiPolygon<f64>) -> bool {
    if geometry.0.is_empty() {
        return true;
    }
    geometry
        .coords_iter()
        .all(|c| c.x.is_finite() && c.y.is_finite())
        && geometry.is_valid()
}
