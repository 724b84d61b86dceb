//! Circular buffers around point features.
//!
//! Circles are approximated by regular polygons. In
//! [`CoordinateSpace::Geographic`] the radius is converted to degrees with
//! a local equirectangular approximation around the center, which keeps
//! buffers, unions, and the boundary difference in the same space.

use std::f64::consts::PI;

use geo::{Coord, LineString, MultiPolygon, Polygon};
use seattle_access_models::{CoordinateSpace, PointFeature};

use crate::SkipReason;
use crate::measure;

/// Mean Earth radius in meters (IUGG).
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Latitudes beyond this have no usable longitude scale.
const MAX_ABS_LATITUDE: f64 = 89.9;

/// Parameters for buffer construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferParams {
    /// Number of segments approximating each circle.
    pub segments: usize,
}

impl BufferParams {
    /// Fewest segments accepted; lower values are raised to this.
    pub const MIN_SEGMENTS: usize = 8;
}

impl Default for BufferParams {
    fn default() -> Self {
        Self { segments: 64 }
    }
}

/// Builds the circular buffer of `radius_meters` around `point`.
///
/// # Errors
///
/// Returns the [`SkipReason`] when the point has a non-finite coordinate
/// or the resulting polygon is degenerate.
pub fn buffer_point(
    space: CoordinateSpace,
    point: &PointFeature,
    radius_meters: f64,
    params: BufferParams,
) -> Result<Polygon<f64>, SkipReason> {
    if !point.is_finite() {
        return Err(SkipReason::NonFiniteCoordinate);
    }
    if !(radius_meters.is_finite() && radius_meters > 0.0) {
        return Err(SkipReason::NonPositiveRadius);
    }

    let center = point.position;
    let (rx, ry) = match space {
        CoordinateSpace::Planar => (radius_meters, radius_meters),
        CoordinateSpace::Geographic => {
            if center.y.abs() > MAX_ABS_LATITUDE {
                return Err(SkipReason::DegenerateBuffer);
            }
            let ry = (radius_meters / EARTH_RADIUS_METERS).to_degrees();
            let rx = ry / center.y.to_radians().cos();
            (rx, ry)
        }
    };

    let polygon = circle(center, rx, ry, params.segments.max(BufferParams::MIN_SEGMENTS));

    let check = MultiPolygon::new(vec![polygon.clone()]);
    if measure::area(CoordinateSpace::Planar, &check) <= 0.0 || !measure::is_usable(&check) {
        return Err(SkipReason::DegenerateBuffer);
    }

    Ok(polygon)
}

/// Counter-clockwise ellipse ring with semi-axes `rx`, `ry`.
#[allow(clippy::cast_precision_loss)]
fn circle(center: Coord<f64>, rx: f64, ry: f64, segments: usize) -> Polygon<f64> {
    let mut coords = Vec::with_capacity(segments + 1);
    for i in 0..segments {
        let angle = 2.0 * PI * i as f64 / segments as f64;
        coords.push(Coord {
            x: rx.mul_add(angle.cos(), center.x),
            y: ry.mul_add(angle.sin(), center.y),
        });
    }
    coords.push(coords[0]);

    Polygon::new(LineString::new(coords), vec![])
}

#[cfg(test)]
mod tests {
    use super::*;
    use seattle_access_models::PoiCategory;

    fn grocery(x: f64, y: f64) -> PointFeature {
        PointFeature::new("test", PoiCategory::Grocery, x, y)
    }

    #[test]
    fn planar_circle_area_approximates_pi_r_squared() {
        let polygon = buffer_point(
            CoordinateSpace::Planar,
            &grocery(0.0, 0.0),
            10.0,
            BufferParams { segments: 128 },
        )
        .unwrap();
        let area = measure::area(CoordinateSpace::Planar, &MultiPolygon::new(vec![polygon]));
        let expected = PI * 100.0;
        assert!(
            (area - expected).abs() / expected < 0.01,
            "expected ~{expected}, got {area}"
        );
    }

    #[test]
    fn ring_is_closed_with_segment_count() {
        let polygon = buffer_point(
            CoordinateSpace::Planar,
            &grocery(5.0, 5.0),
            1.0,
            BufferParams { segments: 32 },
        )
        .unwrap();
        assert_eq!(polygon.exterior().0.len(), 33);
    }

    #[test]
    fn segments_are_raised_to_minimum() {
        let polygon = buffer_point(
            CoordinateSpace::Planar,
            &grocery(0.0, 0.0),
            1.0,
            BufferParams { segments: 3 },
        )
        .unwrap();
        assert_eq!(polygon.exterior().0.len(), BufferParams::MIN_SEGMENTS + 1);
    }

    #[test]
    fn geographic_buffer_has_requested_area() {
        let polygon = buffer_point(
            CoordinateSpace::Geographic,
            &grocery(-122.3214, 47.6205),
            800.0,
            BufferParams::default(),
        )
        .unwrap();
        let area = measure::area(
            CoordinateSpace::Geographic,
            &MultiPolygon::new(vec![polygon]),
        );
        let expected = PI * 800.0 * 800.0;
        assert!(
            (area - expected).abs() / expected < 0.03,
            "expected ~{expected}, got {area}"
        );
    }

    #[test]
    fn rejects_malformed_points() {
        let params = BufferParams::default();
        assert_eq!(
            buffer_point(CoordinateSpace::Planar, &grocery(f64::NAN, 0.0), 1.0, params),
            Err(SkipReason::NonFiniteCoordinate)
        );
        assert_eq!(
            buffer_point(CoordinateSpace::Planar, &grocery(0.0, 0.0), 0.0, params),
            Err(SkipReason::NonPositiveRadius)
        );
        assert_eq!(
            buffer_point(CoordinateSpace::Geographic, &grocery(0.0, 90.0), 1.0, params),
            Err(SkipReason::DegenerateBuffer)
        );
    }
}
