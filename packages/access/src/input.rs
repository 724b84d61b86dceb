//! Normalizes year-keyed `GeoJSON` collections into calculator inputs.
//!
//! Parsing accepts a `FeatureCollection`, a single `Feature`, or a bare
//! geometry for every role. Selection by year never fails: a year with no
//! data yields an empty slice.

use geo::{BooleanOps, MultiPolygon};
use geojson::{Feature, GeoJson};
use seattle_access_models::{
    ControlState, DataBundle, PoiCategory, PointFeature, PolygonFeature, YearKey,
};

use crate::AccessError;

/// The data for one selected year.
#[derive(Debug, Clone, Copy)]
pub struct YearInputs<'a> {
    /// The year these slices belong to.
    pub year: YearKey,
    /// City limits.
    pub boundary: &'a PolygonFeature,
    /// Grocery stores for the year.
    pub groceries: &'a [PointFeature],
    /// Pharmacies for the year.
    pub pharmacies: &'a [PointFeature],
    /// Farmers markets for the year.
    pub markets: &'a [PointFeature],
    /// Population polygons for the year.
    pub population: &'a [PolygonFeature],
}

impl<'a> YearInputs<'a> {
    /// Points for `category`.
    #[must_use]
    pub const fn points(&self, category: PoiCategory) -> &'a [PointFeature] {
        match category {
            PoiCategory::Grocery => self.groceries,
            PoiCategory::Pharmacy => self.pharmacies,
            PoiCategory::Market => self.markets,
        }
    }

    /// One [`CategoryInput`] per category, in fold order, with the enabled
    /// flag resolved against `control`.
    #[must_use]
    pub fn categories(&self, control: &ControlState) -> Vec<CategoryInput<'a>> {
        PoiCategory::all()
            .iter()
            .map(|&category| CategoryInput {
                category,
                points: self.points(category),
                enabled: control.contributes(category),
            })
            .collect()
    }
}

/// The points of one category and whether they count towards coverage.
#[derive(Debug, Clone, Copy)]
pub struct CategoryInput<'a> {
    /// Category of every point in `points`.
    pub category: PoiCategory,
    /// Points to buffer.
    pub points: &'a [PointFeature],
    /// Whether this category contributes.
    pub enabled: bool,
}

/// Selects the slices for `year`.
#[must_use]
pub fn select(bundle: &DataBundle, year: YearKey) -> YearInputs<'_> {
    YearInputs {
        year,
        boundary: &bundle.city_boundary,
        groceries: bundle.groceries.slice(year),
        pharmacies: bundle.pharmacies.slice(year),
        markets: bundle.markets.slice(year),
        population: bundle.population.slice(year),
    }
}

/// Parses point features of `category` from a `GeoJSON` string.
///
/// Non-point geometries are skipped. A feature with a missing or short
/// coordinate array is kept with a NaN position so the buffer step can
/// report it.
///
/// # Errors
///
/// Returns an error if the input is not valid `GeoJSON`.
pub fn parse_points(
    geojson_str: &str,
    category: PoiCategory,
) -> Result<Vec<PointFeature>, AccessError> {
    let geojson: GeoJson = geojson_str.parse()?;
    Ok(into_features(geojson)
        .iter()
        .filter_map(|feature| point_from_feature(feature, category))
        .collect())
}

/// Parses polygon features (with their properties) from a `GeoJSON` string.
///
/// Features whose geometry is not a polygon or multipolygon are skipped.
///
/// # Errors
///
/// Returns an error if the input is not valid `GeoJSON`.
pub fn parse_polygons(geojson_str: &str) -> Result<Vec<PolygonFeature>, AccessError> {
    let geojson: GeoJson = geojson_str.parse()?;
    Ok(into_features(geojson)
        .into_iter()
        .filter_map(polygon_from_feature)
        .collect())
}

/// Parses the city boundary. Multiple polygon features are merged into
/// one multipolygon.
///
/// # Errors
///
/// Returns [`AccessError::MissingBoundary`] if the input has no features,
/// [`AccessError::Conversion`] if none of its features is a polygon, or a
/// parse error if the input is not valid `GeoJSON`.
pub fn parse_boundary(geojson_str: &str) -> Result<PolygonFeature, AccessError> {
    let geojson: GeoJson = geojson_str.parse()?;
    let features = into_features(geojson);
    let total = features.len();
    if total == 0 {
        return Err(AccessError::MissingBoundary);
    }

    let mut parts = features.into_iter().filter_map(polygon_from_feature);
    let mut boundary = parts.next().ok_or_else(|| AccessError::Conversion {
        message: format!("boundary has {total} features but none is a polygon"),
    })?;

    for part in parts {
        let merged: MultiPolygon<f64> = boundary.geometry.union(&part.geometry);
        boundary.geometry = merged;
    }

    if boundary.is_empty() {
        return Err(AccessError::MissingBoundary);
    }
    Ok(boundary)
}

fn into_features(geojson: GeoJson) -> Vec<Feature> {
    match geojson {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => vec![Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: None,
            foreign_members: None,
        }],
    }
}

fn point_from_feature(feature: &Feature, category: PoiCategory) -> Option<PointFeature> {
    let name = feature
        .properties
        .as_ref()
        .and_then(|props| props.get("name"))
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    match feature.geometry.as_ref().map(|geometry| &geometry.value) {
        Some(geojson::Value::Point(position)) => match position.as_slice() {
            [x, y, ..] => Some(PointFeature::new(name, category, *x, *y)),
            _ => {
                log::debug!("{category} feature '{name}' has a short coordinate array");
                Some(PointFeature::new(name, category, f64::NAN, f64::NAN))
            }
        },
        None => {
            log::debug!("{category} feature '{name}' has no geometry");
            Some(PointFeature::new(name, category, f64::NAN, f64::NAN))
        }
        Some(_) => {
            log::debug!("Skipping non-point {category} feature '{name}'");
            None
        }
    }
}

fn polygon_from_feature(feature: Feature) -> Option<PolygonFeature> {
    let properties = feature.properties.unwrap_or_default();
    let geometry: geo::Geometry<f64> = feature.geometry?.try_into().ok()?;

    let geometry = match geometry {
        geo::Geometry::MultiPolygon(mp) => mp,
        geo::Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
        other => {
            log::debug!("Skipping non-polygon feature: {other:?}");
            return None;
        }
    };

    Some(PolygonFeature {
        geometry,
        properties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use seattle_access_models::YearMap;

    const POINTS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "Demo Grocery Store"},
             "geometry": {"type": "Point", "coordinates": [-122.319, 47.619]}},
            {"type": "Feature", "properties": {"name": "No Coordinates"},
             "geometry": null},
            {"type": "Feature", "properties": {"name": "A Line"},
             "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}}
        ]
    }"#;

    const BOUNDARY: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"name": "Seattle"},
            "geometry": {"type": "Polygon", "coordinates": [[
                [-122.44, 47.74], [-122.22, 47.74], [-122.22, 47.49],
                [-122.44, 47.49], [-122.44, 47.74]
            ]]}
        }]
    }"#;

    #[test]
    fn parses_points_and_keeps_malformed_ones() {
        let points = parse_points(POINTS, PoiCategory::Grocery).unwrap();
        assert_eq!(points.len(), 2, "line string should be skipped");
        assert_eq!(points[0].name, "Demo Grocery Store");
        assert!(points[0].is_finite());
        assert_eq!(points[1].name, "No Coordinates");
        assert!(!points[1].is_finite());
        assert!(points.iter().all(|p| p.category == PoiCategory::Grocery));
    }

    #[test]
    fn parses_boundary_with_properties() {
        let boundary = parse_boundary(BOUNDARY).unwrap();
        assert_eq!(boundary.geometry.0.len(), 1);
        assert_eq!(
            boundary.properties.get("name").and_then(|v| v.as_str()),
            Some("Seattle")
        );
    }

    #[test]
    fn bare_geometry_is_accepted_as_boundary() {
        let geometry = r#"{"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}"#;
        let boundary = parse_boundary(geometry).unwrap();
        assert!(boundary.properties.is_empty());
    }

    #[test]
    fn boundary_without_polygons_is_an_error() {
        assert!(matches!(
            parse_boundary(POINTS),
            Err(AccessError::Conversion { message }) if message.contains("3 features")
        ));
        assert!(matches!(
            parse_boundary(r#"{"type": "FeatureCollection", "features": []}"#),
            Err(AccessError::MissingBoundary)
        ));
        assert!(matches!(
            parse_boundary("not json"),
            Err(AccessError::Geojson(_))
        ));
    }

    #[test]
    fn population_density_is_read() {
        let fc = r#"{"type": "FeatureCollection", "features": [{
            "type": "Feature", "properties": {"density": 8000},
            "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}
        }]}"#;
        let polys = parse_polygons(fc).unwrap();
        assert_eq!(polys[0].density(), Some(8000.0));
    }

    #[test]
    fn missing_year_selects_empty_slices() {
        let mut bundle = DataBundle::default();
        bundle.groceries = YearMap::from_iter([(
            YearKey::Y2025,
            vec![PointFeature::new("a", PoiCategory::Grocery, 0.0, 0.0)],
        )]);

        let inputs = select(&bundle, YearKey::Y2020);
        assert!(inputs.groceries.is_empty());
        assert!(inputs.population.is_empty());

        let inputs = select(&bundle, YearKey::Y2025);
        assert_eq!(inputs.groceries.len(), 1);
    }

    #[test]
    fn categories_resolve_market_gating() {
        let bundle = DataBundle::default();
        let inputs = select(&bundle, YearKey::Y2025);
        let control = ControlState::default();

        let categories = inputs.categories(&control);
        let enabled: Vec<_> = categories
            .iter()
            .map(|c| (c.category, c.enabled))
            .collect();
        assert_eq!(
            enabled,
            vec![
                (PoiCategory::Grocery, true),
                (PoiCategory::Pharmacy, true),
                (PoiCategory::Market, false),
            ]
        );
    }
}
