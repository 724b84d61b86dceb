//! Conversion of calculator results back to `GeoJSON`.

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject};
use seattle_access_models::{PointFeature, PolygonFeature};

/// Converts a polygon feature into a `GeoJSON` feature, carrying its
/// properties plus any `extra` properties.
#[must_use]
pub fn polygon_to_feature(feature: &PolygonFeature, extra: JsonObject) -> Feature {
    let mut properties = feature.properties.clone();
    properties.extend(extra);

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(&feature.geometry))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Converts a point feature into a `GeoJSON` feature with `name` and
/// `category` properties. Returns `None` for non-finite coordinates.
#[must_use]
pub fn point_to_feature(point: &PointFeature, extra: JsonObject) -> Option<Feature> {
    if !point.is_finite() {
        return None;
    }

    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), point.display_name().into());
    properties.insert("category".to_string(), point.category.as_ref().into());
    properties.extend(extra);

    Some(Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::Point(vec![
            point.position.x,
            point.position.y,
        ]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

/// Wraps features in a `FeatureCollection`.
#[must_use]
pub fn collection(features: Vec<Feature>) -> GeoJson {
    GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Serializes an optional polygon as a one-feature collection, or an
/// empty collection for `None`.
#[must_use]
pub fn to_geojson_string(feature: Option<&PolygonFeature>) -> String {
    let features = feature
        .map(|f| vec![polygon_to_feature(f, JsonObject::new())])
        .unwrap_or_default();
    collection(features).to_string()
}
